// src/sync/scanner.rs

use crate::{
    constants,
    error::*,
    models::{LocalAudioFile, TrackTags},
    ui, utils,
};
use chrono::{DateTime, Local};
use lofty::{config::ParseOptions, file::TaggedFileExt, probe::Probe, tag::Accessor};
use log::{debug, warn};
use std::{
    io::Cursor,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// 递归查找音乐目录下扩展名匹配的音频文件，按路径排序。
pub fn discover_audio_files(dir: &Path, extensions: &[String]) -> AppResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AppError::UserInputError(format!(
            "音乐目录 '{}' 不存在或不是目录。",
            dir.display()
        )));
    }
    let root = dunce::canonicalize(dir)?;
    let mut files = Vec::new();
    for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| extensions.iter().any(|e| *e == ext));
        if matches {
            files.push(entry.into_path());
        }
    }
    debug!("在 '{}' 下找到 {} 个音频文件", root.display(), files.len());
    Ok(files)
}

/// 从内存中的文件内容解析专辑、歌手、歌名。
/// 文件没有任何标签时，歌名取文件名 (不含扩展名)。
pub fn parse_tags(path: &Path, data: &[u8]) -> AppResult<TrackTags> {
    let tagged_file = Probe::new(Cursor::new(data))
        .options(ParseOptions::new().read_properties(false))
        .guess_file_type()?
        .read()
        .map_err(|source| AppError::Tag {
            path: path.to_path_buf(),
            source,
        })?;

    let fallback_title = || {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
        warn!("文件 '{}' 中没有任何标签，使用文件名作为歌名", path.display());
        return Ok(TrackTags {
            album: None,
            artist: String::new(),
            title: fallback_title(),
        });
    };

    Ok(TrackTags {
        album: tag.album().map(|s| s.into_owned()),
        artist: tag
            .artist()
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        title: tag
            .title()
            .map(|s| s.into_owned())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(fallback_title),
    })
}

/// 读取单个音频文件的内容、MIME 类型、创建时间和标签。
pub async fn extract_metadata(path: &Path) -> AppResult<LocalAudioFile> {
    let data = tokio::fs::read(path).await?;
    let metadata = tokio::fs::metadata(path).await?;
    // 部分文件系统不记录创建时间
    let created: DateTime<Local> = metadata
        .created()
        .or_else(|_| metadata.modified())?
        .into();
    let tags = parse_tags(path, &data)?;
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    Ok(LocalAudioFile {
        path: path.to_path_buf(),
        mime_type,
        size: data.len() as u64,
        created,
        md5: utils::md5_hex(&data),
        tags,
    })
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub files: Vec<LocalAudioFile>,
    pub failures: Vec<(PathBuf, AppError)>,
}

/// 依次提取所有文件的元数据。`strict` 为真时遇到第一个失败即返回错误，
/// 否则记录失败并继续。
pub async fn scan_files(paths: &[PathBuf], strict: bool) -> AppResult<ScanOutcome> {
    let mut outcome = ScanOutcome::default();
    let pbar = ui::new_tasks_progress_bar(paths.len() as u64, "扫描");
    for path in paths {
        pbar.set_message(utils::truncate_text(
            &path.file_name().unwrap_or_default().to_string_lossy(),
            40,
        ));
        match extract_metadata(path).await {
            Ok(file) => outcome.files.push(file),
            Err(e) if strict => {
                pbar.finish_and_clear();
                log::error!("读取 '{}' 失败，中止: {}", path.display(), e);
                return Err(e);
            }
            Err(e) => {
                warn!("读取 '{}' 失败，跳过: {}", path.display(), e);
                pbar.suspend(|| {
                    ui::warn(&format!(
                        "跳过 {}: {}",
                        utils::truncate_text(&path.to_string_lossy(), constants::PATH_TRUNCATE_LENGTH),
                        e
                    ))
                });
                outcome.failures.push((path.clone(), e));
            }
        }
        pbar.inc(1);
    }
    pbar.finish_and_clear();
    Ok(outcome)
}
