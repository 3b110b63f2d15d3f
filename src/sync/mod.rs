// src/sync/mod.rs

pub mod dedup;
pub mod inventory;
pub mod scanner;
pub mod scheduler;

pub use inventory::CloudInventory;
pub use scheduler::UploadScheduler;

use crate::{
    SyncContext, constants,
    error::{AppError, AppResult},
    models::failure_reason,
    service::CloudStorage,
    symbols, ui, utils,
};
use colored::*;
use log::info;
use std::{collections::HashMap, path::{Path, PathBuf}};

/// 单次同步的统计与明细
#[derive(Debug, Default)]
pub struct UploadReport {
    pub scanned: usize,
    pub already_in_cloud: usize,
    pub total: usize,
    pub success: usize,
    pub failed: Vec<(PathBuf, String)>,
    pub skipped: Vec<(PathBuf, String)>,
    pub interrupted: bool,
    pub dry_run: bool,
}

impl UploadReport {
    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self, path: &Path, reason: &str) {
        log::error!("文件 '{}' 上传失败，原因: {}", path.display(), reason);
        self.failed.push((path.to_path_buf(), reason.to_string()));
    }

    pub fn record_skip(&mut self, path: &Path, reason: &str) {
        info!("跳过文件 '{}'，原因: {}", path.display(), reason);
        self.skipped.push((path.to_path_buf(), reason.to_string()));
    }

    pub fn did_all_succeed(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn print_report(&self) {
        info!(
            "同步报告: Scanned={}, InCloud={}, Total={}, Success={}, Failed={}, Skipped={}",
            self.scanned,
            self.already_in_cloud,
            self.total,
            self.success,
            self.failed.len(),
            self.skipped.len()
        );

        if !self.skipped.is_empty() || !self.failed.is_empty() {
            ui::print_sub_header("同步详情报告");
            if !self.skipped.is_empty() {
                println!("\n{} 跳过的文件 ({}个):", *symbols::SKIP, self.skipped.len());
                print_grouped_report(&self.skipped, |s| s.cyan());
            }
            if !self.failed.is_empty() {
                println!("\n{} 上传失败的文件 ({}个):", *symbols::ERROR, self.failed.len());
                print_grouped_report(&self.failed, |s| s.red());
            }
        }

        ui::print_sub_header("任务总结");
        println!(
            "本地音频 {} 个，云盘中已存在 {} 个，待上传 {} 个。",
            self.scanned, self.already_in_cloud, self.total
        );
        if self.dry_run {
            println!("{} 试运行模式，未上传任何文件。", *symbols::INFO);
        } else if self.total > 0 && self.success == self.total {
            println!("{} 所有 {} 个文件均已上传成功。", *symbols::OK, self.total);
        } else {
            let summary = format!(
                "{} | {} | {}",
                format!("成功: {}", self.success).green(),
                format!("失败: {}", self.failed.len()).red(),
                format!("跳过: {}", self.skipped.len()).yellow()
            );
            println!("{}", summary);
        }
    }
}

fn print_grouped_report(items: &[(PathBuf, String)], color_fn: fn(ColoredString) -> ColoredString) {
    let mut grouped: HashMap<&String, Vec<&PathBuf>> = HashMap::new();
    for (path, reason) in items {
        grouped.entry(reason).or_default().push(path);
    }
    let mut sorted_reasons: Vec<_> = grouped.keys().copied().collect();
    sorted_reasons.sort();
    for reason in sorted_reasons {
        println!("  - {}", color_fn(format!("原因: {}", reason).into()));
        let mut paths = grouped[reason].clone();
        paths.sort();
        for path in paths {
            println!(
                "    - {}",
                utils::truncate_text(&path.to_string_lossy(), constants::PATH_TRUNCATE_LENGTH)
            );
        }
    }
}

/// 同步流程: 云盘列表 -> 扫描本地文件 -> 比对 -> 排序上传。
pub async fn run_sync(
    context: &SyncContext,
    storage: &dyn CloudStorage,
    cookie: &str,
) -> AppResult<UploadReport> {
    let config = &context.config;
    let mut report = UploadReport::default();

    ui::print_header("阶段 1/3: 获取云盘歌曲列表");
    let inventory = inventory::fetch_cloud_inventory(storage, cookie, config.page_size).await?;
    ui::info(&format!("云盘中共有 {} 首歌曲。", inventory.song_count()));

    ui::print_header("阶段 2/3: 扫描本地音乐");
    ui::info(&format!("音乐目录: {}", config.music_dir.display()));
    let paths = scanner::discover_audio_files(&config.music_dir, &config.extensions)?;
    ui::info(&format!(
        "找到 {} 个音频文件 (扩展名: {})",
        paths.len(),
        config.extensions.join(",")
    ));
    let scan = scanner::scan_files(&paths, config.strict_tags).await?;
    for (path, e) in &scan.failures {
        report.record_skip(path, failure_reason(e));
    }
    report.scanned = paths.len();

    let outcome = dedup::select_candidates(scan.files, &inventory, config.match_policy);
    report.already_in_cloud = outcome.already_in_cloud.len();
    for dup in &outcome.duplicates {
        report.record_skip(&dup.path, "与其他本地文件内容相同");
    }
    let candidates = scheduler::schedule(outcome.candidates);
    report.total = candidates.len();

    ui::print_header(&format!("阶段 3/3: 上传 (共 {} 个文件)", candidates.len()));
    if candidates.is_empty() {
        ui::info("没有需要上传的文件，云盘已是最新。");
    } else if config.dry_run {
        ui::info("试运行模式，以下文件将按顺序上传:");
        for (i, file) in candidates.iter().enumerate() {
            ui::plain(&format!(
                "  [{}/{}] {} - {} ({})",
                i + 1,
                candidates.len(),
                if file.tags.artist.is_empty() { "未知歌手" } else { file.tags.artist.as_str() },
                file.tags.title,
                utils::truncate_text(&file.path.to_string_lossy(), constants::PATH_TRUNCATE_LENGTH)
            ));
        }
        report.dry_run = true;
    } else {
        ui::info(&format!("按 {} 可在当前文件完成后停止。", *symbols::CTRL_C));
        UploadScheduler::new(
            storage,
            cookie,
            config.upload_attempts,
            context.cancellation_token.clone(),
        )
        .run(&candidates, &mut report)
        .await;
    }

    report.print_report();
    if report.interrupted {
        return Err(AppError::UserInterrupt);
    }
    Ok(report)
}
