// src/sync/dedup.rs

use super::inventory::CloudInventory;
use crate::{
    config::MatchPolicy,
    constants,
    models::LocalAudioFile,
    utils,
};
use log::debug;
use std::collections::HashSet;

/// 空白或缺失的专辑名视为无专辑，统一返回 None。
pub fn known_album(album: Option<&str>) -> Option<&str> {
    album.filter(|a| !a.trim().is_empty() && *a != constants::UNKNOWN_ALBUM)
}

/// 计算 `专辑:歌手:歌名` 形式的匹配键，缺失专辑时使用占位专辑名。
pub fn identity_key(album: Option<&str>, artist: &str, title: &str) -> String {
    let album = known_album(album).unwrap_or(constants::UNKNOWN_ALBUM);
    format!("{}:{}:{}", album, artist.trim(), title)
}

/// 本地文件在云盘集合中可能出现的所有键，按匹配优先级排列。
pub fn candidate_keys(file: &LocalAudioFile, policy: MatchPolicy) -> Vec<String> {
    let tags = &file.tags;
    let mut keys = vec![identity_key(tags.album.as_deref(), &tags.artist, &tags.title)];
    if policy.filename_fallback {
        keys.push(utils::filename_key(&file.path));
    }
    if policy.title_fallback && !tags.title.is_empty() {
        keys.push(tags.title.clone());
    }
    keys
}

/// 本地文件与云盘比对的结果
#[derive(Debug, Default)]
pub struct DedupOutcome {
    pub candidates: Vec<LocalAudioFile>,
    /// 已存在于云盘中的文件及命中的键
    pub already_in_cloud: Vec<(LocalAudioFile, String)>,
    /// 与先前文件内容相同 (MD5 一致) 的重复文件
    pub duplicates: Vec<LocalAudioFile>,
}

/// 筛选出需要上传的文件。候选文件保持输入顺序，同一路径或同一内容只入队一次。
pub fn select_candidates(
    files: Vec<LocalAudioFile>,
    inventory: &CloudInventory,
    policy: MatchPolicy,
) -> DedupOutcome {
    let mut outcome = DedupOutcome::default();
    let mut seen_paths = HashSet::new();
    let mut seen_md5 = HashSet::new();

    for file in files {
        if !seen_paths.insert(file.path.clone()) {
            continue;
        }
        let matched = candidate_keys(&file, policy)
            .into_iter()
            .find(|key| inventory.contains(key));
        if let Some(key) = matched {
            debug!("云盘中已存在 '{}' (匹配键: {})", file.path.display(), key);
            outcome.already_in_cloud.push((file, key));
            continue;
        }
        if !seen_md5.insert(file.md5.clone()) {
            debug!("'{}' 与已入队文件内容相同，跳过", file.path.display());
            outcome.duplicates.push(file);
            continue;
        }
        outcome.candidates.push(file);
    }
    outcome
}
