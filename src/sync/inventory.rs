// src/sync/inventory.rs

use super::dedup::{identity_key, known_album};
use crate::{error::AppResult, models::CloudSong, service::CloudStorage};
use log::{debug, info};
use std::collections::HashSet;

/// 云盘歌曲的匹配键集合，构建完成后只读。
#[derive(Debug, Default, Clone)]
pub struct CloudInventory {
    keys: HashSet<String>,
    songs: usize,
}

impl CloudInventory {
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: HashSet<String> = keys.into_iter().map(Into::into).collect();
        let songs = keys.len();
        Self { keys, songs }
    }

    /// 无专辑信息的云盘歌曲额外以裸歌名索引
    fn insert_song(&mut self, song: &CloudSong) {
        self.keys
            .insert(identity_key(song.album.as_deref(), &song.artist, &song.title));
        if known_album(song.album.as_deref()).is_none() && !song.title.is_empty() {
            self.keys.insert(song.title.clone());
        }
        self.songs += 1;
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn song_count(&self) -> usize {
        self.songs
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}

/// 从偏移 0 开始按固定页大小分页拉取云盘列表，直到服务端返回 `hasMore == false`。
/// 任一页请求失败都会直接返回错误。
pub async fn fetch_cloud_inventory(
    storage: &dyn CloudStorage,
    cookie: &str,
    page_size: u32,
) -> AppResult<CloudInventory> {
    let mut inventory = CloudInventory::default();
    let mut offset = 0;
    loop {
        let page = storage.list_page(page_size, offset, cookie).await?;
        debug!("offset={} 获取到 {} 首云盘歌曲", offset, page.songs.len());
        for song in &page.songs {
            inventory.insert_song(song);
        }
        if !page.has_more {
            break;
        }
        offset += page_size;
    }
    info!(
        "云盘列表获取完成: {} 首歌曲, {} 个匹配键",
        inventory.song_count(),
        inventory.key_count()
    );
    Ok(inventory)
}
