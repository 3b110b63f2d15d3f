// src/service/mod.rs

pub mod netease;

use crate::{
    error::AppResult,
    models::{CloudPage, LocalAudioFile, LoginStatus, QrCheck},
};
use async_trait::async_trait;

pub use netease::NeteaseClient;

/// 登录相关接口
#[async_trait]
pub trait SessionService: Send + Sync {
    async fn login_status(&self, cookie: &str) -> AppResult<LoginStatus>;
    async fn qr_key(&self) -> AppResult<String>;
    /// 返回用于生成二维码的登录链接
    async fn qr_create(&self, key: &str) -> AppResult<String>;
    async fn qr_check(&self, key: &str) -> AppResult<QrCheck>;
}

/// 云盘相关接口
#[async_trait]
pub trait CloudStorage: Send + Sync {
    async fn list_page(&self, limit: u32, offset: u32, cookie: &str) -> AppResult<CloudPage>;
    async fn upload(&self, file: &LocalAudioFile, cookie: &str) -> AppResult<()>;
}
