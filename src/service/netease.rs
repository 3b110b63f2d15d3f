// src/service/netease.rs

use super::{CloudStorage, SessionService};
use crate::{
    client::RobustClient,
    constants::api::{UPLOAD_FIELD, codes, paths},
    error::*,
    models::{
        CloudPage, CloudSong, LocalAudioFile, LoginStatus, QrCheck,
        api::{
            LoginStatusResponse, QrCheckResponse, QrCreateResponse, QrKeyResponse,
            UploadResponse, UserCloudResponse, pick_message,
        },
    },
};
use async_trait::async_trait;
use log::{debug, info, trace};
use reqwest::multipart::{Form, Part};
use std::sync::Arc;

/// 通过 NeteaseCloudMusicApi 兼容网关访问网易云音乐。
pub struct NeteaseClient {
    http_client: Arc<RobustClient>,
}

impl NeteaseClient {
    pub fn new(http_client: Arc<RobustClient>) -> Self {
        Self { http_client }
    }
}

fn ensure_ok(code: Option<i64>, message: impl FnOnce() -> String) -> AppResult<()> {
    match code {
        None | Some(codes::OK) => Ok(()),
        Some(codes::NEED_LOGIN) => Err(AppError::SessionInvalid),
        Some(code) => Err(AppError::Api {
            code,
            message: message(),
        }),
    }
}

#[async_trait]
impl SessionService for NeteaseClient {
    async fn login_status(&self, cookie: &str) -> AppResult<LoginStatus> {
        let res: LoginStatusResponse = self
            .http_client
            .get_json(paths::LOGIN_STATUS, &[("cookie", cookie)])
            .await?;
        ensure_ok(res.code, || pick_message(&res.msg, &res.message))?;
        let profile = res.data.profile;
        debug!(
            "登录状态接口 code: {:?}, userId: {:?}",
            res.data.code,
            profile.as_ref().and_then(|p| p.user_id)
        );
        Ok(LoginStatus {
            profile: profile.map(|p| p.nickname),
        })
    }

    async fn qr_key(&self) -> AppResult<String> {
        let res: QrKeyResponse = self.http_client.get_json(paths::QR_KEY, &[]).await?;
        ensure_ok(res.code, || "获取二维码 key 失败".to_string())?;
        Ok(res.data.unikey)
    }

    async fn qr_create(&self, key: &str) -> AppResult<String> {
        let res: QrCreateResponse = self
            .http_client
            .get_json(paths::QR_CREATE, &[("key", key)])
            .await?;
        ensure_ok(res.code, || "生成二维码失败".to_string())?;
        Ok(res.data.qrurl)
    }

    async fn qr_check(&self, key: &str) -> AppResult<QrCheck> {
        let res: QrCheckResponse = self
            .http_client
            .get_json(paths::QR_CHECK, &[("key", key)])
            .await?;
        let message = res.message.unwrap_or_default();
        match res.code {
            codes::QR_EXPIRED => Ok(QrCheck::Expired(message)),
            codes::QR_WAITING_SCAN => Ok(QrCheck::WaitingScan),
            codes::QR_WAITING_CONFIRM => Ok(QrCheck::WaitingConfirm),
            codes::QR_CONFIRMED => match res.cookie.filter(|c| !c.is_empty()) {
                Some(cookie) => Ok(QrCheck::Confirmed(cookie)),
                None => Err(AppError::Api {
                    code: res.code,
                    message: "登录成功但未返回 Cookie".into(),
                }),
            },
            code => Err(AppError::Api { code, message }),
        }
    }
}

#[async_trait]
impl CloudStorage for NeteaseClient {
    async fn list_page(&self, limit: u32, offset: u32, cookie: &str) -> AppResult<CloudPage> {
        let limit_str = limit.to_string();
        let offset_str = offset.to_string();
        let res: UserCloudResponse = self
            .http_client
            .get_json(
                paths::USER_CLOUD,
                &[("limit", limit_str.as_str()), ("offset", offset_str.as_str()), ("cookie", cookie)],
            )
            .await?;
        ensure_ok(Some(res.code), || pick_message(&res.msg, &res.message))?;
        let records = res.data.unwrap_or_default();
        for record in &records {
            trace!(
                "云盘歌曲 songId={:?} 文件={:?} 大小={:?} 上传时间={:?}: {}",
                record.song_id,
                record.file_name,
                record.file_size,
                record.add_time,
                record.song_name
            );
        }
        let songs: Vec<CloudSong> = records.into_iter().map(CloudSong::from).collect();
        debug!(
            "云盘列表 offset={} 返回 {} 条记录 (总数: {:?}, hasMore: {})",
            offset,
            songs.len(),
            res.count,
            res.has_more
        );
        Ok(CloudPage {
            songs,
            has_more: res.has_more,
        })
    }

    async fn upload(&self, file: &LocalAudioFile, cookie: &str) -> AppResult<()> {
        let data = tokio::fs::read(&file.path).await?;
        let part = Part::bytes(data)
            .file_name(file.file_name())
            .mime_str(&file.mime_type)?;
        let form = Form::new().part(UPLOAD_FIELD, part);
        let res: UploadResponse = self
            .http_client
            .post_multipart(paths::CLOUD_UPLOAD, &[("cookie", cookie)], form)
            .await?;
        ensure_ok(Some(res.code), || pick_message(&res.msg, &res.message))?;
        info!("上传完成: {}", file.path.display());
        Ok(())
    }
}
