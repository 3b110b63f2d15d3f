// src/models/mod.rs

pub mod api;

use crate::error::AppError;
use crate::symbols;
use chrono::{DateTime, Local};
use colored::{ColoredString, Colorize};
use std::path::PathBuf;

/// 音频文件中与匹配相关的标签
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackTags {
    pub album: Option<String>,
    /// 已去除首尾空白，缺失时为空字符串
    pub artist: String,
    pub title: String,
}

/// 扫描得到的本地音频文件。文件内容在上传时才重新读取，避免整个曲库驻留内存。
#[derive(Debug, Clone)]
pub struct LocalAudioFile {
    pub path: PathBuf,
    pub mime_type: String,
    pub size: u64,
    pub created: DateTime<Local>,
    pub md5: String,
    pub tags: TrackTags,
}

impl LocalAudioFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// 云盘列表中的一条歌曲记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudSong {
    pub album: Option<String>,
    pub artist: String,
    pub title: String,
}

impl From<api::CloudSongRecord> for CloudSong {
    fn from(record: api::CloudSongRecord) -> Self {
        Self {
            album: record.album,
            artist: record.artist.unwrap_or_default().trim().to_string(),
            title: record.song_name,
        }
    }
}

/// 分页获取的云盘列表中的一页
#[derive(Debug, Clone, Default)]
pub struct CloudPage {
    pub songs: Vec<CloudSong>,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginStatus {
    /// 登录有效时为用户昵称
    pub profile: Option<String>,
}

impl LoginStatus {
    pub fn is_logged_in(&self) -> bool {
        self.profile.is_some()
    }
}

/// 二维码登录状态轮询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrCheck {
    /// 二维码过期或被拒绝 (800)
    Expired(String),
    /// 等待扫码 (801)
    WaitingScan,
    /// 已扫码，等待确认 (802)
    WaitingConfirm,
    /// 登录成功 (803)，携带 Cookie
    Confirmed(String),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UploadStatus {
    Success,
    Failed,
}

impl UploadStatus {
    pub fn get_display_info(
        &self,
    ) -> (
        &'static ColoredString,
        fn(ColoredString) -> ColoredString,
        &'static str,
    ) {
        match self {
            UploadStatus::Success => (&symbols::OK, |s| s.green(), "上传成功"),
            UploadStatus::Failed => (&symbols::ERROR, |s| s.red(), "上传失败"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadResult {
    pub path: PathBuf,
    pub status: UploadStatus,
    pub attempts: u32,
    pub message: Option<String>,
}

/// 将错误归类为报告中的失败原因
pub fn failure_reason(error: &AppError) -> &'static str {
    match error {
        AppError::SessionInvalid => "登录状态失效",
        AppError::Network(err)
        | AppError::NetworkMiddleware(reqwest_middleware::Error::Reqwest(err)) => {
            if err.is_timeout() {
                "网络连接超时"
            } else if err.is_connect() {
                "无法建立连接"
            } else if err.is_status() {
                "服务器返回错误"
            } else {
                "网络请求失败"
            }
        }
        AppError::NetworkMiddleware(_) => "网络请求失败",
        AppError::Api { .. } => "接口拒绝上传",
        AppError::Io(_) => "本地文件读写错误",
        AppError::Tag { .. } => "标签读取失败",
        AppError::Json(_) | AppError::ApiParseFailed { .. } => "接口响应无法解析",
        _ => "发生未预期的程序错误",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_song_from_record_trims_artist() {
        let record: api::CloudSongRecord = serde_json::from_str(
            r#"{ "songId": 1, "songName": "晴天", "album": "叶惠美", "artist": " 周杰伦 ", "fileName": "晴天.mp3", "addTime": 1700000000000 }"#,
        )
        .unwrap();
        assert_eq!(record.add_time, Some(1_700_000_000_000));
        let song = CloudSong::from(record);
        assert_eq!(song.artist, "周杰伦");
        assert_eq!(song.album.as_deref(), Some("叶惠美"));
        assert_eq!(song.title, "晴天");
    }

    #[test]
    fn test_login_status_without_data_deserializes() {
        let res: api::LoginStatusResponse =
            serde_json::from_str(r#"{"code": 301, "msg": "需要登录"}"#).unwrap();
        assert_eq!(res.code, Some(301));
        assert!(res.data.profile.is_none());
    }

    #[test]
    fn test_failure_reason_for_api_error() {
        let err = AppError::Api { code: 500, message: "boom".into() };
        assert_eq!(failure_reason(&err), "接口拒绝上传");
    }
}
