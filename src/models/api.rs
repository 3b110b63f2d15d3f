// src/models/api.rs

use serde::Deserialize;

// --- 登录 (Login) API 响应结构体 ---

/// Cookie 被拒绝时网关只返回顶层 `code` 和 `msg`，没有 `data`
#[derive(Deserialize, Debug, Clone)]
pub struct LoginStatusResponse {
    pub code: Option<i64>,
    #[serde(default)]
    pub data: LoginStatusData,
    pub msg: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LoginStatusData {
    pub code: Option<i64>,
    pub profile: Option<Profile>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: Option<i64>,
    #[serde(default)]
    pub nickname: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct QrKeyResponse {
    pub code: Option<i64>,
    pub data: QrKeyData,
}

#[derive(Deserialize, Debug, Clone)]
pub struct QrKeyData {
    pub unikey: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct QrCreateResponse {
    pub code: Option<i64>,
    pub data: QrCreateData,
}

#[derive(Deserialize, Debug, Clone)]
pub struct QrCreateData {
    pub qrurl: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct QrCheckResponse {
    pub code: i64,
    pub message: Option<String>,
    pub cookie: Option<String>,
}

// --- 云盘 (Cloud) API 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserCloudResponse {
    pub code: i64,
    pub data: Option<Vec<CloudSongRecord>>,
    #[serde(default)]
    pub has_more: bool,
    pub count: Option<u64>,
    pub msg: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CloudSongRecord {
    pub song_id: Option<i64>,
    #[serde(default)]
    pub song_name: String,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    /// 上传时间 (毫秒时间戳)
    pub add_time: Option<i64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UploadResponse {
    pub code: i64,
    pub msg: Option<String>,
    pub message: Option<String>,
}

/// 网易云接口的错误信息可能出现在 `msg` 或 `message` 字段中
pub(crate) fn pick_message(msg: &Option<String>, message: &Option<String>) -> String {
    msg.as_deref()
        .or(message.as_deref())
        .unwrap_or("未知错误")
        .to_string()
}
