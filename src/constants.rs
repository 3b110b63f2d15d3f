// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const PATH_TRUNCATE_LENGTH: usize = 70;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_COOKIE_PATH: &str = "./cookie.txt";
pub const DEFAULT_MUSIC_DIR: &str = "~/Music/";
pub const DEFAULT_API_BASE: &str = "http://localhost:3000";
pub const COOKIE_ENV_VAR: &str = "NCM_COOKIE";
pub const USER_AGENT: &str = concat!(clap::crate_name!(), "/", clap::crate_version!());

/// 云盘中缺失专辑信息的歌曲统一使用的专辑名
pub const UNKNOWN_ALBUM: &str = "未知专辑";

pub const DEFAULT_PAGE_SIZE: u32 = 200;
pub const DEFAULT_UPLOAD_ATTEMPTS: u32 = 3;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "ape", "wav", "m4a", "ogg"];

pub mod api {
    pub mod paths {
        pub const LOGIN_STATUS: &str = "/login/status";
        pub const QR_KEY: &str = "/login/qr/key";
        pub const QR_CREATE: &str = "/login/qr/create";
        pub const QR_CHECK: &str = "/login/qr/check";
        pub const USER_CLOUD: &str = "/user/cloud";
        pub const CLOUD_UPLOAD: &str = "/cloud";
    }
    pub mod codes {
        pub const OK: i64 = 200;
        /// 未登录或 Cookie 已失效
        pub const NEED_LOGIN: i64 = 301;
        pub const QR_EXPIRED: i64 = 800;
        pub const QR_WAITING_SCAN: i64 = 801;
        pub const QR_WAITING_CONFIRM: i64 = 802;
        pub const QR_CONFIRMED: i64 = 803;
    }
    /// 上传接口的 multipart 字段名
    pub const UPLOAD_FIELD: &str = "songFile";
}
