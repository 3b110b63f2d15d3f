// src/config.rs

pub mod cookie;

use crate::{cli::Cli, constants, error::AppResult, utils};
use anyhow::{Context, anyhow};
use log::info;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub upload_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncConfig {
    pub page_size: Option<u32>,
    pub upload_attempts: Option<u32>,
    pub poll_interval_ms: Option<u64>,
    pub extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    pub api_base: String,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        let network = NetworkConfig {
            connect_timeout_secs: Some(10),
            timeout_secs: Some(30),
            // 大文件 (flac/ape) 上传耗时较长
            upload_timeout_secs: Some(600),
            max_retries: Some(3),
        };
        let sync = SyncConfig {
            page_size: Some(constants::DEFAULT_PAGE_SIZE),
            upload_attempts: Some(constants::DEFAULT_UPLOAD_ATTEMPTS),
            poll_interval_ms: Some(constants::DEFAULT_POLL_INTERVAL_MS),
            extensions: Some(
                constants::DEFAULT_AUDIO_EXTENSIONS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
        };
        Self {
            api_base: constants::DEFAULT_API_BASE.into(),
            network,
            sync,
        }
    }
}

fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| anyhow!("无法获取用户主目录"))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub(crate) fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    if config_path.is_file() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("读取配置文件 '{}' 失败", config_path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 '{}' 失败", config_path.display()))?;
        Ok(config)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(&config_path, json_content)?;

        Ok(config)
    }
}

/// 标签匹配策略: 除 "专辑:歌手:歌名" 外，是否还使用文件名和歌名兜底
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    pub filename_fallback: bool,
    pub title_fallback: bool,
}

impl MatchPolicy {
    pub fn exact() -> Self {
        Self {
            filename_fallback: false,
            title_fallback: false,
        }
    }
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            filename_fallback: true,
            title_fallback: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: String,
    pub cookie_path: PathBuf,
    pub music_dir: PathBuf,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub upload_timeout: Duration,
    pub max_retries: u32,
    pub page_size: u32,
    pub upload_attempts: u32,
    pub poll_interval: Duration,
    pub extensions: Vec<String>,
    pub match_policy: MatchPolicy,
    pub strict_tags: bool,
    pub dry_run: bool,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;
        Ok(Self::from_parts(args, external_config))
    }

    pub(crate) fn from_parts(args: &Cli, external: ExternalConfig) -> Self {
        let defaults = ExternalConfig::default_app_config();
        let api_base = args
            .api
            .clone()
            .unwrap_or(external.api_base)
            .trim_end_matches('/')
            .to_string();
        let extensions = external
            .sync
            .extensions
            .filter(|exts| !exts.is_empty())
            .or(defaults.sync.extensions)
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();

        Self {
            api_base,
            cookie_path: args.cookie.clone(),
            music_dir: utils::expand_home_dir(&args.music_dir),
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(external.network.connect_timeout_secs.unwrap_or(10)),
            timeout: Duration::from_secs(external.network.timeout_secs.unwrap_or(30)),
            upload_timeout: Duration::from_secs(external.network.upload_timeout_secs.unwrap_or(600)),
            max_retries: external.network.max_retries.unwrap_or(3),
            page_size: external
                .sync
                .page_size
                .filter(|&n| n > 0)
                .unwrap_or(constants::DEFAULT_PAGE_SIZE),
            upload_attempts: external
                .sync
                .upload_attempts
                .filter(|&n| n > 0)
                .unwrap_or(constants::DEFAULT_UPLOAD_ATTEMPTS),
            poll_interval: Duration::from_millis(
                external
                    .sync
                    .poll_interval_ms
                    .unwrap_or(constants::DEFAULT_POLL_INTERVAL_MS),
            ),
            extensions,
            match_policy: if args.exact_match {
                MatchPolicy::exact()
            } else {
                MatchPolicy::default()
            },
            strict_tags: args.strict_tags,
            dry_run: args.dry_run,
        }
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: constants::DEFAULT_API_BASE.to_string(),
            cookie_path: PathBuf::from(constants::DEFAULT_COOKIE_PATH),
            music_dir: PathBuf::from("."),
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            upload_timeout: Duration::from_secs(15),
            max_retries: 0,
            page_size: constants::DEFAULT_PAGE_SIZE,
            upload_attempts: constants::DEFAULT_UPLOAD_ATTEMPTS,
            poll_interval: Duration::from_millis(10),
            extensions: constants::DEFAULT_AUDIO_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            match_policy: MatchPolicy::default(),
            strict_tags: false,
            dry_run: false,
        }
    }
}
