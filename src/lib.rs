// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod logger;
pub mod models;
pub mod service;
pub mod session;
pub mod symbols;
pub mod sync;
pub mod ui;
pub mod utils;

use crate::{
    cli::Cli,
    client::RobustClient,
    config::AppConfig,
    error::AppResult,
    service::NeteaseClient,
    sync::UploadReport,
};
use log::{debug, info, warn};
use std::sync::{Arc, atomic::AtomicBool};

/// 同步任务的执行上下文
#[derive(Clone)]
pub struct SyncContext {
    pub config: Arc<AppConfig>,
    pub cancellation_token: Arc<AtomicBool>,
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>, cancellation_token: Arc<AtomicBool>) -> AppResult<UploadReport> {
    debug!("CLI 参数: {:?}", args);
    let config = Arc::new(AppConfig::new(&args)?);
    debug!("加载的应用配置: {:?}", config);
    run_with_config(config, cancellation_token).await
}

/// 登录 (必要时扫码) 后执行一次完整同步。
pub async fn run_with_config(
    config: Arc<AppConfig>,
    cancellation_token: Arc<AtomicBool>,
) -> AppResult<UploadReport> {
    info!("使用 API 服务: {}", config.api_base);
    let http_client = Arc::new(RobustClient::new(config.clone())?);
    let netease = NeteaseClient::new(http_client);

    ui::print_header("登录网易云音乐");
    let cookie = session::ensure_session(&netease, &config, &cancellation_token).await?;

    let context = SyncContext {
        config,
        cancellation_token,
    };
    let report = sync::run_sync(&context, &netease, &cookie).await?;
    if !report.did_all_succeed() {
        warn!("{} 个文件上传失败", report.failed.len());
    }
    Ok(report)
}
