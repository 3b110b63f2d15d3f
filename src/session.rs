// src/session.rs

use crate::{
    config::{AppConfig, cookie},
    error::*,
    models::QrCheck,
    service::SessionService,
    symbols, ui,
};
use colored::Colorize;
use log::{debug, info, warn};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

/// 获取可用的登录 Cookie: 优先使用已保存的 Cookie，失效时进行扫码登录并保存新 Cookie。
pub async fn ensure_session(
    service: &dyn SessionService,
    config: &AppConfig,
    cancellation_token: &Arc<AtomicBool>,
) -> AppResult<String> {
    let (cookie_opt, source) = cookie::resolve_cookie(&config.cookie_path);
    if let Some(saved) = cookie_opt {
        info!("从 {} 加载 Cookie", source);
        match service.login_status(&saved).await {
            Ok(status) => {
                if let Some(nickname) = &status.profile {
                    info!("保存的 Cookie 有效，用户: {}", nickname);
                    println!("{} 已登录: {} (来自{})", *symbols::OK, nickname.green(), source);
                    return Ok(saved);
                }
                warn!("来自 {} 的 Cookie 未关联任何账号", source);
            }
            Err(AppError::SessionInvalid) => {
                warn!("来自 {} 的 Cookie 被服务端拒绝", source);
            }
            Err(e) => return Err(e),
        }
        ui::warn("保存的 Cookie 已失效，请重新扫码登录。");
    } else {
        info!("未找到本地 Cookie");
        ui::info("未找到本地 Cookie，请扫码登录。");
    }

    let fresh = qr_login(service, config.poll_interval, cancellation_token).await?;
    println!("{} 登录成功！", *symbols::OK);
    cookie::save_cookie(&config.cookie_path, &fresh)?;
    Ok(fresh)
}

/// 申请二维码、在终端显示，并等待用户扫码确认。
pub async fn qr_login(
    service: &dyn SessionService,
    poll_interval: Duration,
    cancellation_token: &Arc<AtomicBool>,
) -> AppResult<String> {
    let key = service.qr_key().await?;
    debug!("获取到二维码 key: {}", key);
    let url = service.qr_create(&key).await?;
    ui::print_qr_code(&url);
    poll_until_confirmed(service, &key, poll_interval, cancellation_token).await
}

/// 以固定间隔轮询扫码状态，直到确认登录 (返回 Cookie) 或二维码失效 (返回错误)。
/// 轮询本身没有超时。
pub async fn poll_until_confirmed(
    service: &dyn SessionService,
    key: &str,
    poll_interval: Duration,
    cancellation_token: &Arc<AtomicBool>,
) -> AppResult<String> {
    let mut last_state = None;
    loop {
        tokio::time::sleep(poll_interval).await;
        if cancellation_token.load(Ordering::Relaxed) {
            return Err(AppError::UserInterrupt);
        }
        let state = service.qr_check(key).await?;
        match state {
            QrCheck::Confirmed(cookie) => {
                info!("扫码登录成功");
                return Ok(cookie);
            }
            QrCheck::Expired(message) => {
                warn!("二维码已失效: {}", message);
                return Err(AppError::LoginRejected(if message.is_empty() {
                    "二维码已过期".to_string()
                } else {
                    message
                }));
            }
            QrCheck::WaitingScan | QrCheck::WaitingConfirm => {
                if last_state.as_ref() != Some(&state) {
                    match state {
                        QrCheck::WaitingScan => ui::info("等待扫码..."),
                        _ => ui::info("已扫码，请在手机上确认登录..."),
                    }
                }
                last_state = Some(state);
            }
        }
    }
}
