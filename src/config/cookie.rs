// src/config/cookie.rs

use crate::{constants, error::AppResult, symbols};
use anyhow::Context;
use log::{debug, info, warn};
use std::{fs, path::Path};

pub fn save_cookie(path: &Path, cookie: &str) -> AppResult<()> {
    if cookie.is_empty() {
        return Ok(());
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, cookie)
        .with_context(|| format!("保存 Cookie 到 '{}' 失败", path.display()))?;

    info!("登录 Cookie 已保存至: {}", path.display());
    println!("{} Cookie 已保存至: {}", *symbols::INFO, path.display());
    Ok(())
}

pub fn load_cookie_from_file(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content.trim().to_string()).filter(|c| !c.is_empty()),
        Err(e) => {
            if path.exists() {
                warn!("读取 Cookie 文件 '{}' 失败: {}", path.display(), e);
            }
            None
        }
    }
}

/// 依次从环境变量和 Cookie 文件中查找登录 Cookie，返回 Cookie 及其来源描述。
pub fn resolve_cookie(path: &Path) -> (Option<String>, String) {
    if let Ok(cookie) = std::env::var(constants::COOKIE_ENV_VAR)
        && !cookie.trim().is_empty()
    {
        debug!("使用来自环境变量 {} 的 Cookie", constants::COOKIE_ENV_VAR);
        return (
            Some(cookie.trim().to_string()),
            format!("环境变量 ({})", constants::COOKIE_ENV_VAR),
        );
    }
    if let Some(cookie) = load_cookie_from_file(path) {
        debug!("使用来自文件 '{}' 的 Cookie", path.display());
        return (Some(cookie), format!("Cookie 文件 '{}'", path.display()));
    }
    debug!("未在任何位置找到可用的 Cookie");
    (None, "未找到".to_string())
}
