// src/cli.rs

use crate::constants;
use clap::{Parser, ValueEnum, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true,
)]
pub struct Cli {
    // --- 路径 (Paths) ---
    /// 保存登录 Cookie 的文件
    #[arg(short, long, value_name = "FILE", default_value_os_t = PathBuf::from(constants::DEFAULT_COOKIE_PATH), help_heading = "Paths")]
    pub cookie: PathBuf,
    /// 本地音乐目录 (递归扫描)
    #[arg(short = 'd', long, value_name = "DIR", default_value_os_t = PathBuf::from(constants::DEFAULT_MUSIC_DIR), help_heading = "Paths")]
    pub music_dir: PathBuf,

    // --- 同步选项 (Options) ---
    /// 网易云音乐 API 服务地址，覆盖配置文件中的 api_base
    #[arg(long, value_name = "URL", help_heading = "Options")]
    pub api: Option<String>,
    /// 仅按 "专辑:歌手:歌名" 精确匹配，不使用文件名和歌名的兜底匹配
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub exact_match: bool,
    /// 任一文件标签读取失败时立即中止 (默认跳过该文件)
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub strict_tags: bool,
    /// 只列出待上传的文件，不实际上传
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub dry_run: bool,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
