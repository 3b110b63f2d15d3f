// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use log::{error, info, warn};
use ncm_cloud_sync::{cli::Cli, error::AppError, logger, run_from_cli, symbols};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let after_help = format!(
        "示例:\n  # 同步默认音乐目录 (~/Music/)\n  {bin}\n\n  # 指定音乐目录和 Cookie 文件\n  {bin} -d /data/music -c ~/.ncm_cookie\n\n  # 只查看将要上传的文件\n  {bin} --dry-run\n\n  # 使用自建的 API 服务\n  {bin} --api http://192.168.1.10:3000\n\n也可以通过环境变量 NCM_COOKIE 提供 Cookie。",
        bin = clap::crate_name!()
    );
    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };
    logger::init_logger(args.log_level);

    let cancellation_token = Arc::new(AtomicBool::new(false));
    let handler_token = cancellation_token.clone();

    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("无法监听 Ctrl-C 信号: {}", e);
                return;
            }
            if handler_token.load(Ordering::Relaxed) {
                println!("\n第二次中断，强制退出...");
                warn!("用户第二次按下 Ctrl+C，强制退出。");
                std::process::exit(130);
            }
            println!(
                "\n{} 正在停止... 请等待当前文件完成。再按一次 {} 可强制退出。",
                *symbols::WARN,
                *symbols::CTRL_C
            );
            warn!("用户通过 Ctrl+C 请求中断程序。");
            handler_token.store(true, Ordering::Relaxed);
        }
    });

    match run_from_cli(args, cancellation_token).await {
        Ok(_) => info!("程序正常退出。"),
        Err(AppError::UserInterrupt) => {
            warn!("程序被用户中断。");
            std::process::exit(130);
        }
        Err(e) => {
            error!("程序执行出错: {}", e);
            eprintln!("\n{} {}", *symbols::ERROR, format!("程序执行出错: {}", e).red());
            if matches!(e, AppError::SessionInvalid) {
                eprintln!("{} 登录状态在同步过程中失效，请重新运行以扫码登录。", *symbols::INFO);
            }
            std::process::exit(1);
        }
    }
}
