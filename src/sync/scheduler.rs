// src/sync/scheduler.rs

use super::UploadReport;
use crate::{
    constants,
    models::{LocalAudioFile, UploadResult, UploadStatus, failure_reason},
    service::CloudStorage,
    symbols, ui, utils,
};
use colored::Colorize;
use indicatif::ProgressBar;
use itertools::Itertools;
use log::{error, info, warn};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// 按歌手升序排列，同一歌手按文件创建时间从早到晚排列。
pub fn schedule(candidates: Vec<LocalAudioFile>) -> Vec<LocalAudioFile> {
    candidates
        .into_iter()
        .sorted_by(|a, b| {
            a.tags
                .artist
                .cmp(&b.tags.artist)
                .then_with(|| a.created.cmp(&b.created))
        })
        .collect()
}

/// 逐个上传候选文件，每个文件最多尝试 `attempts` 次，失败后继续下一个。
pub struct UploadScheduler<'a> {
    storage: &'a dyn CloudStorage,
    cookie: &'a str,
    attempts: u32,
    cancellation_token: Arc<AtomicBool>,
}

impl<'a> UploadScheduler<'a> {
    pub fn new(
        storage: &'a dyn CloudStorage,
        cookie: &'a str,
        attempts: u32,
        cancellation_token: Arc<AtomicBool>,
    ) -> Self {
        Self {
            storage,
            cookie,
            attempts: attempts.max(1),
            cancellation_token,
        }
    }

    /// 返回每个已处理文件的结果。收到中断请求时在当前文件结束后停止。
    pub async fn run(&self, candidates: &[LocalAudioFile], report: &mut UploadReport) -> Vec<UploadResult> {
        let total = candidates.len();
        let mut finished = 0;
        let mut results = Vec::with_capacity(total);
        let pbar = ui::new_tasks_progress_bar(total as u64, "上传");

        for file in candidates {
            if self.cancellation_token.load(Ordering::Relaxed) {
                warn!("收到中断请求，停止上传 (已完成 {}/{})", finished, total);
                report.interrupted = true;
                break;
            }
            pbar.set_message(utils::truncate_text(&file.file_name(), 40));
            let result = self.upload_with_retry(file, &mut finished, total, &pbar).await;
            match result.status {
                UploadStatus::Success => report.record_success(),
                UploadStatus::Failed => report.record_failure(
                    &result.path,
                    result.message.as_deref().unwrap_or("未知原因"),
                ),
            }
            results.push(result);
            pbar.inc(1);
        }
        pbar.finish_and_clear();
        results
    }

    async fn upload_with_retry(
        &self,
        file: &LocalAudioFile,
        finished: &mut usize,
        total: usize,
        pbar: &ProgressBar,
    ) -> UploadResult {
        let display_path =
            utils::truncate_text(&file.path.to_string_lossy(), constants::PATH_TRUNCATE_LENGTH);
        let mut last_reason = None;

        for attempt in 1..=self.attempts {
            match self.storage.upload(file, self.cookie).await {
                Ok(()) => {
                    *finished += 1;
                    info!("[{}/{}] 上传成功: {}", finished, total, file.path.display());
                    let (symbol, _, _) = UploadStatus::Success.get_display_info();
                    pbar.suspend(|| println!("{} [{}/{}] {}", symbol, finished, total, display_path));
                    return UploadResult {
                        path: file.path.clone(),
                        status: UploadStatus::Success,
                        attempts: attempt,
                        message: None,
                    };
                }
                Err(e) => {
                    error!(
                        "[{}/{}] 上传失败 (第 {}/{} 次): {}: {}",
                        finished,
                        total,
                        attempt,
                        self.attempts,
                        file.path.display(),
                        e
                    );
                    pbar.suspend(|| {
                        eprintln!(
                            "{} [{}/{}] {} {}",
                            *symbols::WARN,
                            finished,
                            total,
                            display_path,
                            format!("上传失败 (第 {}/{} 次): {}", attempt, self.attempts, e).yellow()
                        )
                    });
                    last_reason = Some(failure_reason(&e));
                }
            }
        }

        let (symbol, color_fn, default_msg) = UploadStatus::Failed.get_display_info();
        pbar.suspend(|| {
            eprintln!(
                "{} [{}/{}] {} {}",
                symbol,
                finished,
                total,
                display_path,
                color_fn(format!("{}，已重试 {} 次", default_msg, self.attempts).into())
            )
        });
        UploadResult {
            path: file.path.clone(),
            status: UploadStatus::Failed,
            attempts: self.attempts,
            message: last_reason.map(String::from),
        }
    }
}
