// src/client.rs

use crate::{config::AppConfig, error::*, utils};
use log::{debug, trace};
use reqwest::{StatusCode, multipart::Form};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
    /// multipart 请求体无法克隆，上传绕过重试中间件，由上传调度器负责重试
    upload_client: reqwest::Client,
    config: Arc<AppConfig>,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let base = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;
        let upload_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.upload_timeout)
            .build()?;
        let client = ClientBuilder::new(base)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            upload_client,
            config,
        })
    }

    /// 拼接接口地址与查询参数，并附加时间戳防止网关缓存。
    pub fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> AppResult<Url> {
        let mut url = Url::parse(&format!("{}{}", self.config.api_base, path))?;
        let timestamp = chrono::Utc::now().timestamp_millis().to_string();
        url.query_pairs_mut()
            .extend_pairs(params.iter().copied())
            .append_pair("timestamp", &timestamp);
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = self.endpoint(path, params)?;
        debug!("GET {}", path);
        let res = self.client.get(url).send().await?;
        let status = res.status();
        let body = res.text().await?;
        decode_response(path, status, &body)
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        form: Form,
    ) -> AppResult<T> {
        let url = self.endpoint(path, params)?;
        debug!("POST (multipart) {}", path);
        let res = self.upload_client.post(url).multipart(form).send().await?;
        let status = res.status();
        let body = res.text().await?;
        decode_response(path, status, &body)
    }
}

/// 网关对业务错误也可能返回非 2xx 状态码，此时响应体中仍带有 `code`，
/// 因此先尝试解析响应体，解析失败时再按 HTTP 状态报错。
fn decode_response<T: DeserializeOwned>(path: &str, status: StatusCode, body: &str) -> AppResult<T> {
    trace!("{} 响应 ({}): {}", path, status, utils::truncate_text(body, 200));
    if status == StatusCode::UNAUTHORIZED {
        return Err(AppError::SessionInvalid);
    }
    match serde_json::from_str(body) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(AppError::Api {
            code: i64::from(status.as_u16()),
            message: utils::truncate_text(body.trim(), 120),
        }),
        Err(source) => Err(AppError::ApiParseFailed {
            url: path.to_string(),
            source,
        }),
    }
}
