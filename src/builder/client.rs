//! UserOp Builder Client

use serde::Serialize;

use super::endpoints;
use crate::config::ClientConfig;
use crate::error::{SdkError, SdkResult};
use crate::poller::{CancelSignal, PollConfig, ReceiptPoller};
use crate::types::{BuildUserOpRequest, BuildUserOpResponse, GetUserOpReceiptRequest, UserOpReceipt};
use crate::{log_debug, log_error, log_info};

const LOG_MODULE: &str = "builder";

/// Longest response excerpt carried in error details
const MAX_ERROR_BODY: usize = 512;

/// Client for the UserOp Builder API
#[derive(Debug, Clone)]
pub struct UserOpBuilderClient {
    project_id: String,
    base_url: String,
    poll: PollConfig,
    http: reqwest::Client,
}

impl UserOpBuilderClient {
    /// Create a client with its own connection pool
    pub fn new(config: &ClientConfig) -> SdkResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("userop-sdk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SdkError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Self::with_http_client(config, http)
    }

    /// Create a client over an existing `reqwest::Client`
    pub fn with_http_client(config: &ClientConfig, http: reqwest::Client) -> SdkResult<Self> {
        config.validate()?;

        Ok(Self {
            project_id: config.project_id.trim().to_string(),
            base_url: config.base_url_trimmed().to_string(),
            poll: config.poll,
            http,
        })
    }

    pub fn poll_config(&self) -> PollConfig {
        self.poll
    }

    /// `{base}/{project}/{chain}/{path}`
    pub fn endpoint(&self, chain_id: u64, path: &str) -> String {
        format!("{}/{}/{}/{}", self.base_url, self.project_id, chain_id, path)
    }

    /// Warm up the service-side Kernel client for `chain_id`
    pub async fn initialise_kernel_client(&self, chain_id: u64) -> SdkResult<()> {
        let url = self.endpoint(chain_id, endpoints::INIT_KERNEL_CLIENT);
        self.post::<()>(&url, None).await?;
        log_info!(LOG_MODULE, "Kernel client initialised", chain_id = chain_id);
        Ok(())
    }

    /// Build an unsigned user operation
    pub async fn build_user_op(
        &self,
        chain_id: u64,
        request: &BuildUserOpRequest,
    ) -> SdkResult<BuildUserOpResponse> {
        let url = self.endpoint(chain_id, endpoints::BUILD_USEROP);
        let body = self.post(&url, Some(request)).await?;

        let response: BuildUserOpResponse = serde_json::from_str(&body)
            .map_err(|e| SdkError::parse_error(format!("Failed to decode build response: {}", e)))?;

        log_debug!(LOG_MODULE, "User operation built", user_op_hash = response.user_op_hash);
        Ok(response)
    }

    /// Fetch a receipt once.
    ///
    /// Fails with `ReceiptPending` while the operation is not yet included.
    pub async fn get_user_op_receipt(
        &self,
        chain_id: u64,
        request: &GetUserOpReceiptRequest,
    ) -> SdkResult<UserOpReceipt> {
        let url = self.endpoint(chain_id, endpoints::GET_USEROP_RECEIPT);
        let body = self.post(&url, Some(request)).await?;
        parse_receipt_body(&body)
    }

    /// Poll for a receipt until it is available, `config.timeout` passes,
    /// or `cancel` fires. Any failed query counts as "not yet".
    pub async fn wait_for_user_op_receipt(
        &self,
        chain_id: u64,
        request: &GetUserOpReceiptRequest,
        config: PollConfig,
        cancel: CancelSignal,
    ) -> SdkResult<UserOpReceipt> {
        log_info!(
            LOG_MODULE,
            "Waiting for receipt",
            user_op_hash = request.user_op_hash,
            chain_id = chain_id
        );

        ReceiptPoller::new(config)
            .run(move || self.get_user_op_receipt(chain_id, request), cancel)
            .await
            .into_result()
            .map_err(|e| {
                let err = SdkError::from(e);
                SdkError::new(
                    err.code,
                    format!("No receipt for user operation {}: {}", request.user_op_hash, err.message),
                )
                .with_details(err.details.unwrap_or_default())
            })
    }

    /// POST JSON and return the body of a 200 response
    async fn post<B: Serialize>(&self, url: &str, body: Option<&B>) -> SdkResult<String> {
        log_debug!(LOG_MODULE, "POST", url = url);

        let mut request = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status != reqwest::StatusCode::OK {
            log_error!(LOG_MODULE, "Request failed", status = status.as_u16(), url = url);
            return Err(SdkError::network(format!("Unexpected status code {}", status.as_u16()))
                .with_details(truncate(&text, MAX_ERROR_BODY)));
        }

        Ok(text)
    }
}

/// Interpret a `get-userop-receipt` response body.
///
/// A JSON object with an `error` member, or a bare `null`, means the
/// receipt is not available yet.
pub fn parse_receipt_body(body: &str) -> SdkResult<UserOpReceipt> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| SdkError::parse_error(format!("Failed to decode response: {}", e)))?;

    if value.is_null() {
        return Err(SdkError::receipt_pending("Receipt not found yet"));
    }
    if let Some(error) = value.get("error") {
        return Err(SdkError::receipt_pending("Receipt not found yet").with_details(error.to_string()));
    }

    serde_json::from_value(value)
        .map_err(|e| SdkError::parse_error(format!("Failed to decode receipt: {}", e)))
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
