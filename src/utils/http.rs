use std::time::Duration;

use crate::error::{Error, Result};
use crate::utils::retryable::{self, RetryOptions};
use crate::utils::slow_warn::warn_if_slow;

/// Sends the request built by `req_builder`, retrying transient failures.
///
/// Non-2xx responses become `Error::Status` carrying the response body.
pub async fn request(
    client: &reqwest::Client,
    options: &RetryOptions,
    slow_threshold: Duration,
    req_builder: impl Fn(&reqwest::Client) -> reqwest::RequestBuilder,
) -> Result<reqwest::Response> {
    let resp = retryable::run(
        || async {
            let request = req_builder(client).build()?;
            let method = request.method().clone();
            let url = request.url().clone();
            let resp = warn_if_slow(&method, &url, slow_threshold, client.execute(request)).await?;
            let status = resp.status();
            if status.is_success() {
                return Ok(resp);
            }

            let body = resp.text().await?;
            Err(retryable::Error {
                error: Error::Status {
                    status: status.as_u16(),
                    body,
                },
                is_retryable: status.is_server_error(),
            })
        },
        options,
    )
    .await?;
    Ok(resp)
}
