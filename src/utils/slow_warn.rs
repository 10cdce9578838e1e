use crate::prelude::*;

use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Awaits an outbound call, warning once it outlives `threshold` and again when it finishes.
///
/// A zero threshold turns the warning off.
pub async fn warn_if_slow<F, T>(
    method: &reqwest::Method,
    url: &reqwest::Url,
    threshold: Duration,
    future: F,
) -> T
where
    F: Future<Output = T>,
{
    if threshold.is_zero() || !log::log_enabled!(log::Level::Warn) {
        return future.await;
    }

    let started = Instant::now();
    tokio::pin!(future);

    tokio::select! {
        biased;
        result = &mut future => result,
        _ = sleep(threshold) => {
            let target = describe(method, url);
            warn!("{target} still pending after {:.1}s", threshold.as_secs_f32());
            let result = future.await;
            warn!("{target} finished after {:.1}s", started.elapsed().as_secs_f32());
            result
        }
    }
}

/// Method and path only; query strings carry page cursors.
fn describe(method: &reqwest::Method, url: &reqwest::Url) -> String {
    format!("LarkBase {method} {}", url.path())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records_url() -> reqwest::Url {
        reqwest::Url::parse(
            "https://open.feishu.cn/open-apis/bitable/v1/apps/app/tables/tbl/records?page_token=p1",
        )
        .unwrap()
    }

    #[test]
    fn test_describe_omits_query() {
        assert_eq!(
            describe(&reqwest::Method::GET, &records_url()),
            "LarkBase GET /open-apis/bitable/v1/apps/app/tables/tbl/records"
        );
    }

    #[tokio::test]
    async fn test_fast_future_passes_through() {
        let value = warn_if_slow(
            &reqwest::Method::POST,
            &records_url(),
            Duration::from_secs(5),
            async { 42 },
        )
        .await;
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_slow_future_still_completes() {
        let value = warn_if_slow(
            &reqwest::Method::GET,
            &records_url(),
            Duration::from_millis(1),
            async {
                sleep(Duration::from_millis(20)).await;
                "done"
            },
        )
        .await;
        assert_eq!(value, "done");
    }

    #[tokio::test]
    async fn test_zero_threshold_disables_warning() {
        let value = warn_if_slow(
            &reqwest::Method::DELETE,
            &records_url(),
            Duration::ZERO,
            async {
                sleep(Duration::from_millis(5)).await;
                7
            },
        )
        .await;
        assert_eq!(value, 7);
    }
}
