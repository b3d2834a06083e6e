//! HTTP fetching.
//!
//! A request is made once unless the caller asks for retries: failures
//! go straight back so the user decides when to try again. With retries,
//! connection failures, timeouts, HTTP 429, and HTTP 5xx are retried with
//! exponential backoff. Other 4xx responses always fail immediately.

use std::time::Duration;

use crate::SourceError;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the shared HTTP client.
///
/// # Errors
///
/// * If the TLS backend cannot be initialized
pub fn client() -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("feedback_map/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Fetches `url` and returns the body as text, retrying transient
/// failures up to `retries` times after the first attempt.
///
/// # Errors
///
/// * [`SourceError::Http`] if the request fails
/// * [`SourceError::Status`] for a non-success response
#[allow(clippy::future_not_send)]
pub async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    retries: u32,
) -> Result<String, SourceError> {
    let response = send(client, url, retries).await?;
    Ok(response.text().await?)
}

#[allow(clippy::future_not_send)]
async fn send(
    client: &reqwest::Client,
    url: &str,
    max_retries: u32,
) -> Result<reqwest::Response, SourceError> {
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = Duration::from_secs(1u64 << attempt.min(6)); // 2s, 4s, 8s, ...
            log::warn!("  retry {attempt}/{max_retries} for {url} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }
        let retries_left = attempt < max_retries;
        attempt += 1;

        let response = match client.get(url).send().await {
            Ok(response) => response,
            Err(e) if is_transient(&e) && retries_left => {
                log::warn!("  transient error: {e}");
                continue;
            }
            Err(e) => return Err(SourceError::Http(e)),
        };

        let status = response.status();
        let retryable =
            status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error();

        if retryable && retries_left {
            log::warn!("  HTTP {status} from {url}");
            continue;
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        return Ok(response);
    }
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::TcpListener;

    use super::*;

    /// Serves `status` with `body` to every connection, counting requests.
    async fn serve(status: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}/counties.geojson"), hits)
    }

    #[tokio::test]
    async fn server_error_is_returned_after_one_request() {
        let (url, hits) = serve("503 Service Unavailable", "").await;

        let result = fetch_text(&client().unwrap(), &url, 0).await;

        assert!(matches!(
            result,
            Err(SourceError::Status { status: 503, .. })
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn client_error_is_never_retried() {
        let (url, hits) = serve("404 Not Found", "").await;

        let result = fetch_text(&client().unwrap(), &url, 3).await;

        assert!(matches!(
            result,
            Err(SourceError::Status { status: 404, .. })
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn success_returns_body() {
        let (url, hits) = serve("200 OK", "{}").await;

        assert_eq!(fetch_text(&client().unwrap(), &url, 0).await.unwrap(), "{}");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
