use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use reqwest::{Client, StatusCode};

use crate::app::Result;
use crate::config::FetchConfig;
use crate::domain::Validators;
use crate::fetcher::{FetchResult, Fetcher};

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    fn conditional_headers(validators: &Validators) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(etag) = validators.etag.as_deref() {
            if let Ok(value) = HeaderValue::from_str(etag) {
                headers.insert(IF_NONE_MATCH, value);
            }
        }

        if let Some(last_modified) = validators.last_modified.as_deref() {
            if let Ok(value) = HeaderValue::from_str(last_modified) {
                headers.insert(IF_MODIFIED_SINCE, value);
            }
        }

        headers
    }

    fn header_string(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }

    async fn try_fetch(&self, url: &str, validators: &Validators) -> Result<FetchResult> {
        let response = self
            .client
            .get(url)
            .headers(Self::conditional_headers(validators))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_MODIFIED {
            return Ok(FetchResult::NotModified);
        }

        if !response.status().is_success() {
            return Ok(FetchResult::Failed(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let validators = Validators {
            etag: Self::header_string(response.headers(), ETAG),
            last_modified: Self::header_string(response.headers(), LAST_MODIFIED),
        };

        let body = response.bytes().await?.to_vec();

        Ok(FetchResult::Modified { body, validators })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, validators: &Validators) -> FetchResult {
        match self.try_fetch(url, validators).await {
            Ok(result) => result,
            Err(e) => FetchResult::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response and hand back the raw request text.
    async fn serve_once(response: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/feed.xml", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_lowercase()
        });

        (url, handle)
    }

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&FetchConfig {
            timeout_secs: 5,
            ..FetchConfig::default()
        })
        .unwrap()
    }

    fn stored_validators() -> Validators {
        Validators {
            etag: Some("\"v1\"".into()),
            last_modified: Some("Mon, 01 Jan 2024 00:00:00 GMT".into()),
        }
    }

    #[test]
    fn test_conditional_headers_from_validators() {
        let validators = Validators {
            etag: Some("\"v1\"".into()),
            last_modified: Some("Mon, 01 Jan 2024 00:00:00 GMT".into()),
        };
        let headers = HttpFetcher::conditional_headers(&validators);
        assert_eq!(headers.get(IF_NONE_MATCH).unwrap(), "\"v1\"");
        assert_eq!(
            headers.get(IF_MODIFIED_SINCE).unwrap(),
            "Mon, 01 Jan 2024 00:00:00 GMT"
        );
    }

    #[test]
    fn test_no_validators_no_headers() {
        let headers = HttpFetcher::conditional_headers(&Validators::default());
        assert!(headers.is_empty());
    }

    #[test]
    fn test_invalid_header_value_is_dropped() {
        let validators = Validators {
            etag: Some("bad\nvalue".into()),
            last_modified: None,
        };
        assert!(HttpFetcher::conditional_headers(&validators).is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_failure_not_error() {
        let fetcher = HttpFetcher::new(&FetchConfig {
            timeout_secs: 1,
            ..FetchConfig::default()
        })
        .unwrap();
        let result = fetcher
            .fetch("http://127.0.0.1:9/feed.xml", &Validators::default())
            .await;
        assert!(matches!(result, FetchResult::Failed(_)));
    }

    #[tokio::test]
    async fn test_304_is_not_modified_and_sends_validators() {
        let (url, server) =
            serve_once("HTTP/1.1 304 Not Modified\r\nContent-Length: 0\r\n\r\n").await;

        let result = fetcher().fetch(&url, &stored_validators()).await;
        assert!(matches!(result, FetchResult::NotModified));

        let request = server.await.unwrap();
        assert!(request.contains("if-none-match: \"v1\""));
        assert!(request.contains("if-modified-since: mon, 01 jan 2024 00:00:00 gmt"));
    }

    #[tokio::test]
    async fn test_error_status_is_failure() {
        let (url, server) = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\r\n",
        )
        .await;

        let result = fetcher().fetch(&url, &stored_validators()).await;
        match result {
            FetchResult::Failed(reason) => assert!(reason.contains("500")),
            other => panic!("expected failure, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_200_returns_body_and_new_validators() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK\r\n\
             ETag: \"v2\"\r\n\
             Last-Modified: Tue, 02 Jan 2024 00:00:00 GMT\r\n\
             Content-Length: 6\r\n\r\n\
             <rss/>",
        )
        .await;

        let result = fetcher().fetch(&url, &Validators::default()).await;
        let (body, validators) = match result {
            FetchResult::Modified { body, validators } => (body, validators),
            other => panic!("expected modified, got {:?}", other),
        };
        assert_eq!(body, b"<rss/>");
        assert_eq!(validators.etag.as_deref(), Some("\"v2\""));
        assert_eq!(
            validators.last_modified.as_deref(),
            Some("Tue, 02 Jan 2024 00:00:00 GMT")
        );

        let request = server.await.unwrap();
        assert!(!request.contains("if-none-match"));
        assert!(!request.contains("if-modified-since"));
    }

    #[tokio::test]
    async fn test_200_without_validators_clears_them() {
        let (url, server) =
            serve_once("HTTP/1.1 200 OK\r\nContent-Length: 6\r\n\r\n<rss/>").await;

        let result = fetcher().fetch(&url, &stored_validators()).await;
        let validators = match result {
            FetchResult::Modified { validators, .. } => validators,
            other => panic!("expected modified, got {:?}", other),
        };
        assert_eq!(validators, Validators::default());
        server.await.unwrap();
    }
}
