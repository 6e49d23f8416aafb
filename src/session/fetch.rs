//! Network capability used to inline template backgrounds.

use async_trait::async_trait;

use crate::assets::media::image_data_url;
use crate::foundation::error::{FlyerError, FlyerResult};

/// Raw response of an image GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    /// `Content-Type` as declared by the server.
    pub content_type: Option<String>,
}

/// Arbitrary HTTP GET returning binary content. No timeout and no retry.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FlyerResult<FetchedImage>;
}

/// Fetch `url` and convert the body into an inline `data:` URL.
pub async fn fetch_data_url(fetcher: &dyn ImageFetcher, url: &str) -> FlyerResult<String> {
    let image = fetcher.fetch(url).await?;
    image_data_url(&image.bytes, image.content_type.as_deref())
}

/// Fetcher for sessions without network access: every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

#[async_trait]
impl ImageFetcher for OfflineFetcher {
    async fn fetch(&self, url: &str) -> FlyerResult<FetchedImage> {
        Err(FlyerError::fetch(format!("network access disabled: {url}")))
    }
}

#[cfg(feature = "http")]
pub use http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use super::*;
    use reqwest::header::CONTENT_TYPE;

    const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    /// `reqwest`-backed fetcher. Redirects are followed.
    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        client: reqwest::Client,
    }

    impl HttpFetcher {
        pub fn new() -> FlyerResult<Self> {
            let client = reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .map_err(|e| FlyerError::fetch(format!("failed to build http client: {e}")))?;
            Ok(Self { client })
        }
    }

    #[async_trait]
    impl ImageFetcher for HttpFetcher {
        #[tracing::instrument(level = "debug", skip(self))]
        async fn fetch(&self, url: &str) -> FlyerResult<FetchedImage> {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| FlyerError::fetch(format!("GET {url}: {e}")))?;
            let status = response.status();
            if !status.is_success() {
                return Err(FlyerError::fetch(format!("GET {url}: status {status}")));
            }
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|h| h.to_str().ok())
                .map(str::to_string);
            let bytes = response
                .bytes()
                .await
                .map_err(|e| FlyerError::fetch(format!("GET {url}: reading body: {e}")))?;
            Ok(FetchedImage {
                bytes: bytes.to_vec(),
                content_type,
            })
        }
    }
}
