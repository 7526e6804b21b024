//! Pexels stock photo search.

use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use slidegen_core::{Error, ImageSource, Result, SlideImage};
use std::time::Duration;

const DEFAULT_SEARCH_URL: &str = "https://api.pexels.com/v1/search";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Image source backed by the Pexels search API.
///
/// Takes the first hit of each search at its medium size.
pub struct PexelsClient {
    http: HttpClient,
    api_key: String,
    search_url: String,
}

impl PexelsClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
        })
    }

    /// Point the client at a different search endpoint.
    pub fn with_search_url(mut self, search_url: impl Into<String>) -> Self {
        self.search_url = search_url.into();
        self
    }

    fn try_find_image(&self, query: &str) -> Result<Option<SlideImage>> {
        let response = self
            .http
            .get(&self.search_url)
            .query(&[("query", query), ("per_page", "1")])
            .header("Authorization", self.api_key.as_str())
            .send()
            .map_err(|e| Error::Http(format!("image search failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "image search returned {}",
                response.status()
            )));
        }

        let results: SearchResponse = response
            .json()
            .map_err(|e| Error::Parse(format!("unreadable search response: {e}")))?;

        let Some(url) = results.first_medium_url() else {
            log::debug!("No image found for '{}'", query);
            return Ok(None);
        };

        let response = self
            .http
            .get(url)
            .send()
            .map_err(|e| Error::Http(format!("image download failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "image download returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| Error::Http(format!("image download failed: {e}")))?;

        let image = SlideImage::from_bytes(bytes.to_vec());
        if image.is_none() {
            log::debug!("Ignoring image for '{}' in an unsupported format", query);
        }
        Ok(image)
    }
}

impl ImageSource for PexelsClient {
    fn find_image(&self, query: &str) -> Option<SlideImage> {
        if self.api_key.trim().is_empty() {
            return None;
        }

        match self.try_find_image(query) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Image lookup for '{}' failed: {}", query, e);
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    src: PhotoSources,
}

#[derive(Debug, Deserialize)]
struct PhotoSources {
    medium: Option<String>,
}

impl SearchResponse {
    fn first_medium_url(&self) -> Option<&str> {
        self.photos.first()?.src.medium.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{local_http, serve};
    use slidegen_core::ImageFormat;

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    fn local_client(api_key: &str, search_url: String) -> PexelsClient {
        let mut client = PexelsClient::new(api_key)
            .unwrap()
            .with_search_url(search_url);
        client.http = local_http();
        client
    }

    #[test]
    fn test_first_medium_url() {
        let results: SearchResponse = serde_json::from_str(
            r#"{"page":1,"photos":[{"id":1,"src":{"original":"o.jpg","medium":"m.jpg"}},{"id":2,"src":{"medium":"other.jpg"}}]}"#,
        )
        .unwrap();
        assert_eq!(results.first_medium_url(), Some("m.jpg"));

        let empty: SearchResponse = serde_json::from_str(r#"{"photos":[]}"#).unwrap();
        assert_eq!(empty.first_medium_url(), None);

        let missing: SearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.first_medium_url(), None);
    }

    #[test]
    fn test_blank_key_never_searches() {
        let client = local_client("  ", "http://127.0.0.1:9/unreachable".to_string());
        assert!(client.find_image("anything").is_none());
    }

    #[test]
    fn test_search_error_is_none() {
        let base = serve(|_, _| (404, "text/plain", b"nope".to_vec()));
        let client = local_client("key", format!("{base}/v1/search"));
        assert!(client.find_image("Solar Power").is_none());
    }

    #[test]
    fn test_no_photos_is_none() {
        let base = serve(|_, _| (200, "application/json", br#"{"photos":[]}"#.to_vec()));
        let client = local_client("key", format!("{base}/v1/search"));
        assert!(client.find_image("Solar Power").is_none());
    }

    #[test]
    fn test_finds_image() {
        let images = serve(|url, _| {
            if url == "/photos/medium.jpg" {
                (200, "image/jpeg", JPEG.to_vec())
            } else {
                (404, "text/plain", Vec::new())
            }
        });

        let photo_url = format!("{images}/photos/medium.jpg");
        let search = serve(move |url, headers| {
            let authorized = headers
                .iter()
                .any(|(name, value)| name.eq_ignore_ascii_case("authorization") && value == "key");
            if authorized && url.starts_with("/v1/search?") && url.contains("per_page=1") {
                let body = format!(r#"{{"photos":[{{"src":{{"medium":"{photo_url}"}}}}]}}"#);
                (200, "application/json", body.into_bytes())
            } else {
                (401, "text/plain", Vec::new())
            }
        });

        let client = local_client("key", format!("{search}/v1/search"));
        let image = client.find_image("Solar Power").unwrap();
        assert_eq!(image.format, ImageFormat::Jpeg);
        assert_eq!(image.bytes, JPEG);
    }

    #[test]
    fn test_unsupported_format_is_none() {
        let images = serve(|_, _| (200, "image/webp", b"RIFF....WEBP".to_vec()));
        let photo_url = format!("{images}/p.webp");
        let search = serve(move |_, _| {
            let body = format!(r#"{{"photos":[{{"src":{{"medium":"{photo_url}"}}}}]}}"#);
            (200, "application/json", body.into_bytes())
        });

        let client = local_client("key", format!("{search}/v1/search"));
        assert!(client.find_image("x").is_none());
    }
}
