//! Typed client for the video-download backend.
//!
//! Every call is a single request/response round trip. Nothing here touches
//! UI state; failures come back as [`ClientError`] and the caller decides how
//! to surface them.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{header::CONTENT_DISPOSITION, Client, Response};
use serde::Deserialize;
use serde_json::json;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::model::{DownloadRequest, Platform, VideoInfo};

static FILENAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bfilename\s*=\s*(?:"([^"]*)"|([^;]+))"#).expect("static regex")
});

/// A file the backend sent back
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlatformsBody {
    platforms: Vec<Platform>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `POST /api/info`. A 2xx body with `success: false` is an application error.
    pub async fn video_info(&self, url: &str) -> Result<VideoInfo> {
        let resp = self
            .http
            .post(self.config.endpoint("api/info"))
            .json(&json!({ "url": url }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body: ErrorBody = resp.json().await.unwrap_or_default();
            return Err(ClientError::Http {
                status,
                message: body
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| format!("HTTP error! status: {status}")),
            });
        }

        let mut info: VideoInfo = resp.json().await?;
        if !info.success {
            return Err(ClientError::Application(
                info.error
                    .take()
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| "Failed to fetch video info".to_string()),
            ));
        }
        info.error = None;
        Ok(info)
    }

    /// `POST /api/download`, returning the file name and payload.
    pub async fn download(&self, request: &DownloadRequest) -> Result<DownloadedFile> {
        let resp = self
            .http
            .post(self.config.endpoint("api/download"))
            .json(request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body: ErrorBody = resp.json().await.unwrap_or_default();
            return Err(ClientError::Http {
                status,
                message: body
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| "Download failed".to_string()),
            });
        }

        let filename =
            filename_from_response(&resp).unwrap_or_else(|| request.fallback_filename());
        let bytes = resp.bytes().await?.to_vec();
        tracing::debug!(%filename, size = bytes.len(), "download payload received");
        Ok(DownloadedFile { filename, bytes })
    }

    /// `GET /api/platforms`; any failure yields an empty list.
    pub async fn supported_platforms(&self) -> Vec<Platform> {
        let result = async {
            let resp = self
                .http
                .get(self.config.endpoint("api/platforms"))
                .send()
                .await?;
            Ok::<_, ClientError>(resp.json::<PlatformsBody>().await?)
        }
        .await;

        match result {
            Ok(body) => body.platforms,
            Err(e) => {
                tracing::warn!(error = %e, "error fetching platforms");
                Vec::new()
            }
        }
    }

    /// `GET /api/health`; true only for a 2xx answer.
    pub async fn check_health(&self) -> bool {
        match self.http.get(self.config.endpoint("api/health")).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "backend health check failed");
                false
            }
        }
    }
}

fn filename_from_response(resp: &Response) -> Option<String> {
    resp.headers()
        .get(CONTENT_DISPOSITION)?
        .to_str()
        .ok()
        .and_then(parse_content_disposition)
}

/// Extracts `filename` from a Content-Disposition value; quotes optional.
pub fn parse_content_disposition(value: &str) -> Option<String> {
    let caps = FILENAME_RE.captures(value)?;
    let name = caps.get(1).or_else(|| caps.get(2))?.as_str().trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Quality, VideoFormat};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(ClientConfig::with_base_url(&server.uri()).unwrap()).unwrap()
    }

    #[test]
    fn content_disposition_variants() {
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="My Video_abc.mp4""#).as_deref(),
            Some("My Video_abc.mp4")
        );
        assert_eq!(
            parse_content_disposition("attachment; filename=clip.webm").as_deref(),
            Some("clip.webm")
        );
        assert_eq!(
            parse_content_disposition(
                r#"attachment; filename="song.mp3"; filename*=UTF-8''s%C3%B6ng.mp3"#
            )
            .as_deref(),
            Some("song.mp3")
        );
        assert_eq!(parse_content_disposition("attachment"), None);
        assert_eq!(parse_content_disposition(r#"attachment; filename="""#), None);
    }

    #[tokio::test]
    async fn info_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/info"))
            .and(body_json(json!({ "url": "https://youtu.be/abc" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "title": "Never Gonna",
                "platform": "youtube",
                "duration": 213,
                "uploader": "Rick",
                "view_count": 1234567,
                "thumbnail": "https://i.ytimg.com/x.jpg"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let info = client_for(&server).await.video_info("https://youtu.be/abc").await.unwrap();
        assert!(info.success);
        assert_eq!(info.title.as_deref(), Some("Never Gonna"));
        assert_eq!(info.duration_secs(), 213);
        assert_eq!(info.view_count, Some(1234567));
    }

    #[tokio::test]
    async fn info_http_500_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/info"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.video_info("https://youtu.be/abc").await.unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 500, .. }));
        assert_eq!(err.user_message(), "HTTP error! status: 500");
    }

    #[tokio::test]
    async fn info_application_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/info"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": false })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).await.video_info("https://youtu.be/abc").await.unwrap_err();
        assert!(matches!(err, ClientError::Application(_)));
        assert_eq!(err.user_message(), "Failed to fetch video info");
    }

    #[tokio::test]
    async fn download_uses_header_filename() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/download"))
            .and(body_json(json!({
                "url": "https://youtu.be/abc",
                "quality": "1080p",
                "format": "webm",
                "audio_only": false
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Disposition", r#"attachment; filename="Song_abc.webm""#)
                    .set_body_bytes(vec![1u8, 2, 3]),
            )
            .mount(&server)
            .await;

        let mut req = DownloadRequest::new("https://youtu.be/abc");
        req.quality = Quality::P1080;
        req.format = VideoFormat::Webm;
        let file = client_for(&server).await.download(&req).await.unwrap();
        assert_eq!(file.filename, "Song_abc.webm");
        assert_eq!(file.bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn download_falls_back_to_synthesized_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/download"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3".to_vec()))
            .mount(&server)
            .await;

        let mut req = DownloadRequest::new("https://youtu.be/abc");
        req.audio_only = true;
        let file = client_for(&server).await.download(&req).await.unwrap();
        assert_eq!(file.filename, "video.mp3");
    }

    #[tokio::test]
    async fn download_error_message_from_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/download"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "success": false, "error": "Unsupported platform" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .download(&DownloadRequest::new("https://example.com/v"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Unsupported platform");
    }

    #[tokio::test]
    async fn download_error_without_body_uses_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/download"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .download(&DownloadRequest::new("https://example.com/v"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Download failed");
    }

    #[tokio::test]
    async fn platforms_and_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/platforms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "platforms": [{ "name": "YouTube", "id": "youtube", "supported": true, "features": ["4K"] }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "healthy" })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let platforms = client.supported_platforms().await;
        assert_eq!(platforms.len(), 1);
        assert_eq!(platforms[0].name, "YouTube");
        assert!(client.check_health().await);
    }

    #[tokio::test]
    async fn probes_degrade_silently() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/platforms"))
            .respond_with(ResponseTemplate::new(500).set_body_string("nope"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(client.supported_platforms().await.is_empty());
        assert!(!client.check_health().await);

        // connection refused
        let gone = ApiClient::new(ClientConfig::with_base_url("http://127.0.0.1:9").unwrap())
            .unwrap();
        assert!(!gone.check_health().await);
        assert!(gone.supported_platforms().await.is_empty());
    }
}
