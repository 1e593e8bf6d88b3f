//! HTTP adapter: Implementation of ImagingApi against the REST backend.
//!
//! Talks to the imaging service over `reqwest`:
//! - `GET  {base}/api/auth/session`: session check
//! - `GET  {base}/api/history`: scan history (JSON array)
//! - `POST {base}/api/scans/{modality}`: multipart upload, one `file` part
//!
//! # Authentication
//!
//! Requests carry `Authorization: Bearer {token}` when a token is
//! configured. The token is sourced from `SCANLINE_API_TOKEN_FILE` (a file
//! path, highest precedence) or `SCANLINE_API_TOKEN`, and held in
//! `Zeroizing` memory so it is wiped on drop.

use std::env;
use std::fs;
use std::time::Duration;

use reqwest::multipart;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use url::Url;
use zeroize::Zeroizing;

use crate::domain::{Modality, ScanRecord, ScanResult, ScanUpload, Session};
use crate::ports::{ApiError, ImagingApi};
use crate::ScanlineError;

/// Base URL of the imaging service.
const API_URL_ENV: &str = "SCANLINE_API_URL";
/// Bearer token sources. The file variant wins so deployments can mount a
/// secret instead of putting the token in the process environment.
const API_TOKEN_FILE_ENV: &str = "SCANLINE_API_TOKEN_FILE";
const API_TOKEN_ENV: &str = "SCANLINE_API_TOKEN";

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Per-request deadlines. Uploads get a longer window because the backend
/// runs inference before answering.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Longest rejection message surfaced to the UI banner.
const MAX_REJECTION_CHARS: usize = 200;

/// Connection settings for the imaging service.
pub struct ApiConfig {
    pub base_url: Url,
    pub token: Option<Zeroizing<String>>,
}

impl ApiConfig {
    /// Load configuration from `SCANLINE_*` environment variables.
    ///
    /// # Errors
    /// Returns error if the base URL does not parse or a configured token
    /// file cannot be read.
    pub fn from_env() -> crate::Result<Self> {
        let raw = env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let base_url = parse_base_url(&raw)?;
        let token = load_token()?;
        Ok(Self { base_url, token })
    }
}

/// Validate the service base URL.
fn parse_base_url(raw: &str) -> crate::Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ScanlineError::Config(format!("invalid {API_URL_ENV} {raw:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ScanlineError::Config(format!(
            "invalid {API_URL_ENV} {raw:?}: unsupported scheme {other:?}"
        ))),
    }
}

fn load_token() -> crate::Result<Option<Zeroizing<String>>> {
    if let Ok(path) = env::var(API_TOKEN_FILE_ENV) {
        let raw = fs::read_to_string(&path).map_err(|e| {
            ScanlineError::Config(format!("cannot read {API_TOKEN_FILE_ENV} ({path}): {e}"))
        })?;
        let token = raw.trim();
        if token.is_empty() {
            return Err(ScanlineError::Config(format!(
                "token file {path} is empty"
            )));
        }
        return Ok(Some(Zeroizing::new(token.to_string())));
    }
    if let Ok(raw) = env::var(API_TOKEN_ENV) {
        let token = raw.trim();
        if !token.is_empty() {
            return Ok(Some(Zeroizing::new(token.to_string())));
        }
    }
    Ok(None)
}

/// HTTP client for the imaging service.
pub struct HttpApi {
    client: Client,
    base: String,
    token: Option<Zeroizing<String>>,
}

impl HttpApi {
    /// Create a client from connection settings.
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be constructed.
    pub fn new(config: ApiConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("scanline/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ScanlineError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base: config.base_url.as_str().trim_end_matches('/').to_string(),
            token: config.token,
        })
    }

    /// Create a client configured from the environment.
    ///
    /// # Errors
    /// Returns error if configuration is invalid.
    pub fn from_env() -> crate::Result<Self> {
        Self::new(ApiConfig::from_env()?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token.as_str())),
            None => request,
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Map a non-success response to the error the workflow shows.
    async fn status_error(response: Response) -> ApiError {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized;
        }
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return ApiError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body),
            };
        }
        ApiError::Server {
            status: status.as_u16(),
        }
    }
}

/// Pull a human-readable reason out of a 4xx body.
///
/// The backend answers rejections with JSON like `{"detail": "..."}`;
/// plain-text bodies are passed through truncated, and an empty body gets
/// a canned message.
fn rejection_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "error", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.trim().is_empty() {
                    return text.trim().to_string();
                }
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "the image could not be processed".to_string()
    } else {
        trimmed.chars().take(MAX_REJECTION_CHARS).collect()
    }
}

#[async_trait::async_trait]
impl ImagingApi for HttpApi {
    async fn check_session(&self) -> Result<Session, ApiError> {
        let url = format!("{}/api/auth/session", self.base);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        // A definitive 401 means "no session", which is an answer, not a
        // failure of the check itself.
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(Session::signed_out());
        }
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Self::decode(response).await
    }

    async fn fetch_history(&self) -> Result<Vec<ScanRecord>, ApiError> {
        let url = format!("{}/api/history", self.base);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Self::decode(response).await
    }

    async fn upload_scan(
        &self,
        modality: Modality,
        upload: ScanUpload,
    ) -> Result<ScanResult, ApiError> {
        let url = format!("{}/api/scans/{}", self.base, modality.as_str());
        let mime = upload.mime_type();
        let ScanUpload { file_name, bytes } = upload;

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&mime)
            .map_err(|e| ApiError::InvalidUpload(format!("unsupported image type: {e}")))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .authorize(self.client.post(&url))
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_accepts_http() {
        let url = parse_base_url("http://localhost:8000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_parse_base_url_rejects_file_scheme() {
        assert!(parse_base_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn test_rejection_message_prefers_detail_key() {
        let body = r#"{"detail": "Invalid image format"}"#;
        assert_eq!(rejection_message(body), "Invalid image format");
    }

    #[test]
    fn test_rejection_message_falls_back_to_error_key() {
        let body = r#"{"error": "file too large"}"#;
        assert_eq!(rejection_message(body), "file too large");
    }

    #[test]
    fn test_rejection_message_passes_plain_text_through() {
        assert_eq!(rejection_message("bad request"), "bad request");
    }

    #[test]
    fn test_rejection_message_truncates_long_bodies() {
        let body = "x".repeat(1000);
        assert_eq!(rejection_message(&body).chars().count(), 200);
    }

    #[test]
    fn test_rejection_message_handles_empty_body() {
        assert_eq!(rejection_message(""), "the image could not be processed");
    }

    #[test]
    fn test_base_trailing_slash_is_trimmed() {
        let api = HttpApi::new(ApiConfig {
            base_url: Url::parse("http://localhost:8000/").unwrap(),
            token: None,
        })
        .unwrap();
        assert_eq!(api.base, "http://localhost:8000");
    }

    #[test]
    fn test_config_errors_name_the_problem() {
        let err = parse_base_url("ftp://imaging.internal").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("Invalid configuration"), "{text}");
        assert!(text.contains("unsupported scheme"), "{text}");
    }

    /// One-shot HTTP stub: answers the first request with a canned response
    /// and exits.
    fn stub_server(response: &'static str) -> (String, std::thread::JoinHandle<()>) {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Should bind");
        let addr = listener.local_addr().expect("Should have an address");
        let handle = std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let mut request = Vec::new();
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = stream.write_all(response.as_bytes());
            }
        });
        (format!("http://{addr}"), handle)
    }

    fn api_against(base: &str) -> HttpApi {
        HttpApi::new(ApiConfig {
            base_url: Url::parse(base).expect("Should parse"),
            token: None,
        })
        .expect("Should build client")
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_check_session_resolves_401_to_signed_out() {
        let (base, server) = stub_server(
            "HTTP/1.1 401 Unauthorized\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        );
        let api = api_against(&base);

        let session = api.check_session().await.expect("401 is an answer");
        assert!(session.user.is_none());
        server.join().expect("Stub should exit");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_check_session_surfaces_server_errors() {
        let (base, server) = stub_server(
            "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        );
        let api = api_against(&base);

        let err = api.check_session().await.expect_err("500 is a failure");
        assert!(matches!(err, ApiError::Server { status: 500 }), "{err:?}");
        server.join().expect("Stub should exit");
    }
}
