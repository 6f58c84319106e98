// API client module: a small blocking HTTP client for the vault endpoints of
// the blog backend. Calls are synchronous; the walker waits for each response
// before it touches the next file.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a remote call did not produce a created record.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never got an HTTP response (connection refused, reset...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The server answered with something other than 200/201.
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// 200/201 but the body was not the expected envelope.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response has no `{0}` field")]
    MissingField(&'static str),

    #[error("token cannot be used as a header value")]
    InvalidToken(#[from] InvalidHeaderValue),
}

impl ApiError {
    /// Transport errors mean the backend is unreachable, not that one item
    /// was refused.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }
}

/// Operations the tree walker needs from the remote store. Each returns the
/// id of the created record.
pub trait VaultApi {
    fn create_folder(&self, folder: &NewFolder<'_>) -> Result<String, ApiError>;
    fn create_note(&self, note: &NewNote<'_>) -> Result<String, ApiError>;
}

/// Login payload for `/auth/login`.
#[derive(Serialize, Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /vault/folders`. `parent` is omitted for top-level folders.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewFolder<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<&'a str>,
}

/// Body of `POST /vault/notes`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewNote<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub content: &'a str,
    pub folder_id: &'a str,
    pub tags: &'a [String],
}

/// Envelope every backend response is wrapped in.
#[derive(Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub message: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub access_token: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CreatedRecord {
    pub id: String,
}

/// Holds the reqwest blocking client, the API base URL and the bearer token
/// obtained from [`ApiClient::login`].
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store a bearer token for subsequent authenticated requests.
    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    /// Authenticate once and keep the access token for every later call.
    pub fn login(&mut self, credentials: &Credentials) -> Result<()> {
        let auth: AuthData = self
            .post("/auth/login", credentials)
            .context("Login request failed")?;
        let token = auth
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingField("data.accessToken"))
            .context("Login response carried no token")?;
        self.set_token(&token);
        Ok(())
    }

    /// Build the Authorization header map when a token is set.
    fn auth_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(t) = &self.token {
            let val = HeaderValue::from_str(&format!("Bearer {t}"))?;
            headers.insert(AUTHORIZATION, val);
        }
        Ok(headers)
    }

    /// POST a JSON body and unwrap `data` from the response envelope.
    fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let transport = |source: reqwest::Error| ApiError::Transport {
            url: url.clone(),
            source: Box::new(source),
        };

        let res = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .map_err(transport)?;
        let status = res.status();
        let text = res.text().map_err(transport)?;

        if !is_created(status) {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&text),
            });
        }
        parse_envelope(&text)
    }
}

impl VaultApi for ApiClient {
    fn create_folder(&self, folder: &NewFolder<'_>) -> Result<String, ApiError> {
        let created: CreatedRecord = self.post("/vault/folders", folder)?;
        Ok(created.id)
    }

    fn create_note(&self, note: &NewNote<'_>) -> Result<String, ApiError> {
        let created: CreatedRecord = self.post("/vault/notes", note)?;
        Ok(created.id)
    }
}

fn is_created(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::CREATED
}

/// Prefer the envelope's `message`, fall back to the raw body.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
        .ok()
        .and_then(|r| r.message)
        .unwrap_or_else(|| body.trim().to_string())
}

fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let envelope: ApiResponse<T> = serde_json::from_str(body)?;
    envelope.data.ok_or(ApiError::MissingField("data"))
}
