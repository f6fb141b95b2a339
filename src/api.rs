//! HTTP client for the TastyGo admin API with a uniform timeout and error policy.
//! Protected calls read the token from the injected [`SessionContext`] and attach
//! it as `Authorization: Bearer <token>`; a missing token fails before anything
//! is sent. Failures never escape as panics: every non-2xx status or transport
//! problem is mapped to an [`ApiError`] that a view can render.

use crate::{APP_USER_AGENT, config::ApiConfig, errors::ApiError, session::SessionContext};
use reqwest::{Client, Method, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{Instrument, debug, info_span};

/// Maximum number of error message characters surfaced to the operator.
const MAX_ERROR_CHARS: usize = 200;
/// Default page size used by the API when none is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Largest page size the API accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Whether a request carries the session token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Bearer,
    /// Only the login exchange is sent without a token.
    Anonymous,
}

/// List responses: `{"data": [...], "pagination": {...}}`.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Option<Vec<T>>,
    pub pagination: Option<Pagination>,
}

impl<T> DataEnvelope<T> {
    /// A missing or `null` `data` field is an empty collection, not an error.
    #[must_use]
    pub fn into_listing(self) -> Listing<T> {
        Listing {
            items: self.data.unwrap_or_default(),
            pagination: self.pagination,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub total: u64,
}

impl Pagination {
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }
}

/// Items of one page plus the paging metadata, when the server sent it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

/// Requested page, normalized the same way the API does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Out-of-range values fall back to page 1 and the default page size.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            page_size: if (1..=MAX_PAGE_SIZE).contains(&page_size) {
                page_size
            } else {
                DEFAULT_PAGE_SIZE
            },
        }
    }

    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ]
    }
}

/// Authenticated HTTP client shared by every feature client.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
    session: SessionContext,
}

impl ApiClient {
    /// # Errors
    /// Returns `ApiError::Config` if the underlying HTTP client cannot be built.
    pub fn new(config: ApiConfig, session: SessionContext) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            config,
            session,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Sends one request and decodes a JSON response body.
    ///
    /// # Errors
    /// Returns `MissingCredential` for bearer calls without a stored token,
    /// `Unauthorized` on 401, `Server` on any other non-2xx status, and
    /// `Network`/`Timeout`/`Parse` for transport and decoding failures.
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
        access: Access,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = body.map(encode_body).transpose()?;
        let response = self.send(method, path, query, payload, access).await?;
        handle_json_response(response).await
    }

    /// Like [`ApiClient::request`] but ignores the success body.
    ///
    /// # Errors
    /// Same as [`ApiClient::request`], minus decoding failures.
    pub async fn request_empty<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        access: Access,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let payload = body.map(encode_body).transpose()?;
        let response = self.send(method, path, &[], payload, access).await?;
        handle_empty_response(response).await
    }

    /// Bearer-authenticated GET returning JSON.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.request::<(), T>(Method::GET, path, query, None, Access::Bearer)
            .await
    }

    /// Bearer-authenticated GET of a `{data, pagination}` list.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get_listing<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Listing<T>, ApiError> {
        let envelope: DataEnvelope<T> = self.get_json(path, query).await?;
        Ok(envelope.into_listing())
    }

    /// Bearer-authenticated POST whose success body is not needed.
    ///
    /// # Errors
    /// See [`ApiClient::request_empty`].
    pub async fn post_json_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.request_empty(Method::POST, path, Some(body), Access::Bearer)
            .await
    }

    /// Bearer-authenticated POST returning JSON.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, &[], Some(body), Access::Bearer)
            .await
    }

    /// Unauthenticated POST returning JSON, used for the login exchange.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn post_json_anonymous<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, &[], Some(body), Access::Anonymous)
            .await
    }

    /// Bearer-authenticated POST with no body.
    ///
    /// # Errors
    /// See [`ApiClient::request_empty`].
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.request_empty::<()>(Method::POST, path, None, Access::Bearer)
            .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        payload: Option<Vec<u8>>,
        access: Access,
    ) -> Result<Response, ApiError> {
        // Checked before building the request: no token, no traffic.
        let token = match access {
            Access::Bearer => Some(self.session.require_token()?),
            Access::Anonymous => None,
        };

        let url = self.config.build_url(path);
        let mut builder = self.http.request(method.clone(), &url);

        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(payload) = payload {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload);
        }

        let span = info_span!(
            "api.request",
            http.method = %method,
            url = %url
        );
        let response = builder
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        debug!(status = response.status().as_u16(), "{method} {url}");
        Ok(response)
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(body)
        .map_err(|err| ApiError::Serialization(format!("Failed to encode request: {err}")))
}

/// Maps transport errors into operator-facing variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_decode() {
        ApiError::Parse(format!("Failed to read response: {err}"))
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    let bytes = response.bytes().await.map_err(map_request_error)?;
    serde_json::from_slice(&bytes)
        .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
}

async fn handle_empty_response(response: Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(response).await)
    }
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body);

    if status == StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized { message }
    } else {
        ApiError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

/// Reads the `error` field of a JSON error body, trimmed and truncated.
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = value.get("error").and_then(Value::as_str)?.trim();

    if message.is_empty() {
        None
    } else {
        Some(message.chars().take(MAX_ERROR_CHARS).collect())
    }
}
