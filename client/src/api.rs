//! # Backend Transport
//!
//! Every call except login and the token check goes through one endpoint,
//! `POST {api_url}/route`, as a multipart form. The target operation rides in
//! the `X-Slice` header as an encoded `{controller, function}` pair.
//!
//! ## Headers
//! - `X-Slice`: routing token from [`slice::make_slice`]
//! - `token`: session token, when logged in
//!
//! ## Errors
//! - Non-2xx bodies carry a `message`, used as the user-facing text
//! - 403 means the session is gone: the auth context is cleared before the
//!   error is returned
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, multipart::Form};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use slice::make_slice;
use tracing::{debug, warn};

use crate::{
    auth::AuthSession,
    config::Config,
    error::{ApiError, FALLBACK_MESSAGE},
    form::flatten,
    models::{
        CONTROLLER, DASHBOARD_FUNCTION, Dashboard, ErrorBody, INDEX_FUNCTION, LoginMode,
        LoginRequest, LoginResponse, Profile, RESOLVE_FUNCTION, ResolveResponse, STORE_FUNCTION,
        SUBMIT_FUNCTION, SampleSummary, SamplePage, StatusResponse, SubmitRequest,
    },
};

pub const SLICE_HEADER: &str = "X-Slice";
pub const TOKEN_HEADER: &str = "token";

/// Backend rejection meaning the user holds a session elsewhere.
pub const ALREADY_LOGGED_IN: &str = "User sudah login";

/// The two calls the bottle session depends on.
#[async_trait]
pub trait SampleApi: Send + Sync {
    async fn resolve_sample(&self, sample_id: &str) -> Result<ResolveResponse, ApiError>;

    async fn submit_checklist(
        &self,
        request: &SubmitRequest<'_>,
    ) -> Result<StatusResponse, ApiError>;
}

#[async_trait]
impl<T: SampleApi + ?Sized> SampleApi for Arc<T> {
    async fn resolve_sample(&self, sample_id: &str) -> Result<ResolveResponse, ApiError> {
        (**self).resolve_sample(sample_id).await
    }

    async fn submit_checklist(
        &self,
        request: &SubmitRequest<'_>,
    ) -> Result<StatusResponse, ApiError> {
        (**self).submit_checklist(request).await
    }
}

pub struct HttpApi {
    client: Client,
    base_url: String,
    auth: Arc<AuthSession>,
}

impl HttpApi {
    pub fn new(config: &Config, auth: Arc<AuthSession>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn auth(&self) -> &Arc<AuthSession> {
        &self.auth
    }

    /// Exchanges credentials for a session token and stores it.
    pub async fn authenticate(
        &self,
        identity: &str,
        password: &str,
        mode: LoginMode,
    ) -> Result<(), ApiError> {
        let request = self.post("gettoken").json(&LoginRequest {
            identity,
            password,
            mode,
        });

        let response: LoginResponse = match self.send(request).await {
            Err(ApiError::Rejected { message, .. }) if message == ALREADY_LOGGED_IN => {
                return Err(ApiError::AlreadyLoggedIn { message });
            }
            other => other?,
        };

        self.auth.login(response.token.into());

        Ok(())
    }

    /// Checks the stored token and loads the user behind it.
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        if !self.auth.is_logged_in() {
            return Err(ApiError::Unauthenticated);
        }

        let profile: Profile = self.send(self.post("cektoken")).await?;
        self.auth.load_user(profile.clone());

        Ok(profile)
    }

    pub async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        self.route(DASHBOARD_FUNCTION, &json!({})).await
    }

    pub async fn list_samples(&self, page: u32) -> Result<Vec<SampleSummary>, ApiError> {
        let response: SamplePage = self.route(INDEX_FUNCTION, &json!({ "page": page })).await?;

        response
            .data
            .ok_or_else(|| ApiError::Malformed("sample page without data".to_string()))
    }

    /// Registers a scanned sample in the laboratory intake list.
    pub async fn register_sample(&self, no_sampel: &str) -> Result<StatusResponse, ApiError> {
        self.route(STORE_FUNCTION, &json!({ "no_sampel": no_sampel }))
            .await
    }

    async fn route<T: DeserializeOwned>(
        &self,
        function: &str,
        payload: &impl Serialize,
    ) -> Result<T, ApiError> {
        let fields = flatten(&serde_json::to_value(payload)?);
        debug!("Routing {CONTROLLER}::{function} with {} fields", fields.len());

        let form = fields
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value));

        let request = self
            .post("route")
            .header(SLICE_HEADER, make_slice(CONTROLLER, function))
            .multipart(form);

        self.send(request).await
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let request = self.client.post(format!("{}/{path}", self.base_url));

        match self.auth.expose_token(str::to_string) {
            Some(token) => request.header(TOKEN_HEADER, token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;

        self.read(response).await
    }

    async fn read<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());

        warn!("Backend answered {status}: {message}");

        if status == StatusCode::FORBIDDEN {
            self.auth.logout();

            return Err(ApiError::Forbidden { message });
        }

        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SampleApi for HttpApi {
    async fn resolve_sample(&self, sample_id: &str) -> Result<ResolveResponse, ApiError> {
        self.route(RESOLVE_FUNCTION, &json!({ "no_sampel": sample_id }))
            .await
    }

    async fn submit_checklist(
        &self,
        request: &SubmitRequest<'_>,
    ) -> Result<StatusResponse, ApiError> {
        self.route(SUBMIT_FUNCTION, request).await
    }
}
