//! HTTP client for the prediction service. One logical request at a time,
//! no retries: a failed call surfaces an error and the caller decides how to
//! degrade (usually to the sample dataset, see `analytics_engine`).

use std::time::Duration;

use reqwest::multipart;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    AuthResponse, BatchOutcome, Credentials, ExplainResponse, PasswordChange, PredictRequest,
    PredictionRecord, PredictionResult, ProfileUpdate, RegisterRequest, Session, User,
};
use crate::services::session::SessionStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: SessionStore,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String, store: SessionStore) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let token = store.load().map(|s| s.token);
        Ok(Self {
            http,
            base_url,
            store,
            token,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Shared response handling: a 401 clears the stored session and becomes
    /// `ApiError::Auth`; any other non-2xx becomes `ApiError::Server` with
    /// the body's `error`/`message` field when one is present.
    async fn parse<T: DeserializeOwned>(&self, response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            if let Err(e) = self.store.clear() {
                log::warn!("failed to clear session after 401: {}", e);
            }
            return Err(ApiError::Auth);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| {
                    v.get("error")
                        .or_else(|| v.get("message"))
                        .and_then(|m| m.as_str())
                        .map(String::from)
                })
                .unwrap_or(text);
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    pub async fn health(&self) -> ApiResult<serde_json::Value> {
        let response = self.http.get(self.url("/")).send().await?;
        self.parse(response).await
    }

    // ─── Auth ───

    pub async fn login(&mut self, email: &str, password: &str) -> ApiResult<Session> {
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await?;
        let auth: AuthResponse = self.parse(response).await?;

        // The login endpoint only guarantees a token; fall back to a minimal
        // user object assembled from the submitted email.
        let session = Session {
            token: auth.token,
            user: auth.user.unwrap_or(User {
                name: None,
                email: email.to_string(),
            }),
        };
        self.store.save(&session)?;
        self.token = Some(session.token.clone());
        log::info!("logged in as {}", session.user.email);
        Ok(session)
    }

    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> ApiResult<Session> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&body)
            .send()
            .await?;
        let auth: AuthResponse = self.parse(response).await?;

        let session = Session {
            token: auth.token,
            user: auth.user.unwrap_or(User {
                name: Some(name.to_string()),
                email: email.to_string(),
            }),
        };
        self.store.save(&session)?;
        self.token = Some(session.token.clone());
        Ok(session)
    }

    /// Local state is cleared even when the server call fails; logout must
    /// always leave the client logged out.
    pub async fn logout(&mut self) -> ApiResult<()> {
        let request = self.authorized(self.http.post(self.url("/auth/logout")));
        match request.send().await {
            Ok(response) => {
                if let Err(e) = self.parse::<serde_json::Value>(response).await {
                    log::warn!("logout request failed: {}", e);
                }
            }
            Err(e) => log::warn!("logout request failed: {}", e),
        }
        self.store.clear()?;
        self.token = None;
        Ok(())
    }

    pub async fn profile(&self) -> ApiResult<User> {
        let request = self.authorized(self.http.get(self.url("/auth/profile")));
        let value: serde_json::Value = self.parse(request.send().await?).await?;
        let user_value = value.get("user").cloned().unwrap_or(value);
        Ok(serde_json::from_value(user_value)?)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Option<User>> {
        let request = self.authorized(self.http.put(self.url("/auth/profile")).json(update));
        let value: serde_json::Value = self.parse(request.send().await?).await?;
        match value.get("user") {
            Some(user) => Ok(Some(serde_json::from_value(user.clone())?)),
            None => Ok(None),
        }
    }

    pub async fn change_password(&self, change: &PasswordChange) -> ApiResult<()> {
        let request = self.authorized(self.http.put(self.url("/auth/password")).json(change));
        let _: serde_json::Value = self.parse(request.send().await?).await?;
        Ok(())
    }

    // ─── Predictions ───

    pub async fn predict(&self, request: &PredictRequest) -> ApiResult<PredictionResult> {
        let builder = self.authorized(self.http.post(self.url("/predict/")).json(request));
        self.parse(builder.send().await?).await
    }

    pub async fn predict_batch(&self, file_name: &str, csv: Vec<u8>) -> ApiResult<BatchOutcome> {
        let part = multipart::Part::bytes(csv)
            .file_name(file_name.to_string())
            .mime_str("text/csv")
            .map_err(ApiError::Network)?;
        let form = multipart::Form::new().part("file", part);
        let builder = self.authorized(self.http.post(self.url("/predict/batch")).multipart(form));
        self.parse(builder.send().await?).await
    }

    pub async fn explain(&self, request: &PredictRequest) -> ApiResult<ExplainResponse> {
        let builder = self.authorized(self.http.post(self.url("/predict/explain")).json(request));
        self.parse(builder.send().await?).await
    }

    /// Fetch the prediction history. Accepts both the `{predictions: [...]}`
    /// envelope and a bare array; records that fail to deserialize are
    /// skipped with a warning rather than failing the whole page.
    pub async fn history(&self) -> ApiResult<Vec<PredictionRecord>> {
        let request = self.authorized(self.http.get(self.url("/predict/history")));
        let value: serde_json::Value = self.parse(request.send().await?).await?;

        let items = match value {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut map) => match map.remove("predictions") {
                Some(serde_json::Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<PredictionRecord>(item) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("skipping malformed history record: {}", e),
            }
        }
        Ok(records)
    }
}
