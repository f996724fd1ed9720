use crate::models::{
    AddUserRequest, ReferralCodeData, SetReferralCodeRequest, SetReferralCodeResponse,
};
use crate::utils::{ApiError, WidgetConfig};
use async_trait::async_trait;
use serde_json::Value;

const API_KEY_HEADER: &str = "x-api-key";

/// The referral backend, as seen by the widget
#[async_trait]
pub trait ReferralApi: Send + Sync {
    /// `GET /api/userData`; `Ok` only when a user record exists
    async fn user_data(&self, user_id: &str) -> Result<Value, ApiError>;

    /// `GET /api/referralCodeData`; `Ok` only when a code is assigned
    async fn referral_code_data(&self, user_id: &str) -> Result<String, ApiError>;

    /// `POST /api/addUser`; the body is implementation-defined
    async fn add_user(&self, request: &AddUserRequest) -> Result<Value, ApiError>;

    /// `POST /api/setReferralCode`
    async fn set_referral_code(
        &self,
        request: &SetReferralCodeRequest,
    ) -> Result<SetReferralCodeResponse, ApiError>;
}

/// reqwest-backed client
#[derive(Clone)]
pub struct HttpReferralApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpReferralApi {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(config.api_url.clone(), config.api_key.clone())
    }

    fn lookup_url(&self, path: &str, user_id: &str) -> String {
        format!("{}{}?id={}", self.base_url, path, urlencoding::encode(user_id))
    }

    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        read_json(response).await
    }

    async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// JavaScript-style truthiness, which is what the backend's `error` field
/// is written against.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn backend_error(payload: &Value) -> Option<ApiError> {
    payload
        .get("error")
        .filter(|err| is_truthy(err))
        .map(|err| match err {
            Value::String(msg) => ApiError::Backend(msg.clone()),
            other => ApiError::Backend(other.to_string()),
        })
}

#[async_trait]
impl ReferralApi for HttpReferralApi {
    async fn user_data(&self, user_id: &str) -> Result<Value, ApiError> {
        let url = self.lookup_url("/api/userData", user_id);
        log::debug!("👤 GET {}", url);

        let payload = self.get_json(&url).await?;
        if !is_truthy(&payload) {
            return Err(ApiError::NotFound);
        }
        if let Some(err) = backend_error(&payload) {
            return Err(err);
        }
        Ok(payload)
    }

    async fn referral_code_data(&self, user_id: &str) -> Result<String, ApiError> {
        let url = self.lookup_url("/api/referralCodeData", user_id);
        log::debug!("🎟️ GET {}", url);

        let payload = self.get_json(&url).await?;
        if let Some(err) = backend_error(&payload) {
            return Err(err);
        }

        let data: ReferralCodeData = match payload {
            Value::Null => return Err(ApiError::NotFound),
            other => serde_json::from_value(other).map_err(|e| ApiError::Decode(e.to_string()))?,
        };

        data.referral_code
            .filter(|code| !code.is_empty())
            .ok_or(ApiError::NotFound)
    }

    async fn add_user(&self, request: &AddUserRequest) -> Result<Value, ApiError> {
        let url = format!("{}/api/addUser", self.base_url);
        log::debug!("➕ POST {} (id={})", url, request.id);

        self.post_json(&url, request).await
    }

    async fn set_referral_code(
        &self,
        request: &SetReferralCodeRequest,
    ) -> Result<SetReferralCodeResponse, ApiError> {
        let url = format!("{}/api/setReferralCode", self.base_url);
        log::debug!(
            "🔁 POST {} (id={}, {} -> {})",
            url,
            request.id,
            request.old_referral_code,
            request.new_referral_code
        );

        let payload = self.post_json(&url, request).await?;
        if let Some(err) = backend_error(&payload) {
            return Err(err);
        }

        match payload {
            Value::Null => Ok(SetReferralCodeResponse::default()),
            other => serde_json::from_value(other).map_err(|e| ApiError::Decode(e.to_string())),
        }
    }
}
