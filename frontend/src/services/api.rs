use async_trait::async_trait;
use gloo::net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    Category, ChangePasswordRequest, FilterState, LoginRequest, LoginResponse, MessageResponse,
    NewCategory, RegisterRequest, RegisteredUser, Transaction, TransactionDraft,
    UpdateProfileRequest,
};

use crate::config::AppConfig;
use crate::services::gateway::{GatewayError, TransactionGateway};
use crate::services::session::Session;

/// HTTP client for the BudgetBee REST API.
///
/// The bearer credential is handed in at construction; the client never reads
/// browser storage itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
    session: Option<Session>,
}

impl ApiClient {
    pub fn new(config: &AppConfig, session: Option<Session>) -> Self {
        Self::with_base_url(config.api_base_url.clone(), session)
    }

    pub fn with_base_url(base_url: String, session: Option<Session>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, GatewayError> {
        let session = self.session.as_ref().ok_or(GatewayError::Unauthenticated)?;
        Ok(builder.header("Authorization", &session.bearer_header()))
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, GatewayError> {
        let request = Request::post(&self.url("/users/login"))
            .json(request)
            .map_err(encode_error)?;
        read_json(request.send().await.map_err(network_error)?).await
    }

    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<RegisteredUser, GatewayError> {
        let request = Request::post(&self.url("/users/register"))
            .json(request)
            .map_err(encode_error)?;
        read_json(request.send().await.map_err(network_error)?).await
    }

    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<(), GatewayError> {
        let request = self
            .authorized(Request::put(&self.url("/users/update-profile")))?
            .json(request)
            .map_err(encode_error)?;
        read_confirmation(request.send().await.map_err(network_error)?).await
    }

    /// Callers drop the session afterwards so the user logs in again with the
    /// new password.
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<(), GatewayError> {
        let request = self
            .authorized(Request::put(&self.url("/users/change-password")))?
            .json(request)
            .map_err(encode_error)?;
        read_confirmation(request.send().await.map_err(network_error)?).await
    }
}

#[async_trait(?Send)]
impl TransactionGateway for ApiClient {
    async fn list_transactions(
        &self,
        filters: &FilterState,
    ) -> Result<Vec<Transaction>, GatewayError> {
        let params = filters.to_query_params();
        tracing::debug!(?params, "listing transactions");

        let request = self
            .authorized(Request::get(&self.url("/transactions")))?
            .query(params.iter().map(|(key, value)| (*key, value.as_str())));
        read_json(request.send().await.map_err(network_error)?).await
    }

    async fn create_transaction(
        &self,
        draft: &TransactionDraft,
    ) -> Result<Transaction, GatewayError> {
        let request = self
            .authorized(Request::post(&self.url("/transactions/create")))?
            .json(draft)
            .map_err(encode_error)?;
        read_json(request.send().await.map_err(network_error)?).await
    }

    async fn update_transaction(
        &self,
        id: &str,
        draft: &TransactionDraft,
    ) -> Result<Transaction, GatewayError> {
        let path = format!("/transactions/update-transaction/{id}");
        let request = self
            .authorized(Request::put(&self.url(&path)))?
            .json(draft)
            .map_err(encode_error)?;
        read_json(request.send().await.map_err(network_error)?).await
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), GatewayError> {
        let path = format!("/transactions/delete/{id}");
        let request = self.authorized(Request::delete(&self.url(&path)))?;
        read_confirmation(request.send().await.map_err(network_error)?).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, GatewayError> {
        let request = self.authorized(Request::get(&self.url("/categories/lists")))?;
        read_json(request.send().await.map_err(network_error)?).await
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category, GatewayError> {
        let request = self
            .authorized(Request::post(&self.url("/categories/create")))?
            .json(category)
            .map_err(encode_error)?;
        read_json(request.send().await.map_err(network_error)?).await
    }

    async fn delete_category(&self, id: &str) -> Result<(), GatewayError> {
        let path = format!("/categories/delete/{id}");
        let request = self.authorized(Request::delete(&self.url(&path)))?;
        read_confirmation(request.send().await.map_err(network_error)?).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    if !response.ok() {
        return Err(http_error(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| GatewayError::Decode(e.to_string()))
}

async fn read_confirmation(response: Response) -> Result<(), GatewayError> {
    if response.ok() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

async fn http_error(response: Response) -> GatewayError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    GatewayError::Http {
        status,
        message: error_message(status, &body),
    }
}

fn network_error(error: gloo::net::Error) -> GatewayError {
    GatewayError::Network(error.to_string())
}

fn encode_error(error: gloo::net::Error) -> GatewayError {
    GatewayError::Decode(format!("failed to encode request: {error}"))
}

/// Human-readable message for a failed response.
///
/// Prefers the server's `{"message": ...}` field, then a short plain-text
/// body, then a generic status line.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    let from_json = serde_json::from_str::<MessageResponse>(body)
        .ok()
        .and_then(|reply| reply.message)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty());
    if let Some(message) = from_json {
        return message;
    }

    let text = body.trim();
    if !text.is_empty() && text.len() <= 200 && !text.starts_with('<') && !text.starts_with('{') {
        return text.to_string();
    }

    format!("Request failed with status {status}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ApiClient::with_base_url("http://localhost:8000/api/v1/".to_string(), None);
        assert_eq!(client.base_url, "http://localhost:8000/api/v1");
        assert_eq!(
            client.url("/transactions"),
            "http://localhost:8000/api/v1/transactions"
        );
    }

    #[test]
    fn test_client_uses_configured_base_url() {
        let config = AppConfig {
            api_base_url: "https://budget.example.com/api/v1".to_string(),
            ..AppConfig::default()
        };
        let client = ApiClient::new(&config, Some(Session::new("abc")));

        assert_eq!(client.base_url, "https://budget.example.com/api/v1");
        assert_eq!(client.session.map(|s| s.token), Some("abc".to_string()));
    }

    #[test]
    fn test_error_message_prefers_server_message() {
        assert_eq!(
            error_message(400, r#"{"message":"Category already exists"}"#),
            "Category already exists"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_text_then_status() {
        assert_eq!(error_message(401, "Token expired, login again"), "Token expired, login again");
        assert_eq!(error_message(500, ""), "Request failed with status 500");
        assert_eq!(
            error_message(502, "<html><body>Bad gateway</body></html>"),
            "Request failed with status 502"
        );
        assert_eq!(error_message(404, r#"{"error":"x"}"#), "Request failed with status 404");
    }

    #[test]
    fn test_gateway_error_display() {
        let error = GatewayError::Http {
            status: 403,
            message: "Not allowed".to_string(),
        };
        assert_eq!(error.to_string(), "Not allowed");
        assert_eq!(error.status(), Some(403));
        assert_eq!(GatewayError::Unauthenticated.status(), None);
    }
}
