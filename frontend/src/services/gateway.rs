use async_trait::async_trait;
use shared::{Category, FilterState, NewCategory, Transaction, TransactionDraft};
use thiserror::Error;

/// Failure talking to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The request never produced a response (offline, CORS, timeout).
    #[error("Network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("You need to log in first")]
    Unauthenticated,
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Persistence operations the dashboard needs from the backend.
///
/// Futures are not `Send`: everything runs on the browser's single thread.
#[async_trait(?Send)]
pub trait TransactionGateway {
    async fn list_transactions(
        &self,
        filters: &FilterState,
    ) -> Result<Vec<Transaction>, GatewayError>;

    async fn create_transaction(
        &self,
        draft: &TransactionDraft,
    ) -> Result<Transaction, GatewayError>;

    async fn update_transaction(
        &self,
        id: &str,
        draft: &TransactionDraft,
    ) -> Result<Transaction, GatewayError>;

    async fn delete_transaction(&self, id: &str) -> Result<(), GatewayError>;

    async fn list_categories(&self) -> Result<Vec<Category>, GatewayError>;

    async fn create_category(&self, category: &NewCategory) -> Result<Category, GatewayError>;

    async fn delete_category(&self, id: &str) -> Result<(), GatewayError>;
}
