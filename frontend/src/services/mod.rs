pub mod api;
pub mod gateway;
pub mod logging;
pub mod session;

pub use api::ApiClient;
pub use gateway::{GatewayError, TransactionGateway};
pub use session::Session;
