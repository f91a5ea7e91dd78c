use anyhow::{anyhow, Result};
use gloo::storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};
use shared::{LoginResponse, UpdateProfileRequest};

/// Local storage key holding the logged-in user.
pub const SESSION_STORAGE_KEY: &str = "userInfo";

/// Bearer credential plus the identity it was issued for.
///
/// The token is opaque to the client; it is only forwarded in the
/// `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: None,
            email: None,
        }
    }

    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("there")
    }

    /// Restore the session saved by a previous login, if any.
    pub fn load() -> Option<Self> {
        match LocalStorage::get::<Session>(SESSION_STORAGE_KEY) {
            Ok(session) if !session.token.is_empty() => Some(session),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("no stored session: {e}");
                None
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        LocalStorage::set(SESSION_STORAGE_KEY, self)
            .map_err(|e| anyhow!("failed to persist session: {e}"))
    }

    /// Same credential, with the identity the server just accepted.
    pub fn with_profile(&self, profile: &UpdateProfileRequest) -> Self {
        Self {
            username: Some(profile.username.clone()),
            email: Some(profile.email.clone()),
            ..self.clone()
        }
    }

    pub fn forget() {
        LocalStorage::delete(SESSION_STORAGE_KEY);
    }
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Self {
            username: response.username,
            email: response.email,
            ..Self::new(response.token)
        }
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_session_survives_storage_round_trip() {
        let session = Session {
            token: "stored".to_string(),
            username: Some("bee".to_string()),
            email: None,
        };
        session.save().unwrap();
        assert_eq!(Session::load(), Some(session));

        Session::forget();
        assert_eq!(Session::load(), None);
    }
}
