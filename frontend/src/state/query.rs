use crate::services::GatewayError;

/// Lifecycle of one logical remote query.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QueryStatus<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(GatewayError),
}

impl<T> QueryStatus<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryStatus::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryStatus::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&GatewayError> {
        match self {
            QueryStatus::Error(error) => Some(error),
            _ => None,
        }
    }
}

/// Hands out request generations so that only the newest issued request may
/// write its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }

    /// Generation of the newest request, 0 before any was issued.
    pub fn latest(&self) -> u64 {
        self.latest
    }
}
