//! Queue Store error types.

use crate::ports::outbound::StoreBackendError;

/// Queue Store error type.
#[derive(Debug)]
pub enum QueueError {
    /// Queue holds `capacity` events; publish rejected without eviction.
    QueueFull { capacity: usize },

    /// The backing sorted-set store failed.
    Backend(StoreBackendError),
}

impl QueueError {
    /// True when the producer should back off rather than retry.
    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::QueueFull { .. })
    }
}

impl std::fmt::Display for QueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QueueFull { capacity } => {
                write!(f, "Queue full at {} events", capacity)
            }
            Self::Backend(e) => write!(f, "Backend error: {}", e),
        }
    }
}

impl std::error::Error for QueueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Backend(e) => Some(e),
            Self::QueueFull { .. } => None,
        }
    }
}

impl From<StoreBackendError> for QueueError {
    fn from(e: StoreBackendError) -> Self {
        Self::Backend(e)
    }
}
