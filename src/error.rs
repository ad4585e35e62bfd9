use crate::lifecycle::TransitionTicket;

#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No cards available for set '{set_id}': {reason}")]
    DataUnavailable { set_id: String, reason: String },

    #[error("Reveal index {index} is out of range for a pack of {len} cards")]
    InvalidRevealIndex { index: usize, len: usize },

    #[error("Stale transition {ticket:?} discarded (pending: {current:?})")]
    StaleTransition {
        ticket: TransitionTicket,
        current: Option<TransitionTicket>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, PackError>;
