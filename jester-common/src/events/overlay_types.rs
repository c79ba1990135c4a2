//! Overlay type definitions
//!
//! Blocking overlays interrupt the performance loop until resumed.

use serde::{Deserialize, Serialize};

/// Overlay identity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum OverlayKind {
    /// The predictor was silenced by a content policy
    Speechless,
    /// The joke source could not be reached
    NetworkAwaiting,
}

impl std::fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlayKind::Speechless => write!(f, "speechless"),
            OverlayKind::NetworkAwaiting => write!(f, "networkAwaiting"),
        }
    }
}

/// Overlay flag plus the human-readable status shown with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    pub active: bool,
    pub message: String,
}

impl Overlay {
    pub fn inactive(message: impl Into<String>) -> Self {
        Self {
            active: false,
            message: message.into(),
        }
    }
}
