//! One-shot flash messages carried in the session.
//!
//! A message pushed while handling one request is shown on the next rendered
//! page and then discarded.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session::keys;

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Warning,
    Error,
}

impl FlashLevel {
    /// CSS modifier class for the message banner.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "flash-success",
            Self::Warning => "flash-warning",
            Self::Error => "flash-error",
        }
    }
}

/// A message waiting to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

impl FlashMessage {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            text: text.into(),
        }
    }
}

/// Queue a message for the next rendered page.
///
/// Session store failures are logged and the message is dropped; a lost
/// flash never fails the request.
pub async fn push_flash(session: &Session, message: FlashMessage) {
    let mut pending = session
        .get::<Vec<FlashMessage>>(keys::FLASH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    pending.push(message);

    if let Err(e) = session.insert(keys::FLASH, pending).await {
        tracing::warn!(error = %e, "Failed to store flash message");
    }
}

/// Take every pending message, leaving none behind.
pub async fn take_flashes(session: &Session) -> Vec<FlashMessage> {
    match session.remove::<Vec<FlashMessage>>(keys::FLASH).await {
        Ok(messages) => messages.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash messages");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_flashes_are_consumed_once() {
        let session = session();
        push_flash(&session, FlashMessage::success("Saved")).await;
        push_flash(&session, FlashMessage::error("Upstream said no")).await;

        let messages = take_flashes(&session).await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].level, FlashLevel::Success);
        assert_eq!(messages[1].text, "Upstream said no");

        assert!(take_flashes(&session).await.is_empty());
    }

    #[test]
    fn test_css_class() {
        assert_eq!(FlashLevel::Warning.css_class(), "flash-warning");
    }
}
