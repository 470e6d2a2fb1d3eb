//! Command orchestration from console input to the session.

use std::sync::Arc;

use session_core::{PendingReply, SessionHandle};
use shared::protocol::ViewEvent;

use crate::controller::events::{ConsoleError, ConsoleErrorCategory};

pub async fn dispatch_view_event(
    session: &Arc<SessionHandle>,
    event: ViewEvent,
    status: &mut String,
) -> Option<PendingReply> {
    let name = event.name();
    match session.dispatch(event).await {
        Ok(pending) => {
            tracing::debug!(event = name, "applied view event");
            *status = match &pending {
                Some(pending) => format!(
                    "assistant is typing (reply in {} ms)",
                    pending.delay.as_millis()
                ),
                None => String::new(),
            };
            pending
        }
        Err(err) => {
            *status = status_for(&ConsoleError::from(err));
            None
        }
    }
}

pub fn status_for(err: &ConsoleError) -> String {
    match err.category() {
        ConsoleErrorCategory::Validation => format!("Invalid input: {}", err.message()),
        ConsoleErrorCategory::NotFound => format!("Not found: {}", err.message()),
        ConsoleErrorCategory::Unavailable => {
            format!("Unable to perform action at this time: {}", err.message())
        }
    }
}

#[cfg(test)]
mod tests {
    use catalog::Catalog;
    use session_core::SessionSettings;
    use shared::domain::ProductId;

    use super::*;

    fn session() -> Arc<SessionHandle> {
        SessionHandle::new(Arc::new(Catalog::builtin()), SessionSettings::default())
    }

    #[tokio::test]
    async fn unknown_product_sets_status() {
        let session = session();
        let mut status = String::new();
        let pending = dispatch_view_event(
            &session,
            ViewEvent::SelectProduct {
                product_id: ProductId(77),
            },
            &mut status,
        )
        .await;
        assert!(pending.is_none());
        assert_eq!(status, "Not found: unknown product 77");
    }

    #[tokio::test]
    async fn blank_message_sets_invalid_input_status() {
        let session = session();
        let mut status = String::new();
        let pending = dispatch_view_event(
            &session,
            ViewEvent::SendMessage { text: " ".into() },
            &mut status,
        )
        .await;
        assert!(pending.is_none());
        assert_eq!(status, "Invalid input: message text is empty");
    }

    #[tokio::test]
    async fn sending_reports_typing_status() {
        let session = session();
        let mut status = "stale".to_string();
        let pending = dispatch_view_event(
            &session,
            ViewEvent::SendMessage {
                text: "hello".into(),
            },
            &mut status,
        )
        .await;
        assert!(pending.is_some());
        assert_eq!(status, "assistant is typing (reply in 1500 ms)");

        dispatch_view_event(&session, ViewEvent::OpenChat, &mut status).await;
        assert!(status.is_empty());
        session.flush_pending().await;
    }
}
