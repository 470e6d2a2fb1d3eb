//! Tokio driver for [`SessionController`].
//!
//! Every operation runs under one mutex, so no caller observes a half-applied
//! transition. Each send spawns a timer task that resolves its ticket after the
//! reply delay; the task handles are kept so pending replies can be flushed or
//! cancelled without waiting.

use std::{collections::HashMap, sync::Arc};

use catalog::Catalog;
use shared::{
    domain::{DetailSection, Product, QuickReply},
    error::{DispatchError, ErrorPayload},
    protocol::{SessionEvent, SessionSnapshot, ViewEvent},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, warn};

use crate::{
    config::SessionSettings,
    response::ResponseSelector,
    view::{ChatPanelView, ProductDetailView},
    PendingReply, ReplyTicket, SessionController,
};

pub struct SessionHandle {
    inner: Mutex<SessionController>,
    timers: Mutex<HashMap<ReplyTicket, JoinHandle<()>>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    pub fn new(catalog: Arc<Catalog>, settings: SessionSettings) -> Arc<Self> {
        Self::from_controller(SessionController::new(catalog, settings))
    }

    pub fn with_selector(
        catalog: Arc<Catalog>,
        settings: SessionSettings,
        selector: ResponseSelector,
    ) -> Arc<Self> {
        Self::from_controller(SessionController::with_selector(catalog, settings, selector))
    }

    pub fn from_controller(controller: SessionController) -> Arc<Self> {
        let (events, _) = broadcast::channel(controller.settings().event_buffer.max(1));
        Arc::new(Self {
            inner: Mutex::new(controller),
            timers: Mutex::new(HashMap::new()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Runs `f` against the controller under the session lock and publishes the
    /// events it produced. Publishing happens before the lock is released so
    /// subscribers see events in the order operations were applied.
    pub async fn with_controller<R>(&self, f: impl FnOnce(&mut SessionController) -> R) -> R {
        let mut guard = self.inner.lock().await;
        let result = f(&mut *guard);
        self.publish(guard.drain_events());
        drop(guard);
        result
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.snapshot()
    }

    pub async fn product_detail_view(&self) -> ProductDetailView {
        self.inner.lock().await.product_detail_view()
    }

    pub async fn chat_panel_view(&self) -> ChatPanelView {
        self.inner.lock().await.chat_panel_view()
    }

    pub async fn pending_replies(&self) -> usize {
        self.inner.lock().await.pending_replies()
    }

    pub async fn select_product(&self, product: &Arc<Product>) {
        self.with_controller(|c| c.select_product(product)).await;
    }

    pub async fn send_message(self: &Arc<Self>, text: impl Into<String>) -> PendingReply {
        let text = text.into();
        // Held across the send so the timer task cannot finish before it is tracked.
        let mut timers = self.timers.lock().await;
        let pending = self.with_controller(|c| c.send_message(text)).await;
        let join = self.spawn_reply_timer(pending);
        timers.insert(pending.ticket, join);
        pending
    }

    pub async fn select_quick_reply(self: &Arc<Self>, reply: &QuickReply) -> PendingReply {
        self.send_message(reply.text.clone()).await
    }

    pub async fn toggle_chat_expanded(&self) {
        self.with_controller(SessionController::toggle_chat_expanded)
            .await;
    }

    pub async fn open_chat(&self) {
        self.with_controller(SessionController::open_chat).await;
    }

    pub async fn close_chat(&self) {
        self.with_controller(SessionController::close_chat).await;
    }

    pub async fn confirm_add_to_cart(&self) {
        self.with_controller(SessionController::confirm_add_to_cart)
            .await;
    }

    pub async fn toggle_section(&self, section: DetailSection) {
        self.with_controller(|c| c.toggle_section(section)).await;
    }

    pub async fn show_image(&self, index: usize) {
        self.with_controller(|c| c.show_image(index)).await;
    }

    /// Stops every timer and delivers the pending replies immediately, in send order.
    pub async fn flush_pending(&self) -> usize {
        let handles: Vec<JoinHandle<()>> = {
            let mut timers = self.timers.lock().await;
            timers.drain().map(|(_, join)| join).collect()
        };
        for join in handles {
            join.abort();
        }
        self.with_controller(SessionController::flush_pending).await
    }

    pub(crate) async fn cancel_reply(&self, ticket: ReplyTicket) -> bool {
        if let Some(join) = self.timers.lock().await.remove(&ticket) {
            join.abort();
        }
        self.with_controller(|c| c.cancel_reply(ticket)).await
    }

    /// Maps a view event onto a session operation. Ids are resolved against the
    /// catalog; unknown ids are rejected and reported to subscribers.
    pub async fn dispatch(
        self: &Arc<Self>,
        event: ViewEvent,
    ) -> Result<Option<PendingReply>, DispatchError> {
        debug!(event = event.name(), "dispatching view event");
        let result = self.apply(event).await;
        if let Err(err) = &result {
            warn!(code = ?err.code, "rejected view event: {}", err.message);
            self.publish(vec![SessionEvent::Rejected {
                error: ErrorPayload::from(err.clone()),
            }]);
        }
        result
    }

    async fn apply(
        self: &Arc<Self>,
        event: ViewEvent,
    ) -> Result<Option<PendingReply>, DispatchError> {
        match event {
            ViewEvent::SelectProduct { product_id } => {
                let product = self
                    .with_controller(|c| c.product(product_id).cloned())
                    .await
                    .ok_or_else(|| {
                        DispatchError::not_found(format!("unknown product {product_id}"))
                    })?;
                self.select_product(&product).await;
                Ok(None)
            }
            ViewEvent::SendMessage { text } => {
                if text.trim().is_empty() {
                    return Err(DispatchError::validation("message text is empty"));
                }
                Ok(Some(self.send_message(text).await))
            }
            ViewEvent::SelectQuickReply { reply_id } => {
                let reply = self
                    .with_controller(|c| c.catalog().quick_reply(reply_id).cloned())
                    .await
                    .ok_or_else(|| {
                        DispatchError::not_found(format!("unknown quick reply {reply_id}"))
                    })?;
                Ok(Some(self.select_quick_reply(&reply).await))
            }
            ViewEvent::ToggleChat => {
                self.toggle_chat_expanded().await;
                Ok(None)
            }
            ViewEvent::OpenChat => {
                self.open_chat().await;
                Ok(None)
            }
            ViewEvent::CloseChat | ViewEvent::ViewProductDetails => {
                self.close_chat().await;
                Ok(None)
            }
            ViewEvent::ConfirmAddToCart => {
                // The add-to-cart button is disabled for wines that are out of stock.
                let product = self.with_controller(|c| Arc::clone(c.current_product())).await;
                if !product.in_stock {
                    return Err(DispatchError::unavailable(format!(
                        "{} is out of stock",
                        product.name
                    )));
                }
                self.confirm_add_to_cart().await;
                Ok(None)
            }
            ViewEvent::ToggleSection { section } => {
                self.toggle_section(section).await;
                Ok(None)
            }
            ViewEvent::ShowImage { index } => {
                self.show_image(index).await;
                Ok(None)
            }
        }
    }

    fn spawn_reply_timer(self: &Arc<Self>, pending: PendingReply) -> JoinHandle<()> {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(pending.delay).await;
            session
                .with_controller(|c| c.resolve_reply(pending.ticket))
                .await;
            session.timers.lock().await.remove(&pending.ticket);
        })
    }

    fn publish(&self, events: Vec<SessionEvent>) {
        for event in events {
            // No subscribers is fine; views may attach later and read a snapshot.
            let _ = self.events.send(event);
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
