//! Session state for the wine detail screen and its assistant chat.
//!
//! [`SessionController`] is the synchronous core: it owns the current product,
//! the message log and the UI flags, and queues assistant replies as tickets.
//! [`runtime::SessionHandle`] drives it on tokio, firing each ticket after the
//! configured reply delay.

use std::{collections::VecDeque, sync::Arc, time::Duration};

use catalog::Catalog;
use chrono::Utc;
use shared::{
    domain::{DetailSection, Message, MessageId, Product, ProductId, QuickReply, SessionId},
    protocol::{SessionEvent, SessionSnapshot},
};
use tracing::{debug, info};

pub mod config;
pub mod response;
pub mod runtime;
pub mod view;

pub use config::{load_settings, load_settings_from, LoadingPolicy, SessionSettings, SettingsError};
pub use response::{select_response, ResponseRule, ResponseSelector};
pub use runtime::SessionHandle;
pub use view::{ChatPanelView, DetailViewState, ProductDetailView};

const PRODUCT_GREETING_AGE_SECS: i64 = 30;
const PRODUCT_INTRO_AGE_SECS: i64 = 10;

/// Identifies one scheduled assistant reply. Tickets increase in send order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReplyTicket(pub u64);

/// Returned by a send: the reply will be appended once `delay` elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReply {
    pub ticket: ReplyTicket,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
struct QueuedReply {
    ticket: ReplyTicket,
    text: String,
}

/// The mutable aggregate every operation works on.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub current_product: Arc<Product>,
    pub messages: Vec<Message>,
    pub chat_expanded: bool,
    pub is_loading: bool,
}

pub struct SessionController {
    id: SessionId,
    catalog: Arc<Catalog>,
    selector: ResponseSelector,
    settings: SessionSettings,
    state: SessionState,
    detail: DetailViewState,
    next_message_id: i64,
    next_ticket: u64,
    pending: VecDeque<QueuedReply>,
    outbox: Vec<SessionEvent>,
}

impl SessionController {
    /// Starts on the catalog's seed product with its seed conversation.
    pub fn new(catalog: Arc<Catalog>, settings: SessionSettings) -> Self {
        Self::with_selector(catalog, settings, ResponseSelector::builtin())
    }

    pub fn with_selector(
        catalog: Arc<Catalog>,
        settings: SessionSettings,
        selector: ResponseSelector,
    ) -> Self {
        let current_product = Arc::clone(catalog.seed_product());
        let mut controller = Self {
            id: SessionId::new(),
            catalog,
            selector,
            settings,
            state: SessionState {
                current_product,
                messages: Vec::new(),
                chat_expanded: false,
                is_loading: false,
            },
            detail: DetailViewState::default(),
            next_message_id: 1,
            next_ticket: 1,
            pending: VecDeque::new(),
            outbox: Vec::new(),
        };

        let now = Utc::now();
        let seed: Vec<Message> = controller
            .catalog
            .seed_conversation()
            .to_vec()
            .into_iter()
            .map(|entry| {
                let id = controller.allocate_message_id();
                Message {
                    id,
                    text: entry.text,
                    sender: entry.sender,
                    timestamp: now - chrono::Duration::seconds(entry.age_secs),
                    product_reference: entry.product_reference,
                    is_typing: None,
                }
            })
            .collect();
        controller.state.messages = seed;
        controller
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_product(&self) -> &Arc<Product> {
        &self.state.current_product
    }

    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    pub fn is_chat_expanded(&self) -> bool {
        self.state.chat_expanded
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn detail(&self) -> &DetailViewState {
        &self.detail
    }

    pub fn pending_replies(&self) -> usize {
        self.pending.len()
    }

    pub fn quick_replies(&self) -> &[QuickReply] {
        self.catalog.quick_replies()
    }

    /// Every other catalog product, in catalog order, up to the configured limit.
    pub fn recommendations(&self) -> Vec<Arc<Product>> {
        self.catalog
            .recommendations_for(self.state.current_product.id, self.settings.recommendation_limit)
    }

    /// Switches product and discards the conversation: the log becomes a fresh
    /// two-message greeting and the chat collapses. Pending replies still land.
    pub fn select_product(&mut self, product: &Arc<Product>) {
        let now = Utc::now();
        let greeting = Message::assistant(
            self.allocate_message_id(),
            "Hello! I'm your wine assistant. How can I help you with this wine today?",
            now - chrono::Duration::seconds(PRODUCT_GREETING_AGE_SECS),
        );
        let intro = Message::assistant(
            self.allocate_message_id(),
            format!(
                "I see you're interested in {}. This is an excellent choice! Would you like to know more about its characteristics or find the perfect food pairing?",
                product.name
            ),
            now - chrono::Duration::seconds(PRODUCT_INTRO_AGE_SECS),
        );

        self.state.current_product = Arc::clone(product);
        self.state.messages = vec![greeting, intro];
        self.detail = DetailViewState::default();
        info!(session = %self.id, product_id = %product.id, "selected product; chat context reset");

        self.outbox.push(SessionEvent::ProductSelected {
            product_id: product.id,
        });
        self.outbox.push(SessionEvent::LogReset {
            messages: self.state.messages.clone(),
        });
        self.set_chat_expanded(false);
    }

    /// Appends the user's message verbatim and queues one assistant reply. The
    /// reply text is fixed now, against the product shown at send time.
    pub fn send_message(&mut self, text: impl Into<String>) -> PendingReply {
        let text = text.into();
        let message = Message::user(self.allocate_message_id(), text.clone(), Utc::now());
        self.append(message);

        let recommendations = self.recommendations();
        let reply_text =
            self.selector
                .select(&self.state.current_product, &recommendations, &text);

        let ticket = ReplyTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.push_back(QueuedReply {
            ticket,
            text: reply_text,
        });
        debug!(
            session = %self.id,
            ticket = ticket.0,
            pending = self.pending.len(),
            "queued assistant reply"
        );
        self.set_loading(true);

        PendingReply {
            ticket,
            delay: self.settings.reply_delay(),
        }
    }

    pub fn select_quick_reply(&mut self, reply: &QuickReply) -> PendingReply {
        self.send_message(reply.text.clone())
    }

    /// Appends every queued reply up to and including `ticket`, oldest first, and
    /// returns the ids of the appended messages. Unknown tickets append nothing.
    pub fn resolve_reply(&mut self, ticket: ReplyTicket) -> Vec<MessageId> {
        if !self.pending.iter().any(|queued| queued.ticket == ticket) {
            return Vec::new();
        }

        let mut appended = Vec::new();
        while let Some(queued) = self.pending.pop_front() {
            let id = self.allocate_message_id();
            self.append(Message::assistant(id, queued.text, Utc::now()));
            appended.push(id);
            debug!(session = %self.id, ticket = queued.ticket.0, "assistant reply delivered");

            let is_loading = self.loading_after_reply();
            self.set_loading(is_loading);

            if queued.ticket == ticket {
                break;
            }
        }
        appended
    }

    /// Resolves every queued reply in send order.
    pub fn flush_pending(&mut self) -> usize {
        match self.pending.back().map(|queued| queued.ticket) {
            Some(last) => self.resolve_reply(last).len(),
            None => 0,
        }
    }

    /// Drops a queued reply without appending it.
    pub(crate) fn cancel_reply(&mut self, ticket: ReplyTicket) -> bool {
        let before = self.pending.len();
        self.pending.retain(|queued| queued.ticket != ticket);
        let cancelled = self.pending.len() != before;
        if cancelled {
            debug!(session = %self.id, ticket = ticket.0, "assistant reply cancelled");
            let is_loading = self.loading_after_reply();
            self.set_loading(is_loading);
        }
        cancelled
    }

    pub fn toggle_chat_expanded(&mut self) {
        let expanded = !self.state.chat_expanded;
        self.set_chat_expanded(expanded);
    }

    pub fn open_chat(&mut self) {
        self.set_chat_expanded(true);
    }

    pub fn close_chat(&mut self) {
        self.set_chat_expanded(false);
    }

    /// Acknowledges the add-to-cart action in the chat. Stock is untouched.
    pub fn confirm_add_to_cart(&mut self) {
        let text = format!(
            "Great choice! I've added {} to your cart. Would you like me to suggest wines for your next course?",
            self.state.current_product.name
        );
        let message = Message::assistant(self.allocate_message_id(), text, Utc::now());
        self.append(message);
        info!(
            session = %self.id,
            product_id = %self.state.current_product.id,
            "add to cart acknowledged"
        );
        self.set_chat_expanded(true);
    }

    pub fn toggle_section(&mut self, section: DetailSection) {
        self.detail.toggle(section);
        self.outbox.push(SessionEvent::DetailViewChanged);
    }

    pub fn show_image(&mut self, index: usize) {
        let count = self.state.current_product.images.len();
        self.detail.show_image(index, count);
        self.outbox.push(SessionEvent::DetailViewChanged);
    }

    pub fn product(&self, id: ProductId) -> Option<&Arc<Product>> {
        self.catalog.product(id)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            current_product: (*self.state.current_product).clone(),
            recommendations: self
                .recommendations()
                .iter()
                .map(|p| (**p).clone())
                .collect(),
            messages: self.state.messages.clone(),
            chat_expanded: self.state.chat_expanded,
            is_loading: self.state.is_loading,
            quick_replies: self.catalog.quick_replies().to_vec(),
        }
    }

    pub fn product_detail_view(&self) -> ProductDetailView {
        ProductDetailView::project(
            &self.state.current_product,
            &self.recommendations(),
            &self.detail,
        )
    }

    pub fn chat_panel_view(&self) -> ChatPanelView {
        ChatPanelView::project(&self.state, &self.catalog)
    }

    /// Events produced since the last drain, in application order.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn allocate_message_id(&mut self) -> MessageId {
        let id = MessageId(self.next_message_id);
        self.next_message_id += 1;
        id
    }

    fn append(&mut self, message: Message) {
        self.state.messages.push(message.clone());
        self.outbox.push(SessionEvent::MessageAppended { message });
    }

    fn set_chat_expanded(&mut self, expanded: bool) {
        self.state.chat_expanded = expanded;
        self.outbox
            .push(SessionEvent::ChatExpansionChanged { expanded });
    }

    /// Loading flag once a queued reply has left the queue.
    fn loading_after_reply(&self) -> bool {
        match self.settings.loading_policy {
            LoadingPolicy::LastReplyClears => false,
            LoadingPolicy::Outstanding => !self.pending.is_empty(),
        }
    }

    fn set_loading(&mut self, is_loading: bool) {
        self.state.is_loading = is_loading;
        self.outbox.push(SessionEvent::LoadingChanged { is_loading });
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
