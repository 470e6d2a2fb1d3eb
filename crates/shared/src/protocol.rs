use serde::{Deserialize, Serialize};

use crate::{
    domain::{DetailSection, Message, Product, ProductId, QuickReply, QuickReplyId, SessionId},
    error::ErrorPayload,
};

/// Events a presentation surface sends into the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ViewEvent {
    SelectProduct { product_id: ProductId },
    SendMessage { text: String },
    SelectQuickReply { reply_id: QuickReplyId },
    ToggleChat,
    OpenChat,
    CloseChat,
    ConfirmAddToCart,
    ViewProductDetails,
    ToggleSection { section: DetailSection },
    ShowImage { index: usize },
}

impl ViewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ViewEvent::SelectProduct { .. } => "select_product",
            ViewEvent::SendMessage { .. } => "send_message",
            ViewEvent::SelectQuickReply { .. } => "select_quick_reply",
            ViewEvent::ToggleChat => "toggle_chat",
            ViewEvent::OpenChat => "open_chat",
            ViewEvent::CloseChat => "close_chat",
            ViewEvent::ConfirmAddToCart => "confirm_add_to_cart",
            ViewEvent::ViewProductDetails => "view_product_details",
            ViewEvent::ToggleSection { .. } => "toggle_section",
            ViewEvent::ShowImage { .. } => "show_image",
        }
    }
}

/// State changes published to observers, in the order they were applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SessionEvent {
    ProductSelected { product_id: ProductId },
    LogReset { messages: Vec<Message> },
    MessageAppended { message: Message },
    ChatExpansionChanged { expanded: bool },
    LoadingChanged { is_loading: bool },
    DetailViewChanged,
    Rejected { error: ErrorPayload },
}

/// Everything a view surface needs to render the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub current_product: Product,
    pub recommendations: Vec<Product>,
    pub messages: Vec<Message>,
    pub chat_expanded: bool,
    pub is_loading: bool,
    pub quick_replies: Vec<QuickReply>,
}
