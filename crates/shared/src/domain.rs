use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ProductId);
id_newtype!(MessageId);
id_newtype!(QuickReplyId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TastingNotes {
    pub category: String,
    pub notes: Vec<String>,
}

/// A catalog wine. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub winery: String,
    pub region: String,
    pub vintage: u16,
    pub price_cents: u64,
    pub rating: f64,
    pub review_count: u32,
    #[serde(default)]
    pub images: Vec<String>,
    pub in_stock: bool,
    /// `None` means stock is not tracked for this product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_count: Option<u32>,
    pub description: String,
    #[serde(default)]
    pub tasting_notes: Vec<TastingNotes>,
    #[serde(default)]
    pub pairings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expert_review: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
    #[serde(default)]
    pub badges: Vec<String>,
    pub varietal: String,
    pub alcohol_content: f64,
    pub bottle_size: String,
}

impl Product {
    /// Price with exactly two decimal digits and no currency sign, e.g. `899.99`.
    pub fn price_display(&self) -> String {
        format_cents(self.price_cents)
    }
}

pub fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub id: QuickReplyId,
    pub text: String,
}

/// One entry of the chat log. Entries are never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// Weak lookup key into the catalog; a dangling id renders as no link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_reference: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_typing: Option<bool>,
}

impl Message {
    pub fn user(id: MessageId, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::User,
            timestamp,
            product_reference: None,
            is_typing: None,
        }
    }

    pub fn assistant(id: MessageId, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::Assistant,
            timestamp,
            product_reference: None,
            is_typing: None,
        }
    }

    pub fn with_product_reference(mut self, product_id: ProductId) -> Self {
        self.product_reference = Some(product_id);
        self
    }
}

/// Collapsible sections of the product detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailSection {
    Description,
    TastingNotes,
    Pairings,
    ExpertReview,
    Provenance,
}

impl DetailSection {
    pub const ALL: [DetailSection; 5] = [
        DetailSection::Description,
        DetailSection::TastingNotes,
        DetailSection::Pairings,
        DetailSection::ExpertReview,
        DetailSection::Provenance,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DetailSection::Description => "Description",
            DetailSection::TastingNotes => "Tasting Notes",
            DetailSection::Pairings => "Food Pairings",
            DetailSection::ExpertReview => "Expert Review",
            DetailSection::Provenance => "Provenance",
        }
    }

    pub fn expanded_by_default(self) -> bool {
        matches!(self, DetailSection::Description | DetailSection::TastingNotes)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "description" => Some(DetailSection::Description),
            "tasting_notes" | "tasting" => Some(DetailSection::TastingNotes),
            "pairings" | "food_pairings" => Some(DetailSection::Pairings),
            "expert_review" | "review" => Some(DetailSection::ExpertReview),
            "provenance" => Some(DetailSection::Provenance),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_price_with_two_decimal_digits() {
        assert_eq!(format_cents(89_999), "899.99");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(120_000), "1200.00");
    }

    #[test]
    fn parses_section_names_leniently() {
        assert_eq!(
            DetailSection::parse("Tasting Notes"),
            Some(DetailSection::TastingNotes)
        );
        assert_eq!(
            DetailSection::parse("expert-review"),
            Some(DetailSection::ExpertReview)
        );
        assert_eq!(DetailSection::parse("vintage"), None);
    }
}
