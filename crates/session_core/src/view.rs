//! Render-ready projections of the session for the product detail view and the
//! chat panel.

use std::{collections::HashSet, sync::Arc};

use catalog::Catalog;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use shared::domain::{
    format_cents, DetailSection, Message, MessageId, Product, ProductId, QuickReply, Sender,
};

use crate::SessionState;

pub const CHAT_TITLE: &str = "Wine Assistant";
pub const CHAT_SUBTITLE: &str = "Online • Happy to help";
pub const INPUT_PLACEHOLDER: &str = "Ask about wines...";
const VARIETAL_SHORT_LIMIT: usize = 20;

/// Per-product UI state of the detail view. Reset whenever the product changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailViewState {
    expanded: HashSet<DetailSection>,
    image_index: usize,
}

impl Default for DetailViewState {
    fn default() -> Self {
        Self {
            expanded: DetailSection::ALL
                .into_iter()
                .filter(|s| s.expanded_by_default())
                .collect(),
            image_index: 0,
        }
    }
}

impl DetailViewState {
    pub fn is_expanded(&self, section: DetailSection) -> bool {
        self.expanded.contains(&section)
    }

    pub fn image_index(&self) -> usize {
        self.image_index
    }

    pub(crate) fn toggle(&mut self, section: DetailSection) {
        if !self.expanded.remove(&section) {
            self.expanded.insert(section);
        }
    }

    /// Clamps to the last image; a product without images stays at 0.
    pub(crate) fn show_image(&mut self, index: usize, image_count: usize) {
        self.image_index = index.min(image_count.saturating_sub(1));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarRating {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarRating {
    pub fn from_rating(rating: f64) -> Self {
        let clamped = rating.clamp(0.0, 5.0);
        let full = clamped.floor() as u8;
        let half = clamped.fract() != 0.0;
        let empty = 5 - full - u8::from(half);
        Self { full, half, empty }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub section: DetailSection,
    pub title: &'static str,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationCard {
    pub product_id: ProductId,
    pub name: String,
    pub price_label: String,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetailView {
    pub product_id: ProductId,
    pub name: String,
    pub winery: String,
    pub region: String,
    pub vintage: u16,
    pub badges: Vec<String>,
    pub stars: StarRating,
    pub rating_label: String,
    pub price_label: String,
    pub bottle_size: String,
    pub stock_label: String,
    pub varietal_short: String,
    pub abv_label: String,
    pub image_index: usize,
    pub image_count: usize,
    pub sections: Vec<SectionView>,
    pub recommendations: Vec<RecommendationCard>,
    pub add_to_cart_enabled: bool,
    pub add_to_cart_label: &'static str,
    pub share_text: String,
}

impl ProductDetailView {
    pub fn project(
        product: &Product,
        recommendations: &[Arc<Product>],
        detail: &DetailViewState,
    ) -> Self {
        let sections = DetailSection::ALL
            .into_iter()
            .filter(|section| match section {
                DetailSection::ExpertReview => product.expert_review.is_some(),
                DetailSection::Provenance => product.provenance.is_some(),
                _ => true,
            })
            .map(|section| SectionView {
                section,
                title: section.title(),
                expanded: detail.is_expanded(section),
            })
            .collect();

        Self {
            product_id: product.id,
            name: product.name.clone(),
            winery: product.winery.clone(),
            region: product.region.clone(),
            vintage: product.vintage,
            badges: product.badges.clone(),
            stars: StarRating::from_rating(product.rating),
            rating_label: format!("{} ({} reviews)", product.rating, product.review_count),
            price_label: price_label(product.price_cents),
            bottle_size: product.bottle_size.clone(),
            stock_label: stock_label(product),
            varietal_short: short_varietal(&product.varietal),
            abv_label: format!("{}%", product.alcohol_content),
            image_index: detail.image_index(),
            image_count: product.images.len(),
            sections,
            recommendations: recommendations
                .iter()
                .map(|p| RecommendationCard {
                    product_id: p.id,
                    name: p.name.clone(),
                    price_label: price_label(p.price_cents),
                    rating: p.rating,
                })
                .collect(),
            add_to_cart_enabled: product.in_stock,
            add_to_cart_label: if product.in_stock {
                "Add to Cart"
            } else {
                "Out of Stock"
            },
            share_text: share_text(product),
        }
    }
}

pub fn price_label(cents: u64) -> String {
    format!("${}", format_cents(cents))
}

pub fn stock_label(product: &Product) -> String {
    match (product.in_stock, product.stock_count) {
        (false, _) => "Out of Stock".to_string(),
        (true, Some(count)) => format!("In Stock ({count} available)"),
        (true, None) => "In Stock".to_string(),
    }
}

/// Long blend descriptions drop their parenthetical grape list.
pub fn short_varietal(varietal: &str) -> String {
    if varietal.chars().count() <= VARIETAL_SHORT_LIMIT {
        return varietal.to_string();
    }
    match varietal.split_once(" (") {
        Some((head, _)) => head.trim().to_string(),
        None => varietal.to_string(),
    }
}

pub fn share_text(product: &Product) -> String {
    format!(
        "Check out this wine: {} from {}! {} - {}",
        product.name,
        product.winery,
        product.region,
        price_label(product.price_cents)
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRow {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    pub time_label: String,
    /// Set only when the message's product reference resolves in the catalog.
    pub view_details: Option<ProductId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ChatPanelView {
    Minimized {
        title: &'static str,
        badge: &'static str,
    },
    Expanded {
        title: &'static str,
        subtitle: &'static str,
        messages: Vec<MessageRow>,
        typing: bool,
        quick_replies: Vec<QuickReply>,
        placeholder: &'static str,
    },
}

impl ChatPanelView {
    pub fn project(state: &SessionState, catalog: &Catalog) -> Self {
        if !state.chat_expanded {
            return ChatPanelView::Minimized {
                title: CHAT_TITLE,
                badge: "1",
            };
        }

        ChatPanelView::Expanded {
            title: CHAT_TITLE,
            subtitle: CHAT_SUBTITLE,
            messages: state
                .messages
                .iter()
                .map(|message| message_row(message, catalog))
                .collect(),
            typing: state.is_loading,
            quick_replies: catalog.quick_replies().to_vec(),
            placeholder: INPUT_PLACEHOLDER,
        }
    }
}

fn message_row(message: &Message, catalog: &Catalog) -> MessageRow {
    MessageRow {
        id: message.id,
        sender: message.sender,
        text: message.text.clone(),
        time_label: time_label(message.timestamp),
        view_details: message
            .product_reference
            .filter(|id| catalog.contains(*id)),
    }
}

fn time_label(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}
