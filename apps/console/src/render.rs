//! Plain-text rendering of the two view surfaces.

use std::fmt::Write as _;

use catalog::Catalog;
use session_core::{
    view::{MessageRow, StarRating},
    ChatPanelView, ProductDetailView,
};
use shared::domain::Sender;

pub fn render_product(view: &ProductDetailView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", view.name);
    let _ = writeln!(out, "{} · {} · {}", view.winery, view.region, view.vintage);
    if !view.badges.is_empty() {
        let _ = writeln!(out, "[{}]", view.badges.join("] ["));
    }
    let _ = writeln!(out, "{} {}", stars(view.stars), view.rating_label);
    let _ = writeln!(
        out,
        "{} / {}   {}",
        view.price_label, view.bottle_size, view.stock_label
    );
    let _ = writeln!(
        out,
        "Type: {}   Vintage: {}   ABV: {}",
        view.varietal_short, view.vintage, view.abv_label
    );
    if view.image_count > 0 {
        let _ = writeln!(out, "Image {}/{}", view.image_index + 1, view.image_count);
    }
    for section in &view.sections {
        let marker = if section.expanded { "v" } else { ">" };
        let _ = writeln!(out, "{marker} {}", section.title);
    }
    if !view.recommendations.is_empty() {
        let _ = writeln!(out, "You might also like:");
        for card in &view.recommendations {
            let _ = writeln!(
                out,
                "  #{} {} {} ({})",
                card.product_id, card.name, card.price_label, card.rating
            );
        }
    }
    let _ = write!(out, "[{}]", view.add_to_cart_label);
    out
}

/// Section bodies for the expanded sections of the current product.
pub fn render_section_bodies(view: &ProductDetailView, catalog: &Catalog) -> String {
    use shared::domain::DetailSection;

    let Some(product) = catalog.product(view.product_id) else {
        return String::new();
    };
    let mut out = String::new();
    for section in view.sections.iter().filter(|s| s.expanded) {
        let _ = writeln!(out, "-- {} --", section.title);
        match section.section {
            DetailSection::Description => {
                let _ = writeln!(out, "{}", product.description);
            }
            DetailSection::TastingNotes => {
                for notes in &product.tasting_notes {
                    let _ = writeln!(out, "{}: {}", notes.category, notes.notes.join(", "));
                }
            }
            DetailSection::Pairings => {
                for pairing in &product.pairings {
                    let _ = writeln!(out, "- {pairing}");
                }
            }
            DetailSection::ExpertReview => {
                let _ = writeln!(out, "{}", product.expert_review.as_deref().unwrap_or_default());
            }
            DetailSection::Provenance => {
                let _ = writeln!(out, "{}", product.provenance.as_deref().unwrap_or_default());
            }
        }
    }
    out
}

pub fn render_chat(view: &ChatPanelView) -> String {
    match view {
        ChatPanelView::Minimized { title, badge } => format!("({title} [{badge}]) - type 'open'"),
        ChatPanelView::Expanded {
            title,
            subtitle,
            messages,
            typing,
            quick_replies,
            placeholder,
        } => {
            let mut out = String::new();
            let _ = writeln!(out, "--- {title} ({subtitle}) ---");
            for row in messages {
                let _ = writeln!(out, "{}", render_message(row));
            }
            if *typing {
                let _ = writeln!(out, "  assistant is typing...");
            }
            let chips: Vec<String> = quick_replies
                .iter()
                .map(|reply| format!("{}:{}", reply.id, reply.text))
                .collect();
            let _ = writeln!(out, "quick replies: {}", chips.join(" | "));
            let _ = write!(out, "> {placeholder}");
            out
        }
    }
}

pub fn render_message(row: &MessageRow) -> String {
    let who = match row.sender {
        Sender::User => "you",
        Sender::Assistant => "assistant",
    };
    let mut line = format!("[{}] {who}: {}", row.time_label, row.text);
    if let Some(product_id) = row.view_details {
        let _ = write!(line, " (View Wine Details: select {product_id})");
    }
    line
}

fn stars(rating: StarRating) -> String {
    let mut out = "*".repeat(rating.full as usize);
    if rating.half {
        out.push('+');
    }
    out.push_str(&".".repeat(rating.empty as usize));
    out
}
