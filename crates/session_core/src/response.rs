//! Canned assistant replies chosen by keyword.
//!
//! A [`ResponseSelector`] is an ordered list of rules evaluated first-match-wins
//! against the user's text, with a fallback for anything unmatched. Selection is
//! pure: no randomness and no state.

use std::sync::Arc;

use shared::domain::Product;

/// Inputs a template can draw on.
pub struct ReplyContext<'a> {
    pub product: &'a Product,
    /// Already excludes `product`.
    pub recommendations: &'a [Arc<Product>],
}

pub type Render = fn(&ReplyContext<'_>) -> String;

#[derive(Clone)]
pub enum Matcher {
    /// Case-insensitive substring test.
    Contains(String),
    /// Receives the lowercased user text.
    Predicate(fn(&str) -> bool),
}

impl Matcher {
    fn matches(&self, lowered: &str) -> bool {
        match self {
            Matcher::Contains(keyword) => lowered.contains(keyword.as_str()),
            Matcher::Predicate(predicate) => predicate(lowered),
        }
    }
}

#[derive(Clone)]
pub struct ResponseRule {
    pub name: &'static str,
    pub matcher: Matcher,
    pub render: Render,
}

impl ResponseRule {
    pub fn keyword(name: &'static str, keyword: &str, render: Render) -> Self {
        Self {
            name,
            matcher: Matcher::Contains(keyword.to_lowercase()),
            render,
        }
    }
}

#[derive(Clone)]
pub struct ResponseSelector {
    rules: Vec<ResponseRule>,
    fallback: Render,
}

impl ResponseSelector {
    pub fn new(fallback: Render) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Rules are tried in insertion order.
    pub fn with_rule(mut self, rule: ResponseRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn builtin() -> Self {
        Self::new(render_fallback)
            .with_rule(ResponseRule::keyword("tell_me_more", "tell me more", render_tell_me_more))
            .with_rule(ResponseRule::keyword("view_details", "view details", render_view_details))
            .with_rule(ResponseRule::keyword("other_options", "other options", render_other_options))
            .with_rule(ResponseRule::keyword("food_pairing", "food pair", render_food_pairing))
    }

    pub fn rules(&self) -> &[ResponseRule] {
        &self.rules
    }

    /// Name of the rule `text` would trigger, `None` for the fallback.
    pub fn matching_rule(&self, text: &str) -> Option<&'static str> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(&lowered))
            .map(|rule| rule.name)
    }

    pub fn select(&self, product: &Product, recommendations: &[Arc<Product>], text: &str) -> String {
        let lowered = text.to_lowercase();
        let ctx = ReplyContext {
            product,
            recommendations,
        };
        let render = self
            .rules
            .iter()
            .find(|rule| rule.matcher.matches(&lowered))
            .map_or(self.fallback, |rule| rule.render);
        render(&ctx)
    }
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn select_response(product: &Product, recommendations: &[Arc<Product>], text: &str) -> String {
    ResponseSelector::builtin().select(product, recommendations, text)
}

fn render_tell_me_more(ctx: &ReplyContext<'_>) -> String {
    let p = ctx.product;
    format!(
        "{} is truly exceptional. {} It's currently priced at ${} and rated {} stars. Would you like to know about its tasting notes or food pairings?",
        p.name,
        p.description,
        p.price_display(),
        p.rating
    )
}

fn render_view_details(ctx: &ReplyContext<'_>) -> String {
    format!(
        "You're already viewing the {}. Feel free to scroll through all the details, or I can answer specific questions about this wine's characteristics, vintage, or perfect occasions to enjoy it!",
        ctx.product.name
    )
}

fn render_other_options(ctx: &ReplyContext<'_>) -> String {
    let names: Vec<&str> = ctx
        .recommendations
        .iter()
        .take(2)
        .map(|p| p.name.as_str())
        .collect();
    if names.is_empty() {
        return format!(
            "Great question! {} is the only wine I can show you right now, so there are no other options to compare it with. Would you like to hear more about its tasting notes or food pairings instead?",
            ctx.product.name
        );
    }
    format!(
        "Great question! Based on {}, I'd recommend checking out {}. They share similar characteristics but each offers a unique experience. Would you like me to explain what makes each special?",
        ctx.product.name,
        names.join(" and ")
    )
}

fn render_food_pairing(ctx: &ReplyContext<'_>) -> String {
    let p = ctx.product;
    let pairings: Vec<&str> = p.pairings.iter().take(3).map(String::as_str).collect();
    format!(
        "{} pairs beautifully with {}. The wine's {} profile complements rich, savory dishes perfectly. Planning a special meal?",
        p.name,
        pairings.join(", "),
        p.varietal
    )
}

fn render_fallback(ctx: &ReplyContext<'_>) -> String {
    format!(
        "That's a great question about {}! Let me help you with that. Would you like to know more about its tasting profile, food pairings, or find similar wines?",
        ctx.product.name
    )
}

#[cfg(test)]
#[path = "tests/response_tests.rs"]
mod tests;
