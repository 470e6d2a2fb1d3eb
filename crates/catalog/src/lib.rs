//! Read-only wine catalog: products, the quick-reply menu and the seed conversation
//! a fresh session starts from.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use shared::domain::{Product, ProductId, QuickReply, QuickReplyId, Sender};
use thiserror::Error;
use tracing::info;

mod fixtures;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog must contain at least one product")]
    Empty,
    #[error("duplicate product id {0}")]
    DuplicateProduct(ProductId),
    #[error("duplicate quick reply id {0}")]
    DuplicateQuickReply(QuickReplyId),
    #[error("product {id} has rating {rating}, expected 0.0..=5.0")]
    RatingOutOfRange { id: ProductId, rating: f64 },
    #[error("product {id} has alcohol content {value}%, expected 0..=100")]
    AlcoholOutOfRange { id: ProductId, value: f64 },
}

/// A message of the conversation every new session opens with. The timestamp is
/// resolved when the session starts, `age_secs` before that moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedMessage {
    pub text: String,
    pub sender: Sender,
    pub age_secs: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_reference: Option<ProductId>,
}

/// On-disk shape of a catalog, as written by `sommelier-tools export`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub products: Vec<Product>,
    pub quick_replies: Vec<QuickReply>,
    #[serde(default)]
    pub seed_conversation: Vec<SeedMessage>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Arc<Product>>,
    quick_replies: Vec<QuickReply>,
    seed_conversation: Vec<SeedMessage>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            products: fixtures::products().into_iter().map(Arc::new).collect(),
            quick_replies: fixtures::quick_replies(),
            seed_conversation: fixtures::seed_conversation(),
        }
    }

    pub fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        validate(&file)?;
        Ok(Self {
            products: file.products.into_iter().map(Arc::new).collect(),
            quick_replies: file.quick_replies,
            seed_conversation: file.seed_conversation,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::from_file(file)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            products = catalog.products.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            products: self.products.iter().map(|p| (**p).clone()).collect(),
            quick_replies: self.quick_replies.clone(),
            seed_conversation: self.seed_conversation.clone(),
        }
    }

    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    pub fn product(&self, id: ProductId) -> Option<&Arc<Product>> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.product(id).is_some()
    }

    /// The product a fresh session shows. Validation guarantees one exists.
    pub fn seed_product(&self) -> &Arc<Product> {
        &self.products[0]
    }

    pub fn quick_replies(&self) -> &[QuickReply] {
        &self.quick_replies
    }

    pub fn quick_reply(&self, id: QuickReplyId) -> Option<&QuickReply> {
        self.quick_replies.iter().find(|r| r.id == id)
    }

    pub fn seed_conversation(&self) -> &[SeedMessage] {
        &self.seed_conversation
    }

    /// Every product except `current`, in catalog order, truncated to `limit`.
    /// Placeholder policy; there is no similarity ranking.
    pub fn recommendations_for(&self, current: ProductId, limit: usize) -> Vec<Arc<Product>> {
        self.products
            .iter()
            .filter(|p| p.id != current)
            .take(limit)
            .cloned()
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate(file: &CatalogFile) -> Result<(), CatalogError> {
    if file.products.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut product_ids = HashSet::new();
    for product in &file.products {
        if !product_ids.insert(product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }
        if !(0.0..=5.0).contains(&product.rating) {
            return Err(CatalogError::RatingOutOfRange {
                id: product.id,
                rating: product.rating,
            });
        }
        if !(0.0..=100.0).contains(&product.alcohol_content) {
            return Err(CatalogError::AlcoholOutOfRange {
                id: product.id,
                value: product.alcohol_content,
            });
        }
    }

    let mut reply_ids = HashSet::new();
    for reply in &file.quick_replies {
        if !reply_ids.insert(reply.id) {
            return Err(CatalogError::DuplicateQuickReply(reply.id));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
