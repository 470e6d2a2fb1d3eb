use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use catalog::Catalog;
use clap::{Parser, Subcommand};
use session_core::{view::ProductDetailView, DetailViewState, ResponseSelector};
use shared::domain::ProductId;

#[derive(Parser, Debug)]
#[command(name = "sommelier-tools", about = "Inspect and export the wine catalog")]
struct Cli {
    /// Catalog JSON file; the built-in catalog is used when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[arg(long, default_value_t = 2)]
    recommendation_limit: usize,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    ListProducts,
    ShowProduct {
        product_id: i64,
    },
    QuickReplies,
    /// Writes the catalog as JSON, to stdout unless an output path is given.
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Shows which reply rule fires for `text` and the reply it produces.
    Ask {
        product_id: i64,
        text: String,
    },
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display())),
        None => Ok(Catalog::builtin()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog.as_deref())?;

    match cli.command {
        Command::ListProducts => {
            for product in catalog.products() {
                println!(
                    "{}\t{}\t${}\t{}",
                    product.id,
                    product.name,
                    product.price_display(),
                    product.rating
                );
            }
        }
        Command::ShowProduct { product_id } => {
            let product = catalog
                .product(ProductId(product_id))
                .ok_or_else(|| anyhow!("no product with id {product_id}"))?;
            let recommendations =
                catalog.recommendations_for(product.id, cli.recommendation_limit);
            let view =
                ProductDetailView::project(product, &recommendations, &DetailViewState::default());
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Command::QuickReplies => {
            for reply in catalog.quick_replies() {
                println!("{}\t{}", reply.id, reply.text);
            }
        }
        Command::Export { output } => {
            let raw = serde_json::to_string_pretty(&catalog.to_file())?;
            match output {
                Some(path) => {
                    fs::write(&path, raw)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("exported {} products to {}", catalog.products().len(), path.display());
                }
                None => println!("{raw}"),
            }
        }
        Command::Ask { product_id, text } => {
            let product = catalog
                .product(ProductId(product_id))
                .ok_or_else(|| anyhow!("no product with id {product_id}"))?;
            let recommendations =
                catalog.recommendations_for(product.id, cli.recommendation_limit);
            let selector = ResponseSelector::builtin();
            println!(
                "rule: {}",
                selector.matching_rule(&text).unwrap_or("fallback")
            );
            println!("{}", selector.select(product, &recommendations, &text));
        }
    }

    Ok(())
}
