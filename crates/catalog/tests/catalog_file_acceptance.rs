use std::fs;

use catalog::{Catalog, CatalogError};
use shared::domain::ProductId;

#[test]
fn exported_catalog_file_loads_with_minimal_optional_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.json");

    let raw = r#"{
        "products": [{
            "id": 10,
            "name": "Test Riesling 2021",
            "winery": "Test Estate",
            "region": "Mosel, Germany",
            "vintage": 2021,
            "price_cents": 2450,
            "rating": 4.1,
            "review_count": 3,
            "in_stock": false,
            "description": "Bright and off-dry.",
            "varietal": "Riesling",
            "alcohol_content": 9.5,
            "bottle_size": "750ml"
        }],
        "quick_replies": [{ "id": 1, "text": "Tell me more" }]
    }"#;
    fs::write(&path, raw).expect("write catalog");

    let catalog = Catalog::load(&path).expect("load catalog");
    let product = catalog.seed_product();
    assert_eq!(product.id, ProductId(10));
    assert_eq!(product.price_display(), "24.50");
    assert!(product.pairings.is_empty());
    assert!(product.stock_count.is_none());
    assert!(catalog.seed_conversation().is_empty());
    assert!(catalog.recommendations_for(product.id, 2).is_empty());
}

#[test]
fn builtin_catalog_survives_export_and_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("export.json");

    let exported = serde_json::to_string_pretty(&Catalog::builtin().to_file()).expect("export");
    fs::write(&path, exported).expect("write export");

    let reloaded = Catalog::load(&path).expect("reload");
    assert_eq!(reloaded.products().len(), 4);
    assert_eq!(reloaded.quick_replies().len(), 4);
    assert_eq!(reloaded.seed_conversation().len(), 5);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.json");
    let err = Catalog::load(&path).expect_err("missing file");
    assert!(matches!(err, CatalogError::Read { .. }));
    assert!(err.to_string().contains("absent.json"));
}
