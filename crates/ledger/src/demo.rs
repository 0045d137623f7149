//! Starter dataset for a fresh database.

use serde_json::json;

use smartstock_catalog::{AttributeValue, Category, Product};
use smartstock_store::{Setting, StockStore};

use crate::engine::{LedgerEngine, ProvisionRequest};
use smartstock_inventory::TransactionMeta;

/// Populate an empty store with a small demo catalog, provisioned
/// inventory and default settings. A store that already has products is
/// left untouched.
///
/// Initial stock goes through the engine, so the seeded quantities are
/// fully explained by ledger entries.
pub fn seed_demo_data<S: StockStore>(engine: &LedgerEngine<S>) -> anyhow::Result<()> {
    let store = engine.store();
    if store.product_count()? > 0 {
        return Ok(());
    }

    let electronics = Category::new("Electronics")?
        .with_description("Electronic devices and accessories")
        .with_icon("smartphone");
    let office = Category::new("Office Supplies")?
        .with_description("Office stationery and equipment")
        .with_icon("business_center");
    let household = Category::new("Household Items")?
        .with_description("Daily household products")
        .with_icon("home");
    let electronics_id = store.add_category(electronics)?;
    let office_id = store.add_category(office)?;
    store.add_category(household)?;

    let mut phone = Product::new("iPhone 14 Pro", "IP14P-BLK-128")?;
    phone.description = Some("Apple iPhone 14 Pro 128GB Black".to_string());
    phone.category_id = Some(electronics_id);
    phone.tags = vec!["phone".into(), "apple".into(), "premium".into()];
    phone.barcode = Some("123456789012".to_string());
    phone
        .attributes
        .insert("color".to_string(), AttributeValue::from("Black"));
    phone
        .attributes
        .insert("storage".to_string(), AttributeValue::from("128GB"));
    let phone_id = store.add_product(phone)?;

    let mut chair = Product::new("Office Chair", "OFC-CH-BLK")?;
    chair.description = Some("Ergonomic Office Chair Black".to_string());
    chair.category_id = Some(office_id);
    chair.tags = vec!["furniture".into(), "office".into()];
    chair.barcode = Some("223456789012".to_string());
    chair
        .attributes
        .insert("color".to_string(), AttributeValue::from("Black"));
    chair
        .attributes
        .insert("material".to_string(), AttributeValue::from("Mesh"));
    let chair_id = store.add_product(chair)?;

    engine.provision(
        phone_id,
        ProvisionRequest {
            unit: Some("unit".to_string()),
            location: Some("A-01-01".to_string()),
            min_quantity: Some(3),
            cost_price: Some(69_999),
            selling_price: Some(89_999),
        },
    )?;
    engine.stock_in(phone_id, 10, TransactionMeta::note("Initial inventory"))?;

    engine.provision(
        chair_id,
        ProvisionRequest {
            unit: Some("piece".to_string()),
            location: Some("B-02-03".to_string()),
            min_quantity: Some(2),
            cost_price: Some(2_999),
            selling_price: Some(4_999),
        },
    )?;
    engine.stock_in(chair_id, 5, TransactionMeta::note("Initial inventory"))?;

    for setting in [
        Setting::new("appName", json!("SmartStock")),
        Setting::new("companyName", json!("My Company")),
        Setting::new("currency", json!("USD")),
        Setting::new("theme", json!("light")),
        Setting::new("language", json!("en-US")),
        Setting::new("version", json!("1.0.0")),
    ] {
        store.put_setting(setting)?;
    }

    tracing::info!("seeded demo data: 3 categories, 2 products, 2 stocked records");
    Ok(())
}
