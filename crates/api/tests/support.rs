//! Shared helpers for the command integration tests

#![allow(dead_code)]

use std::sync::Arc;

use oficina_api::{commands, AppContext};
use oficina_domain::{
    Client, Config, DatabaseConfig, Material, NewClient, NewMaterial, NewQuote, NewQuoteItem,
    NewUser, Quote, User,
};
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Fully wired application over a throwaway database file.
pub struct TestApp {
    pub context: Arc<AppContext>,
    /// Keep the temporary directory alive for the lifetime of the app.
    _dir: TempDir,
}

/// Create a new test application with fresh database state.
pub fn setup() -> TestApp {
    let dir = TempDir::new().expect("failed to create temporary directory");
    let db_path = dir.path().join("oficina.db");

    let config = Config {
        database: DatabaseConfig { path: db_path.to_string_lossy().to_string(), pool_size: 4 },
        ..Config::default()
    };

    let context = AppContext::new_with_config(config).expect("failed to initialise AppContext");
    TestApp { context: Arc::new(context), _dir: dir }
}

/// Register the standard issuing user.
pub async fn seed_user(app: &TestApp) -> User {
    commands::register_user(
        &app.context,
        NewUser { name: "João Mecânico".to_string(), email: "joao@oficina.com".to_string() },
    )
    .await
    .expect("failed to register user")
}

/// Register a client with only the required fields filled in.
pub async fn seed_client(app: &TestApp, name: &str, tax_id: &str) -> Client {
    commands::create_client(&app.context, new_client(name, tax_id))
        .await
        .expect("failed to create client")
}

/// Register a material priced in whole cents.
pub async fn seed_material(app: &TestApp, code: &str, price_cents: i64) -> Material {
    commands::create_material(
        &app.context,
        NewMaterial {
            name: format!("Material {code}"),
            description: None,
            code: code.to_string(),
            unit_price: Decimal::new(price_cents, 2),
            stock_qty: 10,
            min_stock_qty: 2,
            unit: None,
        },
    )
    .await
    .expect("failed to create material")
}

/// Bare client input; optional contact fields left empty.
pub fn new_client(name: &str, tax_id: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        tax_id: tax_id.to_string(),
        phone: None,
        email: None,
        address: None,
        city: None,
        state: None,
        postal_code: None,
    }
}

/// Quote draft: two units of `material_id` at 50.00 plus 100.00 labor,
/// totalling 200.00.
pub fn quote_draft(client_id: i64, user_id: i64, material_id: i64) -> NewQuote {
    NewQuote {
        client_id,
        user_id,
        service_description: "Funilaria e pintura".to_string(),
        labor_value: Decimal::new(10_000, 2),
        validity_days: None,
        notes: None,
        items: vec![NewQuoteItem {
            material_id,
            quantity: Decimal::TWO,
            unit_price: Some(Decimal::new(5_000, 2)),
        }],
    }
}

/// Issue the standard 200.00 quote against freshly seeded entities.
/// Returns the quote plus the (client, user, material) ids behind it.
pub async fn seed_quote(app: &TestApp) -> (Quote, i64, i64, i64) {
    let user = seed_user(app).await;
    let client = seed_client(app, "Ana Souza", "12345678901").await;
    let material = seed_material(app, "TIN-001", 5_000).await;
    let quote = commands::create_quote(&app.context, quote_draft(client.id, user.id, material.id))
        .await
        .expect("failed to create quote");
    (quote, client.id, user.id, material.id)
}
