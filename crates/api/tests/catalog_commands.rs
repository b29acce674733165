//! Integration tests for the client and material catalog commands

use oficina_api::commands;
use oficina_domain::{NewMaterial, OficinaError};
use rust_decimal::Decimal;

mod support;
use support::{new_client, seed_client, seed_material, setup};

#[tokio::test(flavor = "multi_thread")]
async fn client_tax_id_is_canonicalized_and_unique() {
    let app = setup();

    let client = commands::create_client(&app.context, new_client("Ana Souza", "123.456.789-01"))
        .await
        .expect("create client failed");
    assert_eq!(client.tax_id, "12345678901");

    // Same digits under different punctuation is the same registration.
    let duplicate =
        commands::create_client(&app.context, new_client("Outra Ana", "12345678901")).await;
    assert!(matches!(duplicate, Err(OficinaError::Conflict(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn client_update_keeps_the_tax_id_rules() {
    let app = setup();
    let first = seed_client(&app, "Ana Souza", "12345678901").await;
    let second = seed_client(&app, "Bruno Lima", "98765432100").await;

    let mut input = new_client("Bruno Lima", &first.tax_id);
    input.phone = Some("(11) 98888-7777".to_string());
    let taken = commands::update_client(&app.context, second.id, input).await;
    assert!(matches!(taken, Err(OficinaError::Conflict(_))));

    let mut input = new_client("Bruno Lima Filho", &second.tax_id);
    input.city = Some("São Paulo".to_string());
    let updated = commands::update_client(&app.context, second.id, input)
        .await
        .expect("update client failed");
    assert_eq!(updated.name, "Bruno Lima Filho");
    assert_eq!(updated.city.as_deref(), Some("São Paulo"));
}

#[tokio::test(flavor = "multi_thread")]
async fn client_listing_searches_across_contact_fields() {
    let app = setup();
    seed_client(&app, "Ana Souza", "12345678901").await;
    seed_client(&app, "Bruno Lima", "98765432100").await;

    let by_name = commands::list_clients(&app.context, Some("Souza"), 1)
        .await
        .expect("list clients failed");
    assert_eq!(by_name.total, 1);
    assert_eq!(by_name.items[0].name, "Ana Souza");

    let by_tax_id = commands::list_clients(&app.context, Some("98765"), 1)
        .await
        .expect("list clients failed");
    assert_eq!(by_tax_id.total, 1);
    assert_eq!(by_tax_id.items[0].name, "Bruno Lima");

    let everyone = commands::list_clients(&app.context, None, 1).await.expect("list failed");
    assert_eq!(everyone.total, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn quick_search_ignores_short_terms() {
    let app = setup();
    seed_client(&app, "Ana Souza", "12345678901").await;

    let short = commands::search_clients(&app.context, "A").await.expect("search failed");
    assert!(short.is_empty());

    let hits = commands::search_clients(&app.context, "An").await.expect("search failed");
    assert_eq!(hits.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn material_codes_are_unique() {
    let app = setup();
    seed_material(&app, "TIN-001", 5_000).await;

    let duplicate = commands::create_material(
        &app.context,
        NewMaterial {
            name: "Tinta PU outra marca".to_string(),
            description: None,
            code: "TIN-001".to_string(),
            unit_price: Decimal::new(6_000, 2),
            stock_qty: 0,
            min_stock_qty: 0,
            unit: None,
        },
    )
    .await;
    assert!(matches!(duplicate, Err(OficinaError::Conflict(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn stock_adjustment_rejects_negative_quantities() {
    let app = setup();
    let material = seed_material(&app, "TIN-001", 5_000).await;

    let updated = commands::adjust_stock(&app.context, material.id, 25)
        .await
        .expect("adjust stock failed");
    assert_eq!(updated.stock_qty, 25);

    let negative = commands::adjust_stock(&app.context, material.id, -1).await;
    assert!(matches!(negative, Err(OficinaError::Validation(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn unreferenced_material_can_be_deleted() {
    let app = setup();
    let material = seed_material(&app, "TIN-001", 5_000).await;

    commands::delete_material(&app.context, material.id).await.expect("delete material failed");

    let gone = commands::get_material(&app.context, material.id).await;
    assert!(matches!(gone, Err(OficinaError::NotFound(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_entities_surface_not_found() {
    let app = setup();

    assert!(matches!(
        commands::get_client(&app.context, 4_242).await,
        Err(OficinaError::NotFound(_))
    ));
    assert!(matches!(
        commands::get_material(&app.context, 4_242).await,
        Err(OficinaError::NotFound(_))
    ));
}
