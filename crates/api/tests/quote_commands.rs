//! Integration tests for quote issuance and revision commands

use chrono::{Datelike, Duration, Utc};
use oficina_api::commands;
use oficina_core::{QuoteFilter, QuoteRevision};
use oficina_domain::{NewQuoteItem, OficinaError, QuoteStatus};
use rust_decimal::Decimal;

mod support;
use support::{quote_draft, seed_client, seed_material, seed_quote, seed_user, setup};

#[tokio::test(flavor = "multi_thread")]
async fn quote_total_is_derived_from_items_and_labor() {
    let app = setup();
    let (quote, ..) = seed_quote(&app).await;

    // 2 x 50.00 + 100.00 labor.
    assert_eq!(quote.total_value, Decimal::new(20_000, 2));
    assert_eq!(quote.labor_value, Decimal::new(10_000, 2));
    assert_eq!(quote.status, QuoteStatus::Pending);
    assert_eq!(quote.number, format!("ORC{}0001", Utc::now().year()));

    let items = commands::get_quote_items(&app.context, quote.id).await.expect("items failed");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].subtotal, Decimal::new(10_000, 2));
}

#[tokio::test(flavor = "multi_thread")]
async fn omitted_unit_price_snapshots_the_catalog_price() {
    let app = setup();
    let user = seed_user(&app).await;
    let client = seed_client(&app, "Ana Souza", "12345678901").await;
    let material = seed_material(&app, "TIN-001", 7_550).await;

    let mut draft = quote_draft(client.id, user.id, material.id);
    draft.items[0].unit_price = None;
    draft.labor_value = Decimal::ZERO;

    let quote = commands::create_quote(&app.context, draft).await.expect("create quote failed");
    // 2 x 75.50 from the catalog.
    assert_eq!(quote.total_value, Decimal::new(15_100, 2));

    let items = commands::get_quote_items(&app.context, quote.id).await.expect("items failed");
    assert_eq!(items[0].unit_price, Decimal::new(7_550, 2));
}

#[tokio::test(flavor = "multi_thread")]
async fn default_validity_window_is_applied() {
    let app = setup();
    let (quote, ..) = seed_quote(&app).await;

    let expected = Utc::now().date_naive() + Duration::days(30);
    assert_eq!(quote.valid_until, expected);
}

#[tokio::test(flavor = "multi_thread")]
async fn quote_input_is_validated_before_anything_is_written() {
    let app = setup();
    let user = seed_user(&app).await;
    let client = seed_client(&app, "Ana Souza", "12345678901").await;
    let material = seed_material(&app, "TIN-001", 5_000).await;

    let mut blank = quote_draft(client.id, user.id, material.id);
    blank.service_description = "   ".to_string();
    let result = commands::create_quote(&app.context, blank).await;
    assert!(matches!(result, Err(OficinaError::Validation(_))));

    let mut negative = quote_draft(client.id, user.id, material.id);
    negative.labor_value = Decimal::new(-1, 2);
    let result = commands::create_quote(&app.context, negative).await;
    assert!(matches!(result, Err(OficinaError::Validation(_))));

    let mut zero_qty = quote_draft(client.id, user.id, material.id);
    zero_qty.items[0].quantity = Decimal::ZERO;
    let result = commands::create_quote(&app.context, zero_qty).await;
    assert!(matches!(result, Err(OficinaError::Validation(_))));

    let orphan = quote_draft(4_242, user.id, material.id);
    let result = commands::create_quote(&app.context, orphan).await;
    assert!(matches!(result, Err(OficinaError::Validation(_))));

    // Nothing got through.
    let page = commands::list_quotes(&app.context, QuoteFilter::default(), 1)
        .await
        .expect("list quotes failed");
    assert_eq!(page.total, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn revision_recomputes_the_total() {
    let app = setup();
    let (quote, _, _, material_id) = seed_quote(&app).await;

    let revision = QuoteRevision {
        service_description: "Funilaria, pintura e polimento".to_string(),
        labor_value: Decimal::new(2_500, 2),
        validity_days: Some(10),
        notes: Some("Cliente aprovou por telefone".to_string()),
        items: vec![NewQuoteItem {
            material_id,
            quantity: Decimal::ONE,
            unit_price: Some(Decimal::new(5_000, 2)),
        }],
    };

    let revised = commands::revise_quote(&app.context, quote.id, revision)
        .await
        .expect("revise quote failed");
    // 1 x 50.00 + 25.00 labor.
    assert_eq!(revised.total_value, Decimal::new(7_500, 2));
    assert_eq!(revised.valid_until, Utc::now().date_naive() + Duration::days(10));

    let items = commands::get_quote_items(&app.context, quote.id).await.expect("items failed");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, Decimal::ONE);
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_filters_by_search_and_status() {
    let app = setup();
    let (quote, ..) = seed_quote(&app).await;
    commands::reject_quote(&app.context, quote.id).await.expect("reject failed");

    let rejected = commands::list_quotes(
        &app.context,
        QuoteFilter { search: None, status: Some(QuoteStatus::Rejected) },
        1,
    )
    .await
    .expect("list quotes failed");
    assert_eq!(rejected.total, 1);
    assert_eq!(rejected.items[0].client_name, "Ana Souza");

    let pending = commands::list_quotes(
        &app.context,
        QuoteFilter { search: None, status: Some(QuoteStatus::Pending) },
        1,
    )
    .await
    .expect("list quotes failed");
    assert_eq!(pending.total, 0);

    let by_number = commands::list_quotes(
        &app.context,
        QuoteFilter { search: Some(quote.number.clone()), status: None },
        1,
    )
    .await
    .expect("list quotes failed");
    assert_eq!(by_number.total, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn pending_quotes_can_be_deleted_accepted_ones_cannot() {
    let app = setup();
    let (quote, client_id, user_id, material_id) = seed_quote(&app).await;

    commands::delete_quote(&app.context, quote.id).await.expect("delete quote failed");
    assert!(matches!(
        commands::get_quote(&app.context, quote.id).await,
        Err(OficinaError::NotFound(_))
    ));

    let quote =
        commands::create_quote(&app.context, quote_draft(client_id, user_id, material_id))
            .await
            .expect("create quote failed");
    commands::accept_quote(&app.context, quote.id).await.expect("accept failed");

    let blocked = commands::delete_quote(&app.context, quote.id).await;
    assert!(matches!(blocked, Err(OficinaError::InvalidTransition(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn referenced_material_cannot_be_deleted() {
    let app = setup();
    let (_, _, _, material_id) = seed_quote(&app).await;

    let blocked = commands::delete_material(&app.context, material_id).await;
    assert!(matches!(blocked, Err(OficinaError::Referenced(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn quote_document_resolves_the_full_aggregate() {
    let app = setup();
    let (quote, ..) = seed_quote(&app).await;

    let document = commands::get_quote_document(&app.context, quote.id)
        .await
        .expect("quote document failed");
    assert_eq!(document.quote.id, quote.id);
    assert_eq!(document.client.name, "Ana Souza");
    assert_eq!(document.issuer.name, "João Mecânico");
    assert_eq!(document.items.len(), 1);
    assert_eq!(document.items[0].material.code, "TIN-001");
}
