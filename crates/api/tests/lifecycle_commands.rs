//! Integration tests for the quote-to-invoice pipeline commands

use chrono::{Datelike, Utc};
use oficina_api::commands;
use oficina_domain::{
    ContractStatus, InvoiceStatus, OficinaError, QuoteStatus, ServiceOrderStatus,
};
use rust_decimal::Decimal;

mod support;
use support::{quote_draft, seed_client, seed_material, seed_quote, seed_user, setup};

#[tokio::test(flavor = "multi_thread")]
async fn full_pipeline_from_quote_to_invoice() {
    let app = setup();
    let year = Utc::now().year();

    let user = seed_user(&app).await;
    let client = seed_client(&app, "Ana", "12345678901").await;
    let material = seed_material(&app, "M1", 5_000).await;

    let quote = commands::create_quote(&app.context, quote_draft(client.id, user.id, material.id))
        .await
        .expect("create quote failed");
    assert_eq!(quote.number, format!("ORC{year}0001"));
    assert_eq!(quote.total_value, Decimal::new(20_000, 2));

    let accepted = commands::accept_quote(&app.context, quote.id).await.expect("accept failed");
    assert_eq!(accepted.quote.status, QuoteStatus::Accepted);
    assert_eq!(accepted.order.number, format!("OS{year}0001"));
    assert_eq!(accepted.order.status, ServiceOrderStatus::Created);
    assert_eq!(accepted.contract.number, format!("CT{year}0001"));
    assert_eq!(accepted.contract.order_id, accepted.order.id);
    assert!(accepted.contract.terms.contains("Oficina"));

    let started =
        commands::start_order(&app.context, accepted.order.id).await.expect("start failed");
    assert_eq!(started.status, ServiceOrderStatus::InProgress);
    assert!(started.started_at.is_some());

    let completed = commands::complete_order(
        &app.context,
        accepted.order.id,
        Some("serviço entregue".to_string()),
    )
    .await
    .expect("complete failed");
    assert_eq!(completed.order.status, ServiceOrderStatus::Completed);
    assert_eq!(completed.invoice.number, format!("NF{year}0001"));
    assert_eq!(completed.invoice.total_value, Decimal::new(20_000, 2));
    assert!(completed
        .order
        .notes
        .as_deref()
        .is_some_and(|notes| notes.contains("Conclusão: serviço entregue")));
}

#[tokio::test(flavor = "multi_thread")]
async fn completing_twice_cannot_issue_a_second_invoice() {
    let app = setup();
    let (quote, ..) = seed_quote(&app).await;

    let accepted = commands::accept_quote(&app.context, quote.id).await.expect("accept failed");
    commands::start_order(&app.context, accepted.order.id).await.expect("start failed");
    commands::complete_order(&app.context, accepted.order.id, None)
        .await
        .expect("complete failed");

    let again = commands::complete_order(&app.context, accepted.order.id, None).await;
    assert!(matches!(again, Err(OficinaError::InvalidTransition(_))));

    let invoices = commands::list_invoices(&app.context, Default::default(), 1)
        .await
        .expect("list invoices failed");
    assert_eq!(invoices.total, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn decided_quotes_cannot_be_decided_again() {
    let app = setup();
    let (quote, ..) = seed_quote(&app).await;

    let rejected = commands::reject_quote(&app.context, quote.id).await.expect("reject failed");
    assert_eq!(rejected.status, QuoteStatus::Rejected);

    let accept_after = commands::accept_quote(&app.context, quote.id).await;
    assert!(matches!(accept_after, Err(OficinaError::InvalidTransition(_))));

    let reject_after = commands::reject_quote(&app.context, quote.id).await;
    assert!(matches!(reject_after, Err(OficinaError::InvalidTransition(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn orders_must_be_started_before_completion() {
    let app = setup();
    let (quote, ..) = seed_quote(&app).await;
    let accepted = commands::accept_quote(&app.context, quote.id).await.expect("accept failed");

    let early = commands::complete_order(&app.context, accepted.order.id, None).await;
    assert!(matches!(early, Err(OficinaError::InvalidTransition(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn canceling_an_order_cancels_its_contract() {
    let app = setup();
    let (quote, ..) = seed_quote(&app).await;
    let accepted = commands::accept_quote(&app.context, quote.id).await.expect("accept failed");

    let canceled = commands::cancel_order(
        &app.context,
        accepted.order.id,
        Some("cliente desistiu".to_string()),
    )
    .await
    .expect("cancel failed");
    assert_eq!(canceled.status, ServiceOrderStatus::Canceled);
    assert!(canceled
        .notes
        .as_deref()
        .is_some_and(|notes| notes.contains("Cancelamento: cliente desistiu")));

    let contract = commands::get_order_contract(&app.context, accepted.order.id)
        .await
        .expect("contract lookup failed")
        .expect("contract should exist");
    assert_eq!(contract.status, ContractStatus::Canceled);

    let start_after = commands::start_order(&app.context, accepted.order.id).await;
    assert!(matches!(start_after, Err(OficinaError::InvalidTransition(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn invoices_cancel_once() {
    let app = setup();
    let (quote, ..) = seed_quote(&app).await;
    let accepted = commands::accept_quote(&app.context, quote.id).await.expect("accept failed");
    commands::start_order(&app.context, accepted.order.id).await.expect("start failed");
    let completed = commands::complete_order(&app.context, accepted.order.id, None)
        .await
        .expect("complete failed");

    let canceled = commands::cancel_invoice(&app.context, completed.invoice.id)
        .await
        .expect("cancel invoice failed");
    assert_eq!(canceled.status, InvoiceStatus::Canceled);

    let again = commands::cancel_invoice(&app.context, completed.invoice.id).await;
    assert!(matches!(again, Err(OficinaError::InvalidTransition(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn sequential_numbers_stay_dense_per_series() {
    let app = setup();
    let year = Utc::now().year();

    let user = seed_user(&app).await;
    let client = seed_client(&app, "Ana Souza", "12345678901").await;
    let material = seed_material(&app, "TIN-001", 5_000).await;

    for seq in 1..=3 {
        let quote =
            commands::create_quote(&app.context, quote_draft(client.id, user.id, material.id))
                .await
                .expect("create quote failed");
        assert_eq!(quote.number, format!("ORC{year}{seq:04}"));

        let accepted =
            commands::accept_quote(&app.context, quote.id).await.expect("accept failed");
        assert_eq!(accepted.order.number, format!("OS{year}{seq:04}"));
        assert_eq!(accepted.contract.number, format!("CT{year}{seq:04}"));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn client_deletion_is_blocked_while_quotes_exist() {
    let app = setup();
    let (quote, client_id, ..) = seed_quote(&app).await;

    let blocked = commands::delete_client(&app.context, client_id).await;
    assert!(matches!(blocked, Err(OficinaError::Referenced(_))));

    commands::delete_quote(&app.context, quote.id).await.expect("delete quote failed");
    commands::delete_client(&app.context, client_id).await.expect("delete client failed");
}

#[tokio::test(flavor = "multi_thread")]
async fn order_listing_resolves_quote_and_client_context() {
    let app = setup();
    let (quote, ..) = seed_quote(&app).await;
    let accepted = commands::accept_quote(&app.context, quote.id).await.expect("accept failed");

    let page = commands::list_orders(&app.context, Default::default(), 1)
        .await
        .expect("list orders failed");
    assert_eq!(page.total, 1);

    let row = &page.items[0];
    assert_eq!(row.order.id, accepted.order.id);
    assert_eq!(row.quote_number, quote.number);
    assert_eq!(row.client_name, "Ana Souza");
    assert_eq!(row.service_description, "Funilaria e pintura");
    assert_eq!(row.total_value, Decimal::new(20_000, 2));
}
