//! Integration tests for the report and dashboard commands

use oficina_api::commands;
use oficina_domain::{OficinaError, ReportQuery, XLSX_MIME};
use rust_decimal::Decimal;

mod support;
use support::{seed_quote, setup};

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_reflects_the_full_pipeline() {
    let app = setup();
    let (quote, _, _, _) = seed_quote(&app).await;

    let accepted = commands::accept_quote(&app.context, quote.id).await.unwrap();
    commands::start_order(&app.context, accepted.order.id).await.unwrap();
    commands::complete_order(&app.context, accepted.order.id, None).await.unwrap();

    let dashboard = commands::get_dashboard(&app.context).await.unwrap();
    assert_eq!(dashboard.total_clients, 1);
    assert_eq!(dashboard.total_materials, 1);
    assert_eq!(dashboard.total_quotes, 1);
    assert_eq!(dashboard.pending_quotes, 0);
    assert_eq!(dashboard.total_orders, 1);
    assert_eq!(dashboard.orders_created, 0);
    assert_eq!(dashboard.orders_in_progress, 0);
    assert_eq!(dashboard.orders_completed, 1);
    assert_eq!(dashboard.total_invoices, 1);
    assert_eq!(dashboard.revenue_last_30_days, Decimal::new(20_000, 2));
    // Seeded material sits at stock 10 with a minimum of 2.
    assert_eq!(dashboard.low_stock_materials, 0);
    assert_eq!(dashboard.recent_quotes.len(), 1);
    assert_eq!(dashboard.recent_quotes[0].client_name, "Ana Souza");
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_report_filters_are_dropped_not_rejected() {
    let app = setup();
    let (quote, _, _, _) = seed_quote(&app).await;
    commands::accept_quote(&app.context, quote.id).await.unwrap();

    let query = ReportQuery {
        start_date: Some("not-a-date".to_string()),
        end_date: Some("2026-02-31".to_string()),
        status: Some("archived".to_string()),
        ..Default::default()
    };
    let report = commands::get_service_report(&app.context, query).await.unwrap();
    assert_eq!(report.filter.start_date, None);
    assert_eq!(report.filter.end_date, None);
    assert_eq!(report.filter.status, None);
    assert_eq!(report.rows.len(), 1);

    let elsewhere = ReportQuery { client_id: Some(999), ..Default::default() };
    let report = commands::get_service_report(&app.context, elsewhere).await.unwrap();
    assert!(report.rows.is_empty());
    assert_eq!(report.stats.total_services, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn report_narrows_by_status_and_aggregates_totals() {
    let app = setup();
    let (quote, _, _, _) = seed_quote(&app).await;
    let accepted = commands::accept_quote(&app.context, quote.id).await.unwrap();
    commands::start_order(&app.context, accepted.order.id).await.unwrap();

    let in_progress = ReportQuery { status: Some("in_progress".to_string()), ..Default::default() };
    let report = commands::get_service_report(&app.context, in_progress).await.unwrap();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.stats.in_progress, 1);
    assert_eq!(report.stats.total_value, Decimal::new(20_000, 2));
    assert_eq!(report.rows[0].client_name, "Ana Souza");
    assert_eq!(report.rows[0].quote_number, quote.number);

    let completed = ReportQuery { status: Some("completed".to_string()), ..Default::default() };
    let report = commands::get_service_report(&app.context, completed).await.unwrap();
    assert!(report.rows.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn report_sheet_renders_without_any_font_setup() {
    let app = setup();
    let (quote, _, _, _) = seed_quote(&app).await;
    commands::accept_quote(&app.context, quote.id).await.unwrap();

    let rendered =
        commands::render_service_report_sheet(&app.context, ReportQuery::default()).await.unwrap();
    assert_eq!(rendered.mime, XLSX_MIME);
    assert!(rendered.filename.starts_with("relatorio_servicos_"));
    assert!(rendered.filename.ends_with(".xlsx"));
    // XLSX files are zip archives, so the buffer starts with the PK magic.
    assert_eq!(&rendered.bytes[..2], b"PK");
}

#[tokio::test(flavor = "multi_thread")]
async fn report_pdf_surfaces_a_rendering_error_when_fonts_are_missing() {
    let app = setup();

    // The default font directory does not exist in the test environment.
    let result = commands::render_service_report_pdf(&app.context, ReportQuery::default()).await;
    assert!(matches!(result, Err(OficinaError::Rendering(_))));
}
