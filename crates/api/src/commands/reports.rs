//! Reporting and export commands

use oficina_domain::{DashboardSnapshot, RenderedDocument, ReportQuery, Result, ServiceReportDocument};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_logged;

/// Build the filtered service report. Filter strings that do not parse are
/// dropped, never rejected.
pub async fn get_service_report(
    context: &AppContext,
    query: ReportQuery,
) -> Result<ServiceReportDocument> {
    execute_logged("reports::get_service_report", async move {
        context.reports.service_report(&query).await
    })
    .await
}

/// Point-in-time overview for the landing screen.
pub async fn get_dashboard(context: &AppContext) -> Result<DashboardSnapshot> {
    execute_logged("reports::get_dashboard", context.reports.dashboard()).await
}

/// Render the service report as a printable PDF.
pub async fn render_service_report_pdf(
    context: &AppContext,
    query: ReportQuery,
) -> Result<RenderedDocument> {
    execute_logged("reports::render_service_report_pdf", async move {
        let report = context.reports.service_report(&query).await?;
        context.documents.report_pdf(report).await
    })
    .await
}

/// Render the service report as a spreadsheet.
pub async fn render_service_report_sheet(
    context: &AppContext,
    query: ReportQuery,
) -> Result<RenderedDocument> {
    execute_logged("reports::render_service_report_sheet", async move {
        let report = context.reports.service_report(&query).await?;
        context.documents.report_sheet(report).await
    })
    .await
}
