//! Document rendering backends
//!
//! PDFs through genpdf, spreadsheets through rust_xlsxwriter. Renderers
//! consume fully resolved payloads, so no lookup happens here; everything is
//! formatted in memory and handed back as bytes.

mod pdf;
mod sheet;

use chrono::{DateTime, Utc};
use oficina_core::DocumentRenderer;
use oficina_domain::{
    suggested_filename, DocumentPayload, RenderConfig, RenderedDocument, Result,
    ServiceReportDocument, PDF_MIME, XLSX_MIME,
};
use rust_decimal::Decimal;

/// Renderer producing downloadable PDF and XLSX artifacts.
pub struct ArtifactRenderer {
    config: RenderConfig,
}

impl ArtifactRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }
}

impl DocumentRenderer for ArtifactRenderer {
    fn render_pdf(&self, payload: &DocumentPayload) -> Result<RenderedDocument> {
        let now = Utc::now();
        let bytes = pdf::render(payload, &self.config, now)?;
        Ok(RenderedDocument {
            bytes,
            mime: PDF_MIME,
            filename: suggested_filename(&payload.slug(), "pdf", now),
        })
    }

    fn render_sheet(&self, report: &ServiceReportDocument) -> Result<RenderedDocument> {
        let now = Utc::now();
        let bytes = sheet::render(report)?;
        Ok(RenderedDocument {
            bytes,
            mime: XLSX_MIME,
            filename: suggested_filename("relatorio_servicos", "xlsx", now),
        })
    }
}

/// Money in the Brazilian display format (`R$ 1234,56`).
fn format_money(value: Decimal) -> String {
    format!("R$ {value:.2}").replace('.', ",")
}

/// `dd/mm/yyyy` day display.
fn format_day(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y").to_string()
}

/// `dd/mm/yyyy hh:mm` timestamp display.
fn format_day_time(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y %H:%M").to_string()
}

/// Optional contact fields fall back to a fixed placeholder.
fn or_missing(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.is_empty() => text,
        _ => "Não informado",
    }
}
