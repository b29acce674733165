//! Port interface for document rendering backends
//!
//! Renderers consume a fully resolved payload and produce bytes plus MIME
//! type plus a suggested filename. They apply no business rules and never
//! touch the store; rendering is CPU-bound and synchronous, so the document
//! service runs it on the blocking pool.

use oficina_domain::{DocumentPayload, RenderedDocument, Result, ServiceReportDocument};

/// Trait for turning resolved payloads into downloadable artifacts
pub trait DocumentRenderer: Send + Sync {
    /// Render a payload as a PDF document
    fn render_pdf(&self, payload: &DocumentPayload) -> Result<RenderedDocument>;

    /// Render a service report as a spreadsheet
    fn render_sheet(&self, report: &ServiceReportDocument) -> Result<RenderedDocument>;
}
