//! XLSX builder for the service report export.

use oficina_domain::{OficinaError, Result, ServiceReportDocument};
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};

use super::{format_day, format_money};

const HEADERS: [&str; 8] = [
    "Ordem de Serviço",
    "Cliente",
    "Orçamento",
    "Data Início",
    "Data Conclusão",
    "Status",
    "Descrição",
    "Valor Total",
];

/// Lay the filtered orders out as a single styled worksheet.
pub(super) fn render(report: &ServiceReportDocument) -> Result<Vec<u8>> {
    build(report).map_err(render_err)
}

fn build(report: &ServiceReportDocument) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Relatório de Serviços")?;

    let header = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x36_60_92))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    for (col, title) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (index, summary) in report.rows.iter().enumerate() {
        let row = index as u32 + 1;
        let opened = summary.order.opened_at_utc().map(format_day).unwrap_or_default();
        let completed = summary
            .order
            .completed_at_utc()
            .map(format_day)
            .unwrap_or_else(|| "Em andamento".to_string());

        worksheet.write_string(row, 0, &summary.order.number)?;
        worksheet.write_string(row, 1, &summary.client_name)?;
        worksheet.write_string(row, 2, &summary.quote_number)?;
        worksheet.write_string(row, 3, opened)?;
        worksheet.write_string(row, 4, completed)?;
        worksheet.write_string(row, 5, summary.order.status.report_label())?;
        worksheet.write_string(row, 6, &summary.service_description)?;
        worksheet.write_string(row, 7, format_money(summary.total_value))?;
    }

    worksheet.autofit();
    workbook.save_to_buffer()
}

fn render_err(err: XlsxError) -> OficinaError {
    OficinaError::Rendering(format!("spreadsheet rendering failed: {err}"))
}

/* ------------------------------------------------------------------------- */
