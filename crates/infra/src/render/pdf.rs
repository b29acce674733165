//! PDF builders for the shop's printed documents
//!
//! Every document shares the same skeleton: company header, document title,
//! section headings, generation footer. Bodies follow the paper forms the
//! shop hands to clients, so all labels are Portuguese.

use chrono::{DateTime, Utc};
use genpdf::{elements, style, Alignment, Document, Element, SimplePageDecorator};
use oficina_domain::{
    ContractDocument, DocumentPayload, InvoiceDocument, OficinaError, OrderDocument, QuoteDocument,
    QuoteDocumentItem, RenderConfig, Result, ServiceReportDocument, ServiceReportFilter,
};
use rust_decimal::Decimal;

use super::{format_day, format_day_time, format_money, or_missing};

const QUOTE_TERMS: &str = "1. Este orçamento tem validade até a data especificada acima.
2. Os preços estão sujeitos a alteração sem aviso prévio.
3. O serviço será executado conforme descrito neste orçamento.
4. Materiais não utilizados poderão ser devolvidos mediante acordo.
5. O pagamento deverá ser efetuado conforme combinado.";

/// Render a payload into PDF bytes.
pub(super) fn render(
    payload: &DocumentPayload,
    config: &RenderConfig,
    at: DateTime<Utc>,
) -> Result<Vec<u8>> {
    let title = title_of(payload);
    let mut doc = new_document(config, &title)?;

    doc.push(
        elements::Paragraph::new(config.company_name.as_str())
            .styled(style::Style::new().bold().with_font_size(18)),
    );
    doc.push(elements::Paragraph::new(config.company_tagline.as_str()));
    doc.push(elements::Break::new(1.5));
    doc.push(heading(&title));

    match payload {
        DocumentPayload::Quote(quote) => quote_body(&mut doc, quote, config)?,
        DocumentPayload::Order(order) => order_body(&mut doc, order)?,
        DocumentPayload::Contract(contract) => contract_body(&mut doc, contract, config)?,
        DocumentPayload::Invoice(invoice) => invoice_body(&mut doc, invoice, config)?,
        DocumentPayload::ServiceReport(report) => report_body(&mut doc, report)?,
    }

    doc.push(elements::Break::new(2));
    doc.push(
        elements::Paragraph::new(format!(
            "Documento gerado em {} às {}",
            at.format("%d/%m/%Y"),
            at.format("%H:%M")
        ))
        .aligned(Alignment::Center)
        .styled(style::Style::new().with_font_size(8)),
    );

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| OficinaError::Rendering(format!("pdf rendering failed: {e}")))?;
    Ok(buffer)
}

fn title_of(payload: &DocumentPayload) -> String {
    match payload {
        DocumentPayload::Quote(doc) => format!("ORÇAMENTO Nº {}", doc.quote.number),
        DocumentPayload::Order(doc) => format!("ORDEM DE SERVIÇO Nº {}", doc.order.number),
        DocumentPayload::Contract(doc) => {
            format!("CONTRATO DE PRESTAÇÃO DE SERVIÇOS Nº {}", doc.contract.number)
        }
        DocumentPayload::Invoice(doc) => {
            format!("NOTA FISCAL DE SERVIÇOS Nº {}", doc.invoice.number)
        }
        DocumentPayload::ServiceReport(_) => "RELATÓRIO DE SERVIÇOS".to_string(),
    }
}

fn new_document(config: &RenderConfig, title: &str) -> Result<Document> {
    let font_family = genpdf::fonts::from_files(&config.fonts_dir, &config.font_family, None)
        .map_err(|e| {
            OficinaError::Rendering(format!(
                "font family '{}' not available in {}: {e}",
                config.font_family, config.fonts_dir
            ))
        })?;

    let mut doc = Document::new(font_family);
    doc.set_title(title);
    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

fn quote_body(doc: &mut Document, quote: &QuoteDocument, config: &RenderConfig) -> Result<()> {
    let issued = quote.quote.issued_at_utc().map(format_day).unwrap_or_default();
    let info = vec![
        ("Cliente:", quote.client.name.clone()),
        ("CPF/CNPJ:", quote.client.tax_id_display()),
        ("Telefone:", or_missing(quote.client.phone.as_deref()).to_string()),
        ("Email:", or_missing(quote.client.email.as_deref()).to_string()),
        ("Data do Orçamento:", issued),
        ("Válido até:", quote.quote.valid_until.format("%d/%m/%Y").to_string()),
        ("Responsável:", quote.issuer.name.clone()),
    ];
    doc.push(pairs_table(info)?);
    doc.push(elements::Break::new(1.5));

    doc.push(heading("DESCRIÇÃO DO SERVIÇO"));
    push_text(doc, &quote.quote.service_description);
    doc.push(elements::Break::new(1.5));

    if !quote.items.is_empty() {
        doc.push(heading("MATERIAIS"));
        doc.push(items_table(&quote.items)?);
        doc.push(elements::Break::new(1.5));
    }

    let materials_total: Decimal = quote.items.iter().map(|row| row.item.subtotal).sum();
    financial_summary(doc, materials_total, quote.quote.labor_value, quote.quote.total_value)?;

    if let Some(notes) = quote.quote.notes.as_deref() {
        doc.push(heading("OBSERVAÇÕES"));
        push_text(doc, notes);
        doc.push(elements::Break::new(1.5));
    }

    doc.push(heading("TERMOS E CONDIÇÕES"));
    push_text(doc, QUOTE_TERMS);
    doc.push(elements::Break::new(2));

    doc.push(heading("ASSINATURAS"));
    doc.push(elements::Break::new(2));
    doc.push(signature_table(
        ("Cliente", &quote.client.name),
        (config.company_name.as_str(), &quote.issuer.name),
    )?);
    Ok(())
}

fn order_body(doc: &mut Document, order: &OrderDocument) -> Result<()> {
    let opened = order.order.opened_at_utc().map(format_day_time).unwrap_or_default();
    let completed = order
        .order
        .completed_at_utc()
        .map(format_day_time)
        .unwrap_or_else(|| "Em andamento".to_string());
    let info = vec![
        ("Cliente:", order.client.name.clone()),
        ("CPF/CNPJ:", order.client.tax_id_display()),
        ("Telefone:", or_missing(order.client.phone.as_deref()).to_string()),
        ("Email:", or_missing(order.client.email.as_deref()).to_string()),
        ("Orçamento Base:", order.quote.number.clone()),
        ("Data de Início:", opened),
        ("Data de Conclusão:", completed),
        ("Status:", order.order.status.report_label().to_string()),
    ];
    doc.push(pairs_table(info)?);
    doc.push(elements::Break::new(1.5));

    doc.push(heading("DESCRIÇÃO DO SERVIÇO"));
    push_text(doc, &order.quote.service_description);
    doc.push(elements::Break::new(1.5));

    let materials_total = order.quote.total_value - order.quote.labor_value;
    financial_summary(doc, materials_total, order.quote.labor_value, order.quote.total_value)?;

    if let Some(notes) = order.order.notes.as_deref() {
        doc.push(heading("OBSERVAÇÕES"));
        push_text(doc, notes);
        doc.push(elements::Break::new(1.5));
    }

    doc.push(heading("ASSINATURA DO CLIENTE"));
    doc.push(elements::Break::new(2));
    doc.push(single_signature(&order.client.name, "Cliente")?);
    Ok(())
}

fn contract_body(
    doc: &mut Document,
    contract: &ContractDocument,
    config: &RenderConfig,
) -> Result<()> {
    doc.push(heading("CONTRATANTE"));
    let client = &contract.client;
    let contratante = vec![
        ("Nome:", client.name.clone()),
        ("CPF/CNPJ:", client.tax_id_display()),
        ("Telefone:", or_missing(client.phone.as_deref()).to_string()),
        ("Email:", or_missing(client.email.as_deref()).to_string()),
        ("Endereço:", or_missing(client.address.as_deref()).to_string()),
    ];
    doc.push(pairs_table(contratante)?);
    doc.push(elements::Break::new(1));

    doc.push(heading("CONTRATADA"));
    let contratada = vec![
        ("Razão Social:", config.company_name.clone()),
        ("Atividade:", config.company_tagline.clone()),
    ];
    doc.push(pairs_table(contratada)?);
    doc.push(elements::Break::new(1.5));

    doc.push(heading("DADOS DO CONTRATO"));
    let created = contract.contract.created_at_utc().map(format_day).unwrap_or_default();
    let dados = vec![
        ("Número do Contrato:", contract.contract.number.clone()),
        ("Data do Contrato:", created),
        ("Ordem de Serviço:", contract.order.number.clone()),
        ("Orçamento Base:", contract.quote.number.clone()),
        ("Valor Total:", format_money(contract.quote.total_value)),
        ("Status:", contract.contract.status.report_label().to_string()),
    ];
    doc.push(pairs_table(dados)?);
    doc.push(elements::Break::new(1.5));

    doc.push(heading("OBJETO DO CONTRATO"));
    push_text(doc, &contract.quote.service_description);
    doc.push(elements::Break::new(1.5));

    doc.push(heading("TERMOS E CONDIÇÕES"));
    push_text(doc, &contract.contract.terms);
    doc.push(elements::Break::new(2));

    doc.push(heading("ASSINATURAS"));
    doc.push(elements::Break::new(2));
    doc.push(signature_table(
        ("CONTRATANTE", &contract.client.name),
        ("CONTRATADA", config.company_name.as_str()),
    )?);
    Ok(())
}

fn invoice_body(doc: &mut Document, invoice: &InvoiceDocument, config: &RenderConfig) -> Result<()> {
    doc.push(heading("PRESTADOR DE SERVIÇOS"));
    let prestador = vec![
        ("Razão Social:", config.company_name.clone()),
        ("Atividade:", config.company_tagline.clone()),
    ];
    doc.push(pairs_table(prestador)?);
    doc.push(elements::Break::new(1));

    doc.push(heading("TOMADOR DE SERVIÇOS"));
    let client = &invoice.client;
    let city = format!(
        "{} - {}",
        or_missing(client.city.as_deref()),
        client.state.clone().unwrap_or_default()
    );
    let tomador = vec![
        ("Nome/Razão Social:", client.name.clone()),
        ("CPF/CNPJ:", client.tax_id_display()),
        ("Telefone:", or_missing(client.phone.as_deref()).to_string()),
        ("Email:", or_missing(client.email.as_deref()).to_string()),
        ("Endereço:", or_missing(client.address.as_deref()).to_string()),
        ("Cidade:", city),
        ("CEP:", or_missing(client.postal_code.as_deref()).to_string()),
    ];
    doc.push(pairs_table(tomador)?);
    doc.push(elements::Break::new(1.5));

    doc.push(heading("DADOS DA NOTA FISCAL"));
    let issued = invoice.invoice.issued_at_utc().map(format_day).unwrap_or_default();
    let dados = vec![
        ("Número da NF:", invoice.invoice.number.clone()),
        ("Data de Emissão:", issued),
        ("Ordem de Serviço:", invoice.order.number.clone()),
        ("Orçamento Base:", invoice.quote.number.clone()),
        ("Status:", invoice.invoice.status.report_label().to_string()),
    ];
    doc.push(pairs_table(dados)?);
    doc.push(elements::Break::new(1.5));

    doc.push(heading("DISCRIMINAÇÃO DOS SERVIÇOS"));
    let mut table = elements::TableLayout::new(vec![1, 6, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
    let bold = style::Style::new().bold();
    table
        .row()
        .element(elements::Paragraph::new("Item").styled(bold))
        .element(elements::Paragraph::new("Descrição").styled(bold))
        .element(elements::Paragraph::new("Valor").styled(bold))
        .push()
        .map_err(render_err)?;

    let materials_total = invoice.quote.total_value - invoice.quote.labor_value;
    let mut item_number = 1;
    if invoice.quote.labor_value > Decimal::ZERO {
        table
            .row()
            .element(elements::Paragraph::new(item_number.to_string()))
            .element(elements::Paragraph::new(invoice.quote.service_description.as_str()))
            .element(right(format_money(invoice.quote.labor_value)))
            .push()
            .map_err(render_err)?;
        item_number += 1;
    }
    if materials_total > Decimal::ZERO {
        table
            .row()
            .element(elements::Paragraph::new(item_number.to_string()))
            .element(elements::Paragraph::new("Materiais aplicados"))
            .element(right(format_money(materials_total)))
            .push()
            .map_err(render_err)?;
    }
    doc.push(table);
    doc.push(elements::Break::new(1.5));

    doc.push(heading("RESUMO DOS VALORES"));
    let mut resumo = elements::TableLayout::new(vec![2, 1]);
    resumo
        .row()
        .element(elements::Paragraph::new("Valor Total dos Serviços:").styled(bold))
        .element(right(format_money(invoice.invoice.total_value)).styled(bold))
        .push()
        .map_err(render_err)?;
    doc.push(resumo);
    Ok(())
}

fn report_body(doc: &mut Document, report: &ServiceReportDocument) -> Result<()> {
    doc.push(heading("FILTROS APLICADOS"));
    for line in filter_lines(&report.filter) {
        doc.push(elements::Paragraph::new(line));
    }
    doc.push(elements::Break::new(1.5));

    doc.push(heading("RESUMO ESTATÍSTICO"));
    let stats = &report.stats;
    let resumo = vec![
        ("Total de Serviços:", stats.total_services.to_string()),
        ("Valor Total:", format_money(stats.total_value)),
        ("Serviços Criados:", stats.created.to_string()),
        ("Serviços em Andamento:", stats.in_progress.to_string()),
        ("Serviços Concluídos:", stats.completed.to_string()),
        ("Serviços Cancelados:", stats.canceled.to_string()),
    ];
    doc.push(pairs_table(resumo)?);
    doc.push(elements::Break::new(1.5));

    if report.rows.is_empty() {
        doc.push(elements::Paragraph::new(
            "Nenhum serviço encontrado com os filtros aplicados.",
        ));
        return Ok(());
    }

    doc.push(heading("DETALHAMENTO DOS SERVIÇOS"));
    let mut table = elements::TableLayout::new(vec![2, 4, 2, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
    let bold = style::Style::new().bold();
    table
        .row()
        .element(elements::Paragraph::new("OS").styled(bold))
        .element(elements::Paragraph::new("Cliente").styled(bold))
        .element(elements::Paragraph::new("Data Início").styled(bold))
        .element(elements::Paragraph::new("Status").styled(bold))
        .element(elements::Paragraph::new("Valor").styled(bold))
        .push()
        .map_err(render_err)?;
    for row in &report.rows {
        let opened = row.order.opened_at_utc().map(format_day).unwrap_or_default();
        table
            .row()
            .element(elements::Paragraph::new(row.order.number.as_str()))
            .element(elements::Paragraph::new(row.client_name.as_str()))
            .element(elements::Paragraph::new(opened))
            .element(elements::Paragraph::new(row.order.status.report_label()))
            .element(right(format_money(row.total_value)))
            .push()
            .map_err(render_err)?;
    }
    doc.push(table);
    Ok(())
}

/// Human-readable lines describing the applied report filters.
fn filter_lines(filter: &ServiceReportFilter) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(date) = filter.start_date {
        lines.push(format!("Data Início: {}", date.format("%d/%m/%Y")));
    }
    if let Some(date) = filter.end_date {
        lines.push(format!("Data Fim: {}", date.format("%d/%m/%Y")));
    }
    if let Some(status) = filter.status {
        lines.push(format!("Status: {}", status.report_label()));
    }
    if let Some(client_id) = filter.client_id {
        lines.push(format!("Cliente: #{client_id}"));
    }
    if lines.is_empty() {
        lines.push("Nenhum filtro aplicado".to_string());
    }
    lines
}

fn heading(text: &str) -> impl Element {
    elements::Paragraph::new(text.to_string())
        .styled(style::Style::new().bold().with_font_size(14))
}

fn right(text: String) -> elements::Paragraph {
    elements::Paragraph::new(text).aligned(Alignment::Right)
}

fn centered(text: &str) -> elements::Paragraph {
    elements::Paragraph::new(text.to_string()).aligned(Alignment::Center)
}

/// Push text line by line; paragraphs do not break on embedded newlines.
fn push_text(doc: &mut Document, text: &str) {
    for line in text.lines() {
        doc.push(elements::Paragraph::new(line.to_string()));
    }
}

/// Two-column label/value table without a frame.
fn pairs_table(pairs: Vec<(&str, String)>) -> Result<elements::TableLayout> {
    let mut table = elements::TableLayout::new(vec![1, 2]);
    let bold = style::Style::new().bold();
    for (label, value) in pairs {
        table
            .row()
            .element(elements::Paragraph::new(label).styled(bold))
            .element(elements::Paragraph::new(value))
            .push()
            .map_err(render_err)?;
    }
    Ok(table)
}

fn items_table(items: &[QuoteDocumentItem]) -> Result<elements::TableLayout> {
    let mut table = elements::TableLayout::new(vec![1, 2, 5, 1, 1, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
    let bold = style::Style::new().bold();
    table
        .row()
        .element(elements::Paragraph::new("Item").styled(bold))
        .element(elements::Paragraph::new("Código").styled(bold))
        .element(elements::Paragraph::new("Descrição").styled(bold))
        .element(elements::Paragraph::new("Qtd").styled(bold))
        .element(elements::Paragraph::new("Unid").styled(bold))
        .element(elements::Paragraph::new("Valor Unit.").styled(bold))
        .element(elements::Paragraph::new("Subtotal").styled(bold))
        .push()
        .map_err(render_err)?;

    for (index, row) in items.iter().enumerate() {
        let quantity = format!("{:.2}", row.item.quantity).replace('.', ",");
        table
            .row()
            .element(elements::Paragraph::new((index + 1).to_string()))
            .element(elements::Paragraph::new(row.material.code.as_str()))
            .element(elements::Paragraph::new(row.material.name.as_str()))
            .element(elements::Paragraph::new(quantity))
            .element(elements::Paragraph::new(row.material.unit.as_str()))
            .element(elements::Paragraph::new(format_money(row.item.unit_price)))
            .element(elements::Paragraph::new(format_money(row.item.subtotal)))
            .push()
            .map_err(render_err)?;
    }
    Ok(table)
}

fn financial_summary(
    doc: &mut Document,
    materials: Decimal,
    labor: Decimal,
    total: Decimal,
) -> Result<()> {
    doc.push(heading("RESUMO FINANCEIRO"));
    let mut table = elements::TableLayout::new(vec![2, 1]);
    let bold = style::Style::new().bold();
    table
        .row()
        .element(elements::Paragraph::new("Subtotal Materiais:"))
        .element(right(format_money(materials)))
        .push()
        .map_err(render_err)?;
    table
        .row()
        .element(elements::Paragraph::new("Mão de Obra:"))
        .element(right(format_money(labor)))
        .push()
        .map_err(render_err)?;
    table
        .row()
        .element(elements::Paragraph::new("TOTAL GERAL:").styled(bold))
        .element(right(format_money(total)).styled(bold))
        .push()
        .map_err(render_err)?;
    doc.push(table);
    doc.push(elements::Break::new(1.5));
    Ok(())
}

fn signature_table(
    left: (&str, &str),
    right_side: (&str, &str),
) -> Result<elements::TableLayout> {
    let line = "_".repeat(30);
    let mut table = elements::TableLayout::new(vec![1, 1]);
    table
        .row()
        .element(centered(&line))
        .element(centered(&line))
        .push()
        .map_err(render_err)?;
    table
        .row()
        .element(centered(left.0))
        .element(centered(right_side.0))
        .push()
        .map_err(render_err)?;
    table
        .row()
        .element(centered(left.1))
        .element(centered(right_side.1))
        .push()
        .map_err(render_err)?;
    Ok(table)
}

fn single_signature(name: &str, role: &str) -> Result<elements::TableLayout> {
    let mut table = elements::TableLayout::new(vec![1]);
    table.row().element(centered(&"_".repeat(40))).push().map_err(render_err)?;
    table.row().element(centered(name)).push().map_err(render_err)?;
    table.row().element(centered(role)).push().map_err(render_err)?;
    Ok(table)
}

fn render_err(err: genpdf::error::Error) -> OficinaError {
    OficinaError::Rendering(format!("pdf layout failed: {err}"))
}
