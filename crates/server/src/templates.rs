//! HTML pages and the notices shown on them

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use sheetfix_convert::{AmountSummary, ConversionReport};
use tracing::error;

/// Message carried back to the index page after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoFile,
    InvalidType,
    InvalidExcel,
    ProcessingFailed,
    NotFound,
    DownloadFailed,
}

impl Notice {
    const ALL: [Notice; 6] = [
        Notice::NoFile,
        Notice::InvalidType,
        Notice::InvalidExcel,
        Notice::ProcessingFailed,
        Notice::NotFound,
        Notice::DownloadFailed,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Notice::NoFile => "no_file",
            Notice::InvalidType => "invalid_type",
            Notice::InvalidExcel => "invalid_excel",
            Notice::ProcessingFailed => "processing_failed",
            Notice::NotFound => "not_found",
            Notice::DownloadFailed => "download_failed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.code() == code)
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::NoFile => "No se seleccionó ningún archivo",
            Notice::InvalidType => {
                "Tipo de archivo inválido. Por favor sube un archivo Excel (.xlsx o .xls)"
            }
            Notice::InvalidExcel => {
                "El archivo no es un archivo Excel válido. Por favor sube un archivo Excel real."
            }
            Notice::ProcessingFailed => {
                "Error procesando el archivo. Por favor verifica que sea un archivo Excel válido."
            }
            Notice::NotFound => "Archivo no encontrado o ha expirado",
            Notice::DownloadFailed => "Error descargando el archivo",
        }
    }

    /// Redirect to the index page showing this notice.
    pub fn redirect(self) -> Redirect {
        Redirect::to(&format!("/?notice={}", self.code()))
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub notice: Option<&'static str>,
}

/// Formatted totals for the download page
pub struct SummaryView {
    pub total: String,
    pub inflows: String,
    pub outflows: String,
    pub counted: usize,
}

impl From<&AmountSummary> for SummaryView {
    fn from(summary: &AmountSummary) -> Self {
        SummaryView {
            total: format_amount(summary.total),
            inflows: format_amount(summary.inflows),
            outflows: format_amount(summary.outflows),
            counted: summary.counted,
        }
    }
}

#[derive(Template)]
#[template(path = "download.html")]
pub struct DownloadPage {
    pub filename: String,
    pub original_name: String,
    pub rows: usize,
    pub converted_columns: Vec<String>,
    pub date_columns: Vec<String>,
    pub summary: Option<SummaryView>,
}

impl DownloadPage {
    pub fn new(filename: String, original_name: String, report: &ConversionReport) -> Self {
        DownloadPage {
            filename,
            original_name,
            rows: report.rows,
            converted_columns: report.converted_columns.clone(),
            date_columns: report.date_columns.clone(),
            summary: report.summary.as_ref().map(SummaryView::from),
        }
    }
}

/// Amount in the local style: `$ 1.234,56`, `-$ 200,00`.
pub fn format_amount(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}$ {grouped},{:02}", cents % 100)
}

/// Render a page, falling back to a bare 500 if the template fails.
pub fn render<T: Template>(page: &T) -> Response {
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!(error = %err, "template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error interno").into_response()
        }
    }
}
