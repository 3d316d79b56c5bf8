//! Downloadable renderings of a generated job description.

pub mod excel;
pub mod pdf;

use crate::models::jd::JdDocument;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const EXCEL_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// `<title>_JD.<ext>`, with every character outside `[A-Za-z0-9]` replaced by
/// `_`. Characters outside the BMP count as two, as they do in UTF-16 clients.
pub fn export_filename(doc: &JdDocument, ext: &str) -> String {
    let title = doc
        .job_title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("JobDescription");
    let stem: String = title
        .chars()
        .flat_map(|c| {
            let (c, n) = if c.is_ascii_alphanumeric() {
                (c, 1)
            } else {
                ('_', c.len_utf16())
            };
            std::iter::repeat(c).take(n)
        })
        .collect();
    format!("{stem}_JD.{ext}")
}
