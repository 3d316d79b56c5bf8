use anyhow::Result;
use rust_xlsxwriter::{Format, Workbook};

use crate::models::jd::JdDocument;

/// One worksheet before it is written: column widths and rows of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: &'static str,
    pub widths: &'static [f64],
    pub rows: Vec<SheetRow>,
    pub freeze_first_row: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub cells: Vec<String>,
    pub bold: bool,
}

impl SheetRow {
    fn plain<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            bold: false,
        }
    }

    fn heading(label: &str) -> Self {
        Self {
            cells: vec![label.to_string(), String::new()],
            bold: true,
        }
    }
}

/// Summary, Responsibilities, KPIs and Competencies sheets, always all four.
pub fn sheet_layouts(doc: &JdDocument) -> Vec<SheetLayout> {
    let field = |key: &str| doc.text(key).unwrap_or_default();

    let mut summary_rows = vec![
        SheetRow::plain(["Job Title".to_string(), field("job_title")]),
        SheetRow::plain(["Reports To".to_string(), field("reports_to")]),
        SheetRow::plain(["Level".to_string(), field("level")]),
        SheetRow::plain([
            "Department / Job Family".to_string(),
            doc.text("job_family")
                .or_else(|| doc.text("department"))
                .unwrap_or_default(),
        ]),
        SheetRow::plain(["Role Summary".to_string(), field("role_summary")]),
    ];
    summary_rows[0].bold = true;

    let mut responsibility_rows = Vec::new();
    if let Some(buckets) = &doc.responsibilities {
        for (bucket, items) in buckets.iter() {
            responsibility_rows.push(SheetRow::heading(if bucket.is_empty() {
                "General"
            } else {
                bucket
            }));
            responsibility_rows.extend(
                items
                    .iter()
                    .map(|item| SheetRow::plain([String::new(), item.to_string()])),
            );
        }
    }

    let kpi_rows = doc
        .kpi_lines()
        .into_iter()
        .map(|kpi| SheetRow::plain([kpi]))
        .collect();

    let mut competency_rows = Vec::new();
    for (group, items) in doc.competency_groups() {
        competency_rows.push(SheetRow::heading(&group));
        competency_rows.extend(
            items
                .into_iter()
                .map(|item| SheetRow::plain([String::new(), item])),
        );
    }

    vec![
        SheetLayout {
            name: "Summary",
            widths: &[25.0, 50.0],
            rows: summary_rows,
            freeze_first_row: true,
        },
        SheetLayout {
            name: "Responsibilities",
            widths: &[30.0, 60.0],
            rows: responsibility_rows,
            freeze_first_row: false,
        },
        SheetLayout {
            name: "KPIs",
            widths: &[60.0],
            rows: kpi_rows,
            freeze_first_row: false,
        },
        SheetLayout {
            name: "Competencies",
            widths: &[25.0, 50.0],
            rows: competency_rows,
            freeze_first_row: false,
        },
    ]
}

/// Renders the document as an `.xlsx` workbook.
pub fn render_workbook(doc: &JdDocument) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for layout in sheet_layouts(doc) {
        let sheet = workbook.add_worksheet();
        sheet.set_name(layout.name)?;
        for (col, width) in (0u16..).zip(layout.widths) {
            sheet.set_column_width(col, *width)?;
        }
        if layout.freeze_first_row {
            sheet.set_freeze_panes(1, 0)?;
        }
        for (row, cells) in (0u32..).zip(&layout.rows) {
            for (col, cell) in (0u16..).zip(&cells.cells) {
                if cell.is_empty() {
                    continue;
                }
                if cells.bold {
                    sheet.write_string_with_format(row, col, cell, &bold)?;
                } else {
                    sheet.write_string(row, col, cell)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cells(layout: &SheetLayout) -> Vec<Vec<&str>> {
        layout
            .rows
            .iter()
            .map(|r| r.cells.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_sheets_follow_document() {
        let doc: JdDocument = serde_json::from_value(json!({
            "job_title": "HR Analyst",
            "level": "Analyst",
            "department": "People",
            "responsibilities": {"": ["Assist audits"], "Reporting": ["Prepare dashboards"]},
            "kpis": ["Reports on time"],
            "competencies": {"technical": [], "behavioral": ["Integrity"]}
        }))
        .unwrap();
        let sheets = sheet_layouts(&doc);
        let names: Vec<&str> = sheets.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Summary", "Responsibilities", "KPIs", "Competencies"]);

        assert_eq!(
            cells(&sheets[0]),
            vec![
                vec!["Job Title", "HR Analyst"],
                vec!["Reports To", ""],
                vec!["Level", "Analyst"],
                vec!["Department / Job Family", "People"],
                vec!["Role Summary", ""],
            ]
        );
        assert!(sheets[0].rows[0].bold);
        assert!(sheets[0].freeze_first_row);

        assert_eq!(
            cells(&sheets[1]),
            vec![
                vec!["General", ""],
                vec!["", "Assist audits"],
                vec!["Reporting", ""],
                vec!["", "Prepare dashboards"],
            ]
        );
        assert!(sheets[1].rows[0].bold && !sheets[1].rows[1].bold);

        assert_eq!(cells(&sheets[2]), vec![vec!["Reports on time"]]);
        assert_eq!(
            cells(&sheets[3]),
            vec![vec!["Behavioral", ""], vec!["", "Integrity"]]
        );
    }

    #[test]
    fn test_empty_document_still_has_every_sheet() {
        let sheets = sheet_layouts(&JdDocument::default());
        assert_eq!(sheets.len(), 4);
        assert_eq!(sheets[0].rows.len(), 5);
        assert!(sheets[1..].iter().all(|s| s.rows.is_empty()));
    }

    #[test]
    fn test_render_produces_xlsx_bytes() {
        let doc: JdDocument = serde_json::from_value(json!({
            "job_title": "Payroll Lead",
            "kpis": [{"kpi": "Accuracy", "target": "99%"}],
            "responsibilities": {"Payroll": ["Run monthly payroll", 7]}
        }))
        .unwrap();
        let bytes = render_workbook(&doc).unwrap();
        // xlsx is a zip container
        assert!(bytes.starts_with(b"PK"));
    }
}
