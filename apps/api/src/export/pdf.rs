use anyhow::Result;
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::models::jd::JdDocument;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 18.0;
const INDENT_MM: f32 = 7.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;

const TITLE_PT: f32 = 18.0;
const HEADING_PT: f32 = 12.0;
const SUBHEADING_PT: f32 = 11.0;
const BODY_PT: f32 = 10.0;

/// One logical line of the PDF before wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLine {
    pub text: String,
    pub size_pt: f32,
    pub bold: bool,
    pub indented: bool,
    /// Extra space before the line, in lines of its own size.
    pub gap_before: f32,
}

impl PdfLine {
    fn new(text: impl Into<String>, size_pt: f32) -> Self {
        Self {
            text: text.into(),
            size_pt,
            bold: false,
            indented: false,
            gap_before: 0.0,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn bullet(mut self) -> Self {
        self.text = format!("- {}", self.text);
        self.indented = true;
        self
    }

    fn gap(mut self, lines: f32) -> Self {
        self.gap_before = lines;
        self
    }
}

/// Lays out the document as title, metadata, summary, responsibilities, KPIs
/// and competencies. Empty sections are left out.
pub fn pdf_lines(doc: &JdDocument) -> Vec<PdfLine> {
    let mut lines = Vec::new();
    let title = doc
        .text("job_title")
        .unwrap_or_else(|| "Job Description".to_string());
    lines.push(PdfLine::new(title, TITLE_PT).bold());

    if let Some(reports_to) = doc.text("reports_to") {
        lines.push(PdfLine::new(format!("Reports To: {reports_to}"), BODY_PT).gap(0.5));
    }
    if let Some(level) = doc.text("level") {
        lines.push(PdfLine::new(format!("Level: {level}"), BODY_PT));
    }
    if let Some(department) = doc.text("job_family").or_else(|| doc.text("department")) {
        lines.push(PdfLine::new(format!("Department: {department}"), BODY_PT));
    }

    if let Some(summary) = doc.text("role_summary") {
        lines.push(PdfLine::new("Role Summary", HEADING_PT).bold().gap(1.0));
        lines.push(PdfLine::new(summary, BODY_PT));
    }

    if let Some(buckets) = doc.responsibilities.as_ref().filter(|b| !b.is_empty()) {
        lines.push(PdfLine::new("Responsibilities", HEADING_PT).bold().gap(1.0));
        for (bucket, items) in buckets.iter() {
            let name = if bucket.is_empty() { "General" } else { bucket };
            lines.push(PdfLine::new(name, SUBHEADING_PT).bold().gap(0.5));
            for item in items {
                lines.push(PdfLine::new(item.to_string(), BODY_PT).bullet());
            }
        }
    }

    let kpis = doc.kpi_lines();
    if !kpis.is_empty() {
        lines.push(PdfLine::new("Key Performance Indicators", HEADING_PT).bold().gap(1.0));
        for kpi in kpis {
            lines.push(PdfLine::new(kpi, BODY_PT).bullet());
        }
    }

    let groups = doc.competency_groups();
    if !groups.is_empty() {
        lines.push(PdfLine::new("Competencies", HEADING_PT).bold().gap(1.0));
        for (group, items) in groups {
            lines.push(PdfLine::new(group, SUBHEADING_PT).bold().gap(0.5));
            for item in items {
                lines.push(PdfLine::new(item, BODY_PT).bullet());
            }
        }
    }

    lines
}

/// Greedy word wrap on an estimated character budget. Words longer than the
/// budget get a line of their own.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Baseline of the next line, from the bottom of the page.
    y_mm: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y_mm: PAGE_HEIGHT_MM - MARGIN_MM,
        })
    }

    fn write(&mut self, line: &PdfLine) {
        let line_height = line.size_pt * PT_TO_MM * 1.4;
        let x = MARGIN_MM + if line.indented { INDENT_MM } else { 0.0 };
        let width = PAGE_WIDTH_MM - MARGIN_MM - x;
        let max_chars = (width / (line.size_pt * AVG_GLYPH_EM * PT_TO_MM)) as usize;

        self.y_mm -= line.gap_before * line_height;
        for chunk in wrap(&line.text, max_chars.max(1)) {
            if self.y_mm - line_height < MARGIN_MM {
                self.new_page();
            }
            self.y_mm -= line_height;
            let font = if line.bold { &self.bold } else { &self.regular };
            self.layer
                .use_text(chunk, line.size_pt, Mm(x), Mm(self.y_mm), font);
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y_mm = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    fn finish(self) -> Result<Vec<u8>> {
        Ok(self.doc.save_to_bytes()?)
    }
}

/// Renders the document as an A4 PDF using the built-in Helvetica faces.
pub fn render_pdf(doc: &JdDocument) -> Result<Vec<u8>> {
    let lines = pdf_lines(doc);
    let title = lines
        .first()
        .map(|l| l.text.clone())
        .unwrap_or_default();
    let mut writer = PageWriter::new(&title)?;
    for line in &lines {
        writer.write(line);
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn texts(lines: &[PdfLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_layout_follows_document_sections() {
        let doc: JdDocument = serde_json::from_value(json!({
            "job_title": "HR Analyst",
            "reports_to": "HR Manager",
            "level": "Analyst",
            "department": "People",
            "role_summary": "Owns reporting.",
            "responsibilities": {"Reporting": ["Prepare dashboards"], "": ["Assist audits"]},
            "kpis": ["Reports on time"],
            "competencies": {"technical": ["Excel"], "behavioral": []}
        }))
        .unwrap();

        assert_eq!(
            texts(&pdf_lines(&doc)),
            vec![
                "HR Analyst",
                "Reports To: HR Manager",
                "Level: Analyst",
                "Department: People",
                "Role Summary",
                "Owns reporting.",
                "Responsibilities",
                "Reporting",
                "- Prepare dashboards",
                "General",
                "- Assist audits",
                "Key Performance Indicators",
                "- Reports on time",
                "Competencies",
                "Technical",
                "- Excel",
            ]
        );
    }

    #[test]
    fn test_empty_document_has_only_a_title() {
        assert_eq!(texts(&pdf_lines(&JdDocument::default())), vec!["Job Description"]);
    }

    #[test]
    fn test_raw_kpis_are_rendered() {
        let doc: JdDocument =
            serde_json::from_value(json!({"kpis": [{"kpi": "Attrition", "weight": "20%"}]}))
                .unwrap();
        let lines = pdf_lines(&doc);
        assert!(texts(&lines).contains(&r#"- {"kpi":"Attrition","weight":"20%"}"#));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("supercalifragilistic ok", 5), vec!["supercalifragilistic", "ok"]);
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let mut doc = JdDocument {
            job_title: Some("Payroll Specialist".into()),
            ..Default::default()
        };
        // enough lines to force a second page
        doc.kpis = (0..120).map(|i| format!("KPI number {i}")).collect();
        let bytes = render_pdf(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
