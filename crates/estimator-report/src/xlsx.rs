//! Spreadsheet rendering
//!
//! The sheet is first laid out as plain rows ([`layout`]) and then written
//! with `rust_xlsxwriter`, so the layout can be checked without opening a
//! workbook.

use estimator_model::EstimationDocument;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

pub const SHEET_NAME: &str = "Project Estimation";
pub const TITLE: &str = "PROJECT ESTIMATE";

const TABLE_HEADERS: [&str; 8] = [
    "Phase",
    "Task Name",
    "Resource",
    "Min Hours",
    "Max Hours",
    "Start Date",
    "End Date",
    "Status",
];
const RISK_HEADERS: [&str; 4] = ["Risk", "Phase", "Impact", "Mitigation"];
const COLUMN_WIDTHS: [f64; 8] = [35.0, 45.0, 20.0, 20.0, 15.0, 15.0, 15.0, 15.0];

const HEADER_BLUE: u32 = 0x366092;
const SUBTOTAL_YELLOW: u32 = 0xFFFF00;
const RISK_GREY: u32 = 0xD9D9D9;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowKind {
    Title,
    Info,
    TableHeader,
    PhaseHeader,
    Task,
    Subtotal,
    GrandTotal,
    SectionTitle,
    SummaryItem,
    RiskHeader,
    Risk,
    Recommendation,
}

impl RowKind {
    /// Columns that carry this row's border/fill, even when blank.
    const fn span(self) -> u16 {
        match self {
            Self::TableHeader | Self::PhaseHeader | Self::Task | Self::Subtotal | Self::GrandTotal => 8,
            Self::RiskHeader | Self::Risk => 4,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Row {
    pub index: u32,
    pub kind: RowKind,
    pub cells: Vec<(u16, Cell)>,
}

impl Row {
    pub(crate) fn text(&self, col: u16) -> Option<&str> {
        self.cells.iter().find_map(|(c, cell)| match cell {
            Cell::Text(text) if *c == col => Some(text.as_str()),
            _ => None,
        })
    }

    #[cfg(test)]
    pub(crate) fn number(&self, col: u16) -> Option<f64> {
        self.cells.iter().find_map(|(c, cell)| match cell {
            Cell::Number(n) if *c == col => Some(*n),
            _ => None,
        })
    }
}

struct Layout {
    rows: Vec<Row>,
    next: u32,
}

impl Layout {
    fn push(&mut self, kind: RowKind, cells: Vec<(u16, Cell)>) {
        self.rows.push(Row {
            index: self.next,
            kind,
            cells,
        });
        self.next += 1;
    }

    fn skip(&mut self, rows: u32) {
        self.next += rows;
    }
}

/// `"DEVELOPMENT PHASE"` → `"DEVELOPMENT Subtotal"`.
pub(crate) fn subtotal_label(phase_name: &str) -> String {
    let trimmed = phase_name.trim();
    let base = match trimmed.len().checked_sub(5) {
        Some(cut) if trimmed.is_char_boundary(cut) && trimmed[cut..].eq_ignore_ascii_case("phase") => {
            trimmed[..cut].trim_end()
        }
        _ => trimmed,
    };
    if base.is_empty() {
        "Subtotal".to_string()
    } else {
        format!("{base} Subtotal")
    }
}

/// Rows of the estimation sheet, top to bottom.
pub(crate) fn layout(doc: &EstimationDocument) -> Vec<Row> {
    let mut sheet = Layout {
        rows: Vec::new(),
        next: 0,
    };

    sheet.push(RowKind::Title, vec![(0, TITLE.into())]);
    sheet.skip(1);

    let info = &doc.project_info;
    for (label, value) in [
        ("Title:", &info.title),
        ("Project Name:", &info.project_name),
        ("Client:", &info.client),
        ("Date:", &info.date),
        ("Version:", &info.version),
        ("Prepared By:", &info.prepared_by),
        ("Assumptions:", &info.assumptions),
    ] {
        sheet.push(RowKind::Info, vec![(0, label.into()), (1, value.clone().into())]);
    }
    sheet.skip(2);

    sheet.push(
        RowKind::TableHeader,
        TABLE_HEADERS
            .iter()
            .enumerate()
            .map(|(col, header)| (col as u16, Cell::from(*header)))
            .collect(),
    );

    for phase in &doc.phases {
        sheet.push(RowKind::PhaseHeader, vec![(0, phase.name.clone().into())]);
        for task in &phase.tasks {
            sheet.push(
                RowKind::Task,
                vec![
                    (1, task.task_name.clone().into()),
                    (2, task.resource.clone().into()),
                    (3, Cell::Number(task.min_hours)),
                    (4, Cell::Number(task.max_hours)),
                    (5, task.start_date.clone().into()),
                    (6, task.end_date.clone().into()),
                    (7, task.status.clone().into()),
                ],
            );
        }
        sheet.push(
            RowKind::Subtotal,
            vec![
                (0, subtotal_label(&phase.name).into()),
                (3, Cell::Number(phase.subtotal.min_hours)),
                (4, Cell::Number(phase.subtotal.max_hours)),
            ],
        );
        sheet.skip(1);
    }

    let summary = &doc.summary;
    sheet.push(
        RowKind::GrandTotal,
        vec![
            (0, "GRAND TOTAL".into()),
            (3, Cell::Number(summary.total_min_hours)),
            (4, Cell::Number(summary.total_max_hours)),
        ],
    );
    sheet.skip(3);

    sheet.push(RowKind::SectionTitle, vec![(0, "PROJECT SUMMARY".into())]);
    for (label, value) in [
        ("Total Min Hours:", summary.total_min_hours),
        ("Total Max Hours:", summary.total_max_hours),
        (
            "Estimated Duration (Weeks):",
            summary.estimated_duration_weeks as f64,
        ),
        (
            "Recommended Team Size:",
            f64::from(summary.recommended_team_size),
        ),
        ("Total Tasks:", summary.total_tasks as f64),
        ("Total Phases:", summary.total_phases as f64),
    ] {
        sheet.push(
            RowKind::SummaryItem,
            vec![(0, label.into()), (1, Cell::Number(value))],
        );
    }
    sheet.skip(2);

    if !doc.risks.is_empty() {
        sheet.push(RowKind::SectionTitle, vec![(0, "RISKS & CONSIDERATIONS".into())]);
        sheet.push(
            RowKind::RiskHeader,
            RISK_HEADERS
                .iter()
                .enumerate()
                .map(|(col, header)| (col as u16, Cell::from(*header)))
                .collect(),
        );
        for risk in &doc.risks {
            sheet.push(
                RowKind::Risk,
                vec![
                    (0, risk.description.clone().into()),
                    (1, risk.phase.clone().into()),
                    (2, risk.impact.clone().into()),
                    (3, risk.mitigation.clone().into()),
                ],
            );
        }
        sheet.skip(2);
    }

    if !doc.recommendations.is_empty() {
        sheet.push(RowKind::SectionTitle, vec![(0, "RECOMMENDATIONS".into())]);
        for (i, recommendation) in doc.recommendations.iter().enumerate() {
            sheet.push(
                RowKind::Recommendation,
                vec![
                    (0, format!("{}.", i + 1).into()),
                    (1, recommendation.display_text().into()),
                ],
            );
        }
    }

    sheet.rows
}

struct Formats {
    title: Format,
    header: Format,
    phase: Format,
    task: Format,
    subtotal: Format,
    grand_total: Format,
    section: Format,
    risk_header: Format,
    risk: Format,
    plain: Format,
}

impl Formats {
    fn new() -> Self {
        let bordered = Format::new().set_border(FormatBorder::Thin);
        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(11)
                .set_font_color(0xFFFFFF)
                .set_background_color(HEADER_BLUE)
                .set_align(FormatAlign::Center),
            header: bordered
                .clone()
                .set_bold()
                .set_font_color(0xFFFFFF)
                .set_background_color(HEADER_BLUE),
            phase: bordered.clone().set_bold(),
            task: bordered.clone(),
            subtotal: bordered
                .clone()
                .set_bold()
                .set_font_size(10)
                .set_background_color(SUBTOTAL_YELLOW),
            grand_total: bordered.clone().set_bold().set_font_size(12),
            section: Format::new().set_bold().set_font_size(12),
            risk_header: bordered
                .clone()
                .set_bold()
                .set_font_size(10)
                .set_background_color(RISK_GREY),
            risk: bordered,
            plain: Format::new(),
        }
    }

    fn for_kind(&self, kind: RowKind) -> &Format {
        match kind {
            RowKind::Title => &self.title,
            RowKind::TableHeader => &self.header,
            RowKind::PhaseHeader => &self.phase,
            RowKind::Task => &self.task,
            RowKind::Subtotal => &self.subtotal,
            RowKind::GrandTotal => &self.grand_total,
            RowKind::SectionTitle => &self.section,
            RowKind::RiskHeader => &self.risk_header,
            RowKind::Risk => &self.risk,
            RowKind::Info | RowKind::SummaryItem | RowKind::Recommendation => &self.plain,
        }
    }
}

fn write_row(sheet: &mut Worksheet, row: &Row, formats: &Formats) -> Result<(), XlsxError> {
    let format = formats.for_kind(row.kind);

    if row.kind == RowKind::Title {
        let text = row.text(0).unwrap_or(TITLE);
        sheet.merge_range(row.index, 0, row.index, 7, text, format)?;
        return Ok(());
    }

    for col in 0..row.kind.span() {
        if !row.cells.iter().any(|(c, _)| *c == col) {
            sheet.write_blank(row.index, col, format)?;
        }
    }
    for (col, cell) in &row.cells {
        match cell {
            Cell::Text(text) => sheet.write_string_with_format(row.index, *col, text, format)?,
            Cell::Number(value) => {
                sheet.write_number_with_format(row.index, *col, *value, format)?
            }
        };
    }
    Ok(())
}

/// XLSX workbook bytes for `doc`.
pub fn render_xlsx(doc: &EstimationDocument) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let formats = Formats::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }
    for row in layout(doc) {
        write_row(sheet, &row, &formats)?;
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimator_model::{HoursRange, Phase, Recommendation, Risk, Summary, Task};

    fn sample() -> EstimationDocument {
        let task = |name: &str, min: f64, max: f64| Task {
            task_name: name.to_string(),
            resource: "Backend Developer".to_string(),
            min_hours: min,
            max_hours: max,
            ..Task::default()
        };
        let mut design = Phase::new("DESIGN & ARCHITECTURE PHASE", vec![task("Architecture", 24.0, 32.0)]);
        design.subtotal = HoursRange {
            min_hours: 24.0,
            max_hours: 32.0,
        };
        let mut dev = Phase::new(
            "Development",
            vec![task("API", 40.0, 60.0), task("UI", 20.0, 30.0)],
        );
        dev.subtotal = HoursRange {
            min_hours: 60.0,
            max_hours: 90.0,
        };

        EstimationDocument {
            phases: vec![design, dev],
            summary: Summary {
                total_min_hours: 84.0,
                total_max_hours: 122.0,
                estimated_duration_weeks: 2,
                recommended_team_size: 2,
                total_tasks: 3,
                total_phases: 2,
            },
            risks: vec![Risk {
                phase: "Development".to_string(),
                impact: "High".to_string(),
                mitigation: "Spike early".to_string(),
                ..Risk::new("Third-party API instability")
            }],
            recommendations: vec![Recommendation::Text("Start with a spike".to_string())],
            ..EstimationDocument::default()
        }
    }

    fn find<'a>(rows: &'a [Row], kind: RowKind) -> Vec<&'a Row> {
        rows.iter().filter(|row| row.kind == kind).collect()
    }

    #[test]
    fn test_subtotal_label() {
        assert_eq!(subtotal_label("DEVELOPMENT PHASE"), "DEVELOPMENT Subtotal");
        assert_eq!(subtotal_label("Testing & QA Phase"), "Testing & QA Subtotal");
        assert_eq!(subtotal_label("Database"), "Database Subtotal");
        assert_eq!(subtotal_label("PHASE"), "Subtotal");
        assert_eq!(subtotal_label("Überphase"), "Über Subtotal");
    }

    #[test]
    fn test_layout_sections_in_order() {
        let rows = layout(&sample());

        assert_eq!(rows[0].kind, RowKind::Title);
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[1].index, 2);
        assert_eq!(rows[1].text(0), Some("Title:"));

        let header = find(&rows, RowKind::TableHeader)[0];
        assert_eq!(header.cells.len(), 8);
        assert_eq!(header.text(7), Some("Status"));

        let kinds: Vec<RowKind> = rows
            .iter()
            .map(|row| row.kind)
            .filter(|kind| !matches!(kind, RowKind::Info | RowKind::SummaryItem))
            .collect();
        assert_eq!(
            kinds,
            vec![
                RowKind::Title,
                RowKind::TableHeader,
                RowKind::PhaseHeader,
                RowKind::Task,
                RowKind::Subtotal,
                RowKind::PhaseHeader,
                RowKind::Task,
                RowKind::Task,
                RowKind::Subtotal,
                RowKind::GrandTotal,
                RowKind::SectionTitle,
                RowKind::SectionTitle,
                RowKind::RiskHeader,
                RowKind::Risk,
                RowKind::SectionTitle,
                RowKind::Recommendation,
            ]
        );
    }

    #[test]
    fn test_subtotal_and_grand_total_values() {
        let rows = layout(&sample());
        let subtotals = find(&rows, RowKind::Subtotal);
        assert_eq!(subtotals[0].text(0), Some("DESIGN & ARCHITECTURE Subtotal"));
        assert_eq!(subtotals[1].text(0), Some("Development Subtotal"));
        assert_eq!(subtotals[1].number(3), Some(60.0));
        assert_eq!(subtotals[1].number(4), Some(90.0));

        let total = find(&rows, RowKind::GrandTotal)[0];
        assert_eq!(total.text(0), Some("GRAND TOTAL"));
        assert_eq!(total.number(3), Some(84.0));
        assert_eq!(total.number(4), Some(122.0));
    }

    #[test]
    fn test_blank_row_between_phases() {
        let rows = layout(&sample());
        let subtotal = find(&rows, RowKind::Subtotal)[0];
        let next_phase = find(&rows, RowKind::PhaseHeader)[1];
        assert_eq!(next_phase.index, subtotal.index + 2);
    }

    #[test]
    fn test_recommendations_are_numbered() {
        let rows = layout(&sample());
        let rec = find(&rows, RowKind::Recommendation)[0];
        assert_eq!(rec.text(0), Some("1."));
        assert_eq!(rec.text(1), Some("Start with a spike"));
    }

    #[test]
    fn test_empty_document_skips_optional_sections() {
        let rows = layout(&EstimationDocument::default());
        assert!(find(&rows, RowKind::RiskHeader).is_empty());
        assert!(find(&rows, RowKind::Recommendation).is_empty());
        assert_eq!(find(&rows, RowKind::GrandTotal).len(), 1);
        assert_eq!(find(&rows, RowKind::SummaryItem).len(), 6);
    }

    #[test]
    fn test_row_indices_strictly_increase() {
        let rows = layout(&sample());
        assert!(rows.windows(2).all(|pair| pair[0].index < pair[1].index));
    }

    #[test]
    fn test_render_produces_xlsx_container() {
        let bytes = render_xlsx(&sample()).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[0..2], b"PK");
    }
}
