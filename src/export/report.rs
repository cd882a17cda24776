use chrono::{DateTime, TimeZone};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::error::DocumentError;
use crate::format::{format_gb, wrap_text};
use crate::i18n::Locale;
use crate::system::snapshot::Snapshot;

pub const TITLE: &str = "ENGINEERING WORKSTATION DIAGNOSTICS";
pub const SPECIFICATIONS_HEADING: &str = "SYSTEM SPECIFICATIONS:";
pub const DETAILS_HEADING: &str = "DETAILED INFORMATION:";

const MM: f32 = 72.0 / 25.4;
const PAGE_WIDTH: f32 = 210.0 * MM;
const PAGE_HEIGHT: f32 = 297.0 * MM;
const MARGIN_LEFT: f32 = 20.0 * MM;
const MARGIN_TOP: f32 = 30.0 * MM;
const MARGIN_BOTTOM: f32 = 20.0 * MM;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Generated,
    Heading,
    Field,
    /// Wrapped tail of the preceding field.
    Continuation,
}

impl LineKind {
    pub fn font_size(self) -> u32 {
        match self {
            LineKind::Title => 20,
            LineKind::Generated => 12,
            LineKind::Heading => 14,
            LineKind::Field | LineKind::Continuation => 10,
        }
    }

    /// Vertical distance from the previous baseline, in points.
    fn advance(self) -> f32 {
        let mm = match self {
            LineKind::Title => 0.0,
            LineKind::Generated => 15.0,
            LineKind::Heading => 20.0,
            LineKind::Field => 10.0,
            LineKind::Continuation => 5.0,
        };
        mm * MM
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub kind: LineKind,
    pub text: String,
}

/// Text content of the diagnostics report, independent of its encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub lines: Vec<ReportLine>,
}

pub fn specification_lines(snapshot: &Snapshot) -> Vec<String> {
    let browser = &snapshot.browser;
    vec![
        format!("CPU Cores: {}", snapshot.cpu.cores),
        format!(
            "Screen Resolution: {}x{}",
            snapshot.screen.width, snapshot.screen.height
        ),
        format!("Color Depth: {}-bit", snapshot.screen.color_depth),
        format!("Browser: {} {}", browser.name, browser.version),
        format!("Platform: {}", snapshot.host.platform),
        format!("Language: {}", snapshot.host.language),
        format!(
            "Online Status: {}",
            if snapshot.network.online {
                "Connected"
            } else {
                "Offline"
            }
        ),
        format!(
            "Truecolor Support: {}",
            if browser.truecolor { "Yes" } else { "No" }
        ),
    ]
}

pub fn detail_lines(snapshot: &Snapshot) -> Vec<String> {
    vec![
        format!("User Agent: {}", snapshot.browser.user_agent),
        format!("Memory: {}GB", format_gb(snapshot.memory.total)),
        format!("Cores: {}", snapshot.cpu.cores),
        format!("GPU: {} {}", snapshot.gpu.vendor, snapshot.gpu.renderer),
        format!("Session: {}", snapshot.system.session_id),
    ]
}

impl ReportDocument {
    pub fn from_snapshot<Tz: TimeZone>(
        snapshot: &Snapshot,
        locale: Locale,
        generated_at: &DateTime<Tz>,
        wrap_columns: usize,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let line = |kind, text: String| ReportLine { kind, text };
        let mut lines = vec![
            line(LineKind::Title, TITLE.to_string()),
            line(
                LineKind::Generated,
                format!("Generated: {}", locale.format_timestamp(generated_at)),
            ),
            line(LineKind::Heading, SPECIFICATIONS_HEADING.to_string()),
        ];
        lines.extend(
            specification_lines(snapshot)
                .into_iter()
                .map(|text| line(LineKind::Field, text)),
        );
        lines.push(line(LineKind::Heading, DETAILS_HEADING.to_string()));
        for detail in detail_lines(snapshot) {
            let mut wrapped = wrap_text(&detail, wrap_columns).into_iter();
            if let Some(first) = wrapped.next() {
                lines.push(line(LineKind::Field, first));
            }
            lines.extend(wrapped.map(|text| line(LineKind::Continuation, text)));
        }
        ReportDocument { lines }
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Assign every line to a page and a baseline (points from the page
    /// bottom). A line whose baseline would pass the bottom margin starts
    /// a new page.
    pub fn layout(&self) -> Vec<Vec<PlacedLine>> {
        let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
        let mut cursor = MARGIN_TOP;
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                cursor += line.kind.advance();
            }
            if cursor > PAGE_HEIGHT - MARGIN_BOTTOM {
                pages.push(Vec::new());
                cursor = MARGIN_TOP;
            }
            if let Some(page) = pages.last_mut() {
                page.push(PlacedLine {
                    x: MARGIN_LEFT.round() as i64,
                    y: (PAGE_HEIGHT - cursor).round() as i64,
                    size: line.kind.font_size(),
                    text: line.text.clone(),
                });
            }
        }
        pages
    }

    pub fn to_pdf(&self) -> Result<Vec<u8>, DocumentError> {
        encode_pdf(&self.layout())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub x: i64,
    pub y: i64,
    pub size: u32,
    pub text: String,
}

/// Courier only covers Latin-1; anything outside printable ASCII is
/// replaced so the core font renders every byte.
fn pdf_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c as u8 } else { b'?' })
        .collect()
}

fn page_content(lines: &[PlacedLine]) -> Content {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    for line in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec!["F1".into(), Object::Integer(line.size as i64)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Integer(line.x), Object::Integer(line.y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(pdf_text(&line.text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}

pub fn encode_pdf(pages: &[Vec<PlacedLine>]) -> Result<Vec<u8>, DocumentError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<ObjectId> = Vec::with_capacity(pages.len());
    for lines in pages {
        let content = page_content(lines);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        kids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        }));
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids.iter().map(|&id| Object::Reference(id)).collect::<Vec<Object>>(),
        "Count" => Object::Integer(kids.len() as i64),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH.round() as i64),
            Object::Integer(PAGE_HEIGHT.round() as i64),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| DocumentError::Write(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use insta::assert_snapshot;

    use super::*;
    use crate::system::snapshot::tests::{sample_readings, sample_system};

    fn snapshot() -> Snapshot {
        Snapshot::assemble(sample_readings(4), 1, sample_system(1_700_000_000_000), None).unwrap()
    }

    fn generated() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 2).unwrap()
    }

    #[test]
    fn report_text_lists_specs_then_details() {
        let doc = ReportDocument::from_snapshot(&snapshot(), Locale::Ko, &generated(), 90);
        assert_snapshot!(doc.text(), @r"
        ENGINEERING WORKSTATION DIAGNOSTICS
        Generated: 2024. 03. 09. 17:05:02
        SYSTEM SPECIFICATIONS:
        CPU Cores: 4
        Screen Resolution: 2560x1440
        Color Depth: 24-bit
        Browser: WezTerm 20240203
        Platform: TestOS
        Language: en-US
        Online Status: Connected
        Truecolor Support: Yes
        DETAILED INFORMATION:
        User Agent: WezTerm/20240203 (xterm-256color; truecolor)
        Memory: 16GB
        Cores: 4
        GPU: NVIDIA NVIDIA GeForce RTX 3080
        Session: k3j2h1g0f9d8s
        ");
    }

    #[test]
    fn first_specification_line_is_core_count() {
        let lines = specification_lines(&snapshot());
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "CPU Cores: 4");
        assert!(lines.contains(&"Platform: TestOS".to_string()));
    }

    #[test]
    fn long_details_wrap_into_continuations() {
        let mut snapshot = snapshot();
        snapshot.browser.user_agent = "token ".repeat(40);
        let doc = ReportDocument::from_snapshot(&snapshot, Locale::En, &generated(), 30);
        let agent = doc
            .lines
            .iter()
            .position(|l| l.text.starts_with("User Agent:"))
            .unwrap();
        assert_eq!(doc.lines[agent].kind, LineKind::Field);
        assert_eq!(doc.lines[agent + 1].kind, LineKind::Continuation);
        assert!(doc.lines.iter().all(|l| l.text.chars().count() <= 35));
    }

    #[test]
    fn short_report_fits_one_page() {
        let doc = ReportDocument::from_snapshot(&snapshot(), Locale::En, &generated(), 90);
        let pages = doc.layout();
        assert_eq!(pages.len(), 1);
        let ys: Vec<i64> = pages[0].iter().map(|l| l.y).collect();
        assert!(ys.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn overflowing_lines_start_a_new_page() {
        let mut snapshot = snapshot();
        snapshot.browser.user_agent = "x ".repeat(2000);
        let doc = ReportDocument::from_snapshot(&snapshot, Locale::En, &generated(), 20);
        let pages = doc.layout();
        assert!(pages.len() > 1);
        let bottom = (MARGIN_BOTTOM - 1.0) as i64;
        for page in &pages {
            assert!(page.iter().all(|l| l.y >= bottom));
        }
        assert_eq!(pages[1][0].y, (PAGE_HEIGHT - MARGIN_TOP).round() as i64);
    }

    #[test]
    fn non_ascii_text_is_replaced() {
        assert_eq!(pdf_text("ok 한"), b"ok ?".to_vec());
    }

    #[test]
    fn encodes_a_pdf_document() {
        let doc = ReportDocument::from_snapshot(&snapshot(), Locale::En, &generated(), 90);
        let bytes = doc.to_pdf().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let parsed = Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 1);
    }
}
