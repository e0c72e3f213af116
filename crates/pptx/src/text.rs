//! DrawingML text model: text bodies, paragraphs and runs.
//!
//! Formatting goes through the [`ParagraphFormat`] and [`RunFormat`] traits.
//! Setters that the model can refuse return a `Result`, so callers can fall
//! back to a degraded form instead of failing the run.

use outline_core::Rgb;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

/// Native length units per point.
pub const EMU_PER_POINT: i64 = 12_700;

/// Bound of `ST_TextIndent` (`a:pPr/@indent`) in EMU.
pub const MAX_INDENT_EMU: i64 = 51_206_400;

/// A formatting value the text model refused to store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejected {
    #[error("indent {0} EMU is outside the DrawingML range of ±{max}", max = MAX_INDENT_EMU)]
    Indent(i64),

    #[error("typeface {0:?} contains characters XML cannot carry")]
    Typeface(String),
}

/// Paragraph-level setters.
pub trait ParagraphFormat {
    fn set_space_before(&mut self, points: f64);
    fn set_space_after(&mut self, points: f64);
    fn set_line_spacing(&mut self, multiple: f64);
    /// Store a first-line indent, or refuse it without side effects.
    fn set_first_line_indent(&mut self, emu: i64) -> Result<(), Rejected>;
}

/// Run-level setters.
pub trait RunFormat {
    fn set_size(&mut self, points: u32);
    fn set_bold(&mut self, bold: bool);
    fn set_color(&mut self, color: Rgb);
    /// Bind separate Latin, East-Asian and complex-script typefaces.
    fn set_script_typefaces(
        &mut self,
        latin: &str,
        east_asian: &str,
        complex_script: &str,
    ) -> Result<(), Rejected>;
    /// Bind one typeface for all text of the run.
    fn set_font_name(&mut self, typeface: &str) -> Result<(), Rejected>;
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

impl Alignment {
    fn as_attr(&self) -> &'static str {
        match self {
            Alignment::Left => "l",
            Alignment::Center => "ctr",
        }
    }
}

/// Characters allowed in XML 1.0 documents.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

fn typeface_ok(name: &str) -> Result<(), Rejected> {
    if name.chars().all(|c| is_xml_char(c) && !c.is_control()) {
        Ok(())
    } else {
        Err(Rejected::Typeface(name.to_string()))
    }
}

/// Character properties of a run (`a:rPr`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProperties {
    pub size_pt: Option<u32>,
    pub bold: Option<bool>,
    pub color: Option<Rgb>,
    pub latin: Option<String>,
    pub east_asian: Option<String>,
    pub complex_script: Option<String>,
}

/// A run of text with uniform formatting (`a:r`).
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    text: String,
    pub props: RunProperties,
}

impl TextRun {
    /// Create a run, dropping characters XML cannot represent.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.chars().filter(|&c| is_xml_char(c)).collect(),
            props: RunProperties::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> quick_xml::Result<()> {
        writer.write_event(Event::Start(BytesStart::new("a:r")))?;

        let props = &self.props;
        let mut rpr = BytesStart::new("a:rPr");
        if let Some(size) = props.size_pt {
            rpr.push_attribute(("sz", size.saturating_mul(100).to_string().as_str()));
        }
        if let Some(bold) = props.bold {
            rpr.push_attribute(("b", if bold { "1" } else { "0" }));
        }

        let has_children = props.color.is_some()
            || props.latin.is_some()
            || props.east_asian.is_some()
            || props.complex_script.is_some();

        if has_children {
            writer.write_event(Event::Start(rpr))?;
            if let Some(color) = props.color {
                writer.write_event(Event::Start(BytesStart::new("a:solidFill")))?;
                let mut clr = BytesStart::new("a:srgbClr");
                clr.push_attribute(("val", color.hex().as_str()));
                writer.write_event(Event::Empty(clr))?;
                writer.write_event(Event::End(BytesEnd::new("a:solidFill")))?;
            }
            for (tag, face) in [
                ("a:latin", &props.latin),
                ("a:ea", &props.east_asian),
                ("a:cs", &props.complex_script),
            ] {
                if let Some(face) = face {
                    let mut el = BytesStart::new(tag);
                    el.push_attribute(("typeface", face.as_str()));
                    writer.write_event(Event::Empty(el))?;
                }
            }
            writer.write_event(Event::End(BytesEnd::new("a:rPr")))?;
        } else {
            writer.write_event(Event::Empty(rpr))?;
        }

        writer.write_event(Event::Start(BytesStart::new("a:t")))?;
        writer.write_event(Event::Text(BytesText::new(&self.text)))?;
        writer.write_event(Event::End(BytesEnd::new("a:t")))?;
        writer.write_event(Event::End(BytesEnd::new("a:r")))?;
        Ok(())
    }
}

impl RunFormat for TextRun {
    fn set_size(&mut self, points: u32) {
        self.props.size_pt = Some(points);
    }

    fn set_bold(&mut self, bold: bool) {
        self.props.bold = Some(bold);
    }

    fn set_color(&mut self, color: Rgb) {
        self.props.color = Some(color);
    }

    fn set_script_typefaces(
        &mut self,
        latin: &str,
        east_asian: &str,
        complex_script: &str,
    ) -> Result<(), Rejected> {
        typeface_ok(latin)?;
        typeface_ok(east_asian)?;
        typeface_ok(complex_script)?;
        self.props.latin = Some(latin.to_string());
        self.props.east_asian = Some(east_asian.to_string());
        self.props.complex_script = Some(complex_script.to_string());
        Ok(())
    }

    /// DrawingML has no script-neutral font name; the Latin binding is the
    /// one every viewer falls back to.
    fn set_font_name(&mut self, typeface: &str) -> Result<(), Rejected> {
        typeface_ok(typeface)?;
        self.props.latin = Some(typeface.to_string());
        self.props.east_asian = None;
        self.props.complex_script = None;
        Ok(())
    }
}

/// Paragraph properties (`a:pPr`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProperties {
    /// Outline level, 0-based.
    pub level: Option<u8>,
    pub alignment: Option<Alignment>,
    /// First-line indent in EMU.
    pub indent_emu: Option<i64>,
    pub line_spacing: Option<f64>,
    pub space_before_pt: Option<f64>,
    pub space_after_pt: Option<f64>,
}

impl ParagraphProperties {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A paragraph (`a:p`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub props: ParagraphProperties,
    runs: Vec<TextRun>,
}

impl Paragraph {
    /// A paragraph holding one run of `text`.
    pub fn with_text(text: &str) -> Self {
        Self {
            props: ParagraphProperties::default(),
            runs: vec![TextRun::new(text)],
        }
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn runs_mut(&mut self) -> &mut [TextRun] {
        &mut self.runs
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text()).collect()
    }

    pub fn set_level(&mut self, level: u8) {
        self.props.level = Some(level);
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.props.alignment = Some(alignment);
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> quick_xml::Result<()> {
        writer.write_event(Event::Start(BytesStart::new("a:p")))?;

        let props = &self.props;
        if !props.is_empty() {
            let mut ppr = BytesStart::new("a:pPr");
            if let Some(level) = props.level {
                ppr.push_attribute(("lvl", level.to_string().as_str()));
            }
            if let Some(indent) = props.indent_emu {
                ppr.push_attribute(("indent", indent.to_string().as_str()));
            }
            if let Some(alignment) = props.alignment {
                ppr.push_attribute(("algn", alignment.as_attr()));
            }

            let spacing = [
                ("a:lnSpc", "a:spcPct", props.line_spacing.map(percent_val)),
                ("a:spcBef", "a:spcPts", props.space_before_pt.map(points_val)),
                ("a:spcAft", "a:spcPts", props.space_after_pt.map(points_val)),
            ];

            if spacing.iter().any(|(_, _, v)| v.is_some()) {
                writer.write_event(Event::Start(ppr))?;
                for (outer, inner, value) in spacing {
                    if let Some(value) = value {
                        writer.write_event(Event::Start(BytesStart::new(outer)))?;
                        let mut el = BytesStart::new(inner);
                        el.push_attribute(("val", value.to_string().as_str()));
                        writer.write_event(Event::Empty(el))?;
                        writer.write_event(Event::End(BytesEnd::new(outer)))?;
                    }
                }
                writer.write_event(Event::End(BytesEnd::new("a:pPr")))?;
            } else {
                writer.write_event(Event::Empty(ppr))?;
            }
        }

        for run in &self.runs {
            run.write(writer)?;
        }

        writer.write_event(Event::End(BytesEnd::new("a:p")))?;
        Ok(())
    }
}

/// `spcPct` value: thousandths of a percent (1.5 → 150000).
fn percent_val(multiple: f64) -> i64 {
    (multiple * 100_000.0).round() as i64
}

/// `spcPts` value: hundredths of a point.
fn points_val(points: f64) -> i64 {
    (points * 100.0).round() as i64
}

impl ParagraphFormat for Paragraph {
    fn set_space_before(&mut self, points: f64) {
        self.props.space_before_pt = Some(points);
    }

    fn set_space_after(&mut self, points: f64) {
        self.props.space_after_pt = Some(points);
    }

    fn set_line_spacing(&mut self, multiple: f64) {
        self.props.line_spacing = Some(multiple);
    }

    fn set_first_line_indent(&mut self, emu: i64) -> Result<(), Rejected> {
        if emu.abs() > MAX_INDENT_EMU {
            return Err(Rejected::Indent(emu));
        }
        self.props.indent_emu = Some(emu);
        Ok(())
    }
}

/// The text of a shape (`p:txBody`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBody {
    paragraphs: Vec<Paragraph>,
}

impl TextBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single-run paragraph and return it for formatting.
    pub fn add_paragraph(&mut self, text: &str) -> &mut Paragraph {
        self.paragraphs.push(Paragraph::with_text(text));
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Write `p:txBody`. An empty body still gets the one `a:p` the schema
    /// requires.
    pub(crate) fn write(&self, writer: &mut Writer<Vec<u8>>) -> quick_xml::Result<()> {
        writer.write_event(Event::Start(BytesStart::new("p:txBody")))?;
        writer.write_event(Event::Empty(BytesStart::new("a:bodyPr")))?;
        writer.write_event(Event::Empty(BytesStart::new("a:lstStyle")))?;

        if self.paragraphs.is_empty() {
            writer.write_event(Event::Empty(BytesStart::new("a:p")))?;
        }
        for paragraph in &self.paragraphs {
            paragraph.write(writer)?;
        }

        writer.write_event(Event::End(BytesEnd::new("p:txBody")))?;
        Ok(())
    }
}
