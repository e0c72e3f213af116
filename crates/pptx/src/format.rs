//! Paragraph and run formatting.
//!
//! Both formatters try the structured write first and fall back to a
//! documented degraded form when the text model refuses it: no first-line
//! indent for paragraphs, a single generic typeface for runs. The returned
//! outcome tells the caller which form was written.

use crate::text::{ParagraphFormat, RunFormat, EMU_PER_POINT};
use outline_core::Rgb;

/// First-line indent in EMU for `chars` character widths at `font_size_pt`.
pub fn first_line_indent_emu(chars: u32, font_size_pt: u32) -> i64 {
    i64::from(chars)
        .saturating_mul(i64::from(font_size_pt))
        .saturating_mul(EMU_PER_POINT)
}

/// What a paragraph ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphOutcome {
    Formatted,
    /// The indent was refused; the paragraph has no first-line indent.
    IndentDegraded,
}

/// Paragraph-level formatting for one kind of paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphFormatter {
    pub font_size_pt: u32,
    pub indent_chars: u32,
    pub line_spacing: f64,
    pub space_before_pt: f64,
    pub space_after_pt: f64,
    /// Titles never get a first-line indent.
    pub is_title: bool,
}

impl ParagraphFormatter {
    /// Formatter for title-like paragraphs: no indent, no spacing.
    pub fn title(font_size_pt: u32, line_spacing: f64) -> Self {
        Self {
            font_size_pt,
            indent_chars: 0,
            line_spacing,
            space_before_pt: 0.0,
            space_after_pt: 0.0,
            is_title: true,
        }
    }

    /// Formatter for body paragraphs.
    pub fn body(font_size_pt: u32, indent_chars: u32, line_spacing: f64, spacing_pt: f64) -> Self {
        Self {
            font_size_pt,
            indent_chars,
            line_spacing,
            space_before_pt: spacing_pt,
            space_after_pt: spacing_pt,
            is_title: false,
        }
    }

    pub fn apply<P: ParagraphFormat + ?Sized>(&self, paragraph: &mut P) -> ParagraphOutcome {
        paragraph.set_space_before(self.space_before_pt);
        paragraph.set_space_after(self.space_after_pt);
        paragraph.set_line_spacing(self.line_spacing);

        if self.is_title || self.indent_chars == 0 {
            return ParagraphOutcome::Formatted;
        }

        let emu = first_line_indent_emu(self.indent_chars, self.font_size_pt);
        match paragraph.set_first_line_indent(emu) {
            Ok(()) => ParagraphOutcome::Formatted,
            Err(e) => {
                log::warn!("First-line indent skipped: {}", e);
                ParagraphOutcome::IndentDegraded
            }
        }
    }
}

/// How a run's typefaces were bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontOutcome {
    /// Separate Latin, East-Asian and complex-script typefaces.
    PerScript,
    /// One generic typeface name.
    Generic,
    /// No typeface could be stored; the run inherits one.
    Inherited,
}

/// Run-level font assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct RunFontAssigner {
    pub east_asian: String,
    pub latin: String,
    pub size_pt: u32,
    pub color: Option<Rgb>,
    pub bold: bool,
}

impl RunFontAssigner {
    pub fn new(east_asian: impl Into<String>, latin: impl Into<String>, size_pt: u32) -> Self {
        Self {
            east_asian: east_asian.into(),
            latin: latin.into(),
            size_pt,
            color: None,
            bold: false,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Complex script shares the Latin typeface.
    pub fn apply<R: RunFormat + ?Sized>(&self, run: &mut R) -> FontOutcome {
        run.set_size(self.size_pt);
        run.set_bold(self.bold);
        if let Some(color) = self.color {
            run.set_color(color);
        }

        let err = match run.set_script_typefaces(&self.latin, &self.east_asian, &self.latin) {
            Ok(()) => return FontOutcome::PerScript,
            Err(e) => e,
        };
        log::warn!("Per-script typefaces refused ({}); using a single font name", err);

        for name in [&self.east_asian, &self.latin] {
            if run.set_font_name(name).is_ok() {
                return FontOutcome::Generic;
            }
        }
        FontOutcome::Inherited
    }
}
