//! Rendering a composed deck into a document model.

use crate::format::{FontOutcome, ParagraphFormatter, ParagraphOutcome, RunFontAssigner};
use crate::layout::LayoutRole;
use crate::model::DocumentModel;
use crate::text::{Alignment, Paragraph, TextBody};
use outline_core::{Deck, FormattingConfig, Result, Rgb, SlideRole, SlideSpec, MAX_FONT_SIZE_PT};
use serde::Serialize;

/// Cover titles are this much larger than other titles.
const COVER_TITLE_BOOST_PT: u32 = 8;
const TITLE_LINE_SPACING: f64 = 1.2;
const SUBTITLE_LINE_SPACING: f64 = 1.5;

/// Which placeholder a notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    Title,
    Body,
}

/// A non-fatal rendering problem. Slide and paragraph numbers are 1-based
/// and count generated slides only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderNotice {
    /// The layout has no placeholder for this text, so it was not written.
    PlaceholderMissing {
        slide: usize,
        placeholder: PlaceholderKind,
    },
    /// The first-line indent was refused; the paragraph has none.
    IndentUnsupported { slide: usize, paragraph: usize },
    /// Per-script typefaces were refused; a single typeface was used.
    GenericFont { slide: usize, paragraph: usize },
}

/// Outcome of a successful assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyReport {
    /// Slides generated in this run, excluding any the template brought.
    pub slide_count: usize,
    pub notices: Vec<RenderNotice>,
}

/// Formatting for one kind of paragraph.
#[derive(Debug, Clone, PartialEq)]
struct TextStyle {
    paragraph: ParagraphFormatter,
    font: RunFontAssigner,
    alignment: Option<Alignment>,
}

impl TextStyle {
    fn apply(&self, paragraph: &mut Paragraph) -> (ParagraphOutcome, FontOutcome) {
        if let Some(alignment) = self.alignment {
            paragraph.set_alignment(alignment);
        }
        let paragraph_outcome = self.paragraph.apply(paragraph);

        // Every run must succeed for the paragraph to count as per-script.
        let mut font_outcome = FontOutcome::PerScript;
        for run in paragraph.runs_mut() {
            let outcome = self.font.apply(run);
            if outcome != FontOutcome::PerScript {
                font_outcome = outcome;
            }
        }
        (paragraph_outcome, font_outcome)
    }
}

/// Styles for every paragraph kind, derived once per run.
#[derive(Debug, Clone, PartialEq)]
struct DeckStyles {
    cover_title: TextStyle,
    cover_subtitle: TextStyle,
    heading: TextStyle,
    toc_entry: TextStyle,
    body: TextStyle,
}

impl DeckStyles {
    fn new(config: &FormattingConfig) -> Self {
        let font = |size: u32, color: Rgb, bold: bool| {
            RunFontAssigner::new(
                config.east_asian_typeface.as_str(),
                config.latin_typeface.as_str(),
                size,
            )
            .with_color(color)
            .with_bold(bold)
        };
        let theme = &config.theme;
        let cover_size = config
            .title_size_pt
            .saturating_add(COVER_TITLE_BOOST_PT)
            .min(MAX_FONT_SIZE_PT);

        Self {
            cover_title: TextStyle {
                paragraph: ParagraphFormatter::title(cover_size, TITLE_LINE_SPACING),
                font: font(cover_size, theme.title_color, true),
                alignment: Some(Alignment::Center),
            },
            cover_subtitle: TextStyle {
                paragraph: ParagraphFormatter::body(config.body_size_pt, 0, SUBTITLE_LINE_SPACING, 0.0),
                font: font(config.body_size_pt, theme.body_color, false),
                alignment: Some(Alignment::Center),
            },
            heading: TextStyle {
                paragraph: ParagraphFormatter::title(config.title_size_pt, TITLE_LINE_SPACING),
                font: font(config.title_size_pt, theme.title_color, true),
                alignment: Some(Alignment::Left),
            },
            toc_entry: TextStyle {
                paragraph: ParagraphFormatter::body(
                    config.body_size_pt,
                    0,
                    config.line_spacing,
                    config.paragraph_spacing_pt,
                ),
                font: font(config.body_size_pt, theme.body_color, true),
                alignment: None,
            },
            body: TextStyle {
                paragraph: ParagraphFormatter::body(
                    config.body_size_pt,
                    config.first_line_indent_chars,
                    config.line_spacing,
                    config.paragraph_spacing_pt,
                ),
                font: font(config.body_size_pt, theme.body_color, false),
                alignment: None,
            },
        }
    }

    fn title(&self, role: SlideRole) -> &TextStyle {
        match role {
            SlideRole::Cover => &self.cover_title,
            SlideRole::TableOfContents | SlideRole::Content => &self.heading,
        }
    }

    fn body(&self, role: SlideRole) -> &TextStyle {
        match role {
            SlideRole::Cover => &self.cover_subtitle,
            SlideRole::TableOfContents => &self.toc_entry,
            SlideRole::Content => &self.body,
        }
    }
}

/// Writes each slide spec of a deck into a [`DocumentModel`].
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    styles: DeckStyles,
}

impl DocumentAssembler {
    /// Create an assembler for an already validated configuration.
    pub fn new(config: &FormattingConfig) -> Self {
        Self {
            styles: DeckStyles::new(config),
        }
    }

    /// Render `deck` into `model` and serialize the result.
    pub fn assemble(&self, deck: &Deck, mut model: DocumentModel) -> Result<(Vec<u8>, AssemblyReport)> {
        let mut report = AssemblyReport::default();

        for (idx, spec) in deck.iter().enumerate() {
            let number = idx + 1;
            let mut slide = model.new_slide(LayoutRole::for_slide(spec.role));

            match slide.title_mut() {
                Some(title) => {
                    self.write_title(spec, title, number, &mut report.notices);
                }
                None => report.notices.push(RenderNotice::PlaceholderMissing {
                    slide: number,
                    placeholder: PlaceholderKind::Title,
                }),
            }

            if !spec.body.is_empty() {
                match slide.body_mut() {
                    Some(body) => self.write_body(spec, body, number, &mut report.notices),
                    None => report.notices.push(RenderNotice::PlaceholderMissing {
                        slide: number,
                        placeholder: PlaceholderKind::Body,
                    }),
                }
            }

            model.add_slide(&slide)?;
            log::debug!(
                "Rendered slide {} ({:?}, {} body lines)",
                number,
                spec.role,
                spec.body.len()
            );
        }

        report.slide_count = model.added_slide_count();
        for notice in &report.notices {
            match notice {
                RenderNotice::PlaceholderMissing { slide, placeholder } => {
                    log::warn!("Slide {}: layout has no {:?} placeholder; text skipped", slide, placeholder)
                }
                other => log::debug!("{:?}", other),
            }
        }

        let bytes = model.finish()?;
        Ok((bytes, report))
    }

    fn write_title(
        &self,
        spec: &SlideSpec,
        body: &mut TextBody,
        slide: usize,
        notices: &mut Vec<RenderNotice>,
    ) {
        let paragraph = body.add_paragraph(&spec.title);
        let outcome = self.styles.title(spec.role).apply(paragraph);
        record(outcome, slide, 1, notices);
    }

    fn write_body(
        &self,
        spec: &SlideSpec,
        body: &mut TextBody,
        slide: usize,
        notices: &mut Vec<RenderNotice>,
    ) {
        let style = self.styles.body(spec.role);
        for (idx, line) in spec.body.iter().enumerate() {
            let paragraph = body.add_paragraph(&line.text);
            match spec.role {
                SlideRole::Content => paragraph.set_level(line.level),
                SlideRole::TableOfContents => paragraph.set_level(0),
                SlideRole::Cover => {}
            }
            let outcome = style.apply(paragraph);
            record(outcome, slide, idx + 1, notices);
        }
    }
}

fn record(
    (paragraph_outcome, font_outcome): (ParagraphOutcome, FontOutcome),
    slide: usize,
    paragraph: usize,
    notices: &mut Vec<RenderNotice>,
) {
    if paragraph_outcome == ParagraphOutcome::IndentDegraded {
        notices.push(RenderNotice::IndentUnsupported { slide, paragraph });
    }
    if font_outcome != FontOutcome::PerScript {
        notices.push(RenderNotice::GenericFont { slide, paragraph });
    }
}
