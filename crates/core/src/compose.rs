//! Turning outline blocks into slide specs.
//!
//! The first block may become a cover, the remaining blocks' first lines may
//! be gathered into a table of contents, and every remaining block with
//! visible text becomes a content slide.

use crate::config::FormattingConfig;
use crate::error::Result;
use crate::indent::classify;
use crate::sanitize::Sanitizer;
use crate::segment::segment;
use crate::types::{Deck, SlideRole, SlideSpec};

/// A visible line of a block, paired with the raw line it came from.
#[derive(Debug)]
struct VisibleLine<'a> {
    raw: &'a str,
    text: String,
}

/// Composes a [`Deck`] from ordered blocks.
#[derive(Debug, Clone)]
pub struct SlideComposer<'a> {
    config: &'a FormattingConfig,
    sanitizer: Sanitizer,
}

impl<'a> SlideComposer<'a> {
    /// Create a composer reading from `config`.
    pub fn new(config: &'a FormattingConfig) -> Self {
        Self {
            config,
            sanitizer: Sanitizer::new(),
        }
    }

    /// Non-blank lines of a block after optional sanitization.
    ///
    /// Sanitization is line-local, so each surviving line still knows its
    /// raw source and the indent level can be read from the unsanitized
    /// whitespace prefix.
    fn visible_lines<'b>(&self, block: &'b str) -> Vec<VisibleLine<'b>> {
        block
            .lines()
            .filter_map(|raw| {
                let text = if self.config.sanitize_markup {
                    self.sanitizer.sanitize(raw)
                } else {
                    raw.to_string()
                };
                let text = text.trim();
                (!text.is_empty()).then(|| VisibleLine {
                    raw,
                    text: text.to_string(),
                })
            })
            .collect()
    }

    /// Compose the deck for `blocks`, preserving their order.
    pub fn compose(&self, blocks: &[&str]) -> Deck {
        let mut deck = Deck::new();
        let mut remaining = blocks;

        if self.config.include_cover {
            if let Some((first, rest)) = blocks.split_first() {
                let lines = self.visible_lines(first);
                match lines.split_first() {
                    Some((title, subtitle)) => {
                        let mut cover = SlideSpec::new(SlideRole::Cover, title.text.clone());
                        for line in subtitle {
                            cover.add_line(line.text.clone(), 0);
                        }
                        deck.push(cover);
                    }
                    None => {
                        log::debug!("Cover block has no visible text; writing an empty cover");
                        deck.push(SlideSpec::new(SlideRole::Cover, String::new()));
                    }
                }
                remaining = rest;
            }
        }

        let content: Vec<Vec<VisibleLine<'_>>> = remaining
            .iter()
            .map(|block| self.visible_lines(block))
            .filter(|lines| !lines.is_empty())
            .collect();

        if self.config.include_toc && !content.is_empty() {
            let mut toc = SlideSpec::new(SlideRole::TableOfContents, self.config.toc_title.clone());
            for (idx, lines) in content.iter().enumerate() {
                toc.add_line(format!("{}. {}", idx + 1, lines[0].text), 0);
            }
            deck.push(toc);
        }

        for lines in &content {
            let mut slide = SlideSpec::new(SlideRole::Content, lines[0].text.clone());
            for line in &lines[1..] {
                let (level, _) = classify(line.raw);
                slide.add_line(line.text.clone(), level);
            }
            deck.push(slide);
        }

        log::debug!(
            "Composed {} slides from {} blocks",
            deck.len(),
            blocks.len()
        );
        deck
    }
}

/// Segment and compose `content` without rendering anything.
///
/// The returned deck's length is exactly the slide count a generation run
/// with the same input and configuration would produce.
pub fn preview(content: &str, config: &FormattingConfig) -> Result<Deck> {
    let config = config.clone().validated();
    let blocks = segment(content, &config.separator)?;
    Ok(SlideComposer::new(&config).compose(&blocks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::BULLET;
    use crate::types::BodyLine;

    fn compose(text: &str, config: &FormattingConfig) -> Deck {
        preview(text, config).unwrap()
    }

    #[test]
    fn test_cover_and_content() {
        let config = FormattingConfig::new().with_cover(true).with_toc(false);
        let deck = compose(
            "# Title\nSubtitle\n---\n## Chapter 1\n* point one\n* point two",
            &config,
        );

        assert_eq!(deck.len(), 2);
        let cover = &deck.slides()[0];
        assert_eq!(cover.role, SlideRole::Cover);
        assert_eq!(cover.title, "Title");
        assert_eq!(cover.subtitle().as_deref(), Some("Subtitle"));

        let content = &deck.slides()[1];
        assert_eq!(content.role, SlideRole::Content);
        assert_eq!(content.title, "Chapter 1");
        assert_eq!(
            content.body,
            vec![
                BodyLine::new(format!("{} point one", BULLET), 0),
                BodyLine::new(format!("{} point two", BULLET), 0),
            ]
        );
    }

    #[test]
    fn test_cover_toc_and_content_order() {
        let config = FormattingConfig::new().with_cover(true).with_toc(true);
        let deck = compose("Deck\n---\n# One\na\n---\n# Two\nb", &config);

        assert_eq!(deck.len(), 4);
        let roles: Vec<_> = deck.iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            vec![
                SlideRole::Cover,
                SlideRole::TableOfContents,
                SlideRole::Content,
                SlideRole::Content
            ]
        );

        let toc = &deck.slides()[1];
        assert_eq!(toc.title, config.toc_title);
        let entries: Vec<_> = toc.body.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(entries, vec!["1. One", "2. Two"]);
    }

    #[test]
    fn test_cover_with_title_only_has_no_subtitle() {
        let deck = compose("Only a title\n---\nNext", &FormattingConfig::new());
        assert_eq!(deck.slides()[0].subtitle(), None);
    }

    #[test]
    fn test_empty_cover_block_still_makes_a_cover() {
        let config = FormattingConfig::new().with_cover(true).with_toc(false);
        let deck = compose("###\n---\nA\nbody", &config);

        assert_eq!(deck.len(), 2);
        let cover = &deck.slides()[0];
        assert_eq!(cover.role, SlideRole::Cover);
        assert_eq!(cover.title, "");
        assert!(cover.body.is_empty());
        assert_eq!(deck.slides()[1].title, "A");
    }

    #[test]
    fn test_toc_needs_content_blocks() {
        let config = FormattingConfig::new().with_cover(true).with_toc(true);
        let deck = compose("Just a cover", &config);
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.slides()[0].role, SlideRole::Cover);
    }

    #[test]
    fn test_block_that_sanitizes_to_nothing_is_skipped() {
        let config = FormattingConfig::new().with_cover(false).with_toc(true);
        let deck = compose("# A\n---\n###\n```\n---\n# B", &config);

        assert_eq!(deck.titles(), vec![config.toc_title.as_str(), "A", "B"]);
        assert_eq!(deck.slides()[0].body.len(), 2);
    }

    #[test]
    fn test_indent_levels_from_raw_lines() {
        let config = FormattingConfig::new().with_cover(false);
        let deck = compose("Title\n- top\n\t- nested\n        - deeper\n\t\t\t\t\t\t- clamped", &config);

        let levels: Vec<u8> = deck.slides()[0].body.iter().map(|l| l.level).collect();
        assert_eq!(levels, vec![0, 1, 2, 4]);
        assert!(deck.slides()[0]
            .body
            .iter()
            .all(|l| l.text.starts_with(BULLET)));
    }

    #[test]
    fn test_no_sanitize_keeps_markup() {
        let config = FormattingConfig::new().with_cover(false).with_sanitize(false);
        let deck = compose("## **Raw**\n* item", &config);
        assert_eq!(deck.slides()[0].title, "## **Raw**");
        assert_eq!(deck.slides()[0].body[0].text, "* item");
    }

    #[test]
    fn test_slide_count_formula() {
        for (cover, toc) in [(false, false), (true, false), (false, true), (true, true)] {
            let config = FormattingConfig::new().with_cover(cover).with_toc(toc);
            let deck = compose("C\n---\nA\n---\n \n---\nB\n---\nD", &config);
            let content_blocks = if cover { 3 } else { 4 };
            let expected =
                content_blocks + usize::from(cover) + usize::from(toc && content_blocks >= 1);
            assert_eq!(deck.len(), expected, "cover={} toc={}", cover, toc);
        }
    }

    #[test]
    fn test_custom_separator() {
        let config = FormattingConfig::new().with_cover(false).with_separator("===");
        let deck = compose("A\n===\nB\n---\nC", &config);
        assert_eq!(deck.titles(), vec!["A", "B"]);
        assert_eq!(deck.slides()[1].body[0].text, "---");
    }

    #[test]
    fn test_composition_is_deterministic() {
        let config = FormattingConfig::new().with_toc(true);
        let text = "# Deck\n---\n## A\n* x\n\t* y\n---\n## B\n1. z";
        assert_eq!(compose(text, &config), compose(text, &config));
    }
}
