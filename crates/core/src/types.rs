//! Domain types for a composed deck.

use serde::{Deserialize, Serialize};

/// What a slide is for, which decides its layout and title styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideRole {
    /// Opening slide built from the first block (title + subtitle layout).
    Cover,
    /// Numbered list of the content slide titles.
    TableOfContents,
    /// One slide per remaining block.
    Content,
}

/// A body line with its outline level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyLine {
    /// Cleaned, trimmed text.
    pub text: String,

    /// Outline level in `0..=4`.
    pub level: u8,
}

impl BodyLine {
    /// Create a body line at the given level.
    pub fn new(text: impl Into<String>, level: u8) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}

/// The resolved content of one output slide, independent of file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSpec {
    pub role: SlideRole,

    pub title: String,

    /// Body lines in order. For a cover these are the subtitle lines.
    pub body: Vec<BodyLine>,
}

impl SlideSpec {
    /// Create a slide with no body lines.
    pub fn new(role: SlideRole, title: impl Into<String>) -> Self {
        Self {
            role,
            title: title.into(),
            body: Vec::new(),
        }
    }

    /// Add a body line.
    pub fn add_line(&mut self, text: impl Into<String>, level: u8) {
        self.body.push(BodyLine::new(text, level));
    }

    /// Cover subtitle: the body lines joined by newlines, if any.
    pub fn subtitle(&self) -> Option<String> {
        if self.body.is_empty() {
            return None;
        }
        Some(
            self.body
                .iter()
                .map(|l| l.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

/// Ordered slides of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    slides: Vec<SlideSpec>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, slide: SlideSpec) {
        self.slides.push(slide);
    }

    /// Number of slides composed so far.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[SlideSpec] {
        &self.slides
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SlideSpec> {
        self.slides.iter()
    }

    /// Slide titles in order.
    pub fn titles(&self) -> Vec<&str> {
        self.slides.iter().map(|s| s.title.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a SlideSpec;
    type IntoIter = std::slice::Iter<'a, SlideSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitle_joins_lines() {
        let mut cover = SlideSpec::new(SlideRole::Cover, "Deck");
        assert_eq!(cover.subtitle(), None);

        cover.add_line("Team", 0);
        cover.add_line("2024", 0);
        assert_eq!(cover.subtitle().as_deref(), Some("Team\n2024"));
    }

    #[test]
    fn test_deck_titles() {
        let mut deck = Deck::new();
        deck.push(SlideSpec::new(SlideRole::Cover, "A"));
        deck.push(SlideSpec::new(SlideRole::Content, "B"));
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.titles(), vec!["A", "B"]);
    }
}
