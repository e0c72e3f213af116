//! Core of outline-to-deck conversion: configuration, markup cleanup,
//! block segmentation, indent classification, and slide composition.

pub mod compose;
pub mod config;
pub mod error;
pub mod indent;
pub mod sanitize;
pub mod segment;
pub mod source;
pub mod types;

pub use compose::{preview, SlideComposer};
pub use config::{
    EastAsianFont, FormattingConfig, LatinFont, Rgb, Theme, ThemePreset, MAX_FONT_SIZE_PT,
    MIN_FONT_SIZE_PT,
};
pub use error::{Error, Result, WriteError};
pub use indent::{classify, MAX_INDENT_LEVEL};
pub use sanitize::{Sanitizer, BULLET};
pub use segment::segment;
pub use source::{decode_source, DecodedSource};
pub use types::{BodyLine, Deck, SlideRole, SlideSpec};
