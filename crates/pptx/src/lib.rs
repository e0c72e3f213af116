//! PPTX (Office Open XML) backend: renders a composed deck into a
//! presentation package, blank or template-derived.
//!
//! PPTX files are ZIP archives of XML parts. Slides are appended through
//! placeholders inherited from the master's layouts.

pub mod assemble;
pub mod blank;
pub mod format;
pub mod generate;
pub mod layout;
pub mod model;
pub mod package;
pub mod slide;
pub mod text;

pub use assemble::{AssemblyReport, DocumentAssembler, PlaceholderKind, RenderNotice};
pub use format::{FontOutcome, ParagraphFormatter, ParagraphOutcome, RunFontAssigner};
pub use generate::{generate, write_atomically, Generator, TemplateSource};
pub use layout::{LayoutInfo, LayoutRole, PlaceholderRef};
pub use model::DocumentModel;
pub use outline_core::{Error, Result, WriteError};
pub use slide::Slide;
pub use text::{Alignment, Paragraph, ParagraphFormat, Rejected, RunFormat, TextBody, TextRun};
