//! The generation entry point: outline text in, `.pptx` file out.

use crate::assemble::{AssemblyReport, DocumentAssembler};
use crate::model::DocumentModel;
use outline_core::{preview, FormattingConfig, Result, WriteError};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Where the base document comes from.
#[derive(Debug, Clone, Copy)]
pub enum TemplateSource<'a> {
    /// The built-in widescreen presentation.
    Blank,
    /// A template file. A path that does not exist means [`TemplateSource::Blank`].
    Path(&'a Path),
    /// Template bytes already in memory.
    Bytes(&'a [u8]),
}

impl<'a> From<Option<&'a Path>> for TemplateSource<'a> {
    fn from(path: Option<&'a Path>) -> Self {
        match path {
            Some(path) => TemplateSource::Path(path),
            None => TemplateSource::Blank,
        }
    }
}

/// Runs segmentation, composition and assembly with one configuration.
#[derive(Debug, Clone)]
pub struct Generator {
    config: FormattingConfig,
}

impl Generator {
    pub fn new(config: &FormattingConfig) -> Self {
        Self {
            config: config.clone().validated(),
        }
    }

    pub fn config(&self) -> &FormattingConfig {
        &self.config
    }

    /// Build the deck in memory.
    pub fn render(&self, content: &str, template: TemplateSource<'_>) -> Result<(Vec<u8>, AssemblyReport)> {
        let deck = preview(content, &self.config)?;
        log::info!("Composed {} slides", deck.len());

        let model = match template {
            TemplateSource::Blank => DocumentModel::blank()?,
            TemplateSource::Path(path) if path.exists() => DocumentModel::open_template(path)?,
            TemplateSource::Path(path) => {
                log::warn!(
                    "Template {} does not exist; using a blank presentation",
                    path.display()
                );
                DocumentModel::blank()?
            }
            TemplateSource::Bytes(bytes) => DocumentModel::from_template_bytes(bytes)?,
        };

        DocumentAssembler::new(&self.config).assemble(&deck, model)
    }

    /// Build the deck and write it to `output_path`. Nothing is written if
    /// any step fails.
    pub fn generate(
        &self,
        content: &str,
        output_path: &Path,
        template: TemplateSource<'_>,
    ) -> Result<AssemblyReport> {
        let (bytes, report) = self.render(content, template)?;
        write_atomically(output_path, &bytes)?;
        log::info!(
            "Wrote {} slides to {}",
            report.slide_count,
            output_path.display()
        );
        Ok(report)
    }
}

/// Generate a deck from `content` and write it to `output_path`.
///
/// Returns the number of slides generated. A `template_path` that does not
/// exist is treated as no template.
pub fn generate(
    content: &str,
    output_path: impl AsRef<Path>,
    config: &FormattingConfig,
    template_path: Option<&Path>,
) -> Result<usize> {
    let report = Generator::new(config).generate(content, output_path.as_ref(), template_path.into())?;
    Ok(report.slide_count)
}

/// Write `bytes` to a temporary file next to `path`, then rename it over
/// `path`. The temporary file is removed if anything fails.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let other = |source: std::io::Error| WriteError::Other {
        path: path.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(other)?;
    file.write_all(bytes).map_err(other)?;
    file.as_file().sync_all().map_err(other)?;
    file.persist(path)
        .map_err(|e| WriteError::from_io(path, e.error))?;
    Ok(())
}
