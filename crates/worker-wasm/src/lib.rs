//! WASM-compatible wrapper for outline-to-deck generation.
//!
//! This crate exposes deck generation to JavaScript for use in Cloudflare
//! Workers. Everything happens in memory; the caller receives the `.pptx`
//! bytes and decides where they go.

use outline_core::{preview, FormattingConfig, SlideSpec, ThemePreset};
use outline_pptx::{Generator, RenderNotice, TemplateSource};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of generating a deck.
#[derive(Debug, Serialize)]
pub struct GenerateResult {
    /// Number of slides added to the deck.
    pub slide_count: usize,
    /// Places where formatting had to be degraded.
    pub notices: Vec<RenderNotice>,
}

/// Result of previewing a deck without rendering it.
#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewResult {
    pub slide_count: usize,
    pub slides: Vec<SlideSpec>,
}

/// A selectable color theme.
#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeOption {
    pub key: String,
    pub label: String,
}

/// Generate a `.pptx` deck from outline text.
///
/// # Arguments
/// * `content` - The outline text
/// * `config` - Formatting settings; `undefined` or `null` for defaults
/// * `template` - Optional bytes of a `.pptx`/`.potx` template
///
/// # Returns
/// The bytes of the generated presentation, or throws on error.
#[wasm_bindgen]
pub fn generate_deck(
    content: &str,
    config: JsValue,
    template: Option<Vec<u8>>,
) -> Result<js_sys::Uint8Array, JsValue> {
    let config = parse_config(config)?;
    let (bytes, _) = generate_deck_impl(content, &config, template.as_deref())
        .map_err(|e| JsValue::from_str(&e))?;
    Ok(js_sys::Uint8Array::from(bytes.as_slice()))
}

/// Describe the slides that would be generated, without rendering them.
#[wasm_bindgen]
pub fn preview_deck(content: &str, config: JsValue) -> Result<JsValue, JsValue> {
    let config = parse_config(config)?;
    let result = preview_deck_impl(content, &config).map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Number of slides the outline would produce.
#[wasm_bindgen]
pub fn preview_slide_count(content: &str, config: JsValue) -> Result<usize, JsValue> {
    let config = parse_config(config)?;
    preview_deck_impl(content, &config)
        .map(|result| result.slide_count)
        .map_err(|e| JsValue::from_str(&e))
}

/// List the built-in color themes.
#[wasm_bindgen]
pub fn theme_presets() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&theme_presets_impl())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_config(config: JsValue) -> Result<FormattingConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(FormattingConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))
}

fn generate_deck_impl(
    content: &str,
    config: &FormattingConfig,
    template: Option<&[u8]>,
) -> Result<(Vec<u8>, GenerateResult), String> {
    let source = match template {
        Some(bytes) => TemplateSource::Bytes(bytes),
        None => TemplateSource::Blank,
    };
    let (bytes, report) = Generator::new(config)
        .render(content, source)
        .map_err(|e| e.to_string())?;

    Ok((
        bytes,
        GenerateResult {
            slide_count: report.slide_count,
            notices: report.notices,
        },
    ))
}

fn preview_deck_impl(content: &str, config: &FormattingConfig) -> Result<PreviewResult, String> {
    let deck = preview(content, &config.clone().validated()).map_err(|e| e.to_string())?;
    Ok(PreviewResult {
        slide_count: deck.len(),
        slides: deck.slides().to_vec(),
    })
}

fn theme_presets_impl() -> Vec<ThemeOption> {
    ThemePreset::ALL
        .iter()
        .map(|preset| ThemeOption {
            key: preset.key().to_string(),
            label: preset.label().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use outline_core::SlideRole;

    const SAMPLE: &str = "Quarterly Review\n2024\n---\n# Sales\n* up\n---\n# Costs\n* down";

    #[test]
    fn test_generate_deck_returns_zip_bytes() {
        let (bytes, result) =
            generate_deck_impl(SAMPLE, &FormattingConfig::default(), None).unwrap();

        assert_eq!(&bytes[..2], b"PK");
        assert_eq!(result.slide_count, 3);
        assert!(result.notices.is_empty());
    }

    #[test]
    fn test_generate_deck_on_template_bytes() {
        let config = FormattingConfig::default().with_cover(false);
        let (template, _) = generate_deck_impl("Base slide", &config, None).unwrap();

        let (_, result) = generate_deck_impl("One\n---\nTwo", &config, Some(template.as_slice())).unwrap();
        assert_eq!(result.slide_count, 2);
    }

    #[test]
    fn test_generate_deck_rejects_garbage_template() {
        let err = generate_deck_impl(SAMPLE, &FormattingConfig::default(), Some(&b"not a zip"[..]))
            .unwrap_err();
        assert!(err.contains("Template unreadable"));
    }

    #[test]
    fn test_empty_outline_is_an_error() {
        let err = generate_deck_impl("\n---\n", &FormattingConfig::default(), None).unwrap_err();
        assert!(err.contains("No content"));
    }

    #[test]
    fn test_preview_with_toc() {
        let config = FormattingConfig::default().with_toc(true);
        let result = preview_deck_impl(SAMPLE, &config).unwrap();

        assert_eq!(result.slide_count, 4);
        assert_eq!(result.slides[0].role, SlideRole::Cover);
        assert_eq!(result.slides[1].role, SlideRole::TableOfContents);
        assert_eq!(result.slides[2].title, "Sales");
    }

    #[test]
    fn test_theme_presets() {
        let presets = theme_presets_impl();
        assert_eq!(presets.len(), 6);
        assert_eq!(presets[0].key, "classic-blue");
    }
}
