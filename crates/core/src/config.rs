//! Formatting configuration and the fixed typography/color presets.
//!
//! A [`FormattingConfig`] is built once per generation run and never mutated
//! afterwards. Every field has a default, so a partial JSON document
//! deserializes into a complete configuration.

use serde::{Deserialize, Serialize};

/// Separator used when none (or an empty one) is configured.
pub const DEFAULT_SEPARATOR: &str = "---";

/// Heading written on the table-of-contents slide by default.
pub const DEFAULT_TOC_TITLE: &str = "目录";

/// Smallest point size a run can carry.
pub const MIN_FONT_SIZE_PT: u32 = 1;

/// Largest point size a run can carry (DrawingML caps `sz` at 400000).
pub const MAX_FONT_SIZE_PT: u32 = 4000;

/// An RGB color triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Upper-case hex form (`"003366"`), as DrawingML `srgbClr` expects.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Title and body colors applied uniformly across a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub title_color: Rgb,
    pub body_color: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        ThemePreset::ClassicBlue.theme()
    }
}

/// The six named color presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreset {
    ClassicBlue,
    BusinessGray,
    VibrantOrange,
    FreshGreen,
    ElegantPurple,
    Monochrome,
}

impl ThemePreset {
    pub const ALL: [ThemePreset; 6] = [
        ThemePreset::ClassicBlue,
        ThemePreset::BusinessGray,
        ThemePreset::VibrantOrange,
        ThemePreset::FreshGreen,
        ThemePreset::ElegantPurple,
        ThemePreset::Monochrome,
    ];

    /// Stable key used on the command line and in config files.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ClassicBlue => "classic-blue",
            Self::BusinessGray => "business-gray",
            Self::VibrantOrange => "vibrant-orange",
            Self::FreshGreen => "fresh-green",
            Self::ElegantPurple => "elegant-purple",
            Self::Monochrome => "monochrome",
        }
    }

    /// Display label shown to end users.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ClassicBlue => "经典蓝",
            Self::BusinessGray => "商务灰",
            Self::VibrantOrange => "活力橙",
            Self::FreshGreen => "清新绿",
            Self::ElegantPurple => "优雅紫",
            Self::Monochrome => "纯黑白",
        }
    }

    pub fn theme(&self) -> Theme {
        let (title_color, body_color) = match self {
            Self::ClassicBlue => (Rgb(0, 51, 102), Rgb(51, 51, 51)),
            Self::BusinessGray => (Rgb(64, 64, 64), Rgb(89, 89, 89)),
            Self::VibrantOrange => (Rgb(204, 85, 0), Rgb(51, 51, 51)),
            Self::FreshGreen => (Rgb(0, 102, 51), Rgb(51, 51, 51)),
            Self::ElegantPurple => (Rgb(75, 0, 130), Rgb(51, 51, 51)),
            Self::Monochrome => (Rgb(0, 0, 0), Rgb(33, 33, 33)),
        };
        Theme {
            title_color,
            body_color,
        }
    }

    /// Look up a preset by key or display label.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(name) || p.label() == name)
    }
}

/// East-Asian typeface presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EastAsianFont {
    #[serde(rename = "microsoft-yahei")]
    MicrosoftYaHei,
    #[serde(rename = "simhei")]
    SimHei,
    #[serde(rename = "simsun")]
    SimSun,
    #[serde(rename = "fangsong")]
    FangSong,
    #[serde(rename = "kaiti")]
    KaiTi,
}

impl EastAsianFont {
    pub const ALL: [EastAsianFont; 5] = [
        EastAsianFont::MicrosoftYaHei,
        EastAsianFont::SimHei,
        EastAsianFont::SimSun,
        EastAsianFont::FangSong,
        EastAsianFont::KaiTi,
    ];

    /// Stable key used on the command line and in config files.
    pub fn key(&self) -> &'static str {
        match self {
            Self::MicrosoftYaHei => "microsoft-yahei",
            Self::SimHei => "simhei",
            Self::SimSun => "simsun",
            Self::FangSong => "fangsong",
            Self::KaiTi => "kaiti",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::MicrosoftYaHei => "微软雅黑",
            Self::SimHei => "黑体",
            Self::SimSun => "宋体",
            Self::FangSong => "仿宋",
            Self::KaiTi => "楷体",
        }
    }

    /// The concrete typeface string written into the document.
    pub fn typeface(&self) -> &'static str {
        match self {
            Self::MicrosoftYaHei => "Microsoft YaHei",
            Self::SimHei => "SimHei",
            Self::SimSun => "SimSun",
            Self::FangSong => "FangSong",
            Self::KaiTi => "KaiTi",
        }
    }

    /// Look up a preset by key, display label or typeface name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|f| {
            f.key().eq_ignore_ascii_case(name)
                || f.label() == name
                || f.typeface().eq_ignore_ascii_case(name)
        })
    }
}

/// Latin/Western typeface presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LatinFont {
    TimesNewRoman,
    Arial,
    Calibri,
    Consolas,
}

impl LatinFont {
    pub const ALL: [LatinFont; 4] = [
        LatinFont::TimesNewRoman,
        LatinFont::Arial,
        LatinFont::Calibri,
        LatinFont::Consolas,
    ];

    /// Stable key used on the command line and in config files.
    pub fn key(&self) -> &'static str {
        match self {
            Self::TimesNewRoman => "times-new-roman",
            Self::Arial => "arial",
            Self::Calibri => "calibri",
            Self::Consolas => "consolas",
        }
    }

    pub fn typeface(&self) -> &'static str {
        match self {
            Self::TimesNewRoman => "Times New Roman",
            Self::Arial => "Arial",
            Self::Calibri => "Calibri",
            Self::Consolas => "Consolas",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(name) || f.typeface().eq_ignore_ascii_case(name))
    }
}

/// Everything that drives the look of a generated deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingConfig {
    /// Token that splits the outline into blocks.
    pub separator: String,

    /// Typeface for East-Asian script runs.
    pub east_asian_typeface: String,

    /// Typeface for Latin/Western runs (also used for complex script).
    pub latin_typeface: String,

    /// Title point size. The cover title is drawn 8 pt larger.
    pub title_size_pt: u32,

    /// Body point size.
    pub body_size_pt: u32,

    /// First-line indent of body paragraphs, in character widths.
    pub first_line_indent_chars: u32,

    /// Line-spacing multiplier (at least 1.0).
    pub line_spacing: f64,

    /// Space before and after each body paragraph, in points.
    pub paragraph_spacing_pt: f64,

    pub theme: Theme,

    /// Strip markdown markers from the outline before composing slides.
    pub sanitize_markup: bool,

    /// Turn the first block into a cover slide.
    pub include_cover: bool,

    /// Emit a table-of-contents slide after the cover.
    pub include_toc: bool,

    /// Heading of the table-of-contents slide.
    pub toc_title: String,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            east_asian_typeface: EastAsianFont::MicrosoftYaHei.typeface().to_string(),
            latin_typeface: LatinFont::TimesNewRoman.typeface().to_string(),
            title_size_pt: 32,
            body_size_pt: 20,
            first_line_indent_chars: 2,
            line_spacing: 1.5,
            paragraph_spacing_pt: 0.0,
            theme: Theme::default(),
            sanitize_markup: true,
            include_cover: true,
            include_toc: false,
            toc_title: DEFAULT_TOC_TITLE.to_string(),
        }
    }
}

impl FormattingConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_typefaces(
        mut self,
        east_asian: impl Into<String>,
        latin: impl Into<String>,
    ) -> Self {
        self.east_asian_typeface = east_asian.into();
        self.latin_typeface = latin.into();
        self
    }

    pub fn with_sizes(mut self, title_pt: u32, body_pt: u32) -> Self {
        self.title_size_pt = title_pt;
        self.body_size_pt = body_pt;
        self
    }

    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize_markup = sanitize;
        self
    }

    pub fn with_cover(mut self, cover: bool) -> Self {
        self.include_cover = cover;
        self
    }

    pub fn with_toc(mut self, toc: bool) -> Self {
        self.include_toc = toc;
        self
    }

    /// Normalize values the engine cannot use as given.
    ///
    /// An empty separator falls back to `"---"`; a line spacing below 1.0
    /// (or not a number) is raised to 1.0. Negative paragraph spacing is
    /// treated as zero. Point sizes are clamped to 1..=4000.
    pub fn validated(mut self) -> Self {
        if self.separator.is_empty() {
            self.separator = DEFAULT_SEPARATOR.to_string();
        }
        if !self.line_spacing.is_finite() || self.line_spacing < 1.0 {
            log::warn!(
                "Line spacing {} is below 1.0; using 1.0",
                self.line_spacing
            );
            self.line_spacing = 1.0;
        }
        if !self.paragraph_spacing_pt.is_finite() || self.paragraph_spacing_pt < 0.0 {
            self.paragraph_spacing_pt = 0.0;
        }
        self.title_size_pt = clamp_font_size("Title", self.title_size_pt);
        self.body_size_pt = clamp_font_size("Body", self.body_size_pt);
        self
    }
}

fn clamp_font_size(what: &str, size: u32) -> u32 {
    let clamped = size.clamp(MIN_FONT_SIZE_PT, MAX_FONT_SIZE_PT);
    if clamped != size {
        log::warn!("{} size {} pt is out of range; using {} pt", what, size, clamped);
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let config = FormattingConfig::default();
        assert_eq!(config.separator, "---");
        assert_eq!(config.east_asian_typeface, "Microsoft YaHei");
        assert_eq!(config.latin_typeface, "Times New Roman");
        assert_eq!((config.title_size_pt, config.body_size_pt), (32, 20));
        assert_eq!(config.first_line_indent_chars, 2);
        assert_eq!(config.line_spacing, 1.5);
        assert!(config.sanitize_markup && config.include_cover && !config.include_toc);
        assert_eq!(config.theme.title_color, Rgb(0, 51, 102));
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(Rgb(0, 51, 102).hex(), "003366");
        assert_eq!(Rgb(204, 85, 0).hex(), "CC5500");
    }

    #[test]
    fn test_theme_preset_lookup() {
        assert_eq!(ThemePreset::from_name("fresh-green"), Some(ThemePreset::FreshGreen));
        assert_eq!(ThemePreset::from_name("Monochrome"), Some(ThemePreset::Monochrome));
        assert_eq!(ThemePreset::from_name("优雅紫"), Some(ThemePreset::ElegantPurple));
        assert_eq!(ThemePreset::from_name("neon"), None);
        assert_eq!(
            ThemePreset::Monochrome.theme().body_color,
            Rgb(33, 33, 33)
        );
    }

    #[test]
    fn test_font_preset_lookup() {
        assert_eq!(EastAsianFont::from_name("楷体"), Some(EastAsianFont::KaiTi));
        assert_eq!(EastAsianFont::from_name("simsun"), Some(EastAsianFont::SimSun));
        assert_eq!(LatinFont::from_name("calibri"), Some(LatinFont::Calibri));
        assert_eq!(LatinFont::from_name("Comic Sans"), None);
    }

    #[test]
    fn test_font_presets_resolve_from_keys() {
        for font in EastAsianFont::ALL {
            assert_eq!(EastAsianFont::from_name(font.key()), Some(font));
            let json = serde_json::to_string(&font).unwrap();
            assert_eq!(json, format!("\"{}\"", font.key()));
        }
        for font in LatinFont::ALL {
            assert_eq!(LatinFont::from_name(font.key()), Some(font));
            let json = serde_json::to_string(&font).unwrap();
            assert_eq!(json, format!("\"{}\"", font.key()));
        }
        assert_eq!(
            EastAsianFont::from_name("Microsoft-YaHei"),
            Some(EastAsianFont::MicrosoftYaHei)
        );
        assert_eq!(LatinFont::from_name("times-new-roman"), Some(LatinFont::TimesNewRoman));
    }

    #[test]
    fn test_validated_fixes_unusable_values() {
        let mut config = FormattingConfig::new().with_separator("");
        config.line_spacing = 0.5;
        config.paragraph_spacing_pt = -3.0;

        let config = config.validated();
        assert_eq!(config.separator, DEFAULT_SEPARATOR);
        assert_eq!(config.line_spacing, 1.0);
        assert_eq!(config.paragraph_spacing_pt, 0.0);
    }

    #[test]
    fn test_validated_clamps_font_sizes() {
        let config = FormattingConfig::new().with_sizes(u32::MAX - 4, 0).validated();
        assert_eq!(config.title_size_pt, MAX_FONT_SIZE_PT);
        assert_eq!(config.body_size_pt, MIN_FONT_SIZE_PT);

        let config = FormattingConfig::new().with_sizes(4000, 10).validated();
        assert_eq!((config.title_size_pt, config.body_size_pt), (4000, 10));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: FormattingConfig =
            serde_json::from_str(r#"{"separator": "===", "include_toc": true}"#).unwrap();
        assert_eq!(config.separator, "===");
        assert!(config.include_toc);
        assert_eq!(config.body_size_pt, 20);
    }
}
