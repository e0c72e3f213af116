//! CLI tool for turning text outlines into PowerPoint decks.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use outline_core::{
    decode_source, preview, EastAsianFont, FormattingConfig, LatinFont, SlideRole, ThemePreset,
};
use outline_pptx::{Generator, TemplateSource};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit code for "the output file is open in another program".
const EXIT_LOCKED: u8 = 2;

/// Convert a plain-text outline into a .pptx deck.
///
/// Blocks are separated by a separator line; the first line of each block
/// becomes the slide title and the rest its body.
#[derive(Parser, Debug)]
#[command(name = "outline2pptx")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Outline file (UTF-8, GBK, GB2312 or UTF-16)
    input: PathBuf,

    /// Output .pptx file (default: input name with .pptx extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Template .pptx/.potx whose layouts and slides are reused
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// JSON file with formatting settings; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Block separator
    #[arg(short, long)]
    separator: Option<String>,

    /// Color theme: classic-blue, business-gray, vibrant-orange,
    /// fresh-green, elegant-purple or monochrome
    #[arg(long)]
    theme: Option<String>,

    /// East-Asian typeface (preset name or any installed font)
    #[arg(long)]
    east_asian_font: Option<String>,

    /// Latin typeface (preset name or any installed font)
    #[arg(long)]
    latin_font: Option<String>,

    /// Title size in points
    #[arg(long)]
    title_size: Option<u32>,

    /// Body size in points
    #[arg(long)]
    body_size: Option<u32>,

    /// First-line indent of body paragraphs, in characters
    #[arg(long)]
    indent: Option<u32>,

    /// Line spacing multiple (at least 1.0)
    #[arg(long)]
    line_spacing: Option<f64>,

    /// Space before and after body paragraphs, in points
    #[arg(long)]
    paragraph_spacing: Option<f64>,

    /// Keep Markdown markup instead of stripping it
    #[arg(long)]
    no_sanitize: bool,

    /// Do not turn the first block into a cover slide
    #[arg(long)]
    no_cover: bool,

    /// Add a table-of-contents slide
    #[arg(long)]
    toc: bool,

    /// Heading of the table-of-contents slide
    #[arg(long)]
    toc_title: Option<String>,

    /// Show the slides that would be generated without writing a file
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let locked = e
                .downcast_ref::<outline_core::Error>()
                .map_or(false, |e| e.is_locked());
            eprintln!("Error: {:#}", e);
            if locked {
                eprintln!("Close the file in the other program and run the command again.");
                ExitCode::from(EXIT_LOCKED)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = build_config(args)?;
    let content = read_outline(&args.input)?;

    if args.dry_run {
        let deck = preview(&content, &config)?;
        println!("{} slides", deck.len());
        for (idx, slide) in deck.iter().enumerate() {
            let role = match slide.role {
                SlideRole::Cover => "cover",
                SlideRole::TableOfContents => "contents",
                SlideRole::Content => "content",
            };
            println!("{:>3}. [{}] {} ({} lines)", idx + 1, role, slide.title, slide.body.len());
        }
        return Ok(());
    }

    let output = output_path(&args.input, args.output.as_deref());
    let report = Generator::new(&config).generate(
        &content,
        &output,
        TemplateSource::from(args.template.as_deref()),
    )?;

    if args.verbose && !report.notices.is_empty() {
        eprintln!("{} formatting notices", report.notices.len());
    }
    println!("Wrote {} slides to {}", report.slide_count, output.display());
    Ok(())
}

/// Read the outline and decode it with the first encoding that fits.
fn read_outline(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let decoded = decode_source(&bytes).ok_or_else(|| {
        anyhow!(
            "{} is not valid UTF-8, GBK, GB2312 or UTF-16 text",
            path.display()
        )
    })?;
    log::debug!("Decoded {} as {}", path.display(), decoded.encoding);
    Ok(decoded.text)
}

/// Settings from the config file (or defaults), then from flags.
fn build_config(args: &Args) -> Result<FormattingConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => FormattingConfig::default(),
    };

    if let Some(separator) = &args.separator {
        config.separator = separator.clone();
    }
    if let Some(name) = &args.theme {
        let preset = ThemePreset::from_name(name).ok_or_else(|| {
            let known: Vec<&str> = ThemePreset::ALL.iter().map(|t| t.key()).collect();
            anyhow!("Unknown theme '{}' (expected one of: {})", name, known.join(", "))
        })?;
        config.theme = preset.theme();
    }
    if let Some(font) = &args.east_asian_font {
        config.east_asian_typeface = EastAsianFont::from_name(font)
            .map(|f| f.typeface().to_string())
            .unwrap_or_else(|| font.clone());
    }
    if let Some(font) = &args.latin_font {
        config.latin_typeface = LatinFont::from_name(font)
            .map(|f| f.typeface().to_string())
            .unwrap_or_else(|| font.clone());
    }
    if let Some(size) = args.title_size {
        config.title_size_pt = size;
    }
    if let Some(size) = args.body_size {
        config.body_size_pt = size;
    }
    if let Some(chars) = args.indent {
        config.first_line_indent_chars = chars;
    }
    if let Some(spacing) = args.line_spacing {
        config.line_spacing = spacing;
    }
    if let Some(spacing) = args.paragraph_spacing {
        config.paragraph_spacing_pt = spacing;
    }
    if args.no_sanitize {
        config.sanitize_markup = false;
    }
    if args.no_cover {
        config.include_cover = false;
    }
    if args.toc {
        config.include_toc = true;
    }
    if let Some(title) = &args.toc_title {
        config.toc_title = title.clone();
    }

    Ok(config.validated())
}

/// Determine the output path for an input file.
fn output_path(input_path: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => input_path.with_extension("pptx"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("outline2pptx").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = build_config(&parse(&["notes.txt"])).unwrap();
        assert_eq!(config, FormattingConfig::default().validated());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = parse(&[
            "notes.txt",
            "--theme",
            "fresh-green",
            "--east-asian-font",
            "KaiTi",
            "--latin-font",
            "My Custom Font",
            "--title-size",
            "40",
            "--no-cover",
            "--toc",
            "--toc-title",
            "Contents",
            "--line-spacing",
            "0.5",
        ]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.theme, ThemePreset::FreshGreen.theme());
        assert_eq!(config.east_asian_typeface, EastAsianFont::KaiTi.typeface());
        assert_eq!(config.latin_typeface, "My Custom Font");
        assert_eq!(config.title_size_pt, 40);
        assert!(!config.include_cover);
        assert!(config.include_toc);
        assert_eq!(config.toc_title, "Contents");
        assert_eq!(config.line_spacing, 1.0);
    }

    #[test]
    fn test_unknown_theme_is_an_error() {
        let err = build_config(&parse(&["notes.txt", "--theme", "neon"])).unwrap_err();
        assert!(err.to_string().contains("classic-blue"));
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("dir/talk.md"), None),
            PathBuf::from("dir/talk.pptx")
        );
        assert_eq!(
            output_path(Path::new("talk.md"), Some(Path::new("out/deck.pptx"))),
            PathBuf::from("out/deck.pptx")
        );
    }
}
