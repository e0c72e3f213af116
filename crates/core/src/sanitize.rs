//! Markup cleanup for outline blocks.
//!
//! Strips a fixed set of lightweight-markup constructs (headings, emphasis,
//! strikethrough, code spans, links, images, list and quote markers, code
//! fences) and leaves plain prose lines behind. Every rule is line-local
//! except the final blank-line collapse.
//!
//! Rules run in a fixed order and the whole pipeline is repeated until the
//! text stops changing, so `sanitize(sanitize(x)) == sanitize(x)`.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Glyph that replaces unordered-list markers.
pub const BULLET: char = '•';

/// How a rule rewrites text.
#[derive(Debug, Clone, Copy)]
enum Rewrite {
    /// Regex pattern and its replacement template.
    Pattern(&'static str, &'static str),
    /// Single-character emphasis (`*x*`, `_x_`), which needs the
    /// neighbouring-marker checks the regex engine cannot express.
    SingleEmphasis(char),
}

/// One entry of the ordered rule table.
struct RuleDef {
    name: &'static str,
    rewrite: Rewrite,
}

/// The rule table, in application order.
///
/// Triple emphasis precedes double precedes single so `***x***` is not
/// half-consumed by a shorter marker. Images precede links so the `!` of
/// `![alt](src)` is consumed with the rest of the image.
const RULE_DEFS: &[RuleDef] = &[
    RuleDef {
        name: "heading-marker",
        rewrite: Rewrite::Pattern(r"(?m)^[ \t]*#{1,6}[ \t]+", ""),
    },
    RuleDef {
        name: "heading-only",
        rewrite: Rewrite::Pattern(r"(?m)^[ \t]*#{1,6}[ \t]*$", ""),
    },
    RuleDef {
        name: "bold-italic-asterisk",
        rewrite: Rewrite::Pattern(r"\*\*\*(.+?)\*\*\*", "${1}"),
    },
    RuleDef {
        name: "bold-asterisk",
        rewrite: Rewrite::Pattern(r"\*\*(.+?)\*\*", "${1}"),
    },
    RuleDef {
        name: "bold-italic-underscore",
        rewrite: Rewrite::Pattern(r"___(.+?)___", "${1}"),
    },
    RuleDef {
        name: "bold-underscore",
        rewrite: Rewrite::Pattern(r"__(.+?)__", "${1}"),
    },
    RuleDef {
        name: "italic-asterisk",
        rewrite: Rewrite::SingleEmphasis('*'),
    },
    RuleDef {
        name: "italic-underscore",
        rewrite: Rewrite::SingleEmphasis('_'),
    },
    RuleDef {
        name: "strikethrough",
        rewrite: Rewrite::Pattern(r"~~(.+?)~~", "${1}"),
    },
    RuleDef {
        name: "inline-code",
        rewrite: Rewrite::Pattern(r"`([^`\n]+?)`", "${1}"),
    },
    RuleDef {
        name: "image",
        rewrite: Rewrite::Pattern(r"!\[([^\]\n]*?)\]\([^)\n]+?\)", "${1}"),
    },
    RuleDef {
        name: "link",
        rewrite: Rewrite::Pattern(r"\[([^\]\n]+?)\]\([^)\n]+?\)", "${1}"),
    },
    RuleDef {
        name: "bullet",
        rewrite: Rewrite::Pattern(r"(?m)^[ \t]*[*+\-][ \t]+", "• "),
    },
    RuleDef {
        name: "ordered-list",
        rewrite: Rewrite::Pattern(r"(?m)^[ \t]*\d+\.[ \t]+", ""),
    },
    RuleDef {
        name: "blockquote",
        rewrite: Rewrite::Pattern(r"(?m)^[ \t]*>+[ \t]*", ""),
    },
    RuleDef {
        name: "code-fence",
        rewrite: Rewrite::Pattern(r"(?m)^```.*$", ""),
    },
    RuleDef {
        name: "blank-lines",
        rewrite: Rewrite::Pattern(r"\n{3,}", "\n\n"),
    },
];

enum CompiledRewrite {
    Pattern(Regex, &'static str),
    SingleEmphasis(char),
}

struct Rule {
    name: &'static str,
    rewrite: CompiledRewrite,
}

impl Rule {
    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match &self.rewrite {
            CompiledRewrite::Pattern(regex, replacement) => regex.replace_all(text, *replacement),
            CompiledRewrite::SingleEmphasis(marker) => strip_single_emphasis(text, *marker),
        }
    }
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    RULE_DEFS
        .iter()
        .map(|def| Rule {
            name: def.name,
            rewrite: match def.rewrite {
                Rewrite::Pattern(pattern, replacement) => {
                    CompiledRewrite::Pattern(Regex::new(pattern).unwrap(), replacement)
                }
                Rewrite::SingleEmphasis(marker) => CompiledRewrite::SingleEmphasis(marker),
            },
        })
        .collect()
});

/// Remove single-marker emphasis, keeping the inner text.
///
/// A span opens on a marker that is not preceded by the same marker and is
/// followed by a non-space character, and closes on the next marker on the
/// same line that is preceded by a non-space character and not followed by
/// the same marker. Underscores must additionally sit on word boundaries so
/// identifiers such as `snake_case_name` survive.
fn strip_single_emphasis(text: &str, marker: char) -> Cow<'_, str> {
    if !text.contains(marker) {
        return Cow::Borrowed(text);
    }

    let chars: Vec<char> = text.chars().collect();
    let mut output = String::with_capacity(text.len());
    let mut changed = false;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == marker {
            if let Some(close) = find_emphasis_close(&chars, i, marker) {
                output.extend(&chars[i + 1..close]);
                i = close + 1;
                changed = true;
                continue;
            }
        }
        output.push(chars[i]);
        i += 1;
    }

    if changed {
        Cow::Owned(output)
    } else {
        Cow::Borrowed(text)
    }
}

fn find_emphasis_close(chars: &[char], open: usize, marker: char) -> Option<usize> {
    let intraword = marker == '_';
    let prev = open.checked_sub(1).map(|p| chars[p]);

    if prev == Some(marker) || (intraword && prev.is_some_and(char::is_alphanumeric)) {
        return None;
    }

    let first = *chars.get(open + 1)?;
    if first == marker || first.is_whitespace() {
        return None;
    }

    let close = open + 1 + chars[open + 1..].iter().position(|&c| c == marker || c == '\n')?;
    if chars[close] == '\n' || chars[close - 1].is_whitespace() {
        return None;
    }

    let next = chars.get(close + 1).copied();
    if next == Some(marker) || (intraword && next.is_some_and(char::is_alphanumeric)) {
        return None;
    }

    Some(close)
}

/// Markup sanitizer applying the ordered rule table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sanitizer;

impl Sanitizer {
    /// Create a new sanitizer.
    pub fn new() -> Self {
        Self
    }

    /// Names of the rules, in application order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        RULES.iter().map(|r| r.name).collect()
    }

    /// Apply a single named rule once. Returns `None` for an unknown name.
    pub fn apply_rule(&self, name: &str, text: &str) -> Option<String> {
        RULES
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.apply(text).into_owned())
    }

    /// Strip markup from `text`. Never fails; unmatched text passes through.
    pub fn sanitize(&self, text: &str) -> String {
        let mut current = text.replace("\r\n", "\n").replace('\r', "\n");

        loop {
            let next = self.run_pipeline(&current);
            if next == current {
                return next;
            }
            current = next;
        }
    }

    fn run_pipeline(&self, text: &str) -> String {
        let mut text = text.to_string();

        for rule in RULES.iter() {
            let rewritten = match rule.apply(&text) {
                Cow::Borrowed(_) => None,
                Cow::Owned(s) => Some(s),
            };
            if let Some(s) = rewritten {
                text = s;
            }
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rule(name: &str, text: &str) -> String {
        Sanitizer::new().apply_rule(name, text).unwrap()
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let names = Sanitizer::new().rule_names();
        let pos = |n: &str| names.iter().position(|x| *x == n).unwrap();

        assert!(pos("bold-italic-asterisk") < pos("bold-asterisk"));
        assert!(pos("bold-asterisk") < pos("italic-asterisk"));
        assert!(pos("image") < pos("link"));
        assert_eq!(names.last(), Some(&"blank-lines"));
    }

    #[test]
    fn test_heading_rules() {
        assert_eq!(rule("heading-marker", "## Chapter 1"), "Chapter 1");
        assert_eq!(rule("heading-marker", "  ###### Deep"), "Deep");
        assert_eq!(rule("heading-marker", "####### Seven"), "####### Seven");
        assert_eq!(rule("heading-marker", "#hashtag"), "#hashtag");
        assert_eq!(rule("heading-only", "a\n###\nb"), "a\n\nb");
    }

    #[test]
    fn test_emphasis_rules() {
        assert_eq!(rule("bold-italic-asterisk", "***both***"), "both");
        assert_eq!(rule("bold-asterisk", "a **bold** b"), "a bold b");
        assert_eq!(rule("bold-underscore", "__bold__"), "bold");
        assert_eq!(rule("italic-asterisk", "an *em* word"), "an em word");
        assert_eq!(rule("italic-underscore", "an _em_ word"), "an em word");
    }

    #[test]
    fn test_single_emphasis_skips_adjacent_markers() {
        // Double markers belong to the bold rule, not to nested single emphasis.
        assert_eq!(rule("italic-asterisk", "**bold**"), "**bold**");
        assert_eq!(rule("italic-asterisk", "2 * 3 * 4"), "2 * 3 * 4");
        assert_eq!(rule("italic-underscore", "snake_case_name"), "snake_case_name");
    }

    #[test]
    fn test_emphasis_next_to_punctuation() {
        let s = Sanitizer::new();
        assert_eq!(s.sanitize("(*quoted*), **loud**!"), "(quoted), loud!");
        assert_eq!(s.sanitize("***a*** and **b** and *c*"), "a and b and c");
    }

    #[test]
    fn test_strikethrough_and_code() {
        assert_eq!(rule("strikethrough", "~~gone~~ kept"), "gone kept");
        assert_eq!(rule("inline-code", "run `cargo` now"), "run cargo now");
    }

    #[test]
    fn test_links_and_images() {
        assert_eq!(rule("link", "see [docs](http://x.y)"), "see docs");
        assert_eq!(rule("image", "![logo](a.png)"), "logo");

        let s = Sanitizer::new();
        assert_eq!(s.sanitize("![logo](a.png)"), "logo");
        assert_eq!(s.sanitize("![a](x.png)[b](y)"), "ab");
        assert_eq!(s.sanitize("[b](y)![a](x.png)"), "ba");
    }

    #[test]
    fn test_list_markers() {
        assert_eq!(rule("bullet", "* one\n- two\n  + three"), "• one\n• two\n• three");
        assert_eq!(rule("ordered-list", "1. first\n12. twelfth"), "first\ntwelfth");
        assert_eq!(rule("bullet", "-dash"), "-dash");
    }

    #[test]
    fn test_bullet_with_inline_emphasis() {
        let s = Sanitizer::new();
        assert_eq!(s.sanitize("* item with *emphasis*"), "• item with emphasis");
    }

    #[test]
    fn test_blockquote_and_fences() {
        assert_eq!(rule("blockquote", ">> quoted"), "quoted");
        assert_eq!(rule("code-fence", "```rust\nlet x = 1;\n```"), "\nlet x = 1;\n");
    }

    #[test]
    fn test_blank_line_collapse() {
        assert_eq!(rule("blank-lines", "a\n\n\n\nb"), "a\n\nb");
        assert_eq!(rule("blank-lines", "a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_full_pipeline() {
        let input = "# Title\n> **Note:** read the [guide](g.md)\n\n\n\n1. `step`\n* ~~old~~ new";
        let expected = "Title\nNote: read the guide\n\nstep\n• old new";
        assert_eq!(Sanitizer::new().sanitize(input), expected);
    }

    #[test]
    fn test_nested_markers_reach_fixed_point() {
        let s = Sanitizer::new();
        assert_eq!(s.sanitize("1. 2. nested"), "nested");
        assert_eq!(s.sanitize("*# heading*"), "heading");
    }

    #[test]
    fn test_plain_text_untouched() {
        let text = "Plain prose, with punctuation: 3 < 4.";
        assert_eq!(Sanitizer::new().sanitize(text), text);
    }

    #[test]
    fn test_crlf_normalized() {
        assert_eq!(Sanitizer::new().sanitize("# A\r\nB"), "A\nB");
    }

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(text in "[a-z #*_~`!\\[\\]()>+\\-0-9.\n\t]{0,40}") {
            let s = Sanitizer::new();
            let once = s.sanitize(&text);
            prop_assert_eq!(s.sanitize(&once), once);
        }
    }
}
