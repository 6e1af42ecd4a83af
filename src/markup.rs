/*!
 * Inline markup model for cue text.
 *
 * Cue text is parsed into a flat sequence of spans: plain runs, tag opens
 * and tag closes. The parse is lossless, so `render(&parse(x)) == x` for
 * every input, and it never validates nesting. Unbalanced markup is the
 * normal input for the tag balancer.
 *
 * For position-based edits the spans can be flattened further into
 * glyphs, where every visible character and every tag is one element.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::LINE_BREAK;

/// Tag names recognized as markup. Anything else in angle brackets is text.
pub const TAG_VOCABULARY: [&str; 4] = ["i", "b", "u", "font"];

/// Tags the balancer repairs
pub const EMPHASIS_TAGS: [&str; 3] = ["i", "b", "u"];

/// Generic `<name ...>` / `</name>` pattern. Tags never span lines.
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(/?)([A-Za-z]+)([^<>\n]*)>").expect("Invalid tag regex")
});

/// A parsed unit of cue text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Plain content, may contain line breaks
    Text(String),
    /// Opening tag; `name` is lowercase, `raw` is the exact source text
    Open { name: String, raw: String },
    /// Closing tag; `name` is lowercase, `raw` is the exact source text
    Close { name: String, raw: String },
}

impl Span {
    /// Canonical opening tag, e.g. `<i>`.
    pub fn open(name: &str) -> Self {
        Span::Open {
            name: name.to_lowercase(),
            raw: format!("<{}>", name),
        }
    }

    /// Canonical closing tag, e.g. `</i>`.
    pub fn close(name: &str) -> Self {
        Span::Close {
            name: name.to_lowercase(),
            raw: format!("</{}>", name),
        }
    }

    /// Source text of the span
    pub fn raw(&self) -> &str {
        match self {
            Span::Text(text) => text,
            Span::Open { raw, .. } | Span::Close { raw, .. } => raw,
        }
    }

    pub fn is_tag(&self) -> bool {
        !matches!(self, Span::Text(_))
    }

    pub fn is_open(&self, tag: &str) -> bool {
        matches!(self, Span::Open { name, .. } if name == tag)
    }

    pub fn is_close(&self, tag: &str) -> bool {
        matches!(self, Span::Close { name, .. } if name == tag)
    }

    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Span::Text(_) => None,
            Span::Open { name, .. } | Span::Close { name, .. } => Some(name),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Span::Text(text) => Some(text),
            _ => None,
        }
    }
}

fn is_known_tag(name: &str) -> bool {
    TAG_VOCABULARY.contains(&name)
}

/// Parse cue text into spans.
pub fn parse(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut plain_start = 0;

    for caps in TAG_REGEX.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let name = caps
            .get(2)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_default();
        let rest = caps.get(3).map_or("", |m| m.as_str());

        if !is_known_tag(&name) {
            continue;
        }
        // `</i foo>` and `<i/>` are not tags we understand
        if closing && !rest.trim().is_empty() {
            continue;
        }
        if !closing && !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            continue;
        }

        if whole.start() > plain_start {
            spans.push(Span::Text(text[plain_start..whole.start()].to_string()));
        }
        let raw = whole.as_str().to_string();
        spans.push(if closing {
            Span::Close { name, raw }
        } else {
            Span::Open { name, raw }
        });
        plain_start = whole.end();
    }

    if plain_start < text.len() {
        spans.push(Span::Text(text[plain_start..].to_string()));
    }

    spans
}

/// Concatenate the raw text of all spans.
pub fn render(spans: &[Span]) -> String {
    spans.iter().map(Span::raw).collect()
}

/// Text with all recognized markup removed.
pub fn visible_text(text: &str) -> String {
    parse(text)
        .iter()
        .filter_map(Span::as_text)
        .collect()
}

/// Parse each display line separately.
pub fn lines(text: &str) -> Vec<Vec<Span>> {
    text.split(LINE_BREAK).map(parse).collect()
}

/// Inverse of [`lines`].
pub fn join_lines(lines: &[Vec<Span>]) -> String {
    lines
        .iter()
        .map(|line| render(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Index of the first plain span, i.e. the content after leading markup.
pub fn first_text_index(spans: &[Span]) -> Option<usize> {
    spans.iter().position(|span| !span.is_tag())
}

/// True when every `tag` open is closed in order and no close is stray.
pub fn is_balanced(spans: &[Span], tag: &str) -> bool {
    let mut depth = 0usize;
    for span in spans {
        if span.is_open(tag) {
            depth += 1;
        } else if span.is_close(tag) {
            if depth == 0 {
                return false;
            }
            depth -= 1;
        }
    }
    depth == 0
}

/// One visible character or one tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Glyph {
    Char(char),
    Tag(Span),
}

impl Glyph {
    pub fn as_char(&self) -> Option<char> {
        match self {
            Glyph::Char(c) => Some(*c),
            Glyph::Tag(_) => None,
        }
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, Glyph::Tag(_))
    }

    pub fn is_open(&self, tag: &str) -> bool {
        matches!(self, Glyph::Tag(span) if span.is_open(tag))
    }

    pub fn is_close(&self, tag: &str) -> bool {
        matches!(self, Glyph::Tag(span) if span.is_close(tag))
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self, Glyph::Char(LINE_BREAK))
    }
}

/// Flatten spans into glyphs.
pub fn to_glyphs(spans: &[Span]) -> Vec<Glyph> {
    let mut glyphs = Vec::new();
    for span in spans {
        match span {
            Span::Text(text) => glyphs.extend(text.chars().map(Glyph::Char)),
            tag => glyphs.push(Glyph::Tag(tag.clone())),
        }
    }
    glyphs
}

/// Parse text straight into glyphs.
pub fn glyphs(text: &str) -> Vec<Glyph> {
    to_glyphs(&parse(text))
}

/// Render glyphs back to text.
pub fn render_glyphs(glyphs: &[Glyph]) -> String {
    let mut out = String::new();
    for glyph in glyphs {
        match glyph {
            Glyph::Char(c) => out.push(*c),
            Glyph::Tag(span) => out.push_str(span.raw()),
        }
    }
    out
}
