//! ANSI color escape processing
//!
//! Splits a received chat line into colored text runs. Only the SGR
//! foreground codes 30-37 and 90-97 carry meaning here; any other code in
//! the `ESC [ nn m` form is stripped from the text without touching the
//! current color. That includes the reset code `0`, which servers emit after
//! every colored span and which leaves the previous color in effect.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// `ESC [ <1-2 ASCII digits> m`
const ESCAPE_PATTERN: &str = r"\x1b\[([0-9]{1,2})m";

/// Code used for locally generated informational notices
pub const INFO_CODE: &str = "96";

/// Code used for locally generated error notices
pub const ERROR_CODE: &str = "91";

static ESCAPE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(ESCAPE_PATTERN).expect("escape pattern is a valid regex"));

static DEFAULT_PARSER: Lazy<ColorRunParser> =
    Lazy::new(|| ColorRunParser::new(Arc::new(ColorTable::standard())));

/// RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A contiguous span of text sharing one display color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub color: Color,
}

impl TextRun {
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// Mapping from SGR color code to display color
///
/// Lookups use the code exactly as it appears in the escape sequence, so
/// `"31"` is red while `"031"` can never match (the escape pattern only
/// admits one or two digits anyway).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    colors: HashMap<String, Color>,
    default_color: Color,
}

impl ColorTable {
    /// The 16-entry table: standard colors 30-37 and bright colors 90-97
    pub fn standard() -> Self {
        let entries = [
            ("30", Color::BLACK),
            ("31", Color::rgb(255, 80, 80)),
            ("32", Color::rgb(80, 255, 80)),
            ("33", Color::rgb(255, 255, 80)),
            ("34", Color::rgb(80, 80, 255)),
            ("35", Color::rgb(255, 80, 255)),
            ("36", Color::rgb(80, 255, 255)),
            ("37", Color::WHITE),
            ("90", Color::GRAY),
            ("91", Color::rgb(255, 150, 150)),
            ("92", Color::rgb(150, 255, 150)),
            ("93", Color::rgb(255, 255, 150)),
            ("94", Color::rgb(150, 150, 255)),
            ("95", Color::rgb(255, 150, 255)),
            ("96", Color::rgb(150, 255, 255)),
            ("97", Color::WHITE),
        ];

        Self {
            colors: entries
                .iter()
                .map(|(code, color)| (code.to_string(), *color))
                .collect(),
            default_color: Color::WHITE,
        }
    }

    /// Look up the color for a code, `None` for codes the table does not know
    pub fn lookup(&self, code: &str) -> Option<Color> {
        self.colors.get(code).copied()
    }

    /// Color every line starts with
    pub fn default_color(&self) -> Color {
        self.default_color
    }

    pub fn info_color(&self) -> Color {
        self.lookup(INFO_CODE).unwrap_or(self.default_color)
    }

    pub fn error_color(&self) -> Color {
        self.lookup(ERROR_CODE).unwrap_or(self.default_color)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Splits lines into [`TextRun`]s using an injected [`ColorTable`]
///
/// Parsing is stateless across calls: every line starts in the table's
/// default color, so a color set on one line never bleeds into the next.
#[derive(Debug, Clone)]
pub struct ColorRunParser {
    table: Arc<ColorTable>,
}

impl ColorRunParser {
    pub fn new(table: Arc<ColorTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ColorTable {
        &self.table
    }

    /// Parse one line into ordered, non-empty runs
    pub fn parse(&self, line: &str) -> Vec<TextRun> {
        let mut runs = Vec::new();
        let mut current_color = self.table.default_color();
        let mut last_end = 0;

        for caps in ESCAPE_REGEX.captures_iter(line) {
            let Some(whole) = caps.get(0) else {
                continue;
            };

            push_run(&mut runs, &line[last_end..whole.start()], current_color);

            if let Some(color) = caps.get(1).and_then(|code| self.table.lookup(code.as_str())) {
                current_color = color;
            }

            last_end = whole.end();
        }

        push_run(&mut runs, &line[last_end..], current_color);
        runs
    }

    /// Single-run notice in the info color
    pub fn info_notice(&self, text: impl Into<String>) -> Vec<TextRun> {
        vec![TextRun::new(text, self.table.info_color())]
    }

    /// Single-run notice in the error color
    pub fn error_notice(&self, text: impl Into<String>) -> Vec<TextRun> {
        vec![TextRun::new(text, self.table.error_color())]
    }
}

impl Default for ColorRunParser {
    fn default() -> Self {
        DEFAULT_PARSER.clone()
    }
}

fn push_run(runs: &mut Vec<TextRun>, text: &str, color: Color) {
    if !text.is_empty() {
        runs.push(TextRun::new(text, color));
    }
}

/// Parse a line with the standard color table
pub fn parse(line: &str) -> Vec<TextRun> {
    DEFAULT_PARSER.parse(line)
}

/// Remove every well-formed color escape, leaving the plain text
pub fn strip_escapes(line: &str) -> String {
    ESCAPE_REGEX.replace_all(line, "").into_owned()
}
