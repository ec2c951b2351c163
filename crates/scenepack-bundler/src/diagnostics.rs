//! Compiler diagnostics and their `file:line:column: message` rendering.
//!
//! Engine diagnostics arrive as rendered text. [`Diagnostic::from_rendered`]
//! pulls the code, message, location and offending source line back out of
//! that text so they can be re-rendered in one compact format.

use serde::{Deserialize, Serialize};

/// Source position of a diagnostic. `line` is 1-based, `column` is a 0-based
/// character offset into the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
    /// Text of the offending line, when the engine supplied it.
    pub line_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub code: Option<String>,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            location: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Render as `file:line:column: message`, followed by the source line and
    /// a caret under the column when the line is known.
    pub fn format(&self) -> String {
        let Some(location) = &self.location else {
            return self.message.clone();
        };

        let mut out = format!(
            "{}:{}:{}: {}",
            location.file, location.line, location.column, self.message
        );
        if let Some(text) = &location.line_text {
            out.push('\n');
            out.push_str(text);
            out.push('\n');
            out.push_str(&" ".repeat(location.column as usize));
            out.push('^');
        }
        out
    }

    /// Parse an engine-rendered report such as:
    ///
    /// ```text
    /// [PARSE_ERROR] Error: Unexpected token
    ///    ╭─[ /src/index.tsx:1:11 ]
    ///    │
    ///  1 │ const x = ;
    /// ───╯
    /// ```
    ///
    /// Anything that doesn't match the layout is kept as a plain message. A
    /// trailing `Stack backtrace:` section (captured by plugin errors when
    /// `RUST_BACKTRACE` is set) is dropped.
    pub fn from_rendered(text: &str) -> Self {
        let text = strip_ansi(text);
        let report = text.split(BACKTRACE_MARKER).next().unwrap_or_default();
        let mut lines = report.lines();

        let head = lines.next().unwrap_or_default().trim();
        let (code, head) = split_code(head);
        let mut message = strip_severity(head).to_string();

        let mut location = None;
        for line in lines.by_ref() {
            if let Some(loc) = parse_location_header(line) {
                location = Some(loc);
                break;
            }
            let line = line.trim();
            if !line.is_empty() {
                message.push('\n');
                message.push_str(line);
            }
        }

        if let Some(loc) = location.as_mut() {
            loc.line_text = find_source_line(lines, loc.line);
        }

        Self {
            message: message.trim().to_string(),
            code: code.map(str::to_string),
            location,
        }
    }
}

const BACKTRACE_MARKER: &str = "\nStack backtrace:";

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

fn split_code(head: &str) -> (Option<&str>, &str) {
    if let Some(rest) = head.strip_prefix('[') {
        if let Some((code, rest)) = rest.split_once(']') {
            return (Some(code), rest.trim_start());
        }
    }
    (None, head)
}

fn strip_severity(head: &str) -> &str {
    for prefix in ["Error:", "Warning:", "error:", "warning:"] {
        if let Some(rest) = head.strip_prefix(prefix) {
            return rest.trim_start();
        }
    }
    head
}

/// `   ╭─[ /src/index.tsx:1:11 ]` -> file, line, 0-based column.
fn parse_location_header(line: &str) -> Option<Location> {
    let start = line.find("─[")? + "─[".len();
    let inner = line[start..].split(']').next()?.trim();

    let mut parts = inner.rsplitn(3, ':');
    let column: u32 = parts.next()?.trim().parse().ok()?;
    let line_no: u32 = parts.next()?.trim().parse().ok()?;
    let file = parts.next()?.trim();
    if file.is_empty() {
        return None;
    }

    Some(Location {
        file: file.to_string(),
        line: line_no,
        column: column.saturating_sub(1),
        line_text: None,
    })
}

/// Find ` 12 │ source text` for the given line number.
fn find_source_line<'a>(lines: impl Iterator<Item = &'a str>, line_no: u32) -> Option<String> {
    let prefix = line_no.to_string();
    lines
        .filter_map(|line| {
            let (gutter, source) = line.split_once('│')?;
            (gutter.trim() == prefix).then(|| source.strip_prefix(' ').unwrap_or(source).to_string())
        })
        .next()
}

fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
