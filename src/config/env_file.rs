//! .env file parsing.
//!
//! This module parses environment variable files in the dotenv `KEY=value`
//! format and expands `${VAR}` references in their values. Lines that are
//! not valid assignments are skipped with a warning; the rest of the file
//! still loads.

use crate::error::LoadWarning;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

/// Valid variable names: a letter or underscore, then letters, digits, `_`, `.` or `-`.
static KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.-]*$").expect("KEY_REGEX must compile")
});

/// `\$`, `${NAME}` or `$NAME`.
static EXPANSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\\$|\$\{([A-Za-z_][A-Za-z0-9_.-]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("EXPANSION_REGEX must compile")
});

/// How a value was quoted in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    Unquoted,
    Single,
    Double,
}

/// One `KEY=value` assignment, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub key: String,
    /// Value after unquoting and escape processing, before expansion.
    pub value: String,
    pub quoting: Quoting,
}

impl EnvEntry {
    /// Whether `${VAR}` references in this value should be expanded.
    pub fn expands(&self) -> bool {
        self.quoting != Quoting::Single
    }
}

/// Parses .env files into ordered assignments.
///
/// # Supported Formats
///
/// - Simple: `KEY=value`
/// - Exported: `export KEY=value`
/// - Quoted: `KEY="value with spaces"` or `KEY='single quoted'`
/// - Multi-line: a quoted value may continue until its closing quote
/// - Escapes in double quotes: `\n`, `\r`, `\t`, `\"`, `\\`
/// - Empty: `KEY=`
/// - Comments: `# This is a comment`, `KEY=value # trailing comment`
/// - Whitespace around equals: `KEY = value`
/// - Values with equals signs: `URL=https://example.com?foo=bar`
///
/// # Example
///
/// ```
/// use dotenv_gate::config::EnvFileParser;
/// use std::path::Path;
///
/// let content = r#"
/// # Account settings
/// CDK_ACCOUNT=123456789012
/// not an assignment
/// CDK_DOMAIN="example.com"
/// EMPTY=
/// "#;
///
/// let entries = EnvFileParser::parse(content, Path::new(".env.dev"));
/// assert_eq!(entries.len(), 3);
/// assert_eq!(entries[0].key, "CDK_ACCOUNT");
/// assert_eq!(entries[1].value, "example.com");
/// assert_eq!(entries[2].value, "");
/// ```
pub struct EnvFileParser;

impl EnvFileParser {
    /// Parse env file content into assignments.
    ///
    /// Invalid lines are logged with their line number and skipped. `source`
    /// is only used in those warnings.
    pub fn parse(content: &str, source: &Path) -> Vec<EnvEntry> {
        let lines: Vec<&str> = content.lines().collect();
        let mut entries = Vec::new();
        let mut index = 0;

        while index < lines.len() {
            let line_number = index + 1;
            let line = lines[index].trim_start();
            index += 1;

            // Skip empty lines and comments
            if line.trim_end().is_empty() || line.starts_with('#') {
                continue;
            }

            match Self::parse_assignment(line, &lines[index..]) {
                Some((entry, continued)) => {
                    entries.push(entry);
                    index += continued;
                }
                None => {
                    let skipped = LoadWarning::Malformed {
                        path: source.to_path_buf(),
                        line: line_number,
                        content: line.trim_end().to_string(),
                    };
                    warn!("Skipping {}", skipped);
                }
            }
        }

        entries
    }

    /// Load and parse an env file from a path.
    ///
    /// # Errors
    ///
    /// Returns `LoadWarning::NotFound` if the file doesn't exist,
    /// `LoadWarning::Unreadable` for other IO failures.
    pub fn load(path: &Path) -> Result<Vec<EnvEntry>, LoadWarning> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadWarning::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LoadWarning::Unreadable {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        Ok(Self::parse(&content, path))
    }

    /// Parse one assignment starting at `line`.
    ///
    /// Returns the entry and how many of the `following` lines a quoted
    /// value consumed.
    fn parse_assignment(line: &str, following: &[&str]) -> Option<(EnvEntry, usize)> {
        let line = match line.strip_prefix("export") {
            Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
            _ => line,
        };

        let eq_pos = line.find('=')?;
        let key = line[..eq_pos].trim();
        if !KEY_REGEX.is_match(key) {
            return None;
        }

        let raw = &line[eq_pos + 1..];
        let trimmed = raw.trim_start();

        let (value, quoting, continued) = if let Some(rest) = trimmed.strip_prefix('"') {
            let (body, continued) = Self::read_quoted(rest, following, '"')?;
            (Self::unescape(&body), Quoting::Double, continued)
        } else if let Some(rest) = trimmed.strip_prefix('\'') {
            let (body, continued) = Self::read_quoted(rest, following, '\'')?;
            (body, Quoting::Single, continued)
        } else {
            let value = Self::strip_inline_comment(raw).trim().to_string();
            (value, Quoting::Unquoted, 0)
        };

        let entry = EnvEntry {
            key: key.to_string(),
            value,
            quoting,
        };
        Some((entry, continued))
    }

    /// Collect a quoted body up to its closing quote, across lines if needed.
    ///
    /// Anything after the closing quote is ignored. `None` if the quote is
    /// never closed.
    fn read_quoted(first: &str, following: &[&str], quote: char) -> Option<(String, usize)> {
        let mut body = String::new();
        let mut segment = first;
        let mut continued = 0;

        loop {
            if let Some(end) = Self::closing_quote(segment, quote) {
                body.push_str(&segment[..end]);
                return Some((body, continued));
            }
            body.push_str(segment);
            body.push('\n');
            segment = *following.get(continued)?;
            continued += 1;
        }
    }

    /// Byte offset of the first unescaped `quote` in `segment`.
    fn closing_quote(segment: &str, quote: char) -> Option<usize> {
        let mut chars = segment.char_indices();
        while let Some((i, c)) = chars.next() {
            if c == '\\' && quote == '"' {
                chars.next();
            } else if c == quote {
                return Some(i);
            }
        }
        None
    }

    /// Process escapes in a double-quoted body.
    ///
    /// Unknown escapes are kept verbatim so `\$` survives until expansion.
    fn unescape(body: &str) -> String {
        let mut value = String::with_capacity(body.len());
        let mut chars = body.chars();

        while let Some(c) = chars.next() {
            if c != '\\' {
                value.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => value.push('\n'),
                Some('r') => value.push('\r'),
                Some('t') => value.push('\t'),
                Some('"') => value.push('"'),
                Some('\\') => value.push('\\'),
                Some(other) => {
                    value.push('\\');
                    value.push(other);
                }
                None => value.push('\\'),
            }
        }

        value
    }

    /// A `#` preceded by whitespace starts a comment in unquoted values.
    fn strip_inline_comment(raw: &str) -> &str {
        let cut = raw
            .char_indices()
            .find(|&(i, c)| c == '#' && raw[..i].ends_with(char::is_whitespace))
            .map(|(i, _)| i)
            .unwrap_or(raw.len());
        &raw[..cut]
    }
}

/// Expand `${NAME}` and `$NAME` references in a value.
///
/// Unknown names expand to an empty string. `\$` yields a literal `$`.
pub fn expand<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    EXPANSION_REGEX
        .replace_all(value, |caps: &Captures| {
            match caps.get(1).or_else(|| caps.get(2)) {
                Some(name) => lookup(name.as_str()).unwrap_or_default(),
                None => "$".to_string(),
            }
        })
        .into_owned()
}

/// Resolve parsed entries into final key/value pairs.
///
/// References are looked up in `ambient` first, then in earlier entries of
/// the same file. Keys keep their first-seen position; a later duplicate
/// replaces the earlier value.
pub fn resolve_entries<F>(entries: &[EnvEntry], ambient: F) -> Vec<(String, String)>
where
    F: Fn(&str) -> Option<String>,
{
    let mut resolved: Vec<(String, String)> = Vec::with_capacity(entries.len());

    for entry in entries {
        let value = if entry.expands() {
            expand(&entry.value, |name| {
                ambient(name).or_else(|| {
                    resolved
                        .iter()
                        .find(|(key, _)| key == name)
                        .map(|(_, value)| value.clone())
                })
            })
        } else {
            entry.value.clone()
        };

        match resolved.iter_mut().find(|(key, _)| *key == entry.key) {
            Some(slot) => slot.1 = value,
            None => resolved.push((entry.key.clone(), value)),
        }
    }

    resolved
}
