//! Settings file loader.
//!
//! The format is a small INI dialect:
//!
//! ```text
//! ; comment
//! # comment
//! [diff2d]            ; or: #begin diff2d ... #end
//! LX = 1.0
//! DX   0.1            ; "key value" also works
//! ```
//!
//! Keys inside a section are stored as `section.KEY`. Keys before any
//! section are stored bare. Lookups are exact (case-sensitive).

use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// Errors from reading or querying a settings file.
#[derive(Debug)]
pub enum SettingsError {
    /// The file could not be read.
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A line could not be parsed.
    Syntax {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// The same key was set twice.
    Duplicate {
        /// Fully qualified key.
        key: String,
        /// 1-based line of the second assignment.
        line: usize,
    },
    /// A required key is absent.
    Missing {
        /// Fully qualified key.
        key: String,
    },
    /// A key's value does not parse as the requested type.
    Invalid {
        /// Fully qualified key.
        key: String,
        /// The raw value.
        value: String,
        /// Parse failure.
        reason: String,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read settings file {}: {source}", path.display())
            }
            Self::Syntax { line, reason } => write!(f, "settings line {line}: {reason}"),
            Self::Duplicate { key, line } => {
                write!(f, "settings line {line}: duplicate key {key}")
            }
            Self::Missing { key } => write!(f, "missing setting {key}"),
            Self::Invalid { key, value, reason } => {
                write!(f, "setting {key} = {value:?} is invalid: {reason}")
            }
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Key/value settings in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    entries: IndexMap<String, String>,
}

impl Settings {
    /// Read and parse the file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse settings from text.
    ///
    /// # Examples
    ///
    /// ```
    /// use diff2d_engine::Settings;
    ///
    /// let s = Settings::parse("[diff2d]\nLX = 1.5\nOUTFILE out.bin\n").unwrap();
    /// assert_eq!(s.get_f64("diff2d.LX").unwrap(), 1.5);
    /// assert_eq!(s.get_str("diff2d.OUTFILE").unwrap(), "out.bin");
    /// ```
    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        let mut entries = IndexMap::new();
        let mut section: Option<String> = None;

        for (n, raw) in text.lines().enumerate() {
            let line_no = n + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            let line = strip_trailing_comment(line);

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| SettingsError::Syntax {
                        line: line_no,
                        reason: format!("malformed section header {line:?}"),
                    })?;
                section = Some(name.to_string());
                continue;
            }

            if line.starts_with('#') {
                let mut words = line.split_whitespace();
                let directive = words.next().unwrap_or_default();
                if directive.eq_ignore_ascii_case("#begin") {
                    section = Some(words.next().map(str::to_string).ok_or_else(|| {
                        SettingsError::Syntax {
                            line: line_no,
                            reason: "#begin without a section name".into(),
                        }
                    })?);
                } else if directive.eq_ignore_ascii_case("#end") {
                    section = None;
                }
                continue;
            }

            let (key, value) = split_assignment(line).ok_or_else(|| SettingsError::Syntax {
                line: line_no,
                reason: format!("expected `key = value`, got {line:?}"),
            })?;
            let key = match &section {
                Some(s) => format!("{s}.{key}"),
                None => key.to_string(),
            };
            if entries.contains_key(&key) {
                return Err(SettingsError::Duplicate { key, line: line_no });
            }
            entries.insert(key, value.to_string());
        }

        Ok(Self { entries })
    }

    /// Whether `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set or replace `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Raw value of a required key.
    pub fn get_str(&self, key: &str) -> Result<&str, SettingsError> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| SettingsError::Missing { key: key.into() })
    }

    /// Value of a required floating-point key.
    pub fn get_f64(&self, key: &str) -> Result<f64, SettingsError> {
        let raw = self.get_str(key)?;
        parse_f64(key, raw)
    }

    /// Value of an optional floating-point key.
    pub fn get_opt_f64(&self, key: &str) -> Result<Option<f64>, SettingsError> {
        self.entries
            .get(key)
            .map(|raw| parse_f64(key, raw))
            .transpose()
    }

    /// All settings in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of settings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no settings were read.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drop a `;` or `#` comment that follows whitespace.
fn strip_trailing_comment(line: &str) -> &str {
    let mut prev_blank = false;
    for (k, c) in line.char_indices() {
        if prev_blank && (c == ';' || c == '#') {
            return line[..k].trim_end();
        }
        prev_blank = c.is_whitespace();
    }
    line
}

fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let (key, value) = match line.split_once('=') {
        Some((k, v)) => (k.trim(), v.trim()),
        None => {
            let (k, v) = line.split_once(char::is_whitespace)?;
            (k.trim(), v.trim())
        }
    };
    if key.is_empty() || value.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, value))
}

fn parse_f64(key: &str, raw: &str) -> Result<f64, SettingsError> {
    raw.parse::<f64>().map_err(|e| SettingsError::Invalid {
        key: key.into(),
        value: raw.into(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_sections() {
        let s = Settings::parse("[diff2d]\nLX = 1\nLY=2\n[other]\nLX = 3\n").unwrap();
        assert_eq!(s.get_f64("diff2d.LX").unwrap(), 1.0);
        assert_eq!(s.get_f64("diff2d.LY").unwrap(), 2.0);
        assert_eq!(s.get_f64("other.LX").unwrap(), 3.0);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn begin_end_directives_and_bare_keys() {
        let text = "top 4\n#BEGIN diff2d\nD 0.5\n#end\nafter = x\n";
        let s = Settings::parse(text).unwrap();
        assert_eq!(s.get_str("top").unwrap(), "4");
        assert_eq!(s.get_f64("diff2d.D").unwrap(), 0.5);
        assert_eq!(s.get_str("after").unwrap(), "x");
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let s = Settings::parse("; header\n\n# note\n   \n[a]\nk = v\n").unwrap();
        let all: Vec<_> = s.iter().collect();
        assert_eq!(all, vec![("a.k", "v")]);
    }

    #[test]
    fn trailing_comments_are_stripped() {
        let text = "\
; comment
# comment
[diff2d]            ; or: #begin diff2d ... #end
LX = 1.0
DX   0.1            ; \"key value\" also works
";
        let s = Settings::parse(text).unwrap();
        assert_eq!(s.get_f64("diff2d.LX").unwrap(), 1.0);
        assert_eq!(s.get_f64("diff2d.DX").unwrap(), 0.1);
        assert_eq!(s.len(), 2);

        let text = "#begin diff2d  # solver\nOUTFILE a;b.bin # note\n#end\n";
        let s = Settings::parse(text).unwrap();
        assert_eq!(s.get_str("diff2d.OUTFILE").unwrap(), "a;b.bin");
    }

    #[test]
    fn file_order_is_kept() {
        let s = Settings::parse("[s]\nz = 1\na = 2\nm = 3\n").unwrap();
        let keys: Vec<_> = s.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["s.z", "s.a", "s.m"]);
    }

    #[test]
    fn duplicate_key_rejected() {
        let err = Settings::parse("[s]\nk = 1\nk = 2\n").unwrap_err();
        assert!(matches!(err, SettingsError::Duplicate { line: 3, .. }));
    }

    #[test]
    fn syntax_errors_carry_line() {
        assert!(matches!(
            Settings::parse("[s]\nlonely\n"),
            Err(SettingsError::Syntax { line: 2, .. })
        ));
        assert!(matches!(
            Settings::parse("[s\n"),
            Err(SettingsError::Syntax { line: 1, .. })
        ));
        assert!(matches!(
            Settings::parse("#begin\n"),
            Err(SettingsError::Syntax { line: 1, .. })
        ));
    }

    #[test]
    fn typed_getters() {
        let s = Settings::parse("[s]\nx = abc\ny = 2.5e-3\n").unwrap();
        assert!(matches!(
            s.get_f64("s.x"),
            Err(SettingsError::Invalid { .. })
        ));
        assert_eq!(s.get_f64("s.y").unwrap(), 2.5e-3);
        assert!(matches!(
            s.get_f64("s.nope"),
            Err(SettingsError::Missing { .. })
        ));
        assert_eq!(s.get_opt_f64("s.nope").unwrap(), None);
        assert_eq!(s.get_opt_f64("s.y").unwrap(), Some(2.5e-3));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Settings::from_path("/nonexistent/diff2d.ini").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
        assert!(err.source().is_some());
    }
}
