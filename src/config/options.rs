//! Recognized per-repository option keys and their value parsers.
use serde_yaml::Value;

use super::yaml_loader::describe_value;
use crate::error::ConfigError;

/// Values accepted by the `pip` option.
pub const PIP_CHOICES: &[&str] = &["install", "editable", "editable_system"];

/// Expected shape of an option's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionShape {
    /// A single string; blank means absent. Malformed values warn.
    Text,
    /// A string or a list of strings. Malformed values are fatal.
    TextList,
    /// A bool, or "true"/"false" in any case. Malformed values are fatal.
    Flag,
    /// One of a fixed set of strings. Unrecognized values warn.
    Choice(&'static [&'static str]),
}

impl std::fmt::Display for OptionShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => f.write_str("a string"),
            Self::TextList => f.write_str("a string or a list of strings"),
            Self::Flag => f.write_str("true or false"),
            Self::Choice(choices) => write!(f, "one of {}", choices.join(", ")),
        }
    }
}

/// An option key recognized in a repository's options mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// `dirname`: local directory name.
    DirName,
    /// `pip`: package install mode.
    Pip,
    /// `preinstall`: commands run before the package install.
    Preinstall,
    /// `postinstall`: commands run after the package install.
    Postinstall,
    /// `symlink_to`: directory to link the checkout into.
    SymlinkTo,
    /// `base`: per-entry base directory.
    Base,
    /// `pipefail`: stop a command list at its first failure.
    Pipefail,
}

impl OptionKey {
    /// Every recognized key.
    pub const ALL: [Self; 7] = [
        Self::DirName,
        Self::Pip,
        Self::Preinstall,
        Self::Postinstall,
        Self::SymlinkTo,
        Self::Base,
        Self::Pipefail,
    ];

    /// The key as written in the config file.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::DirName => "dirname",
            Self::Pip => "pip",
            Self::Preinstall => "preinstall",
            Self::Postinstall => "postinstall",
            Self::SymlinkTo => "symlink_to",
            Self::Base => "base",
            Self::Pipefail => "pipefail",
        }
    }

    /// Look up a key by its config file spelling (case-sensitive).
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    #[must_use]
    pub const fn shape(self) -> OptionShape {
        match self {
            Self::DirName | Self::SymlinkTo | Self::Base => OptionShape::Text,
            Self::Preinstall | Self::Postinstall => OptionShape::TextList,
            Self::Pipefail => OptionShape::Flag,
            Self::Pip => OptionShape::Choice(PIP_CHOICES),
        }
    }
}

impl std::fmt::Display for OptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Result of reading a single-string option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    /// Null or blank.
    Absent,
    /// Trimmed, non-empty text.
    Value(String),
    /// A sequence or mapping where a string was expected.
    Malformed,
}

/// Read a single-string option.
///
/// Numbers and bools are accepted as their textual form.
#[must_use]
pub fn parse_text(value: &Value) -> Text {
    match value {
        Value::Null => Text::Absent,
        Value::String(s) => non_blank(s).map_or(Text::Absent, Text::Value),
        Value::Bool(b) => Text::Value(b.to_string()),
        Value::Number(n) => Text::Value(n.to_string()),
        Value::Tagged(tagged) => parse_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => Text::Malformed,
    }
}

/// Read a string-or-list-of-strings option.
///
/// A single string becomes a one-element list. Blank elements are dropped.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidList`] if the value is neither a string nor
/// a sequence, or if any element is not a string.
pub fn parse_text_list(repo: &str, key: OptionKey, value: &Value) -> Result<Vec<String>, ConfigError> {
    let invalid = || ConfigError::InvalidList {
        repo: repo.to_string(),
        key: key.key().to_string(),
        value: describe_value(value),
    };

    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(non_blank(s).into_iter().collect()),
        Value::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                let Value::String(s) = item else {
                    return Err(invalid());
                };
                out.extend(non_blank(s));
            }
            Ok(out)
        }
        _ => Err(invalid()),
    }
}

/// Read a boolean option. Null reads as `false`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBool`] for anything other than a bool or a
/// case-insensitive "true"/"false" string.
pub fn parse_flag(repo: &str, key: OptionKey, value: &Value) -> Result<bool, ConfigError> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            repo: repo.to_string(),
            key: key.key().to_string(),
            value: describe_value(value),
        }),
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
