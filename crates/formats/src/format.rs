use serde::{Deserialize, Serialize};

/// Characters a codeword may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodewordClass {
    /// Upper-case letters only (`a` in the standard's notation).
    Upper,
    /// Upper-case letters or digits (`c`).
    UpperOrDigit,
    /// Digits only (`n`).
    Digit,
}

impl CodewordClass {
    /// Whether a single character belongs to this class.
    pub fn accepts(self, c: char) -> bool {
        match self {
            CodewordClass::Upper => c.is_uppercase(),
            CodewordClass::UpperOrDigit => c.is_uppercase() || c.is_ascii_digit(),
            CodewordClass::Digit => c.is_ascii_digit(),
        }
    }
}

/// Character class and length limit for codewords of one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodewordRule {
    /// Maximum length in characters; `None` means unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_len: Option<usize>,
    /// Allowed characters.
    pub class: CodewordClass,
}

impl CodewordRule {
    /// Codewords of at most `max_len` characters.
    pub const fn bounded(max_len: usize, class: CodewordClass) -> Self {
        Self {
            max_len: Some(max_len),
            class,
        }
    }

    /// Codewords of any length.
    pub const fn unbounded(class: CodewordClass) -> Self {
        Self {
            max_len: None,
            class,
        }
    }
}

/// How text following a codeword line is continued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continuation {
    /// Only lines starting with `//` continue the open item.
    DoubleSlash,
    /// Any line that does not open a new codeword continues the open item.
    AnyText,
}

/// Parameters of a line-anchored narrative format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFormat {
    /// Codeword validation rule.
    pub codeword: CodewordRule,
    /// A country code may follow the codeword (`/CODE/CC//text`).
    pub supports_country: bool,
    /// A currency and amount may follow the codeword (`/CODE/CCY123,45text`).
    pub supports_currency: bool,
    /// Text may carry a supplement after a `/` (`/CODE/text/supplement`).
    pub supports_supplement: bool,
    /// Continuation-line convention.
    pub continuation: Continuation,
}

impl LineFormat {
    const fn plain(codeword: CodewordRule) -> Self {
        Self {
            codeword,
            supports_country: false,
            supports_currency: false,
            supports_supplement: false,
            continuation: Continuation::DoubleSlash,
        }
    }
}

/// The eight narrative formats.
///
/// Layouts use the standard's notation: `8a` is up to eight upper-case
/// letters, `8c` up to eight upper-case letters or digits, `2n` up to two
/// digits, `3!a13d` a currency code followed by an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeFormat {
    /// `/8a/[text]` lines, `//` continuation.
    Format1,
    /// `/8c/[text]` lines, `//` continuation.
    Format2,
    /// `/8c/[3!a13d][text]` lines, `//` continuation.
    Format3,
    /// `/8c/[text]` or `/8c/2!a[//text]` with a country code, `//` continuation.
    Format4,
    /// `/2n/[supplement 1][/supplement 2]` lines, `//` continuation of the supplement.
    Format5,
    /// `/6c/[text]` lines; any line not starting with a slash continues.
    Format6,
    /// Codeword of any length between slashes at line start, `//` continuation.
    Format7,
    /// Free format: `/CODE/` tokens anywhere in the text, not anchored to lines.
    Format8,
}

impl NarrativeFormat {
    /// All formats in declaration order.
    pub const ALL: [NarrativeFormat; 8] = [
        NarrativeFormat::Format1,
        NarrativeFormat::Format2,
        NarrativeFormat::Format3,
        NarrativeFormat::Format4,
        NarrativeFormat::Format5,
        NarrativeFormat::Format6,
        NarrativeFormat::Format7,
        NarrativeFormat::Format8,
    ];

    /// Line-format parameters, or `None` for the free format.
    pub const fn line_format(self) -> Option<LineFormat> {
        use CodewordClass::{Digit, Upper, UpperOrDigit};
        let format = match self {
            NarrativeFormat::Format1 => LineFormat::plain(CodewordRule::bounded(8, Upper)),
            NarrativeFormat::Format2 => LineFormat::plain(CodewordRule::bounded(8, UpperOrDigit)),
            NarrativeFormat::Format3 => LineFormat {
                supports_currency: true,
                ..LineFormat::plain(CodewordRule::bounded(8, UpperOrDigit))
            },
            NarrativeFormat::Format4 => LineFormat {
                supports_country: true,
                ..LineFormat::plain(CodewordRule::bounded(8, UpperOrDigit))
            },
            NarrativeFormat::Format5 => LineFormat {
                supports_supplement: true,
                ..LineFormat::plain(CodewordRule::bounded(2, Digit))
            },
            NarrativeFormat::Format6 => LineFormat {
                continuation: Continuation::AnyText,
                ..LineFormat::plain(CodewordRule::bounded(6, UpperOrDigit))
            },
            NarrativeFormat::Format7 => LineFormat::plain(CodewordRule::unbounded(Upper)),
            NarrativeFormat::Format8 => return None,
        };
        Some(format)
    }

    /// True for the free format.
    pub const fn is_free_format(self) -> bool {
        matches!(self, NarrativeFormat::Format8)
    }

    /// Configuration name (`"format1"` ... `"format8"`).
    pub const fn name(self) -> &'static str {
        match self {
            NarrativeFormat::Format1 => "format1",
            NarrativeFormat::Format2 => "format2",
            NarrativeFormat::Format3 => "format3",
            NarrativeFormat::Format4 => "format4",
            NarrativeFormat::Format5 => "format5",
            NarrativeFormat::Format6 => "format6",
            NarrativeFormat::Format7 => "format7",
            NarrativeFormat::Format8 => "format8",
        }
    }

    /// Inverse of [`NarrativeFormat::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl std::fmt::Display for NarrativeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
