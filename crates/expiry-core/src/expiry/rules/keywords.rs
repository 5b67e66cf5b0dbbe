//! Expiry keyword vocabulary.

use regex::Regex;

/// Default keywords, in priority order.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "expiry",
    "exp",
    "exp date",
    "expiration",
    "expires on",
    "best before",
    "best by",
    "use by",
    "use before",
    "bb date",
    "bb",
    "ed",
    "exp. date",
];

/// Keywords this short only match as whole words.
pub const SHORT_TOKEN_LEN: usize = 2;

/// A single keyword with its compiled matcher.
#[derive(Debug, Clone)]
pub struct Keyword {
    text: String,
    matcher: Regex,
}

impl Keyword {
    /// Build a keyword. Returns `None` for blank input.
    ///
    /// Keywords match as plain substrings, so `exp` also fires on `expires` and
    /// `exp12/04/2025`. Tokens of [`SHORT_TOKEN_LEN`] characters or fewer must
    /// stand as whole words, otherwise `ed` would fire on `packed`.
    pub fn new(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }

        let escaped = regex::escape(&text);
        let pattern = if text.chars().count() <= SHORT_TOKEN_LEN {
            format!(r"\b{}\b", escaped)
        } else {
            escaped
        };

        // Escaped input always compiles.
        let matcher = Regex::new(&pattern).ok()?;
        Some(Self { text, matcher })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the (lowercased) text contains this keyword.
    pub fn is_in(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

/// Ordered, case-insensitive keyword set.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    /// Build a set from keyword strings, dropping blanks and duplicates.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set: Vec<Keyword> = Vec::new();
        for keyword in keywords.into_iter().filter_map(|k| Keyword::new(k.as_ref())) {
            if !set.iter().any(|k| k.text == keyword.text) {
                set.push(keyword);
            }
        }
        Self { keywords: set }
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    /// Keywords present somewhere in `text`, in set order.
    pub fn present_in<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a Keyword> + 'a {
        self.keywords.iter().filter(move |k| k.is_in(text))
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}
