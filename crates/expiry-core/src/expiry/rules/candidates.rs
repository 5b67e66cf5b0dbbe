//! Candidate extraction: find date-like substrings in OCR text.

use tracing::{debug, trace};

use crate::models::expiry::ExtractionPass;

use super::keywords::KeywordSet;
use super::patterns::DATE_PATTERNS;
use super::PatternSpec;

/// A date-like substring and where it was found.
#[derive(Debug, Clone)]
pub struct Candidate<'p> {
    /// Matched substring (lowercased).
    pub text: String,
    /// Pattern that matched.
    pub pattern: &'p PatternSpec,
    /// Pass that produced this candidate.
    pub pass: ExtractionPass,
    /// Zero-based line index in the source text.
    pub line: usize,
    /// Byte span of `text`: within the line for keyword candidates, within the whole text otherwise.
    pub span: (usize, usize),
}

impl Candidate<'_> {
    fn contains(&self, line: usize, span: (usize, usize)) -> bool {
        self.line == line && self.span.0 <= span.0 && span.1 <= self.span.1
    }
}

/// Scans OCR text for date candidates, keyword lines first.
#[derive(Debug, Clone)]
pub struct CandidateExtractor<'p> {
    patterns: &'p [PatternSpec],
    keywords: KeywordSet,
}

impl CandidateExtractor<'static> {
    /// Extractor over the built-in patterns and default keywords.
    pub fn new() -> Self {
        Self::with_patterns(DATE_PATTERNS.as_slice(), KeywordSet::default())
    }
}

impl Default for CandidateExtractor<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> CandidateExtractor<'p> {
    /// Extractor over a custom pattern table.
    pub fn with_patterns(patterns: &'p [PatternSpec], keywords: KeywordSet) -> Self {
        Self { patterns, keywords }
    }

    /// Replace the keyword set.
    pub fn with_keywords(mut self, keywords: KeywordSet) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Keyword-pass candidates if there are any, fallback candidates otherwise.
    pub fn extract(&self, text: &str) -> Vec<Candidate<'p>> {
        let keyword = self.keyword_candidates(text);
        if !keyword.is_empty() {
            return keyword;
        }
        self.fallback_candidates(text)
    }

    /// Candidates on lines carrying an expiry keyword.
    ///
    /// Ordered by keyword, then line. Each line contributes one candidate: the
    /// first match of the highest-priority pattern that matches it.
    pub fn keyword_candidates(&self, text: &str) -> Vec<Candidate<'p>> {
        let normalized = normalize(text);
        if normalized.trim().is_empty() {
            return Vec::new();
        }

        let lines: Vec<&str> = normalized.lines().collect();
        let mut candidates: Vec<Candidate<'p>> = Vec::new();

        for keyword in self.keywords.present_in(&normalized) {
            for (idx, line) in lines.iter().enumerate() {
                if !keyword.is_in(line) {
                    continue;
                }

                trace!("Keyword {:?} on line {}: {:?}", keyword.as_str(), idx, line);

                // The first pattern to match claims the line.
                let Some((pattern, m)) = self
                    .patterns
                    .iter()
                    .find_map(|p| p.find_in(line).map(|m| (p, m)))
                else {
                    continue;
                };
                let span = (m.start(), m.end());

                // Already taken through an earlier keyword.
                if candidates.iter().any(|c| c.contains(idx, span)) {
                    continue;
                }

                candidates.push(Candidate {
                    text: m.as_str().to_string(),
                    pattern,
                    pass: ExtractionPass::Keyword,
                    line: idx,
                    span,
                });
            }
        }

        debug!("Keyword pass found {} candidates", candidates.len());
        candidates
    }

    /// Every match of every whole-text pattern, in pattern priority order.
    pub fn fallback_candidates(&self, text: &str) -> Vec<Candidate<'p>> {
        let normalized = normalize(text);
        if normalized.trim().is_empty() {
            return Vec::new();
        }

        let mut candidates: Vec<Candidate<'p>> = Vec::new();

        for pattern in self.patterns.iter().filter(|p| !p.keyword_only) {
            for m in pattern.find_all_in(&normalized) {
                let span = (m.start(), m.end());
                let line = normalized[..span.0].matches('\n').count();

                if candidates.iter().any(|c| c.contains(line, span)) {
                    continue;
                }

                candidates.push(Candidate {
                    text: m.as_str().to_string(),
                    pattern,
                    pass: ExtractionPass::Fallback,
                    line,
                    span,
                });
            }
        }

        debug!("Fallback pass found {} candidates", candidates.len());
        candidates
    }
}

/// Lowercase the text and unify line endings.
pub fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").to_lowercase()
}
