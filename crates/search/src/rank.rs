//! Fuzzy search: match names against caller text and order by match quality.

use std::borrow::Cow;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use regex::Regex;
use scout_core::FuzzyMatcherKind;
use scout_store::ResourceIter;
use tracing::debug;

use crate::extension::SearchExtension;

/// Text compiled once per request.
pub enum Matcher {
    Pattern(Regex),
    Literal(String),
    Subsequence { matcher: SkimMatcherV2, text: String },
}

impl Matcher {
    /// `Pattern` treats the text as a regular expression and falls back to a
    /// literal match when it does not compile.
    pub fn compile(text: &str, kind: FuzzyMatcherKind) -> Self {
        match kind {
            FuzzyMatcherKind::Pattern => match Regex::new(text) {
                Ok(re) => Matcher::Pattern(re),
                Err(e) => {
                    debug!(error = %e, "search: fuzzy text is not a pattern; matching literally");
                    Matcher::Literal(text.to_string())
                }
            },
            FuzzyMatcherKind::Subsequence => {
                Matcher::Subsequence { matcher: SkimMatcherV2::default(), text: text.to_string() }
            }
        }
    }

    /// Byte offset of the first match in `name`, lower is better.
    pub fn first_match(&self, name: &str) -> Option<usize> {
        match self {
            Matcher::Pattern(re) => re.find(name).map(|m| m.start()),
            Matcher::Literal(text) => name.find(text.as_str()),
            // skim reports char indices.
            Matcher::Subsequence { matcher, text } => {
                let (_score, indices) = matcher.fuzzy_indices(name, text)?;
                let first = *indices.first()?;
                name.char_indices().nth(first).map(|(byte, _)| byte)
            }
        }
    }
}

/// Scan up to `scan_limit` records and return the matching names ordered by
/// match position, then name length, then name. At most `result_limit` names
/// are returned; truncation is set when the iterator had more records than
/// were scanned or when matches exceeded `result_limit`.
pub fn rank(
    mut iter: ResourceIter<'_>,
    matcher: &Matcher,
    scan_limit: usize,
    result_limit: usize,
    ext: &dyn SearchExtension,
) -> (Vec<String>, bool) {
    let mut hits: Vec<(Cow<'_, str>, usize)> = Vec::new();
    for res in iter.by_ref().take(scan_limit) {
        let name = match res.name() {
            Some(name) => Cow::Borrowed(name),
            None => match ext.try_name(res) {
                Some(name) => Cow::Owned(name),
                None => continue,
            },
        };
        if let Some(pos) = matcher.first_match(&name) {
            hits.push((name, pos));
        }
    }
    let more = iter.next().is_some();

    hits.sort_by(|(a, pa), (b, pb)| {
        pa.cmp(pb).then_with(|| a.len().cmp(&b.len())).then_with(|| a.cmp(b))
    });
    let over = hits.len() > result_limit;
    hits.truncate(result_limit);
    (hits.into_iter().map(|(name, _)| name.into_owned()).collect(), more || over)
}
