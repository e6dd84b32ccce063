// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text normalisation and keyword extraction.
//!
//! Every matcher in the workspace (domain keywords, feedback phrases, query
//! patterns) sees text through [`normalize`], so punctuation, casing and
//! apostrophes never change a match.

/// Default cap on extracted keywords.
pub const DEFAULT_MAX_KEYWORDS: usize = 8;

/// Words that carry no legal meaning on their own.
pub const STOPWORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as", "at",
    "be", "been", "before", "being", "but", "by", "can", "could", "did", "do", "does", "doing",
    "for", "from", "get", "getting", "got", "had", "has", "have", "he", "her", "here", "him",
    "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "know", "me", "might",
    "mine", "more", "must", "my", "need", "no", "not", "now", "of", "on", "or", "our", "out",
    "please", "she", "should", "so", "some", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "those", "to", "too", "up", "very", "want", "was", "we",
    "were", "what", "when", "where", "which", "who", "why", "will", "with", "would", "you",
    "your",
];

/// Surface forms folded onto one canonical legal concept.
const CANONICAL: &[(&str, &str)] = &[
    ("security", "deposit"),
    ("deposits", "deposit"),
    ("advance", "deposit"),
    ("return", "return"),
    ("returns", "return"),
    ("returned", "return"),
    ("returning", "return"),
    ("refund", "return"),
    ("refunds", "return"),
    ("refunded", "return"),
    ("back", "return"),
    ("owner", "landlord"),
    ("landlady", "landlord"),
    ("lessor", "landlord"),
    ("renter", "tenant"),
    ("lessee", "tenant"),
    ("tenants", "tenant"),
    ("rented", "rent"),
    ("renting", "rent"),
    ("evicted", "eviction"),
    ("evict", "eviction"),
    ("evicting", "eviction"),
    ("wages", "salary"),
    ("wage", "salary"),
    ("pay", "salary"),
    ("salaries", "salary"),
    ("fired", "termination"),
    ("dismissed", "termination"),
    ("terminated", "termination"),
    ("sacked", "termination"),
    ("employer", "employer"),
    ("boss", "employer"),
    ("company", "employer"),
    ("hacked", "hacking"),
    ("hacker", "hacking"),
    ("hack", "hacking"),
    ("scam", "fraud"),
    ("scammed", "fraud"),
    ("cheated", "fraud"),
    ("fraudulent", "fraud"),
    ("divorced", "divorce"),
    ("husband", "spouse"),
    ("wife", "spouse"),
    ("harassed", "harassment"),
    ("harassing", "harassment"),
    ("defective", "defect"),
    ("faulty", "defect"),
    ("damaged", "defect"),
    ("police", "police"),
    ("fir", "fir"),
    ("arrested", "arrest"),
    ("stolen", "theft"),
    ("stole", "theft"),
    ("robbed", "theft"),
    ("loans", "loan"),
    ("emi", "loan"),
    ("car", "vehicle"),
    ("bike", "vehicle"),
    ("challan", "fine"),
];

/// Lowercase, drop apostrophes, turn any other non-alphanumeric character
/// into a space and collapse runs of whitespace.
pub fn normalize(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\'' || c == '\u{2019}' {
            continue;
        }
        if c.is_alphanumeric() {
            cleaned.extend(c.to_lowercase());
        } else {
            cleaned.push(' ');
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalised words of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Canonical concept for a normalised word (the word itself when unmapped).
pub fn canonical_concept(word: &str) -> &str {
    CANONICAL
        .iter()
        .find(|(form, _)| *form == word)
        .map(|(_, concept)| *concept)
        .unwrap_or(word)
}

/// Meaningful canonical terms of `text` in order, duplicates kept.
///
/// This is the term stream the TF-IDF index counts.
pub fn terms(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.chars().count() > 1 && !is_stopword(t))
        .map(|t| canonical_concept(&t).to_string())
        .collect()
}

/// Up to `max` distinct canonical keywords of `text`, first occurrence first.
pub fn extract_keywords(text: &str, max: usize) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for term in terms(text) {
        if keywords.len() == max {
            break;
        }
        if !keywords.contains(&term) {
            keywords.push(term);
        }
    }
    keywords
}

/// Whether the normalised `phrase` occurs in `padded` on word boundaries.
///
/// `padded` must be normalised text with a single space on each side.
pub(crate) fn contains_phrase(padded: &str, phrase: &str) -> bool {
    padded.contains(&format!(" {phrase} "))
}

/// Normalise and pad `text` for [`contains_phrase`].
pub(crate) fn padded(text: &str) -> String {
    format!(" {} ", normalize(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_apostrophes() {
        assert_eq!(normalize("  Didn't   HELP!!  "), "didnt help");
        assert_eq!(normalize("Landlord's deposit/unpaid?"), "landlords deposit unpaid");
        assert_eq!(normalize("it\u{2019}s fine"), "its fine");
        assert_eq!(normalize("...!?"), "");
    }

    #[test]
    fn keywords_drop_stopwords_and_short_tokens() {
        let kws = extract_keywords("I want to get my salary from a company", 8);
        assert_eq!(kws, ["salary", "employer"]);
    }

    #[test]
    fn keywords_are_canonical_and_deduplicated() {
        let kws = extract_keywords("Security deposit refund: owner kept the deposit", 8);
        assert_eq!(kws, ["deposit", "return", "landlord", "kept"]);
    }

    #[test]
    fn keywords_are_truncated() {
        let kws = extract_keywords(
            "alpha beta gamma delta epsilon zeta theta iota kappa lambda",
            DEFAULT_MAX_KEYWORDS,
        );
        assert_eq!(kws.len(), DEFAULT_MAX_KEYWORDS);
        assert_eq!(kws[0], "alpha");
        assert_eq!(kws[7], "iota");
    }

    #[test]
    fn deposit_phrasings_share_keywords() {
        assert_eq!(
            extract_keywords("landlord not returning deposit", 8),
            ["landlord", "return", "deposit"]
        );
        assert_eq!(
            extract_keywords("landlord refuses to return deposit", 8),
            ["landlord", "refuses", "return", "deposit"]
        );
        assert_eq!(
            extract_keywords("get my deposit back from landlord", 8),
            ["deposit", "return", "landlord"]
        );
    }

    #[test]
    fn phrase_match_respects_word_boundaries() {
        let text = padded("That was a badge of honour");
        assert!(!contains_phrase(&text, "bad"));
        assert!(contains_phrase(&text, "badge"));
        assert!(contains_phrase(&padded("Not helpful."), "not helpful"));
    }

    #[test]
    fn unmapped_words_are_their_own_concept() {
        assert_eq!(canonical_concept("tribunal"), "tribunal");
        assert_eq!(canonical_concept("fired"), "termination");
    }
}
