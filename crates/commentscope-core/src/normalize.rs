//! Comment text normalization: lowercase, strip punctuation, drop stopwords,
//! and lemmatize the remaining tokens.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid punctuation regex"));

/// English stopwords (NLTK list, lowercase, apostrophes removed to match
/// punctuation-stripped tokens).
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "youre", "youve",
    "youll", "youd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "shes", "her", "hers", "herself", "it", "its", "itself", "they", "them", "their",
    "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "thatll", "these",
    "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "dont", "should", "shouldve", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "arent", "couldn", "couldnt", "didn",
    "didnt", "doesn", "doesnt", "hadn", "hadnt", "hasn", "hasnt", "haven", "havent", "isn",
    "isnt", "ma", "mightn", "mightnt", "mustn", "mustnt", "needn", "neednt", "shan", "shant",
    "shouldn", "shouldnt", "wasn", "wasnt", "weren", "werent", "won", "wont", "wouldn",
    "wouldnt",
];

/// Irregular plurals the suffix rules would get wrong.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("leaves", "leaf"),
    ("knives", "knife"),
    ("lives", "life"),
    ("wives", "wife"),
    ("halves", "half"),
    ("cookies", "cookie"),
    ("movies", "movie"),
    ("pies", "pie"),
    ("ties", "tie"),
];

/// Normalizes comment text for sentiment scoring.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stopwords: HashSet<String>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

impl TextNormalizer {
    /// Build a normalizer with the English stopword list plus `extra_stopwords`.
    ///
    /// Extra stopwords are lowercased; use them for tokens that are noise in
    /// a given dataset (the brand handle, for example).
    pub fn new<I, S>(extra_stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stopwords: HashSet<String> =
            ENGLISH_STOPWORDS.iter().map(|w| (*w).to_string()).collect();
        stopwords.extend(
            extra_stopwords
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
        Self { stopwords }
    }

    /// Lowercase, strip punctuation, drop stopwords, and lemmatize.
    ///
    /// Returns an empty string when nothing survives.
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped = NON_WORD.replace_all(&lowered, "");
        stripped
            .split_whitespace()
            .filter(|token| !self.stopwords.contains(*token))
            .map(lemmatize)
            .collect::<Vec<_>>()
            .join(" ")
    }

}

/// Reduce a plural noun to its singular form.
///
/// Rule-based; words of three characters or fewer are returned unchanged.
#[must_use]
pub fn lemmatize(token: &str) -> String {
    if let Some((_, singular)) = IRREGULAR_NOUNS.iter().find(|(plural, _)| *plural == token) {
        return (*singular).to_string();
    }

    if token.chars().count() <= 3 || !token.is_ascii() {
        return token.to_string();
    }

    if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("ies") {
        return format!("{stem}y");
    }

    for suffix in ["sses", "xes", "ches", "shes", "zzes"] {
        if token.ends_with(suffix) {
            return token[..token.len() - 2].to_string();
        }
    }

    token
        .strip_suffix('s')
        .map_or_else(|| token.to_string(), str::to_string)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
