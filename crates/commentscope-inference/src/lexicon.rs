//! Offline backend: keyword and lexicon stand-ins for each model task.
//!
//! Lets the whole pipeline run without a model server. Scores are coarse but
//! follow the same label/score contracts as the HTTP backend.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::adapters::{
    DEAL_KEYWORDS, INTENT_PROMPT_PREFIX, NO_PRICING_LABEL, PRICING_LABEL, PRODUCT_KEYWORDS,
};
use crate::backend::{
    EntityRecognizer, EntitySpan, Embedder, LabelScore, TextClassifier, ZeroShotClassifier,
};
use crate::error::InferenceError;

/// Comment-domain word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("love", 0.5),
    ("loved", 0.5),
    ("loving", 0.5),
    ("obsessed", 0.6),
    ("amazing", 0.5),
    ("great", 0.4),
    ("good", 0.3),
    ("best", 0.5),
    ("favorite", 0.5),
    ("favourite", 0.5),
    ("perfect", 0.5),
    ("excellent", 0.5),
    ("awesome", 0.5),
    ("beautiful", 0.4),
    ("gorgeous", 0.4),
    ("soft", 0.3),
    ("smooth", 0.3),
    ("yummy", 0.4),
    ("delicious", 0.4),
    ("incredible", 0.5),
    ("need", 0.2),
    ("want", 0.2),
    ("thanks", 0.3),
    ("thank", 0.3),
    ("stars", 0.2),
    ("star", 0.2),
    ("yay", 0.4),
    ("win", 0.4),
    // Negative signals
    ("hate", -0.6),
    ("bad", -0.4),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("worst", -0.6),
    ("disappointed", -0.5),
    ("disappointing", -0.5),
    ("overpriced", -0.5),
    ("expensive", -0.3),
    ("broke", -0.4),
    ("broken", -0.4),
    ("leaked", -0.4),
    ("burn", -0.5),
    ("burned", -0.5),
    ("rash", -0.6),
    ("itchy", -0.5),
    ("sticky", -0.3),
    ("greasy", -0.3),
    ("gross", -0.5),
    ("discontinued", -0.4),
    ("scam", -0.7),
    ("refund", -0.4),
    ("never", -0.2),
];

/// Lowercase and trim non-alphanumeric characters from both ends of a word.
fn clean_token(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Score a text string using the domain lexicon.
///
/// Splits text into lowercase words, sums matching weights, and clamps
/// the result to `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> f32 {
    let mut score = 0.0_f32;
    for word in text.split_whitespace() {
        let w = clean_token(word);
        for &(lex_word, weight) in LEXICON {
            if w == lex_word {
                score += weight;
                break;
            }
        }
    }
    score.clamp(-1.0, 1.0)
}

/// Lexicon sentiment model with `POSITIVE` / `NEGATIVE` / `NEUTRAL` labels.
///
/// The winning label's score is the lexicon magnitude, so the signed
/// sentiment recovered by the adapter equals [`lexicon_score`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconSentiment;

#[async_trait]
impl TextClassifier for LexiconSentiment {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, InferenceError> {
        let score = lexicon_score(text);
        let label = if score > 0.0 {
            "POSITIVE"
        } else if score < 0.0 {
            "NEGATIVE"
        } else {
            "NEUTRAL"
        };
        let magnitude = if score == 0.0 { 1.0 } else { score.abs() };
        Ok(vec![LabelScore {
            label: label.to_string(),
            score: magnitude,
        }])
    }
}

const FLAVOR_CUES: &[&str] = &[
    "flavor", "flavors", "flavour", "flavours", "scent", "scents", "smell", "smells", "fragrance",
];
const SIZE_CUES: &[&str] = &[
    "size", "sizes", "bigger", "larger", "jumbo", "travel", "mini", "minis", "full-size",
    "fullsize", "ounce", "oz",
];
const ASK_CUES: &[&str] = &[
    "please", "pls", "plz", "bring", "need", "want", "wish", "make", "restock", "more", "release",
    "come", "should", "hope", "request",
];

/// Keyword intent model emitting `LABEL_0` (no request), `LABEL_1` (flavor),
/// and `LABEL_2` (size), like the 3-way intent checkpoint it stands in for.
///
/// The `Classify request: ` prompt prefix is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconIntent;

#[async_trait]
impl TextClassifier for LexiconIntent {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, InferenceError> {
        let text = text.strip_prefix(INTENT_PROMPT_PREFIX).unwrap_or(text);
        let tokens: Vec<String> = text.split_whitespace().map(clean_token).collect();
        let has = |cues: &[&str]| tokens.iter().any(|t| cues.contains(&t.as_str()));

        let asking = has(ASK_CUES) || text.contains('?');
        let flavor = asking && has(FLAVOR_CUES);
        let size = asking && has(SIZE_CUES);

        let (none_score, flavor_score, size_score) = match (flavor, size) {
            (true, false) => (0.1, 0.8, 0.1),
            (false, true) => (0.1, 0.1, 0.8),
            (true, true) => (0.1, 0.5, 0.4),
            (false, false) => (0.8, 0.1, 0.1),
        };

        Ok(vec![
            LabelScore {
                label: "LABEL_0".into(),
                score: none_score,
            },
            LabelScore {
                label: "LABEL_1".into(),
                score: flavor_score,
            },
            LabelScore {
                label: "LABEL_2".into(),
                score: size_score,
            },
        ])
    }
}

/// Keyword entity model.
///
/// Tokens starting with a product keyword are tagged `PRODUCT`; tokens starting
/// with a deal keyword are tagged `MISC` (so "scrubs" matches but "ideal" does
/// not). Everything else is ignored.
#[derive(Debug, Clone)]
pub struct KeywordEntities {
    products: Vec<String>,
    deals: Vec<String>,
}

impl Default for KeywordEntities {
    fn default() -> Self {
        Self {
            products: PRODUCT_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            deals: DEAL_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

#[async_trait]
impl EntityRecognizer for KeywordEntities {
    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, InferenceError> {
        let mut spans = Vec::new();
        for word in text.split_whitespace() {
            let token = clean_token(word);
            if token.is_empty() {
                continue;
            }
            let group = if self.products.iter().any(|k| token.starts_with(k.as_str())) {
                "PRODUCT"
            } else if self.deals.iter().any(|k| token.starts_with(k.as_str())) {
                "MISC"
            } else {
                continue;
            };
            spans.push(EntitySpan {
                entity_group: group.to_string(),
                word: token,
                score: 1.0,
            });
        }
        Ok(spans)
    }
}

const PRICING_CUES: &[&str] = &[
    "price", "prices", "pricing", "priced", "cost", "costs", "expensive", "cheap", "cheaper",
    "afford", "affordable", "overpriced", "dollar", "dollars", "pay", "paid", "worth", "money",
    "budget", "$",
];

/// Keyword zero-shot model.
///
/// Each known label has a cue list; a label's score is its share of cue hits.
/// With no hits at all, the fallback label wins outright.
#[derive(Debug, Clone)]
pub struct KeywordZeroShot {
    cues: Vec<(String, Vec<String>)>,
    fallback_label: String,
}

impl Default for KeywordZeroShot {
    fn default() -> Self {
        Self {
            cues: vec![(
                PRICING_LABEL.to_string(),
                PRICING_CUES.iter().map(|c| (*c).to_string()).collect(),
            )],
            fallback_label: NO_PRICING_LABEL.to_string(),
        }
    }
}

impl KeywordZeroShot {
    fn hits(&self, label: &str, tokens: &[String], raw: &str) -> usize {
        self.cues
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0, |(_, cues)| {
                cues.iter()
                    .filter(|cue| {
                        if cue.chars().all(char::is_alphanumeric) {
                            tokens.iter().any(|t| t == *cue)
                        } else {
                            raw.contains(cue.as_str())
                        }
                    })
                    .count()
            })
    }
}

#[async_trait]
impl ZeroShotClassifier for KeywordZeroShot {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<Vec<LabelScore>, InferenceError> {
        let tokens: Vec<String> = text.split_whitespace().map(clean_token).collect();
        let hits: Vec<usize> = candidate_labels
            .iter()
            .map(|label| self.hits(label, &tokens, text))
            .collect();
        let total: usize = hits.iter().sum();

        #[allow(clippy::cast_precision_loss)]
        let mut scores: Vec<LabelScore> = candidate_labels
            .iter()
            .zip(&hits)
            .map(|(label, &h)| {
                let score = if total == 0 {
                    if *label == self.fallback_label {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    h as f32 / total as f32
                };
                LabelScore {
                    label: (*label).to_string(),
                    score,
                }
            })
            .collect();

        scores.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(scores)
    }
}

/// Default embedding width for [`HashingEmbedder`].
pub const HASHING_DIM: usize = 256;

/// Feature-hashing bag-of-words embedder.
///
/// Each token is hashed with SHA-256 into one of `dim` buckets with a ±1
/// sign, then the vector is L2-normalized. Deterministic across runs.
#[derive(Debug, Clone, Copy)]
pub struct HashingEmbedder {
    dim: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self { dim: HASHING_DIM }
    }
}

impl HashingEmbedder {
    /// # Panics
    ///
    /// Panics if `dim` is zero.
    #[must_use]
    pub fn new(dim: usize) -> Self {
        assert!(dim > 0, "embedding dimension must be positive");
        Self { dim }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dim];
        for word in text.split_whitespace() {
            let token = clean_token(word);
            if token.is_empty() {
                continue;
            }
            let hash = Sha256::digest(token.as_bytes());
            let bucket_bytes: [u8; 8] = [
                hash[0], hash[1], hash[2], hash[3], hash[4], hash[5], hash[6], hash[7],
            ];
            #[allow(clippy::cast_possible_truncation)]
            let bucket = (u64::from_be_bytes(bucket_bytes) % self.dim as u64) as usize;
            let sign = if hash[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, InferenceError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

#[cfg(test)]
#[path = "lexicon_test.rs"]
mod tests;
