use super::*;

// -----------------------------------------------------------------------
// lexicon_score
// -----------------------------------------------------------------------

#[test]
fn empty_string_returns_zero() {
    assert_eq!(lexicon_score(""), 0.0);
}

#[test]
fn unknown_text_returns_zero() {
    assert_eq!(lexicon_score("the quick brown fox"), 0.0);
}

#[test]
fn positive_keyword_returns_positive() {
    let score = lexicon_score("love this scrub");
    assert!(score > 0.0, "expected positive score, got {score}");
}

#[test]
fn negative_keyword_returns_negative() {
    let score = lexicon_score("the lid broke and it leaked");
    assert!(score < 0.0, "expected negative score, got {score}");
}

#[test]
fn score_clamps_to_positive_one() {
    let score = lexicon_score("love obsessed amazing best favorite perfect");
    assert_eq!(score, 1.0, "expected score clamped to 1.0, got {score}");
}

#[test]
fn punctuation_stripped_from_words() {
    let score = lexicon_score("Obsessed!!!");
    assert!(score > 0.0, "expected positive score for 'Obsessed!!!', got {score}");
}

// -----------------------------------------------------------------------
// LexiconSentiment
// -----------------------------------------------------------------------

#[tokio::test]
async fn sentiment_positive_label_carries_magnitude() {
    let scores = LexiconSentiment.classify("love it").await.unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].label, "POSITIVE");
    assert!((scores[0].score - 0.5).abs() < 1e-6);
}

#[tokio::test]
async fn sentiment_negative_label() {
    let scores = LexiconSentiment.classify("worst purchase").await.unwrap();
    assert_eq!(scores[0].label, "NEGATIVE");
    assert!(scores[0].score > 0.0);
}

#[tokio::test]
async fn sentiment_neutral_when_no_lexicon_hits() {
    let scores = LexiconSentiment.classify("just arrived today").await.unwrap();
    assert_eq!(scores[0].label, "NEUTRAL");
}

// -----------------------------------------------------------------------
// LexiconIntent
// -----------------------------------------------------------------------

fn argmax(scores: &[LabelScore]) -> &str {
    crate::backend::top_label(scores).map_or("", |l| l.label.as_str())
}

#[tokio::test]
async fn intent_flavor_request() {
    let scores = LexiconIntent
        .classify("Classify request: please bring back the pineapple scent")
        .await
        .unwrap();
    assert_eq!(argmax(&scores), "LABEL_1");
}

#[tokio::test]
async fn intent_size_request() {
    let scores = LexiconIntent
        .classify("Classify request: can you make a travel size?")
        .await
        .unwrap();
    assert_eq!(argmax(&scores), "LABEL_2");
}

#[tokio::test]
async fn intent_mention_without_ask_is_no_request() {
    let scores = LexiconIntent
        .classify("Classify request: this scent is lovely")
        .await
        .unwrap();
    assert_eq!(argmax(&scores), "LABEL_0");
}

// -----------------------------------------------------------------------
// KeywordEntities
// -----------------------------------------------------------------------

#[tokio::test]
async fn entities_tag_products_and_deals() {
    let spans = KeywordEntities::default()
        .recognize("BOGO on the Scrubs and lotion, great deal")
        .await
        .unwrap();
    let tagged: Vec<(&str, &str)> = spans
        .iter()
        .map(|s| (s.entity_group.as_str(), s.word.as_str()))
        .collect();
    assert_eq!(
        tagged,
        vec![
            ("MISC", "bogo"),
            ("PRODUCT", "scrubs"),
            ("PRODUCT", "lotion"),
            ("MISC", "deal"),
        ]
    );
}

#[tokio::test]
async fn entities_ignore_embedded_keywords() {
    let spans = KeywordEntities::default()
        .recognize("an ideal gift")
        .await
        .unwrap();
    assert!(spans.is_empty(), "got {spans:?}");
}

// -----------------------------------------------------------------------
// KeywordZeroShot
// -----------------------------------------------------------------------

#[tokio::test]
async fn zero_shot_pricing_cue_wins() {
    let scores = KeywordZeroShot::default()
        .classify("is the mini worth the price?", &[PRICING_LABEL, NO_PRICING_LABEL])
        .await
        .unwrap();
    assert_eq!(scores[0].label, PRICING_LABEL);
    assert_eq!(scores.len(), 2);
}

#[tokio::test]
async fn zero_shot_dollar_sign_counts_as_pricing() {
    let scores = KeywordZeroShot::default()
        .classify("$20 for this??", &[PRICING_LABEL, NO_PRICING_LABEL])
        .await
        .unwrap();
    assert_eq!(scores[0].label, PRICING_LABEL);
}

#[tokio::test]
async fn zero_shot_no_cues_falls_back() {
    let scores = KeywordZeroShot::default()
        .classify("smells like summer", &[PRICING_LABEL, NO_PRICING_LABEL])
        .await
        .unwrap();
    assert_eq!(scores[0].label, NO_PRICING_LABEL);
    assert_eq!(scores[0].score, 1.0);
}

// -----------------------------------------------------------------------
// HashingEmbedder
// -----------------------------------------------------------------------

#[tokio::test]
async fn embedder_is_deterministic_and_normalized() {
    let embedder = HashingEmbedder::default();
    let first = embedder.embed(&["love this scrub"]).await.unwrap();
    let second = embedder.embed(&["love this scrub"]).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first[0].len(), HASHING_DIM);
    let norm: f32 = first[0].iter().map(|v| v * v).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
}

#[tokio::test]
async fn embedder_blank_text_is_zero_vector() {
    let vectors = HashingEmbedder::new(8).embed(&["  "]).await.unwrap();
    assert_eq!(vectors[0], vec![0.0; 8]);
}

#[tokio::test]
async fn embedder_preserves_input_order() {
    let embedder = HashingEmbedder::new(64);
    let batch = embedder.embed(&["scrub", "bogo"]).await.unwrap();
    let scrub = embedder.embed(&["scrub"]).await.unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0], scrub[0]);
}
