//! Per-comment signal extraction on top of the model traits.
//!
//! Every adapter comes in two forms. `try_*` returns the raw
//! `Result<T, InferenceError>` so callers can tell blank input
//! ([`InferenceError::EmptyInput`]) apart from a backend failure. The plain
//! form logs and degrades to `T::default()`; it never returns an error.

use commentscope_core::{CustomerRequest, PricingSignal, ProductMentions, RequestKind};

use crate::backend::{top_label, EntityRecognizer, TextClassifier, ZeroShotClassifier};
use crate::error::InferenceError;

/// Entity substrings that mark a product mention.
pub const PRODUCT_KEYWORDS: &[&str] = &["scrub", "cream", "serum", "mask", "lotion"];

/// Entity substrings that mark a deal mention.
pub const DEAL_KEYWORDS: &[&str] = &["bogo", "deal", "offer", "discount", "sale", "bundle"];

pub const PRICING_LABEL: &str = "pricing discussion";
pub const NO_PRICING_LABEL: &str = "no pricing discussion";

/// Prompt prepended to every comment before intent classification.
pub const INTENT_PROMPT_PREFIX: &str = "Classify request: ";

/// Entity groups that may carry a product name.
const PRODUCT_GROUPS: &[&str] = &["PRODUCT", "ORG"];

fn require_text(text: &str) -> Result<&str, InferenceError> {
    if text.trim().is_empty() {
        Err(InferenceError::EmptyInput)
    } else {
        Ok(text)
    }
}

/// Log a failed adapter call and fall back to the neutral value.
///
/// Blank input is expected in real comment data and is logged at `warn`;
/// anything else is an adapter malfunction and is logged at `error`.
fn or_neutral<T: Default>(task: &'static str, result: Result<T, InferenceError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) if e.is_no_signal() => {
            tracing::warn!(task, "skipping empty or invalid input");
            T::default()
        }
        Err(e) => {
            tracing::error!(task, error = %e, "inference failed; using neutral default");
            T::default()
        }
    }
}

/// Extract product and deal mentions from entity spans.
///
/// A span is a product when its group is `PRODUCT` or `ORG` and its
/// lowercased text contains a [`PRODUCT_KEYWORDS`] entry; otherwise it is a
/// deal when the text contains a [`DEAL_KEYWORDS`] entry.
///
/// # Errors
///
/// Returns [`InferenceError::EmptyInput`] for blank text, or the recognizer's
/// error.
pub async fn try_extract_products_and_deals(
    recognizer: &dyn EntityRecognizer,
    text: &str,
) -> Result<ProductMentions, InferenceError> {
    let text = require_text(text)?;
    let spans = recognizer.recognize(text).await?;

    let mut mentions = ProductMentions::default();
    for span in spans {
        let word = span.word.to_lowercase();
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| word.contains(k));

        if PRODUCT_GROUPS.contains(&span.entity_group.as_str()) && contains_any(PRODUCT_KEYWORDS) {
            mentions.products.push(word);
        } else if contains_any(DEAL_KEYWORDS) {
            mentions.deals.push(word);
        }
    }
    Ok(mentions)
}

/// Fail-soft form of [`try_extract_products_and_deals`].
pub async fn extract_products_and_deals(
    recognizer: &dyn EntityRecognizer,
    text: &str,
) -> ProductMentions {
    or_neutral(
        "entities",
        try_extract_products_and_deals(recognizer, text).await,
    )
}

/// Signed sentiment in `[-1.0, 1.0]`.
///
/// The top label's score, negated for `NEGATIVE`. Any other top label
/// (`NEUTRAL`, or a model with no scores) gives `0.0`.
///
/// # Errors
///
/// Returns [`InferenceError::EmptyInput`] for blank text, or the classifier's
/// error.
pub async fn try_get_sentiment(
    classifier: &dyn TextClassifier,
    text: &str,
) -> Result<f64, InferenceError> {
    let text = require_text(text)?;
    let scores = classifier.classify(text).await?;

    let score = match top_label(&scores) {
        Some(top) if top.label.eq_ignore_ascii_case("POSITIVE") => f64::from(top.score),
        Some(top) if top.label.eq_ignore_ascii_case("NEGATIVE") => -f64::from(top.score),
        _ => 0.0,
    };
    Ok(score.clamp(-1.0, 1.0))
}

/// Fail-soft form of [`try_get_sentiment`].
pub async fn get_sentiment(classifier: &dyn TextClassifier, text: &str) -> f64 {
    or_neutral("sentiment", try_get_sentiment(classifier, text).await)
}

/// Zero-shot pricing detection.
///
/// Sentiment is only scored when the top label is [`PRICING_LABEL`], and is
/// itself fail-soft: a sentiment failure leaves the pricing flag intact with
/// a `0.0` score.
///
/// # Errors
///
/// Returns [`InferenceError::EmptyInput`] for blank text, or the zero-shot
/// classifier's error.
pub async fn try_extract_pricing_discussion(
    zero_shot: &dyn ZeroShotClassifier,
    sentiment: &dyn TextClassifier,
    text: &str,
) -> Result<PricingSignal, InferenceError> {
    let text = require_text(text)?;
    let scores = zero_shot
        .classify(text, &[PRICING_LABEL, NO_PRICING_LABEL])
        .await?;

    let is_pricing = top_label(&scores).is_some_and(|top| top.label == PRICING_LABEL);
    let sentiment = if is_pricing {
        get_sentiment(sentiment, text).await
    } else {
        0.0
    };
    Ok(PricingSignal {
        is_pricing,
        sentiment,
    })
}

/// Fail-soft form of [`try_extract_pricing_discussion`].
pub async fn extract_pricing_discussion(
    zero_shot: &dyn ZeroShotClassifier,
    sentiment: &dyn TextClassifier,
    text: &str,
) -> PricingSignal {
    or_neutral(
        "pricing",
        try_extract_pricing_discussion(zero_shot, sentiment, text).await,
    )
}

/// Map an intent label to a request kind. `LABEL_0` and anything unknown
/// mean "no request".
fn request_kind_for_label(label: &str) -> Option<RequestKind> {
    match label.to_ascii_lowercase().as_str() {
        "label_1" | "flavor" => Some(RequestKind::Flavor),
        "label_2" | "size" => Some(RequestKind::Size),
        _ => None,
    }
}

/// Zero or one customer request, from the arg-max intent label.
///
/// The request carries the original comment text, not the prompt.
///
/// # Errors
///
/// Returns [`InferenceError::EmptyInput`] for blank text, or the classifier's
/// error.
pub async fn try_extract_requests(
    intent: &dyn TextClassifier,
    text: &str,
) -> Result<Vec<CustomerRequest>, InferenceError> {
    let text = require_text(text)?;
    let prompt = format!("{INTENT_PROMPT_PREFIX}{text}");
    let scores = intent.classify(&prompt).await?;

    Ok(top_label(&scores)
        .and_then(|top| request_kind_for_label(&top.label))
        .map(|kind| {
            vec![CustomerRequest {
                kind,
                text: text.to_string(),
            }]
        })
        .unwrap_or_default())
}

/// Fail-soft form of [`try_extract_requests`].
pub async fn extract_requests(intent: &dyn TextClassifier, text: &str) -> Vec<CustomerRequest> {
    or_neutral("requests", try_extract_requests(intent, text).await)
}
