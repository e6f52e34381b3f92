use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Kind of customer request detected in a comment.
///
/// Closed set: the intent classifier only ever yields [`RequestKind::Flavor`]
/// or [`RequestKind::Size`]; `ProductSpecific` exists so reports always carry
/// the same three example buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    Flavor,
    Size,
    ProductSpecific,
}

impl RequestKind {
    pub const ALL: [RequestKind; 3] = [
        RequestKind::Flavor,
        RequestKind::Size,
        RequestKind::ProductSpecific,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::Flavor => "flavor",
            RequestKind::Size => "size",
            RequestKind::ProductSpecific => "product-specific",
        }
    }

    /// Display form with the first letter upper-cased (`"Product-specific"`).
    #[must_use]
    pub fn capitalized(self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single customer request: what was asked for and the comment that asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRequest {
    pub kind: RequestKind,
    pub text: String,
}

/// Products and deals mentioned in one comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMentions {
    pub products: Vec<String>,
    pub deals: Vec<String>,
}

/// Result of the pricing-discussion classifier for one comment.
///
/// `sentiment` is only non-zero when `is_pricing` is `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingSignal {
    pub is_pricing: bool,
    pub sentiment: f64,
}

/// One row of the comment dataset plus everything the pipeline derives from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentRecord {
    pub timestamp: NaiveDateTime,
    pub media_id: String,
    pub media_caption: String,
    pub comment_text: String,
    /// Lowercased, punctuation-free, stopword-filtered, lemmatized text.
    pub comment_text_clean: String,
    pub products: Vec<String>,
    pub deals: Vec<String>,
    /// Signed sentiment in `[-1.0, 1.0]`.
    pub sentiment: f64,
    pub requests: Vec<CustomerRequest>,
    pub is_pricing: bool,
    pub pricing_sentiment: f64,
    /// Cluster id; `None` for blank comments or when clustering was skipped.
    pub cluster: Option<usize>,
}

impl CommentRecord {
    /// Create a record with no derived fields populated.
    #[must_use]
    pub fn new(
        timestamp: NaiveDateTime,
        media_id: impl Into<String>,
        media_caption: impl Into<String>,
        comment_text: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            media_id: media_id.into(),
            media_caption: media_caption.into(),
            comment_text: comment_text.into(),
            comment_text_clean: String::new(),
            products: Vec::new(),
            deals: Vec::new(),
            sentiment: 0.0,
            requests: Vec::new(),
            is_pricing: false,
            pricing_sentiment: 0.0,
            cluster: None,
        }
    }

    /// `true` when the comment text is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.comment_text.trim().is_empty()
    }

    pub fn apply_mentions(&mut self, mentions: ProductMentions) {
        self.products = mentions.products;
        self.deals = mentions.deals;
    }

    pub fn apply_pricing(&mut self, pricing: PricingSignal) {
        self.is_pricing = pricing.is_pricing;
        self.pricing_sentiment = if pricing.is_pricing {
            pricing.sentiment
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 5)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    #[test]
    fn request_kind_strings() {
        assert_eq!(RequestKind::Flavor.as_str(), "flavor");
        assert_eq!(RequestKind::Size.to_string(), "size");
        assert_eq!(RequestKind::ProductSpecific.as_str(), "product-specific");
    }

    #[test]
    fn request_kind_capitalized() {
        assert_eq!(RequestKind::Flavor.capitalized(), "Flavor");
        assert_eq!(RequestKind::ProductSpecific.capitalized(), "Product-specific");
    }

    #[test]
    fn blank_detection_ignores_whitespace() {
        assert!(CommentRecord::new(ts(), "1", "", "   \t").is_blank());
        assert!(!CommentRecord::new(ts(), "1", "", " hi ").is_blank());
    }

    #[test]
    fn non_pricing_signal_zeroes_sentiment() {
        let mut record = CommentRecord::new(ts(), "1", "", "text");
        record.apply_pricing(PricingSignal {
            is_pricing: false,
            sentiment: 0.7,
        });
        assert!(!record.is_pricing);
        assert_eq!(record.pricing_sentiment, 0.0);
    }

    #[test]
    fn pricing_signal_keeps_sentiment() {
        let mut record = CommentRecord::new(ts(), "1", "", "text");
        record.apply_pricing(PricingSignal {
            is_pricing: true,
            sentiment: -0.4,
        });
        assert!(record.is_pricing);
        assert_eq!(record.pricing_sentiment, -0.4);
    }
}
