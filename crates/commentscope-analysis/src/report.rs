//! Markdown report rendering.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use crate::summary::EngagementSummary;

/// Entries shown in each "top" section.
pub const TOP_N: usize = 5;

const RECOMMENDATIONS: &[&str] = &[
    "**Expand Trending Product Lines**: Develop products from high-request clusters (e.g., full-size versions of popular lines).",
    "**Address Pricing Concerns**: Review pricing strategies for mini vs. full-size products based on sentiment analysis.",
    "**Promote Top Products**: Highlight high-sentiment products in campaigns and Stories.",
    "**Extend Deals**: Continue successful promotions like BOGO, tailoring based on comment insights.",
    "**Real-Time Monitoring**: Track emerging trends in comments as they happen.",
];

/// Highest-sentiment entries first; ties keep name order.
fn top_by_sentiment(values: &BTreeMap<String, f64>) -> Vec<(&str, f64)> {
    let mut ranked: Vec<(&str, f64)> = values.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(TOP_N);
    ranked
}

/// Render the summary as a markdown document.
#[must_use]
pub fn render_report(summary: &EngagementSummary, brand: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# @{brand} Instagram Comments Analysis\n");

    out.push_str("## Key Insights\n");
    out.push_str("- **Product Engagement**: Entity extraction surfaces the high-sentiment products driving consumer interest.\n");
    out.push_str("- **Deal Engagement**: Promotions like BOGO show strong positive sentiment, indicating effective marketing.\n");
    out.push_str("- **Customer Requests**: High request volumes for specific products/sizes (e.g., full-size versions) indicate demand for new offerings.\n");
    let _ = writeln!(
        out,
        "- **Pricing Discussions**: {} comments discuss pricing (e.g., mini vs. full-size), with an average sentiment of {:.2}.",
        summary.pricing_count, summary.pricing_sentiment_avg
    );
    out.push_str("- **Product Clusters**: Clustered comments reveal trending product lines with high engagement.\n");

    out.push_str("\n## Top Products by Sentiment\n");
    for (name, sentiment) in top_by_sentiment(&summary.product_sentiment) {
        let _ = writeln!(out, "- {name}: {sentiment:.2}");
    }

    out.push_str("\n## Top Deals by Sentiment\n");
    for (name, sentiment) in top_by_sentiment(&summary.deal_sentiment) {
        let _ = writeln!(out, "- {name}: {sentiment:.2}");
    }

    out.push_str("\n## Customer Requests\n");
    for (kind, count) in &summary.request_counts {
        let _ = writeln!(out, "- {} requests: {count}", kind.capitalized());
        out.push_str("  Examples:\n");
        let examples = summary.request_examples.get(kind).map_or(&[][..], Vec::as_slice);
        for example in examples.iter().take(3) {
            let _ = writeln!(out, "    - {example}");
        }
    }

    out.push_str("\n## Pricing Discussions\n");
    let _ = writeln!(out, "- Total comments: {}", summary.pricing_count);
    let _ = writeln!(out, "- Average sentiment: {:.2}", summary.pricing_sentiment_avg);

    out.push_str("\n## Trending Product Clusters\n");
    for (label, sentiment) in top_by_sentiment(&summary.cluster_sentiment) {
        let requests = summary.cluster_requests.get(label);
        let total: usize = requests.map_or(0, |r| r.values().sum());
        let _ = writeln!(out, "- {label}: Sentiment {sentiment:.2}, Requests: {total}");
        for (kind, count) in requests.into_iter().flatten() {
            let _ = writeln!(out, "  - {} requests: {count}", kind.capitalized());
        }
    }

    out.push_str("\n## Recommendations\n");
    for line in RECOMMENDATIONS {
        let _ = writeln!(out, "- {line}");
    }

    out
}

/// Render the report and write it to `path`, returning the text.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be written.
pub fn write_report(
    path: &Path,
    summary: &EngagementSummary,
    brand: &str,
) -> std::io::Result<String> {
    let report = render_report(summary, brand);
    std::fs::write(path, &report)?;
    tracing::info!(path = %path.display(), "report generated successfully");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use commentscope_core::RequestKind;

    use super::*;

    fn section<'a>(report: &'a str, heading: &str) -> &'a str {
        let start = report.find(heading).expect("heading present") + heading.len();
        let rest = &report[start..];
        rest.find("\n## ").map_or(rest, |end| &rest[..end])
    }

    #[test]
    fn single_product_line_is_formatted_to_two_decimals() {
        let summary = EngagementSummary {
            product_sentiment: [("scrub".to_string(), 0.8)].into(),
            ..EngagementSummary::default()
        };
        let report = render_report(&summary, "treehut");
        assert!(section(&report, "## Top Products by Sentiment").contains("- scrub: 0.80\n"));
        assert!(report.starts_with("# @treehut Instagram Comments Analysis\n\n"));
    }

    #[test]
    fn top_sections_are_sorted_and_capped() {
        let deals: BTreeMap<String, f64> = [
            ("a", 0.1),
            ("b", 0.9),
            ("c", -0.3),
            ("d", 0.5),
            ("e", 0.7),
            ("f", 0.2),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        let summary = EngagementSummary {
            deal_sentiment: deals,
            ..EngagementSummary::default()
        };
        let report = render_report(&summary, "treehut");
        let lines: Vec<&str> = section(&report, "## Top Deals by Sentiment")
            .lines()
            .filter(|l| l.starts_with("- "))
            .collect();
        assert_eq!(
            lines,
            vec!["- b: 0.90", "- e: 0.70", "- d: 0.50", "- f: 0.20", "- a: 0.10"]
        );
    }

    #[test]
    fn requests_and_clusters_render_breakdowns() {
        let summary = EngagementSummary {
            request_counts: [(RequestKind::Flavor, 2)].into(),
            request_examples: [
                (
                    RequestKind::Flavor,
                    vec!["bring back pineapple".to_string(), "more mango".to_string()],
                ),
                (RequestKind::Size, Vec::new()),
                (RequestKind::ProductSpecific, Vec::new()),
            ]
            .into(),
            cluster_sentiment: [("scrub".to_string(), 0.42)].into(),
            cluster_requests: [(
                "scrub".to_string(),
                [(RequestKind::Flavor, 2), (RequestKind::Size, 1)].into(),
            )]
            .into(),
            pricing_count: 3,
            pricing_sentiment_avg: -0.25,
            ..EngagementSummary::default()
        };
        let report = render_report(&summary, "treehut");

        let requests = section(&report, "## Customer Requests");
        assert!(requests.contains(
            "- Flavor requests: 2\n  Examples:\n    - bring back pineapple\n    - more mango\n"
        ));
        assert!(!requests.contains("Size requests"));

        let clusters = section(&report, "## Trending Product Clusters");
        assert!(clusters.contains(
            "- scrub: Sentiment 0.42, Requests: 3\n  - Flavor requests: 2\n  - Size requests: 1\n"
        ));

        let pricing = section(&report, "## Pricing Discussions");
        assert!(pricing.contains("- Total comments: 3\n"));
        assert!(pricing.contains("- Average sentiment: -0.25\n"));
        assert!(report.contains("3 comments discuss pricing"));
    }

    #[test]
    fn empty_summary_still_has_every_section() {
        let report = render_report(&EngagementSummary::default(), "treehut");
        for heading in [
            "## Key Insights",
            "## Top Products by Sentiment",
            "## Top Deals by Sentiment",
            "## Customer Requests",
            "## Pricing Discussions",
            "## Trending Product Clusters",
            "## Recommendations",
        ] {
            assert!(report.contains(heading), "missing {heading}");
        }
        assert_eq!(section(&report, "## Recommendations").matches("\n- ").count(), 5);
        assert!(report.contains("average sentiment of 0.00"));
    }

    #[test]
    fn write_report_persists_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        let text = write_report(&path, &EngagementSummary::default(), "treehut").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
    }

    #[test]
    fn write_report_propagates_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.md");
        assert!(write_report(&path, &EngagementSummary::default(), "treehut").is_err());
    }
}
