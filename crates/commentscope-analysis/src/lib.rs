//! Engagement analysis for commentscope.
//!
//! Enriches loaded comments through a [`CommentSignals`] source, aggregates
//! the results into an [`EngagementSummary`], draws the SVG dashboard, and
//! renders the markdown report.

pub mod aggregate;
pub mod chart;
pub mod engagement;
pub mod error;
pub mod report;
pub mod signals;
pub mod summary;

pub use chart::render_dashboard;
pub use engagement::{analyze_engagement, try_analyze_engagement, AnalysisOptions};
pub use error::AnalysisError;
pub use report::{render_report, write_report};
pub use signals::{CommentSignals, ModelSignals};
pub use summary::{EngagementSummary, WeeklySentiment};
