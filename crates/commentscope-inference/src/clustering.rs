//! Semantic clustering of comments.
//!
//! Comments are embedded, partitioned with seeded k-means (linfa), and each
//! cluster is named after the product its members mention most.

use std::collections::{BTreeMap, HashMap, HashSet};

use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use ndarray::Array2;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

use crate::adapters::extract_products_and_deals;
use crate::backend::ModelClients;
use crate::error::InferenceError;

/// Number of members per cluster sent through entity extraction for labelling.
pub const LABEL_SAMPLE_SIZE: usize = 10;

const MAX_ITERATIONS: u64 = 300;
const TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterParams {
    /// Number of centroids.
    pub k: usize,
    /// RNG seed for centroid initialisation.
    pub seed: u64,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self { k: 5, seed: 42 }
    }
}

/// Cluster labels plus per-row assignments.
///
/// Assignments are `(row, cluster_id)` where `row` indexes the *unfiltered*
/// input slice. Blank rows never appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterOutcome {
    pub labels: BTreeMap<usize, String>,
    pub assignments: Vec<(usize, usize)>,
}

impl ClusterOutcome {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.assignments.is_empty()
    }
}

/// Cluster the non-blank entries of `texts`.
///
/// Returns an empty outcome (and logs a warning) when there are fewer
/// non-blank texts than `params.k`.
///
/// # Errors
///
/// Returns [`InferenceError::Clustering`] if the embeddings are ragged or
/// k-means fails, or the embedder's own error.
pub async fn try_cluster_comments(
    clients: &ModelClients,
    texts: &[&str],
    params: &ClusterParams,
) -> Result<ClusterOutcome, InferenceError> {
    let (rows, valid): (Vec<usize>, Vec<&str>) = texts
        .iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(row, text)| (row, *text))
        .unzip();

    if valid.len() < params.k {
        tracing::warn!(
            valid = valid.len(),
            k = params.k,
            "not enough valid comments for clustering"
        );
        return Ok(ClusterOutcome::default());
    }

    let embeddings = clients.embedder.embed(&valid).await?;
    let records = to_matrix(&embeddings, valid.len())?;

    let rng = Xoshiro256Plus::seed_from_u64(params.seed);
    let model = KMeans::params_with_rng(params.k, rng)
        .max_n_iterations(MAX_ITERATIONS)
        .tolerance(TOLERANCE)
        .fit(&DatasetBase::from(records.clone()))
        .map_err(|e| InferenceError::Clustering(e.to_string()))?;
    let cluster_ids = model.predict(&records);

    let assignments: Vec<(usize, usize)> = rows
        .iter()
        .copied()
        .zip(cluster_ids.iter().copied())
        .collect();

    let mut labels = BTreeMap::new();
    let mut used: HashSet<String> = HashSet::new();
    for cluster_id in 0..params.k {
        let sample: Vec<&str> = valid
            .iter()
            .zip(&assignments)
            .filter(|(_, (_, id))| *id == cluster_id)
            .map(|(text, _)| *text)
            .take(LABEL_SAMPLE_SIZE)
            .collect();

        let mut products = Vec::new();
        for text in sample {
            let mentions = extract_products_and_deals(clients.entities.as_ref(), text).await;
            products.extend(mentions.products);
        }

        let mut label = most_common(&products)
            .map_or_else(|| format!("Cluster {cluster_id}"), str::to_string);
        if used.contains(&label) {
            label = format!("{label} (Cluster {cluster_id})");
        }
        used.insert(label.clone());
        labels.insert(cluster_id, label);
    }

    tracing::info!(
        clusters = params.k,
        comments = assignments.len(),
        "clustering complete"
    );
    Ok(ClusterOutcome {
        labels,
        assignments,
    })
}

/// Fail-soft form of [`try_cluster_comments`]: any error is logged and an
/// empty outcome returned.
pub async fn cluster_comments(
    clients: &ModelClients,
    texts: &[&str],
    params: &ClusterParams,
) -> ClusterOutcome {
    match try_cluster_comments(clients, texts, params).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "error clustering comments");
            ClusterOutcome::default()
        }
    }
}

fn to_matrix(embeddings: &[Vec<f32>], expected: usize) -> Result<Array2<f64>, InferenceError> {
    if embeddings.len() != expected {
        return Err(InferenceError::Clustering(format!(
            "embedder returned {} vectors for {expected} texts",
            embeddings.len()
        )));
    }
    let dim = embeddings.first().map_or(0, Vec::len);
    if dim == 0 {
        return Err(InferenceError::Clustering("embeddings are empty".into()));
    }
    if let Some(bad) = embeddings.iter().find(|v| v.len() != dim) {
        return Err(InferenceError::Clustering(format!(
            "ragged embeddings: expected dimension {dim}, got {}",
            bad.len()
        )));
    }

    let flat: Vec<f64> = embeddings.iter().flatten().map(|&v| f64::from(v)).collect();
    Array2::from_shape_vec((expected, dim), flat)
        .map_err(|e| InferenceError::Clustering(e.to_string()))
}

/// Most frequent item; ties go to the one seen first.
fn most_common(items: &[String]) -> Option<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(item.as_str()).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for item in items {
        let count = counts[item.as_str()];
        match best {
            Some((_, c)) if c >= count => {}
            _ => best = Some((item.as_str(), count)),
        }
    }
    best.map(|(item, _)| item)
}
