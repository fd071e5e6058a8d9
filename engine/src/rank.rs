use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::store::DocumentVector;

/// Fixed result-list cut: ranking never returns more than this many hits.
pub const TOP_K: usize = 10;

/// One ranked result. `title` is populated only for titled collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub key: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Euclidean norm over a vector's term weights.
pub fn vector_length(weights: &HashMap<String, f64>) -> f64 {
    weights.values().map(|w| w * w).sum::<f64>().sqrt()
}

/// Cosine similarity between a query vector and a document vector: the dot
/// product over overlapping terms divided by the product of the norms. A
/// zero-norm operand on either side compares as 0 rather than erroring.
pub fn cosine_similarity(query: &HashMap<String, f64>, doc: &DocumentVector) -> f64 {
    let query_length = vector_length(query);
    let doc_length = vector_length(&doc.weights);
    if query_length == 0.0 || doc_length == 0.0 {
        return 0.0;
    }
    let mut dot = 0.0;
    for (term, query_weight) in query {
        if let Some(doc_weight) = doc.weights.get(term) {
            dot += query_weight * doc_weight;
        }
    }
    dot / (query_length * doc_length)
}

/// Scores every document against the query vector (linear scan) and keeps
/// the [`TOP_K`] best. Ties break on score descending, then document key
/// ascending, so rankings are reproducible across runs.
pub fn rank(
    docs: &HashMap<String, DocumentVector>,
    query: &HashMap<String, f64>,
    titled: bool,
) -> Vec<SearchHit> {
    let mut scored: Vec<SearchHit> = docs
        .iter()
        .map(|(key, doc)| SearchHit {
            key: key.clone(),
            score: cosine_similarity(query, doc),
            title: if titled { doc.title.clone() } else { None },
        })
        .collect();
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    scored.truncate(TOP_K);
    scored
}
