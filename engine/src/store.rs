use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sparse per-document term vector. Values hold raw occurrence counts until
/// the weighting pass rewrites them in place into tf-idf weights.
///
/// The display title serializes inline with the terms under the reserved
/// `TITLE_NAME` key, which is how the snapshot layout carries it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentVector {
    #[serde(rename = "TITLE_NAME", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub weights: HashMap<String, f64>,
}

/// Vocabulary-skew report: the minimum number of distinct terms whose
/// cumulative count reaches 15% of all term occurrences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VocabularySkew {
    pub distinct_terms: usize,
    pub covered_count: u64,
    pub threshold: f64,
}

/// Corpus-wide and per-document term counts, accumulated during ingestion.
#[derive(Debug, Default)]
pub struct FrequencyStore {
    /// Corpus Frequency Table: term to total occurrences across all documents.
    pub(crate) text_dict: HashMap<String, u64>,
    /// Per-document vectors keyed by document key (filename or URL).
    pub(crate) doc_dict: HashMap<String, DocumentVector>,
}

impl FrequencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one document's terms into the store. Re-ingesting a key
    /// replaces the document: its previous counts are retracted from the
    /// corpus table first, so nothing is counted twice.
    pub fn ingest<I>(&mut self, key: &str, title: Option<String>, terms: I)
    where
        I: IntoIterator<Item = String>,
    {
        if let Some(old) = self.doc_dict.remove(key) {
            self.retract(&old);
        }
        let mut vector = DocumentVector { title, weights: HashMap::new() };
        for term in terms {
            *self.text_dict.entry(term.clone()).or_insert(0) += 1;
            *vector.weights.entry(term).or_insert(0.0) += 1.0;
        }
        self.doc_dict.insert(key.to_string(), vector);
    }

    fn retract(&mut self, vector: &DocumentVector) {
        for (term, count) in &vector.weights {
            let emptied = match self.text_dict.get_mut(term) {
                Some(total) => {
                    *total = total.saturating_sub(*count as u64);
                    *total == 0
                }
                None => false,
            };
            if emptied {
                self.text_dict.remove(term);
            }
        }
    }

    /// Drops the empty-string and lone-space pseudo-terms everywhere. Runs
    /// after ingestion completes; upstream tokenization already discards
    /// these, so this is a guard against polluted input.
    pub fn purge_pseudo_terms(&mut self) {
        for pseudo in ["", " "] {
            self.text_dict.remove(pseudo);
            for vector in self.doc_dict.values_mut() {
                vector.weights.remove(pseudo);
            }
        }
    }

    pub fn corpus_frequency(&self, term: &str) -> u64 {
        self.text_dict.get(term).copied().unwrap_or(0)
    }

    pub fn doc_count(&self) -> usize {
        self.doc_dict.len()
    }

    pub fn document(&self, key: &str) -> Option<&DocumentVector> {
        self.doc_dict.get(key)
    }

    /// Total token count across the corpus.
    pub fn word_count(&self) -> u64 {
        self.text_dict.values().sum()
    }

    /// Number of distinct terms.
    pub fn vocabulary_size(&self) -> usize {
        self.text_dict.len()
    }

    /// The `n` most frequent terms, count descending, ties on the term
    /// ascending so output is reproducible.
    pub fn top_n(&self, n: usize) -> Vec<(String, u64)> {
        let mut terms: Vec<(String, u64)> = self
            .text_dict
            .iter()
            .map(|(term, count)| (term.clone(), *count))
            .collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        terms.truncate(n);
        terms
    }

    /// Accumulates terms by descending count until the running total reaches
    /// 15% of all occurrences. Characterizes vocabulary skew only; has no
    /// effect on ranking.
    pub fn fifteen_percent_vocabulary(&self) -> VocabularySkew {
        let threshold = self.word_count() as f64 * 0.15;
        let mut distinct_terms = 0;
        let mut covered_count = 0u64;
        for (_, count) in self.top_n(self.text_dict.len()) {
            if covered_count as f64 >= threshold {
                break;
            }
            distinct_terms += 1;
            covered_count += count;
        }
        VocabularySkew { distinct_terms, covered_count, threshold }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn accumulates_corpus_and_document_counts() {
        let mut store = FrequencyStore::new();
        store.ingest("a.txt", None, terms(&["cat", "cat", "dog"]));
        store.ingest("b.txt", None, terms(&["cat"]));

        assert_eq!(store.corpus_frequency("cat"), 3);
        assert_eq!(store.corpus_frequency("dog"), 1);
        assert_eq!(store.doc_count(), 2);
        assert_eq!(store.document("a.txt").unwrap().weights["cat"], 2.0);
        assert_eq!(store.word_count(), 4);
        assert_eq!(store.vocabulary_size(), 2);
    }

    #[test]
    fn reingesting_a_key_replaces_the_document() {
        let mut store = FrequencyStore::new();
        store.ingest("a.txt", None, terms(&["cat", "cat", "dog"]));
        store.ingest("a.txt", None, terms(&["bird"]));

        assert_eq!(store.doc_count(), 1);
        assert_eq!(store.corpus_frequency("cat"), 0);
        assert_eq!(store.corpus_frequency("dog"), 0);
        assert_eq!(store.corpus_frequency("bird"), 1);
        assert!(store.document("a.txt").unwrap().weights.get("cat").is_none());
    }

    #[test]
    fn purges_pseudo_terms() {
        let mut store = FrequencyStore::new();
        store.ingest("a.txt", None, terms(&["cat", "", " "]));
        store.purge_pseudo_terms();

        assert_eq!(store.corpus_frequency(""), 0);
        assert_eq!(store.corpus_frequency(" "), 0);
        assert_eq!(store.vocabulary_size(), 1);
        assert_eq!(store.document("a.txt").unwrap().weights.len(), 1);
    }

    #[test]
    fn top_n_is_descending_by_count() {
        let mut store = FrequencyStore::new();
        store.ingest("a.txt", None, terms(&["cat", "cat", "cat", "cat", "cat", "dog", "dog", "dog"]));
        assert_eq!(store.top_n(2), vec![("cat".to_string(), 5), ("dog".to_string(), 3)]);
    }

    #[test]
    fn fifteen_percent_vocabulary_reports_the_skew() {
        let mut store = FrequencyStore::new();
        // 100 tokens total, threshold 15.0. "a" alone covers 10, adding "b"
        // reaches 18 and crosses the threshold.
        let mut words: Vec<String> = Vec::new();
        words.extend(std::iter::repeat("a".to_string()).take(10));
        words.extend(std::iter::repeat("b".to_string()).take(8));
        for i in 0..82 {
            words.push(format!("w{i}"));
        }
        store.ingest("a.txt", None, words);

        let skew = store.fifteen_percent_vocabulary();
        assert_eq!(skew.distinct_terms, 2);
        assert_eq!(skew.covered_count, 18);
        assert!((skew.threshold - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn title_serializes_under_the_reserved_key() {
        let mut vector = DocumentVector { title: Some("A Title".into()), weights: HashMap::new() };
        vector.weights.insert("cat".into(), 2.0);

        let json = serde_json::to_value(&vector).unwrap();
        assert_eq!(json["TITLE_NAME"], "A Title");
        assert_eq!(json["cat"], 2.0);

        let back: DocumentVector = serde_json::from_value(json).unwrap();
        assert_eq!(back, vector);
    }
}
