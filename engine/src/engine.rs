use std::collections::HashMap;

use crate::error::EngineError;
use crate::persist::Snapshot;
use crate::rank::{self, SearchHit};
use crate::store::{FrequencyStore, VocabularySkew};
use crate::tokenizer::Tokenizer;

/// Whether document vectors still hold raw counts or finalized tf-idf
/// weights. Weighting is a one-way transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Raw,
    Weighted,
}

/// The retrieval engine: tokenizer configuration, the frequency store, the
/// idf table and the raw/weighted state flag.
///
/// Lifecycle: ingest every document, call [`Engine::compute_weights`] exactly
/// once, then answer queries. A finalized engine is read-only and safe to
/// share across threads.
pub struct Engine {
    tokenizer: Tokenizer,
    store: FrequencyStore,
    idf_dict: HashMap<String, f64>,
    state: IndexState,
    from_json_collection: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Tokenizer::default())
    }
}

impl Engine {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            store: FrequencyStore::new(),
            idf_dict: HashMap::new(),
            state: IndexState::Raw,
            from_json_collection: false,
        }
    }

    pub fn state(&self) -> IndexState {
        self.state
    }

    pub fn is_weighted(&self) -> bool {
        self.state == IndexState::Weighted
    }

    /// True when the corpus carries display titles (JSON-collection mode).
    /// Alters result formatting only, never ranking.
    pub fn is_collection_from_json(&self) -> bool {
        self.from_json_collection
    }

    /// Tokenizes one document and counts it into the store. Rejected once
    /// weights are finalized.
    pub fn ingest_document(
        &mut self,
        key: &str,
        raw_text: &str,
        title: Option<&str>,
    ) -> Result<(), EngineError> {
        if self.state == IndexState::Weighted {
            return Err(EngineError::AlreadyWeighted);
        }
        let terms = self.tokenizer.terms(raw_text)?;
        if title.is_some() {
            self.from_json_collection = true;
        }
        self.store.ingest(key, title.map(str::to_string), terms);
        Ok(())
    }

    /// One-time transition from raw counts to tf-idf weights.
    ///
    /// For each term t, `idf(t) = log2(N / df(t))` where df(t) is the number
    /// of documents containing t, and every stored count for t becomes
    /// `count * idf(t)`. Every stored term occurs in at least one document,
    /// so idf is always finite.
    pub fn compute_weights(&mut self) -> Result<(), EngineError> {
        if self.state == IndexState::Weighted {
            return Err(EngineError::AlreadyWeighted);
        }
        self.store.purge_pseudo_terms();

        let n = self.store.doc_count() as f64;
        let mut df: HashMap<String, u64> = HashMap::new();
        for vector in self.store.doc_dict.values() {
            for term in vector.weights.keys() {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let mut idf_dict = HashMap::with_capacity(df.len());
        for (term, df_t) in df {
            idf_dict.insert(term, (n / df_t as f64).log2());
        }

        for vector in self.store.doc_dict.values_mut() {
            for (term, weight) in vector.weights.iter_mut() {
                if let Some(idf) = idf_dict.get(term) {
                    *weight *= idf;
                }
            }
        }

        self.idf_dict = idf_dict;
        self.state = IndexState::Weighted;
        tracing::info!(
            documents = self.store.doc_count(),
            vocabulary = self.store.vocabulary_size(),
            "computed tf-idf weights"
        );
        Ok(())
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf_dict.get(term).copied()
    }

    /// Turns a query string into a sparse weighted vector.
    ///
    /// Queries always run the stemming pipeline, whatever the corpus-side
    /// setting, and out-of-vocabulary terms are silently dropped. The weight
    /// is `(raw_query_count / corpus_frequency) * idf`: within-query counts
    /// are normalized by the term's global corpus frequency, not by query
    /// length. That normalization is unusual but is part of the established
    /// index semantics and is kept bit-for-bit.
    pub fn vectorize_query(&self, query: &str) -> Result<HashMap<String, f64>, EngineError> {
        if self.state != IndexState::Weighted {
            return Err(EngineError::NotWeighted);
        }
        let tokenizer = Tokenizer::default();
        let mut raw_counts: HashMap<String, u64> = HashMap::new();
        for term in tokenizer.terms(query)? {
            if self.store.corpus_frequency(&term) > 0 {
                *raw_counts.entry(term).or_insert(0) += 1;
            }
        }

        let mut vector = HashMap::with_capacity(raw_counts.len());
        for (term, raw) in raw_counts {
            let corpus = self.store.corpus_frequency(&term) as f64;
            let idf = self.idf_dict.get(&term).copied().unwrap_or(0.0);
            vector.insert(term, (raw as f64 / corpus) * idf);
        }
        Ok(vector)
    }

    /// Answers one query: vectorize, scan every document, return the top 10
    /// by cosine similarity.
    pub fn process_query(&self, query: &str) -> Result<Vec<SearchHit>, EngineError> {
        let query_vector = self.vectorize_query(query)?;
        tracing::debug!(query, terms = query_vector.len(), "ranking query");
        Ok(rank::rank(&self.store.doc_dict, &query_vector, self.from_json_collection))
    }

    /// Batch driver over [`Engine::process_query`], for offline evaluation.
    pub fn process_queries(
        &self,
        queries: &[String],
    ) -> Result<HashMap<String, Vec<SearchHit>>, EngineError> {
        let mut results = HashMap::with_capacity(queries.len());
        for query in queries {
            results.insert(query.clone(), self.process_query(query)?);
        }
        Ok(results)
    }

    // Read-only diagnostics over the index.

    pub fn doc_count(&self) -> usize {
        self.store.doc_count()
    }

    pub fn word_count(&self) -> u64 {
        self.store.word_count()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.store.vocabulary_size()
    }

    pub fn top_n(&self, n: usize) -> Vec<(String, u64)> {
        self.store.top_n(n)
    }

    pub fn fifteen_percent_vocabulary(&self) -> VocabularySkew {
        self.store.fifteen_percent_vocabulary()
    }

    pub fn store(&self) -> &FrequencyStore {
        &self.store
    }

    // Snapshot plumbing.

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            text_dict: self.store.text_dict.clone(),
            doc_dict: self.store.doc_dict.clone(),
            idf_dict: self.idf_dict.clone(),
            is_collection_from_json: self.from_json_collection,
        }
    }

    /// Restores an engine from a snapshot, fully replacing state. Weighting
    /// state is inferred: a non-empty idf table means the snapshot was
    /// finalized.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let state = if snapshot.idf_dict.is_empty() {
            IndexState::Raw
        } else {
            IndexState::Weighted
        };
        Self {
            tokenizer: Tokenizer::default(),
            store: FrequencyStore {
                text_dict: snapshot.text_dict,
                doc_dict: snapshot.doc_dict,
            },
            idf_dict: snapshot.idf_dict,
            state,
            from_json_collection: snapshot.is_collection_from_json,
        }
    }

    pub fn export_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(&self.snapshot()).map_err(EngineError::Serialize)
    }

    pub fn import_json(json: &str) -> Result<Self, EngineError> {
        let snapshot: Snapshot =
            serde_json::from_str(json).map_err(EngineError::Deserialization)?;
        Ok(Self::from_snapshot(snapshot))
    }
}
