//! On-disk corpus index and the embedding used to search it.
//!
//! The offline build writes one JSON record per line to
//! `metadata.jsonl`. At load time each record's context text is embedded
//! into a fixed-dimension unit vector via hashed bag-of-words (FNV-1a
//! token hashing), and queries are embedded the same way, so similarity
//! is a plain dot product. Scores land in [-1, 1] like any cosine.

use crate::error::{AryaError, Result};
use crate::retrieval::record::AnswerRecord;
use crate::retrieval::retriever::{Retriever, ScoredHit};
use crate::text::normalize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Dimension of the hashed bag-of-words embedding.
const EMBEDDING_DIM: usize = 256;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(token: &str) -> u64 {
    let mut hash = FNV_OFFSET;
    for byte in token.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Embeds text as a unit-normalized hashed bag-of-words vector.
///
/// Empty or non-tokenizable text embeds to the zero vector, which scores
/// 0.0 against everything.
pub fn embed(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; EMBEDDING_DIM];
    for token in normalize(text).split_whitespace() {
        let bucket = (fnv1a(token) % EMBEDDING_DIM as u64) as usize;
        vector[bucket] += 1.0;
    }

    let magnitude = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for v in &mut vector {
            *v /= magnitude;
        }
    }
    vector
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// In-memory search index over the Q&A corpus.
pub struct CorpusIndex {
    records: Vec<AnswerRecord>,
    vectors: Vec<Vec<f32>>,
}

impl CorpusIndex {
    /// Loads `metadata.jsonl` from the index directory and embeds every
    /// record's context text.
    pub fn load(index_dir: &Path) -> Result<Self> {
        let path = index_dir.join("metadata.jsonl");
        if !path.exists() {
            return Err(AryaError::IndexNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(&path)?;
        let mut records = Vec::new();
        let mut vectors = Vec::new();

        for (line_number, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: AnswerRecord =
                serde_json::from_str(&line).map_err(|e| AryaError::IndexParse {
                    message: format!("metadata.jsonl line {}: {}", line_number + 1, e),
                })?;
            vectors.push(embed(&record.context()));
            records.push(record);
        }

        Ok(Self { records, vectors })
    }

    /// Builds an index directly from records, for tests and embedded use.
    pub fn from_records(records: Vec<AnswerRecord>) -> Self {
        let vectors = records.iter().map(|r| embed(&r.context())).collect();
        Self { records, vectors }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Retriever for CorpusIndex {
    fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredHit>> {
        let query_vec = embed(query);

        let mut scored: Vec<(f32, usize)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, vector)| (dot(&query_vec, vector), index))
            .collect();

        // Stable sort keeps corpus order on score ties
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(score, index)| (score, self.records[index].clone()))
            .collect())
    }
}
