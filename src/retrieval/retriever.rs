//! The retrieval seam used by the voice session and chat loop.

use crate::error::Result;
use crate::retrieval::record::AnswerRecord;

/// A scored hit: cosine similarity in [-1, 1] plus the matched record.
pub type ScoredHit = (f32, AnswerRecord);

/// Synchronous ranked search over the Q&A corpus.
///
/// Implementations must be deterministic: identical query and index give
/// identical hit order.
pub trait Retriever: Send {
    /// Returns up to `top_k` hits ordered best-first.
    fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredHit>>;
}

/// Picks the winning hit: highest score, with ties broken by position
/// (earliest wins, preserving corpus order).
pub fn best_hit(hits: &[ScoredHit]) -> Option<&ScoredHit> {
    let mut best: Option<&ScoredHit> = None;
    for hit in hits {
        match best {
            Some((best_score, _)) if hit.0 <= *best_score => {}
            _ => best = Some(hit),
        }
    }
    best
}

/// Retriever with a fixed response script, for tests.
pub struct StaticRetriever {
    hits: Vec<ScoredHit>,
    queries: std::sync::Mutex<Vec<String>>,
    should_fail: bool,
}

impl StaticRetriever {
    pub fn new(hits: Vec<ScoredHit>) -> Self {
        Self {
            hits,
            queries: std::sync::Mutex::new(Vec::new()),
            should_fail: false,
        }
    }

    /// A retriever that never finds anything.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Queries received so far, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl Retriever for StaticRetriever {
    fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredHit>> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.should_fail {
            return Err(crate::error::AryaError::IndexParse {
                message: "mock retriever failure".to_string(),
            });
        }
        Ok(self.hits.iter().take(top_k).cloned().collect())
    }
}

impl Retriever for std::sync::Arc<StaticRetriever> {
    fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredHit>> {
        self.as_ref().search(query, top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> AnswerRecord {
        AnswerRecord {
            title: title.to_string(),
            answers: format!("answer for {}", title),
            ..Default::default()
        }
    }

    #[test]
    fn best_hit_picks_first_maximum() {
        let hits = vec![
            (0.82, record("A")),
            (0.91, record("B")),
            (0.91, record("C")),
        ];
        let (score, winner) = best_hit(&hits).unwrap();
        assert_eq!(*score, 0.91);
        assert_eq!(winner.title, "B");
    }

    #[test]
    fn best_hit_of_empty_is_none() {
        assert!(best_hit(&[]).is_none());
    }

    #[test]
    fn best_hit_handles_negative_scores() {
        let hits = vec![(-0.4, record("A")), (-0.1, record("B"))];
        assert_eq!(best_hit(&hits).unwrap().1.title, "B");
    }

    #[test]
    fn static_retriever_records_queries_and_truncates() {
        let retriever = StaticRetriever::new(vec![
            (0.9, record("A")),
            (0.8, record("B")),
            (0.7, record("C")),
        ]);

        let hits = retriever.search("fees", 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].1.title, "A");

        retriever.search("hostel", 5).unwrap();
        assert_eq!(retriever.queries(), vec!["fees", "hostel"]);
        assert_eq!(retriever.call_count(), 2);
    }
}
