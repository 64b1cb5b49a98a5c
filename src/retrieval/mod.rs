//! Corpus retrieval: records, the retriever seam, and the hashed
//! bag-of-words index.

pub mod index;
pub mod record;
pub mod retriever;

pub use index::CorpusIndex;
pub use record::AnswerRecord;
pub use retriever::{Retriever, ScoredHit, StaticRetriever, best_hit};
