// src/store/mod.rs

//! Storage seams for the catalog, the answer history and the score ledger.
//!
//! Stores assign identifiers themselves, inside whatever exclusive section
//! their backend provides, so handlers never compute "max + 1" on their own.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    answer::{AnswerRecord, NewAnswerRecord},
    question::{NewQuestion, Question},
    score::{NewScore, ScoreRecord, ScoreSelector},
};

pub use memory::{MemoryAnswerStore, MemoryQuestionStore, MemoryScoreStore};

/// Failures a store can report. The in-memory stores never fail; the variant
/// exists for durable backends and surfaces as a 500 through `AppError`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Every question, in catalog order.
    async fn all(&self) -> Result<Vec<Question>, StoreError>;

    /// Appends a question with id = current max + 1.
    async fn insert(&self, question: NewQuestion) -> Result<Question, StoreError>;
}

#[async_trait]
pub trait AnswerStore: Send + Sync {
    async fn insert(&self, answer: NewAnswerRecord) -> Result<AnswerRecord, StoreError>;

    /// Records in insertion order, optionally limited to one session.
    async fn query(&self, session_id: Option<&str>) -> Result<Vec<AnswerRecord>, StoreError>;
}

#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Appends a score with id = current max + 1, or 1 when empty.
    async fn insert(&self, score: NewScore) -> Result<ScoreRecord, StoreError>;

    /// Records in insertion order, optionally limited to one session.
    async fn query(&self, session_id: Option<&str>) -> Result<Vec<ScoreRecord>, StoreError>;

    /// Removes every matching record and returns how many went.
    async fn delete(&self, selector: &ScoreSelector) -> Result<usize, StoreError>;
}
