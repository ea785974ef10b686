// src/store/memory.rs

//! Process-local stores. Contents vanish on restart.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AnswerStore, QuestionStore, ScoreStore, StoreError};
use crate::models::{
    answer::{AnswerRecord, NewAnswerRecord},
    question::{NewQuestion, Question},
    score::{NewScore, ScoreRecord, ScoreSelector},
};

#[derive(Debug, Default)]
pub struct MemoryQuestionStore {
    questions: RwLock<Vec<Question>>,
}

impl MemoryQuestionStore {
    /// Builds a catalog with ids 1..=n in the given order.
    pub fn with_questions(drafts: Vec<NewQuestion>) -> Self {
        let questions = drafts
            .into_iter()
            .enumerate()
            .map(|(i, q)| q.with_id(i as i64 + 1))
            .collect();
        Self {
            questions: RwLock::new(questions),
        }
    }
}

#[async_trait]
impl QuestionStore for MemoryQuestionStore {
    async fn all(&self) -> Result<Vec<Question>, StoreError> {
        Ok(self.questions.read().await.clone())
    }

    async fn insert(&self, question: NewQuestion) -> Result<Question, StoreError> {
        let mut questions = self.questions.write().await;
        let id = questions.iter().map(|q| q.id).max().unwrap_or(0) + 1;
        let question = question.with_id(id);
        questions.push(question.clone());
        tracing::debug!("Catalog now holds {} questions", questions.len());
        Ok(question)
    }
}

#[derive(Debug, Default)]
pub struct MemoryAnswerStore {
    inner: RwLock<AnswerLog>,
}

#[derive(Debug, Default)]
struct AnswerLog {
    next_id: i64,
    records: Vec<AnswerRecord>,
}

#[async_trait]
impl AnswerStore for MemoryAnswerStore {
    async fn insert(&self, answer: NewAnswerRecord) -> Result<AnswerRecord, StoreError> {
        let mut log = self.inner.write().await;
        log.next_id += 1;
        let record = answer.with_id(log.next_id);
        log.records.push(record.clone());
        Ok(record)
    }

    async fn query(&self, session_id: Option<&str>) -> Result<Vec<AnswerRecord>, StoreError> {
        let log = self.inner.read().await;
        Ok(log
            .records
            .iter()
            .filter(|r| session_id.is_none_or(|s| r.session_id == s))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    scores: RwLock<Vec<ScoreRecord>>,
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn insert(&self, score: NewScore) -> Result<ScoreRecord, StoreError> {
        let mut scores = self.scores.write().await;
        let id = scores.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let record = score.with_id(id);
        scores.push(record.clone());
        Ok(record)
    }

    async fn query(&self, session_id: Option<&str>) -> Result<Vec<ScoreRecord>, StoreError> {
        let scores = self.scores.read().await;
        Ok(scores
            .iter()
            .filter(|r| session_id.is_none_or(|s| r.session_id == s))
            .cloned()
            .collect())
    }

    async fn delete(&self, selector: &ScoreSelector) -> Result<usize, StoreError> {
        let mut scores = self.scores.write().await;
        let before = scores.len();
        match selector {
            ScoreSelector::Id(id) => scores.retain(|s| s.id != *id),
            ScoreSelector::Session(session) => scores.retain(|s| &s.session_id != session),
        }
        Ok(before - scores.len())
    }
}
