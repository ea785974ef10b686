use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::models::{question::default_catalog, score::demo_scores};
use crate::store::{
    AnswerStore, MemoryAnswerStore, MemoryQuestionStore, MemoryScoreStore, QuestionStore,
    ScoreStore, StoreError,
};

#[derive(Clone)]
pub struct AppState {
    pub questions: Arc<dyn QuestionStore>,
    pub answers: Arc<dyn AnswerStore>,
    pub scores: Arc<dyn ScoreStore>,
    pub config: Config,
}

impl AppState {
    /// In-memory state with the default catalog, plus demo scores when configured.
    pub async fn in_memory(config: Config) -> Result<Self, StoreError> {
        let scores: Arc<dyn ScoreStore> = Arc::new(MemoryScoreStore::default());
        if config.seed_demo_scores {
            for score in demo_scores() {
                scores.insert(score).await?;
            }
            tracing::info!("Seeded demo leaderboard");
        }

        Ok(Self {
            questions: Arc::new(MemoryQuestionStore::with_questions(default_catalog())),
            answers: Arc::new(MemoryAnswerStore::default()),
            scores,
            config,
        })
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn QuestionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.questions.clone()
    }
}

impl FromRef<AppState> for Arc<dyn AnswerStore> {
    fn from_ref(state: &AppState) -> Self {
        state.answers.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ScoreStore> {
    fn from_ref(state: &AppState) -> Self {
        state.scores.clone()
    }
}
