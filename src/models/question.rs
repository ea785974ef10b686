// src/models/question.rs

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const OPTION_COUNT: usize = 4;
pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_DIFFICULTY: &str = "easy";

/// A catalog entry, including its answer key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub id: i64,

    /// The prompt shown to the player.
    pub question: String,

    /// Always exactly four choices.
    pub options: Vec<String>,

    /// Index into `options` of the right choice.
    pub correct: usize,

    pub explanation: String,
    pub category: String,
    pub difficulty: String,
}

/// DTO for sending a question to the client (excludes the answer key).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PublicQuestion {
    pub id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub explanation: String,
    pub category: String,
    pub difficulty: String,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question: q.question,
            options: q.options,
            explanation: q.explanation,
            category: q.category,
            difficulty: q.difficulty,
        }
    }
}

/// A validated question waiting for the store to assign its id.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub explanation: String,
    pub category: String,
    pub difficulty: String,
}

impl NewQuestion {
    pub fn with_id(self, id: i64) -> Question {
        Question {
            id,
            question: self.question,
            options: self.options,
            correct: self.correct,
            explanation: self.explanation,
            category: self.category,
            difficulty: self.difficulty,
        }
    }
}

/// DTO for adding a question to the catalog.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionRequest {
    #[validate(
        required(message = "question is required"),
        length(min = 1, max = 1000, message = "question must be 1-1000 characters")
    )]
    pub question: Option<String>,

    #[validate(
        required(message = "options are required"),
        length(equal = 4, message = "Options must be an array of 4 elements"),
        custom(function = validate_options)
    )]
    pub options: Option<Vec<String>>,

    #[validate(
        required(message = "correct is required"),
        range(min = 0, max = 3, message = "Correct answer index is invalid")
    )]
    pub correct: Option<i64>,

    #[validate(
        required(message = "explanation is required"),
        length(min = 1, max = 2000, message = "explanation must be 1-2000 characters")
    )]
    pub explanation: Option<String>,

    #[validate(length(max = 50))]
    pub category: Option<String>,

    #[validate(length(max = 20))]
    pub difficulty: Option<String>,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    for opt in options {
        if opt.trim().is_empty() {
            return Err(validator::ValidationError::new("option_cannot_be_empty"));
        }
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

impl CreateQuestionRequest {
    /// Validates the request and fills in defaults. Text is stored verbatim.
    /// Nothing is mutated when this fails.
    pub fn into_new_question(self) -> Result<NewQuestion, validator::ValidationErrors> {
        self.validate()?;

        // `validate` guarantees the required fields are present.
        let (Some(question), Some(options), Some(correct), Some(explanation)) =
            (self.question, self.options, self.correct, self.explanation)
        else {
            return Err(validator::ValidationErrors::new());
        };

        Ok(NewQuestion {
            question,
            options,
            correct: correct as usize,
            explanation,
            category: non_blank(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            difficulty: non_blank(self.difficulty)
                .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Query parameters for listing questions.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuestionListParams {
    /// Case-insensitive exact category match.
    pub category: Option<String>,
    /// Case-insensitive exact difficulty match.
    pub difficulty: Option<String>,
    /// Maximum number of questions; 0 or absent returns all.
    pub limit: Option<usize>,
    /// `true` shuffles before applying the limit; any other value keeps catalog order.
    pub random: Option<String>,
}

impl QuestionListParams {
    /// Filters, optionally shuffles, then truncates. Catalog order is kept otherwise.
    pub fn apply(&self, mut questions: Vec<Question>) -> Vec<Question> {
        if let Some(category) = &self.category {
            let wanted = category.to_lowercase();
            questions.retain(|q| q.category.to_lowercase() == wanted);
        }
        if let Some(difficulty) = &self.difficulty {
            let wanted = difficulty.to_lowercase();
            questions.retain(|q| q.difficulty.to_lowercase() == wanted);
        }
        if self.random.as_deref() == Some("true") {
            questions.shuffle(&mut rand::rng());
        }
        if let Some(limit) = self.limit.filter(|&l| l > 0) {
            questions.truncate(limit);
        }
        questions
    }
}

/// Resolves a question by id, or by its position in the catalog for older clients.
/// The first entry matching either rule wins.
pub fn find_question(questions: &[Question], id: i64) -> Option<&Question> {
    questions
        .iter()
        .enumerate()
        .find(|(pos, q)| q.id == id || *pos as i64 == id)
        .map(|(_, q)| q)
}

/// The math questions the catalog starts with.
pub fn default_catalog() -> Vec<NewQuestion> {
    let q = |question: &str, options: [&str; 4], correct, explanation: &str, category: &str, difficulty: &str| {
        NewQuestion {
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct,
            explanation: explanation.to_string(),
            category: category.to_string(),
            difficulty: difficulty.to_string(),
        }
    };

    vec![
        q("What is 15 + 27?", ["40", "42", "45", "47"], 1, "15 + 27 = 42", "arithmetic", "easy"),
        q("If 8 × 7 = ?, the result is:", ["54", "56", "58", "60"], 1, "8 × 7 = 56", "multiplication", "easy"),
        q("What is 144 ÷ 12?", ["10", "11", "12", "13"], 2, "144 ÷ 12 = 12", "division", "easy"),
        q("What is 25 - 18 + 9?", ["14", "16", "18", "20"], 1, "25 - 18 + 9 = 7 + 9 = 16", "arithmetic", "easy"),
        q(
            "A rectangle is 8 cm long and 5 cm wide. What is its area?",
            ["35 cm²", "40 cm²", "45 cm²", "50 cm²"],
            1,
            "Area = length × width = 8 × 5 = 40 cm²",
            "geometry",
            "medium",
        ),
        q("What is the square root of 64?", ["6", "7", "8", "9"], 2, "√64 = 8, because 8 × 8 = 64", "square-root", "medium"),
        q("If x + 5 = 12, then x = ?", ["5", "6", "7", "8"], 2, "x + 5 = 12, so x = 12 - 5 = 7", "algebra", "medium"),
        q(
            "What is the circumference of a circle with radius 7 cm? (π = 22/7)",
            ["42 cm", "44 cm", "46 cm", "48 cm"],
            1,
            "Circumference = 2πr = 2 × (22/7) × 7 = 44 cm",
            "geometry",
            "hard",
        ),
    ]
}
