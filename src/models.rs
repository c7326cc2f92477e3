// models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A poll prompt. Its `pub_date` gates visibility: the index and detail
/// pages only show questions published at or before the current time.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Question {
    pub id: i32,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

/// One selectable answer belonging to a question, with an accumulating
/// vote count.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Choice {
    pub id: i32,
    pub question_id: i32,
    pub choice_text: String,
    pub votes: i32,
}

#[derive(Debug, Deserialize)]
pub struct QuestionForm {
    pub question_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceForm {
    pub choice_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoteForm {
    pub choice: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuestionForm {
    pub confirm: Option<String>,
}
