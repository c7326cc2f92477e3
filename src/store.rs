// store.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::models::{Choice, Question};

/// Persistence operations the request handlers need. Production code talks
/// to [`PgStore`]; tests use [`MemoryStore`].
#[async_trait]
pub trait PollStore: Send + Sync + 'static {
    /// Published questions (`pub_date <= now`), newest first, capped at `limit`.
    async fn recent_published(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Question>, sqlx::Error>;

    /// A question by id, but only if already published.
    async fn published_question(
        &self,
        id: i32,
        now: DateTime<Utc>,
    ) -> Result<Option<Question>, sqlx::Error>;

    /// A question by id with no publication gate.
    async fn question(&self, id: i32) -> Result<Option<Question>, sqlx::Error>;

    /// All choices of a question, ordered by id.
    async fn choices_of(&self, question_id: i32) -> Result<Vec<Choice>, sqlx::Error>;

    async fn create_question(
        &self,
        text: &str,
        pub_date: DateTime<Utc>,
    ) -> Result<Question, sqlx::Error>;

    /// Deletes a question and, through the cascade, its choices.
    async fn delete_question(&self, id: i32) -> Result<(), sqlx::Error>;

    async fn create_choice(&self, question_id: i32, text: &str) -> Result<Choice, sqlx::Error>;

    async fn choice(&self, id: i32) -> Result<Option<Choice>, sqlx::Error>;

    /// The choice with `choice_id`, only if it belongs to `question_id`.
    async fn choice_of_question(
        &self,
        question_id: i32,
        choice_id: i32,
    ) -> Result<Option<Choice>, sqlx::Error>;

    /// Increments a choice's vote count by exactly one.
    async fn record_vote(&self, choice_id: i32) -> Result<(), sqlx::Error>;

    async fn delete_choice(&self, id: i32) -> Result<(), sqlx::Error>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PollStore for PgStore {
    async fn recent_published(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            "SELECT id, question_text, pub_date FROM questions \
             WHERE pub_date <= $1 ORDER BY pub_date DESC LIMIT $2",
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn published_question(
        &self,
        id: i32,
        now: DateTime<Utc>,
    ) -> Result<Option<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            "SELECT id, question_text, pub_date FROM questions \
             WHERE id = $1 AND pub_date <= $2",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
    }

    async fn question(&self, id: i32) -> Result<Option<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            "SELECT id, question_text, pub_date FROM questions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn choices_of(&self, question_id: i32) -> Result<Vec<Choice>, sqlx::Error> {
        sqlx::query_as::<_, Choice>(
            "SELECT id, question_id, choice_text, votes FROM choices \
             WHERE question_id = $1 ORDER BY id",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_question(
        &self,
        text: &str,
        pub_date: DateTime<Utc>,
    ) -> Result<Question, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            "INSERT INTO questions (question_text, pub_date) VALUES ($1, $2) \
             RETURNING id, question_text, pub_date",
        )
        .bind(text)
        .bind(pub_date)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_question(&self, id: i32) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_choice(&self, question_id: i32, text: &str) -> Result<Choice, sqlx::Error> {
        sqlx::query_as::<_, Choice>(
            "INSERT INTO choices (question_id, choice_text) VALUES ($1, $2) \
             RETURNING id, question_id, choice_text, votes",
        )
        .bind(question_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
    }

    async fn choice(&self, id: i32) -> Result<Option<Choice>, sqlx::Error> {
        sqlx::query_as::<_, Choice>(
            "SELECT id, question_id, choice_text, votes FROM choices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn choice_of_question(
        &self,
        question_id: i32,
        choice_id: i32,
    ) -> Result<Option<Choice>, sqlx::Error> {
        sqlx::query_as::<_, Choice>(
            "SELECT id, question_id, choice_text, votes FROM choices \
             WHERE id = $1 AND question_id = $2",
        )
        .bind(choice_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn record_vote(&self, choice_id: i32) -> Result<(), sqlx::Error> {
        // Single-statement increment; concurrent votes cannot lose updates.
        sqlx::query("UPDATE choices SET votes = votes + 1 WHERE id = $1")
            .bind(choice_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_choice(&self, id: i32) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM choices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(Default)]
struct MemoryInner {
    questions: Vec<Question>,
    choices: Vec<Choice>,
    next_question_id: i32,
    next_choice_id: i32,
}

/// In-memory store with the same semantics as [`PgStore`], including the
/// question-to-choice delete cascade. Exported for tests and local runs
/// without a database.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn recent_published(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Question>, sqlx::Error> {
        let inner = self.inner.lock().await;
        let mut published: Vec<Question> = inner
            .questions
            .iter()
            .filter(|q| q.pub_date <= now)
            .cloned()
            .collect();
        published.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        published.truncate(limit as usize);
        Ok(published)
    }

    async fn published_question(
        &self,
        id: i32,
        now: DateTime<Utc>,
    ) -> Result<Option<Question>, sqlx::Error> {
        let inner = self.inner.lock().await;
        Ok(inner
            .questions
            .iter()
            .find(|q| q.id == id && q.pub_date <= now)
            .cloned())
    }

    async fn question(&self, id: i32) -> Result<Option<Question>, sqlx::Error> {
        let inner = self.inner.lock().await;
        Ok(inner.questions.iter().find(|q| q.id == id).cloned())
    }

    async fn choices_of(&self, question_id: i32) -> Result<Vec<Choice>, sqlx::Error> {
        let inner = self.inner.lock().await;
        Ok(inner
            .choices
            .iter()
            .filter(|c| c.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn create_question(
        &self,
        text: &str,
        pub_date: DateTime<Utc>,
    ) -> Result<Question, sqlx::Error> {
        let mut inner = self.inner.lock().await;
        inner.next_question_id += 1;
        let question = Question {
            id: inner.next_question_id,
            question_text: text.to_string(),
            pub_date,
        };
        inner.questions.push(question.clone());
        Ok(question)
    }

    async fn delete_question(&self, id: i32) -> Result<(), sqlx::Error> {
        let mut inner = self.inner.lock().await;
        inner.questions.retain(|q| q.id != id);
        inner.choices.retain(|c| c.question_id != id);
        Ok(())
    }

    async fn create_choice(&self, question_id: i32, text: &str) -> Result<Choice, sqlx::Error> {
        let mut inner = self.inner.lock().await;
        inner.next_choice_id += 1;
        let choice = Choice {
            id: inner.next_choice_id,
            question_id,
            choice_text: text.to_string(),
            votes: 0,
        };
        inner.choices.push(choice.clone());
        Ok(choice)
    }

    async fn choice(&self, id: i32) -> Result<Option<Choice>, sqlx::Error> {
        let inner = self.inner.lock().await;
        Ok(inner.choices.iter().find(|c| c.id == id).cloned())
    }

    async fn choice_of_question(
        &self,
        question_id: i32,
        choice_id: i32,
    ) -> Result<Option<Choice>, sqlx::Error> {
        let inner = self.inner.lock().await;
        Ok(inner
            .choices
            .iter()
            .find(|c| c.id == choice_id && c.question_id == question_id)
            .cloned())
    }

    async fn record_vote(&self, choice_id: i32) -> Result<(), sqlx::Error> {
        let mut inner = self.inner.lock().await;
        if let Some(choice) = inner.choices.iter_mut().find(|c| c.id == choice_id) {
            choice.votes += 1;
        }
        Ok(())
    }

    async fn delete_choice(&self, id: i32) -> Result<(), sqlx::Error> {
        let mut inner = self.inner.lock().await;
        inner.choices.retain(|c| c.id != id);
        Ok(())
    }
}
