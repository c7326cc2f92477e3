// handlers.rs
use axum::extract::{Form, Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::Utc;
use http::Method;
use serde_json::json;
use tracing::info;

use crate::error::AppError;
use crate::models::{ChoiceForm, DeleteQuestionForm, QuestionForm, VoteForm};
use crate::{pages, AppState};

/// The index shows the five most recently published questions.
const INDEX_LIMIT: i64 = 5;

/// Sentinel a delete-question form must carry for the deletion to happen.
const DELETE_CONFIRMATION: &str = "Delete";

fn results_path(question_id: i32) -> String {
    format!("/{question_id}/results/")
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let latest = state.store.recent_published(Utc::now(), INDEX_LIMIT).await?;
    pages::render(
        &state.templates,
        "index",
        &json!({ "latest_question_list": latest }),
    )
}

/// GET /{question_id}/
///
/// Questions with a future `pub_date` are treated as absent.
pub async fn detail(
    State(state): State<AppState>,
    Path(question_id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let question = state
        .store
        .published_question(question_id, Utc::now())
        .await?
        .ok_or(AppError::NotFound)?;
    let choices = state.store.choices_of(question.id).await?;
    pages::render(
        &state.templates,
        "detail",
        &json!({ "question": question, "choices": choices, "error_message": null }),
    )
}

/// GET /{question_id}/results/
///
/// No publication gate here: results of unpublished questions are reachable
/// by id, matching the detail/results asymmetry of the data model.
pub async fn results(
    State(state): State<AppState>,
    Path(question_id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let question = state
        .store
        .question(question_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let choices = state.store.choices_of(question.id).await?;
    pages::render(
        &state.templates,
        "results",
        &json!({ "question": question, "choices": choices }),
    )
}

/// POST /add/
pub async fn add_question(
    State(state): State<AppState>,
    Form(form): Form<QuestionForm>,
) -> Result<Redirect, AppError> {
    let text = form
        .question_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingField("question_text"))?;
    let question = state.store.create_question(text, Utc::now()).await?;
    info!(question = question.id, "question created");
    Ok(Redirect::to("/"))
}

/// POST /{question_id}/delete/
///
/// Deletes only when the form carries `confirm=Delete`; redirects to the
/// index either way.
pub async fn delete_question(
    State(state): State<AppState>,
    Path(question_id): Path<i32>,
    Form(form): Form<DeleteQuestionForm>,
) -> Result<Redirect, AppError> {
    let question = state
        .store
        .question(question_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if form.confirm.as_deref() == Some(DELETE_CONFIRMATION) {
        state.store.delete_question(question.id).await?;
        info!(question = question.id, "question deleted");
    }
    Ok(Redirect::to("/"))
}

/// POST /{question_id}/vote/
///
/// A missing or foreign choice re-renders the detail page with an inline
/// message instead of redirecting, so the voter keeps their context. A
/// successful vote redirects to the results page to absorb back/refresh
/// resubmissions.
pub async fn vote(
    State(state): State<AppState>,
    Path(question_id): Path<i32>,
    Form(form): Form<VoteForm>,
) -> Result<Response, AppError> {
    let question = state
        .store
        .question(question_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let selected = match form.choice {
        Some(choice_id) => state.store.choice_of_question(question.id, choice_id).await?,
        None => None,
    };

    match selected {
        Some(choice) => {
            state.store.record_vote(choice.id).await?;
            info!(question = question.id, choice = choice.id, "vote recorded");
            Ok(Redirect::to(&results_path(question.id)).into_response())
        }
        None => {
            let choices = state.store.choices_of(question.id).await?;
            let page = pages::render(
                &state.templates,
                "detail",
                &json!({
                    "question": question,
                    "choices": choices,
                    "error_message": "You didn't select a choice.",
                }),
            )?;
            Ok(page.into_response())
        }
    }
}

/// POST /{question_id}/add/
pub async fn add_choice(
    State(state): State<AppState>,
    Path(question_id): Path<i32>,
    Form(form): Form<ChoiceForm>,
) -> Result<Redirect, AppError> {
    let question = state
        .store
        .question(question_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let text = form
        .choice_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingField("choice_text"))?;
    let choice = state.store.create_choice(question.id, text).await?;
    info!(question = question.id, choice = choice.id, "choice created");
    Ok(Redirect::to(&results_path(question.id)))
}

/// GET|POST /choice/{choice_id}/delete/
///
/// Only a POST mutates; a GET just redirects to the owning question's
/// results.
pub async fn delete_choice(
    State(state): State<AppState>,
    Path(choice_id): Path<i32>,
    method: Method,
) -> Result<Redirect, AppError> {
    let choice = state
        .store
        .choice(choice_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if method == Method::POST {
        state.store.delete_choice(choice.id).await?;
        info!(choice = choice.id, "choice deleted");
    }
    Ok(Redirect::to(&results_path(choice.question_id)))
}
