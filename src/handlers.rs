use crate::errors::{AppError, JournalError};
use crate::journal::{Journal, JournalSnapshot};
use crate::models::{
    DateKey, FieldRequest, ImageRequest, IndexRequest, Month, MonthQuery, Record, SelectRequest,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{Local, NaiveDate};

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Html<String>, AppError> {
    let month = parse_month(query)?;
    let journal = state.journal.lock().await;
    Ok(Html(render_index(&journal.snapshot(today(), month))))
}

pub async fn get_state(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<JournalSnapshot>, AppError> {
    let month = parse_month(query)?;
    let journal = state.journal.lock().await;
    Ok(Json(journal.snapshot(today(), month)))
}

pub async fn get_records(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Record>>, AppError> {
    let date: DateKey = date.parse()?;
    let journal = state.journal.lock().await;
    Ok(Json(journal.records().select_records(date).to_vec()))
}

pub async fn select(
    State(state): State<AppState>,
    Json(payload): Json<SelectRequest>,
) -> Result<Json<JournalSnapshot>, AppError> {
    let date: DateKey = payload.date.parse()?;
    let snapshot = apply_event(&state, |journal| Ok(journal.select_date(date))).await?;
    Ok(Json(snapshot))
}

pub async fn field(
    State(state): State<AppState>,
    Json(payload): Json<FieldRequest>,
) -> Result<Json<JournalSnapshot>, AppError> {
    let snapshot = apply_event(&state, |journal| journal.apply_fields(payload)).await?;
    Ok(Json(snapshot))
}

pub async fn image(
    State(state): State<AppState>,
    Json(payload): Json<ImageRequest>,
) -> Result<Json<JournalSnapshot>, AppError> {
    if payload.src.trim().is_empty() {
        return Err(AppError::bad_request("src must not be empty"));
    }
    let snapshot = apply_event(&state, |journal| {
        journal.insert_image(&payload.src, payload.cursor)
    })
    .await?;
    Ok(Json(snapshot))
}

pub async fn add(State(state): State<AppState>) -> Result<Json<JournalSnapshot>, AppError> {
    Ok(Json(apply_event(&state, Journal::add).await?))
}

pub async fn edit(
    State(state): State<AppState>,
    Json(payload): Json<IndexRequest>,
) -> Result<Json<JournalSnapshot>, AppError> {
    let snapshot = apply_event(&state, |journal| journal.edit(payload.index)).await?;
    Ok(Json(snapshot))
}

pub async fn delete(
    State(state): State<AppState>,
    Json(payload): Json<IndexRequest>,
) -> Result<Json<JournalSnapshot>, AppError> {
    let snapshot = apply_event(&state, |journal| journal.delete(payload.index)).await?;
    Ok(Json(snapshot))
}

pub async fn save(State(state): State<AppState>) -> Result<Json<JournalSnapshot>, AppError> {
    Ok(Json(apply_event(&state, Journal::save).await?))
}

pub async fn cancel(State(state): State<AppState>) -> Result<Json<JournalSnapshot>, AppError> {
    Ok(Json(apply_event(&state, Journal::cancel).await?))
}

pub async fn select_form(
    State(state): State<AppState>,
    Form(payload): Form<SelectRequest>,
) -> Result<Redirect, AppError> {
    let date: DateKey = payload.date.parse()?;
    apply_event(&state, |journal| Ok(journal.select_date(date))).await?;
    Ok(Redirect::to("/"))
}

pub async fn add_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply_event(&state, Journal::add).await?;
    Ok(Redirect::to("/"))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Redirect, AppError> {
    apply_event(&state, |journal| journal.edit(index)).await?;
    Ok(Redirect::to("/"))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Redirect, AppError> {
    apply_event(&state, |journal| journal.delete(index)).await?;
    Ok(Redirect::to("/"))
}

/// Without script the save form carries the fields itself.
pub async fn save_form(
    State(state): State<AppState>,
    Form(fields): Form<FieldRequest>,
) -> Result<Redirect, AppError> {
    apply_event(&state, |journal| {
        journal.apply_fields(fields)?;
        journal.save()
    })
    .await?;
    Ok(Redirect::to("/"))
}

pub async fn cancel_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply_event(&state, Journal::cancel).await?;
    Ok(Redirect::to("/"))
}

/// Runs one user event under the lock, flushes drafts, and returns the new view.
async fn apply_event<T>(
    state: &AppState,
    event: impl FnOnce(&mut Journal) -> Result<T, JournalError>,
) -> Result<JournalSnapshot, AppError> {
    let mut journal = state.journal.lock().await;
    let outcome = event(&mut *journal);
    journal.persist().await;
    outcome?;
    Ok(journal.snapshot(today(), None))
}

fn parse_month(query: MonthQuery) -> Result<Option<Month>, AppError> {
    match query.month.filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => Ok(Some(raw.parse::<Month>()?)),
        None => Ok(None),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
