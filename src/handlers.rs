use crate::errors::AppError;
use crate::export::{content_disposition, CSV_CONTENT_TYPE};
use crate::models::{Day, DayUpdate, DiaryView, ExportQuery, NotesUpdate, ProfileUpdate};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(state.config.default_stress))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<DiaryView>) {
    let (id, session) = state.create_session().await;
    info!(session = %id, "session started");
    (StatusCode::CREATED, Json(session.view(id)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DiaryView>, AppError> {
    let view = state.with_session(id, |session| session.view(id)).await?;
    Ok(Json(view))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<DiaryView>, AppError> {
    let Json(payload) = payload?;
    let view = state
        .with_session(id, |session| {
            session.record.apply_profile(payload);
            session.view(id)
        })
        .await?;
    Ok(Json(view))
}

pub async fn update_day(
    State(state): State<AppState>,
    Path((id, day)): Path<(Uuid, String)>,
    payload: Result<Json<DayUpdate>, JsonRejection>,
) -> Result<Json<DiaryView>, AppError> {
    let Json(payload) = payload?;
    let day: Day = day.parse()?;
    debug!(session = %id, %day, "day updated");
    let view = state
        .with_session(id, |session| {
            session.record.entry_mut(day).apply(payload);
            session.view(id)
        })
        .await?;
    Ok(Json(view))
}

pub async fn update_notes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<NotesUpdate>, JsonRejection>,
) -> Result<Json<DiaryView>, AppError> {
    let Json(payload) = payload?;
    let view = state
        .with_session(id, |session| {
            session.record.apply_notes(payload);
            session.view(id)
        })
        .await?;
    Ok(Json(view))
}

pub async fn export_csv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let artifact = state
        .with_session(id, |session| session.export(query.vitals, Utc::now()))
        .await?;
    info!(session = %id, file = %artifact.file_name, vitals = query.vitals, "diary exported");

    let disposition = HeaderValue::from_str(&content_disposition(&artifact.file_name))
        .map_err(AppError::internal)?;
    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static(CSV_CONTENT_TYPE)),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    Ok((headers, artifact.body).into_response())
}
