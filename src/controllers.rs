use super::{
    dates, db_ops,
    errors::ApiError,
    extractors::JsonBody,
    models::{AppState, NewNote, Note, NoteView},
    tags::{self, TagsInput},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::{debug, info};

fn views(notes: Vec<Note>) -> Vec<NoteView> {
    notes.into_iter().map(NoteView::from).collect()
}

pub async fn list_notes(
    State(AppState { db }): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let notes = db_ops::list_notes(&db).await?;
    Ok(Json(views(notes)))
}

#[derive(Debug, Deserialize)]
pub struct CreateNote {
    title: Option<String>,
    content: Option<String>,
    tags: Option<TagsInput>,
    event_start_date: Option<String>,
    event_end_date: Option<String>,
}

impl CreateNote {
    fn validate(self) -> Result<NewNote, ApiError> {
        let (title, content) = match (self.title, self.content) {
            (Some(title), Some(content)) => (title, content),
            _ => {
                return Err(ApiError::Validation(
                    "Title and content are required".to_string(),
                ))
            }
        };
        if title.trim().is_empty() {
            return Err(ApiError::Validation(
                "Title must not be empty".to_string(),
            ));
        }
        let event_start_date =
            dates::parse_optional(self.event_start_date.as_deref())?;
        let event_end_date =
            dates::parse_optional(self.event_end_date.as_deref())?;
        dates::check_range(event_start_date, event_end_date)?;

        Ok(NewNote {
            title,
            content,
            tags: self.tags.map(TagsInput::normalize).unwrap_or_default(),
            event_start_date,
            event_end_date,
        })
    }
}

pub async fn create_note(
    State(AppState { db }): State<AppState>,
    JsonBody(payload): JsonBody<CreateNote>,
) -> Result<impl IntoResponse, ApiError> {
    let new = payload.validate()?;

    let mut tx = db.begin().await?;
    let note = db_ops::insert_note(&mut tx, &new).await?;
    tx.commit().await?;

    info!(id = note.id, "created note");
    Ok((StatusCode::CREATED, Json(NoteView::from(note))))
}

pub async fn get_note(
    State(AppState { db }): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let note = db_ops::get_note(&db, id)
        .await?
        .ok_or_else(|| ApiError::note_not_found(id))?;
    Ok(Json(NoteView::from(note)))
}

/// Distinguishes a field that is present but `null` (`Some(None)`) from one
/// that is absent (`None`, via `#[serde(default)]`).
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Only the fields present in the body are applied. For the event dates,
/// `null` or `""` clears the stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateNote {
    title: Option<String>,
    content: Option<String>,
    tags: Option<TagsInput>,
    #[serde(default, deserialize_with = "present")]
    event_start_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    event_end_date: Option<Option<String>>,
}

pub async fn update_note(
    State(AppState { db }): State<AppState>,
    Path(id): Path<i64>,
    body: Result<JsonBody<Map<String, Value>>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = db.begin().await?;
    let mut note = db_ops::get_note(&mut tx, id)
        .await?
        .ok_or_else(|| ApiError::note_not_found(id))?;

    // An unknown id wins over a bad body.
    let JsonBody(body) = body?;
    if body.is_empty() {
        return Err(ApiError::Validation("No data provided".to_string()));
    }
    let changes: UpdateNote = serde_json::from_value(Value::Object(body))
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    debug!(id, ?changes, "applying note update");

    if let Some(title) = changes.title {
        note.title = title;
    }
    if let Some(content) = changes.content {
        note.content = content;
    }
    if let Some(input) = changes.tags {
        note.tags = Some(tags::encode(&input.normalize()));
    }
    if let Some(raw) = changes.event_start_date {
        note.event_start_date = dates::parse_optional(raw.as_deref())?;
    }
    if let Some(raw) = changes.event_end_date {
        note.event_end_date = dates::parse_optional(raw.as_deref())?;
    }
    dates::check_range(note.event_start_date, note.event_end_date)?;
    note.updated_at = db_ops::now();

    db_ops::update_note(&mut tx, &note).await?;
    tx.commit().await?;

    info!(id, "updated note");
    Ok(Json(NoteView::from(note)))
}

pub async fn delete_note(
    State(AppState { db }): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = db.begin().await?;
    if !db_ops::delete_note(&mut tx, id).await? {
        return Err(ApiError::note_not_found(id));
    }
    tx.commit().await?;

    info!(id, "deleted note");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

pub async fn search_notes(
    State(AppState { db }): State<AppState>,
    Query(SearchQuery { q }): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let needle = q.unwrap_or_default();
    if needle.is_empty() {
        return Ok(Json(vec![]));
    }
    let notes = db_ops::search_notes(&db, &needle).await?;
    Ok(Json(views(notes)))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}
