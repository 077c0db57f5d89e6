use super::{dates, tags};
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: SqlitePool,
}

/// A row of the `note` table.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// JSON array text; see [`tags::decode`] for how it is read back.
    pub tags: Option<String>,
    pub event_start_date: Option<NaiveDateTime>,
    pub event_end_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Everything needed to insert a note; the store assigns the rest.
#[derive(Clone, Debug)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub event_start_date: Option<NaiveDateTime>,
    pub event_end_date: Option<NaiveDateTime>,
}

/// The JSON shape clients see.
#[derive(Clone, Debug, Serialize)]
pub struct NoteView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub event_start_date: Option<String>,
    pub event_end_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Note> for NoteView {
    fn from(note: Note) -> Self {
        NoteView {
            id: note.id,
            tags: tags::decode(note.tags.as_deref()),
            event_start_date: note.event_start_date.as_ref().map(dates::to_iso),
            event_end_date: note.event_end_date.as_ref().map(dates::to_iso),
            created_at: dates::to_iso(&note.created_at),
            updated_at: dates::to_iso(&note.updated_at),
            title: note.title,
            content: note.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_projection() {
        let stamp = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(12, 30, 0))
            .expect("date");
        let note = Note {
            id: 7,
            title: "Standup".into(),
            content: "notes".into(),
            tags: Some("work, daily".into()),
            event_start_date: Some(stamp),
            event_end_date: None,
            created_at: stamp,
            updated_at: stamp,
        };

        let value = serde_json::to_value(NoteView::from(note)).expect("json");
        assert_eq!(
            value,
            json!({
                "id": 7,
                "title": "Standup",
                "content": "notes",
                "tags": ["work", "daily"],
                "event_start_date": "2024-03-01T12:30:00",
                "event_end_date": null,
                "created_at": "2024-03-01T12:30:00",
                "updated_at": "2024-03-01T12:30:00",
            })
        );
    }
}
