//! All SQL lives here. Every function takes the executor explicitly, so
//! handlers decide whether a call runs on the pool or inside their
//! transaction.

use super::{models, tags};
use anyhow::Result;
use chrono::{NaiveDateTime, SubsecRound, Utc};
use sqlx::{query, query_as, Executor, Sqlite, SqlitePool};

const SCHEMA: &str = "
create table if not exists note (
    id integer primary key autoincrement,
    title text not null,
    content text not null,
    tags text default '[]',
    event_start_date text,
    event_end_date text,
    created_at text not null,
    updated_at text not null
);
create index if not exists note_updated_at on note (updated_at desc);
";

/// Idempotent; run once at startup.
pub async fn ensure_schema(db: &SqlitePool) -> Result<()> {
    db.execute(SCHEMA).await?;
    Ok(())
}

/// Stored timestamps carry microsecond precision.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

pub async fn list_notes<'e, E>(db: E) -> Result<Vec<models::Note>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let notes = query_as::<_, models::Note>(
        "select id, title, content, tags, event_start_date, event_end_date,
            created_at, updated_at
        from note
        order by updated_at desc, id desc",
    )
    .fetch_all(db)
    .await?;

    Ok(notes)
}

pub async fn get_note<'e, E>(db: E, id: i64) -> Result<Option<models::Note>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let note = query_as::<_, models::Note>(
        "select id, title, content, tags, event_start_date, event_end_date,
            created_at, updated_at
        from note
        where id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(note)
}

pub async fn insert_note<'e, E>(
    db: E,
    new: &models::NewNote,
) -> Result<models::Note>
where
    E: Executor<'e, Database = Sqlite>,
{
    let stamp = now();
    let note = query_as::<_, models::Note>(
        "insert into note
            (title, content, tags, event_start_date, event_end_date,
            created_at, updated_at)
        values (?, ?, ?, ?, ?, ?, ?)
        returning id, title, content, tags, event_start_date, event_end_date,
            created_at, updated_at",
    )
    .bind(&new.title)
    .bind(&new.content)
    .bind(tags::encode(&new.tags))
    .bind(new.event_start_date)
    .bind(new.event_end_date)
    .bind(stamp)
    .bind(stamp)
    .fetch_one(db)
    .await?;

    Ok(note)
}

/// Writes every mutable column of `note` back to its row. The caller is
/// responsible for refreshing `updated_at`.
pub async fn update_note<'e, E>(db: E, note: &models::Note) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    query(
        "update note
        set
            title = ?,
            content = ?,
            tags = ?,
            event_start_date = ?,
            event_end_date = ?,
            updated_at = ?
        where id = ?",
    )
    .bind(&note.title)
    .bind(&note.content)
    .bind(&note.tags)
    .bind(note.event_start_date)
    .bind(note.event_end_date)
    .bind(note.updated_at)
    .bind(note.id)
    .execute(db)
    .await?;

    Ok(())
}

/// Returns whether a row was actually removed.
pub async fn delete_note<'e, E>(db: E, id: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = query("delete from note where id = ?")
        .bind(id)
        .execute(db)
        .await?;

    Ok(res.rows_affected() > 0)
}

/// Case-insensitive substring match on title or content. `lower` only folds
/// ASCII in SQLite, which is the contract we document.
pub async fn search_notes<'e, E>(db: E, needle: &str) -> Result<Vec<models::Note>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let notes = query_as::<_, models::Note>(
        "select id, title, content, tags, event_start_date, event_end_date,
            created_at, updated_at
        from note
        where instr(lower(title), lower(?)) > 0
            or instr(lower(content), lower(?)) > 0
        order by updated_at desc, id desc",
    )
    .bind(needle)
    .bind(needle)
    .fetch_all(db)
    .await?;

    Ok(notes)
}

#[cfg(test)]
pub mod test_util {
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

    /// A fresh in-memory database. An in-memory SQLite database lives and
    /// dies with its connection, so the pool is pinned to exactly one.
    pub async fn memory_pool() -> SqlitePool {
        let db = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        super::ensure_schema(&db).await.expect("schema");
        db
    }
}
