use rusqlite::Connection;

use crate::DbError;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS categories (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            color       TEXT NOT NULL CHECK(length(trim(color)) > 0),
            icon        TEXT NOT NULL CHECK(length(trim(icon)) > 0),
            created_at  TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_name
            ON categories(name COLLATE NOCASE);
        ",
    )?;
    Ok(())
}
