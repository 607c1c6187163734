use chrono::Utc;
use rusqlite::{ffi, params, Row};

use tally_core::category::{Category, CreateCategory};

use crate::{Db, DbError};

fn row_to_category(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
        color: row.get("color")?,
        icon: row.get("icon")?,
        created_at: row.get("created_at")?,
    })
}

fn constraint_code(e: &rusqlite::Error) -> Option<i32> {
    match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Some(err.extended_code)
        }
        _ => None,
    }
}

impl Db {
    pub fn create_category(&self, input: &CreateCategory) -> Result<Category, DbError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(DbError::InvalidInput("category name must not be empty".into()));
        }
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now();
            conn.execute(
                "INSERT INTO categories (id, name, color, icon, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, name, input.color, input.icon, now],
            )
            .map_err(|e| match constraint_code(&e) {
                Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                    DbError::Conflict(format!("a category named '{name}' already exists"))
                }
                Some(_) => DbError::InvalidInput("color and icon must not be empty".into()),
                None => DbError::from(e),
            })?;
            let category = conn.query_row(
                "SELECT * FROM categories WHERE id = ?1",
                params![id],
                row_to_category,
            )?;
            tracing::debug!(id = %category.id, "inserted category");
            Ok(category)
        })
    }

    pub fn get_category(&self, id: &str) -> Result<Category, DbError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM categories WHERE id = ?1",
                params![id],
                row_to_category,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    DbError::NotFound(format!("category {id}"))
                }
                other => DbError::from(other),
            })
        })
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, DbError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM categories ORDER BY name COLLATE NOCASE")?;
            let categories = stmt
                .query_map([], row_to_category)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(categories)
        })
    }
}
