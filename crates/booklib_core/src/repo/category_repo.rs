//! Category data access.
//!
//! Name uniqueness is not a storage constraint; the category service checks
//! it through `CategoryLookup::Name` before writing. `name_folded` is
//! rewritten with every name change.

use super::{ensure_changed, executor, RepoResult};
use crate::model::category::{Category, CategoryChanges, CategoryId, CategoryInput};
use crate::model::{fold_key, EntityKind};
use crate::search::criteria::{CategoryLookup, NameFilter};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction};

const CATEGORY_SELECT_SQL: &str =
    "SELECT id, name, description, created_at, updated_at FROM tb_category";

pub trait CategoryRepository {
    fn create_category(
        &self,
        tx: Option<&Transaction<'_>>,
        input: &CategoryInput,
        created_at: i64,
    ) -> RepoResult<CategoryId>;
    fn update_category(
        &self,
        tx: Option<&Transaction<'_>>,
        id: CategoryId,
        changes: &CategoryChanges,
    ) -> RepoResult<()>;
    fn delete_category(&self, tx: Option<&Transaction<'_>>, id: CategoryId) -> RepoResult<()>;
    fn find_category(&self, lookup: &CategoryLookup) -> RepoResult<Option<Category>>;
    fn list_categories(&self, filter: &NameFilter) -> RepoResult<Vec<Category>>;
}

#[derive(Clone, Copy)]
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(
        &self,
        tx: Option<&Transaction<'_>>,
        input: &CategoryInput,
        created_at: i64,
    ) -> RepoResult<CategoryId> {
        let conn = executor(self.conn, tx);
        conn.execute(
            "INSERT INTO tb_category (name, name_folded, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, NULL);",
            params![
                input.name.as_str(),
                fold_key(&input.name),
                input.description.as_str(),
                created_at
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_category(
        &self,
        tx: Option<&Transaction<'_>>,
        id: CategoryId,
        changes: &CategoryChanges,
    ) -> RepoResult<()> {
        let changed = executor(self.conn, tx).execute(
            "UPDATE tb_category
             SET
                name = ?1,
                name_folded = ?2,
                description = ?3,
                updated_at = ?4
             WHERE id = ?5;",
            params![
                changes.name.as_str(),
                fold_key(&changes.name),
                changes.description.as_str(),
                changes.updated_at,
                id
            ],
        )?;
        ensure_changed(changed, EntityKind::Category, id)
    }

    fn delete_category(&self, tx: Option<&Transaction<'_>>, id: CategoryId) -> RepoResult<()> {
        let changed =
            executor(self.conn, tx).execute("DELETE FROM tb_category WHERE id = ?1;", [id])?;
        ensure_changed(changed, EntityKind::Category, id)
    }

    fn find_category(&self, lookup: &CategoryLookup) -> RepoResult<Option<Category>> {
        let (predicate, value) = lookup.predicate();
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL} WHERE {predicate} ORDER BY id ASC LIMIT 1;"
        ))?;

        let mut rows = stmt.query([value])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_category_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_categories(&self, filter: &NameFilter) -> RepoResult<Vec<Category>> {
        let mut sql = CATEGORY_SELECT_SQL.to_string();
        let mut bind_values: Vec<Value> = Vec::new();
        filter.apply("name_folded", &mut sql, &mut bind_values);
        sql.push_str(" ORDER BY id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }

        Ok(categories)
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
