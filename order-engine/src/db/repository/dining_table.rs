//! Dining Table Repository

use super::RepoResult;
use shared::models::{DiningTable, TableStatus};
use sqlx::{Executor, Sqlite};

/// Find table by id
pub async fn find_by_id(
    ex: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<DiningTable>> {
    let row = sqlx::query_as::<_, DiningTable>(
        "SELECT id, name, capacity, status FROM dining_table WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Set the occupancy status of a table.
///
/// An unknown table id is tolerated (no rows affected, no error):
/// orders can reference tables that were since removed.
pub async fn set_status(
    ex: impl Executor<'_, Database = Sqlite>,
    id: i64,
    status: TableStatus,
) -> RepoResult<()> {
    sqlx::query("UPDATE dining_table SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}
