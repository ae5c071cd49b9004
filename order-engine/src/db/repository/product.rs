//! Product Catalog Repository
//!
//! Price lookups for the pricing engine and the public menu listing.
//! Catalog mutation belongs to the admin surface, not the engine.

use super::RepoResult;
use shared::models::{OptionGroup, OptionValue, Product};
use sqlx::{Executor, Sqlite};

const PRODUCT_SELECT: &str = "SELECT id, name, description, base_price, image_url, display_order, is_best_seller, is_out_of_stock, category_id FROM product";

const OPTION_VALUE_SELECT: &str =
    "SELECT id, option_group_id, name, price_adjustment, is_out_of_stock FROM option_value";

/// Find product by id
pub async fn find_by_id(
    ex: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

/// Find all products in menu order
pub async fn find_all(ex: impl Executor<'_, Database = Sqlite>) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} ORDER BY display_order, id");
    let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(ex).await?;
    Ok(rows)
}

/// Find option values by id set.
///
/// Returns only the rows that exist; the caller decides whether a
/// missing id is an error.
pub async fn find_option_values(
    ex: impl Executor<'_, Database = Sqlite>,
    ids: &[i64],
) -> RepoResult<Vec<OptionValue>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("{OPTION_VALUE_SELECT} WHERE id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, OptionValue>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(ex).await?;
    Ok(rows)
}

/// Find an option group (the parent of an option value) by id
pub async fn find_option_group(
    ex: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<OptionGroup>> {
    let row = sqlx::query_as::<_, OptionGroup>(
        "SELECT id, name, display_order FROM option_group WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn test_pool() -> sqlx::SqlitePool {
        let pool = DbService::in_memory().await.unwrap().pool;
        sqlx::query("INSERT INTO product (id, name, base_price, display_order) VALUES (1, 'Tea', 30000, 2)")
            .execute(&pool).await.unwrap();
        sqlx::query("INSERT INTO product (id, name, base_price, display_order) VALUES (2, 'Coffee', 25000, 1)")
            .execute(&pool).await.unwrap();
        sqlx::query("INSERT INTO option_group (id, name) VALUES (10, 'Size')")
            .execute(&pool).await.unwrap();
        sqlx::query("INSERT INTO option_value (id, option_group_id, name, price_adjustment) VALUES (101, 10, 'Large', 5000)")
            .execute(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_find_by_id_reads_price() {
        let pool = test_pool().await;
        let found = find_by_id(&pool, 1).await.unwrap().unwrap();
        assert_eq!(found.base_price, 30000);
        assert!(find_by_id(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_orders_by_display_order() {
        let pool = test_pool().await;
        let products = find_all(&pool).await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Coffee");
        assert_eq!(products[1].name, "Tea");
    }

    #[tokio::test]
    async fn test_option_values_returns_only_existing_rows() {
        let pool = test_pool().await;
        let values = find_option_values(&pool, &[101, 999]).await.unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].price_adjustment, 5000);

        assert!(find_option_values(&pool, &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_option_group() {
        let pool = test_pool().await;
        let group = find_option_group(&pool, 10).await.unwrap().unwrap();
        assert_eq!(group.name, "Size");
        assert!(find_option_group(&pool, 11).await.unwrap().is_none());
    }
}
