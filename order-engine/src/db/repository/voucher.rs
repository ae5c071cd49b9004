//! Voucher Repository

use super::RepoResult;
use shared::models::Voucher;
use sqlx::{Executor, Sqlite};

const VOUCHER_SELECT: &str = "SELECT id, code, description, discount_type, value, min_order_value, max_discount, is_active, created_at, updated_at FROM voucher";

/// Find an active voucher by code
pub async fn find_active_by_code(
    ex: impl Executor<'_, Database = Sqlite>,
    code: &str,
) -> RepoResult<Option<Voucher>> {
    let sql = format!("{VOUCHER_SELECT} WHERE code = ? AND is_active = 1");
    let row = sqlx::query_as::<_, Voucher>(&sql)
        .bind(code)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

/// Find all vouchers
pub async fn find_all(ex: impl Executor<'_, Database = Sqlite>) -> RepoResult<Vec<Voucher>> {
    let sql = format!("{VOUCHER_SELECT} ORDER BY id");
    let rows = sqlx::query_as::<_, Voucher>(&sql).fetch_all(ex).await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::DiscountType;

    #[tokio::test]
    async fn test_lookup_by_code_requires_active() {
        let pool = DbService::in_memory().await.unwrap().pool;
        sqlx::query("INSERT INTO voucher (id, code, discount_type, value, min_order_value, max_discount) VALUES (1, 'PCT10', 'PERCENTAGE', 10.0, 50000, 20000)")
            .execute(&pool).await.unwrap();
        sqlx::query("INSERT INTO voucher (id, code, discount_type, value, is_active) VALUES (2, 'OLD', 'FIXED', 5000.0, 0)")
            .execute(&pool).await.unwrap();

        let found = find_active_by_code(&pool, "PCT10").await.unwrap().unwrap();
        assert_eq!(found.discount_type, DiscountType::Percentage);
        assert_eq!(found.min_order_value, 50000);
        assert_eq!(found.max_discount, Some(20000));

        assert!(find_active_by_code(&pool, "OLD").await.unwrap().is_none());
        assert!(find_active_by_code(&pool, "NOPE").await.unwrap().is_none());

        assert_eq!(find_all(&pool).await.unwrap().len(), 2);
    }
}
