//! Customer Repository
//!
//! The identity & loyalty ledger: phone lookup, silent registration,
//! point debit/accrual and lifetime stats.

use super::{RepoError, RepoResult};
use shared::models::{Customer, CustomerUpdate};
use sqlx::{Executor, Sqlite};

const CUSTOMER_SELECT: &str = "SELECT id, full_name, phone, birthday, gender, internal_note, points, total_spent, order_count, last_order_at, created_at, updated_at FROM customer";

/// Find customer by id
pub async fn find_by_id(
    ex: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

/// Find customer by phone.
///
/// Phone is not unique at the schema level; this takes the first match
/// in id order.
pub async fn find_by_phone(
    ex: impl Executor<'_, Database = Sqlite>,
    phone: &str,
) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE phone = ? ORDER BY id LIMIT 1");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(phone)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

/// Silent registration: create a customer with zero points the first
/// time a phone number is seen in an order.
pub async fn create_silent(
    ex: impl Executor<'_, Database = Sqlite>,
    full_name: &str,
    phone: &str,
) -> RepoResult<Customer> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO customer (id, full_name, phone, points, total_spent, order_count, created_at, updated_at) VALUES (?1, ?2, ?3, 0, 0, 0, ?4, ?4)",
    )
    .bind(id)
    .bind(full_name)
    .bind(phone)
    .bind(now)
    .execute(ex)
    .await?;
    Ok(Customer {
        id,
        full_name: full_name.to_string(),
        phone: Some(phone.to_string()),
        birthday: None,
        gender: None,
        internal_note: None,
        points: 0,
        total_spent: 0,
        order_count: 0,
        last_order_at: None,
        created_at: now,
        updated_at: now,
    })
}

/// Debit loyalty points with a compare-and-set guard.
///
/// The balance check and the decrement are one statement, so two
/// concurrent orders cannot both spend the same points. Returns false
/// when the balance no longer covers the debit (zero rows affected).
pub async fn debit_points(
    ex: impl Executor<'_, Database = Sqlite>,
    customer_id: i64,
    points: i64,
) -> RepoResult<bool> {
    if points <= 0 {
        return Ok(true);
    }
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET points = points - ?1, updated_at = ?2 WHERE id = ?3 AND points >= ?1",
    )
    .bind(points)
    .bind(now)
    .bind(customer_id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Record a completed order: accrue points and update lifetime stats
/// (total_spent, order_count, last_order_at) in one atomic statement.
pub async fn record_completed_order(
    ex: impl Executor<'_, Database = Sqlite>,
    customer_id: i64,
    amount: i64,
    points_earned: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE customer SET points = points + ?1, total_spent = total_spent + ?2, order_count = order_count + 1, last_order_at = ?3, updated_at = ?3 WHERE id = ?4",
    )
    .bind(points_earned)
    .bind(amount)
    .bind(now)
    .bind(customer_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Partial CRM update: only supplied fields are applied
pub async fn update(
    ex: impl Executor<'_, Database = Sqlite>,
    id: i64,
    data: CustomerUpdate,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET full_name = COALESCE(?1, full_name), birthday = COALESCE(?2, birthday), gender = COALESCE(?3, gender), internal_note = COALESCE(?4, internal_note), updated_at = ?5 WHERE id = ?6",
    )
    .bind(data.full_name)
    .bind(data.birthday)
    .bind(data.gender)
    .bind(data.internal_note)
    .bind(now)
    .bind(id)
    .execute(ex)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Customer {id} not found")));
    }
    Ok(())
}
