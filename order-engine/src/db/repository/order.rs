//! Order Repository
//!
//! Writes run inside the caller's transaction (`&mut SqliteConnection`);
//! single-statement reads accept any executor.

use super::{RepoError, RepoResult};
use shared::models::{
    Order, OrderDetail, OrderItem, OrderItemDetail, OrderItemOption, OrderStatus,
};
use sqlx::{Executor, Sqlite, SqliteConnection};

const ORDER_SELECT: &str = "SELECT id, customer_name, customer_phone, customer_address, customer_note, customer_id, table_id, sub_total, delivery_fee, discount_amount, points_discount, total_amount, status, payment_method, delivery_method, voucher_code, created_at, updated_at FROM orders";

/// Insert the order row
pub async fn insert(
    ex: impl Executor<'_, Database = Sqlite>,
    order: &Order,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, customer_name, customer_phone, customer_address, customer_note, customer_id, table_id, sub_total, delivery_fee, discount_amount, points_discount, total_amount, status, payment_method, delivery_method, voucher_code, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(order.id)
    .bind(&order.customer_name)
    .bind(&order.customer_phone)
    .bind(&order.customer_address)
    .bind(&order.customer_note)
    .bind(order.customer_id)
    .bind(order.table_id)
    .bind(order.sub_total)
    .bind(order.delivery_fee)
    .bind(order.discount_amount)
    .bind(order.points_discount)
    .bind(order.total_amount)
    .bind(order.status)
    .bind(order.payment_method)
    .bind(order.delivery_method)
    .bind(&order.voucher_code)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(ex)
    .await?;
    Ok(())
}

/// Insert one order item snapshot
pub async fn insert_item(
    ex: impl Executor<'_, Database = Sqlite>,
    item: &OrderItem,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item (id, order_id, product_id, product_name, quantity, item_price, item_note, ordered_by) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(item.id)
    .bind(item.order_id)
    .bind(item.product_id)
    .bind(&item.product_name)
    .bind(item.quantity)
    .bind(item.item_price)
    .bind(&item.item_note)
    .bind(&item.ordered_by)
    .execute(ex)
    .await?;
    Ok(())
}

/// Insert one selected-option snapshot
pub async fn insert_item_option(
    ex: impl Executor<'_, Database = Sqlite>,
    option: &OrderItemOption,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item_option (id, order_item_id, option_name, value_name, added_price) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(option.id)
    .bind(option.order_item_id)
    .bind(&option.option_name)
    .bind(&option.value_name)
    .bind(option.added_price)
    .execute(ex)
    .await?;
    Ok(())
}

/// Find order by id
pub async fn find_by_id(
    ex: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

/// List orders, newest first
pub async fn find_all(
    ex: impl Executor<'_, Database = Sqlite>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} ORDER BY id DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(ex)
        .await?;
    Ok(rows)
}

/// Write a new status and bump updated_at.
///
/// No transition matrix: any status can be written over any other.
pub async fn update_status(
    conn: &mut SqliteConnection,
    id: i64,
    status: OrderStatus,
) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Load an order with its items and selected options
pub async fn find_detail(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<OrderDetail>> {
    let Some(order) = find_by_id(&mut *conn, id).await? else {
        return Ok(None);
    };

    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, product_name, quantity, item_price, item_note, ordered_by FROM order_item WHERE order_id = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    let mut detailed = Vec::with_capacity(items.len());
    for item in items {
        let options_selected = sqlx::query_as::<_, OrderItemOption>(
            "SELECT id, order_item_id, option_name, value_name, added_price FROM order_item_option WHERE order_item_id = ? ORDER BY id",
        )
        .bind(item.id)
        .fetch_all(&mut *conn)
        .await?;
        detailed.push(OrderItemDetail {
            item,
            options_selected,
        });
    }

    Ok(Some(OrderDetail {
        order,
        items: detailed,
    }))
}
