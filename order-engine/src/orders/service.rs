//! Order Service
//!
//! The orchestrator behind the three public operations: quote a cart,
//! place an order, move an order through its lifecycle.
//!
//! Placement runs as one transaction: re-pricing, customer resolution,
//! point debit and the order/item/option snapshots commit together.
//! Table occupancy and the staff notification run after the commit as
//! separate statements; completion reconciles the table and the loyalty
//! ledger in its own transaction.

use crate::core::Config;
use crate::db::repository::{customer, dining_table, order, product};
use crate::pricing::{PricingEngine, calculator};
use crate::services::Notifier;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_quantity, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::message::BusEvent;
use shared::models::{
    Customer, Order, OrderDetail, OrderItem, OrderItemOption, OrderStatus, OrderRequest,
    PriceBreakdown, QuoteRequest, TableStatus,
};
use sqlx::SqlitePool;
use std::collections::HashSet;

/// Order Service - places orders and reconciles completion
#[derive(Clone, Debug)]
pub struct OrderService {
    pool: SqlitePool,
    engine: PricingEngine,
    notifier: Notifier,
    point_redeem_rate: i64,
    point_earn_rate: i64,
}

impl OrderService {
    pub fn new(pool: SqlitePool, notifier: Notifier, config: &Config) -> Self {
        Self {
            engine: PricingEngine::new(pool.clone(), config),
            pool,
            notifier,
            point_redeem_rate: config.point_redeem_rate,
            point_earn_rate: config.point_earn_rate,
        }
    }

    /// Compute a price breakdown without persisting anything
    pub async fn quote(&self, request: &QuoteRequest) -> AppResult<PriceBreakdown> {
        self.engine.quote(request).await
    }

    /// Place an order.
    ///
    /// Re-prices the cart, resolves (or silently registers) the customer,
    /// debits redeemed points and persists the order with its item and
    /// option snapshots, all in one transaction. Then flips the table to
    /// OCCUPIED and broadcasts a `new_order` event.
    pub async fn place_order(&self, request: &OrderRequest) -> AppResult<OrderDetail> {
        validate_order_request(request)?;

        let mut tx = self.pool.begin().await?;

        // 1. Recompute the breakdown on this transaction; client-supplied
        //    totals are never trusted
        let breakdown = self
            .engine
            .quote_with(&mut tx, &request.as_quote())
            .await?;

        // 2. Resolve customer by phone, silent registration on first contact
        let resolved: Option<Customer> = if !request.customer_phone.trim().is_empty() {
            match customer::find_by_phone(&mut *tx, &request.customer_phone).await? {
                Some(found) => Some(found),
                None => Some(
                    customer::create_silent(
                        &mut *tx,
                        &request.customer_name,
                        &request.customer_phone,
                    )
                    .await?,
                ),
            }
        } else {
            None
        };

        // 3. Debit redeemed points; a lost CAS race aborts the placement
        if breakdown.points_discount > 0
            && let Some(found) = &resolved
        {
            let points_used =
                calculator::points_to_debit(breakdown.points_discount, self.point_redeem_rate);
            let applied = customer::debit_points(&mut *tx, found.id, points_used).await?;
            if !applied {
                return Err(AppError::conflict(format!(
                    "Points of customer {} were already spent by a concurrent order",
                    found.id
                )));
            }
        }

        // 4. Persist the order row
        let now = shared::util::now_millis();
        let new_order = Order {
            id: shared::util::snowflake_id(),
            customer_name: request.customer_name.clone(),
            customer_phone: request.customer_phone.clone(),
            customer_address: request.customer_address.clone(),
            customer_note: request.customer_note.clone(),
            customer_id: resolved.as_ref().map(|c| c.id),
            table_id: request.table_id,
            sub_total: breakdown.sub_total,
            delivery_fee: breakdown.delivery_fee,
            discount_amount: breakdown.discount_amount,
            points_discount: breakdown.points_discount,
            total_amount: breakdown.total_amount,
            status: OrderStatus::New,
            payment_method: request.payment_method,
            delivery_method: request.delivery_method,
            voucher_code: request.voucher_code.clone(),
            created_at: now,
            updated_at: now,
        };
        order::insert(&mut *tx, &new_order).await?;

        // 5. Re-walk the cart and snapshot items + selected options.
        //    Runs on the same transaction as the pricing read, so the
        //    persisted subtotal always matches the persisted items.
        for line in &request.items {
            let item = self.snapshot_line(&mut tx, new_order.id, line).await?;
            tracing::debug!(order_id = new_order.id, product = %item.product_name, "Item snapshotted");
        }

        tx.commit().await?;

        // 6. Occupy the table as a separate statement; a failure here leaves
        //    the committed order without the table flip
        if let Some(table_id) = request.table_id {
            dining_table::set_status(&self.pool, table_id, TableStatus::Occupied).await?;
        }

        // 7. Notify staff
        self.notifier.publish(BusEvent::NewOrder {
            order_id: new_order.id,
            customer_name: new_order.customer_name.clone(),
            table_id: new_order.table_id,
            total_amount: new_order.total_amount,
            timestamp: now,
        });

        tracing::info!(
            order_id = new_order.id,
            total_amount = new_order.total_amount,
            "Order placed"
        );

        let mut conn = self.pool.acquire().await?;
        order::find_detail(&mut conn, new_order.id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Order {} missing after commit", new_order.id)))
    }

    /// Snapshot one cart line into order_item + order_item_option rows.
    ///
    /// The product and every option value are re-fetched; a missing
    /// reference aborts the transaction instead of silently dropping a
    /// line the customer is paying for.
    async fn snapshot_line(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        order_id: i64,
        line: &shared::models::CartLine,
    ) -> AppResult<OrderItem> {
        let db_product = product::find_by_id(&mut **tx, line.product_id)
            .await?
            .ok_or_else(|| AppError::validation(format!("Product {} not found", line.product_id)))?;

        let values = product::find_option_values(&mut **tx, &line.options).await?;
        let unique: HashSet<i64> = line.options.iter().copied().collect();
        if values.len() != unique.len() {
            return Err(AppError::validation(format!(
                "Cart line for product {} references a missing option value",
                line.product_id
            )));
        }

        let mut item_price = db_product.base_price;
        let mut option_snapshots = Vec::with_capacity(values.len());
        for value in &values {
            item_price += value.price_adjustment;
            let group = product::find_option_group(&mut **tx, value.option_group_id).await?;
            option_snapshots.push((
                group.map(|g| g.name).unwrap_or_else(|| "Option".to_string()),
                value.name.clone(),
                value.price_adjustment,
            ));
        }

        let item = OrderItem {
            id: shared::util::snowflake_id(),
            order_id,
            product_id: Some(db_product.id),
            product_name: db_product.name,
            quantity: line.quantity,
            item_price,
            item_note: line.note.clone(),
            ordered_by: line.ordered_by.clone(),
        };
        order::insert_item(&mut **tx, &item).await?;

        for (option_name, value_name, added_price) in option_snapshots {
            let snapshot = OrderItemOption {
                id: shared::util::snowflake_id(),
                order_item_id: item.id,
                option_name,
                value_name,
                added_price,
            };
            order::insert_item_option(&mut **tx, &snapshot).await?;
        }

        Ok(item)
    }

    /// Write a new order status.
    ///
    /// The COMPLETED target routes through [`Self::complete_order`]; every
    /// other status is a pure write with no side effects and no transition
    /// matrix.
    pub async fn update_status(&self, order_id: i64, status: OrderStatus) -> AppResult<Order> {
        if status == OrderStatus::Completed {
            return self.complete_order(order_id).await;
        }
        let mut conn = self.pool.acquire().await?;
        let updated = order::update_status(&mut conn, order_id, status).await?;
        tracing::info!(order_id, status = ?status, "Order status updated");
        Ok(updated)
    }

    /// Complete an order: release its table and credit loyalty points.
    ///
    /// Idempotent: completing an already-completed order returns it
    /// unchanged so the point credit cannot run twice.
    pub async fn complete_order(&self, order_id: i64) -> AppResult<Order> {
        let mut tx = self.pool.begin().await?;

        let existing = order::find_by_id(&mut *tx, order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;
        if existing.status == OrderStatus::Completed {
            return Ok(existing);
        }

        let completed = order::update_status(&mut tx, order_id, OrderStatus::Completed).await?;

        // Release the table
        if let Some(table_id) = completed.table_id {
            dining_table::set_status(&mut *tx, table_id, TableStatus::Empty).await?;
        }

        // Accrue points and lifetime stats
        if let Some(customer_id) = completed.customer_id {
            let earned = calculator::points_earned(completed.total_amount, self.point_earn_rate);
            customer::record_completed_order(&mut *tx, customer_id, completed.total_amount, earned)
                .await?;
            tracing::info!(order_id, customer_id, earned, "Loyalty points accrued");
        }

        tx.commit().await?;
        tracing::info!(order_id, "Order completed");
        Ok(completed)
    }

    /// Load an order with items and options
    pub async fn get_order(&self, order_id: i64) -> AppResult<OrderDetail> {
        let mut conn = self.pool.acquire().await?;
        order::find_detail(&mut conn, order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))
    }

    /// List orders for the staff board, newest first
    pub async fn list_orders(&self, limit: i64, offset: i64) -> AppResult<Vec<Order>> {
        let orders = order::find_all(&self.pool, limit, offset).await?;
        Ok(orders)
    }
}

/// Reject malformed placement input before anything is persisted
fn validate_order_request(request: &OrderRequest) -> AppResult<()> {
    if request.items.is_empty() {
        return Err(AppError::validation("Order must contain at least one item"));
    }
    validate_required_text(&request.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_required_text(&request.customer_address, "customer_address", MAX_ADDRESS_LEN)?;
    if request.customer_phone.len() > MAX_SHORT_TEXT_LEN {
        return Err(AppError::validation(format!(
            "customer_phone is too long ({} chars, max {MAX_SHORT_TEXT_LEN})",
            request.customer_phone.len()
        )));
    }
    validate_optional_text(&request.customer_note, "customer_note", MAX_NOTE_LEN)?;
    validate_optional_text(&request.voucher_code, "voucher_code", MAX_SHORT_TEXT_LEN)?;
    for line in &request.items {
        validate_quantity(line.quantity)?;
        validate_optional_text(&line.note, "item note", MAX_NOTE_LEN)?;
        validate_optional_text(&line.ordered_by, "ordered_by", MAX_NAME_LEN)?;
    }
    Ok(())
}
