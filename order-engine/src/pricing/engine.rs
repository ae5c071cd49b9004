//! Pricing Engine
//!
//! Resolves a cart against the live catalog and produces a price
//! breakdown. Safe to call repeatedly: reads only, nothing persisted.

use crate::core::Config;
use crate::db::repository::{customer, product, voucher};
use crate::utils::{AppError, AppResult, validation};
use shared::models::{DeliveryMethod, PriceBreakdown, QuoteRequest};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashSet;

use super::calculator;

/// Pricing Engine - computes breakdowns from cart descriptions
#[derive(Clone, Debug)]
pub struct PricingEngine {
    pool: SqlitePool,
    express_delivery_fee: i64,
    point_redeem_rate: i64,
}

impl PricingEngine {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            express_delivery_fee: config.express_delivery_fee,
            point_redeem_rate: config.point_redeem_rate,
        }
    }

    /// Compute a price breakdown for a cart.
    ///
    /// Idempotent against unchanged catalog/voucher/customer state.
    pub async fn quote(&self, request: &QuoteRequest) -> AppResult<PriceBreakdown> {
        let mut conn = self.pool.acquire().await?;
        self.quote_with(&mut conn, request).await
    }

    /// Compute a breakdown on a specific connection.
    ///
    /// The order orchestrator calls this inside its placement transaction
    /// so the prices it persists are the prices it read.
    pub(crate) async fn quote_with(
        &self,
        conn: &mut SqliteConnection,
        request: &QuoteRequest,
    ) -> AppResult<PriceBreakdown> {
        // A. Items: unit price = catalog base price + selected option deltas
        let mut sub_total: i64 = 0;
        for line in &request.items {
            validation::validate_quantity(line.quantity)?;

            let product = product::find_by_id(&mut *conn, line.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::validation(format!("Product {} not found", line.product_id))
                })?;

            let mut unit_price = product.base_price;
            if !line.options.is_empty() {
                let values = product::find_option_values(&mut *conn, &line.options).await?;
                let unique: HashSet<i64> = line.options.iter().copied().collect();
                if values.len() != unique.len() {
                    let found: HashSet<i64> = values.iter().map(|v| v.id).collect();
                    let missing = unique
                        .iter()
                        .find(|id| !found.contains(*id))
                        .copied()
                        .unwrap_or_default();
                    return Err(AppError::validation(format!(
                        "Option value {missing} not found"
                    )));
                }
                for value in &values {
                    unit_price += value.price_adjustment;
                }
            }

            sub_total += unit_price * line.quantity;
        }

        // B. Delivery fee: only the express tier carries a surcharge
        let delivery_fee = if request.delivery_method == DeliveryMethod::Express {
            self.express_delivery_fee
        } else {
            0
        };

        // C. Voucher: unknown code or unmet minimum is a silent zero
        let mut discount_amount: i64 = 0;
        if let Some(code) = request.voucher_code.as_deref()
            && !code.is_empty()
            && let Some(voucher) = voucher::find_active_by_code(&mut *conn, code).await?
        {
            discount_amount = calculator::voucher_discount(&voucher, sub_total);
        }

        // D. Loyalty points, capped at the amount still owed
        let mut points_discount: i64 = 0;
        let mut user_points: i64 = 0;
        if let Some(phone) = request.customer_phone.as_deref()
            && !phone.is_empty()
            && let Some(found) = customer::find_by_phone(&mut *conn, phone).await?
        {
            user_points = found.points;
            if request.use_points && user_points > 0 {
                let due = sub_total + delivery_fee - discount_amount;
                points_discount =
                    calculator::points_redemption(user_points, self.point_redeem_rate, due);
            }
        }

        let total_amount =
            calculator::order_total(sub_total, delivery_fee, discount_amount, points_discount);

        Ok(PriceBreakdown {
            sub_total,
            delivery_fee,
            discount_amount,
            points_discount,
            total_amount,
            user_points_available: user_points,
            can_use_points: user_points > 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::CartLine;

    async fn test_engine() -> PricingEngine {
        let pool = DbService::in_memory().await.unwrap().pool;

        // Catalog: milk tea 30000 with topping options, coffee 25000
        sqlx::query("INSERT INTO product (id, name, base_price) VALUES (1, 'Milk Tea', 30000)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO product (id, name, base_price) VALUES (2, 'Coffee', 25000)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO option_group (id, name) VALUES (10, 'Toppings')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO option_value (id, option_group_id, name, price_adjustment) VALUES (101, 10, 'Pearls', 5000)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO option_value (id, option_group_id, name, price_adjustment) VALUES (102, 10, 'Pudding', 7000)")
            .execute(&pool)
            .await
            .unwrap();

        PricingEngine::new(pool, &Config::with_database_path(":memory:"))
    }

    fn line(product_id: i64, quantity: i64, options: Vec<i64>) -> CartLine {
        CartLine {
            product_id,
            quantity,
            options,
            note: None,
            ordered_by: None,
        }
    }

    fn quote_request(items: Vec<CartLine>) -> QuoteRequest {
        QuoteRequest {
            items,
            voucher_code: None,
            delivery_method: DeliveryMethod::DineIn,
            customer_phone: None,
            use_points: false,
        }
    }

    #[tokio::test]
    async fn test_plain_cart_total_equals_subtotal() {
        let engine = test_engine().await;
        let breakdown = engine
            .quote(&quote_request(vec![line(1, 2, vec![])]))
            .await
            .unwrap();
        assert_eq!(breakdown.sub_total, 60000);
        assert_eq!(breakdown.delivery_fee, 0);
        assert_eq!(breakdown.total_amount, 60000);
    }

    #[tokio::test]
    async fn test_options_add_to_unit_price() {
        let engine = test_engine().await;
        // (30000 + 5000 + 7000) * 2 = 84000
        let breakdown = engine
            .quote(&quote_request(vec![line(1, 2, vec![101, 102])]))
            .await
            .unwrap();
        assert_eq!(breakdown.sub_total, 84000);
    }

    #[tokio::test]
    async fn test_only_express_carries_delivery_fee() {
        let engine = test_engine().await;
        for (method, expected_fee) in [
            (DeliveryMethod::DineIn, 0),
            (DeliveryMethod::Takeaway, 0),
            (DeliveryMethod::Standard, 0),
            (DeliveryMethod::Express, 15000),
        ] {
            let mut request = quote_request(vec![line(2, 1, vec![])]);
            request.delivery_method = method;
            let breakdown = engine.quote(&request).await.unwrap();
            assert_eq!(breakdown.delivery_fee, expected_fee);
            assert_eq!(breakdown.total_amount, 25000 + expected_fee);
        }
    }

    #[tokio::test]
    async fn test_unknown_product_is_validation_error() {
        let engine = test_engine().await;
        let err = engine.quote(&quote_request(vec![line(999, 1, vec![])])).await;
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_option_value_is_validation_error() {
        let engine = test_engine().await;
        let err = engine
            .quote(&quote_request(vec![line(1, 1, vec![101, 999])]))
            .await;
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_cart_quotes_zero() {
        let engine = test_engine().await;
        let breakdown = engine.quote(&quote_request(vec![])).await.unwrap();
        assert_eq!(breakdown.sub_total, 0);
        assert_eq!(breakdown.total_amount, 0);
    }

    #[tokio::test]
    async fn test_voucher_applies_when_minimum_met() {
        let engine = test_engine().await;
        sqlx::query("INSERT INTO voucher (id, code, discount_type, value, min_order_value) VALUES (1, 'GIAM10K', 'FIXED', 10000, 50000)")
            .execute(&engine.pool)
            .await
            .unwrap();

        // 60000 >= 50000 → discount applies
        let mut request = quote_request(vec![line(1, 2, vec![])]);
        request.voucher_code = Some("GIAM10K".to_string());
        let breakdown = engine.quote(&request).await.unwrap();
        assert_eq!(breakdown.discount_amount, 10000);
        assert_eq!(breakdown.total_amount, 50000);

        // 30000 < 50000 → silent zero
        let mut request = quote_request(vec![line(1, 1, vec![])]);
        request.voucher_code = Some("GIAM10K".to_string());
        let breakdown = engine.quote(&request).await.unwrap();
        assert_eq!(breakdown.discount_amount, 0);
        assert_eq!(breakdown.total_amount, 30000);
    }

    #[tokio::test]
    async fn test_unknown_voucher_is_silent_zero() {
        let engine = test_engine().await;
        let mut request = quote_request(vec![line(1, 1, vec![])]);
        request.voucher_code = Some("NOPE".to_string());
        let breakdown = engine.quote(&request).await.unwrap();
        assert_eq!(breakdown.discount_amount, 0);
    }

    #[tokio::test]
    async fn test_inactive_voucher_is_silent_zero() {
        let engine = test_engine().await;
        sqlx::query("INSERT INTO voucher (id, code, discount_type, value, is_active) VALUES (1, 'OLD', 'FIXED', 10000, 0)")
            .execute(&engine.pool)
            .await
            .unwrap();
        let mut request = quote_request(vec![line(1, 2, vec![])]);
        request.voucher_code = Some("OLD".to_string());
        let breakdown = engine.quote(&request).await.unwrap();
        assert_eq!(breakdown.discount_amount, 0);
    }

    #[tokio::test]
    async fn test_points_redemption_requires_opt_in() {
        let engine = test_engine().await;
        sqlx::query("INSERT INTO customer (id, full_name, phone, points, created_at, updated_at) VALUES (1, 'Ana', '0988888888', 100, 0, 0)")
            .execute(&engine.pool)
            .await
            .unwrap();

        // Phone given but use_points = false: balance reported, no discount
        let mut request = quote_request(vec![line(1, 2, vec![])]);
        request.customer_phone = Some("0988888888".to_string());
        let breakdown = engine.quote(&request).await.unwrap();
        assert_eq!(breakdown.points_discount, 0);
        assert_eq!(breakdown.user_points_available, 100);
        assert!(breakdown.can_use_points);

        // Opted in: 100 points * 500 = 50000, capped at 60000 due
        request.use_points = true;
        let breakdown = engine.quote(&request).await.unwrap();
        assert_eq!(breakdown.points_discount, 50000);
        assert_eq!(breakdown.total_amount, 10000);
    }

    #[tokio::test]
    async fn test_points_capped_at_amount_due() {
        let engine = test_engine().await;
        // 1000 points = 500000 redeemable, far above the 25000 due
        sqlx::query("INSERT INTO customer (id, full_name, phone, points, created_at, updated_at) VALUES (1, 'Ana', '0911', 1000, 0, 0)")
            .execute(&engine.pool)
            .await
            .unwrap();
        let mut request = quote_request(vec![line(2, 1, vec![])]);
        request.customer_phone = Some("0911".to_string());
        request.use_points = true;
        let breakdown = engine.quote(&request).await.unwrap();
        assert_eq!(breakdown.points_discount, 25000);
        assert_eq!(breakdown.total_amount, 0);
    }

    #[tokio::test]
    async fn test_unknown_phone_reports_no_points() {
        let engine = test_engine().await;
        let mut request = quote_request(vec![line(1, 1, vec![])]);
        request.customer_phone = Some("0000000000".to_string());
        request.use_points = true;
        let breakdown = engine.quote(&request).await.unwrap();
        assert_eq!(breakdown.points_discount, 0);
        assert_eq!(breakdown.user_points_available, 0);
        assert!(!breakdown.can_use_points);
    }

    #[tokio::test]
    async fn test_quote_is_idempotent() {
        let engine = test_engine().await;
        sqlx::query("INSERT INTO voucher (id, code, discount_type, value, min_order_value, max_discount) VALUES (1, 'PCT20', 'PERCENTAGE', 20, 0, 10000)")
            .execute(&engine.pool)
            .await
            .unwrap();
        let mut request = quote_request(vec![line(1, 2, vec![101])]);
        request.voucher_code = Some("PCT20".to_string());
        request.delivery_method = DeliveryMethod::Express;

        let first = engine.quote(&request).await.unwrap();
        let second = engine.quote(&request).await.unwrap();
        assert_eq!(first, second);
    }
}
