use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::store::{
    error::Result,
    types::{NewPayment, Payment, PaymentStatus},
};

const PAYMENT_COLUMNS: &str =
    "id, user_id, stripe_payment_intent_id, amount_cents, currency, status, created_at";

fn parse_payment_row(row: &Row) -> Result<Payment> {
    let status: String = row.try_get("status")?;
    Ok(Payment {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        stripe_payment_intent_id: row.try_get("stripe_payment_intent_id")?,
        amount_cents: row.try_get("amount_cents")?,
        currency: row.try_get("currency")?,
        status: status.parse::<PaymentStatus>()?,
        created_at: row.try_get("created_at")?,
    })
}

pub async fn create_payment(pool: &Pool, payment: NewPayment) -> Result<Payment> {
    let conn = pool.get().await?;
    let sql = format!(
        "INSERT INTO payments (user_id, stripe_payment_intent_id, amount_cents, currency, status) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {}",
        PAYMENT_COLUMNS
    );
    let row = conn
        .query_one(
            &sql,
            &[
                &payment.user_id,
                &payment.stripe_payment_intent_id,
                &payment.amount_cents,
                &payment.currency,
                &PaymentStatus::Pending.as_str(),
            ],
        )
        .await?;
    parse_payment_row(&row)
}

pub async fn find_payment(pool: &Pool, payment_intent_id: &str) -> Result<Option<Payment>> {
    let conn = pool.get().await?;
    let sql = format!(
        "SELECT {} FROM payments WHERE stripe_payment_intent_id = $1",
        PAYMENT_COLUMNS
    );
    let row = conn.query_opt(&sql, &[&payment_intent_id]).await?;
    row.as_ref().map(parse_payment_row).transpose()
}

pub async fn update_payment_status(
    pool: &Pool,
    payment_intent_id: &str,
    status: PaymentStatus,
) -> Result<Option<Payment>> {
    let conn = pool.get().await?;
    let sql = format!(
        "UPDATE payments SET status = $2 WHERE stripe_payment_intent_id = $1 RETURNING {}",
        PAYMENT_COLUMNS
    );
    let row = conn
        .query_opt(&sql, &[&payment_intent_id, &status.as_str()])
        .await?;
    row.as_ref().map(parse_payment_row).transpose()
}
