use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::store::{
    error::{Error, Result},
    types::{NewUser, ProfileUpdate, User},
};

const USER_COLUMNS: &str = "id, email, username, hashed_password, full_name, is_active, \
                            is_premium, subscription_id, created_at, updated_at";

pub(crate) fn parse_user_row(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        hashed_password: row.try_get("hashed_password")?,
        full_name: row.try_get("full_name")?,
        is_active: row.try_get("is_active")?,
        is_premium: row.try_get("is_premium")?,
        subscription_id: row.try_get("subscription_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Insert a user
///
/// # Errors
///
/// * `Error::ConflictError` - the email or username is already taken
pub async fn create_user(pool: &Pool, user: NewUser) -> Result<User> {
    let conn = pool.get().await?;
    let sql = format!(
        "INSERT INTO users (email, username, hashed_password, full_name) \
         VALUES ($1, $2, $3, $4) RETURNING {}",
        USER_COLUMNS
    );
    let row = conn
        .query_one(
            &sql,
            &[&user.email, &user.username, &user.hashed_password, &user.full_name],
        )
        .await?;
    parse_user_row(&row)
}

pub async fn get_user(pool: &Pool, user_id: i64) -> Result<Option<User>> {
    let conn = pool.get().await?;
    let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    let row = conn.query_opt(&sql, &[&user_id]).await?;
    row.as_ref().map(parse_user_row).transpose()
}

/// Find a user whose username or email matches `login`
pub async fn find_user_by_login(pool: &Pool, login: &str) -> Result<Option<User>> {
    let conn = pool.get().await?;
    let sql = format!(
        "SELECT {} FROM users WHERE username = $1 OR lower(email) = lower($1) \
         ORDER BY (username = $1) DESC LIMIT 1",
        USER_COLUMNS
    );
    let row = conn.query_opt(&sql, &[&login]).await?;
    row.as_ref().map(parse_user_row).transpose()
}

pub async fn update_profile(pool: &Pool, user_id: i64, update: ProfileUpdate) -> Result<User> {
    let conn = pool.get().await?;
    let sql = format!(
        "UPDATE users SET full_name = COALESCE($2, full_name), email = COALESCE($3, email), \
         updated_at = now() WHERE id = $1 RETURNING {}",
        USER_COLUMNS
    );
    let row = conn
        .query_opt(&sql, &[&user_id, &update.full_name, &update.email])
        .await?
        .ok_or_else(|| Error::NotFoundError(format!("user {}", user_id)))?;
    parse_user_row(&row)
}

pub async fn grant_premium(pool: &Pool, user_id: i64, subscription_id: &str) -> Result<()> {
    let conn = pool.get().await?;
    let updated = conn
        .execute(
            "UPDATE users SET is_premium = TRUE, subscription_id = $2, updated_at = now() \
             WHERE id = $1",
            &[&user_id, &subscription_id],
        )
        .await?;
    if updated == 0 {
        return Err(Error::NotFoundError(format!("user {}", user_id)));
    }
    Ok(())
}

/// Delete a user; conversations, messages and payments go with it
pub async fn delete_user(pool: &Pool, user_id: i64) -> Result<bool> {
    let conn = pool.get().await?;
    let deleted = conn.execute("DELETE FROM users WHERE id = $1", &[&user_id]).await?;
    Ok(deleted > 0)
}
