pub(crate) mod event;
pub(crate) mod help;
pub(crate) mod knowledge;
pub(crate) mod post;
pub(crate) mod task;
pub(crate) mod user;

#[cfg(test)]
pub(crate) mod fixtures {
    use sqlx::postgres::PgRow;
    use sqlx::{PgPool, Row};

    /// Inserts a member directly, without hashing a password.
    pub(crate) async fn member(pool: &PgPool, email: &str) -> i32 {
        sqlx::query(
            "INSERT INTO users (name, surname, email, password_hash)
            VALUES ('Ada', 'Lovelace', $1, 'unused')
            RETURNING id;",
        )
        .bind(email)
        .map(|row: PgRow| row.get("id"))
        .fetch_one(pool)
        .await
        .unwrap()
    }
}
