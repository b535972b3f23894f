//! Administrative commands behind the `hamlet-cli` binary. Accounts are
//! created here only; the web surface has no self-registration.

use sqlx::SqlitePool;

use hamlet_core::identity::ANONYMOUS_USERNAME;

use crate::utils::password::hash_password;

/// Creates a user account with a freshly salted password digest.
pub async fn add_user(
    db: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if username.is_empty() {
        return Err("Username must not be empty".into());
    }
    if username == ANONYMOUS_USERNAME {
        return Err("Username \"anon\" is reserved for the anonymous sentinel".into());
    }

    let record =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let result = sqlx::query(
        "INSERT INTO user (username, password, salt)
         VALUES (?, ?, ?)
         ON CONFLICT (username) DO NOTHING",
    )
    .bind(username)
    .bind(&record.digest)
    .bind(&record.salt)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this username already exists".into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::service::AuthService;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_add_user_roundtrip(pool: SqlitePool) {
        add_user(&pool, "alice", "correct-pw").await.unwrap();

        assert!(AuthService::verify_login(&pool, "alice", "correct-pw").await.unwrap());
        assert!(!AuthService::verify_login(&pool, "alice", "wrong-pw").await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_add_user_rejects_duplicates_and_reserved_names(pool: SqlitePool) {
        add_user(&pool, "alice", "pw").await.unwrap();

        assert!(add_user(&pool, "alice", "pw").await.is_err());
        assert!(add_user(&pool, "anon", "pw").await.is_err());
        assert!(add_user(&pool, "", "pw").await.is_err());
    }
}
