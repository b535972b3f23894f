use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument};

use hamlet_core::AppError;

use crate::utils::password::verify_password;
use crate::utils::token;

use super::model::{SessionRow, UserRow};

/// Sessions idle past this age are dropped by the reaper; the session
/// cookie carries the same max-age.
pub const SESSION_MAX_AGE_SECS: i64 = 24 * 60 * 60;

pub struct AuthService;

impl AuthService {
    /// Resolves a session token to its owning username.
    #[instrument(skip(db, token))]
    pub async fn find_user_by_session_token(
        db: &SqlitePool,
        token: &str,
    ) -> Result<Option<String>, AppError> {
        let username =
            sqlx::query_scalar::<_, String>("SELECT username FROM session WHERE token = ?")
                .bind(token)
                .fetch_optional(db)
                .await?;

        Ok(username)
    }

    /// Checks a username/password pair against the stored credentials.
    ///
    /// An unknown username and a wrong password both come back as `false`
    /// so callers cannot tell the two apart; only storage and stored-data
    /// defects surface as errors.
    #[instrument(skip_all)]
    pub async fn verify_login(
        db: &SqlitePool,
        username: &str,
        password: &str,
    ) -> Result<bool, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT username, password, salt FROM user WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(db)
        .await?;

        let Some(row) = row else {
            info!(username, "login: unknown username");
            return Ok(false);
        };

        let matched = verify_password(password, &row.password, &row.salt)?;
        if !matched {
            info!(username = %row.username, "login: incorrect password");
        }
        Ok(matched)
    }

    /// Mints a token and stores a new session row with both timestamps at
    /// now. Sessions from other devices stay untouched, so one user may
    /// hold several live rows.
    #[instrument(skip(db))]
    pub async fn create_session(db: &SqlitePool, username: &str) -> Result<SessionRow, AppError> {
        let token = token::mint();
        let now = Utc::now().timestamp();

        sqlx::query("INSERT INTO session (token, created, updated, username) VALUES (?, ?, ?, ?)")
            .bind(&token)
            .bind(now)
            .bind(now)
            .bind(username)
            .execute(db)
            .await?;

        Ok(SessionRow {
            token,
            created: now,
            updated: now,
            username: username.to_string(),
        })
    }

    /// Deletes every session owned by the user: global, all-device
    /// sign-out. Gives back the number of rows removed.
    #[instrument(skip(db))]
    pub async fn delete_sessions(db: &SqlitePool, username: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM session WHERE username = ?")
            .bind(username)
            .execute(db)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes sessions whose `updated` timestamp is older than the
    /// cutoff. The host runs this periodically.
    #[instrument(skip(db))]
    pub async fn reap_stale_sessions(db: &SqlitePool, max_age_secs: i64) -> Result<u64, AppError> {
        let cutoff = Utc::now().timestamp() - max_age_secs;
        let result = sqlx::query("DELETE FROM session WHERE updated < ?")
            .bind(cutoff)
            .execute(db)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::password::hash_password;

    async fn create_test_user(pool: &SqlitePool, username: &str, password: &str) {
        let record = hash_password(password).unwrap();
        sqlx::query("INSERT INTO user (username, password, salt) VALUES (?, ?, ?)")
            .bind(username)
            .bind(&record.digest)
            .bind(&record.salt)
            .execute(pool)
            .await
            .unwrap();
    }

    async fn session_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM session")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_verify_login_accepts_correct_credentials(pool: SqlitePool) {
        create_test_user(&pool, "alice", "correct-pw").await;

        assert!(AuthService::verify_login(&pool, "alice", "correct-pw").await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_verify_login_rejects_bad_credentials_identically(pool: SqlitePool) {
        create_test_user(&pool, "alice", "correct-pw").await;

        let wrong_password = AuthService::verify_login(&pool, "alice", "wrong-pw").await.unwrap();
        let unknown_user = AuthService::verify_login(&pool, "mallory", "correct-pw").await.unwrap();

        assert!(!wrong_password);
        assert!(!unknown_user);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_session_token_round_trip(pool: SqlitePool) {
        create_test_user(&pool, "alice", "pw").await;

        let session = AuthService::create_session(&pool, "alice").await.unwrap();
        assert_eq!(session.username, "alice");
        assert_eq!(session.created, session.updated);

        let found = AuthService::find_user_by_session_token(&pool, &session.token)
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("alice"));

        let missing = AuthService::find_user_by_session_token(&pool, "no-such-token")
            .await
            .unwrap();
        assert_eq!(missing, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_concurrent_sessions_get_independent_rows(pool: SqlitePool) {
        create_test_user(&pool, "alice", "pw").await;

        let first = AuthService::create_session(&pool, "alice").await.unwrap();
        let second = AuthService::create_session(&pool, "alice").await.unwrap();

        assert_ne!(first.token, second.token);
        assert_eq!(session_count(&pool).await, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_sessions_is_global_per_user(pool: SqlitePool) {
        create_test_user(&pool, "alice", "pw").await;
        create_test_user(&pool, "bob", "pw").await;
        AuthService::create_session(&pool, "alice").await.unwrap();
        AuthService::create_session(&pool, "alice").await.unwrap();
        let bob = AuthService::create_session(&pool, "bob").await.unwrap();

        let removed = AuthService::delete_sessions(&pool, "alice").await.unwrap();

        assert_eq!(removed, 2);
        assert_eq!(session_count(&pool).await, 1);
        let found = AuthService::find_user_by_session_token(&pool, &bob.token)
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("bob"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_reaper_drops_only_stale_sessions(pool: SqlitePool) {
        create_test_user(&pool, "alice", "pw").await;
        let fresh = AuthService::create_session(&pool, "alice").await.unwrap();

        let long_ago = Utc::now().timestamp() - 2 * SESSION_MAX_AGE_SECS;
        sqlx::query("INSERT INTO session (token, created, updated, username) VALUES (?, ?, ?, ?)")
            .bind("stale-token")
            .bind(long_ago)
            .bind(long_ago)
            .bind("alice")
            .execute(&pool)
            .await
            .unwrap();

        let removed = AuthService::reap_stale_sessions(&pool, SESSION_MAX_AGE_SECS)
            .await
            .unwrap();

        assert_eq!(removed, 1);
        let found = AuthService::find_user_by_session_token(&pool, &fresh.token)
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("alice"));
    }
}
