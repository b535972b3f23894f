use serde::Deserialize;

// Login form fields, straight from the POST body
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// Credential columns of one user account
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub username: String,
    pub password: String,
    pub salt: String,
}

// One row of the session store
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRow {
    pub token: String,
    /// Unix seconds, UTC.
    pub created: i64,
    /// Unix seconds, UTC. The reaper drops rows idle past the cutoff.
    pub updated: i64,
    pub username: String,
}
