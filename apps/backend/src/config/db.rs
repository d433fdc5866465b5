use std::env;

use crate::error::AppError;

/// Which database a connection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbProfile {
    /// `PROD_DB`
    Prod,
    /// `TEST_DB`, which must end with `_test`
    Test,
}

/// Which credentials a connection uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOwner {
    /// Application role: reads and writes rows only
    App,
    /// Schema owner: used by migrations
    Owner,
}

/// Postgres connection settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl PgSettings {
    pub fn from_env(profile: DbProfile, owner: DbOwner) -> Result<Self, AppError> {
        let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port_raw = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
        let port = port_raw.parse::<u16>().map_err(|_| {
            AppError::config(format!(
                "POSTGRES_PORT must be a valid port number, got '{port_raw}'"
            ))
        })?;

        let database = match profile {
            DbProfile::Prod => must_var("PROD_DB")?,
            DbProfile::Test => {
                let name = must_var("TEST_DB")?;
                if !name.ends_with("_test") {
                    return Err(AppError::config(format!(
                        "Test profile requires database name to end with '_test', but got: '{name}'"
                    )));
                }
                name
            }
        };

        let (user, password) = match owner {
            DbOwner::App => (must_var("APP_DB_USER")?, must_var("APP_DB_PASSWORD")?),
            DbOwner::Owner => (
                must_var("TOURNEY_OWNER_USER")?,
                must_var("TOURNEY_OWNER_PASSWORD")?,
            ),
        };

        Ok(Self {
            host,
            port,
            database,
            user,
            password,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// Builds a database URL from environment variables based on profile and owner
pub fn db_url(profile: DbProfile, owner: DbOwner) -> Result<String, AppError> {
    Ok(PgSettings::from_env(profile, owner)?.url())
}

fn must_var(name: &str) -> Result<String, AppError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::config(format!(
            "Required environment variable '{name}' is not set"
        ))),
    }
}
