// Copyright 2023 Remi Bernotavicius

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("no {entity} with id {id}")]
    NotFound { entity: &'static str, id: i32 },

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("failed to open database: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("failed to run migrations: {0}")]
    Migration(Box<dyn std::error::Error + Send + Sync + 'static>),
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn validate_name(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(format!("{what} name must not be empty")));
    }
    Ok(())
}

pub fn validate_amount(name: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::Validation(format!(
            "amount for {name:?} must be a positive number, got {amount}"
        )));
    }
    Ok(())
}
