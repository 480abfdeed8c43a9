use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                DatabaseError::Duplicate
            }
            sqlx::Error::Database(ref db_err)
                if db_err.is_check_violation() || db_err.is_foreign_key_violation() =>
            {
                DatabaseError::InvalidInput(db_err.message().to_string())
            }
            other => DatabaseError::Sqlx(other),
        }
    }
}

pub type DbResult<T> = Result<T, DatabaseError>;
