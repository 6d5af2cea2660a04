//! Products service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product with name '{name}' already exists")]
    AlreadyExists { name: String },

    #[error("storage error")]
    Sql(#[from] Error),
}

impl ProductsServiceError {
    /// Classify an error raised while writing a product named `name`.
    ///
    /// A unique violation means another writer claimed the name between the
    /// pre-check and the write.
    pub(crate) fn from_write(error: Error, name: &str) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists {
                name: name.to_owned(),
            },
            _ => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_stay_storage_errors() {
        let error = ProductsServiceError::from_write(Error::RowNotFound, "Widget");

        assert!(
            matches!(error, ProductsServiceError::Sql(Error::RowNotFound)),
            "expected Sql, got {error:?}"
        );
    }

    #[test]
    fn already_exists_names_the_product() {
        let error = ProductsServiceError::AlreadyExists {
            name: "Widget".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "product with name 'Widget' already exists"
        );
    }
}
