//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use catalog_app::domain::products::ProductsServiceError;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::AlreadyExists { name } => StatusError::conflict()
            .brief("Product already exists")
            .detail(format!("Product with name '{name}' already exists.")),
        ProductsServiceError::Sql(source) => {
            error!("product storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn not_found() -> StatusError {
    StatusError::not_found().brief("Product not found.")
}
