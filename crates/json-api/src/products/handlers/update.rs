//! Update Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use catalog_app::domain::products::{data::ProductUpdate, records::ProductId};

use crate::{
    extensions::*,
    products::{
        errors::{into_status_error, not_found},
        get::ProductResponse,
        requests::UpdateProductRequest,
    },
    state::State,
};

/// Product Update Handler
///
/// Applies a partial update; omitted or `null` fields are left unchanged.
#[endpoint(
    tags("products"),
    summary = "Update Product",
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::CONFLICT, description = "Product name already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid product payload"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(id, req, depot),
    fields(
        product_id = tracing::field::Empty,
        fields_supplied = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = ProductId::from_i64(id.into_inner());

    let request = req
        .parse_json::<UpdateProductRequest>()
        .await
        .or_422("Invalid JSON body")?;

    let update = ProductUpdate::validate(request.into()).or_422("Invalid product payload")?;

    let span = tracing::Span::current();

    span.record("product_id", tracing::field::display(product));
    span.record("fields_supplied", !update.is_empty());

    let updated = state
        .app
        .products
        .update_product(product, update)
        .await
        .map_err(into_status_error)?
        .ok_or_else(not_found)?;

    Ok(Json(updated.into()))
}
