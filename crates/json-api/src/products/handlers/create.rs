//! Create Product Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, prelude::*};

use catalog_app::domain::products::data::NewProduct;

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse, requests::CreateProductRequest},
    state::State,
};

/// Create Product Handler
///
/// Expects a JSON body with `name`, `price` and an optional `description`.
#[endpoint(
    tags("products"),
    summary = "Create Product",
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::CONFLICT, description = "Product name already exists"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid product payload"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = req
        .parse_json::<CreateProductRequest>()
        .await
        .or_422("Invalid JSON body")?;

    let product = NewProduct::validate(request.into()).or_422("Invalid product payload")?;

    let created = state
        .app
        .products
        .create_product(product)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/products/{}", created.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(created.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use catalog_app::domain::products::{
        MockProductsService, ProductsServiceError, data::CreateProductInput,
    };

    use crate::test_helpers::{make_product, price, products_service};

    use super::*;

    fn make_service(repo: MockProductsService) -> Service {
        products_service(repo, Router::with_path("products").post(handler))
    }

    fn create_only(repo: &mut MockProductsService) {
        repo.expect_get_product().never();
        repo.expect_list_products().never();
        repo.expect_update_product().never();
        repo.expect_delete_product().never();
    }

    fn widget() -> TestResult<NewProduct> {
        Ok(NewProduct::validate(CreateProductInput {
            name: Some("Widget".to_string()),
            description: None,
            price: Some(price("9.99")),
        })?)
    }

    #[tokio::test]
    async fn test_create_product_success() -> TestResult {
        let expected = widget()?;
        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .withf(move |new| *new == expected)
            .return_once(|_| Ok(make_product(1)));

        create_only(&mut repo);

        let mut res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Widget", "price": 9.99 }))
            .send(&make_service(repo))
            .await;

        let body: ProductResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some("/products/1"));
        assert_eq!(body.id, 1);
        assert_eq!(body.name, "Widget");
        assert_eq!(body.price, price("9.99"));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_trims_name_and_accepts_string_price() -> TestResult {
        let expected = widget()?;
        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .withf(move |new| *new == expected)
            .return_once(|_| Ok(make_product(1)));

        create_only(&mut repo);

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "  Widget  ", "price": "9.990" }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_conflict_returns_409() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product().once().return_once(|_| {
            Err(ProductsServiceError::AlreadyExists {
                name: "Widget".to_string(),
            })
        });

        create_only(&mut repo);

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Widget", "price": 9.99 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_invalid_fields_return_422() -> TestResult {
        let payloads = [
            json!({ "name": "Widget", "price": 0 }),
            json!({ "name": "Widget", "price": -1 }),
            json!({ "name": "Widget", "price": 1.234 }),
            json!({ "name": "Widget", "price": 123_456_789 }),
            json!({ "name": "", "price": 1 }),
            json!({ "name": "   ", "price": 1 }),
            json!({ "name": "x".repeat(256), "price": 1 }),
            json!({ "name": "Widget", "description": "d".repeat(10_001), "price": 1 }),
            json!({ "price": 1 }),
            json!({ "name": "Widget" }),
        ];

        for payload in payloads {
            let mut repo = MockProductsService::new();

            repo.expect_create_product().never();
            create_only(&mut repo);

            let res = TestClient::post("http://example.com/products")
                .json(&payload)
                .send(&make_service(repo))
                .await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::UNPROCESSABLE_ENTITY),
                "payload {payload} should be rejected"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_boundary_lengths_are_accepted() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .withf(|new| {
                new.name.as_str().chars().count() == 255
                    && new
                        .description
                        .as_ref()
                        .is_some_and(|description| description.as_str().chars().count() == 10_000)
            })
            .return_once(|_| Ok(make_product(1)));

        create_only(&mut repo);

        let res = TestClient::post("http://example.com/products")
            .json(&json!({
                "name": "x".repeat(255),
                "description": "d".repeat(10_000),
                "price": "0.01",
            }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_malformed_json_returns_422() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product().never();
        create_only(&mut repo);

        let res = TestClient::post("http://example.com/products")
            .raw_json("{\"name\": \"Widget\", \"price\": ")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_storage_error_returns_500() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        create_only(&mut repo);

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Widget", "price": 9.99 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
