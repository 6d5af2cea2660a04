//! App Router

use salvo::Router;

use crate::{healthcheck, products};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("health").get(healthcheck::handler))
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{id}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicI64, Ordering},
    };

    use async_trait::async_trait;
    use jiff::Timestamp;
    use salvo::{
        affix_state::inject,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde_json::{Value, json};
    use testresult::TestResult;

    use catalog_app::{
        context::AppContext,
        domain::products::{
            ProductsService, ProductsServiceError,
            data::{NewProduct, Pagination, ProductUpdate},
            records::{ProductId, ProductRecord},
        },
    };

    use crate::state::State;

    use super::*;

    /// Keeps products in memory so a whole request sequence can run without `PostgreSQL`.
    #[derive(Debug, Default)]
    struct InMemoryProducts {
        next_id: AtomicI64,
        rows: Mutex<Vec<ProductRecord>>,
    }

    impl InMemoryProducts {
        fn rows(&self) -> std::sync::MutexGuard<'_, Vec<ProductRecord>> {
            self.rows.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    #[async_trait]
    impl ProductsService for InMemoryProducts {
        async fn list_products(
            &self,
            pagination: Pagination,
        ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
            let skip = usize::try_from(pagination.skip()).unwrap_or(usize::MAX);
            let limit = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);

            Ok(self.rows().iter().skip(skip).take(limit).cloned().collect())
        }

        async fn get_product(
            &self,
            product: ProductId,
        ) -> Result<Option<ProductRecord>, ProductsServiceError> {
            Ok(self.rows().iter().find(|row| row.id == product).cloned())
        }

        async fn create_product(
            &self,
            product: NewProduct,
        ) -> Result<ProductRecord, ProductsServiceError> {
            let mut rows = self.rows();

            if rows.iter().any(|row| row.name == product.name.as_str()) {
                return Err(ProductsServiceError::AlreadyExists {
                    name: product.name.into_inner(),
                });
            }

            let now = Timestamp::now();
            let record = ProductRecord {
                id: ProductId::from_i64(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
                name: product.name.into_inner(),
                description: product
                    .description
                    .map(|description| description.as_str().to_owned()),
                price: product.price.value(),
                created_at: now,
                updated_at: now,
            };

            rows.push(record.clone());

            Ok(record)
        }

        async fn update_product(
            &self,
            product: ProductId,
            update: ProductUpdate,
        ) -> Result<Option<ProductRecord>, ProductsServiceError> {
            let mut rows = self.rows();

            if let Some(name) = &update.name
                && rows
                    .iter()
                    .any(|row| row.id != product && row.name == name.as_str())
            {
                return Err(ProductsServiceError::AlreadyExists {
                    name: name.as_str().to_owned(),
                });
            }

            let Some(row) = rows.iter_mut().find(|row| row.id == product) else {
                return Ok(None);
            };

            if let Some(name) = update.name {
                row.name = name.into_inner();
            }

            if let Some(description) = update.description {
                row.description = Some(description.as_str().to_owned());
            }

            if let Some(price) = update.price {
                row.price = price.value();
            }

            row.updated_at = Timestamp::now();

            Ok(Some(row.clone()))
        }

        async fn delete_product(&self, product: ProductId) -> Result<bool, ProductsServiceError> {
            let mut rows = self.rows();
            let before = rows.len();

            rows.retain(|row| row.id != product);

            Ok(rows.len() < before)
        }
    }

    fn service() -> Service {
        let state = State::from_app_context(AppContext {
            products: Arc::new(InMemoryProducts::default()),
        });

        Service::new(Router::new().hoop(inject(state)).push(app_router()))
    }

    #[tokio::test]
    async fn product_lifecycle() -> TestResult {
        let service = service();

        let mut res = TestClient::post("http://example.com/products/")
            .json(&json!({ "name": "Widget", "price": 9.99 }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let created: Value = res.take_json().await?;

        assert_eq!(created["id"], 1);
        assert_eq!(created["price"], "9.99");
        assert_eq!(created["created_at"], created["updated_at"]);

        let res = TestClient::post("http://example.com/products/")
            .json(&json!({ "name": "Widget", "price": 9.99 }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        let mut res = TestClient::get("http://example.com/products/1")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let fetched: Value = res.take_json().await?;

        assert_eq!(fetched, created);

        let mut res = TestClient::put("http://example.com/products/1")
            .json(&json!({ "price": 12.50 }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let updated: Value = res.take_json().await?;

        assert_eq!(updated["price"], "12.50");
        assert_eq!(updated["name"], "Widget");

        let res = TestClient::delete("http://example.com/products/1")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        let res = TestClient::get("http://example.com/products/1")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn list_windows_products() -> TestResult {
        let service = service();

        for name in ["A", "B", "C"] {
            let res = TestClient::post("http://example.com/products")
                .json(&json!({ "name": name, "price": "1.00" }))
                .send(&service)
                .await;

            assert_eq!(res.status_code, Some(StatusCode::CREATED));
        }

        let all: Vec<Value> = TestClient::get("http://example.com/products")
            .send(&service)
            .await
            .take_json()
            .await?;

        let names: Vec<Option<&str>> = all.iter().map(|product| product["name"].as_str()).collect();

        assert_eq!(names, vec![Some("A"), Some("B"), Some("C")]);

        let window: Vec<Value> = TestClient::get("http://example.com/products/?skip=1&limit=1")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(window.len(), 1);
        assert_eq!(window.first().map(|product| &product["name"]), Some(&json!("B")));

        let past_end: Vec<Value> = TestClient::get("http://example.com/products?skip=10")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert!(past_end.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn health_is_routed() -> TestResult {
        let res = TestClient::get("http://example.com/health")
            .send(&service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
