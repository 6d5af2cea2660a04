//! Product request bodies
//!
//! Every field is optional at the wire level so that missing fields surface
//! as field-level validation errors rather than JSON parse failures.

use rust_decimal::Decimal;
use serde::Deserialize;

use catalog_app::domain::products::data::{CreateProductInput, UpdateProductInput};

/// Create Product Request
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CreateProductRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Accepted as a JSON number or a decimal string
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl From<CreateProductRequest> for CreateProductInput {
    fn from(request: CreateProductRequest) -> Self {
        CreateProductInput {
            name: request.name,
            description: request.description,
            price: request.price,
        }
    }
}

/// Update Product Request
///
/// An absent field and an explicit `null` both leave the stored value as is.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub price: Option<Decimal>,
}

impl From<UpdateProductRequest> for UpdateProductInput {
    fn from(request: UpdateProductRequest) -> Self {
        UpdateProductInput {
            name: request.name,
            description: request.description,
            price: request.price,
        }
    }
}
