//! Products Data

use rust_decimal::Decimal;

use crate::domain::products::validation::{
    FieldError, ProductDescription, ProductName, ProductPrice, ValidationErrors,
};

/// Unvalidated create payload, as received from a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

/// Unvalidated update payload. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub description: Option<ProductDescription>,
    pub price: ProductPrice,
}

impl NewProduct {
    /// Validate a create payload, collecting every field violation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when `name` or `price` is missing or any
    /// supplied field breaks its constraints.
    pub fn validate(input: CreateProductInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = errors.check(
            "name",
            input
                .name
                .ok_or(FieldError::Missing)
                .and_then(|name| ProductName::parse(&name)),
        );

        let description = input
            .description
            .and_then(|description| {
                errors.check("description", ProductDescription::parse(description))
            });

        let price = errors.check(
            "price",
            input
                .price
                .ok_or(FieldError::Missing)
                .and_then(ProductPrice::parse),
        );

        match (name, price) {
            (Some(name), Some(price)) => errors.into_result(|| Self {
                name,
                description,
                price,
            }),
            _ => Err(errors),
        }
    }
}

/// Product Update Data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<ProductName>,
    pub description: Option<ProductDescription>,
    pub price: Option<ProductPrice>,
}

impl ProductUpdate {
    /// Validate an update payload. Only supplied fields are checked.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when any supplied field breaks its
    /// constraints.
    pub fn validate(input: UpdateProductInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = input
            .name
            .and_then(|name| errors.check("name", ProductName::parse(&name)));

        let description = input
            .description
            .and_then(|description| {
                errors.check("description", ProductDescription::parse(description))
            });

        let price = input
            .price
            .and_then(|price| errors.check("price", ProductPrice::parse(price)));

        errors.into_result(|| Self {
            name,
            description,
            price,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none()
    }
}

/// Offset/limit window for listing products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    skip: i64,
    limit: i64,
}

impl Pagination {
    pub const DEFAULT_SKIP: i64 = 0;
    pub const DEFAULT_LIMIT: i64 = 100;

    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when `skip` or `limit` is negative.
    pub fn new(skip: i64, limit: i64) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if skip < 0 {
            errors.push("skip", FieldError::Negative);
        }

        if limit < 0 {
            errors.push("limit", FieldError::Negative);
        }

        errors.into_result(|| Self { skip, limit })
    }

    #[must_use]
    pub fn skip(self) -> i64 {
        self.skip
    }

    #[must_use]
    pub fn limit(self) -> i64 {
        self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: Self::DEFAULT_SKIP,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
