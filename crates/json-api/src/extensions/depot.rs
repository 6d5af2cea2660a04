//! Depot helper extensions.

use std::any::{Any, type_name};

use salvo::prelude::{Depot, StatusError};
use tracing::error;

/// Typed lookups for values injected by hoops.
pub(crate) trait DepotExt {
    /// Fetch an injected value, or fail with a 500 when the router was wired without it.
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>().map_err(|_missing| {
            error!(expected = type_name::<T>(), "depot is missing injected state");

            StatusError::internal_server_error()
        })
    }
}
