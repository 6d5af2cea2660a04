//! Catalog JSON API Server

use std::process;

use salvo::{
    affix_state::inject,
    cors::{Any, Cors},
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
};
use tracing::{error, info};

use catalog_app::context::{AppContext, connect_and_migrate};

use crate::{config::ServerConfig, observability::request_logging, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod config;
mod extensions;
mod healthcheck;
mod observability;
mod products;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Catalog JSON API Server entry point
#[tokio::main]
pub async fn main() {
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        exit_with_failure();
    });

    if let Err(init_error) = observability::init(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "the subscriber failed to install, so stderr is the only sink"
        )]
        {
            eprintln!("{init_error}");
        }

        exit_with_failure();
    }

    let pool = match connect_and_migrate(&config.database).await {
        Ok(pool) => pool,
        Err(init_error) => {
            match std::error::Error::source(&init_error) {
                Some(source) => error!("failed to initialize app context: {init_error}: {source}"),
                None => error!("failed to initialize app context: {init_error}"),
            }

            exit_with_failure();
        }
    };

    let app = AppContext::from_pool(pool.clone());

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(inject(State::from_app_context(app)))
        .push(router::app_router());

    let doc = OpenApi::new("Catalog API", env!("CARGO_PKG_VERSION")).merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let cors = Cors::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .into_handler();

    let service = Service::new(router).hoop(cors).hoop(request_logging);

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let server = Server::new(listener);

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(service).await;

    pool.close().await;

    info!("database pool closed, server stopped");
}

#[expect(clippy::exit, reason = "startup failures end the process with status 1")]
fn exit_with_failure() -> ! {
    process::exit(1)
}
