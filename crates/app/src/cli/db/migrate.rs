use clap::Args;
use catalog_app::{context, database::DatabaseConfig};

#[derive(Debug, Args)]
pub(crate) struct MigrateArgs {
    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(args: MigrateArgs) -> Result<(), String> {
    let pool = context::connect_and_migrate(&args.database)
        .await
        .map_err(|error| match std::error::Error::source(&error) {
            Some(source) => format!("{error}: {source}"),
            None => error.to_string(),
        })?;

    let applied = catalog_app::database::MIGRATOR.iter().count();

    pool.close().await;

    println!("schema is up to date ({applied} migrations)");

    Ok(())
}
