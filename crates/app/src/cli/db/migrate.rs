use clap::Args;
use ecoshop_app::database;

#[derive(Debug, Args)]
pub(crate) struct MigrateArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: MigrateArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(|error| format!("failed to run migrations: {error}"))?;

    println!("migrations applied");

    Ok(())
}
