use clap::{Parser, Subcommand};

mod db;
mod user;

#[derive(Debug, Parser)]
#[command(name = "ecoshop-app", about = "EcoShop CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    User(user::UserCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::User(command) => user::run(command).await,
        }
    }
}
