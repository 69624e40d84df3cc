use clap::Args;
use ecoshop_app::{
    database::{self, Db},
    domain::users::{
        PgUsersService, UsersService,
        models::{NewUser, UserRole, UserUuid},
    },
};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// Unique username
    #[arg(long)]
    username: String,

    /// Unique e-mail address
    #[arg(long)]
    email: String,

    /// admin, supervisor or customer
    #[arg(long, default_value = "customer")]
    role: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let role = UserRole::try_from(args.role.as_str())?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgUsersService::new(Db::new(pool));

    let user = service
        .create_user(NewUser {
            uuid: UserUuid::new(),
            username: args.username,
            email: args.email,
            role,
            phone: None,
            address: None,
            city: None,
            country: None,
            postal_code: None,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("username: {}", user.username);
    println!("role: {}", user.role);

    Ok(())
}
