use auvea_app::{
    auth::PgAuthService,
    database::{self, Db},
    domain::users::{PgUsersService, UsersService},
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User that should own the token
    #[arg(long)]
    user_uuid: Uuid,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let user = PgUsersService::new(Db::new(pool.clone()))
        .get_user(args.user_uuid.into())
        .await
        .map_err(|error| format!("failed to load user: {error}"))?;

    let issued = PgAuthService::new(pool)
        .issue_api_token(user.uuid)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.record.uuid);
    println!("user_uuid: {}", issued.record.user);
    println!("token_created_at: {}", issued.record.created_at);
    println!("api_token: {}", issued.token.as_str());
    println!("store this token now; it is only shown once");

    Ok(())
}
