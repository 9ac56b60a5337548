use std::{process::ExitCode, sync::Arc};

use edl_authorizer::{
    authorizer::Authorizer, config::AuthorizerConfig, event::AuthorizerEvent,
    store::postgres::PostgresCredentialStore,
};
use log::{error, info};
use tokio::io::AsyncReadExt;

/// Authorizes one gateway event read from the file given as first argument,
/// or from stdin, and prints the resulting decision.
///
/// The database is taken from `DATABASE_URL`, everything else from the
/// variables read by [AuthorizerConfig::from_env].
#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let raw_event = match read_event().await {
        Ok(raw_event) => raw_event,
        Err(e) => {
            error!("Failed to read event: {}", e);
            return ExitCode::from(2);
        }
    };
    let event: AuthorizerEvent = match serde_json::from_str(&raw_event) {
        Ok(event) => event,
        Err(e) => {
            error!("Invalid event: {}", e);
            return ExitCode::from(2);
        }
    };

    let config = AuthorizerConfig::from_env().expect("Invalid authorizer configuration");
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let store = PostgresCredentialStore::from_connection_string(&database_url)
        .expect("Invalid DATABASE_URL");
    if let Err(e) = store.ensure_schema().await {
        error!("Unable to prepare user_tokens table: {}", e);
        return ExitCode::FAILURE;
    }

    let authorizer = Authorizer::builder()
        .config(config)
        .store(Arc::new(store))
        .build()
        .expect("Failed to build authorizer");

    match authorizer.handle(&event).await {
        Ok(Some(decision)) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&decision).expect("Decision is serializable")
            );
            ExitCode::SUCCESS
        }
        Ok(None) => {
            info!("Warm up event, nothing to authorize");
            ExitCode::SUCCESS
        }
        Err(unauthorized) => {
            eprintln!("{}", unauthorized);
            ExitCode::FAILURE
        }
    }
}

async fn read_event() -> std::io::Result<String> {
    match std::env::args().nth(1) {
        Some(path) => tokio::fs::read_to_string(path).await,
        None => {
            let mut raw_event = String::new();
            tokio::io::stdin().read_to_string(&mut raw_event).await?;
            Ok(raw_event)
        }
    }
}
