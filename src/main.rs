use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use serde_json::{json, Value};
use std::sync::Arc;

use storefront_client::auth::SessionListener;
use storefront_client::config::{Command, Config};
use storefront_client::preferences::{Preferences, Theme};
use storefront_client::storage::{ClientStorage, SqliteStorage};
use storefront_client::ApiClient;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, command) = Config::load()?;
    config.validate()?;

    // Initialize logging with a configured level; stderr keeps stdout for JSON
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::debug!(base_url = %config.base_url, "Storefront client starting");

    let storage: Arc<dyn ClientStorage> = Arc::new(SqliteStorage::open(&config.storage_file)?);
    let session: Arc<dyn SessionListener> = Arc::new(|login_path: &str| {
        eprintln!(
            "Session expired. Run `storefront login` to sign in again ({}).",
            login_path
        );
    });

    let client = ApiClient::new(&config, storage.clone())?.with_session_listener(session);

    let output = run(&client, &storage, command).await?;
    if !output.is_null() {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

/// Execute one subcommand and return what should be printed
async fn run(
    client: &ApiClient,
    storage: &Arc<dyn ClientStorage>,
    command: Command,
) -> Result<Value> {
    let value = match command {
        Command::Login { username, password } => {
            let username = match username {
                Some(username) => username,
                None => Input::new()
                    .with_prompt("Username")
                    .interact_text()
                    .context("Failed to read username")?,
            };
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .interact()
                    .context("Failed to read password")?,
            };

            client.auth().login(&username, &password).await?;
            json!({ "status": "logged_in", "username": username })
        }
        Command::Logout => {
            client.auth().logout()?;
            json!({ "status": "logged_out" })
        }
        Command::Profile => client.auth().profile().await?,
        Command::Products { category: None } => client.products().list().await?,
        Command::Products {
            category: Some(category),
        } => client.products().by_category(&category).await?,
        Command::Product { id } => client.products().get(id).await?,
        Command::Categories => client.categories().list().await?,
        Command::Cart => client.cart().get().await?,
        Command::CartAdd { product, quantity } => client.cart().add(product, quantity).await?,
        Command::CartUpdate { item, quantity } => client.cart().update(item, quantity).await?,
        Command::CartRemove { item } => client.cart().remove(item).await?,
        Command::CartClear => client.cart().clear().await?,
        Command::Search { query } => client.search().products(&query).await?,
        Command::Orders => client.orders().mine().await?,
        Command::Theme { value } => {
            let prefs = Preferences::new(storage.clone());
            if let Some(value) = value {
                prefs.set_theme(value.parse::<Theme>()?)?;
            }
            json!({ "theme": prefs.theme()?.as_str() })
        }
    };

    Ok(value)
}
