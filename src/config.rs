use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reqwest::Url;
use std::path::PathBuf;

/// Storefront client - command line front end
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Base URL of the storefront REST API
    #[arg(short = 'u', long, env = "API_BASE_URL", default_value = "http://localhost:8000/api")]
    pub base_url: String,

    /// Token refresh endpoint, relative to the base URL
    #[arg(long, env = "REFRESH_PATH", default_value = "/token/refresh/")]
    pub refresh_path: String,

    /// Login surface reported when the session expires
    #[arg(long, env = "LOGIN_PATH", default_value = "/login")]
    pub login_path: String,

    /// Path to the client storage SQLite file
    #[arg(short = 's', long, env = "STORAGE_FILE")]
    pub storage_file: Option<String>,

    /// Connect timeout in seconds
    #[arg(long, env = "HTTP_CONNECT_TIMEOUT", default_value = "10")]
    pub connect_timeout: u64,

    /// Request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Log in and store the token pair
    Login {
        #[arg(long)]
        username: Option<String>,
        /// Prompted for when omitted
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget stored credentials
    Logout,
    /// Show the current user's profile
    Profile,
    /// List products, optionally filtered by category
    Products {
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one product
    Product { id: u64 },
    /// List categories
    Categories,
    /// Show the cart
    Cart,
    /// Add a product to the cart
    CartAdd {
        product: u64,
        #[arg(long, default_value = "1")]
        quantity: u32,
    },
    /// Change the quantity of a cart item
    CartUpdate { item: u64, quantity: u32 },
    /// Remove a cart item
    CartRemove { item: u64 },
    /// Empty the cart
    CartClear,
    /// Search products by text
    Search { query: String },
    /// List the current user's orders
    Orders,
    /// Show or set the theme preference
    Theme { value: Option<String> },
}

#[derive(Clone, Debug)]
pub struct Config {
    // Backend
    pub base_url: String,
    pub refresh_path: String,
    pub login_path: String,

    // Client storage
    pub storage_file: PathBuf,

    // HTTP client
    pub http_connect_timeout: u64,
    pub http_request_timeout: u64,

    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with priority: CLI > ENV > defaults
    pub fn load() -> Result<(Self, Command)> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let args = CliArgs::parse();
        let command = args.command.clone();
        Ok((Self::from_args(args), command))
    }

    /// Build configuration from parsed arguments
    pub fn from_args(args: CliArgs) -> Self {
        Config {
            base_url: args.base_url,
            refresh_path: args.refresh_path,
            login_path: args.login_path,
            storage_file: args
                .storage_file
                .map(|s| expand_tilde(&s))
                .unwrap_or_else(default_storage_file),
            http_connect_timeout: args.connect_timeout,
            http_request_timeout: args.request_timeout,
            log_level: args.log_level,
        }
    }

    /// Defaults pointed at the given backend
    pub fn with_base_url(base_url: &str) -> Self {
        Config {
            base_url: base_url.to_string(),
            refresh_path: "/token/refresh/".to_string(),
            login_path: "/login".to_string(),
            storage_file: default_storage_file(),
            http_connect_timeout: 10,
            http_request_timeout: 30,
            log_level: "warn".to_string(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("API_BASE_URL is not a valid URL: {}", self.base_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("API_BASE_URL must use http or https: {}", self.base_url);
        }

        if !self.refresh_path.starts_with('/') {
            anyhow::bail!(
                "REFRESH_PATH must start with '/': {}",
                self.refresh_path
            );
        }

        if self.login_path.is_empty() {
            anyhow::bail!("LOGIN_PATH cannot be empty");
        }

        Ok(())
    }
}

/// Default storage location under the user's data directory
fn default_storage_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("storefront-client").join("storage.sqlite3"))
        .unwrap_or_else(|| PathBuf::from("storefront.sqlite3"))
}

/// Expand tilde (~) in file paths to user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
