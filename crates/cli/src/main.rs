//! `lightbnb` CLI entry-point.
//!
//! Available sub-commands:
//! - `search`        — property search (`--explain` prints the plan only).
//! - `user`          — look a user up by email or id.
//! - `reservations`  — upcoming reservations of a guest.
//! - `add-user`      — register a user.
//! - `add-property`  — insert a property from a JSON file.
//!
//! Rows are printed to stdout as pretty JSON.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use db::{
    models::{NewProperty, NewUser},
    repository::{properties, reservations, users},
    PgStore, SearchCriteria,
};

#[derive(Parser)]
#[command(name = "lightbnb", about = "LightBnB data-access CLI", version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true)]
    debug: bool,

    #[command(flatten)]
    database: DatabaseConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct DatabaseConfig {
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[arg(long, env = "LIGHTBNB_MAX_CONNECTIONS", default_value_t = 5, global = true)]
    max_connections: u32,
}

impl DatabaseConfig {
    async fn connect(&self) -> Result<PgStore> {
        let Some(url) = self.database_url.as_deref() else {
            bail!("no database configured: pass --database-url or set DATABASE_URL");
        };
        db::pool::connect_store(url, self.max_connections)
            .await
            .context("failed to connect to database")
    }
}

#[derive(Subcommand)]
enum Command {
    /// Search properties, cheapest first.
    Search {
        /// Match cities containing this text.
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        owner_id: Option<i64>,
        /// Dollars per night.
        #[arg(long)]
        minimum_price_per_night: Option<f64>,
        /// Dollars per night.
        #[arg(long)]
        maximum_price_per_night: Option<f64>,
        #[arg(long)]
        minimum_rating: Option<f64>,
        #[arg(long, env = "LIGHTBNB_SEARCH_LIMIT", default_value_t = db::DEFAULT_SEARCH_LIMIT)]
        limit: i64,
        /// Print the SQL and parameters instead of running them.
        #[arg(long)]
        explain: bool,
    },
    /// Look up a single user.
    User {
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        email: Option<String>,
        #[arg(long)]
        id: Option<i64>,
    },
    /// List upcoming reservations for a guest.
    Reservations {
        #[arg(long)]
        guest_id: i64,
        #[arg(
            long,
            env = "LIGHTBNB_RESERVATION_LIMIT",
            default_value_t = reservations::DEFAULT_RESERVATION_LIMIT
        )]
        limit: i64,
    },
    /// Register a user. `password` must already be hashed.
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Insert a property described by a JSON file.
    AddProperty {
        path: std::path::PathBuf,
    },
}

fn init_tracing(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    match cli.command {
        Command::Search {
            city,
            owner_id,
            minimum_price_per_night,
            maximum_price_per_night,
            minimum_rating,
            limit,
            explain,
        } => {
            let mut criteria = SearchCriteria {
                owner_id,
                minimum_price_per_night,
                maximum_price_per_night,
                minimum_rating,
                ..Default::default()
            };
            if let Some(city) = city.as_deref() {
                criteria = criteria.with_city_containing(city);
            }

            if explain {
                return print_json(&db::build_property_search(&criteria, limit));
            }

            let store = cli.database.connect().await?;
            let rows = properties::get_all_properties(&store, &criteria, limit)
                .await
                .context("property search failed")?;
            info!("{} properties found", rows.len());
            print_json(&rows)
        }
        Command::User { email, id } => {
            let store = cli.database.connect().await?;
            let user = match (email, id) {
                (Some(email), _) => users::get_user_with_email(&store, &email).await,
                (None, Some(id)) => users::get_user_with_id(&store, id).await,
                (None, None) => bail!("pass --email or --id"),
            }
            .context("user lookup failed")?;
            print_json(&user)
        }
        Command::Reservations { guest_id, limit } => {
            let store = cli.database.connect().await?;
            let rows = reservations::get_all_reservations(&store, guest_id, limit)
                .await
                .context("reservation listing failed")?;
            print_json(&rows)
        }
        Command::AddUser { name, email, password } => {
            let store = cli.database.connect().await?;
            let user = users::add_user(&store, &NewUser { name, email, password })
                .await
                .context("failed to add user")?;
            info!("Added user {}", user.id);
            print_json(&user)
        }
        Command::AddProperty { path } => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read file {}", path.display()))?;
            let property: NewProperty = serde_json::from_str(&content)
                .with_context(|| format!("invalid property JSON in {}", path.display()))?;

            let store = cli.database.connect().await?;
            let row = properties::add_property(&store, &property)
                .await
                .context("failed to add property")?;
            print_json(&row)
        }
    }
}
