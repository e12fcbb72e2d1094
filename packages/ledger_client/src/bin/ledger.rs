use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledger_client::{
    Account, AccountAttributes, AccountListOptions, AccountsService, ClientError, ClientOptions,
    create_uuid, load_options,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "ledger")]
#[command(about = "Create, inspect and delete ledger accounts")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with `base_endpoint` / `timeout_ms`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured base endpoint
    #[arg(long, global = true)]
    base_endpoint: Option<String>,

    /// Overrides the configured timeout
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Log requests at debug level
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Create {
        #[arg(long)]
        organisation_id: String,

        /// Account id (random UUID when omitted)
        #[arg(long)]
        id: Option<String>,

        #[arg(long, default_value = "GB")]
        country: String,

        #[arg(long)]
        base_currency: Option<String>,

        #[arg(long)]
        bank_id: Option<String>,

        #[arg(long)]
        bank_id_code: Option<String>,

        #[arg(long)]
        name: Option<String>,
    },

    /// Fetch one account
    Get { id: String },

    /// List accounts, optionally one page at a time
    List {
        /// Page number, `first` or `last`
        #[arg(long, requires = "size")]
        page: Option<String>,

        #[arg(long, requires = "page")]
        size: Option<u32>,
    },

    /// Delete an account at a given version
    Delete {
        id: String,

        #[arg(long, default_value_t = 0)]
        version: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_directive = if cli.debug {
        "ledger_client=debug,warn"
    } else {
        "warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    let mut options = ClientOptions::from_figment(&load_options(cli.config.as_deref()))
        .context("Failed to load client configuration")?;
    if let Some(base_endpoint) = cli.base_endpoint {
        options.base_endpoint = base_endpoint;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        options.timeout_ms = timeout_ms;
    }
    debug!(?options, "client options");

    let service = AccountsService::with_options(options)?;

    let ctx = CancellationToken::new();
    let on_interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    run(&service, &ctx, cli.command).await
}

async fn run(service: &AccountsService, ctx: &CancellationToken, command: Commands) -> Result<()> {
    match command {
        Commands::Create {
            organisation_id,
            id,
            country,
            base_currency,
            bank_id,
            bank_id_code,
            name,
        } => {
            let account = Account::new(id.unwrap_or_else(create_uuid), organisation_id)
                .with_attributes(AccountAttributes {
                    country,
                    base_currency: base_currency.unwrap_or_default(),
                    bank_id: bank_id.unwrap_or_default(),
                    bank_id_code: bank_id_code.unwrap_or_default(),
                    name: name.unwrap_or_default(),
                    ..Default::default()
                });
            let (saved, resp) = service
                .create(Some(ctx), &account)
                .await
                .map_err(describe)?;
            debug!(status = resp.status().as_u16(), "created");
            print_json(&saved)
        }
        Commands::Get { id } => {
            let (account, _) = service.by_id(Some(ctx), &id).await.map_err(describe)?;
            print_json(&account)
        }
        Commands::List { page, size } => {
            let options = page.zip(size).map(|(number, size)| AccountListOptions { number, size });
            let (accounts, _) = service
                .list(Some(ctx), options.as_ref())
                .await
                .map_err(describe)?;
            print_json(&accounts)
        }
        Commands::Delete { id, version } => {
            let resp = service
                .delete(Some(ctx), &id, version)
                .await
                .map_err(describe)?;
            println!("deleted {id} ({})", resp.status());
            Ok(())
        }
    }
}

fn describe(err: ClientError) -> anyhow::Error {
    match err.status() {
        Some(status) => anyhow::anyhow!("{err} (status {status})"),
        None => anyhow::Error::new(err),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to render JSON")?;
    println!("{json}");
    Ok(())
}
