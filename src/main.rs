use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use vault_insights::config::{self, Config};
use vault_insights::domain::contracts::{AddressBook, ContractBindings, NetworkId};
use vault_insights::domain::{sort_oldest_first, Calldata, SignatureDirectory};
use vault_insights::infrastructure::{
    AlloyAbiDecoder, FourByteDirectory, LazyChainReader, ProviderConfig,
};
use vault_insights::InsightEngine;

const DEFAULT_RPC: &str = "http://localhost:8545";

#[derive(Debug, Parser)]
#[command(
    name = "vault-insights",
    version,
    about = "Explain pending transactions to the NFT vault and minter contracts"
)]
struct Args {
    /// HTTP JSON-RPC endpoint (e.g. http://localhost:8545)
    #[arg(long, global = true)]
    rpc: Option<String>,

    /// WebSocket endpoint (e.g. ws://localhost:8546)
    #[arg(long, global = true)]
    ws: Option<String>,

    /// IPC path (e.g. ~/.ethereum/geth.ipc). Unix only.
    #[arg(long, global = true)]
    ipc: Option<PathBuf>,

    /// Config file (defaults to ~/.config/vault-insights/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the insight for a pending transaction
    Inspect {
        /// Transaction JSON file, or `-` for stdin
        file: Option<PathBuf>,

        /// Recipient address
        #[arg(long, conflicts_with = "file")]
        to: Option<String>,

        /// Hex call data
        #[arg(long, conflicts_with = "file")]
        data: Option<String>,

        /// Network id; read from the endpoint when omitted
        #[arg(long)]
        chain_id: Option<NetworkId>,
    },
    /// Print directory signatures for a selector, oldest first
    Lookup {
        /// 4-byte selector, e.g. 0x6088e93a
        selector: String,

        #[arg(long)]
        chain_id: Option<NetworkId>,
    },
    /// Print the known contract bindings
    Contracts {
        /// Only this network
        #[arg(long)]
        chain_id: Option<NetworkId>,
    },
}

#[derive(Serialize)]
struct LookupRow {
    text_signature: String,
    created_at: Option<String>,
}

#[derive(Serialize)]
struct NetworkRow<'a> {
    chain_id: NetworkId,
    #[serde(flatten)]
    bindings: &'a ContractBindings,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_error) = match config::load(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };

    init_logging(&config);
    if let Some(err) = config_error {
        warn!("using default configuration: {err:#}");
    }

    match args.command {
        Command::Inspect {
            ref file,
            ref to,
            ref data,
            chain_id,
        } => {
            let transaction = read_transaction(file.as_ref(), to.as_deref(), data.as_deref()).await?;
            inspect(&args, &config, transaction, chain_id).await
        }
        Command::Lookup {
            ref selector,
            chain_id,
        } => lookup(&config, selector, chain_id).await,
        Command::Contracts { chain_id } => contracts(&config, chain_id),
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.log_level.as_deref().unwrap_or("info");
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn inspect(
    args: &Args,
    config: &Config,
    transaction: Value,
    chain_id: Option<NetworkId>,
) -> Result<()> {
    let endpoint = endpoint_from_args_and_config(args, config)?;
    info!(endpoint = %endpoint.display(), "using chain endpoint");
    let chain = Arc::new(LazyChainReader::new(endpoint));

    let registry = Arc::new(config.registry());
    debug!(networks = registry.len(), "registry loaded");

    let engine = InsightEngine::new(
        registry,
        chain.clone(),
        Arc::new(FourByteDirectory::new(config.directory_options())?),
        Arc::new(AlloyAbiDecoder::new()),
        config.policy,
    )?;

    let insight = match chain_id {
        Some(id) => engine.get_insights_on(Some(id), &transaction).await,
        None => engine.get_insights(&transaction).await,
    };
    debug!(chain_used = chain.is_connected(), "insight ready");
    print_json(&insight)
}

async fn lookup(config: &Config, selector: &str, chain_id: Option<NetworkId>) -> Result<()> {
    let calldata = Calldata::from_hex(selector).context("Invalid selector")?;
    let directory = FourByteDirectory::new(config.directory_options())?;

    let mut entries = directory.lookup(chain_id, calldata.selector()).await?;
    sort_oldest_first(&mut entries);

    let rows: Vec<LookupRow> = entries
        .into_iter()
        .map(|entry| LookupRow {
            text_signature: entry.text_signature,
            created_at: entry.created_at.map(|ts| ts.to_rfc3339()),
        })
        .collect();
    print_json(&rows)
}

fn contracts(config: &Config, chain_id: Option<NetworkId>) -> Result<()> {
    let registry = config.registry();
    if let Some(id) = chain_id {
        let Some(bindings) = registry.bindings(id) else {
            bail!("no contracts known on network {id}");
        };
        return print_json(&NetworkRow {
            chain_id: id,
            bindings: &bindings,
        });
    }

    let rows: Vec<NetworkRow<'_>> = registry
        .networks()
        .map(|(id, bindings)| NetworkRow {
            chain_id: *id,
            bindings,
        })
        .collect();
    print_json(&rows)
}

async fn read_transaction(
    file: Option<&PathBuf>,
    to: Option<&str>,
    data: Option<&str>,
) -> Result<Value> {
    let text = match file {
        Some(path) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read stdin")?;
            buf
        }
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut object = serde_json::Map::new();
            if let Some(to) = to {
                object.insert("to".into(), json!(to));
            }
            if let Some(data) = data {
                object.insert("data".into(), json!(data));
            }
            return Ok(Value::Object(object));
        }
    };
    serde_json::from_str(&text).context("Transaction is not valid JSON")
}

/// Command line endpoints take precedence over the config file
fn endpoint_from_args_and_config(args: &Args, config: &Config) -> Result<ProviderConfig> {
    if let Some(ipc) = args.ipc.clone() {
        #[cfg(unix)]
        {
            return Ok(ProviderConfig::Ipc(ipc));
        }
        #[cfg(not(unix))]
        {
            let _ = ipc;
            bail!("IPC endpoints are only supported on Unix");
        }
    }
    if let Some(ws) = args.ws.clone() {
        return Ok(ProviderConfig::WebSocket(ws));
    }
    if let Some(rpc) = args.rpc.clone() {
        return Ok(ProviderConfig::Http(rpc));
    }
    Ok(config
        .provider_config()
        .unwrap_or_else(|| ProviderConfig::Http(DEFAULT_RPC.to_string())))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    println!("{text}");
    Ok(())
}
