//! txwatch: track transactions until they finalize.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use txwatch_contracts::InMemoryContractsRegistry;
use txwatch_rpc::{JsonRpcClient, RpcClient};
use txwatch_store::RefreshPolicy;
use txwatch_types::{ContractId, TransactionItem, TransactionType, TxHash};
use txwatch_utils::LogFormat;
use txwatch_watcher::{ShutdownController, WatcherConfig};

#[derive(Parser)]
#[command(name = "txwatch", about = "Track transactions until they finalize")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "TXWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint.
    #[arg(long, env = "TXWATCH_RPC_URL")]
    rpc_url: Option<String>,

    /// WebSocket push channel endpoint.
    #[arg(long, env = "TXWATCH_WS_URL")]
    ws_url: Option<String>,

    /// Seconds between refreshes of pending transactions (0 disables).
    #[arg(long, env = "TXWATCH_REFRESH_INTERVAL")]
    refresh_interval: Option<u64>,

    /// Refresh aggregation: "all_or_nothing" or "best_effort".
    #[arg(long, env = "TXWATCH_REFRESH_POLICY")]
    refresh_policy: Option<RefreshPolicy>,

    /// Log format: "human" or "json".
    #[arg(long, env = "TXWATCH_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TXWATCH_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Watch transactions until every one is finalized.
    Watch {
        /// Deploy transaction to track.
        #[arg(long = "deploy", value_name = "HASH=CONTRACT_ID", value_parser = parse_tracked)]
        deploys: Vec<(TxHash, ContractId)>,

        /// Method-call transaction to track.
        #[arg(long = "call", value_name = "HASH=CONTRACT_ID", value_parser = parse_tracked)]
        calls: Vec<(TxHash, ContractId)>,

        /// Keep running after everything is finalized (until Ctrl-C).
        #[arg(long)]
        keep_running: bool,
    },
    /// Look up one transaction by hash and print it as JSON.
    Get { hash: String },
    /// Print the effective configuration as TOML.
    Config,
}

fn parse_tracked(s: &str) -> Result<(TxHash, ContractId), String> {
    let (hash, contract_id) = s
        .split_once('=')
        .ok_or_else(|| format!("expected HASH=CONTRACT_ID, got `{s}`"))?;
    if hash.is_empty() || contract_id.is_empty() {
        return Err(format!("expected HASH=CONTRACT_ID, got `{s}`"));
    }
    Ok((TxHash::new(hash), ContractId::new(contract_id)))
}

fn load_config(cli: &Cli) -> anyhow::Result<WatcherConfig> {
    let mut config = match &cli.config {
        Some(path) => WatcherConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => WatcherConfig::default(),
    };

    if let Some(rpc_url) = &cli.rpc_url {
        config.rpc_url = rpc_url.clone();
    }
    if let Some(ws_url) = &cli.ws_url {
        config.ws_url = ws_url.clone();
    }
    if let Some(secs) = cli.refresh_interval {
        config.refresh_interval_secs = secs;
    }
    if let Some(policy) = cli.refresh_policy {
        config.refresh_policy = policy;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    txwatch_utils::init_logging(config.log_format, &config.log_level);

    match cli.command {
        Command::Watch {
            deploys,
            calls,
            keep_running,
        } => watch(config, deploys, calls, keep_running).await,
        Command::Get { hash } => {
            let rpc = JsonRpcClient::with_timeouts(
                config.rpc_url.clone(),
                config.request_timeout(),
                config.connect_timeout(),
            )?;
            let update = rpc.get_transaction_by_hash(&TxHash::new(hash)).await?;
            println!("{}", serde_json::to_string_pretty(&update.payload)?);
            Ok(())
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

async fn watch(
    config: WatcherConfig,
    deploys: Vec<(TxHash, ContractId)>,
    calls: Vec<(TxHash, ContractId)>,
    keep_running: bool,
) -> anyhow::Result<()> {
    if deploys.is_empty() && calls.is_empty() {
        bail!("nothing to watch: pass at least one --deploy or --call");
    }

    tracing::info!(
        "connecting to RPC {} and push channel {}",
        config.rpc_url,
        config.ws_url
    );
    let contracts = Arc::new(InMemoryContractsRegistry::new());
    let mut watcher = txwatch_watcher::connect(&config, contracts.clone())
        .await?
        .exit_when_finalized(config.exit_when_finalized && !keep_running);

    let tracked = deploys
        .into_iter()
        .map(|(hash, id)| TransactionItem::new(hash, TransactionType::Deploy, id))
        .chain(
            calls
                .into_iter()
                .map(|(hash, id)| TransactionItem::new(hash, TransactionType::Method, id)),
        );
    for tx in tracked {
        watcher.store_mut().add_transaction(tx);
    }

    let shutdown = Arc::new(ShutdownController::new());
    let receiver = shutdown.subscribe();
    let signal_task = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { shutdown.wait_for_signal().await })
    };

    let store = watcher.run(receiver).await?;
    signal_task.abort();

    for tx in store.transactions() {
        println!("{}", serde_json::to_string(tx)?);
    }
    for contract in contracts.history() {
        println!("{}", serde_json::to_string(&contract)?);
    }

    tracing::info!("txwatch exited cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tracked_pairs() {
        let (hash, id) = parse_tracked("0xabc=local-1").unwrap();
        assert_eq!(hash, TxHash::new("0xabc"));
        assert_eq!(id, ContractId::new("local-1"));
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(parse_tracked("0xabc").is_err());
        assert!(parse_tracked("=local-1").is_err());
        assert!(parse_tracked("0xabc=").is_err());
    }

    #[test]
    fn cli_flags_override_defaults() {
        let cli = Cli::parse_from([
            "txwatch",
            "--rpc-url",
            "https://rpc.example/api",
            "--refresh-policy",
            "best_effort",
            "--log-format",
            "json",
            "watch",
            "--deploy",
            "0x1=c-1",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.rpc_url, "https://rpc.example/api");
        assert_eq!(config.refresh_policy, RefreshPolicy::BestEffort);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Command::Watch { ref deploys, .. } if deploys.len() == 1));
    }

    #[test]
    fn invalid_url_override_is_rejected() {
        let cli = Cli::parse_from(["txwatch", "--ws-url", "http://wrong", "config"]);
        assert!(load_config(&cli).is_err());
    }
}
