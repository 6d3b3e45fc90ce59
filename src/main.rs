//! payroll-chain
//!
//! Command-line front end for payroll execution and address resolution.
//!
//! # Architecture Overview
//!
//! ```text
//!   request.json ──▶ payroll::wallets ──▶ payroll::types ──▶ payroll::orchestrator
//!                        │ (names)            (prepare)            │
//!                        ▼                                         ▼
//!                  resolver (ENS)                       blockchain::payroll_contract
//!                        │                                         │
//!                        ▼                                         ▼
//!                 read-only RPC                        signing RPC + confirmation
//!
//!   config (TOML + env) · observability (tracing, metrics) cut across all of it
//! ```

use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use payroll_chain::blockchain::{
    ChainClientFactory, ConfirmationPolicy, EnsRegistryLookup, PayrollContract, PayrollReader, Wallet,
};
use payroll_chain::config::{load_or_default, PayrollChainConfig};
use payroll_chain::observability::{logging, metrics};
use payroll_chain::payroll::{check_claimable, resolve_wallets, PayrollOrchestrator, PayrollRequest};
use payroll_chain::resolver::{classify, validate_and_resolve, Classification, NameResolver};

#[derive(Parser)]
#[command(name = "payroll-chain")]
#[command(about = "Create on-chain payrolls and resolve payee addresses", long_about = None)]
struct Cli {
    /// TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate addresses and resolve domain names
    Resolve {
        #[arg(required = true)]
        inputs: Vec<String>,
    },
    /// Create a payroll and add its employees
    Execute {
        /// Payroll request JSON file
        request: PathBuf,
    },
    /// Check whether a month can be claimed from a payroll
    Claimable {
        #[arg(long, value_parser = parse_payroll_id)]
        payroll_id: U256,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    tracing::debug!(
        chain_id = config.blockchain.chain_id,
        confirmations = config.blockchain.confirmation_blocks,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Resolve { inputs } => resolve(&config, inputs).await,
        Commands::Execute { request } => execute(&config, request).await,
        Commands::Claimable {
            payroll_id,
            month,
            year,
        } => claimable(&config, payroll_id, month, year).await,
    }
}

async fn resolve(config: &PayrollChainConfig, inputs: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let needs_lookup = inputs
        .iter()
        .any(|input| matches!(classify(input), Classification::DomainName(_)));

    let resolver = if needs_lookup {
        match name_resolver(config).await {
            Ok(resolver) => Some(resolver),
            Err(e) => {
                tracing::warn!(error = %e, "Name resolution unavailable");
                None
            }
        }
    } else {
        None
    };

    let mut results = BTreeMap::new();
    let mut failures = 0usize;
    for input in inputs {
        let entry = match validate_and_resolve(&input, resolver.as_ref()).await {
            Ok(result) => serde_json::to_value(result)?,
            Err(e) => {
                failures += 1;
                json!({ "isValid": false, "isDomainName": true, "error": e.to_string(), "kind": "resolution" })
            }
        };
        results.insert(input, entry);
    }

    println!("{}", serde_json::to_string_pretty(&results)?);

    if failures > 0 {
        return Err(format!("{} lookup(s) failed", failures).into());
    }
    Ok(())
}

async fn execute(config: &PayrollChainConfig, path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let contract_address = payroll_address(config)?;
    let mut request: PayrollRequest = serde_json::from_str(&std::fs::read_to_string(&path)?)?;

    let has_names = request
        .employees
        .iter()
        .any(|e| matches!(classify(&e.wallet_address), Classification::DomainName(_)));
    if has_names {
        let resolver = name_resolver(config).await?;
        let rewritten = resolve_wallets(&resolver, &mut request.employees).await?;
        tracing::info!(rewritten, "Employee wallets resolved");
    }

    let private_key = Wallet::key_from_env();
    let factory = ChainClientFactory::new(config.blockchain.clone());
    let bundle = factory.connect(private_key.as_deref()).await?;
    let contract = PayrollContract::new(
        bundle,
        contract_address,
        ConfirmationPolicy::from_config(&config.blockchain),
    );

    let orchestrator = PayrollOrchestrator::new(contract);
    match orchestrator.execute(&request).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            let report = json!({
                "error": e.to_string(),
                "kind": e.kind(),
                "confirmedPayrollId": e.confirmed_payroll_id().map(|id| id.to_string()),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Err(e.into())
        }
    }
}

async fn claimable(
    config: &PayrollChainConfig,
    payroll_id: U256,
    month: u32,
    year: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let contract_address = payroll_address(config)?;
    let factory = ChainClientFactory::new(config.blockchain.clone());
    let read = factory
        .read_client(&config.blockchain.rpc_url, Some(config.blockchain.chain_id))
        .await?;
    let reader = PayrollReader::new(read, contract_address);

    let claimable = check_claimable(&reader, payroll_id, month, year).await?;
    let output: Value = json!({
        "payrollId": payroll_id.to_string(),
        "month": month,
        "year": year,
        "claimable": claimable,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn name_resolver(config: &PayrollChainConfig) -> Result<NameResolver, Box<dyn std::error::Error>> {
    let registry: Address = config.contracts.ens_registry_address.parse()?;
    let factory = ChainClientFactory::new(config.blockchain.clone());
    let read = factory
        .read_client(config.resolver_rpc_url(), config.resolver.chain_id)
        .await?;
    Ok(NameResolver::new(Arc::new(EnsRegistryLookup::new(read, registry))))
}

fn payroll_address(config: &PayrollChainConfig) -> Result<Address, Box<dyn std::error::Error>> {
    if config.contracts.payroll_address.trim().is_empty() {
        return Err("contracts.payroll_address is not configured".into());
    }
    Ok(config.contracts.payroll_address.trim().parse()?)
}

fn parse_payroll_id(raw: &str) -> Result<U256, String> {
    U256::from_str_radix(raw.trim(), 10).map_err(|e| format!("invalid payroll id '{}': {}", raw, e))
}
