use std::path::Path;

use colored::Colorize;
use mintline_crypto::Keypair;
use mintline_ledger::LedgerError;
use mintline_lifecycle::{LifecycleConfig, LifecycleError, OrchestrationError, Orchestrator};
use mintline_protocol::{HttpConnection, ProtocolError};
use mintline_server::{MintlineNode, NodeConfig, ServerError};

use crate::cli::*;
use crate::config::{self, Endpoint};
use crate::report::ConsoleReporter;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => cmd_run(args).await,
        Command::Serve(args) => cmd_serve(args).await,
        Command::Keygen(args) => cmd_keygen(args),
        Command::Balance(args) => cmd_balance(args).await,
        Command::Airdrop(args) => cmd_airdrop(args).await,
    }
}

/// Process exit code for a failed command.
///
/// 2: configuration, 3: rejected by the ledger, 4: ledger unreachable or
/// confirmation timed out, 1: anything else.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(e) = err.downcast_ref::<OrchestrationError>() {
        return lifecycle_exit_code(&e.source);
    }
    if let Some(e) = err.downcast_ref::<LifecycleError>() {
        return lifecycle_exit_code(e);
    }
    if let Some(e) = err.downcast_ref::<LedgerError>() {
        return match e {
            LedgerError::Rejected(_) => 3,
            e if e.is_transient() => 4,
            _ => 1,
        };
    }
    if let Some(ServerError::Config(_)) = err.downcast_ref::<ServerError>() {
        return 2;
    }
    1
}

fn lifecycle_exit_code(err: &LifecycleError) -> u8 {
    match err {
        LifecycleError::Configuration(_) => 2,
        LifecycleError::RejectedOperation { .. } => 3,
        e if e.is_transient() => 4,
        _ => 1,
    }
}

async fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    // Everything is validated before the first ledger call.
    let endpoint = Endpoint::parse(args.ledger.endpoint.as_deref())?;
    let authority = config::authority(args.ledger.secret_key.as_deref())?;
    let existing_token = args
        .mint
        .as_deref()
        .map(|value| config::address("MINTLINE_MINT_ADDRESS", value))
        .transpose()?;
    let connection = endpoint.connect(Some(&authority.address()))?;

    println!(
        "Authority {} on {}",
        authority.address().to_string().yellow(),
        endpoint.to_string().bold()
    );

    let lifecycle = LifecycleConfig {
        decimals: args.decimals,
        initial_supply: args.supply,
        transfer_amount: args.transfer,
        burn_amount: args.burn,
        existing_token,
    };
    let orchestrator = Orchestrator::new(connection, authority, lifecycle);
    let reporter = ConsoleReporter::new(args.explorer_url);
    let report = orchestrator.run(&reporter).await?;

    let owner = orchestrator.authority();
    let connection = orchestrator.connection();
    let authority_balance = connection.token_balance(&report.token, &owner).await?;
    let recipient_balance = connection
        .token_balance(&report.token, &report.recipient)
        .await?;
    println!(
        "\n{} Lifecycle complete for {}",
        "✓".green().bold(),
        report.token.to_string().yellow()
    );
    println!("  Authority balance: {}", authority_balance.unwrap_or(0).to_string().bold());
    println!("  Recipient balance: {}", recipient_balance.unwrap_or(0).to_string().bold());
    Ok(())
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut node_config = match &args.config {
        Some(path) => NodeConfig::load(path)?,
        None => NodeConfig::default(),
    };
    if let Some(bind) = args.bind {
        node_config.bind_addr = bind;
    }
    println!(
        "Mintline node on {} (fee {} lamports/signature, faucet limit {})",
        node_config.bind_addr.to_string().bold(),
        node_config.fee_per_signature,
        node_config.faucet_limit
    );
    MintlineNode::new(node_config).serve().await?;
    Ok(())
}

fn cmd_keygen(args: KeygenArgs) -> anyhow::Result<()> {
    let keypair = Keypair::generate();
    let encoded = keypair.to_json_array();
    match &args.outfile {
        Some(path) => {
            write_secret(path, &encoded)?;
            println!(
                "{} Wrote keypair to {}",
                "✓".green().bold(),
                path.display().to_string().bold()
            );
        }
        None => println!("{encoded}"),
    }
    eprintln!("Address: {}", keypair.address().to_string().yellow());
    Ok(())
}

/// Write key material readable by the owner only.
#[cfg(unix)]
fn write_secret(path: &Path, contents: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents.as_bytes())
}

#[cfg(not(unix))]
fn write_secret(path: &Path, contents: &str) -> std::io::Result<()> {
    use std::io::Write;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(contents.as_bytes())
}

async fn cmd_balance(args: BalanceArgs) -> anyhow::Result<()> {
    let endpoint = Endpoint::parse(args.ledger.endpoint.as_deref())?;
    let mint = args.mint.as_deref().ok_or_else(|| {
        LifecycleError::Configuration("no token: pass --mint or set MINTLINE_MINT_ADDRESS".into())
    })?;
    let mint = config::address("MINTLINE_MINT_ADDRESS", mint)?;
    let owner = match &args.owner {
        Some(owner) => config::address("--owner", owner)?,
        None => config::authority(args.ledger.secret_key.as_deref())?.address(),
    };
    let connection = endpoint.connect(None)?;

    match connection.token_balance(&mint, &owner).await? {
        Some(amount) => println!(
            "{} holds {} of {}",
            owner.to_string().cyan(),
            amount.to_string().bold(),
            mint.short_hex().yellow()
        ),
        None => println!(
            "{} has no holding of {}",
            owner.to_string().cyan(),
            mint.short_hex().yellow()
        ),
    }
    Ok(())
}

async fn cmd_airdrop(args: AirdropArgs) -> anyhow::Result<()> {
    let url = match Endpoint::parse(args.ledger.endpoint.as_deref())? {
        Endpoint::Http(url) => url,
        Endpoint::Memory => {
            return Err(LifecycleError::Configuration(
                "airdrop needs a node endpoint; memory:// ledgers are funded on start".into(),
            )
            .into())
        }
    };
    let address = match &args.address {
        Some(address) => config::address("--address", address)?,
        None => config::authority(args.ledger.secret_key.as_deref())?.address(),
    };
    let connection =
        HttpConnection::new(&url).map_err(|e| LifecycleError::Configuration(e.to_string()))?;

    let balance = match connection.airdrop(&address, args.lamports).await {
        Ok(balance) => balance,
        Err(ProtocolError::Remote { code: 403, message, .. }) => {
            tracing::debug!(%message, "faucet refused airdrop");
            return Err(LifecycleError::Unsupported {
                operation: format!("airdrop on {url} ({message})"),
            }
            .into());
        }
        Err(e) => return Err(LedgerError::from(e).into()),
    };
    println!(
        "{} Airdropped {} lamports to {} (balance {})",
        "✓".green().bold(),
        args.lamports,
        address.to_string().cyan(),
        balance.to_string().bold()
    );
    Ok(())
}
