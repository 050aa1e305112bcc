use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use turnstile_api::{turnstile_version, ApiConfig, TurnstileApi, ValidationResult};
use turnstile_extract::{preview, RAW_PREVIEW_CHARS};

#[derive(Parser)]
#[command(name = "turnstile", about = "NFT ticket validation at the door", version)]
struct Cli {
    /// JSON-RPC endpoint of the chain the lock contract lives on.
    #[arg(long, global = true, env = "TURNSTILE_RPC_URL")]
    rpc_url: Option<String>,

    /// Lock contract address issuing the tickets.
    #[arg(long, global = true, env = "TURNSTILE_CONTRACT")]
    contract: Option<String>,

    /// Emit machine-readable JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a wallet address from a decoded QR payload.
    Extract(PayloadArgs),
    /// Validate a manually entered wallet address.
    Validate {
        /// Wallet address, 0x-prefixed.
        address: String,
    },
    /// Extract an address from a payload and validate it in one shot.
    Check(PayloadArgs),
}

#[derive(Args)]
struct PayloadArgs {
    /// Decoded payload text. Omit to read from stdin.
    payload: Option<String>,

    /// Read the payload from stdin instead of an argument.
    #[arg(long)]
    stdin: bool,

    /// Echo a truncated preview of the raw payload before extracting.
    #[arg(long)]
    raw_preview: bool,
}

impl PayloadArgs {
    fn resolve(&self) -> Result<String> {
        match (&self.payload, self.stdin) {
            (Some(payload), false) => Ok(payload.clone()),
            _ => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read payload from stdin")?;
                Ok(buf)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = build_api(&cli)?;

    match &cli.command {
        Command::Extract(args) => {
            let payload = args.resolve()?;
            if args.raw_preview {
                eprintln!("raw payload: {}", preview(&payload, RAW_PREVIEW_CHARS));
            }
            let address = api.extract_address(&payload)?;
            println!("{}", address.to_checksum(None));
        }
        Command::Validate { address } => {
            let holder = api.normalize_address(address)?;
            let result = api.validate(holder).await;
            report(&result, cli.json)?;
        }
        Command::Check(args) => {
            let payload = args.resolve()?;
            if args.raw_preview {
                eprintln!("raw payload: {}", preview(&payload, RAW_PREVIEW_CHARS));
            }
            let result = api.check_payload(&payload).await?;
            report(&result, cli.json)?;
        }
    }

    Ok(())
}

fn build_api(cli: &Cli) -> Result<TurnstileApi> {
    let mut config = ApiConfig::default();
    if let Some(rpc_url) = &cli.rpc_url {
        config.network.rpc_url = rpc_url.clone();
    }
    if let Some(contract) = &cli.contract {
        config.ticket.contract_address = contract
            .parse()
            .context("invalid lock contract address")?;
    }
    eprintln!("{}", turnstile_version!());
    TurnstileApi::new(config).context("failed to initialize API")
}

fn report(result: &ValidationResult, json: bool) -> Result<()> {
    // Exit codes are the same in both output modes: 1 when validity
    // could not be determined, 2 for a determined-invalid ticket.
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        if result.error.is_some() {
            std::process::exit(1);
        }
        if !result.is_valid {
            std::process::exit(2);
        }
        return Ok(());
    }

    if let Some(error) = &result.error {
        bail!("error checking ticket validity: {error}");
    }

    if result.is_valid {
        println!("valid ticket");
        println!("contract name: {}", result.contract_name);
        println!("event name:    {}", result.event_name);
        if let Some(expiration) = result.expiration {
            println!("key expires:   {expiration}");
        }
    } else {
        println!("invalid ticket");
        std::process::exit(2);
    }

    Ok(())
}
