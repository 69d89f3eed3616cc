use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::time::Duration;

use userop_sdk::utils::encoding::{decode_hex, encode_hex};
use userop_sdk::utils::logging;
use userop_sdk::{
    cancellation, sign_authorization, sign_digest, to_checksum_address, verify_user_op_signature,
    ClientConfig, GetUserOpReceiptRequest, KernelVersion, PollConfig, PrivateKey,
    UserOpBuilderClient,
};

/// Environment variable consulted when `--private-key` is omitted
const ENV_PRIVATE_KEY: &str = "PRIVATE_KEY";

/// Sign ERC-4337 user operations and EIP-7702 authorizations
#[derive(Parser, Debug)]
#[command(name = "userop-sdk", version, about, long_about = None)]
struct Cli {
    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new private key and its address
    Keygen,

    /// Sign a 32-byte digest (e.g. a user operation hash) as a personal message
    SignDigest {
        /// Hex digest, 32 bytes
        #[arg(long)]
        digest: String,

        /// Hex private key (falls back to $PRIVATE_KEY)
        #[arg(long)]
        private_key: Option<String>,
    },

    /// Check a personal-message signature against an address
    Verify {
        /// Hex digest, 32 bytes
        #[arg(long)]
        digest: String,

        /// Hex signature, 65 bytes
        #[arg(long)]
        signature: String,

        /// Expected signer address
        #[arg(long)]
        address: String,
    },

    /// Sign an EIP-7702 authorization
    SignAuthorization {
        #[arg(long)]
        chain_id: u64,

        /// Nonce of the authorizing account
        #[arg(long, default_value_t = 0)]
        nonce: u64,

        /// Delegate contract address (defaults to the Kernel implementation)
        #[arg(long)]
        delegate: Option<String>,

        /// Kernel version used when no delegate is given
        #[arg(long, default_value = "0.3.3")]
        kernel_version: String,

        /// Hex private key (falls back to $PRIVATE_KEY)
        #[arg(long)]
        private_key: Option<String>,
    },

    /// Show Kernel contract addresses
    Kernel {
        /// Only this version
        #[arg(long)]
        kernel_version: Option<String>,
    },

    /// Poll the UserOp Builder for a receipt
    WaitReceipt {
        #[arg(long)]
        chain_id: u64,

        #[arg(long)]
        user_op_hash: String,

        /// Interval between attempts in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Overall deadline in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::set_debug(cli.verbose);

    match cli.command {
        Commands::Keygen => cmd_keygen(cli.json),
        Commands::SignDigest {
            digest,
            private_key,
        } => cmd_sign_digest(cli.json, &digest, private_key),
        Commands::Verify {
            digest,
            signature,
            address,
        } => cmd_verify(cli.json, &digest, &signature, &address),
        Commands::SignAuthorization {
            chain_id,
            nonce,
            delegate,
            kernel_version,
            private_key,
        } => cmd_sign_authorization(chain_id, nonce, delegate, &kernel_version, private_key),
        Commands::Kernel { kernel_version } => cmd_kernel(cli.json, kernel_version),
        Commands::WaitReceipt {
            chain_id,
            user_op_hash,
            interval_ms,
            timeout_ms,
        } => cmd_wait_receipt(chain_id, user_op_hash, interval_ms, timeout_ms).await,
    }
}

fn load_key(arg: Option<String>) -> Result<PrivateKey> {
    let raw = match arg {
        Some(value) => value,
        None => std::env::var(ENV_PRIVATE_KEY)
            .map_err(|_| anyhow!("No private key: pass --private-key or set {}", ENV_PRIVATE_KEY))?,
    };
    Ok(PrivateKey::from_hex(&raw)?)
}

fn cmd_keygen(as_json: bool) -> Result<()> {
    let key = PrivateKey::generate();
    let address = to_checksum_address(&key.address()?);

    if as_json {
        println!(
            "{}",
            json!({ "privateKey": key.to_hex(), "address": address })
        );
    } else {
        println!("Private key: {}", key.to_hex());
        println!("Address:     {}", address);
    }
    Ok(())
}

fn cmd_sign_digest(as_json: bool, digest: &str, private_key: Option<String>) -> Result<()> {
    let key = load_key(private_key)?;
    let digest = decode_hex(digest).context("Digest is not valid hex")?;
    let signature = sign_digest(&digest, &key)?;

    if as_json {
        println!(
            "{}",
            json!({
                "signature": signature.to_hex(),
                "r": encode_hex(signature.r()),
                "s": encode_hex(signature.s()),
                "v": signature.v(),
                "yParity": signature.y_parity(),
                "signer": to_checksum_address(&key.address()?),
            })
        );
    } else {
        println!("{}", signature.to_hex());
    }
    Ok(())
}

fn cmd_verify(as_json: bool, digest: &str, signature: &str, address: &str) -> Result<()> {
    let valid = verify_user_op_signature(digest, signature, address)?;

    if as_json {
        println!("{}", json!({ "valid": valid }));
    } else {
        println!("{}", if valid { "valid" } else { "invalid" });
    }
    Ok(())
}

fn cmd_sign_authorization(
    chain_id: u64,
    nonce: u64,
    delegate: Option<String>,
    kernel_version: &str,
    private_key: Option<String>,
) -> Result<()> {
    let key = load_key(private_key)?;
    let delegate = match delegate {
        Some(address) => address,
        None => {
            let version: KernelVersion = kernel_version.parse()?;
            version.addresses().account_implementation_address.to_string()
        }
    };

    let authorization = sign_authorization(chain_id, &delegate, nonce, &key)?;
    println!("{}", serde_json::to_string_pretty(&authorization)?);
    Ok(())
}

fn cmd_kernel(as_json: bool, kernel_version: Option<String>) -> Result<()> {
    let versions = match kernel_version {
        Some(v) => vec![v.parse::<KernelVersion>()?],
        None => KernelVersion::ALL.to_vec(),
    };

    if as_json {
        let mut entries = serde_json::Map::new();
        for version in &versions {
            entries.insert(version.to_string(), serde_json::to_value(version.addresses())?);
        }
        println!("{}", serde_json::Value::Object(entries));
        return Ok(());
    }

    for version in versions {
        let addresses = version.addresses();
        println!("Kernel {}", version);
        println!("  Account implementation: {}", addresses.account_implementation_address);
        println!("  Factory:                {}", addresses.factory_address);
        println!("  Meta factory:           {}", addresses.meta_factory_address);
        println!("  Init code hash:         {}", addresses.init_code_hash);
    }
    Ok(())
}

async fn cmd_wait_receipt(
    chain_id: u64,
    user_op_hash: String,
    interval_ms: Option<u64>,
    timeout_ms: Option<u64>,
) -> Result<()> {
    let config = ClientConfig::from_env()?;
    let mut poll = config.poll;
    if let Some(ms) = interval_ms {
        poll = poll.with_interval(Duration::from_millis(ms));
    }
    if let Some(ms) = timeout_ms {
        poll = poll.with_timeout(Duration::from_millis(ms));
    }

    let client = UserOpBuilderClient::new(&config)?;
    let (handle, signal) = cancellation();

    let request = GetUserOpReceiptRequest::new(user_op_hash);
    let wait = client.wait_for_user_op_receipt(chain_id, &request, poll, signal);
    tokio::pin!(wait);

    let receipt = tokio::select! {
        result = &mut wait => result?,
        _ = tokio::signal::ctrl_c() => {
            handle.cancel();
            wait.await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}
