use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use powchain_core::{compute_hash, Chain, ChainConfig, Map, Payload, Value};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "powchain")]
#[command(about = "Build and validate a proof-of-work chain in memory")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mine blocks onto a fresh chain, print them and report validity
    Mine {
        /// Leading zero hex characters required of each block hash
        #[arg(long, default_value_t = 4)]
        difficulty: u32,
        /// Payload of the genesis block
        #[arg(long, default_value = "Genesis Block")]
        genesis_data: String,
        /// Block payload: plain text, or a JSON object whose "data" key is the
        /// base payload and whose other keys are extra fields. Repeatable.
        #[arg(long = "block")]
        blocks: Vec<String>,
        /// Abandon mining after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Print the chain as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the hash of a block built from the given fields
    Hash {
        #[arg(long)]
        index: u64,
        #[arg(long)]
        previous_hash: String,
        #[arg(long)]
        timestamp: u64,
        #[arg(long)]
        data: String,
        #[arg(long, default_value_t = 0)]
        nonce: u64,
    },
}

#[derive(Serialize)]
struct Report<'a, T: Serialize> {
    valid: bool,
    chain: &'a T,
}

/// Split a `--block` argument into base data and extra fields.
fn parse_block(raw: &str) -> Result<(String, Option<Map<String, Value>>)> {
    if !raw.trim_start().starts_with('{') {
        return Ok((raw.to_string(), None));
    }
    let mut fields: Map<String, Value> =
        serde_json::from_str(raw).with_context(|| format!("invalid block JSON: {raw}"))?;
    let data = match fields.remove("data") {
        Some(Value::String(s)) => s,
        Some(other) => return Err(anyhow!("block \"data\" must be a string, got {other}")),
        None => return Err(anyhow!("block JSON needs a \"data\" field: {raw}")),
    };
    Ok((data, Some(fields)))
}

fn spawn_watchdog(timeout: Duration) -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    thread::spawn(move || {
        thread::sleep(timeout);
        flag.store(true, Ordering::Relaxed);
    });
    cancel
}

fn mine(
    difficulty: u32,
    genesis_data: String,
    blocks: Vec<String>,
    timeout_secs: Option<u64>,
    json: bool,
) -> Result<()> {
    let parsed = blocks
        .iter()
        .map(|raw| parse_block(raw))
        .collect::<Result<Vec<_>>>()?;

    let mut chain = Chain::with_config(ChainConfig {
        difficulty,
        genesis_data,
    })?;
    let cancel = timeout_secs.map(|secs| spawn_watchdog(Duration::from_secs(secs)));

    for (data, extra) in parsed {
        match &cancel {
            Some(cancel) => {
                chain
                    .add_block_cancellable(data, extra, cancel)
                    .context("mining timed out")?;
            }
            None => {
                chain.add_block(data, extra);
            }
        }
    }
    info!("mined {} blocks at difficulty {}", chain.len() - 1, difficulty);

    let valid = chain.is_chain_valid();
    if json {
        let report = Report {
            valid,
            chain: &chain,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for block in chain.blocks() {
            println!("{block}");
        }
        println!("chain valid: {valid}");
    }
    Ok(())
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Mine {
            difficulty,
            genesis_data,
            blocks,
            timeout_secs,
            json,
        } => mine(difficulty, genesis_data, blocks, timeout_secs, json)?,
        Command::Hash {
            index,
            previous_hash,
            timestamp,
            data,
            nonce,
        } => {
            let payload = Payload::from(data);
            println!(
                "{}",
                compute_hash(index, &previous_hash, timestamp, &payload, nonce)
            );
        }
    }
    Ok(())
}
