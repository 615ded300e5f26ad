use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use wortschatz_cache::store::{decode_blob, encode_blob};
use wortschatz_protocol::{CacheSnapshot, WordListEnvelope};

#[derive(Parser)]
#[command(author, version, about = "Compiles word-export JSON to compressed cache snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pack a `GET /word/all` export into the durable blob format
    Pack {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Summarize an existing blob
    Inspect {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn pack(input: &PathBuf, output: &PathBuf) -> anyhow::Result<()> {
    println!("📖 Reading word export from {input:?}...");
    let input_data = fs::read_to_string(input)
        .with_context(|| format!("failed to read {input:?}"))?;

    let envelope: WordListEnvelope =
        serde_json::from_str(&input_data).context("input is not a word-list envelope")?;
    let snapshot = envelope.into_snapshot(now_ms(), false);

    println!(
        "⚙️  Compiling snapshot with {} words, {} levels, {} topics...",
        snapshot.words.len(),
        snapshot.levels.len(),
        snapshot.topics.len()
    );

    let json = serde_json::to_string(&snapshot)?;
    let blob = encode_blob(&json);
    fs::write(output, &blob).with_context(|| format!("failed to write {output:?}"))?;

    println!(
        "✅ Success! {} bytes written to {output:?} ({} bytes uncompressed)",
        blob.len(),
        json.len()
    );
    Ok(())
}

fn inspect(input: &PathBuf) -> anyhow::Result<()> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("failed to read {input:?}"))?;
    let json = decode_blob(&raw).context("blob failed to decompress")?;
    let snapshot: CacheSnapshot =
        serde_json::from_str(&json).context("blob is not a cache snapshot")?;

    println!("Snapshot v{}", snapshot.version);
    println!("  words:   {}", snapshot.words.len());
    println!("  levels:  {}", snapshot.levels.len());
    println!("  topics:  {}", snapshot.topics.len());
    println!("  partial: {}", snapshot.is_partial);
    println!("  age:     {}s", snapshot.age_ms(now_ms()) / 1000);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Pack { input, output } => pack(input, output),
        Command::Inspect { input } => inspect(input),
    }
}
