use clap::Parser;
use miette::{IntoDiagnostic, Result};
use prizeboard::application::engine::PrizeBoard;
use prizeboard::domain::identity::Identity;
use prizeboard::domain::ports::{LedgerStoreBox, SettlementBox};
use prizeboard::error::LedgerError;
use prizeboard::infrastructure::in_memory::{InMemoryLedgerStore, InMemorySettlement};
use prizeboard::interfaces::csv::operation_reader::OperationReader;
use prizeboard::interfaces::csv::report_writer::ReportWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operations CSV file
    input: PathBuf,

    /// Identity allowed to select winners and withdraw custodied funds
    #[arg(long)]
    guard: String,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<PathBuf>) -> Result<LedgerStoreBox> {
    use prizeboard::infrastructure::rocksdb::RocksDbLedgerStore;

    Ok(match db_path {
        Some(path) => Box::new(RocksDbLedgerStore::open(path).into_diagnostic()?),
        None => Box::new(InMemoryLedgerStore::new()),
    })
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<PathBuf>) -> Result<LedgerStoreBox> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Box::new(InMemoryLedgerStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let store = open_store(cli.db_path)?;
    let settlement: SettlementBox = Box::new(InMemorySettlement::new());
    let board = PrizeBoard::open(Identity::from(cli.guard), store, settlement)
        .await
        .into_diagnostic()?;

    // Process operations
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    for operation in reader.operations() {
        match operation {
            Ok(op) => {
                if let Err(e) = board.apply(op).await {
                    // A storage failure means committed and in-memory state
                    // may no longer agree; stop rather than keep applying.
                    if matches!(e, LedgerError::Storage(_)) {
                        return Err(e).into_diagnostic();
                    }
                    eprintln!("Operation rejected: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    eprintln!("pool balance: {}", board.pool_balance().await);

    // Output final state
    let records = board.into_report().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_records(records).into_diagnostic()?;

    Ok(())
}
