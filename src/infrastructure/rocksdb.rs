use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;

use crate::domain::funds::Balance;
use crate::domain::identity::Identity;
use crate::domain::ledger::LedgerSnapshot;
use crate::domain::ports::LedgerStore;
use crate::domain::submission::SubmissionRecord;
use crate::error::{LedgerError, Result};

/// Column Family for submission records, keyed by big-endian id.
pub const CF_RECORDS: &str = "records";
/// Column Family for board metadata: the guard identity and the pool balance.
pub const CF_META: &str = "meta";

const META_GUARD: &[u8] = b"guard";
const META_POOL: &[u8] = b"pool";

/// A persistent ledger store implementation using RocksDB.
///
/// Submission records and board metadata live in separate Column Families.
/// Every commit goes through a single `WriteBatch`, so a crash can never
/// leave a winner flag without its matching pool debit.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbLedgerStore {
    db: Arc<DB>,
}

fn storage<E>(err: E) -> LedgerError
where
    E: std::error::Error + Send + Sync + 'static,
{
    LedgerError::Storage(Box::new(err))
}

fn corrupted(message: &str) -> LedgerError {
    LedgerError::Storage(Box::new(std::io::Error::other(message.to_string())))
}

impl RocksDbLedgerStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("records" and "meta") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_records = ColumnFamilyDescriptor::new(CF_RECORDS, Options::default());
        let cf_meta = ColumnFamilyDescriptor::new(CF_META, Options::default());

        let db =
            DB::open_cf_descriptors(&opts, path, vec![cf_records, cf_meta]).map_err(storage)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| corrupted(&format!("{name} column family not found")))
    }
}

#[async_trait]
impl LedgerStore for RocksDbLedgerStore {
    async fn load(&self) -> Result<Option<LedgerSnapshot>> {
        let meta = self.cf(CF_META)?;

        // No guard stamp means the store was never committed to.
        let Some(guard_bytes) = self.db.get_cf(meta, META_GUARD).map_err(storage)? else {
            return Ok(None);
        };
        let guard: Identity = serde_json::from_slice(&guard_bytes).map_err(storage)?;

        let pool_bytes = self
            .db
            .get_cf(meta, META_POOL)
            .map_err(storage)?
            .ok_or_else(|| corrupted("pool balance missing"))?;
        let pool: Balance = serde_json::from_slice(&pool_bytes).map_err(storage)?;

        // Big-endian keys make this iteration id-ordered.
        let records_cf = self.cf(CF_RECORDS)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(records_cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item.map_err(storage)?;
            let record: SubmissionRecord = serde_json::from_slice(&value).map_err(storage)?;
            records.push(record);
        }

        Ok(Some(LedgerSnapshot {
            guard,
            records,
            pool,
        }))
    }

    async fn commit(
        &self,
        guard: &Identity,
        pool: Balance,
        changed: &[SubmissionRecord],
    ) -> Result<()> {
        let meta = self.cf(CF_META)?;
        let records_cf = self.cf(CF_RECORDS)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(meta, META_GUARD, serde_json::to_vec(guard).map_err(storage)?);
        batch.put_cf(meta, META_POOL, serde_json::to_vec(&pool).map_err(storage)?);
        for record in changed {
            batch.put_cf(
                records_cf,
                record.id.to_be_bytes(),
                serde_json::to_vec(record).map_err(storage)?,
            );
        }

        self.db.write(batch).map_err(storage)?;
        Ok(())
    }
}
