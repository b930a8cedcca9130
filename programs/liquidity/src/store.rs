//! Keyed storage of liquidity records.
//!
//! Every stored record carries a version which is bumped on each successful
//! commit. A commit names the version it was computed from, and is rejected
//! with `Conflict` if another commit landed in between.

use {
    crate::{config::LiquidityConfig, error::LiquidityError, state::Liquidity},
    solana_program::pubkey::Pubkey,
    std::{collections::HashMap, sync::RwLock},
};

/// A record together with the version it was read at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedRecord {
    pub record: Liquidity,
    pub version: u64,
}

pub trait RecordStore: Send + Sync {
    fn load(&self, id: &Pubkey) -> Result<LoadedRecord, LiquidityError>;

    fn contains(&self, id: &Pubkey) -> bool;

    /// Create an empty record controlled by `owner`.
    fn create(&self, id: &Pubkey, owner: &Pubkey) -> Result<LoadedRecord, LiquidityError>;

    /// Replace the record if it is still at `version`. Returns the new
    /// version.
    fn commit(
        &self,
        id: &Pubkey,
        version: u64,
        record: &Liquidity,
    ) -> Result<u64, LiquidityError>;
}

#[derive(Debug)]
struct StoredAccount {
    data: Vec<u8>,
    version: u64,
}

/// Record store holding packed account data in memory.
#[derive(Debug)]
pub struct MemoryRecordStore {
    space: usize,
    accounts: RwLock<HashMap<Pubkey, StoredAccount>>,
}

impl MemoryRecordStore {
    pub fn new(config: &LiquidityConfig) -> Self {
        Self {
            space: config.record_space(),
            accounts: RwLock::default(),
        }
    }

    /// Bytes reserved for each record.
    pub fn space(&self) -> usize {
        self.space
    }

    pub fn len(&self) -> usize {
        self.accounts.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw account data of a record, if present.
    pub fn account_data(&self, id: &Pubkey) -> Option<Vec<u8>> {
        self.accounts
            .read()
            .unwrap()
            .get(id)
            .map(|account| account.data.clone())
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self, id: &Pubkey) -> Result<LoadedRecord, LiquidityError> {
        let accounts = self.accounts.read().unwrap();
        let account = accounts.get(id).ok_or(LiquidityError::NotFound)?;
        Ok(LoadedRecord {
            record: Liquidity::unpack(&account.data)?,
            version: account.version,
        })
    }

    fn contains(&self, id: &Pubkey) -> bool {
        self.accounts.read().unwrap().contains_key(id)
    }

    fn create(&self, id: &Pubkey, owner: &Pubkey) -> Result<LoadedRecord, LiquidityError> {
        let mut accounts = self.accounts.write().unwrap();
        if accounts.contains_key(id) {
            return Err(LiquidityError::AlreadyExists);
        }
        let record = Liquidity::new(*owner);
        let data = record.pack(self.space)?;
        accounts.insert(*id, StoredAccount { data, version: 0 });
        Ok(LoadedRecord { record, version: 0 })
    }

    fn commit(
        &self,
        id: &Pubkey,
        version: u64,
        record: &Liquidity,
    ) -> Result<u64, LiquidityError> {
        // Pack before taking the lock; the stored bytes are only touched once
        // every check has passed.
        let data = record.pack(self.space)?;
        let mut accounts = self.accounts.write().unwrap();
        let account = accounts.get_mut(id).ok_or(LiquidityError::NotFound)?;
        if account.version != version {
            return Err(LiquidityError::Conflict);
        }
        account.data = data;
        account.version = account.version.wrapping_add(1);
        Ok(account.version)
    }
}
