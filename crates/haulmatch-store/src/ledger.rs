//! Persistent commission ledger

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use haulmatch_domain::service::{CommissionEntry, CommissionStatus};
use haulmatch_types::{Result, StoreError};

/// Persistent ledger of commission entries, keyed by load id
pub struct CommissionLedger {
    ledger_path: PathBuf,
    entries: HashMap<String, CommissionEntry>,
}

impl CommissionLedger {
    /// Create or load a ledger
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let ledger_path = store_dir.join("ledger.json");

        let entries = if ledger_path.exists() {
            let file = File::open(&ledger_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).unwrap_or_default()
        } else {
            HashMap::new()
        };

        Ok(Self {
            ledger_path,
            entries,
        })
    }

    fn save(&self) -> Result<()> {
        let file = File::create(&self.ledger_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.entries)?;
        Ok(())
    }

    /// Accrue a commission entry
    ///
    /// Returns false (and leaves the ledger unchanged) if the load already
    /// has an entry.
    pub fn accrue(&mut self, entry: CommissionEntry) -> Result<bool> {
        if self.entries.contains_key(&entry.load_id) {
            return Ok(false);
        }
        self.entries.insert(entry.load_id.clone(), entry);
        self.save()?;
        Ok(true)
    }

    /// Advance settlement for a load's commission by one step
    pub fn advance(&mut self, load_id: &str) -> Result<CommissionStatus> {
        match self.entries.get_mut(load_id) {
            Some(entry) => {
                let status = entry.advance()?;
                self.save()?;
                Ok(status)
            }
            None => Err(StoreError::NotFound(format!(
                "no commission entry for load {}",
                load_id
            ))
            .into()),
        }
    }

    /// Get a load's commission entry
    pub fn get(&self, load_id: &str) -> Option<&CommissionEntry> {
        self.entries.get(load_id)
    }

    /// All entries, newest first
    pub fn all_entries(&self) -> Vec<&CommissionEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| b.accrued_at.cmp(&a.accrued_at));
        entries
    }

    /// Entries in a given settlement status, newest first
    pub fn entries_by_status(&self, status: CommissionStatus) -> Vec<&CommissionEntry> {
        self.all_entries()
            .into_iter()
            .filter(|e| e.status == status)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Summarize the ledger
    pub fn stats(&self) -> LedgerStats {
        LedgerStats::from_entries(self.entries.values())
    }
}

/// Ledger summary totals
#[derive(Debug, Clone, Default)]
pub struct LedgerStats {
    pub entry_count: usize,
    pub pending_amount: f64,
    pub deducted_amount: f64,
    pub paid_amount: f64,
}

impl LedgerStats {
    pub fn from_entries<'a>(entries: impl Iterator<Item = &'a CommissionEntry>) -> Self {
        let mut stats = LedgerStats::default();
        for entry in entries {
            stats.entry_count += 1;
            match entry.status {
                CommissionStatus::Pending => stats.pending_amount += entry.amount,
                CommissionStatus::Deducted => stats.deducted_amount += entry.amount,
                CommissionStatus::Paid => stats.paid_amount += entry.amount,
            }
        }
        stats
    }

    pub fn total_amount(&self) -> f64 {
        self.pending_amount + self.deducted_amount + self.paid_amount
    }
}
