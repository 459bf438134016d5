//! Append-only, hash-chained event journal.
//!
//! Each record commits to its predecessor:
//! ```text
//! digest[n] = SHA-256( DOMAIN_TAG ‖ digest[n-1] ‖ n ‖ recorded_at ‖ event line )
//! digest[-1] = 0x00…00
//! ```
//!
//! `n` and `recorded_at` are big-endian `u64`. The event line is the
//! event's `Display` form (`KIND key=value ...`), UTF-8.
//!
//! Rewriting, dropping, or reordering any record changes every digest
//! after it, which [`EventJournal::verify_chain`] detects.

use custody_types::constants::{JOURNAL_DOMAIN_TAG, JOURNAL_GENESIS_DIGEST};
use custody_types::{CustodyError, CustodyEvent, Result, Timestamp};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub sequence: u64,
    pub recorded_at: Timestamp,
    pub event: CustodyEvent,
    pub digest: [u8; 32],
}

impl EventRecord {
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

fn chain_digest(
    prev: &[u8; 32],
    sequence: u64,
    recorded_at: Timestamp,
    event: &CustodyEvent,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(JOURNAL_DOMAIN_TAG);
    hasher.update(prev);
    hasher.update(sequence.to_be_bytes());
    hasher.update(recorded_at.as_secs().to_be_bytes());
    hasher.update(event.to_string().as_bytes());
    hasher.finalize().into()
}

/// Per-engine observation log.
#[derive(Debug, Clone)]
pub struct EventJournal {
    records: Vec<EventRecord>,
    head: [u8; 32],
}

impl EventJournal {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            head: JOURNAL_GENESIS_DIGEST,
        }
    }

    /// Append `event`, returning its sequence number.
    pub fn record(&mut self, recorded_at: Timestamp, event: CustodyEvent) -> u64 {
        let sequence = self.records.len() as u64;
        let digest = chain_digest(&self.head, sequence, recorded_at, &event);
        self.head = digest;
        self.records.push(EventRecord {
            sequence,
            recorded_at,
            event,
            digest,
        });
        sequence
    }

    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn events(&self) -> impl Iterator<Item = &CustodyEvent> {
        self.records.iter().map(|r| &r.event)
    }

    /// Events whose [`CustodyEvent::kind`] equals `kind`.
    #[must_use]
    pub fn of_kind(&self, kind: &str) -> Vec<&CustodyEvent> {
        self.events().filter(|e| e.kind() == kind).collect()
    }

    #[must_use]
    pub fn last(&self) -> Option<&CustodyEvent> {
        self.records.last().map(|r| &r.event)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hex digest of the newest record (all zeros when empty).
    #[must_use]
    pub fn head_hex(&self) -> String {
        hex::encode(self.head)
    }

    /// Recompute every digest from genesis.
    ///
    /// # Errors
    /// [`CustodyError::JournalTampered`] at the first record that does not
    /// match.
    pub fn verify_chain(&self) -> Result<()> {
        verify_records(&self.records)
    }

    /// Export as a JSON array of records.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.records)?)
    }
}

/// Check an exported sequence of records, e.g. one read back from JSON.
pub fn verify_records(records: &[EventRecord]) -> Result<()> {
    let mut prev = JOURNAL_GENESIS_DIGEST;
    for (expected_seq, record) in (0u64..).zip(records) {
        let digest = chain_digest(&prev, expected_seq, record.recorded_at, &record.event);
        if record.sequence != expected_seq || record.digest != digest {
            return Err(CustodyError::JournalTampered {
                sequence: expected_seq,
            });
        }
        prev = digest;
    }
    Ok(())
}

impl Default for EventJournal {
    fn default() -> Self {
        Self::new()
    }
}
