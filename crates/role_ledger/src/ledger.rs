//! On-disk ledger of SCP tickets and human role history.
//!
//! The ledger file holds MessagePack compressed with LZ4 (size prepended).
//! A `<file>.meta.json` sidecar carries the SHA256 of the file body.

use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use role_core::{PlayerId, RoleHistoryStore, RoleId, TicketStore, HISTORY_LENGTH};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::{rename, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Current ledger format version
pub const LEDGER_VERSION: u32 = 1;

/// Ticket counters keyed by player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketBook(BTreeMap<PlayerId, i32>);

impl TicketBook {
    pub fn get(&self, player: PlayerId) -> Option<i32> {
        self.0.get(&player).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, i32)> + '_ {
        self.0.iter().map(|(id, value)| (*id, *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TicketStore for TicketBook {
    fn get_tickets(&self, player: PlayerId, default: i32) -> i32 {
        self.0.get(&player).copied().unwrap_or(default)
    }

    fn modify_tickets(&mut self, player: PlayerId, value: i32) {
        self.0.insert(player, value.max(0));
    }
}

/// Recent human roles keyed by player, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryBook {
    #[serde(skip, default = "default_history_limit")]
    limit: usize,
    entries: BTreeMap<PlayerId, Vec<RoleId>>,
}

fn default_history_limit() -> usize {
    HISTORY_LENGTH
}

impl Default for HistoryBook {
    fn default() -> Self {
        Self { limit: HISTORY_LENGTH, entries: BTreeMap::new() }
    }
}

impl HistoryBook {
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Changes the retained length and trims existing entries to it.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        for entry in self.entries.values_mut() {
            if entry.len() > limit {
                let excess = entry.len() - limit;
                entry.drain(..excess);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RoleHistoryStore for HistoryBook {
    fn history(&self, player: PlayerId) -> &[RoleId] {
        self.entries.get(&player).map(Vec::as_slice).unwrap_or(&[])
    }

    fn record(&mut self, player: PlayerId, role: RoleId) {
        let limit = self.limit;
        let entry = self.entries.entry(player).or_default();
        entry.push(role);
        if entry.len() > limit {
            let excess = entry.len() - limit;
            entry.drain(..excess);
        }
    }
}

/// Everything the selector remembers between rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub version: u32,
    pub tickets: TicketBook,
    pub history: HistoryBook,
    pub updated_at: DateTime<Utc>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Sidecar describing a saved ledger file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerMetadata {
    pub version: u32,
    /// SHA256 of the ledger file (hex)
    pub checksum: String,
    pub updated_at: DateTime<Utc>,
    pub players: usize,
    /// Ledger file size (bytes)
    pub compressed_size: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            version: LEDGER_VERSION,
            tickets: TicketBook::default(),
            history: HistoryBook::default(),
            updated_at: Utc::now(),
        }
    }

    /// Players with either tickets or history on record.
    pub fn player_count(&self) -> usize {
        let mut ids: Vec<PlayerId> = self.tickets.0.keys().copied().collect();
        ids.extend(self.history.entries.keys().copied());
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Serialize and compress
    pub fn encode(&self) -> Result<Vec<u8>, LedgerError> {
        let msgpack = to_vec_named(self)?;
        Ok(compress_prepend_size(&msgpack))
    }

    /// Decompress and deserialize, rejecting unknown versions.
    pub fn decode(bytes: &[u8]) -> Result<Self, LedgerError> {
        let msgpack = decompress_size_prepended(bytes).map_err(|_| LedgerError::Decompression)?;
        let ledger: Ledger = from_slice(&msgpack)?;

        if ledger.version != LEDGER_VERSION {
            return Err(LedgerError::VersionMismatch {
                found: ledger.version,
                expected: LEDGER_VERSION,
            });
        }

        Ok(ledger)
    }

    /// Stamps `updated_at`, then writes the ledger and its sidecar.
    ///
    /// Both files are written to a temp path first and renamed into place.
    pub fn save(&mut self, path: &Path) -> Result<LedgerMetadata, LedgerError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        self.updated_at = Utc::now();
        let data = self.encode()?;

        let metadata = LedgerMetadata {
            version: self.version,
            checksum: sha256_hex(&data),
            updated_at: self.updated_at,
            players: self.player_count(),
            compressed_size: data.len() as u64,
        };

        write_atomic(path, &data)?;
        write_atomic(&metadata_path(path), serde_json::to_string_pretty(&metadata)?.as_bytes())?;

        log::debug!("Saved ledger ({} bytes, {} players) to {:?}", data.len(), metadata.players, path);
        Ok(metadata)
    }

    /// Reads a ledger, checking it against its sidecar when one exists.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        let data = std::fs::read(path)?;

        match read_metadata(path)? {
            Some(metadata) => {
                let actual = sha256_hex(&data);
                if actual != metadata.checksum {
                    return Err(LedgerError::ChecksumMismatch {
                        expected: metadata.checksum,
                        actual,
                    });
                }
            }
            None => log::warn!("No metadata next to {:?}, skipping checksum check", path),
        }

        let ledger = Self::decode(&data)?;
        log::debug!("Loaded ledger ({} bytes) from {:?}", data.len(), path);
        Ok(ledger)
    }

    /// Like [`Ledger::load`], but a missing file yields an empty ledger.
    pub fn load_or_default(path: &Path) -> Result<Self, LedgerError> {
        if !path.exists() {
            log::info!("No ledger at {:?}, starting fresh", path);
            return Ok(Self::new());
        }
        Self::load(path)
    }
}

/// `<file>.meta.json` next to the ledger file.
pub fn metadata_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".meta.json");
    path.with_file_name(name)
}

/// Checks a ledger file against an expected SHA256.
pub fn verify_ledger(path: &Path, expected_checksum: &str) -> Result<bool, LedgerError> {
    let bytes = std::fs::read(path)?;
    Ok(sha256_hex(&bytes) == expected_checksum)
}

fn read_metadata(path: &Path) -> Result<Option<LedgerMetadata>, LedgerError> {
    let meta_path = metadata_path(path);
    if !meta_path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(&meta_path)?;
    Ok(Some(serde_json::from_str(&json)?))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), LedgerError> {
    let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    {
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.flush()?;
        file.sync_all()?;
    }

    rename(&temp_path, path)?;
    Ok(())
}
