//! Persistence gateway — durable JSON snapshots, one file per journal key.
//!
//! The ledger is the only irrecoverable user data in the system, so saves
//! follow a write/verify/retry-once discipline: write the snapshot, read it
//! back, compare; on any mismatch retry the whole write once, and only then
//! surface a `PersistenceError`. Modeled as a small explicit loop, not
//! nested callbacks.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use tradelog_core::domain::{JournalSnapshot, TradeRecord};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("journal '{key}' I/O failure: {source}")]
    Io {
        key: String,
        source: std::io::Error,
    },

    #[error("journal '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    #[error("journal '{key}' write could not be verified after retry")]
    VerifyFailed { key: String },
}

/// File-backed gateway. Read-only consumer of the store: it serializes what
/// it is given and never mutates ledger state.
#[derive(Debug, Clone)]
pub struct FileGateway {
    data_dir: PathBuf,
    /// Forces the next N read-back verifications to report a mismatch, so
    /// the retry loop can be driven without real disk faults.
    #[cfg(test)]
    fail_verifications: std::cell::Cell<u32>,
}

impl FileGateway {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            #[cfg(test)]
            fail_verifications: std::cell::Cell::new(0),
        }
    }

    /// Durably save the full trade array for a journal key, replacing any
    /// prior snapshot.
    pub fn save_journal(&self, key: &str, trades: &[TradeRecord]) -> Result<(), PersistenceError> {
        let path = self.journal_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                key: key.into(),
                source,
            })?;
        }

        let snapshot = JournalSnapshot::new(key, trades.to_vec());
        let payload =
            serde_json::to_string_pretty(&snapshot).map_err(|source| PersistenceError::Corrupt {
                key: key.into(),
                source,
            })?;

        // Write → verify → [ok | retry once → write → verify] → ok | fail.
        for attempt in 1..=2 {
            fs::write(&path, &payload).map_err(|source| PersistenceError::Io {
                key: key.into(),
                source,
            })?;
            if self.verify(&path, &snapshot) {
                return Ok(());
            }
            warn!(key, attempt, "journal write verification failed");
        }
        Err(PersistenceError::VerifyFailed { key: key.into() })
    }

    /// Load the stored array, or an empty array if no snapshot exists for
    /// the key. A present but unreadable snapshot is an error.
    pub fn load_journal(&self, key: &str) -> Result<Vec<TradeRecord>, PersistenceError> {
        let path = self.journal_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(PersistenceError::Io {
                    key: key.into(),
                    source,
                });
            }
        };
        let snapshot: JournalSnapshot =
            serde_json::from_str(&content).map_err(|source| PersistenceError::Corrupt {
                key: key.into(),
                source,
            })?;
        Ok(snapshot.trades)
    }

    /// Read back and compare against what was just written.
    fn verify(&self, path: &Path, expected: &JournalSnapshot) -> bool {
        #[cfg(test)]
        {
            let remaining = self.fail_verifications.get();
            if remaining > 0 {
                self.fail_verifications.set(remaining - 1);
                return false;
            }
        }
        let Ok(content) = fs::read_to_string(path) else {
            return false;
        };
        match serde_json::from_str::<JournalSnapshot>(&content) {
            Ok(on_disk) => on_disk == *expected,
            Err(_) => false,
        }
    }

    pub fn journal_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Journal keys come from the page shell (fund names and the like); map them
/// onto safe file names.
fn sanitize_key(key: &str) -> String {
    let sanitized: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "journal".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tradelog_core::domain::{OpenState, Outcome, Side};

    fn trade(id: u64, return_amount: f64) -> TradeRecord {
        TradeRecord {
            id,
            open_state: OpenState::Closed,
            outcome: Outcome::from_return(return_amount),
            date_opened: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            date_closed: Some(NaiveDate::from_ymd_opt(2024, 2, 8).unwrap()),
            symbol: "GLD".into(),
            entry_price: 180.0,
            exit_price: 185.0,
            size: 20,
            side: Side::Long,
            return_amount,
            principle_refs: vec![1, 2],
            asset_refs: vec![4],
        }
    }

    fn temp_gateway(name: &str) -> (FileGateway, PathBuf) {
        let dir = std::env::temp_dir().join(format!("tradelog_gateway_{name}"));
        let _ = fs::remove_dir_all(&dir);
        (FileGateway::new(&dir), dir)
    }

    #[test]
    fn roundtrip() {
        let (gateway, dir) = temp_gateway("roundtrip");
        let trades = vec![trade(2, -40.0), trade(1, 100.0)];

        gateway.save_journal("alpha fund", &trades).unwrap();
        let loaded = gateway.load_journal("alpha fund").unwrap();
        assert_eq!(loaded, trades);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_array_roundtrips() {
        let (gateway, dir) = temp_gateway("empty");
        gateway.save_journal("main", &[]).unwrap();
        assert_eq!(gateway.load_journal("main").unwrap(), Vec::new());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_key_loads_empty_never_errors() {
        let (gateway, dir) = temp_gateway("missing");
        assert_eq!(gateway.load_journal("nope").unwrap(), Vec::new());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_replaces_prior_snapshot() {
        let (gateway, dir) = temp_gateway("replace");
        gateway.save_journal("main", &[trade(1, 10.0)]).unwrap();
        gateway.save_journal("main", &[trade(2, -5.0)]).unwrap();
        let loaded = gateway.load_journal("main").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 2);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let (gateway, dir) = temp_gateway("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(gateway.journal_path("main"), "{ not json").unwrap();
        assert!(matches!(
            gateway.load_journal("main"),
            Err(PersistenceError::Corrupt { .. })
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn transient_verify_failure_is_retried_once() {
        let (gateway, dir) = temp_gateway("retry_once");
        gateway.fail_verifications.set(1);

        gateway.save_journal("main", &[trade(1, 25.0)]).unwrap();

        // The forced failure was consumed and the rewrite landed.
        assert_eq!(gateway.fail_verifications.get(), 0);
        assert_eq!(gateway.load_journal("main").unwrap().len(), 1);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn persistent_verify_failure_errors_after_single_retry() {
        let (gateway, dir) = temp_gateway("retry_exhausted");
        gateway.fail_verifications.set(3);

        let err = gateway.save_journal("main", &[trade(1, 25.0)]).unwrap_err();
        assert!(matches!(err, PersistenceError::VerifyFailed { .. }));

        // Two verification attempts ran (initial write plus one retry),
        // leaving one scripted failure unconsumed.
        assert_eq!(gateway.fail_verifications.get(), 1);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn keys_are_sanitized_into_file_names() {
        let gateway = FileGateway::new("/tmp/x");
        let path = gateway.journal_path("Macro/Global Fund #2");
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "Macro_Global_Fund__2.json"
        );
    }
}
