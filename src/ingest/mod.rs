pub mod filesystem;
pub mod parse;

use crate::error::{RecordError, Result, ScoreError};
use crate::types::transaction::Transaction;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::Path;

const PROGRESS_INTERVAL: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    pub source: String,
    pub index: usize,
    pub tx_hash: Option<String>,
    pub reason: RecordError,
}

#[derive(Debug, Clone, Default)]
pub struct Shard {
    pub source: String,
    pub records_seen: usize,
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<RejectedRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct Input {
    pub shards: Vec<Shard>,
    // sha256 over every shard's raw bytes, in shard order
    pub sha256: String,
}

impl Input {
    pub fn records_seen(&self) -> usize {
        self.shards.iter().map(|shard| shard.records_seen).sum()
    }

    pub fn rejected(&self) -> impl Iterator<Item = &RejectedRecord> {
        self.shards.iter().flat_map(|shard| shard.rejected.iter())
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.shards.iter().flat_map(|shard| shard.transactions.iter())
    }
}

pub fn read_input(path: &Path) -> Result<Input> {
    if !path.exists() {
        return Err(ScoreError::InputNotFound(path.display().to_string()));
    }

    let files = if path.is_dir() {
        filesystem::list_json_files(path)
    } else {
        vec![path.to_path_buf()]
    };

    let mut hasher = Sha256::new();
    let mut shards = Vec::with_capacity(files.len());
    for file in &files {
        let bytes = std::fs::read(file)?;
        hasher.update(&bytes);
        let source = file.display().to_string();
        shards.push(parse_shard(&source, &bytes)?);
    }

    Ok(Input {
        shards,
        sha256: format!("{:x}", hasher.finalize()),
    })
}

pub fn parse_shard(source: &str, bytes: &[u8]) -> Result<Shard> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|e| ScoreError::InputParse(format!("{source}: {e}")))?;
    let Value::Array(records) = document else {
        return Err(ScoreError::InputParse(format!(
            "{source}: expected a JSON array of transaction records"
        )));
    };

    tracing::info!(source, records = records.len(), "loaded transaction records");
    Ok(parse_records(source, &records))
}

pub fn parse_records(source: &str, records: &[Value]) -> Shard {
    let mut shard = Shard {
        source: source.to_string(),
        records_seen: records.len(),
        transactions: Vec::with_capacity(records.len()),
        rejected: Vec::new(),
    };

    for (index, value) in records.iter().enumerate() {
        if (index + 1) % PROGRESS_INTERVAL == 0 {
            tracing::debug!(source, processed = index + 1, total = records.len(), "ingest progress");
        }
        match parse::parse_record(value) {
            Ok(transaction) => shard.transactions.push(transaction),
            Err(reason) => {
                let tx_hash = parse::tx_hash(value);
                tracing::debug!(source, index, tx_hash = ?tx_hash, %reason, "skipping malformed record");
                shard.rejected.push(RejectedRecord {
                    source: source.to_string(),
                    index,
                    tx_hash,
                    reason,
                });
            }
        }
    }

    if !shard.rejected.is_empty() {
        tracing::warn!(
            source,
            rejected = shard.rejected.len(),
            accepted = shard.transactions.len(),
            "skipped malformed transaction records"
        );
    }
    shard
}
