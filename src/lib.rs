pub mod aggregate;
pub mod config;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod report;
pub mod score;
pub mod types;

pub use error::{IntegrityError, RecordError, Result, ScoreError};
pub use types::config::ScoringRules;
pub use types::features::{FeatureMap, WalletFeatures};
pub use types::scoring::{Contribution, Rule, WalletScore};
pub use types::transaction::{Action, Transaction};
