//! Decision commands - approve or reject a record

use idverify::api;
use idverify::config::Config;
use idverify::core::services::Reconciler;
use idverify::output::{OperationResult, OutputMode};

/// Admin decision to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Mark the record approved
    Approve,
    /// Mark the record rejected
    Reject,
}

/// Apply an admin decision to one record
pub fn decide(
    config: &Config,
    transaction_guid: &str,
    decision: Decision,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let reconciler = Reconciler::new(api::open_store(config)?);
    let (record, verb) = match decision {
        Decision::Approve => (reconciler.approve(transaction_guid)?, "approved"),
        Decision::Reject => (reconciler.reject(transaction_guid)?, "rejected"),
    };

    OperationResult {
        success: true,
        message: format!("Verification {} {verb}", record.transaction_guid),
    }
    .render(mode);
    Ok(())
}
