//! Record commands - list and inspect verification records

use idverify::api;
use idverify::config::Config;
use idverify::core::models::ApprovalFilter;
use idverify::core::services::Reconciler;
use idverify::output::{OutputMode, RecordDetail, RecordList};

/// List records matching a decision filter
pub fn results(config: &Config, filter: ApprovalFilter, mode: OutputMode) -> anyhow::Result<()> {
    let reconciler = Reconciler::new(api::open_store(config)?);
    let verifications = reconciler.list(filter)?;

    RecordList {
        success: true,
        filter,
        verifications,
    }
    .render(mode);
    Ok(())
}

/// Show one record in full
pub fn show(config: &Config, transaction_guid: &str, mode: OutputMode) -> anyhow::Result<()> {
    let reconciler = Reconciler::new(api::open_store(config)?);
    let verification = reconciler.find(transaction_guid)?;

    RecordDetail {
        success: true,
        verification,
    }
    .render(mode);
    Ok(())
}
