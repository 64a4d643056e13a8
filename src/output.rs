//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use serde::Serialize;

use crate::core::models::{ApprovalFilter, Person, VerificationRecord};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Result of a record listing
#[derive(Debug, Serialize)]
pub struct RecordList {
    /// Whether the listing succeeded
    pub success: bool,
    /// Filter the listing was made with
    #[serde(skip)]
    pub filter: ApprovalFilter,
    /// The records
    pub verifications: Vec<VerificationRecord>,
}

impl RecordList {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        if self.verifications.is_empty() {
            match self.filter {
                ApprovalFilter::All => println!("No verification data available."),
                filter => println!("No {filter} verifications."),
            }
            return;
        }

        println!("{:<38} {:<12} {:<13} {:<9}", "TRANSACTION", "SHORT", "STATUS", "DECISION");
        for record in &self.verifications {
            println!(
                "{:<38} {:<12} {:<13} {:<9}",
                record.transaction_guid,
                record.short_guid,
                verified_label(record),
                record.approved
            );
        }
        println!("\n{} verification(s)", self.verifications.len());
    }
}

/// A single record, shown in full
#[derive(Debug, Serialize)]
pub struct RecordDetail {
    /// Whether the lookup succeeded
    pub success: bool,
    /// The record
    pub verification: VerificationRecord,
}

impl RecordDetail {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => render_record(&self.verification),
            OutputMode::Json => print_json(self),
        }
    }
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl OperationResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.message),
            OutputMode::Json => print_json(self),
        }
    }
}

fn verified_label(record: &VerificationRecord) -> &'static str {
    if record.verified { "Verified" } else { "Not Verified" }
}

fn render_record(record: &VerificationRecord) {
    println!("Transaction: {}", record.transaction_guid);
    println!("  Short GUID: {}", record.short_guid);
    println!("  Status:     {}", verified_label(record));
    println!("  Decision:   {}", record.approved);
    println!("  Source:     {}", record.source);
    let person = &record.person;
    for (label, key) in [
        ("Surname", Person::SURNAME),
        ("Forenames", Person::FORENAMES),
        ("National ID", Person::NATIONAL_ID),
        ("Card ID", Person::CARD_ID),
    ] {
        if let Some(value) = person.text(key) {
            println!("  {label:<11} {value}");
        }
    }
    if let Some(ts) = record.request_timestamp {
        println!("  Requested:  {}", ts.to_rfc3339());
    }
    if let Some(ts) = record.response_timestamp {
        println!("  Received:   {}", ts.to_rfc3339());
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize output: {e}"),
    }
}
