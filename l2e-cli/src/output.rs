//! Output Formatting

use l2e_api::{
    ApprovedResponse, HealthResponse, ModerateResponse, SubmissionResponse,
    SubmissionStatusResponse,
};
use serde::Serialize;

use crate::commands::OutputFormat;

/// Print as JSON
pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error formatting JSON: {}", e),
    }
}

fn or_dash<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Print health response
pub fn print_health(health: &HealthResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(health),
        OutputFormat::Table => {
            println!("Learn2Earn Service Health");
            println!("=========================");
            println!("Status:  {}", health.status);
            println!("Version: {}", health.version);
            println!("Store:   {}", health.store);
            println!("Signer:  {}", or_dash(&health.signer_address));
        }
    }
}

/// Print a submission list
pub fn print_submissions(submissions: &[SubmissionResponse], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&submissions),
        OutputFormat::Table => {
            if submissions.is_empty() {
                println!("No submissions.");
                return;
            }
            println!(
                "{:<42}  {:<20}  {:<8}  {:<27}  {}",
                "IDENTITY", "NAME", "DECISION", "SUBMITTED", "TX"
            );
            for s in submissions {
                println!(
                    "{:<42}  {:<20}  {:<8}  {:<27}  {}",
                    s.identity,
                    truncate(&s.display_name, 20),
                    s.decision,
                    s.submitted_at.to_rfc3339(),
                    or_dash(&s.transaction_hash)
                );
            }
        }
    }
}

/// Print one submission's status
pub fn print_status(identity: &str, status: &SubmissionStatusResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(status),
        OutputFormat::Table => {
            println!("Submission {}", identity);
            println!("  Name:        {}", status.display_name);
            println!("  Proof:       {}", status.proof_reference);
            println!("  Decision:    {}", status.decision);
            println!("  Submitted:   {}", status.submitted_at.to_rfc3339());
            println!("  Decided:     {}", or_dash(&status.decided_at.map(|t| t.to_rfc3339())));
            println!("  Claimed:     {}", status.claimed);
            println!("  Transaction: {}", or_dash(&status.transaction_hash));
        }
    }
}

/// Print approved participants
pub fn print_approved(entries: &[ApprovedResponse], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&entries),
        OutputFormat::Table => {
            if entries.is_empty() {
                println!("No approved submissions.");
                return;
            }
            for e in entries {
                println!("{:<42}  {}", e.identity, e.display_name);
            }
        }
    }
}

/// Print a moderation result
pub fn print_moderation(result: &ModerateResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(result),
        OutputFormat::Table => {
            println!("{}", result.message);
            println!("  Transaction: {}", result.tx_id);
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
