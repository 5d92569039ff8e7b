//! SQLite schema definitions

/// Submissions table name
pub const SUBMISSIONS_TABLE: &str = "submissions";

/// Complete schema, one statement per entry
pub const L2E_SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS submissions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    identity TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    proof_reference TEXT NOT NULL,
    submitted_at TEXT NOT NULL,
    decision TEXT NOT NULL DEFAULT 'pending'
        CHECK (decision IN ('pending', 'approved', 'rejected')),
    decided_at TEXT,
    moderator_notes TEXT,
    reward_claimed INTEGER NOT NULL DEFAULT 0
        CHECK (reward_claimed = 0 OR decision = 'approved'),
    claimed_at TEXT,
    ledger_tx_id TEXT
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_submissions_submitted_at ON submissions (submitted_at)",
    "CREATE INDEX IF NOT EXISTS idx_submissions_decision ON submissions (decision)",
];
