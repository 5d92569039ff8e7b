//! Learn2Earn API Server
//!
//! REST API for proof-of-completion submissions and their moderation.
//!
//! ## Endpoints
//!
//! ### Health
//! - GET /health - Liveness, version, signer address
//! - GET /ready - Store connectivity
//!
//! ### Submissions (under /api/v1)
//! - POST /submissions - Submit proof of completion
//! - GET /submissions - All submissions, newest first
//! - GET /submissions/approved - Approved participants
//! - GET /submissions/pending - Moderation queue, oldest first
//! - GET /submissions/:identity - Submission status
//!
//! ### Moderation (under /api/v1)
//! - PUT /submissions/:identity/approve - Approve or reject (`x-moderator-key`)

pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;

pub use dto::*;
pub use error::*;
pub use routes::*;
pub use server::*;
pub use services::{ModerationError, ModerationRequest, ModerationWorkflow};
pub use state::*;
