//! Request-scoped services

mod identity_lock;
mod moderation;

pub use identity_lock::{IdentityGuard, IdentityLocks};
pub use moderation::{
    ModerationError, ModerationReceipt, ModerationRequest, ModerationResult, ModerationWorkflow,
};
