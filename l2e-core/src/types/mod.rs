//! Learn2Earn domain types

mod address;
mod outcome;
mod submission;

pub use address::*;
pub use outcome::*;
pub use submission::*;
