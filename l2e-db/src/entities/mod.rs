//! Database entities

mod submission;

pub use submission::*;
