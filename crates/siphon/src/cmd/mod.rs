//! Command implementations for the Siphon CLI

pub mod check;
pub mod pull;
pub mod serve;
