//! Channel Integrations
//!
//! Chat-platform adapters. Discord is the only channel today; the relay
//! core in [`crate::relay`] is platform-independent so further channels
//! stay thin.

pub mod discord;
