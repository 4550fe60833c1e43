//! Core types and trait definitions for the kumite bout recorder.
//!
//! This crate has no database or runtime dependencies.
//! The SQLite backend, the catalog facade and the CLI all depend on it.

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// returned futures instead.
#![allow(async_fn_in_trait)]

pub mod athlete;
pub mod bout;
pub mod error;
pub mod id;
pub mod scoring;
pub mod store;
pub mod tournament;

pub use error::{Error, Result};
pub use id::{AthleteId, MatchId, TournamentId};
