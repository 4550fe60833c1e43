//! Error type for `kumite-store-sqlite`.

use kumite_core::{AthleteId, MatchId, TournamentId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid input: {0}")]
  Core(#[from] kumite_core::Error),

  /// Any failure of the underlying database: open, I/O, or a broken
  /// transaction.
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("athlete {firstname} {lastname} already exists")]
  DuplicateAthlete { firstname: String, lastname: String },

  #[error("athlete {athlete_id} is still referenced by {matches} match(es)")]
  AthleteInUse { athlete_id: AthleteId, matches: u64 },

  #[error("match refers to a tournament or athlete that does not exist")]
  MissingReference,

  #[error("athlete not found: {0}")]
  AthleteNotFound(AthleteId),

  #[error("tournament not found: {0}")]
  TournamentNotFound(TournamentId),

  #[error("match not found: {0}")]
  MatchNotFound(MatchId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
