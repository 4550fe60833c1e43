//! Error types for `kumite-core`.

use thiserror::Error;

use crate::{AthleteId, scoring::Technique};

/// Input rejected before it reaches a store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("tournament name must be at least {min} characters, got {len}")]
  TournamentNameTooShort { min: usize, len: usize },

  #[error("athlete first and last name must not be empty")]
  EmptyAthleteName,

  #[error("athlete {0} cannot fight on both sides of a match")]
  SameAthleteOnBothSides(AthleteId),

  #[error("unknown technique: {0:?}")]
  UnknownTechnique(String),

  #[error("{technique} count must not be negative, got {count}")]
  NegativeCount { technique: Technique, count: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
