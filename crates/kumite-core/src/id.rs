//! Integer row identifiers.
//!
//! The store assigns them with `AUTOINCREMENT`, so an id is never reused after
//! its row is deleted. Each entity gets its own newtype so an athlete id can't
//! be passed where a tournament id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AthleteId(pub i64);

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TournamentId(pub i64);

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MatchId(pub i64);

impl From<i64> for AthleteId {
  fn from(v: i64) -> Self { Self(v) }
}

impl From<i64> for TournamentId {
  fn from(v: i64) -> Self { Self(v) }
}

impl From<i64> for MatchId {
  fn from(v: i64) -> Self { Self(v) }
}

impl fmt::Display for AthleteId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

impl fmt::Display for TournamentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

impl fmt::Display for MatchId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}
