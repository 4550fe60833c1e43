//! Matches (bouts) between two athletes at a tournament.
//!
//! Every per-side field comes in an ao/aka pair. The sides are positions in
//! the bout, not interchangeable roles, so they are kept apart by [`Side`]
//! rather than stored in a two-element array.

use serde::{Deserialize, Serialize};

use crate::{
  AthleteId, Error, MatchId, Result, TournamentId,
  athlete::Athlete,
  scoring::{ScoredTally, Tally},
  tournament::Tournament,
};

// ─── Side ────────────────────────────────────────────────────────────────────

/// One of the two competitor positions: ao (blue) or aka (red).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
  Ao,
  Aka,
}

impl Side {
  pub fn opponent(self) -> Self {
    match self {
      Self::Ao => Self::Aka,
      Self::Aka => Self::Ao,
    }
  }
}

// ─── Stored match ────────────────────────────────────────────────────────────

/// Everything recorded for one side of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corner {
  pub athlete_id: AthleteId,
  pub tally:      Tally,
  /// Cached score, written together with `tally`.
  pub score:      i64,
  pub summary:    String,
}

/// A match row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
  pub id:            MatchId,
  pub tournament_id: TournamentId,
  pub ao:            Corner,
  pub aka:           Corner,
  pub description:   String,
}

impl Match {
  pub fn corner(&self, side: Side) -> &Corner {
    match side {
      Side::Ao => &self.ao,
      Side::Aka => &self.aka,
    }
  }

  /// Which side `athlete` fought on, if any.
  pub fn side_of(&self, athlete: AthleteId) -> Option<Side> {
    if self.ao.athlete_id == athlete {
      Some(Side::Ao)
    } else if self.aka.athlete_id == athlete {
      Some(Side::Aka)
    } else {
      None
    }
  }

  /// The side with the strictly higher score; `None` on a draw.
  pub fn winner(&self) -> Option<Side> {
    use std::cmp::Ordering;
    match self.ao.score.cmp(&self.aka.score) {
      Ordering::Greater => Some(Side::Ao),
      Ordering::Less => Some(Side::Aka),
      Ordering::Equal => None,
    }
  }
}

/// A match with both athletes and its tournament resolved.
///
/// Built by a join on every read and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchWithAthletes {
  #[serde(flatten)]
  pub bout:        Match,
  pub ao_athlete:  Athlete,
  pub aka_athlete: Athlete,
  pub tournament:  Tournament,
}

impl MatchWithAthletes {
  pub fn athlete(&self, side: Side) -> &Athlete {
    match side {
      Side::Ao => &self.ao_athlete,
      Side::Aka => &self.aka_athlete,
    }
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::MatchRepository::create_match`].
///
/// Scores travel inside [`ScoredTally`], so they are computed from the same
/// counts that get stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
  pub tournament_id:  TournamentId,
  pub ao_athlete_id:  AthleteId,
  pub aka_athlete_id: AthleteId,
  pub ao:             ScoredTally,
  pub aka:            ScoredTally,
  pub description:    String,
  pub ao_summary:     String,
  pub aka_summary:    String,
}

impl NewMatch {
  /// A match with empty tallies and notes, as the entry wizard starts it.
  pub fn new(
    tournament_id: TournamentId,
    ao_athlete_id: AthleteId,
    aka_athlete_id: AthleteId,
  ) -> Self {
    Self {
      tournament_id,
      ao_athlete_id,
      aka_athlete_id,
      ao: ScoredTally::default(),
      aka: ScoredTally::default(),
      description: String::new(),
      ao_summary: String::new(),
      aka_summary: String::new(),
    }
  }

  pub fn with_tallies(mut self, ao: Tally, aka: Tally) -> Self {
    self.ao = ao.into();
    self.aka = aka.into();
    self
  }

  pub fn validate(self) -> Result<Self> {
    if self.ao_athlete_id == self.aka_athlete_id {
      return Err(Error::SameAthleteOnBothSides(self.ao_athlete_id));
    }
    Ok(self)
  }
}

/// A sparse match update. Only `Some` fields are written.
///
/// A side's tally can only be replaced together with its recomputed score,
/// which [`ScoredTally`] carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPatch {
  pub ao:          Option<ScoredTally>,
  pub aka:         Option<ScoredTally>,
  pub description: Option<String>,
  pub ao_summary:  Option<String>,
  pub aka_summary: Option<String>,
}

impl MatchPatch {
  /// Replace both tallies.
  pub fn tallies(ao: Tally, aka: Tally) -> Self {
    Self { ao: Some(ao.into()), aka: Some(aka.into()), ..Self::default() }
  }

  /// Replace the free-text fields; scores are untouched.
  pub fn notes(
    description: impl Into<String>,
    ao_summary: impl Into<String>,
    aka_summary: impl Into<String>,
  ) -> Self {
    Self {
      description: Some(description.into()),
      ao_summary: Some(ao_summary.into()),
      aka_summary: Some(aka_summary.into()),
      ..Self::default()
    }
  }

  pub fn is_empty(&self) -> bool { *self == Self::default() }
}
