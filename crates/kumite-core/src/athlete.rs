//! Athletes and their scouting notes.

use serde::{Deserialize, Serialize};

use crate::{AthleteId, Error, Result};

/// A registered competitor.
///
/// `(firstname, lastname)` is unique across the store. The name is fixed once
/// the athlete is created; only `features` and `tactics` can change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Athlete {
  pub id:        AthleteId,
  pub firstname: String,
  pub lastname:  String,
  /// Free-text notes on physical traits and habits.
  pub features:  String,
  /// Free-text notes on how to fight this athlete.
  pub tactics:   String,
}

impl Athlete {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.firstname, self.lastname)
  }

  /// Case-insensitive substring match on either name. A blank query matches
  /// every athlete.
  pub fn matches_query(&self, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
      || self.firstname.to_lowercase().contains(&query)
      || self.lastname.to_lowercase().contains(&query)
  }
}

/// Input to [`crate::store::AthleteRepository::create_athlete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAthlete {
  pub firstname: String,
  pub lastname:  String,
}

impl NewAthlete {
  pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
    Self { firstname: firstname.into(), lastname: lastname.into() }
  }

  /// Trim both names and reject blanks.
  pub fn validate(self) -> Result<Self> {
    let firstname = self.firstname.trim().to_owned();
    let lastname = self.lastname.trim().to_owned();
    if firstname.is_empty() || lastname.is_empty() {
      return Err(Error::EmptyAthleteName);
    }
    Ok(Self { firstname, lastname })
  }
}

/// Aggregate record of an athlete over every match they fought.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteStats {
  pub total_matches: u64,
  /// Matches where the athlete's side scored strictly more than the other.
  pub wins:          u64,
  /// Sum of the athlete's own side score.
  pub total_points:  i64,
}
