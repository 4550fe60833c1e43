//! Tournaments and their dates.
//!
//! The store keeps the date as an opaque string and sorts on it. Dates written
//! by this crate are ISO 8601 (`YYYY-MM-DD`), which sorts chronologically.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, TournamentId};

/// Shortest accepted tournament name, in characters.
pub const TOURNAMENT_NAME_MIN_LEN: usize = 5;

const ISO_DATE: &str = "%Y-%m-%d";
const DISPLAY_DATE: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
  pub id:   TournamentId,
  pub name: String,
  pub date: String,
}

impl Tournament {
  pub fn parsed_date(&self) -> Option<NaiveDate> { parse_date(&self.date) }

  /// The date as `DD/MM/YYYY`, or the raw stored string if it isn't ISO.
  pub fn display_date(&self) -> String {
    self
      .parsed_date()
      .map(|d| d.format(DISPLAY_DATE).to_string())
      .unwrap_or_else(|| self.date.clone())
  }
}

/// Input to [`crate::store::TournamentRepository::create_tournament`] and
/// [`crate::store::TournamentRepository::update_tournament`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTournament {
  pub name: String,
  pub date: String,
}

impl NewTournament {
  pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
    Self { name: name.into(), date: date.into() }
  }

  /// Use the canonical stored form of `date`.
  pub fn on(name: impl Into<String>, date: NaiveDate) -> Self {
    Self::new(name, canonical_date(date))
  }

  pub fn validate(self) -> Result<Self> {
    validate_tournament_name(&self.name)?;
    Ok(self)
  }
}

/// Counts over the matches held at one tournament.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentStats {
  pub total_matches:   u64,
  /// Distinct athletes across both sides.
  pub unique_athletes: u64,
}

pub fn validate_tournament_name(name: &str) -> Result<()> {
  let len = name.trim().chars().count();
  if len < TOURNAMENT_NAME_MIN_LEN {
    return Err(Error::TournamentNameTooShort {
      min: TOURNAMENT_NAME_MIN_LEN,
      len,
    });
  }
  Ok(())
}

pub fn canonical_date(date: NaiveDate) -> String {
  date.format(ISO_DATE).to_string()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), ISO_DATE).ok()
}
