//! The scoring engine: techniques, per-side tallies and their point totals.
//!
//! A side's score is never entered by hand. It is always the sum of
//! `count × points` over the seven techniques of that side's [`Tally`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::{Error, Result};

// ─── Technique ───────────────────────────────────────────────────────────────

/// A scoring action. The point value of each technique is fixed.
///
/// Names are kebab-case (`gyaku-jodan`). The older `jyaku-*` spelling is still
/// accepted when parsing but is never produced.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Technique {
  Kizami,
  #[strum(to_string = "gyaku-jodan", serialize = "jyaku-jodan")]
  GyakuJodan,
  #[strum(to_string = "gyaku-chudan", serialize = "jyaku-chudan")]
  GyakuChudan,
  ChudanMawashi,
  JodanMawashi,
  Uramawashi,
  Sweep,
}

impl Technique {
  /// Points awarded for one clean execution of this technique.
  pub const fn points(self) -> i64 {
    match self {
      Self::Kizami | Self::GyakuJodan | Self::GyakuChudan => 1,
      Self::ChudanMawashi => 2,
      Self::JodanMawashi | Self::Uramawashi | Self::Sweep => 3,
    }
  }

  /// Parse a technique name, mapping failures into the crate error.
  pub fn parse(name: &str) -> Result<Self> {
    Self::from_str(name.trim())
      .map_err(|_| Error::UnknownTechnique(name.trim().to_owned()))
  }
}

// ─── Coercion ────────────────────────────────────────────────────────────────

/// Turn raw form input into a count. Missing or non-numeric input counts as
/// zero; nothing is rejected here.
pub fn coerce_count(raw: Option<&str>) -> i64 {
  raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(0)
}

// ─── Tally ───────────────────────────────────────────────────────────────────

/// Hit counts for one side of a match.
///
/// Counts are signed so that a bad value read back from storage still sums
/// deterministically; [`Tally::decrement`] is the guard that keeps interactive
/// input at zero or above.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
  pub kizami:         i64,
  pub gyaku_jodan:    i64,
  pub gyaku_chudan:   i64,
  pub chudan_mawashi: i64,
  pub jodan_mawashi:  i64,
  pub uramawashi:     i64,
  pub sweep:          i64,
}

impl Tally {
  pub fn get(&self, technique: Technique) -> i64 {
    match technique {
      Technique::Kizami => self.kizami,
      Technique::GyakuJodan => self.gyaku_jodan,
      Technique::GyakuChudan => self.gyaku_chudan,
      Technique::ChudanMawashi => self.chudan_mawashi,
      Technique::JodanMawashi => self.jodan_mawashi,
      Technique::Uramawashi => self.uramawashi,
      Technique::Sweep => self.sweep,
    }
  }

  pub fn set(&mut self, technique: Technique, count: i64) {
    let slot = match technique {
      Technique::Kizami => &mut self.kizami,
      Technique::GyakuJodan => &mut self.gyaku_jodan,
      Technique::GyakuChudan => &mut self.gyaku_chudan,
      Technique::ChudanMawashi => &mut self.chudan_mawashi,
      Technique::JodanMawashi => &mut self.jodan_mawashi,
      Technique::Uramawashi => &mut self.uramawashi,
      Technique::Sweep => &mut self.sweep,
    };
    *slot = count;
  }

  /// Builder-style [`Tally::set`].
  pub fn with(mut self, technique: Technique, count: i64) -> Self {
    self.set(technique, count);
    self
  }

  pub fn increment(&mut self, technique: Technique) {
    self.set(technique, self.get(technique).saturating_add(1));
  }

  /// Remove one hit; never goes below zero.
  pub fn decrement(&mut self, technique: Technique) {
    let current = self.get(technique);
    if current > 0 {
      self.set(technique, current - 1);
    }
  }

  /// Build a tally from raw per-technique input using [`coerce_count`].
  pub fn from_raw<'a>(mut raw: impl FnMut(Technique) -> Option<&'a str>) -> Self {
    Technique::iter().fold(Self::default(), |tally, t| {
      tally.with(t, coerce_count(raw(t)))
    })
  }

  /// Iterate `(technique, count)` in point-table order.
  pub fn entries(&self) -> impl Iterator<Item = (Technique, i64)> + '_ {
    Technique::iter().map(move |t| (t, self.get(t)))
  }

  pub fn is_empty(&self) -> bool { self.entries().all(|(_, n)| n == 0) }

  pub fn score(&self) -> i64 { compute_score(self) }
}

/// Sum of `count × points` over all seven techniques. Saturates at the `i64`
/// bounds instead of wrapping.
pub fn compute_score(tally: &Tally) -> i64 {
  tally
    .entries()
    .fold(0i64, |acc, (t, n)| acc.saturating_add(n.saturating_mul(t.points())))
}

/// Parses `kizami=2,jodan-mawashi=1`. Techniques that are not listed stay at
/// zero; counts go through [`coerce_count`]. Negative counts are rejected.
impl FromStr for Tally {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let mut tally = Self::default();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
      let (name, count) = match part.split_once('=') {
        Some((name, count)) => (name, Some(count)),
        None => (part, None),
      };
      let technique = Technique::parse(name)?;
      let count = coerce_count(count);
      if count < 0 {
        return Err(Error::NegativeCount { technique, count });
      }
      tally.set(technique, count);
    }
    Ok(tally)
  }
}

impl fmt::Display for Tally {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (technique, count) in self.entries().filter(|(_, n)| *n != 0) {
      if !first {
        f.write_str(",")?;
      }
      write!(f, "{technique}={count}")?;
      first = false;
    }
    Ok(())
  }
}

// ─── ScoredTally ─────────────────────────────────────────────────────────────

/// A tally paired with the score computed from it.
///
/// The only way to build one is from a [`Tally`], so a score written through
/// this type always matches its counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoredTally {
  tally: Tally,
  score: i64,
}

impl ScoredTally {
  pub fn tally(&self) -> &Tally { &self.tally }

  pub fn score(&self) -> i64 { self.score }
}

impl From<Tally> for ScoredTally {
  fn from(tally: Tally) -> Self {
    Self { score: compute_score(&tally), tally }
  }
}
