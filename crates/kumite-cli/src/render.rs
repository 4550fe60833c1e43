//! Plain-text and JSON output.

use std::fmt::Write as _;

use kumite_core::{
  athlete::{Athlete, AthleteStats},
  bout::{MatchWithAthletes, Side},
  tournament::{Tournament, TournamentStats},
};
use serde::Serialize;

/// Writes results to stdout, either as pretty JSON or through a plain-text
/// formatter.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
  pub json: bool,
}

impl Printer {
  pub fn emit<T: Serialize + ?Sized>(
    &self,
    value: &T,
    plain: impl FnOnce(&T) -> String,
  ) -> anyhow::Result<()> {
    if self.json {
      println!("{}", serde_json::to_string_pretty(value)?);
    } else {
      let text = plain(value);
      if !text.is_empty() {
        println!("{}", text.trim_end());
      }
    }
    Ok(())
  }

  /// A one-line acknowledgement; `{"ok": true, ...}` in JSON mode.
  pub fn done(&self, message: &str, id: Option<i64>) -> anyhow::Result<()> {
    if self.json {
      let body = serde_json::json!({ "ok": true, "id": id, "message": message });
      println!("{body}");
    } else {
      println!("{message}");
    }
    Ok(())
  }
}

fn side_label(side: Side) -> &'static str {
  match side {
    Side::Ao => "ao",
    Side::Aka => "aka",
  }
}

// ─── Athletes ────────────────────────────────────────────────────────────────

pub fn athlete_line(a: &Athlete) -> String {
  format!("{:>4}  {}", a.id, a.full_name())
}

pub fn athlete_list(list: &[Athlete]) -> String {
  if list.is_empty() {
    return "no athletes".into();
  }
  list.iter().map(athlete_line).collect::<Vec<_>>().join("\n")
}

pub fn athlete_detail(a: &Athlete) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{} (#{})", a.full_name(), a.id);
  let _ = writeln!(out, "features: {}", a.features);
  let _ = writeln!(out, "tactics:  {}", a.tactics);
  out
}

pub fn athlete_stats(stats: &AthleteStats) -> String {
  format!(
    "matches: {}\nwins:    {}\npoints:  {}",
    stats.total_matches, stats.wins, stats.total_points
  )
}

// ─── Tournaments ─────────────────────────────────────────────────────────────

pub fn tournament_line(t: &Tournament) -> String {
  format!("{:>4}  {}  {}", t.id, t.display_date(), t.name)
}

pub fn tournament_list(list: &[Tournament]) -> String {
  if list.is_empty() {
    return "no tournaments".into();
  }
  list.iter().map(tournament_line).collect::<Vec<_>>().join("\n")
}

pub fn tournament_stats(stats: &TournamentStats) -> String {
  format!(
    "matches:  {}\nathletes: {}",
    stats.total_matches, stats.unique_athletes
  )
}

// ─── Matches ─────────────────────────────────────────────────────────────────

pub fn match_line(m: &MatchWithAthletes) -> String {
  let winner = match m.bout.winner() {
    Some(side) => side_label(side),
    None => "draw",
  };
  format!(
    "{:>4}  {}  {}  {} {} - {} {}  ({winner})",
    m.bout.id,
    m.tournament.display_date(),
    m.tournament.name,
    m.ao_athlete.full_name(),
    m.bout.ao.score,
    m.bout.aka.score,
    m.aka_athlete.full_name(),
  )
}

pub fn match_list(list: &[MatchWithAthletes]) -> String {
  if list.is_empty() {
    return "no matches".into();
  }
  list.iter().map(match_line).collect::<Vec<_>>().join("\n")
}

pub fn match_detail(m: &MatchWithAthletes) -> String {
  let mut out = match_line(m);
  out.push('\n');
  if !m.bout.description.is_empty() {
    let _ = writeln!(out, "{}", m.bout.description);
  }
  for side in [Side::Ao, Side::Aka] {
    let corner = m.bout.corner(side);
    let _ = writeln!(
      out,
      "{:<4} {}: {} pts [{}]",
      side_label(side),
      m.athlete(side).full_name(),
      corner.score,
      corner.tally,
    );
    if !corner.summary.is_empty() {
      let _ = writeln!(out, "     {}", corner.summary);
    }
  }
  out
}
