//! Mapping between domain types and SQLite columns.
//!
//! Ids are plain integers. Tallies are spread over seven columns per side, in
//! the order of [`Technique::iter`]. Joined match rows are read by column
//! index from [`MATCH_VIEW_SELECT`].

use kumite_core::{
  AthleteId, MatchId, TournamentId,
  athlete::Athlete,
  bout::{Corner, Match, MatchPatch, MatchWithAthletes, NewMatch},
  scoring::{ScoredTally, Tally, Technique},
  tournament::Tournament,
};
use rusqlite::{Row, types::Value};
use strum::IntoEnumIterator;

// ─── Columns ─────────────────────────────────────────────────────────────────

pub const AO_TALLY_COLUMNS: [&str; 7] = [
  "aoKizami",
  "aoGyakuJodan",
  "aoGyakuChudan",
  "aoChudanMawashi",
  "aoJodanMawashi",
  "aoUramawashi",
  "aoSweep",
];

pub const AKA_TALLY_COLUMNS: [&str; 7] = [
  "akaKizami",
  "akaGyakuJodan",
  "akaGyakuChudan",
  "akaChudanMawashi",
  "akaJodanMawashi",
  "akaUramawashi",
  "akaSweep",
];

pub const ATHLETE_SELECT: &str =
  "SELECT AthleteId, firstname, lastname, features, tactics FROM Athlete";

pub const TOURNAMENT_SELECT: &str = "SELECT id, name, date FROM Tournament";

/// A match joined with both athletes and its tournament. Callers append a
/// `WHERE` and/or `ORDER BY` clause.
pub const MATCH_VIEW_SELECT: &str = r#"
SELECT
  m.id, m.tournamentId, m.aoAthleteId, m.akaAthleteId,
  m.aoScore, m.akaScore,
  m.aoKizami, m.aoGyakuJodan, m.aoGyakuChudan,
  m.aoChudanMawashi, m.aoJodanMawashi, m.aoUramawashi, m.aoSweep,
  m.akaKizami, m.akaGyakuJodan, m.akaGyakuChudan,
  m.akaChudanMawashi, m.akaJodanMawashi, m.akaUramawashi, m.akaSweep,
  m.matchDescription, m.aoSummary, m.akaSummary,
  ao.AthleteId, ao.firstname, ao.lastname, ao.features, ao.tactics,
  aka.AthleteId, aka.firstname, aka.lastname, aka.features, aka.tactics,
  t.id, t.name, t.date
FROM "Match" m
JOIN Athlete ao    ON ao.AthleteId  = m.aoAthleteId
JOIN Athlete aka   ON aka.AthleteId = m.akaAthleteId
JOIN Tournament t  ON t.id          = m.tournamentId
"#;

// Offsets into MATCH_VIEW_SELECT.
const AO_TALLY_AT: usize = 6;
const AKA_TALLY_AT: usize = 13;
const TEXT_AT: usize = 20;
const AO_ATHLETE_AT: usize = 23;
const AKA_ATHLETE_AT: usize = 28;
const TOURNAMENT_AT: usize = 33;

// ─── Rows → domain ───────────────────────────────────────────────────────────

pub fn read_athlete(row: &Row<'_>, at: usize) -> rusqlite::Result<Athlete> {
  Ok(Athlete {
    id:        AthleteId(row.get(at)?),
    firstname: row.get(at + 1)?,
    lastname:  row.get(at + 2)?,
    features:  row.get(at + 3)?,
    tactics:   row.get(at + 4)?,
  })
}

pub fn read_tournament(row: &Row<'_>, at: usize) -> rusqlite::Result<Tournament> {
  Ok(Tournament {
    id:   TournamentId(row.get(at)?),
    name: row.get(at + 1)?,
    date: row.get(at + 2)?,
  })
}

fn read_tally(row: &Row<'_>, at: usize) -> rusqlite::Result<Tally> {
  let mut tally = Tally::default();
  for (i, technique) in Technique::iter().enumerate() {
    tally.set(technique, row.get(at + i)?);
  }
  Ok(tally)
}

pub fn read_match_view(row: &Row<'_>) -> rusqlite::Result<MatchWithAthletes> {
  let bout = Match {
    id:            MatchId(row.get(0)?),
    tournament_id: TournamentId(row.get(1)?),
    ao:            Corner {
      athlete_id: AthleteId(row.get(2)?),
      tally:      read_tally(row, AO_TALLY_AT)?,
      score:      row.get(4)?,
      summary:    row.get(TEXT_AT + 1)?,
    },
    aka:           Corner {
      athlete_id: AthleteId(row.get(3)?),
      tally:      read_tally(row, AKA_TALLY_AT)?,
      score:      row.get(5)?,
      summary:    row.get(TEXT_AT + 2)?,
    },
    description:   row.get(TEXT_AT)?,
  };

  Ok(MatchWithAthletes {
    bout,
    ao_athlete: read_athlete(row, AO_ATHLETE_AT)?,
    aka_athlete: read_athlete(row, AKA_ATHLETE_AT)?,
    tournament: read_tournament(row, TOURNAMENT_AT)?,
  })
}

// ─── Domain → columns ────────────────────────────────────────────────────────

/// Column/value pairs written by an insert or a sparse update. Column names
/// are static, so they are safe to splice into SQL text.
pub type Assignments = Vec<(&'static str, Value)>;

fn push_side(
  out: &mut Assignments,
  score_column: &'static str,
  tally_columns: &[&'static str; 7],
  scored: &ScoredTally,
) {
  out.push((score_column, Value::Integer(scored.score())));
  for (column, (_, count)) in tally_columns.iter().zip(scored.tally().entries()) {
    out.push((*column, Value::Integer(count)));
  }
}

pub fn new_match_assignments(input: &NewMatch) -> Assignments {
  let mut out: Assignments = vec![
    ("tournamentId", Value::Integer(input.tournament_id.0)),
    ("aoAthleteId", Value::Integer(input.ao_athlete_id.0)),
    ("akaAthleteId", Value::Integer(input.aka_athlete_id.0)),
  ];
  push_side(&mut out, "aoScore", &AO_TALLY_COLUMNS, &input.ao);
  push_side(&mut out, "akaScore", &AKA_TALLY_COLUMNS, &input.aka);
  out.push(("matchDescription", Value::Text(input.description.clone())));
  out.push(("aoSummary", Value::Text(input.ao_summary.clone())));
  out.push(("akaSummary", Value::Text(input.aka_summary.clone())));
  out
}

pub fn patch_assignments(patch: &MatchPatch) -> Assignments {
  let mut out = Assignments::new();
  if let Some(ao) = &patch.ao {
    push_side(&mut out, "aoScore", &AO_TALLY_COLUMNS, ao);
  }
  if let Some(aka) = &patch.aka {
    push_side(&mut out, "akaScore", &AKA_TALLY_COLUMNS, aka);
  }
  let texts = [
    ("matchDescription", &patch.description),
    ("aoSummary", &patch.ao_summary),
    ("akaSummary", &patch.aka_summary),
  ];
  for (column, value) in texts {
    if let Some(text) = value {
      out.push((column, Value::Text(text.clone())));
    }
  }
  out
}

/// `INSERT INTO "Match" (...) VALUES (?1, ...)` for `assignments`.
pub fn insert_sql(assignments: &Assignments) -> String {
  let columns: Vec<&str> = assignments.iter().map(|(c, _)| *c).collect();
  let placeholders: Vec<String> =
    (1..=assignments.len()).map(|i| format!("?{i}")).collect();
  format!(
    r#"INSERT INTO "Match" ({}) VALUES ({})"#,
    columns.join(", "),
    placeholders.join(", ")
  )
}

/// `UPDATE "Match" SET a = ?1, ... WHERE id = ?N`; the id binds last.
pub fn update_sql(assignments: &Assignments) -> String {
  let sets: Vec<String> = assignments
    .iter()
    .enumerate()
    .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
    .collect();
  format!(
    r#"UPDATE "Match" SET {} WHERE id = ?{}"#,
    sets.join(", "),
    assignments.len() + 1
  )
}
