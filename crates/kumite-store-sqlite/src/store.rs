//! [`SqliteStore`] — the SQLite implementation of the kumite repositories.

use std::path::Path;

use kumite_core::{
  AthleteId, MatchId, TournamentId,
  athlete::{Athlete, AthleteStats, NewAthlete},
  bout::{MatchPatch, MatchWithAthletes, NewMatch},
  store::{AthleteRepository, MatchRepository, Storage, TournamentRepository},
  tournament::{NewTournament, Tournament, TournamentStats},
};
use rusqlite::{
  ErrorCode, OptionalExtension as _, TransactionBehavior, ffi, params,
  params_from_iter,
};

use crate::{
  Error, Result,
  encode::{
    ATHLETE_SELECT, MATCH_VIEW_SELECT, TOURNAMENT_SELECT, insert_sql,
    new_match_assignments, patch_assignments, read_athlete, read_match_view,
    read_tournament, update_sql,
  },
  schema::{SCHEMA, TEARDOWN},
};

// ─── Constraint helpers ──────────────────────────────────────────────────────

/// The extended result code of a failed constraint, if that's what `err` is.
fn constraint_code(err: &tokio_rusqlite::Error) -> Option<i32> {
  match err {
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == ErrorCode::ConstraintViolation =>
    {
      Some(e.extended_code)
    }
    _ => None,
  }
}

/// Map a foreign-key failure on a match write to [`Error::MissingReference`].
fn match_write_error(err: tokio_rusqlite::Error) -> Error {
  if constraint_code(&err) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
    Error::MissingReference
  } else {
    Error::Database(err)
  }
}

/// Result of a guarded delete, decided inside its transaction.
enum GuardedDelete {
  Deleted,
  Missing,
  Referenced(u64),
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A kumite store backed by a single SQLite file.
///
/// Cloning is cheap. Every clone shares one connection and its database
/// thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and create any missing tables.
  ///
  /// Failure here is fatal for the session; the caller should not continue
  /// without a store.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    tracing::info!(path = %path.display(), "opening store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.initialize().await?;
    Ok(store)
  }

  /// Open a fresh in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.initialize().await?;
    Ok(store)
  }

  /// Create the three tables if they are absent. Safe to call repeatedly.
  pub async fn initialize(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Drop every table. All data is gone afterwards; call
  /// [`SqliteStore::initialize`] before using the store again.
  pub async fn teardown(&self) -> Result<()> {
    tracing::warn!("dropping all tables");
    self
      .conn
      .call(|conn| {
        conn.execute_batch(TEARDOWN)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run raw SQL against the connection.
  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `sql` (a [`MATCH_VIEW_SELECT`] suffix) with a single id parameter.
  async fn query_match_views(
    &self,
    suffix: &'static str,
    id: i64,
  ) -> Result<Vec<MatchWithAthletes>> {
    let views = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!("{MATCH_VIEW_SELECT} {suffix}"))?;
        let rows = stmt
          .query_map(params![id], read_match_view)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(views)
  }
}

impl Storage for SqliteStore {
  type Error = Error;

  async fn wipe(&self) -> Result<()> {
    self.teardown().await?;
    self.initialize().await
  }
}

// ─── Athletes ────────────────────────────────────────────────────────────────

impl AthleteRepository for SqliteStore {
  async fn list_athletes(&self) -> Result<Vec<Athlete>> {
    let athletes = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("{ATHLETE_SELECT} ORDER BY lastname, firstname"))?;
        let rows = stmt
          .query_map([], |row| read_athlete(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(athletes)
  }

  async fn get_athlete(&self, id: AthleteId) -> Result<Option<Athlete>> {
    let athlete = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{ATHLETE_SELECT} WHERE AthleteId = ?1"),
              params![id.0],
              |row| read_athlete(row, 0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(athlete)
  }

  async fn find_athlete_id(
    &self,
    firstname: String,
    lastname: String,
  ) -> Result<Option<AthleteId>> {
    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT AthleteId FROM Athlete WHERE firstname = ?1 AND lastname = ?2",
              params![firstname, lastname],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(id.map(AthleteId))
  }

  async fn create_athlete(&self, input: NewAthlete) -> Result<AthleteId> {
    let NewAthlete { firstname, lastname } = input;
    let (first, last) = (firstname.clone(), lastname.clone());

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO Athlete (firstname, lastname) VALUES (?1, ?2)",
          params![first, last],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| {
        if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_UNIQUE) {
          Error::DuplicateAthlete { firstname, lastname }
        } else {
          Error::Database(e)
        }
      })?;

    tracing::debug!(athlete_id = id, "created athlete");
    Ok(AthleteId(id))
  }

  async fn update_athlete_notes(
    &self,
    id: AthleteId,
    features: String,
    tactics: String,
  ) -> Result<()> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE Athlete SET features = ?1, tactics = ?2 WHERE AthleteId = ?3",
          params![features, tactics, id.0],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::AthleteNotFound(id));
    }
    Ok(())
  }

  async fn delete_athlete(&self, id: AthleteId) -> Result<()> {
    let outcome = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without commit rolls back.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists = tx
          .query_row(
            "SELECT 1 FROM Athlete WHERE AthleteId = ?1",
            params![id.0],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !exists {
          return Ok(GuardedDelete::Missing);
        }

        let references: i64 = tx.query_row(
          r#"SELECT COUNT(*) FROM "Match" WHERE aoAthleteId = ?1 OR akaAthleteId = ?1"#,
          params![id.0],
          |row| row.get(0),
        )?;
        if references > 0 {
          return Ok(GuardedDelete::Referenced(references as u64));
        }

        tx.execute("DELETE FROM Athlete WHERE AthleteId = ?1", params![id.0])?;
        tx.commit()?;
        Ok(GuardedDelete::Deleted)
      })
      .await?;

    match outcome {
      GuardedDelete::Deleted => {
        tracing::debug!(athlete_id = %id, "deleted athlete");
        Ok(())
      }
      GuardedDelete::Missing => Err(Error::AthleteNotFound(id)),
      GuardedDelete::Referenced(matches) => {
        Err(Error::AthleteInUse { athlete_id: id, matches })
      }
    }
  }

  async fn athlete_stats(&self, id: AthleteId) -> Result<AthleteStats> {
    let (total, wins, points): (i64, Option<i64>, Option<i64>) = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          r#"SELECT
               COUNT(*),
               SUM(CASE
                     WHEN aoAthleteId  = ?1 AND aoScore  > akaScore THEN 1
                     WHEN akaAthleteId = ?1 AND akaScore > aoScore  THEN 1
                     ELSE 0
                   END),
               SUM(CASE
                     WHEN aoAthleteId  = ?1 THEN aoScore
                     WHEN akaAthleteId = ?1 THEN akaScore
                     ELSE 0
                   END)
             FROM "Match"
             WHERE aoAthleteId = ?1 OR akaAthleteId = ?1"#,
          params![id.0],
          |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?)
      })
      .await?;

    Ok(AthleteStats {
      total_matches: total as u64,
      wins:          wins.unwrap_or(0) as u64,
      total_points:  points.unwrap_or(0),
    })
  }
}

// ─── Tournaments ─────────────────────────────────────────────────────────────

impl TournamentRepository for SqliteStore {
  async fn list_tournaments(&self) -> Result<Vec<Tournament>> {
    let tournaments = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("{TOURNAMENT_SELECT} ORDER BY date DESC"))?;
        let rows = stmt
          .query_map([], |row| read_tournament(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(tournaments)
  }

  async fn get_tournament(&self, id: TournamentId) -> Result<Option<Tournament>> {
    let tournament = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{TOURNAMENT_SELECT} WHERE id = ?1"),
              params![id.0],
              |row| read_tournament(row, 0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(tournament)
  }

  async fn create_tournament(&self, input: NewTournament) -> Result<TournamentId> {
    let NewTournament { name, date } = input;
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO Tournament (name, date) VALUES (?1, ?2)",
          params![name, date],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(tournament_id = id, "created tournament");
    Ok(TournamentId(id))
  }

  async fn update_tournament(
    &self,
    id: TournamentId,
    input: NewTournament,
  ) -> Result<()> {
    let NewTournament { name, date } = input;
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE Tournament SET name = ?1, date = ?2 WHERE id = ?3",
          params![name, date, id.0],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::TournamentNotFound(id));
    }
    Ok(())
  }

  async fn delete_tournament(&self, id: TournamentId) -> Result<()> {
    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let matches =
          tx.execute(r#"DELETE FROM "Match" WHERE tournamentId = ?1"#, params![id.0])?;
        let tournaments =
          tx.execute("DELETE FROM Tournament WHERE id = ?1", params![id.0])?;
        if tournaments == 0 {
          // Nothing to cascade from; leave the store untouched.
          return Ok(None);
        }
        tx.commit()?;
        Ok(Some(matches))
      })
      .await?;

    match removed {
      Some(matches) => {
        tracing::debug!(tournament_id = %id, matches, "deleted tournament");
        Ok(())
      }
      None => Err(Error::TournamentNotFound(id)),
    }
  }

  async fn tournament_stats(&self, id: TournamentId) -> Result<TournamentStats> {
    let (total, unique): (i64, i64) = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          r#"SELECT
               (SELECT COUNT(*) FROM "Match" WHERE tournamentId = ?1),
               (SELECT COUNT(*) FROM (
                  SELECT aoAthleteId  FROM "Match" WHERE tournamentId = ?1
                  UNION
                  SELECT akaAthleteId FROM "Match" WHERE tournamentId = ?1
               ))"#,
          params![id.0],
          |row| Ok((row.get(0)?, row.get(1)?)),
        )?)
      })
      .await?;

    Ok(TournamentStats {
      total_matches:   total as u64,
      unique_athletes: unique as u64,
    })
  }
}

// ─── Matches ─────────────────────────────────────────────────────────────────

impl MatchRepository for SqliteStore {
  async fn get_match(&self, id: MatchId) -> Result<Option<MatchWithAthletes>> {
    let mut views = self.query_match_views("WHERE m.id = ?1", id.0).await?;
    Ok(views.pop())
  }

  async fn list_matches(&self) -> Result<Vec<MatchWithAthletes>> {
    let views = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("{MATCH_VIEW_SELECT} ORDER BY t.date DESC, m.id DESC"))?;
        let rows = stmt
          .query_map([], read_match_view)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(views)
  }

  async fn list_matches_by_tournament(
    &self,
    tournament_id: TournamentId,
  ) -> Result<Vec<MatchWithAthletes>> {
    self
      .query_match_views("WHERE m.tournamentId = ?1 ORDER BY m.id DESC", tournament_id.0)
      .await
  }

  async fn list_matches_by_athlete(
    &self,
    athlete_id: AthleteId,
  ) -> Result<Vec<MatchWithAthletes>> {
    self
      .query_match_views(
        "WHERE m.aoAthleteId = ?1 OR m.akaAthleteId = ?1 ORDER BY m.id DESC",
        athlete_id.0,
      )
      .await
  }

  async fn create_match(&self, input: NewMatch) -> Result<MatchId> {
    let input = input.validate()?;
    let assignments = new_match_assignments(&input);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          &insert_sql(&assignments),
          params_from_iter(assignments.iter().map(|(_, v)| v)),
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(match_write_error)?;

    tracing::debug!(
      match_id = id,
      ao_score = input.ao.score(),
      aka_score = input.aka.score(),
      "recorded match"
    );
    Ok(MatchId(id))
  }

  async fn update_match(&self, id: MatchId, patch: MatchPatch) -> Result<()> {
    let assignments = patch_assignments(&patch);
    if assignments.is_empty() {
      return Ok(());
    }

    let changed = self
      .conn
      .call(move |conn| {
        let values = assignments
          .iter()
          .map(|(_, v)| v.clone())
          .chain(std::iter::once(id.0.into()));
        Ok(conn.execute(&update_sql(&assignments), params_from_iter(values))?)
      })
      .await
      .map_err(match_write_error)?;

    if changed == 0 {
      return Err(Error::MatchNotFound(id));
    }
    Ok(())
  }

  async fn delete_match(&self, id: MatchId) -> Result<()> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(r#"DELETE FROM "Match" WHERE id = ?1"#, params![id.0])?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::MatchNotFound(id));
    }
    Ok(())
  }
}
