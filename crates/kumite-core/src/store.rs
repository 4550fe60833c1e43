//! Repository traits for athletes, tournaments and matches.
//!
//! Storage backends (e.g. `kumite-store-sqlite`) implement all three over one
//! shared connection. Higher layers (`kumite-catalog`, `kumite-cli`) depend on
//! these traits, not on a concrete backend.
//!
//! A lookup that finds nothing returns `Ok(None)`. Every other failure is an
//! error of the backend's [`Storage::Error`] type and is never swallowed.

use std::future::Future;

use crate::{
  AthleteId, MatchId, TournamentId,
  athlete::{Athlete, AthleteStats, NewAthlete},
  bout::{MatchPatch, MatchWithAthletes, NewMatch},
  tournament::{NewTournament, Tournament, TournamentStats},
};

/// The error type shared by all repositories of one backend, plus whole-store
/// operations.
pub trait Storage: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Delete every record and leave an empty, usable store behind. Ids start
  /// over afterwards.
  fn wipe(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Athletes ────────────────────────────────────────────────────────────────

pub trait AthleteRepository: Storage {
  /// All athletes ordered by last name, then first name.
  fn list_athletes(
    &self,
  ) -> impl Future<Output = Result<Vec<Athlete>, Self::Error>> + Send + '_;

  fn get_athlete(
    &self,
    id: AthleteId,
  ) -> impl Future<Output = Result<Option<Athlete>, Self::Error>> + Send + '_;

  /// Look up an athlete by exact name.
  fn find_athlete_id(
    &self,
    firstname: String,
    lastname: String,
  ) -> impl Future<Output = Result<Option<AthleteId>, Self::Error>> + Send + '_;

  /// Register an athlete with empty notes. Fails if the name pair is taken.
  fn create_athlete(
    &self,
    input: NewAthlete,
  ) -> impl Future<Output = Result<AthleteId, Self::Error>> + Send + '_;

  /// Replace the scouting notes; the name is never changed.
  fn update_athlete_notes(
    &self,
    id: AthleteId,
    features: String,
    tactics: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete an athlete. Refused, with nothing deleted, while any match
  /// references the athlete on either side.
  fn delete_athlete(
    &self,
    id: AthleteId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn athlete_stats(
    &self,
    id: AthleteId,
  ) -> impl Future<Output = Result<AthleteStats, Self::Error>> + Send + '_;
}

// ─── Tournaments ─────────────────────────────────────────────────────────────

pub trait TournamentRepository: Storage {
  /// All tournaments, latest date first (string order on the stored date).
  fn list_tournaments(
    &self,
  ) -> impl Future<Output = Result<Vec<Tournament>, Self::Error>> + Send + '_;

  fn get_tournament(
    &self,
    id: TournamentId,
  ) -> impl Future<Output = Result<Option<Tournament>, Self::Error>> + Send + '_;

  fn create_tournament(
    &self,
    input: NewTournament,
  ) -> impl Future<Output = Result<TournamentId, Self::Error>> + Send + '_;

  fn update_tournament(
    &self,
    id: TournamentId,
    input: NewTournament,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a tournament and every match held at it, atomically.
  fn delete_tournament(
    &self,
    id: TournamentId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn tournament_stats(
    &self,
    id: TournamentId,
  ) -> impl Future<Output = Result<TournamentStats, Self::Error>> + Send + '_;
}

// ─── Matches ─────────────────────────────────────────────────────────────────

pub trait MatchRepository: Storage {
  fn get_match(
    &self,
    id: MatchId,
  ) -> impl Future<Output = Result<Option<MatchWithAthletes>, Self::Error>>
  + Send
  + '_;

  /// Every match, latest tournament date first, then newest match first.
  fn list_matches(
    &self,
  ) -> impl Future<Output = Result<Vec<MatchWithAthletes>, Self::Error>> + Send + '_;

  /// Matches of one tournament, newest first.
  fn list_matches_by_tournament(
    &self,
    tournament_id: TournamentId,
  ) -> impl Future<Output = Result<Vec<MatchWithAthletes>, Self::Error>> + Send + '_;

  /// Matches where the athlete fought on either side, newest first.
  fn list_matches_by_athlete(
    &self,
    athlete_id: AthleteId,
  ) -> impl Future<Output = Result<Vec<MatchWithAthletes>, Self::Error>> + Send + '_;

  fn create_match(
    &self,
    input: NewMatch,
  ) -> impl Future<Output = Result<MatchId, Self::Error>> + Send + '_;

  /// Write only the fields present in `patch`. An empty patch does nothing.
  fn update_match(
    &self,
    id: MatchId,
    patch: MatchPatch,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_match(
    &self,
    id: MatchId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Combined ────────────────────────────────────────────────────────────────

/// A backend providing all three repositories.
pub trait KarateStore:
  AthleteRepository + TournamentRepository + MatchRepository
{
}

impl<T> KarateStore for T where
  T: AthleteRepository + TournamentRepository + MatchRepository
{
}
