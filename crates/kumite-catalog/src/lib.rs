//! In-memory catalog of athletes, tournaments and matches.
//!
//! [`Catalog`] sits between a UI and any [`KarateStore`]. Every mutating
//! action follows the same "command, then reload" pattern: run the store
//! mutation, and only if it succeeds re-read the affected collections in full
//! and publish a new [`Snapshot`]. Nothing is ever patched into the cache from
//! a mutation's input.
//!
//! Snapshots are immutable; UI code reads them through [`Catalog::snapshot`]
//! or a [`watch::Receiver`] from [`Catalog::subscribe`] and never mutates
//! them.

pub mod error;

use std::{future::Future, sync::Arc};

use kumite_core::{
  AthleteId, MatchId, TournamentId,
  athlete::{Athlete, AthleteStats, NewAthlete},
  bout::{MatchPatch, MatchWithAthletes, NewMatch},
  scoring::Tally,
  store::KarateStore,
  tournament::{NewTournament, Tournament, TournamentStats},
};
use tokio::sync::watch;

pub use error::{Error, Result};

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// One consistent view of the cached collections.
///
/// Cloning is cheap: the collections are shared slices.
#[derive(Debug, Clone)]
pub struct Snapshot {
  pub athletes:               Arc<[Athlete]>,
  pub tournaments:            Arc<[Tournament]>,
  /// Always the joined form, so list views need no further lookups.
  pub matches:                Arc<[MatchWithAthletes]>,
  pub is_loading_athletes:    bool,
  pub is_loading_tournaments: bool,
  pub is_loading_matches:     bool,
}

impl Default for Snapshot {
  fn default() -> Self {
    Self {
      athletes:               Arc::from([]),
      tournaments:            Arc::from([]),
      matches:                Arc::from([]),
      is_loading_athletes:    false,
      is_loading_tournaments: false,
      is_loading_matches:     false,
    }
  }
}

impl Snapshot {
  pub fn is_loading(&self) -> bool {
    self.is_loading_athletes
      || self.is_loading_tournaments
      || self.is_loading_matches
  }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// The aggregate store facade. Owns the only writable copy of the cache.
pub struct Catalog<S> {
  store: Arc<S>,
  state: watch::Sender<Snapshot>,
}

impl<S: KarateStore> Catalog<S> {
  /// A catalog with empty collections; call [`Catalog::load`] to fill it.
  pub fn new(store: Arc<S>) -> Self {
    let (state, _) = watch::channel(Snapshot::default());
    Self { store, state }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn snapshot(&self) -> Snapshot { self.state.borrow().clone() }

  /// Receive every snapshot published from now on.
  pub fn subscribe(&self) -> watch::Receiver<Snapshot> { self.state.subscribe() }

  // ── Fetches ───────────────────────────────────────────────────────────────

  /// Fetch all three collections concurrently.
  pub async fn load(&self) -> Result<Snapshot, S::Error> {
    tokio::try_join!(
      self.fetch_athletes(),
      self.fetch_tournaments(),
      self.fetch_matches()
    )?;
    Ok(self.snapshot())
  }

  pub async fn fetch_athletes(&self) -> Result<Snapshot, S::Error> {
    self
      .refresh(
        self.store.list_athletes(),
        |s| &mut s.is_loading_athletes,
        |s| &mut s.athletes,
      )
      .await
  }

  pub async fn fetch_tournaments(&self) -> Result<Snapshot, S::Error> {
    self
      .refresh(
        self.store.list_tournaments(),
        |s| &mut s.is_loading_tournaments,
        |s| &mut s.tournaments,
      )
      .await
  }

  pub async fn fetch_matches(&self) -> Result<Snapshot, S::Error> {
    self
      .refresh(
        self.store.list_matches(),
        |s| &mut s.is_loading_matches,
        |s| &mut s.matches,
      )
      .await
  }

  /// Raise `loading`, await `read`, then lower `loading` and, on success only,
  /// replace `slot` wholesale.
  ///
  /// Overlapping refreshes of the same collection are not serialized: the
  /// first to finish lowers the flag while the other is still reading, and
  /// the last to finish wins even if its read started earlier.
  async fn refresh<T>(
    &self,
    read: impl Future<Output = std::result::Result<Vec<T>, S::Error>>,
    loading: fn(&mut Snapshot) -> &mut bool,
    slot: fn(&mut Snapshot) -> &mut Arc<[T]>,
  ) -> Result<Snapshot, S::Error> {
    self.state.send_modify(|s| *loading(s) = true);
    let result = read.await.map(Arc::<[T]>::from);

    self.state.send_modify(|s| {
      *loading(s) = false;
      if let Ok(items) = &result {
        *slot(s) = Arc::clone(items);
      }
    });

    match result {
      Ok(items) => {
        tracing::debug!(count = items.len(), "refreshed collection");
        Ok(self.snapshot())
      }
      Err(e) => {
        tracing::warn!(error = %e, "refresh failed; keeping cached collection");
        Err(Error::Store(e))
      }
    }
  }

  /// Delete all data through the store and publish an empty snapshot.
  pub async fn wipe(&self) -> Result<Snapshot, S::Error> {
    self.store.wipe().await.map_err(Error::Store)?;
    self.state.send_replace(Snapshot::default());
    tracing::info!("catalog wiped");
    Ok(self.snapshot())
  }

  // ── Athletes ──────────────────────────────────────────────────────────────

  pub async fn add_athlete(
    &self,
    firstname: impl Into<String>,
    lastname: impl Into<String>,
  ) -> Result<(AthleteId, Snapshot), S::Error> {
    let input = NewAthlete::new(firstname, lastname).validate()?;
    let id = self.store.create_athlete(input).await.map_err(Error::Store)?;
    Ok((id, self.fetch_athletes().await?))
  }

  /// Replace an athlete's notes. Matches embed their athletes, so both
  /// collections are reloaded.
  pub async fn update_athlete(
    &self,
    id: AthleteId,
    features: impl Into<String>,
    tactics: impl Into<String>,
  ) -> Result<Snapshot, S::Error> {
    self
      .store
      .update_athlete_notes(id, features.into(), tactics.into())
      .await
      .map_err(Error::Store)?;
    tokio::try_join!(self.fetch_athletes(), self.fetch_matches())?;
    Ok(self.snapshot())
  }

  pub async fn delete_athlete(&self, id: AthleteId) -> Result<Snapshot, S::Error> {
    self.store.delete_athlete(id).await.map_err(Error::Store)?;
    self.fetch_athletes().await
  }

  /// Case-insensitive name filter over the cached athletes.
  pub fn filter_athletes(&self, query: &str) -> Vec<Athlete> {
    self
      .state
      .borrow()
      .athletes
      .iter()
      .filter(|a| a.matches_query(query))
      .cloned()
      .collect()
  }

  pub async fn athlete_stats(&self, id: AthleteId) -> Result<AthleteStats, S::Error> {
    self.store.athlete_stats(id).await.map_err(Error::Store)
  }

  // ── Tournaments ───────────────────────────────────────────────────────────

  pub async fn add_tournament(
    &self,
    name: impl Into<String>,
    date: impl Into<String>,
  ) -> Result<(TournamentId, Snapshot), S::Error> {
    let input = NewTournament::new(name, date).validate()?;
    let id = self
      .store
      .create_tournament(input)
      .await
      .map_err(Error::Store)?;
    Ok((id, self.fetch_tournaments().await?))
  }

  /// Rename or re-date a tournament. Matches embed their tournament and sort
  /// on its date, so both collections are reloaded.
  pub async fn update_tournament(
    &self,
    id: TournamentId,
    name: impl Into<String>,
    date: impl Into<String>,
  ) -> Result<Snapshot, S::Error> {
    let input = NewTournament::new(name, date).validate()?;
    self
      .store
      .update_tournament(id, input)
      .await
      .map_err(Error::Store)?;
    tokio::try_join!(self.fetch_tournaments(), self.fetch_matches())?;
    Ok(self.snapshot())
  }

  /// Delete a tournament; the cascade may remove any number of matches, so
  /// both collections are reloaded.
  pub async fn delete_tournament(
    &self,
    id: TournamentId,
  ) -> Result<Snapshot, S::Error> {
    self.store.delete_tournament(id).await.map_err(Error::Store)?;
    tokio::try_join!(self.fetch_tournaments(), self.fetch_matches())?;
    Ok(self.snapshot())
  }

  pub async fn tournament_stats(
    &self,
    id: TournamentId,
  ) -> Result<TournamentStats, S::Error> {
    self.store.tournament_stats(id).await.map_err(Error::Store)
  }

  // ── Matches ───────────────────────────────────────────────────────────────

  pub async fn add_match(
    &self,
    input: NewMatch,
  ) -> Result<(MatchId, Snapshot), S::Error> {
    let input = input.validate()?;
    let id = self.store.create_match(input).await.map_err(Error::Store)?;
    Ok((id, self.fetch_matches().await?))
  }

  pub async fn update_match(
    &self,
    id: MatchId,
    patch: MatchPatch,
  ) -> Result<Snapshot, S::Error> {
    self.store.update_match(id, patch).await.map_err(Error::Store)?;
    self.fetch_matches().await
  }

  /// Re-enter both tallies; scores are recomputed from them.
  pub async fn record_tallies(
    &self,
    id: MatchId,
    ao: Tally,
    aka: Tally,
  ) -> Result<Snapshot, S::Error> {
    self.update_match(id, MatchPatch::tallies(ao, aka)).await
  }

  pub async fn delete_match(&self, id: MatchId) -> Result<Snapshot, S::Error> {
    self.store.delete_match(id).await.map_err(Error::Store)?;
    self.fetch_matches().await
  }

  /// Read one match straight from the store, bypassing the cache.
  pub async fn match_details(
    &self,
    id: MatchId,
  ) -> Result<Option<MatchWithAthletes>, S::Error> {
    self.store.get_match(id).await.map_err(Error::Store)
  }

  pub async fn matches_for_tournament(
    &self,
    id: TournamentId,
  ) -> Result<Vec<MatchWithAthletes>, S::Error> {
    self
      .store
      .list_matches_by_tournament(id)
      .await
      .map_err(Error::Store)
  }

  pub async fn matches_for_athlete(
    &self,
    id: AthleteId,
  ) -> Result<Vec<MatchWithAthletes>, S::Error> {
    self
      .store
      .list_matches_by_athlete(id)
      .await
      .map_err(Error::Store)
  }
}
