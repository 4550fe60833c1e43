//! Integration tests for `SqliteStore` against an in-memory database.

use kumite_core::{
  AthleteId, MatchId, TournamentId,
  athlete::NewAthlete,
  bout::{MatchPatch, NewMatch},
  scoring::{Tally, Technique},
  store::{AthleteRepository, MatchRepository, Storage, TournamentRepository},
  tournament::NewTournament,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn athlete(s: &SqliteStore, first: &str, last: &str) -> AthleteId {
  s.create_athlete(NewAthlete::new(first, last)).await.unwrap()
}

async fn tournament(s: &SqliteStore, name: &str, date: &str) -> TournamentId {
  s.create_tournament(NewTournament::new(name, date))
    .await
    .unwrap()
}

async fn bout(
  s: &SqliteStore,
  t: TournamentId,
  ao: AthleteId,
  aka: AthleteId,
) -> MatchId {
  s.create_match(NewMatch::new(t, ao, aka)).await.unwrap()
}

// ─── Athletes ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn athletes_sorted_by_last_then_first_name() {
  let s = store().await;
  athlete(&s, "Sandy", "Scordo").await;
  athlete(&s, "Luca", "Maresca").await;
  athlete(&s, "Anna", "Scordo").await;

  let names: Vec<_> = s
    .list_athletes()
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.full_name())
    .collect();
  assert_eq!(names, ["Luca Maresca", "Anna Scordo", "Sandy Scordo"]);
}

#[tokio::test]
async fn new_athlete_has_empty_notes() {
  let s = store().await;
  let id = athlete(&s, "Viviana", "Bottaro").await;

  let fetched = s.get_athlete(id).await.unwrap().unwrap();
  assert_eq!(fetched.id, id);
  assert_eq!(fetched.features, "");
  assert_eq!(fetched.tactics, "");
}

#[tokio::test]
async fn get_athlete_missing_returns_none() {
  let s = store().await;
  assert!(s.get_athlete(AthleteId(42)).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_athlete_is_rejected() {
  let s = store().await;
  athlete(&s, "Luigi", "Busà").await;

  let err = s
    .create_athlete(NewAthlete::new("Luigi", "Busà"))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::DuplicateAthlete { ref firstname, ref lastname }
      if firstname == "Luigi" && lastname == "Busà"
  ));
  assert_eq!(s.list_athletes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn same_first_name_different_last_name_is_fine() {
  let s = store().await;
  athlete(&s, "Luigi", "Busà").await;
  athlete(&s, "Luigi", "Rossi").await;
  assert_eq!(s.list_athletes().await.unwrap().len(), 2);
}

#[tokio::test]
async fn find_athlete_id_by_name() {
  let s = store().await;
  let id = athlete(&s, "Rika", "Usami").await;

  let found = s
    .find_athlete_id("Rika".into(), "Usami".into())
    .await
    .unwrap();
  assert_eq!(found, Some(id));

  let missing = s
    .find_athlete_id("Rika".into(), "Nobody".into())
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn update_notes_keeps_name() {
  let s = store().await;
  let id = athlete(&s, "Rafael", "Aghayev").await;

  s.update_athlete_notes(id, "southpaw".into(), "pressure early".into())
    .await
    .unwrap();

  let a = s.get_athlete(id).await.unwrap().unwrap();
  assert_eq!(a.firstname, "Rafael");
  assert_eq!(a.features, "southpaw");
  assert_eq!(a.tactics, "pressure early");
}

#[tokio::test]
async fn update_notes_missing_athlete_errors() {
  let s = store().await;
  let err = s
    .update_athlete_notes(AthleteId(7), String::new(), String::new())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::AthleteNotFound(AthleteId(7))));
}

#[tokio::test]
async fn delete_unreferenced_athlete() {
  let s = store().await;
  let id = athlete(&s, "Solo", "Fighter").await;

  s.delete_athlete(id).await.unwrap();
  assert!(s.get_athlete(id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_referenced_athlete_is_refused() {
  let s = store().await;
  let t = tournament(&s, "Open di Roma", "2024-03-10").await;
  let a = athlete(&s, "Ao", "Fighter").await;
  let b = athlete(&s, "Aka", "Fighter").await;
  bout(&s, t, a, b).await;

  let err = s.delete_athlete(a).await.unwrap_err();
  assert!(matches!(err, Error::AthleteInUse { athlete_id, matches: 1 } if athlete_id == a));
  assert!(s.get_athlete(a).await.unwrap().is_some());

  // The aka side is guarded the same way.
  let err = s.delete_athlete(b).await.unwrap_err();
  assert!(matches!(err, Error::AthleteInUse { .. }));
  assert!(s.get_athlete(b).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_missing_athlete_errors() {
  let s = store().await;
  let err = s.delete_athlete(AthleteId(3)).await.unwrap_err();
  assert!(matches!(err, Error::AthleteNotFound(AthleteId(3))));
}

#[tokio::test]
async fn athlete_stats_over_both_sides() {
  let s = store().await;
  let t = tournament(&s, "Coppa Italia", "2024-05-01").await;
  let a = athlete(&s, "Anna", "Rossi").await;
  let b = athlete(&s, "Bea", "Verdi").await;

  // a wins as ao, 3-0.
  let mut m = NewMatch::new(t, a, b)
    .with_tallies(Tally::default().with(Technique::Kizami, 3), Tally::default());
  s.create_match(m).await.unwrap();

  // a loses as aka, 2-6.
  m = NewMatch::new(t, b, a).with_tallies(
    Tally::default().with(Technique::Sweep, 2),
    Tally::default().with(Technique::ChudanMawashi, 1),
  );
  s.create_match(m).await.unwrap();

  // Draw, 1-1: not a win for either.
  m = NewMatch::new(t, a, b).with_tallies(
    Tally::default().with(Technique::GyakuJodan, 1),
    Tally::default().with(Technique::GyakuChudan, 1),
  );
  s.create_match(m).await.unwrap();

  let stats = s.athlete_stats(a).await.unwrap();
  assert_eq!(stats.total_matches, 3);
  assert_eq!(stats.wins, 1);
  assert_eq!(stats.total_points, 3 + 2 + 1);

  let stats = s.athlete_stats(b).await.unwrap();
  assert_eq!(stats.wins, 1);
  assert_eq!(stats.total_points, 6 + 1);
}

#[tokio::test]
async fn athlete_stats_without_matches_are_zero() {
  let s = store().await;
  let a = athlete(&s, "New", "Comer").await;
  let stats = s.athlete_stats(a).await.unwrap();
  assert_eq!(stats.total_matches, 0);
  assert_eq!(stats.wins, 0);
  assert_eq!(stats.total_points, 0);
}

// ─── Tournaments ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn tournaments_latest_first() {
  let s = store().await;
  tournament(&s, "Winter Cup", "2024-01-01").await;
  tournament(&s, "Summer Cup", "2024-06-01").await;
  tournament(&s, "Spring Cup", "2024-03-15").await;

  let names: Vec<_> = s
    .list_tournaments()
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.name)
    .collect();
  assert_eq!(names, ["Summer Cup", "Spring Cup", "Winter Cup"]);
}

#[tokio::test]
async fn update_tournament() {
  let s = store().await;
  let id = tournament(&s, "Draft name", "2024-01-01").await;

  s.update_tournament(id, NewTournament::new("Final name", "2024-02-02"))
    .await
    .unwrap();

  let t = s.get_tournament(id).await.unwrap().unwrap();
  assert_eq!(t.name, "Final name");
  assert_eq!(t.date, "2024-02-02");
  assert!(s.get_tournament(TournamentId(99)).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_tournament_cascades_to_matches() {
  let s = store().await;
  let doomed = tournament(&s, "Doomed Open", "2024-01-01").await;
  let kept = tournament(&s, "Kept Open", "2024-02-01").await;
  let a = athlete(&s, "Ao", "One").await;
  let b = athlete(&s, "Aka", "Two").await;
  for _ in 0..3 {
    bout(&s, doomed, a, b).await;
  }
  let survivor = bout(&s, kept, b, a).await;

  s.delete_tournament(doomed).await.unwrap();

  assert!(s.get_tournament(doomed).await.unwrap().is_none());
  let matches = s.list_matches().await.unwrap();
  assert_eq!(matches.len(), 1);
  assert_eq!(matches[0].bout.id, survivor);
  assert!(matches.iter().all(|m| m.bout.tournament_id != doomed));

  // Only the match at the surviving tournament still counts.
  assert_eq!(s.athlete_stats(a).await.unwrap().total_matches, 1);
}

#[tokio::test]
async fn delete_missing_tournament_leaves_store_untouched() {
  let s = store().await;
  let t = tournament(&s, "Real Open", "2024-01-01").await;

  let err = s.delete_tournament(TournamentId(t.0 + 1)).await.unwrap_err();
  assert!(matches!(err, Error::TournamentNotFound(_)));
  assert_eq!(s.list_tournaments().await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_tournament_delete_keeps_its_matches() {
  let s = store().await;
  let t = tournament(&s, "Locked Open", "2024-01-01").await;
  let a = athlete(&s, "Ao", "One").await;
  let b = athlete(&s, "Aka", "Two").await;
  bout(&s, t, a, b).await;
  bout(&s, t, b, a).await;

  // Fails after the match rows are already gone inside the transaction.
  s.execute_batch(
    "CREATE TRIGGER lock_tournament BEFORE DELETE ON Tournament
     BEGIN SELECT RAISE(ABORT, 'locked'); END;",
  )
  .await
  .unwrap();

  let err = s.delete_tournament(t).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
  assert!(s.get_tournament(t).await.unwrap().is_some());
  assert_eq!(s.list_matches_by_tournament(t).await.unwrap().len(), 2);
  assert_eq!(s.tournament_stats(t).await.unwrap().total_matches, 2);
}

#[tokio::test]
async fn tournament_stats_count_distinct_athletes() {
  let s = store().await;
  let t = tournament(&s, "Regional Cup", "2024-01-01").await;
  let a = athlete(&s, "A", "A").await;
  let b = athlete(&s, "B", "B").await;
  let c = athlete(&s, "C", "C").await;
  bout(&s, t, a, b).await;
  bout(&s, t, b, a).await;
  bout(&s, t, a, c).await;

  let stats = s.tournament_stats(t).await.unwrap();
  assert_eq!(stats.total_matches, 3);
  assert_eq!(stats.unique_athletes, 3);
}

// ─── Matches ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn round_trip_match_with_details() {
  let s = store().await;
  let t = tournament(&s, "Open di Roma", "2024-03-10").await;
  let a = athlete(&s, "Anna", "Rossi").await;
  let b = athlete(&s, "Bea", "Verdi").await;

  let input = NewMatch::new(t, a, b)
    .with_tallies(Tally::default().with(Technique::Kizami, 3), Tally::default());
  let id = s.create_match(input).await.unwrap();

  let m = s.get_match(id).await.unwrap().unwrap();
  assert_eq!(m.bout.id, id);
  assert_eq!(m.bout.ao.score, 3);
  assert_eq!(m.bout.aka.score, 0);
  assert_eq!(m.bout.ao.tally.kizami, 3);
  assert_eq!(m.ao_athlete, s.get_athlete(a).await.unwrap().unwrap());
  assert_eq!(m.aka_athlete, s.get_athlete(b).await.unwrap().unwrap());
  assert_eq!(m.tournament, s.get_tournament(t).await.unwrap().unwrap());
}

#[tokio::test]
async fn get_match_missing_returns_none() {
  let s = store().await;
  assert!(s.get_match(MatchId(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn list_matches_by_tournament_date_then_id() {
  let s = store().await;
  let early = tournament(&s, "January Cup", "2024-01-01").await;
  let late = tournament(&s, "June Cup", "2024-06-01").await;
  let a = athlete(&s, "A", "A").await;
  let b = athlete(&s, "B", "B").await;

  let e1 = bout(&s, early, a, b).await;
  let l1 = bout(&s, late, a, b).await;
  let e2 = bout(&s, early, b, a).await;
  let l2 = bout(&s, late, b, a).await;

  let ids: Vec<_> = s
    .list_matches()
    .await
    .unwrap()
    .into_iter()
    .map(|m| m.bout.id)
    .collect();
  assert_eq!(ids, [l2, l1, e2, e1]);
}

#[tokio::test]
async fn list_matches_filtered() {
  let s = store().await;
  let t1 = tournament(&s, "First Cup", "2024-01-01").await;
  let t2 = tournament(&s, "Second Cup", "2024-02-01").await;
  let a = athlete(&s, "A", "A").await;
  let b = athlete(&s, "B", "B").await;
  let c = athlete(&s, "C", "C").await;

  let m1 = bout(&s, t1, a, b).await;
  let m2 = bout(&s, t1, c, a).await;
  let m3 = bout(&s, t2, b, c).await;

  let by_t1: Vec<_> = s
    .list_matches_by_tournament(t1)
    .await
    .unwrap()
    .into_iter()
    .map(|m| m.bout.id)
    .collect();
  assert_eq!(by_t1, [m2, m1]);

  let by_a: Vec<_> = s
    .list_matches_by_athlete(a)
    .await
    .unwrap()
    .into_iter()
    .map(|m| m.bout.id)
    .collect();
  assert_eq!(by_a, [m2, m1]);

  let by_c: Vec<_> = s
    .list_matches_by_athlete(c)
    .await
    .unwrap()
    .into_iter()
    .map(|m| m.bout.id)
    .collect();
  assert_eq!(by_c, [m3, m2]);
}

#[tokio::test]
async fn create_match_same_athlete_both_sides_errors() {
  let s = store().await;
  let t = tournament(&s, "Solo Cup", "2024-01-01").await;
  let a = athlete(&s, "A", "A").await;

  let err = s.create_match(NewMatch::new(t, a, a)).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(kumite_core::Error::SameAthleteOnBothSides(_))
  ));
}

#[tokio::test]
async fn create_match_with_unknown_references_errors() {
  let s = store().await;
  let t = tournament(&s, "Ghost Cup", "2024-01-01").await;
  let a = athlete(&s, "A", "A").await;
  let b = athlete(&s, "B", "B").await;

  let err = s
    .create_match(NewMatch::new(t, a, AthleteId(404)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MissingReference));

  let err = s
    .create_match(NewMatch::new(TournamentId(404), a, b))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MissingReference));
  assert!(s.list_matches().await.unwrap().is_empty());
}

#[tokio::test]
async fn tally_update_rewrites_scores() {
  let s = store().await;
  let t = tournament(&s, "Score Cup", "2024-01-01").await;
  let a = athlete(&s, "A", "A").await;
  let b = athlete(&s, "B", "B").await;
  let id = bout(&s, t, a, b).await;

  s.update_match(
    id,
    MatchPatch::tallies(
      Tally::default().with(Technique::Uramawashi, 1),
      Tally::default().with(Technique::Kizami, 2),
    ),
  )
  .await
  .unwrap();

  let m = s.get_match(id).await.unwrap().unwrap();
  assert_eq!(m.bout.ao.score, 3);
  assert_eq!(m.bout.aka.score, 2);
  assert_eq!(m.bout.ao.tally.uramawashi, 1);
  assert_eq!(m.bout.aka.tally.kizami, 2);
}

#[tokio::test]
async fn text_update_leaves_scores() {
  let s = store().await;
  let t = tournament(&s, "Notes Cup", "2024-01-01").await;
  let a = athlete(&s, "A", "A").await;
  let b = athlete(&s, "B", "B").await;
  let input = NewMatch::new(t, a, b)
    .with_tallies(Tally::default().with(Technique::Sweep, 1), Tally::default());
  let id = s.create_match(input).await.unwrap();

  s.update_match(id, MatchPatch::notes("semi-final", "fast starter", "tired late"))
    .await
    .unwrap();

  let m = s.get_match(id).await.unwrap().unwrap();
  assert_eq!(m.bout.description, "semi-final");
  assert_eq!(m.bout.ao.summary, "fast starter");
  assert_eq!(m.bout.aka.summary, "tired late");
  assert_eq!(m.bout.ao.score, 3);
  assert_eq!(m.bout.ao.tally.sweep, 1);
}

#[tokio::test]
async fn sparse_update_touches_only_given_fields() {
  let s = store().await;
  let t = tournament(&s, "Sparse Cup", "2024-01-01").await;
  let a = athlete(&s, "A", "A").await;
  let b = athlete(&s, "B", "B").await;
  let id = bout(&s, t, a, b).await;
  s.update_match(id, MatchPatch::notes("final", "ao", "aka"))
    .await
    .unwrap();

  let patch = MatchPatch {
    aka: Some(Tally::default().with(Technique::JodanMawashi, 1).into()),
    ao_summary: Some("changed".into()),
    ..MatchPatch::default()
  };
  s.update_match(id, patch).await.unwrap();

  let m = s.get_match(id).await.unwrap().unwrap();
  assert_eq!(m.bout.description, "final");
  assert_eq!(m.bout.ao.summary, "changed");
  assert_eq!(m.bout.aka.summary, "aka");
  assert_eq!(m.bout.ao.score, 0);
  assert_eq!(m.bout.aka.score, 3);
}

#[tokio::test]
async fn empty_patch_is_a_no_op() {
  let s = store().await;
  s.update_match(MatchId(1), MatchPatch::default())
    .await
    .unwrap();
}

#[tokio::test]
async fn update_missing_match_errors() {
  let s = store().await;
  let err = s
    .update_match(MatchId(5), MatchPatch::notes("", "", ""))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MatchNotFound(MatchId(5))));
}

#[tokio::test]
async fn delete_match_frees_athletes() {
  let s = store().await;
  let t = tournament(&s, "Delete Cup", "2024-01-01").await;
  let a = athlete(&s, "A", "A").await;
  let b = athlete(&s, "B", "B").await;
  let id = bout(&s, t, a, b).await;

  s.delete_match(id).await.unwrap();
  assert!(s.get_match(id).await.unwrap().is_none());
  s.delete_athlete(a).await.unwrap();

  let err = s.delete_match(id).await.unwrap_err();
  assert!(matches!(err, Error::MatchNotFound(_)));
}

#[tokio::test]
async fn ids_are_not_reused() {
  let s = store().await;
  let first = athlete(&s, "First", "One").await;
  s.delete_athlete(first).await.unwrap();
  let second = athlete(&s, "Second", "Two").await;
  assert!(second > first);
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn initialize_is_idempotent() {
  let s = store().await;
  athlete(&s, "Kept", "Row").await;
  s.initialize().await.unwrap();
  assert_eq!(s.list_athletes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn wipe_leaves_an_empty_usable_store() {
  let s = store().await;
  let t = tournament(&s, "Last Cup", "2024-01-01").await;
  let a = athlete(&s, "A", "A").await;
  let b = athlete(&s, "B", "B").await;
  bout(&s, t, a, b).await;

  s.wipe().await.unwrap();
  assert!(s.list_athletes().await.unwrap().is_empty());
  assert!(s.list_tournaments().await.unwrap().is_empty());
  assert!(s.list_matches().await.unwrap().is_empty());

  athlete(&s, "A", "A").await;
  assert_eq!(s.list_athletes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn teardown_drops_everything() {
  let s = store().await;
  let t = tournament(&s, "Last Cup", "2024-01-01").await;
  let a = athlete(&s, "A", "A").await;
  let b = athlete(&s, "B", "B").await;
  bout(&s, t, a, b).await;

  s.teardown().await.unwrap();
  assert!(matches!(s.list_athletes().await, Err(Error::Database(_))));

  s.initialize().await.unwrap();
  assert!(s.list_athletes().await.unwrap().is_empty());
  assert!(s.list_tournaments().await.unwrap().is_empty());
  assert!(s.list_matches().await.unwrap().is_empty());
}

#[tokio::test]
async fn file_store_persists_across_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("kumite.db");

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    athlete(&s, "Durable", "Athlete").await
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let a = s.get_athlete(id).await.unwrap().unwrap();
  assert_eq!(a.full_name(), "Durable Athlete");
}

#[tokio::test]
async fn open_fails_for_unusable_path() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("missing").join("kumite.db");
  assert!(matches!(
    SqliteStore::open(&path).await,
    Err(Error::Database(_))
  ));
}
