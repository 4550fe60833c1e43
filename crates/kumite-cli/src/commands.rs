//! Subcommands and their dispatch onto the catalog.

use anyhow::{Context as _, bail};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use kumite_catalog::Catalog;
use kumite_core::{
  AthleteId, MatchId, TournamentId,
  bout::{MatchPatch, NewMatch},
  scoring::Tally,
  store::{AthleteRepository, TournamentRepository},
  tournament::canonical_date,
};
use kumite_store_sqlite::SqliteStore;

use crate::render::{self, Printer};

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Register, inspect and annotate athletes.
  #[command(subcommand)]
  Athlete(AthleteCommand),

  /// Manage tournaments.
  #[command(subcommand)]
  Tournament(TournamentCommand),

  /// Record and review matches.
  #[command(subcommand)]
  Match(MatchCommand),

  /// Drop every table, deleting all recorded data.
  Wipe {
    /// Required; there is no undo.
    #[arg(long)]
    yes: bool,
  },
}

// ─── Athletes ────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum AthleteCommand {
  Add {
    firstname: String,
    lastname:  String,
  },
  /// List athletes by last name, optionally filtered on either name.
  List {
    #[arg(short, long)]
    filter: Option<String>,
  },
  /// Look up an athlete's id by exact name.
  Find {
    firstname: String,
    lastname:  String,
  },
  Show {
    id: i64,
  },
  /// Update scouting notes. Omitted fields keep their current value.
  Notes {
    id:       i64,
    #[arg(long)]
    features: Option<String>,
    #[arg(long)]
    tactics:  Option<String>,
  },
  /// Delete an athlete with no recorded matches.
  Rm {
    id: i64,
  },
  Stats {
    id: i64,
  },
}

// ─── Tournaments ─────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum TournamentCommand {
  Add {
    name: String,
    /// ISO date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
  },
  List,
  /// Show a tournament and its matches.
  Show {
    id: i64,
  },
  Edit {
    id:   i64,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    date: Option<NaiveDate>,
  },
  /// Delete a tournament together with all of its matches.
  Rm {
    id: i64,
  },
  Stats {
    id: i64,
  },
}

// ─── Matches ─────────────────────────────────────────────────────────────────

/// Technique counts, e.g. `kizami=2,jodan-mawashi=1`.
#[derive(Args, Debug)]
pub struct Tallies {
  #[arg(long)]
  ao_tally:  Option<Tally>,
  #[arg(long)]
  aka_tally: Option<Tally>,
}

#[derive(Args, Debug)]
pub struct Notes {
  #[arg(long)]
  description: Option<String>,
  #[arg(long)]
  ao_summary:  Option<String>,
  #[arg(long)]
  aka_summary: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum MatchCommand {
  Record {
    #[arg(long)]
    tournament: i64,
    /// Athlete id in the ao (blue) corner.
    #[arg(long)]
    ao:         i64,
    /// Athlete id in the aka (red) corner.
    #[arg(long)]
    aka:        i64,
    #[command(flatten)]
    tallies:    Tallies,
    #[command(flatten)]
    notes:      Notes,
  },
  List {
    #[arg(long, conflicts_with = "athlete")]
    tournament: Option<i64>,
    #[arg(long)]
    athlete:    Option<i64>,
  },
  Show {
    id: i64,
  },
  /// Re-enter technique counts; scores are recomputed.
  Tally {
    id:      i64,
    #[command(flatten)]
    tallies: Tallies,
  },
  /// Replace the description and/or corner summaries.
  Notes {
    id:    i64,
    #[command(flatten)]
    notes: Notes,
  },
  Rm {
    id: i64,
  },
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

pub async fn run(
  catalog: &Catalog<SqliteStore>,
  command: Command,
  out: Printer,
) -> anyhow::Result<()> {
  match command {
    Command::Athlete(cmd) => athlete(catalog, cmd, out).await,
    Command::Tournament(cmd) => tournament(catalog, cmd, out).await,
    Command::Match(cmd) => bout(catalog, cmd, out).await,
    Command::Wipe { yes } => {
      if !yes {
        bail!("refusing to wipe without --yes");
      }
      catalog.wipe().await.context("failed to wipe store")?;
      out.done("all data deleted", None)
    }
  }
}

async fn athlete(
  catalog: &Catalog<SqliteStore>,
  cmd: AthleteCommand,
  out: Printer,
) -> anyhow::Result<()> {
  match cmd {
    AthleteCommand::Add { firstname, lastname } => {
      let (id, _) = catalog.add_athlete(firstname, lastname).await?;
      out.done(&format!("added athlete {id}"), Some(id.0))
    }
    AthleteCommand::List { filter } => {
      let snapshot = catalog.fetch_athletes().await?;
      let list = match filter {
        Some(query) => catalog.filter_athletes(&query),
        None => snapshot.athletes.to_vec(),
      };
      out.emit(list.as_slice(), render::athlete_list)
    }
    AthleteCommand::Find { firstname, lastname } => {
      match catalog.store().find_athlete_id(firstname, lastname).await? {
        Some(id) => out.done(&id.to_string(), Some(id.0)),
        None => bail!("no athlete with that name"),
      }
    }
    AthleteCommand::Show { id } => {
      let athlete = catalog
        .store()
        .get_athlete(AthleteId(id))
        .await?
        .with_context(|| format!("athlete {id} not found"))?;
      out.emit(&athlete, render::athlete_detail)
    }
    AthleteCommand::Notes { id, features, tactics } => {
      let current = catalog
        .store()
        .get_athlete(AthleteId(id))
        .await?
        .with_context(|| format!("athlete {id} not found"))?;
      catalog
        .update_athlete(
          current.id,
          features.unwrap_or(current.features),
          tactics.unwrap_or(current.tactics),
        )
        .await?;
      out.done(&format!("updated athlete {id}"), Some(id))
    }
    AthleteCommand::Rm { id } => {
      catalog.delete_athlete(AthleteId(id)).await?;
      out.done(&format!("deleted athlete {id}"), Some(id))
    }
    AthleteCommand::Stats { id } => {
      let stats = catalog.athlete_stats(AthleteId(id)).await?;
      out.emit(&stats, render::athlete_stats)
    }
  }
}

async fn tournament(
  catalog: &Catalog<SqliteStore>,
  cmd: TournamentCommand,
  out: Printer,
) -> anyhow::Result<()> {
  match cmd {
    TournamentCommand::Add { name, date } => {
      let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
      let (id, _) = catalog.add_tournament(name, canonical_date(date)).await?;
      out.done(&format!("added tournament {id}"), Some(id.0))
    }
    TournamentCommand::List => {
      let snapshot = catalog.fetch_tournaments().await?;
      out.emit(&*snapshot.tournaments, render::tournament_list)
    }
    TournamentCommand::Show { id } => {
      let t = catalog
        .store()
        .get_tournament(TournamentId(id))
        .await?
        .with_context(|| format!("tournament {id} not found"))?;
      let matches = catalog.matches_for_tournament(t.id).await?;
      let body = serde_json::json!({ "tournament": t, "matches": matches });
      out.emit(&body, |_| {
        format!(
          "{}\n{}",
          render::tournament_line(&t),
          render::match_list(&matches)
        )
      })
    }
    TournamentCommand::Edit { id, name, date } => {
      let current = catalog
        .store()
        .get_tournament(TournamentId(id))
        .await?
        .with_context(|| format!("tournament {id} not found"))?;
      let date = date.map(canonical_date).unwrap_or(current.date);
      catalog
        .update_tournament(current.id, name.unwrap_or(current.name), date)
        .await?;
      out.done(&format!("updated tournament {id}"), Some(id))
    }
    TournamentCommand::Rm { id } => {
      catalog.delete_tournament(TournamentId(id)).await?;
      out.done(&format!("deleted tournament {id} and its matches"), Some(id))
    }
    TournamentCommand::Stats { id } => {
      let stats = catalog.tournament_stats(TournamentId(id)).await?;
      out.emit(&stats, render::tournament_stats)
    }
  }
}

async fn bout(
  catalog: &Catalog<SqliteStore>,
  cmd: MatchCommand,
  out: Printer,
) -> anyhow::Result<()> {
  match cmd {
    MatchCommand::Record { tournament, ao, aka, tallies, notes } => {
      let mut input =
        NewMatch::new(TournamentId(tournament), AthleteId(ao), AthleteId(aka))
          .with_tallies(
            tallies.ao_tally.unwrap_or_default(),
            tallies.aka_tally.unwrap_or_default(),
          );
      input.description = notes.description.unwrap_or_default();
      input.ao_summary = notes.ao_summary.unwrap_or_default();
      input.aka_summary = notes.aka_summary.unwrap_or_default();

      let (id, _) = catalog.add_match(input).await?;
      out.done(&format!("recorded match {id}"), Some(id.0))
    }
    MatchCommand::List { tournament, athlete } => {
      let list = match (tournament, athlete) {
        (Some(t), _) => catalog.matches_for_tournament(TournamentId(t)).await?,
        (None, Some(a)) => catalog.matches_for_athlete(AthleteId(a)).await?,
        (None, None) => catalog.fetch_matches().await?.matches.to_vec(),
      };
      out.emit(list.as_slice(), render::match_list)
    }
    MatchCommand::Show { id } => {
      let m = catalog
        .match_details(MatchId(id))
        .await?
        .with_context(|| format!("match {id} not found"))?;
      out.emit(&m, render::match_detail)
    }
    MatchCommand::Tally { id, tallies } => {
      let patch = MatchPatch {
        ao: tallies.ao_tally.map(Into::into),
        aka: tallies.aka_tally.map(Into::into),
        ..MatchPatch::default()
      };
      if patch.is_empty() {
        bail!("nothing to update; pass --ao-tally and/or --aka-tally");
      }
      catalog.update_match(MatchId(id), patch).await?;
      out.done(&format!("updated match {id}"), Some(id))
    }
    MatchCommand::Notes { id, notes } => {
      let patch = MatchPatch {
        description: notes.description,
        ao_summary: notes.ao_summary,
        aka_summary: notes.aka_summary,
        ..MatchPatch::default()
      };
      if patch.is_empty() {
        bail!("nothing to update; pass --description, --ao-summary or --aka-summary");
      }
      catalog.update_match(MatchId(id), patch).await?;
      out.done(&format!("updated match {id}"), Some(id))
    }
    MatchCommand::Rm { id } => {
      catalog.delete_match(MatchId(id)).await?;
      out.done(&format!("deleted match {id}"), Some(id))
    }
  }
}
