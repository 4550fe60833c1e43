//! SQL schema for the kumite SQLite store.
//!
//! One fixed schema, stamped with `PRAGMA user_version`. `Match` is quoted
//! everywhere because it is also an SQL keyword.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS Athlete (
    AthleteId INTEGER PRIMARY KEY AUTOINCREMENT,
    firstname TEXT NOT NULL,
    lastname  TEXT NOT NULL,
    features  TEXT NOT NULL DEFAULT '',
    tactics   TEXT NOT NULL DEFAULT '',
    CONSTRAINT athlete_names UNIQUE (firstname, lastname)
);

-- Dates are ISO 8601 strings so that ORDER BY date sorts chronologically.
CREATE TABLE IF NOT EXISTS Tournament (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    date TEXT NOT NULL
);

-- aoScore / akaScore are written together with their tallies, never derived
-- by the database.
CREATE TABLE IF NOT EXISTS "Match" (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    tournamentId      INTEGER NOT NULL REFERENCES Tournament(id),
    aoAthleteId       INTEGER NOT NULL REFERENCES Athlete(AthleteId),
    akaAthleteId      INTEGER NOT NULL REFERENCES Athlete(AthleteId),

    aoScore           INTEGER NOT NULL DEFAULT 0,
    akaScore          INTEGER NOT NULL DEFAULT 0,

    aoKizami          INTEGER NOT NULL DEFAULT 0,
    aoGyakuJodan      INTEGER NOT NULL DEFAULT 0,
    aoGyakuChudan     INTEGER NOT NULL DEFAULT 0,
    aoChudanMawashi   INTEGER NOT NULL DEFAULT 0,
    aoJodanMawashi    INTEGER NOT NULL DEFAULT 0,
    aoUramawashi      INTEGER NOT NULL DEFAULT 0,
    aoSweep           INTEGER NOT NULL DEFAULT 0,

    akaKizami         INTEGER NOT NULL DEFAULT 0,
    akaGyakuJodan     INTEGER NOT NULL DEFAULT 0,
    akaGyakuChudan    INTEGER NOT NULL DEFAULT 0,
    akaChudanMawashi  INTEGER NOT NULL DEFAULT 0,
    akaJodanMawashi   INTEGER NOT NULL DEFAULT 0,
    akaUramawashi     INTEGER NOT NULL DEFAULT 0,
    akaSweep          INTEGER NOT NULL DEFAULT 0,

    matchDescription  TEXT NOT NULL DEFAULT '',
    aoSummary         TEXT NOT NULL DEFAULT '',
    akaSummary        TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS match_tournament_idx ON "Match"(tournamentId);
CREATE INDEX IF NOT EXISTS match_ao_idx         ON "Match"(aoAthleteId);
CREATE INDEX IF NOT EXISTS match_aka_idx        ON "Match"(akaAthleteId);

PRAGMA user_version = 1;
"#;

/// Drops every table, children first. Destroys all data.
pub const TEARDOWN: &str = r#"
DROP TABLE IF EXISTS "Match";
DROP TABLE IF EXISTS Tournament;
DROP TABLE IF EXISTS Athlete;
"#;
