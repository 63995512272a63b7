use std::io::{BufRead, Write};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::model::error::ScoreboardError;
use crate::model::game::{Game, GameId};
use crate::registry::GameRegistry;

/// One scoreboard instruction, as read from a command feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Command {
    Start {
        home_team: String,
        away_team: String,
    },
    Update {
        game_id: GameId,
        home_score: i64,
        away_score: i64,
    },
    Finish {
        game_id: GameId,
    },
    Summary,
}

/// Outcome of a single command. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Game { game: Game },
    Finished { game_id: GameId },
    Summary { games: Vec<Game> },
    Error { kind: String, message: String },
}

impl Response {
    pub fn error(kind: &str, message: impl Into<String>) -> Self {
        Response::Error {
            kind: kind.to_string(),
            message: message.into(),
        }
    }
}

impl From<ScoreboardError> for Response {
    fn from(err: ScoreboardError) -> Self {
        Response::error(err.kind(), err.to_string())
    }
}

/// Apply a command to the registry and describe what happened.
#[instrument(level = "debug", skip(registry))]
pub fn handle(registry: &GameRegistry, command: Command) -> Response {
    let outcome = match command {
        Command::Start { home_team, away_team } => registry
            .start_game(&home_team, &away_team)
            .map(|game| Response::Game { game }),
        Command::Update {
            game_id,
            home_score,
            away_score,
        } => registry
            .update_game(game_id, home_score, away_score)
            .map(|game| Response::Game { game }),
        Command::Finish { game_id } => registry
            .finish_game(game_id)
            .map(|()| Response::Finished { game_id }),
        Command::Summary => {
            let games = registry.summary();
            info!(active_games = games.len(), "Prepared summary");
            Ok(Response::Summary { games })
        }
    };
    outcome.unwrap_or_else(Response::from)
}

/// Apply a newline-delimited JSON command feed, writing one JSON response per command.
///
/// Blank lines are skipped. A line that is not a valid command answers with an
/// `invalid_command` error and the feed carries on. Returns how many responses were written.
pub fn run_feed(registry: &GameRegistry, input: impl BufRead, mut output: impl Write) -> anyhow::Result<usize> {
    let mut processed = 0usize;
    for line in input.lines() {
        let line = line.context("reading command feed")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Command>(&line) {
            Ok(command) => handle(registry, command),
            Err(e) => {
                warn!(error = %e, "Skipping malformed command");
                Response::error("invalid_command", e.to_string())
            }
        };
        serde_json::to_writer(&mut output, &response).context("writing response")?;
        output.write_all(b"\n").context("writing response")?;
        processed += 1;
    }
    output.flush().context("flushing output")?;
    Ok(processed)
}
