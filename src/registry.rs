use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{debug, error, instrument};

use crate::clock::{Clock, SystemClock};
use crate::model::error::{Result, ScoreboardError};
use crate::model::game::{Game, GameId, team_key};

/// Games plus the team index, kept under one lock so they never disagree.
#[derive(Debug, Default)]
struct Board {
    games: HashMap<GameId, Game>,
    // case-folded team name -> game it is playing in
    playing: HashMap<String, GameId>,
}

/// In-memory registry of live games.
///
/// Safe to share between threads (`Arc<GameRegistry>`); every operation is synchronous and
/// internally locked, so callers never need their own synchronization.
pub struct GameRegistry {
    board: RwLock<Board>,
    last_id: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameRegistry")
            .field("active_games", &self.len())
            .field("last_id", &self.last_id.load(Ordering::Relaxed))
            .finish()
    }
}

impl GameRegistry {
    /// Empty registry stamping games with the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Empty registry using the given clock for start times.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            board: RwLock::new(Board::default()),
            last_id: AtomicU64::new(0),
            clock,
        }
    }

    /// Start a 0-0 game between two teams that are not currently playing.
    ///
    /// The uniqueness check and the insert happen under the same write lock, so two concurrent
    /// starts for the same team cannot both succeed.
    #[instrument(level = "debug", skip(self))]
    pub fn start_game(&self, home_team: &str, away_team: &str) -> Result<Game> {
        let home_key = team_key(home_team);
        let away_key = team_key(away_team);
        if home_team.trim().is_empty() || away_team.trim().is_empty() {
            return Err(rejected(ScoreboardError::InvalidTeams(
                "team names must not be empty".to_string(),
            )));
        }
        if home_key == away_key {
            return Err(rejected(ScoreboardError::InvalidTeams(format!(
                "[{}] cannot play against itself",
                home_team
            ))));
        }

        let mut board = self.board.write();
        let conflict = board
            .playing
            .get(&home_key)
            .or_else(|| board.playing.get(&away_key))
            .and_then(|id| board.games.get(id));
        if let Some(existing) = conflict {
            return Err(rejected(ScoreboardError::GameAlreadyExists {
                home_team: home_team.to_string(),
                away_team: away_team.to_string(),
                existing: Box::new(existing.clone()),
            }));
        }

        let id = GameId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let game = Game::new(id, home_team, away_team, self.clock.now());
        board.playing.insert(home_key, id);
        board.playing.insert(away_key, id);
        board.games.insert(id, game.clone());
        debug!(game_id = %id, game = %game, "Created game");
        Ok(game)
    }

    /// Replace the scores of an active game. Unknown ids are reported before bad scores.
    #[instrument(level = "debug", skip(self))]
    pub fn update_game(&self, id: GameId, home_score: i64, away_score: i64) -> Result<Game> {
        let mut board = self.board.write();
        let current = board
            .games
            .get(&id)
            .ok_or_else(|| rejected(ScoreboardError::GameNotFound(id)))?;

        let (home, away) = match (u32::try_from(home_score), u32::try_from(away_score)) {
            (Ok(home), Ok(away)) => (home, away),
            _ => {
                return Err(rejected(ScoreboardError::InvalidScore {
                    home_score,
                    away_score,
                }));
            }
        };

        let updated = current.with_scores(home, away);
        board.games.insert(id, updated.clone());
        debug!(game_id = %id, game = %updated, "Updated game");
        Ok(updated)
    }

    /// Remove an active game. Its id is never handed out again.
    #[instrument(level = "debug", skip(self))]
    pub fn finish_game(&self, id: GameId) -> Result<()> {
        let mut board = self.board.write();
        let game = board
            .games
            .remove(&id)
            .ok_or_else(|| rejected(ScoreboardError::GameNotFound(id)))?;
        board.playing.remove(&team_key(&game.home_team));
        board.playing.remove(&team_key(&game.away_team));
        debug!(game_id = %id, game = %game, "Finished game");
        Ok(())
    }

    /// Snapshot of all active games, highest total first, then most recently started.
    pub fn summary(&self) -> Vec<Game> {
        let mut games: Vec<Game> = self.board.read().games.values().cloned().collect();
        games.sort_by(|a, b| {
            b.total_score()
                .cmp(&a.total_score())
                .then_with(|| b.start_time.cmp(&a.start_time))
                // ids follow start order; breaks ties when the clock returned equal instants
                .then_with(|| b.id.cmp(&a.id))
        });
        games
    }

    /// Snapshot of one active game.
    pub fn game(&self, id: GameId) -> Option<Game> {
        self.board.read().games.get(&id).cloned()
    }

    /// Number of active games.
    pub fn len(&self) -> usize {
        self.board.read().games.len()
    }

    /// True when no game is in progress.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn rejected(err: ScoreboardError) -> ScoreboardError {
    error!(error = %err, kind = err.kind(), "Scoreboard operation rejected");
    err
}
