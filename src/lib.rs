//! In-memory scoreboard of live games: who is playing, the current scores, and a ranked summary.

pub mod clock;
pub mod handler;
pub mod model;
pub mod registry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use model::error::{Result, ScoreboardError};
pub use model::game::{Game, GameId};
pub use registry::GameRegistry;
