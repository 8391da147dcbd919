//! # Sweeper Driver
//!
//! A client playing minesweeper games hosted by a remote server, on behalf of either a human at
//! a terminal or an agent program.
//!
//! It provides:
//! - The turn protocol of a single game ([`TurnEngine`](crate::engine::TurnEngine))
//! - A [`Channel`](crate::channel::Channel) abstraction hiding whether the player is a terminal
//!   or a child process
//! - Agent launching with stdin/stdout cross-wired to the channel ([`agent`])
//! - An HTTP client for the game server ([`game_client`])
//! - Repeated games with a win tally ([`MatchRunner`](crate::match_runner::MatchRunner))
//!
//! The driver knows nothing of the game rules. It forwards board parameters and reveal replies to
//! the player, forwards moves to the server, and only looks at replies to know whether the game
//! goes on.
//!
//! # Usage Example
//!
//! ```no_run
//! use sweeper_driver::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Configuration::from_env();
//!     let server = HttpGameClient::new("localhost:8080")?;
//!     let player = PlayerIdentity::new("alice").with_version(2);
//!
//!     // launch `./my_bot --quiet` for every game, use the terminal when argv is empty
//!     let argv = vec!["./my_bot".to_string(), "--quiet".to_string()];
//!     let mut binding = PlayerBinding::from_argv(&argv);
//!
//!     let tally = MatchRunner::new(server, player, config).run(&mut binding, 10)?;
//!     println!("{tally}");
//!     Ok(())
//! }
//! ```
//!
//! # Player Protocol
//!
//! Everything is line based, on the player's stdin/stdout:
//!  * Driver -> Player : board parameters, once per game, as sent by the server
//!  * Player -> Driver : `x,y`, the cell to reveal
//!  * Driver -> Player : the server reply, a neighbor count, `win`, or anything else for a loss
//!
//! A new game starts after each win or loss. Agents are relaunched for every game.
#![warn(missing_docs)]

pub use anyhow;
pub mod agent;
pub mod channel;
pub mod configuration;
pub mod engine;
pub mod error;
pub mod game_client;
pub mod logger;
pub mod match_runner;
pub mod protocol;

/// Commonly used types and traits for quick access.
///
/// ```rust
/// use sweeper_driver::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agent::AgentCommand;
    pub use crate::channel::Channel;
    pub use crate::configuration::{Configuration, UnknownReplyPolicy};
    pub use crate::engine::{GameOutcome, TurnEngine};
    pub use crate::error::DriverError;
    pub use crate::game_client::{GameServer, HttpGameClient, DEFAULT_SERVER};
    pub use crate::match_runner::{ChannelSource, MatchRunner, MatchTally, PlayerBinding};
    pub use crate::protocol::{GameSession, Move, PlayerIdentity, ResponseClassification};
}
