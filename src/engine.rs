//! Turn protocol for a single game.
//!
//! ```text
//! Start -> AwaitingFirstMove -> SessionCreated -> AwaitingReveal -+-> Won
//!                                                   ^    |        |
//!                                                   +----+        +-> Lost
//!                                               (neighbor count)
//! ```
//!
//! The board parameters are sent to the player first. The server-side game is
//! only created once the player sent a first move, so a player quitting right
//! away leaves nothing behind on the server.

use tracing::{debug, info, instrument, trace};

use crate::{
    channel::Channel,
    configuration::UnknownReplyPolicy,
    error::DriverError,
    game_client::GameServer,
    protocol::{GameSession, Move, PlayerIdentity, ResponseClassification},
};

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// The server answered `"win"`.
    Won,
    /// Any other terminal reply.
    Lost,
}

impl GameOutcome {
    /// True for [`GameOutcome::Won`].
    pub fn is_win(&self) -> bool {
        matches!(self, GameOutcome::Won)
    }
}

#[derive(Debug)]
enum TurnState {
    Start,
    AwaitingFirstMove,
    SessionCreated(Move),
    AwaitingReveal { session: GameSession, pending: Move },
    Won,
    Lost,
}

impl TurnState {
    fn outcome(&self) -> Option<GameOutcome> {
        match self {
            TurnState::Won => Some(GameOutcome::Won),
            TurnState::Lost => Some(GameOutcome::Lost),
            _ => None,
        }
    }
}

/// Drives one game at a time between a [`Channel`] and a [`GameServer`].
#[derive(Debug)]
pub struct TurnEngine<'a, S> {
    server: S,
    player: &'a PlayerIdentity,
    policy: UnknownReplyPolicy,
}

impl<'a, S: GameServer> TurnEngine<'a, S> {
    /// Engine playing as `player` on `server`.
    pub fn new(server: S, player: &'a PlayerIdentity, policy: UnknownReplyPolicy) -> Self {
        TurnEngine {
            server,
            player,
            policy,
        }
    }

    /// Play a whole game over `channel`, which is dropped once the game ends.
    ///
    /// # Errors
    /// Any [`DriverError`] stops the game. None of them are recoverable.
    #[instrument(skip_all, fields(player = %self.player.name))]
    pub fn play(&self, mut channel: Channel) -> Result<GameOutcome, DriverError> {
        let mut state = TurnState::Start;
        loop {
            if let Some(outcome) = state.outcome() {
                info!(?outcome, "game over");
                return Ok(outcome);
            }
            state = self.step(state, &mut channel)?;
        }
    }

    fn step(&self, state: TurnState, channel: &mut Channel) -> Result<TurnState, DriverError> {
        trace!(?state);
        match state {
            TurnState::Start => {
                let info = self.server.fetch_info()?;
                channel.write_line(&info)?;
                Ok(TurnState::AwaitingFirstMove)
            }
            TurnState::AwaitingFirstMove => Ok(TurnState::SessionCreated(read_move(channel)?)),
            TurnState::SessionCreated(first) => {
                let id = self.server.create_game(self.player)?;
                let session = GameSession::new(id, self.server.address());
                info!(id = session.id(), "game created");
                Ok(TurnState::AwaitingReveal {
                    session,
                    pending: first,
                })
            }
            TurnState::AwaitingReveal { session, pending } => {
                let reply = self.server.reveal_cell(&session, pending)?;
                channel.write_line(&reply)?;
                match ResponseClassification::classify(&reply, self.policy)? {
                    ResponseClassification::NeighborCount(n) => {
                        debug!(%pending, neighbors = n, "safe cell");
                        let next = read_move(channel)?;
                        Ok(TurnState::AwaitingReveal {
                            session,
                            pending: next,
                        })
                    }
                    ResponseClassification::Win => Ok(TurnState::Won),
                    ResponseClassification::Loss => Ok(TurnState::Lost),
                }
            }
            TurnState::Won | TurnState::Lost => Ok(state),
        }
    }
}

fn read_move(channel: &mut Channel) -> Result<Move, DriverError> {
    channel.read_line()?.parse()
}
