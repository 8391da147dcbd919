//! Playing several games in a row and counting wins.

use std::fmt;

use tracing::{debug, info, instrument};

use crate::{
    agent::{AgentCommand, AgentProcess},
    channel::Channel,
    configuration::Configuration,
    engine::{GameOutcome, TurnEngine},
    error::DriverError,
    game_client::GameServer,
    protocol::PlayerIdentity,
};

/// Games played and won over a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchTally {
    /// Games that reached a win or a loss.
    pub played: u32,
    /// Games won, never more than `played`.
    pub won: u32,
}

impl MatchTally {
    fn record(&mut self, outcome: GameOutcome) {
        self.played += 1;
        if outcome.is_win() {
            self.won += 1;
        }
    }
}

impl fmt::Display for MatchTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} games played, {} games won", self.played, self.won)
    }
}

/// Provides a fresh [`Channel`] for every game of a match.
pub trait ChannelSource {
    /// Channel for the next game.
    fn open_channel(&mut self, config: &Configuration) -> Result<Channel, DriverError>;
}

/// Who sits on the other end of the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerBinding {
    /// A human at this process' terminal.
    Terminal,
    /// An agent program, launched anew for every game.
    Agent(AgentCommand),
}

impl PlayerBinding {
    /// Agent binding when `argv` names a program, terminal otherwise.
    pub fn from_argv(argv: &[String]) -> PlayerBinding {
        AgentCommand::from_argv(argv).map_or(PlayerBinding::Terminal, PlayerBinding::Agent)
    }
}

impl ChannelSource for PlayerBinding {
    fn open_channel(&mut self, config: &Configuration) -> Result<Channel, DriverError> {
        match self {
            PlayerBinding::Terminal => Ok(Channel::terminal()),
            PlayerBinding::Agent(command) => command.launch(config),
        }
    }
}

/// Plays a number of games back to back for one player.
pub struct MatchRunner<S> {
    server: S,
    player: PlayerIdentity,
    config: Configuration,
}

impl<S: GameServer> MatchRunner<S> {
    /// Runner playing as `player` against `server`.
    pub fn new(server: S, player: PlayerIdentity, config: Configuration) -> Self {
        MatchRunner {
            server,
            player,
            config,
        }
    }

    /// Play `games` games, each on a channel freshly obtained from `source`.
    ///
    /// # Errors
    /// The first error aborts the match, and the tally so far is dropped.
    #[instrument(skip(self, source), fields(player = %self.player.name))]
    pub fn run(
        &self,
        source: &mut impl ChannelSource,
        games: u32,
    ) -> Result<MatchTally, DriverError> {
        let engine = TurnEngine::new(&self.server, &self.player, self.config.unknown_reply());
        let mut tally = MatchTally::default();

        for game in 1..=games {
            let channel = source.open_channel(&self.config)?;
            debug!(game, pid = ?channel.agent().map(AgentProcess::id), "game started");
            let outcome = engine.play(channel)?;
            info!(game, ?outcome);
            if self.config.verbose {
                print_game_result(game, games, outcome);
            }
            tally.record(outcome);
        }

        Ok(tally)
    }
}

// stdout may be the channel, progress goes to stderr
fn print_game_result(game: u32, games: u32, outcome: GameOutcome) {
    let (color, text) = match outcome {
        GameOutcome::Won => ("\x1b[32m", "won"),
        GameOutcome::Lost => ("\x1b[31m", "lost"),
    };
    eprintln!("game {game}/{games}: {color}{text}\x1b[39m");
}
