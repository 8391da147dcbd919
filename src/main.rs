use std::process::ExitCode;

use clap::Parser;
use sweeper_driver::{logger::init_logger, prelude::*};
use tracing::{error, trace};

/// Play minesweeper games on a remote server, from this terminal or through an agent program.
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Cli {
    /// Your name
    #[arg(long)]
    name: String,

    /// The version of your application
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    version: i64,

    /// Server to connect to
    #[arg(long, default_value = DEFAULT_SERVER)]
    server: String,

    /// How many games to play
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Abort on reveal replies that are neither a count, `win`, nor an explicit loss
    #[arg(long)]
    strict_replies: bool,

    /// Write a full trace to a timestamped file instead of logging to stderr
    #[arg(long)]
    log_file: bool,

    /// Agent to launch for each game, with its arguments. Plays from the terminal when absent.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = Configuration::from_env();
    if cli.strict_replies {
        config = config.with_unknown_reply(UnknownReplyPolicy::Reject);
    }
    if cli.log_file {
        config = config.with_log(true);
    }

    if let Err(e) = init_logger(config.log_to_file()) {
        eprintln!("could not set up logging: {e:#}");
    }
    trace!(?cli, ?config);

    match run(cli, config) {
        Ok(tally) => {
            println!("{tally}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            if config.log_to_file() {
                error!("{e:#}");
            }
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: Configuration) -> anyhow::Result<MatchTally> {
    if cli.name.is_empty() {
        anyhow::bail!("name is a required flag for this program");
    }

    let server = HttpGameClient::new(cli.server)?;
    let player = PlayerIdentity::new(cli.name).with_version(cli.version);
    let mut binding = PlayerBinding::from_argv(&cli.command);

    let tally = MatchRunner::new(server, player, config).run(&mut binding, cli.games)?;
    Ok(tally)
}
