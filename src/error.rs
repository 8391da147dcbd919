//! Errors that abort a match.
//!
//! Every variant is fatal: nothing in the driver retries. Library code only
//! returns these, the binary decides to terminate the process.

use std::fmt;

type Source = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Anything that can stop a match.
#[derive(Debug)]
pub enum DriverError {
    /// The game server could not be reached or the exchange broke mid-way.
    Transport {
        /// Full URL of the endpoint that failed.
        endpoint: String,
        /// Underlying transport error.
        source: Source,
    },
    /// A move line was not exactly two integers separated by a comma.
    MalformedMove {
        /// The offending line, without its line terminator.
        line: String,
    },
    /// The agent executable could not be started.
    Launch {
        /// Program that was supposed to run.
        program: String,
        /// Why spawning failed.
        source: std::io::Error,
    },
    /// No line could be read from the channel (end of stream or I/O failure).
    Input(std::io::Error),
    /// A line could not be written to the channel.
    Output(std::io::Error),
    /// The server answered a reveal with text that is neither a count, a win
    /// nor an explicit loss. Only raised under [`UnknownReplyPolicy::Reject`].
    ///
    /// [`UnknownReplyPolicy::Reject`]: crate::configuration::UnknownReplyPolicy::Reject
    UnexpectedReply {
        /// Raw reply body.
        reply: String,
    },
}

impl DriverError {
    pub(crate) fn transport(endpoint: impl Into<String>, source: impl Into<Source>) -> Self {
        DriverError::Transport {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Transport { endpoint, .. } => {
                write!(f, "failed to connect to server at {endpoint}")
            }
            DriverError::MalformedMove { line } => write!(
                f,
                "expecting guess coordinates in x,y form with integer values, got '{line}'"
            ),
            DriverError::Launch { program, .. } => {
                write!(f, "error starting the command '{program}'")
            }
            DriverError::Input(_) => write!(f, "could not read a line from the player"),
            DriverError::Output(_) => write!(f, "could not write a line to the player"),
            DriverError::UnexpectedReply { reply } => {
                write!(f, "unexpected reply from server: '{reply}'")
            }
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::Transport { source, .. } => Some(source.as_ref()),
            DriverError::Launch { source, .. } => Some(source),
            DriverError::Input(e) | DriverError::Output(e) => Some(e),
            DriverError::MalformedMove { .. } | DriverError::UnexpectedReply { .. } => None,
        }
    }
}
