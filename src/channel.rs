//! Line-oriented link between the driver and whoever is playing.
//!
//! A [`Channel`] is built either on the process' own stdin/stdout or on the
//! pipes of an agent process (see [`crate::agent`]). The engine does not know
//! which one it talks to.

use std::io::{self, BufRead, Write};

use tracing::trace;

use crate::{agent::AgentProcess, error::DriverError};

/// One input stream and one output stream, owned by a single game.
pub struct Channel {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    // kept alive for as long as its pipes are in use
    agent: Option<AgentProcess>,
}

impl Channel {
    /// Bind to the terminal of the current process.
    ///
    /// Stdin stays locked until the channel is dropped. Its buffer is shared
    /// by the whole process, so nothing typed ahead is lost between games.
    pub fn terminal() -> Channel {
        Channel::from_parts(io::stdin().lock(), io::stdout())
    }

    /// Bind to arbitrary streams.
    pub fn from_parts(
        input: impl BufRead + 'static,
        output: impl Write + 'static,
    ) -> Channel {
        Channel {
            input: Box::new(input),
            output: Box::new(output),
            agent: None,
        }
    }

    pub(crate) fn with_agent(mut self, agent: AgentProcess) -> Channel {
        self.agent = Some(agent);
        self
    }

    /// The agent on the other end, if any.
    pub fn agent(&self) -> Option<&AgentProcess> {
        self.agent.as_ref()
    }

    /// Read the next line, without its terminator.
    ///
    /// # Errors
    /// [`DriverError::Input`] on end of stream or read failure.
    pub fn read_line(&mut self) -> Result<String, DriverError> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line).map_err(DriverError::Input)?;
        if n == 0 {
            return Err(DriverError::Input(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "end of stream",
            )));
        }
        let len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(len);
        trace!(%line, "read");
        Ok(line)
    }

    /// Write `line` followed by a newline, and flush it.
    ///
    /// # Errors
    /// [`DriverError::Output`] when the sink is closed.
    pub fn write_line(&mut self, line: &str) -> Result<(), DriverError> {
        trace!(%line, "write");
        writeln!(self.output, "{line}").map_err(DriverError::Output)?;
        self.output.flush().map_err(DriverError::Output)
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("agent", &self.agent)
            .finish_non_exhaustive()
    }
}
