//! Launching agent programs.
//!
//! An agent is spawned with its stdin and stdout piped and cross-wired into a
//! [`Channel`]: what the agent writes is what the engine reads, and what the
//! engine writes lands on the agent's stdin. The agent sees exactly what a
//! human would see in a terminal.

use std::{
    io::BufReader,
    process::{Child, Command, Stdio},
};

use tracing::{debug, instrument, warn};

use crate::{channel::Channel, configuration::Configuration, error::DriverError};

/// Program and arguments to run as an agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AgentCommand {
    /// Executable, looked up in `PATH` when it has no path separator.
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<String>,
}

impl AgentCommand {
    /// Run `program` with `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> AgentCommand {
        AgentCommand {
            program: program.into(),
            args,
        }
    }

    /// Split a command line given as argv. An empty argv means no agent.
    pub fn from_argv(argv: &[String]) -> Option<AgentCommand> {
        let (program, args) = argv.split_first()?;
        Some(AgentCommand::new(program.clone(), args.to_vec()))
    }

    /// Spawn the program and return the channel wired to it.
    ///
    /// The child is owned by the returned channel. It is never killed nor
    /// waited for: it is expected to exit once its stdin is closed.
    ///
    /// # Errors
    /// [`DriverError::Launch`] if the program cannot be started.
    #[instrument(skip_all, fields(program = %self.program))]
    pub fn launch(&self, config: &Configuration) -> Result<Channel, DriverError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped());
        if !config.debug_agent_stderr {
            cmd.stderr(Stdio::null());
        }

        let mut child = cmd.spawn().map_err(|source| DriverError::Launch {
            program: self.program.clone(),
            source,
        })?;

        // both are Some since they were piped above
        let (Some(to_agent), Some(from_agent)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(DriverError::Launch {
                program: self.program.clone(),
                source: std::io::Error::other("agent pipes are missing"),
            });
        };
        debug!(pid = child.id(), "agent started");

        let process = AgentProcess {
            child,
            program: self.program.clone(),
        };
        Ok(Channel::from_parts(BufReader::new(from_agent), to_agent).with_agent(process))
    }
}

impl std::fmt::Display for AgentCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// A running agent, attached to the channel that talks to it.
#[derive(Debug)]
pub struct AgentProcess {
    child: Child,
    program: String,
}

impl AgentProcess {
    /// OS process id of the agent.
    pub fn id(&self) -> u32 {
        self.child.id()
    }
}

impl Drop for AgentProcess {
    fn drop(&mut self) {
        // reap it if it is already gone, otherwise leave it be
        match self.child.try_wait() {
            Ok(Some(status)) => debug!(program = %self.program, %status, "agent exited"),
            Ok(None) => debug!(
                program = %self.program,
                pid = self.child.id(),
                "agent still running after its game"
            ),
            Err(e) => warn!(program = %self.program, "could not query agent status: {e}"),
        }
    }
}
