//! Config for the driver behaviors
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional and case-insensitive. Set the value to `"true"` to enable a flag,
//! any other value disables it. An unset variable keeps its default.
//!
//! - `SWEEPER_VERBOSE` — Print the result of each game on stderr (default: `false`)
//! - `SWEEPER_LOG` — Log to a file instead of stderr (default: `false`)
//! - `SWEEPER_DEBUG_AGENT_STDERR` — Let the agent write to our stderr (default: `true`)
//! - `SWEEPER_STRICT_REPLIES` — Reject unknown reveal replies instead of counting them as a
//!   loss (default: `false`)

/// What to do with a reveal reply that is neither a count nor `"win"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownReplyPolicy {
    /// The game is lost, whatever the text says.
    #[default]
    TreatAsLoss,
    /// Only `"lose"` and `"loss"` end the game as lost, anything else aborts the match.
    Reject,
}

/// Configuration for driver behaviors.
#[derive(Debug, Clone, Copy)]
pub struct Configuration {
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) debug_agent_stderr: bool,
    pub(crate) unknown_reply: UnknownReplyPolicy,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - Nothing but the final tally is printed.
    /// - Logs go to stderr.
    /// - Agent stderr is inherited.
    /// - Unknown replies count as a loss.
    pub fn new() -> Self {
        Self {
            verbose: false,
            log: false,
            debug_agent_stderr: true,
            unknown_reply: UnknownReplyPolicy::TreatAsLoss,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// A set variable enables its flag when its value is `"true"` and disables
    /// it otherwise. Unset variables keep the default, see the module documentation.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get_env_flag = |var: &str, default: bool| match lookup(var) {
            Some(val) => val.eq_ignore_ascii_case("true"),
            None => default,
        };

        let unknown_reply = if get_env_flag("SWEEPER_STRICT_REPLIES", false) {
            UnknownReplyPolicy::Reject
        } else {
            UnknownReplyPolicy::TreatAsLoss
        };

        Self {
            verbose: get_env_flag("SWEEPER_VERBOSE", false),
            log: get_env_flag("SWEEPER_LOG", false),
            debug_agent_stderr: get_env_flag("SWEEPER_DEBUG_AGENT_STDERR", true),
            unknown_reply,
        }
    }

    /// Enable or disable per-game result lines.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Enable or disable agent stderr output.
    pub fn with_debug_agent_stderr(mut self, value: bool) -> Self {
        self.debug_agent_stderr = value;
        self
    }

    /// Choose how unknown reveal replies are handled.
    pub fn with_unknown_reply(mut self, policy: UnknownReplyPolicy) -> Self {
        self.unknown_reply = policy;
        self
    }

    /// Whether logs should go to a file.
    pub fn log_to_file(&self) -> bool {
        self.log
    }

    /// Current policy for unknown reveal replies.
    pub fn unknown_reply(&self) -> UnknownReplyPolicy {
        self.unknown_reply
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
