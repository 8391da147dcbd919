//! Remote game server access.
//!
//! The engine only sees the [`GameServer`] trait. [`HttpGameClient`] is the
//! implementation talking to a real server over plain HTTP.
//!
//! | Operation | Method | Path    | Form fields       |
//! |-----------|--------|---------|-------------------|
//! | info      | GET    | `/info` |                   |
//! | new game  | POST   | `/new`  | `name`, `version` |
//! | reveal    | POST   | `/open` | `id`, `x`, `y`    |
//!
//! Every reply is raw text. Any failure is a [`DriverError::Transport`].

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use tracing::{debug, instrument};

use crate::{
    error::DriverError,
    protocol::{GameSession, Move, PlayerIdentity},
};

/// Host used when none is given.
pub const DEFAULT_SERVER: &str = "minesweeper.nm.io";

/// The three remote operations a game needs.
///
/// Calls are blocking and never retried. Replies are text: a body that is not
/// valid UTF-8 is decoded lossily, each invalid sequence becoming U+FFFD.
pub trait GameServer {
    /// Address of the server, as given by the user.
    fn address(&self) -> &str;

    /// Board parameters, as an opaque text blob.
    fn fetch_info(&self) -> Result<String, DriverError>;

    /// Register a new game for `player` and return the identifier the server
    /// assigned to it.
    fn create_game(&self, player: &PlayerIdentity) -> Result<String, DriverError>;

    /// Reveal one cell of `session` and return the raw reply.
    ///
    /// Invalid UTF-8 in the reply is replaced with U+FFFD rather than reported,
    /// so such a reply reaches the player altered and classifies as a loss.
    fn reveal_cell(&self, session: &GameSession, target: Move) -> Result<String, DriverError>;
}

impl<S: GameServer + ?Sized> GameServer for &S {
    fn address(&self) -> &str {
        (**self).address()
    }

    fn fetch_info(&self) -> Result<String, DriverError> {
        (**self).fetch_info()
    }

    fn create_game(&self, player: &PlayerIdentity) -> Result<String, DriverError> {
        (**self).create_game(player)
    }

    fn reveal_cell(&self, session: &GameSession, target: Move) -> Result<String, DriverError> {
        (**self).reveal_cell(session, target)
    }
}

/// [`GameServer`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGameClient {
    host: String,
    base_url: String,
    client: Client,
}

impl HttpGameClient {
    /// Client for the server at `host` (`name` or `name:port`, no scheme).
    ///
    /// No timeout is set: a silent server blocks the driver. Proxy variables
    /// from the environment are ignored, the server is reached directly.
    pub fn new(host: impl Into<String>) -> Result<Self, DriverError> {
        let host = host.into();
        let base_url = format!("http://{host}");
        let client = Client::builder()
            .timeout(None::<Duration>)
            .no_proxy()
            .build()
            .map_err(|e| DriverError::transport(base_url.clone(), e))?;
        Ok(HttpGameClient {
            host,
            base_url,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<String, DriverError> {
        let endpoint = self.endpoint(path);
        let response = self
            .client
            .post(&endpoint)
            .form(form)
            .send()
            .map_err(|e| DriverError::transport(endpoint.clone(), e))?;
        read_body(endpoint, response)
    }
}

fn read_body(endpoint: String, response: Response) -> Result<String, DriverError> {
    // the status is not checked: the body is what the player gets to see
    debug!(%endpoint, status = %response.status(), "response");
    response
        .text()
        .map_err(|e| DriverError::transport(endpoint, e))
}

impl GameServer for HttpGameClient {
    fn address(&self) -> &str {
        &self.host
    }

    #[instrument(skip(self), err)]
    fn fetch_info(&self) -> Result<String, DriverError> {
        let endpoint = self.endpoint("info");
        let response = self
            .client
            .get(&endpoint)
            .send()
            .map_err(|e| DriverError::transport(endpoint.clone(), e))?;
        read_body(endpoint, response)
    }

    #[instrument(skip(self), err)]
    fn create_game(&self, player: &PlayerIdentity) -> Result<String, DriverError> {
        self.post_form(
            "new",
            &[
                ("name", player.name.clone()),
                ("version", player.version.to_string()),
            ],
        )
    }

    #[instrument(skip(self, session), fields(id = session.id()), err)]
    fn reveal_cell(&self, session: &GameSession, target: Move) -> Result<String, DriverError> {
        self.post_form(
            "open",
            &[
                ("id", session.id().to_string()),
                ("x", target.x.to_string()),
                ("y", target.y.to_string()),
            ],
        )
    }
}
