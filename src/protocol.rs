//! Values exchanged during a game: moves typed by the player, the session
//! handed out by the server, and the classification of reveal replies.

use std::{fmt, str::FromStr};

use crate::{configuration::UnknownReplyPolicy, error::DriverError};

/// Coordinates of the cell to reveal. Bounds are the server's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

impl Move {
    /// Create a move from its coordinates.
    pub fn new(x: i64, y: i64) -> Self {
        Move { x, y }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Move {
    type Err = DriverError;

    /// Parse `"<int>,<int>"`, surrounding whitespace allowed around each token.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = || DriverError::MalformedMove {
            line: line.trim_end_matches(['\r', '\n']).to_string(),
        };

        let mut tokens = line.trim().split(',');
        let (Some(x), Some(y), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(malformed());
        };
        let x = parse_int_literal(x.trim()).ok_or_else(malformed)?;
        let y = parse_int_literal(y.trim()).ok_or_else(malformed)?;
        Ok(Move { x, y })
    }
}

/// Who is playing, as registered with the server on game creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    /// Player name, required by the server.
    pub name: String,
    /// Version of the playing program, `-1` when unknown.
    pub version: i64,
}

impl PlayerIdentity {
    /// Identity with the given name and an unknown version.
    pub fn new(name: impl Into<String>) -> Self {
        PlayerIdentity {
            name: name.into(),
            version: -1,
        }
    }

    /// Set the version of the playing program.
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }
}

/// A game instance tracked by the server.
///
/// Only exists once the server answered the creation request, so holding one
/// means the identifier is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    id: String,
    server: String,
}

impl GameSession {
    /// Wrap an identifier returned by the server at `server`.
    pub fn new(id: impl Into<String>, server: impl Into<String>) -> Self {
        GameSession {
            id: id.into(),
            server: server.into(),
        }
    }

    /// Identifier assigned by the server, passed back verbatim on each reveal.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Server this session lives on.
    pub fn server(&self) -> &str {
        &self.server
    }
}

/// What a reveal reply means for the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClassification {
    /// The revealed cell was safe and has `n` mined neighbours. Game goes on.
    NeighborCount(i64),
    /// Every safe cell is revealed.
    Win,
    /// The game is over and was not won.
    Loss,
}

impl ResponseClassification {
    /// Classify a raw reveal reply.
    ///
    /// The text is used as is: `"win"` must match exactly and `" 2"` is not a
    /// count.
    pub fn classify(reply: &str, policy: UnknownReplyPolicy) -> Result<Self, DriverError> {
        if let Some(n) = parse_int_literal(reply) {
            return Ok(ResponseClassification::NeighborCount(n));
        }
        if reply == WIN_REPLY {
            return Ok(ResponseClassification::Win);
        }
        match policy {
            UnknownReplyPolicy::TreatAsLoss => Ok(ResponseClassification::Loss),
            UnknownReplyPolicy::Reject if LOSS_REPLIES.contains(&reply) => {
                Ok(ResponseClassification::Loss)
            }
            UnknownReplyPolicy::Reject => Err(DriverError::UnexpectedReply {
                reply: reply.to_string(),
            }),
        }
    }
}

const WIN_REPLY: &str = "win";
const LOSS_REPLIES: [&str; 2] = ["lose", "loss"];

/// Parse an integer literal whatever its base.
///
/// Accepts an optional sign, then `0x`, `0o`, `0b` prefixes (any case), a
/// leading `0` for octal, or plain decimal. Single underscores may separate
/// digits, and may follow a base prefix. Out of range values are rejected.
pub fn parse_int_literal(text: &str) -> Option<i64> {
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let lower = unsigned.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits, after_prefix) = match lower.as_deref() {
        Some("0x") => (16, &unsigned[2..], true),
        Some("0o") => (8, &unsigned[2..], true),
        Some("0b") => (2, &unsigned[2..], true),
        _ if unsigned.len() > 1 && unsigned.starts_with('0') => (8, &unsigned[1..], true),
        _ => (10, unsigned, false),
    };

    let cleaned = strip_underscores(digits, after_prefix)?;
    if cleaned.is_empty() {
        return None;
    }

    // parse through u64 so that i64::MIN is reachable
    let magnitude = u64::from_str_radix(&cleaned, radix).ok()?;
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

fn strip_underscores(digits: &str, after_prefix: bool) -> Option<String> {
    let mut cleaned = String::with_capacity(digits.len());
    // an underscore is valid right after a base prefix or after a digit
    let mut underscore_allowed = after_prefix;
    let mut last_was_underscore = false;
    for c in digits.chars() {
        if c == '_' {
            if !underscore_allowed {
                return None;
            }
            underscore_allowed = false;
            last_was_underscore = true;
        } else {
            // from_str_radix rejects signs and non-digits later, but not a
            // second sign
            if c == '+' || c == '-' {
                return None;
            }
            cleaned.push(c);
            underscore_allowed = true;
            last_was_underscore = false;
        }
    }
    if last_was_underscore {
        return None;
    }
    Some(cleaned)
}

#[cfg(test)]
mod protocol_tests {
    use super::*;

    #[test]
    fn parses_plain_move() {
        assert_eq!("3,4".parse::<Move>().unwrap(), Move::new(3, 4));
    }

    #[test]
    fn parses_move_with_whitespace() {
        assert_eq!("3, 4 ".parse::<Move>().unwrap(), Move::new(3, 4));
        assert_eq!("  3 ,4\n".parse::<Move>().unwrap(), Move::new(3, 4));
        assert_eq!("-1,0x10\r\n".parse::<Move>().unwrap(), Move::new(-1, 16));
    }

    #[test]
    fn rejects_malformed_moves() {
        for line in ["3,4,5", "x,4", "3", "", ",", "3,", "3;4", "3.0,4"] {
            match line.parse::<Move>() {
                Err(DriverError::MalformedMove { line: l }) => assert_eq!(l, line),
                other => panic!("'{line}' should be malformed, got {other:?}"),
            }
        }
    }

    #[test]
    fn integer_literals_of_any_base() {
        assert_eq!(parse_int_literal("42"), Some(42));
        assert_eq!(parse_int_literal("-42"), Some(-42));
        assert_eq!(parse_int_literal("+7"), Some(7));
        assert_eq!(parse_int_literal("0"), Some(0));
        assert_eq!(parse_int_literal("0x1F"), Some(31));
        assert_eq!(parse_int_literal("0X1f"), Some(31));
        assert_eq!(parse_int_literal("0o17"), Some(15));
        assert_eq!(parse_int_literal("017"), Some(15));
        assert_eq!(parse_int_literal("0b101"), Some(5));
        assert_eq!(parse_int_literal("1_000"), Some(1000));
        assert_eq!(parse_int_literal("0x_ff"), Some(255));
        assert_eq!(parse_int_literal("-9223372036854775808"), Some(i64::MIN));
    }

    #[test]
    fn rejects_non_integer_literals() {
        for text in [
            "", "-", "+", "win", "2\n", " 2", "1__0", "_1", "1_", "0x", "08", "--1", "+-1",
            "9223372036854775808", "1.5",
        ] {
            assert_eq!(parse_int_literal(text), None, "{text:?}");
        }
    }

    #[test]
    fn integer_reply_is_a_neighbor_count() {
        for (reply, n) in [("0", 0), ("2", 2), ("8", 8), ("0x3", 3)] {
            let class = ResponseClassification::classify(reply, UnknownReplyPolicy::TreatAsLoss)
                .unwrap();
            assert_eq!(class, ResponseClassification::NeighborCount(n));
        }
    }

    #[test]
    fn win_is_recognised_under_both_policies() {
        for policy in [UnknownReplyPolicy::TreatAsLoss, UnknownReplyPolicy::Reject] {
            let class = ResponseClassification::classify("win", policy).unwrap();
            assert_eq!(class, ResponseClassification::Win);
        }
    }

    #[test]
    fn anything_else_is_a_loss_by_default() {
        for reply in ["boom", "lose", "", "Win", "win\n", "2 mines", "internal error"] {
            assert_eq!(
                ResponseClassification::classify(reply, UnknownReplyPolicy::TreatAsLoss).unwrap(),
                ResponseClassification::Loss,
                "{reply:?}"
            );
        }
    }

    #[test]
    fn strict_policy_only_accepts_explicit_losses() {
        for reply in ["lose", "loss"] {
            assert_eq!(
                ResponseClassification::classify(reply, UnknownReplyPolicy::Reject).unwrap(),
                ResponseClassification::Loss
            );
        }
        match ResponseClassification::classify("boom", UnknownReplyPolicy::Reject) {
            Err(DriverError::UnexpectedReply { reply }) => assert_eq!(reply, "boom"),
            other => panic!("expected an unexpected reply error, got {other:?}"),
        }
    }

    #[test]
    fn session_exposes_id_and_server() {
        let session = GameSession::new("abc123", "localhost:8080");
        assert_eq!(session.id(), "abc123");
        assert_eq!(session.server(), "localhost:8080");
    }
}
