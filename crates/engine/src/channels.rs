//! Payment channel and direction of a ledger movement.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// The sub-ledger an amount affects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Channel {
    #[default]
    Cash,
    Cheque,
    Card,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Cash, Channel::Cheque, Channel::Card];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Cheque => "CHEQUE",
            Self::Card => "CARD",
        }
    }

    /// Display label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Cheque => "Cheque",
            Self::Card => "Card",
        }
    }

    /// Reads a channel persisted in the store.
    ///
    /// Unknown or missing values count as [`Channel::Cash`]: stored entries are
    /// never dropped from balance math because of a bad channel.
    pub fn from_stored(value: Option<&str>) -> Self {
        value
            .and_then(|v| Self::try_from(v).ok())
            .unwrap_or_default()
    }
}

impl TryFrom<&str> for Channel {
    type Error = EngineError;

    /// Accepts the canonical names and the labels clients send
    /// (`Cash`, `Cheque`, `Card/UPI`), case-insensitively.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CASH" => Ok(Self::Cash),
            "CHEQUE" | "CHECK" => Ok(Self::Cheque),
            "CARD" | "CARD/UPI" | "UPI" => Ok(Self::Card),
            _ => Err(EngineError::InvalidValue(format!(
                "invalid payment channel '{value}': expected CASH, CHEQUE or CARD"
            ))),
        }
    }
}

/// Whether a movement adds to (credit) or subtracts from (debit) a balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "CREDIT",
            Self::Debit => "DEBIT",
        }
    }

    /// `+` for credits, `-` for debits.
    pub fn sign(self) -> &'static str {
        match self {
            Self::Credit => "+",
            Self::Debit => "-",
        }
    }
}

impl TryFrom<&str> for Direction {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CREDIT" => Ok(Self::Credit),
            "DEBIT" => Ok(Self::Debit),
            _ => Err(EngineError::InvalidValue(format!(
                "invalid direction '{value}': expected CREDIT or DEBIT"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_accepts_client_labels() {
        assert_eq!(Channel::try_from("Cash").unwrap(), Channel::Cash);
        assert_eq!(Channel::try_from("cheque").unwrap(), Channel::Cheque);
        assert_eq!(Channel::try_from("Card/UPI").unwrap(), Channel::Card);
        assert_eq!(Channel::try_from("CARD").unwrap(), Channel::Card);
    }

    #[test]
    fn channel_rejects_unknown_input_with_a_reason() {
        let err = Channel::try_from("bitcoin").unwrap_err();
        assert!(err.to_string().contains("bitcoin"));
    }

    #[test]
    fn stored_channel_defaults_to_cash() {
        assert_eq!(Channel::from_stored(Some("bitcoin")), Channel::Cash);
        assert_eq!(Channel::from_stored(None), Channel::Cash);
        assert_eq!(Channel::from_stored(Some("CARD")), Channel::Card);
    }

    #[test]
    fn direction_is_strict() {
        assert_eq!(Direction::try_from("credit").unwrap(), Direction::Credit);
        assert!(Direction::try_from("sideways").is_err());
    }
}
