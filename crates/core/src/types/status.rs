//! Small enums exchanged between the stores and their consumers.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Cart quantity adjustment requested by the quantity stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuantityAction {
    /// Increase by one.
    Inc,
    /// Decrease by one, never below one.
    Dec,
}

impl QuantityAction {
    /// The wire token (`"INC"` / `"DEC"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inc => "INC",
            Self::Dec => "DEC",
        }
    }
}

/// Error returned when parsing an unknown [`QuantityAction`] token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown quantity action: {0}")]
pub struct UnknownQuantityAction(pub String);

impl FromStr for QuantityAction {
    type Err = UnknownQuantityAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INC" => Ok(Self::Inc),
            "DEC" => Ok(Self::Dec),
            other => Err(UnknownQuantityAction(other.to_owned())),
        }
    }
}

/// Result token of a wishlist membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Added,
    Removed,
}

impl ToggleOutcome {
    /// The status token consumers match on (`"added"` / `"removed"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for ToggleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_action_tokens() {
        assert_eq!("INC".parse::<QuantityAction>().unwrap(), QuantityAction::Inc);
        assert_eq!("dec".parse::<QuantityAction>().unwrap(), QuantityAction::Dec);
        assert!("up".parse::<QuantityAction>().is_err());
        assert_eq!(
            serde_json::to_string(&QuantityAction::Dec).unwrap(),
            "\"DEC\""
        );
    }

    #[test]
    fn test_toggle_outcome_tokens() {
        assert_eq!(ToggleOutcome::Added.to_string(), "added");
        assert_eq!(
            serde_json::to_string(&ToggleOutcome::Removed).unwrap(),
            "\"removed\""
        );
    }
}
