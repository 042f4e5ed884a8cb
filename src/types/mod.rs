pub(crate) mod request;
pub(crate) mod response;

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub(crate) struct UnknownVariant {
    kind: &'static str,
    value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownVariant {
                kind: "difficulty",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum HelpStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl HelpStatus {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            HelpStatus::Pending => "pending",
            HelpStatus::InProgress => "in_progress",
            HelpStatus::Completed => "completed",
            HelpStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for HelpStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(HelpStatus::Pending),
            "in_progress" => Ok(HelpStatus::InProgress),
            "completed" => Ok(HelpStatus::Completed),
            "cancelled" => Ok(HelpStatus::Cancelled),
            _ => Err(UnknownVariant {
                kind: "help request status",
                value: s.to_string(),
            }),
        }
    }
}

impl Display for HelpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_strings_match_wire_names() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let wire = serde_json::to_value(difficulty).unwrap();
            assert_eq!(wire, difficulty.as_str());
            assert_eq!(difficulty.as_str().parse::<Difficulty>().unwrap(), difficulty);
        }

        for status in [
            HelpStatus::Pending,
            HelpStatus::InProgress,
            HelpStatus::Completed,
            HelpStatus::Cancelled,
        ] {
            let wire = serde_json::to_value(status).unwrap();
            assert_eq!(wire, status.as_str());
            assert_eq!(status.as_str().parse::<HelpStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert!("легкая".parse::<Difficulty>().is_err());
        assert!("archived".parse::<HelpStatus>().is_err());
    }
}
