use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Importance attached to a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Most urgent.
    High,
    /// Default importance.
    #[default]
    Medium,
    /// Can wait.
    Low,
}

impl Priority {
    /// Every priority, most urgent first.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// String representation used in storage and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort rank: high=2, medium=1, low=0.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 2,
            Self::Medium => 1,
            Self::Low => 0,
        }
    }

    /// Parse user input, falling back to [`Priority::Medium`] for anything unrecognized.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for priority tokens outside `high|medium|low`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid priority: {token}")]
pub struct InvalidPriority {
    /// Offending input.
    pub token: String,
}

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(InvalidPriority {
                token: s.to_owned(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Stored records may carry null, numbers or stale tokens.
        let raw = Option::<serde_json::Value>::deserialize(d)?;
        Ok(raw
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .map_or(Self::Medium, Self::parse_or_default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("HIGH".parse(), Ok(Priority::High));
        assert_eq!(" Low ".parse(), Ok(Priority::Low));
        assert_eq!("medium".parse(), Ok(Priority::Medium));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn unknown_input_defaults_to_medium() {
        assert_eq!(Priority::parse_or_default("urgent"), Priority::Medium);
        assert_eq!(Priority::parse_or_default(""), Priority::Medium);
    }

    #[test]
    fn ranks_order_high_over_low() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }

    #[test]
    fn deserialize_tolerates_garbage() {
        let cases = [
            ("\"high\"", Priority::High),
            ("\"bogus\"", Priority::Medium),
            ("null", Priority::Medium),
            ("7", Priority::Medium),
        ];
        for (json, expected) in cases {
            let parsed: Priority =
                serde_json::from_str(json).unwrap_or_else(|err| panic!("{json}: {err}"));
            assert_eq!(parsed, expected, "input {json}");
        }
    }
}
