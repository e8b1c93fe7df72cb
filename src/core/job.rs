//! Job requests, execution numbers and placement preferences.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Caller-supplied ordering and de-duplication key for a unit of work.
///
/// A value that does not parse as an integer is still accepted: it keeps its raw
/// text for display, sorts after every well-formed number and never counts as a
/// duplicate of another request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecutionNumber {
    /// Well-formed integer.
    Valid(i64),
    /// Raw text that failed to parse.
    Malformed(String),
}

impl ExecutionNumber {
    /// Parse raw path text. Never fails; bad input becomes [`ExecutionNumber::Malformed`].
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map_or_else(|_| Self::Malformed(raw.to_string()), Self::Valid)
    }

    /// Whether the value parsed as an integer.
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The de-duplication key. Malformed values have none.
    pub const fn as_valid(&self) -> Option<i64> {
        match self {
            Self::Valid(n) => Some(*n),
            Self::Malformed(_) => None,
        }
    }

    /// Queue ordering: well-formed numbers ascending, then every malformed value as a tie.
    pub fn schedule_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Valid(a), Self::Valid(b)) => a.cmp(b),
            (Self::Valid(_), Self::Malformed(_)) => Ordering::Less,
            (Self::Malformed(_), Self::Valid(_)) => Ordering::Greater,
            (Self::Malformed(_), Self::Malformed(_)) => Ordering::Equal,
        }
    }
}

impl fmt::Display for ExecutionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(n) => write!(f, "{n}"),
            Self::Malformed(raw) => write!(f, "{raw}"),
        }
    }
}

impl From<i64> for ExecutionNumber {
    fn from(value: i64) -> Self {
        Self::Valid(value)
    }
}

/// Named resource-selection policy requested by a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    /// Any free resource.
    #[default]
    Performance,
    /// Only the first half (rounded up) of the groups.
    Balanced,
    /// Only the first group.
    Energy,
}

impl Preference {
    /// Lower-case name as used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Performance => "performance",
            Self::Balanced => "balanced",
            Self::Energy => "energy",
        }
    }

    /// Resolve an optional raw preference.
    ///
    /// Returns the preference and whether an unrecognized value fell back to
    /// [`Preference::Performance`]. Absent input is not a fallback.
    pub fn resolve(raw: Option<&str>) -> (Self, bool) {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => (Self::Performance, false),
            Some(value) => value
                .parse()
                .map_or((Self::Performance, true), |pref| (pref, false)),
        }
    }
}

impl FromStr for Preference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "performance" => Ok(Self::Performance),
            "balanced" => Ok(Self::Balanced),
            "energy" => Ok(Self::Energy),
            other => Err(format!("unknown preference `{other}`")),
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    /// Human-readable label.
    pub name: String,
    /// Ordering and identity key.
    pub execution_number: ExecutionNumber,
    /// Placement preference.
    pub preference: Preference,
    /// Admission sequence number assigned by the scheduler; zero until admitted.
    #[serde(skip)]
    pub ticket: u64,
}

impl JobRequest {
    /// Build a request.
    pub fn new(
        name: impl Into<String>,
        execution_number: impl Into<ExecutionNumber>,
        preference: Preference,
    ) -> Self {
        Self {
            name: name.into(),
            execution_number: execution_number.into(),
            preference,
            ticket: 0,
        }
    }

    /// Key under which the caller waits for its grant.
    pub fn key(&self) -> JobKey {
        JobKey {
            name: self.name.clone(),
            execution_number: self.execution_number.clone(),
            ticket: self.ticket,
        }
    }
}

/// Identifies a pending caller. Displays as `name-executionNumber`; the ticket
/// keeps two requests with the same malformed number apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobKey {
    /// Job name.
    pub name: String,
    /// Execution number.
    pub execution_number: ExecutionNumber,
    /// Admission sequence number.
    pub ticket: u64,
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.execution_number)
    }
}
