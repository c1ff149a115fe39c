use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Result of a step or of a whole build.
///
/// Variants are ordered by severity so the result of a build is simply the
/// maximum of its step results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuildResult {
    Success,
    Failure,
    Aborted,
}

impl BuildResult {
    pub fn is_success(self) -> bool {
        self == BuildResult::Success
    }

    /// Combine two results, keeping the most severe one.
    pub fn combine(self, other: BuildResult) -> BuildResult {
        self.max(other)
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildResult::Success => "SUCCESS",
            BuildResult::Failure => "FAILURE",
            BuildResult::Aborted => "ABORTED",
        };
        f.write_str(s)
    }
}

/// How the command text of a step is interpreted.
///
/// - `Shell`: run through the platform shell (`sh -c` / `cmd /C`).
/// - `Python`: written to a temporary script and run with the resolved
///   interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Nature {
    Shell,
    Python,
}

impl Default for Nature {
    fn default() -> Self {
        Nature::Shell
    }
}

impl FromStr for Nature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shell" => Ok(Nature::Shell),
            "python" => Ok(Nature::Python),
            other => Err(format!(
                "invalid nature: {other} (expected \"shell\" or \"python\")"
            )),
        }
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nature::Shell => f.write_str("shell"),
            Nature::Python => f.write_str("python"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_result_wins() {
        assert_eq!(
            BuildResult::Success.combine(BuildResult::Failure),
            BuildResult::Failure
        );
        assert_eq!(
            BuildResult::Aborted.combine(BuildResult::Failure),
            BuildResult::Aborted
        );
        assert_eq!(
            BuildResult::Success.combine(BuildResult::Success),
            BuildResult::Success
        );
    }

    #[test]
    fn nature_parses_case_insensitively() {
        assert_eq!("Python".parse::<Nature>(), Ok(Nature::Python));
        assert_eq!(" shell ".parse::<Nature>(), Ok(Nature::Shell));
        assert!("xshell".parse::<Nature>().is_err());
    }
}
