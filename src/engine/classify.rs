// src/engine/classify.rs

use crate::types::BuildResult;

/// Map a command's exit code to a step result.
///
/// With `ignore_exit_code` every exit code counts as success; the caller is
/// still expected to log the raw code.
pub fn classify(exit_code: i32, ignore_exit_code: bool) -> BuildResult {
    if ignore_exit_code || exit_code == 0 {
        BuildResult::Success
    } else {
        BuildResult::Failure
    }
}
