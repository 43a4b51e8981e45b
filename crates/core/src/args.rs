//! Required argument checks performed before any network call.

use thiserror::Error;

/// A required argument was absent or blank.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Missing required argument: {0}")]
pub struct MissingArgument(pub &'static str);

/// Returns the trimmed-non-empty value of a required argument.
///
/// # Examples
///
/// ```
/// use cloudkit_core::args::{require, MissingArgument};
///
/// assert_eq!(require("table", "users"), Ok("users"));
/// assert_eq!(require("table", "  "), Err(MissingArgument("table")));
/// ```
pub fn require<'a>(name: &'static str, value: &'a str) -> Result<&'a str, MissingArgument> {
    if value.trim().is_empty() {
        return Err(MissingArgument(name));
    }
    Ok(value)
}

/// Like [`require`], for arguments that may not have been supplied at all.
pub fn require_some<'a>(
    name: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, MissingArgument> {
    value.map_or(Err(MissingArgument(name)), |v| require(name, v))
}
