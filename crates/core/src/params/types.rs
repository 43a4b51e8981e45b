use serde::Serialize;

/// Most names the parameter store resolves in one request.
pub const GET_PARAMETERS_LIMIT: usize = 10;

/// A resolved configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

/// Result of resolving a set of names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterBatch {
    pub parameters: Vec<Parameter>,
    /// Names the store did not recognize.
    pub invalid: Vec<String>,
}

/// One page of a hierarchy listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterPage {
    pub parameters: Vec<Parameter>,
    pub next_token: Option<String>,
}

/// Splits names into request-sized groups, dropping duplicates.
pub fn chunk_names(names: &[String]) -> Vec<Vec<String>> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(name) {
            unique.push(name.clone());
        }
    }

    unique
        .chunks(GET_PARAMETERS_LIMIT)
        .map(<[String]>::to_vec)
        .collect()
}

/// Name of a parameter relative to the hierarchy it was listed from.
///
/// # Examples
///
/// ```
/// use cloudkit_core::params::relative_name;
///
/// assert_eq!(relative_name("/app/prod", "/app/prod/db/url"), "db/url");
/// assert_eq!(relative_name("/app/prod/", "/app/prod/token"), "token");
/// assert_eq!(relative_name("/other", "/app/prod/token"), "/app/prod/token");
/// ```
pub fn relative_name<'a>(path: &str, name: &'a str) -> &'a str {
    let prefix = path.trim_end_matches('/');
    match name.strip_prefix(prefix) {
        Some(rest) if rest.starts_with('/') => &rest[1..],
        _ => name,
    }
}
