//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset or empty
//! - `${VAR:-default}` - expands to VAR if set and non-empty, otherwise uses default
//!
//! An empty variable counts as unset, as with the shell's `:-` operator. A
//! deployment that exports `NOTES_STORAGE_BASE_URL=` falls back to the
//! default instead of producing an empty base URL.

use std::borrow::Cow;

use crate::ConfigError;

/// Why a referenced variable could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unusable {
    Unset,
    Empty,
}

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    expand_with(value, field, |var| std::env::var(var).ok())
}

/// Expand `${}` references, resolving variables through `lookup`.
fn expand_with<F>(value: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Fast path: no expansion needed
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, Unusable> {
        match lookup(var) {
            Some(val) if val.is_empty() => Err(Unusable::Empty),
            Some(val) => Ok(Some(val)),
            None => Err(Unusable::Unset),
        }
    })
    .map(Cow::into_owned)
    .map_err(|e| {
        let reason = match e.cause {
            Unusable::Unset => "not set",
            Unusable::Empty => "empty",
        };
        ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!(
                "${{{var}}} is {reason} (use ${{{var}:-...}} to give a default)",
                var = e.var_name
            ),
        }
    })
}
