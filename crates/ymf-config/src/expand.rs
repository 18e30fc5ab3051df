//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.
//!
//! Bare `$VAR` is left as written.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// `field` names the config key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Name of a variable that could not be resolved.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("YMF_EXPAND_PREFIX", "doc-");
        }
        assert_eq!(
            expand_env("${YMF_EXPAND_PREFIX}", "render.style_prefix").unwrap(),
            "doc-"
        );
        unsafe {
            std::env::remove_var("YMF_EXPAND_PREFIX");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("YMF_EXPAND_UNSET");
        }
        assert_eq!(
            expand_env("${YMF_EXPAND_UNSET:-jshAppBase}", "render.app_base_var_name").unwrap(),
            "jshAppBase"
        );
    }

    #[test]
    fn test_expand_value_wins_over_default() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("YMF_EXPAND_APP", "portal");
        }
        assert_eq!(
            expand_env("${YMF_EXPAND_APP:-jshAppBase}", "render.app_base_var_name").unwrap(),
            "portal"
        );
        unsafe {
            std::env::remove_var("YMF_EXPAND_APP");
        }
    }

    #[test]
    fn test_expand_embedded() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("YMF_EXPAND_TEAM", "ops");
        }
        assert_eq!(
            expand_env("${YMF_EXPAND_TEAM}-", "render.style_prefix").unwrap(),
            "ops-"
        );
        unsafe {
            std::env::remove_var("YMF_EXPAND_TEAM");
        }
    }

    #[test]
    fn test_expand_missing_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("YMF_EXPAND_MISSING");
        }
        let err = expand_env("${YMF_EXPAND_MISSING}", "render.style_prefix").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("YMF_EXPAND_MISSING"));
        assert!(message.contains("render.style_prefix"));
    }

    #[test]
    fn test_literal_and_bare_dollar_unchanged() {
        assert_eq!(expand_env("jsh-", "f").unwrap(), "jsh-");
        assert_eq!(expand_env("$HOME", "f").unwrap(), "$HOME");
    }
}
