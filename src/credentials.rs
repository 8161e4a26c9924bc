//! Registry credential resolution.
//!
//! Credentials come from, in order: explicit CLI arguments, the GitHub
//! Actions / user environment, and finally an interactive hidden prompt for
//! the token. Nothing is ever stored.

use dialoguer::Password;
use tracing::debug;

use crate::error::CredentialsError;

/// Organization used when no user is supplied anywhere.
pub const DEFAULT_ORGANIZATION: &str = "Zernikalos";

/// Credentials for the package registries (GitHub Packages).
#[derive(Debug, Clone)]
pub struct RegistryCredentials {
    pub user: String,
    pub token: String,
}

/// Resolve credentials from CLI arguments and the environment.
///
/// `user` falls back to `GITHUB_ACTOR`, then `GITHUB_USER`, then the default
/// organization. `token` falls back to `GITHUB_TOKEN`; when still absent and
/// `interactive` is set, the token is read from a hidden prompt. An empty
/// prompted token is an error.
pub fn resolve_credentials(
    arg_user: Option<&str>,
    arg_token: Option<&str>,
    interactive: bool,
) -> Result<RegistryCredentials, CredentialsError> {
    let user = arg_user
        .map(str::to_string)
        .or_else(|| std::env::var("GITHUB_ACTOR").ok().filter(|v| !v.is_empty()))
        .or_else(|| std::env::var("GITHUB_USER").ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| {
            debug!("No user supplied, using default organization");
            DEFAULT_ORGANIZATION.to_string()
        });

    let token = match arg_token
        .map(str::to_string)
        .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|v| !v.is_empty()))
    {
        Some(token) => token,
        None if interactive => prompt_for_token(&user)?,
        None => return Err(CredentialsError::TokenMissing),
    };

    Ok(RegistryCredentials { user, token })
}

/// Whether a token is present in the environment, without resolving it.
/// Used by the status report, which must never prompt.
pub fn token_in_env() -> bool {
    std::env::var("GITHUB_TOKEN").is_ok_and(|v| !v.is_empty())
}

fn prompt_for_token(user: &str) -> Result<String, CredentialsError> {
    println!("Registry credentials required (organization: {user})");

    let token = Password::new()
        .with_prompt("Enter GitHub access token")
        .allow_empty_password(true)
        .interact()
        .map_err(CredentialsError::PromptFailed)?;

    if token.is_empty() {
        return Err(CredentialsError::TokenMissing);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV_VARS: [&str; 3] = ["GITHUB_ACTOR", "GITHUB_USER", "GITHUB_TOKEN"];

    #[test]
    fn test_args_take_precedence() {
        temp_env::with_vars(
            [
                ("GITHUB_ACTOR", Some("env-actor")),
                ("GITHUB_TOKEN", Some("env-token")),
            ],
            || {
                let creds =
                    resolve_credentials(Some("arg-user"), Some("arg-token"), false).unwrap();
                assert_eq!(creds.user, "arg-user");
                assert_eq!(creds.token, "arg-token");
            },
        );
    }

    #[test]
    fn test_env_fallback() {
        temp_env::with_vars(
            [
                ("GITHUB_ACTOR", Some("env-actor")),
                ("GITHUB_USER", None),
                ("GITHUB_TOKEN", Some("env-token")),
            ],
            || {
                let creds = resolve_credentials(None, None, false).unwrap();
                assert_eq!(creds.user, "env-actor");
                assert_eq!(creds.token, "env-token");
            },
        );
    }

    #[test]
    fn test_github_user_after_actor() {
        temp_env::with_vars(
            [
                ("GITHUB_ACTOR", None),
                ("GITHUB_USER", Some("env-user")),
                ("GITHUB_TOKEN", Some("env-token")),
            ],
            || {
                let creds = resolve_credentials(None, None, false).unwrap();
                assert_eq!(creds.user, "env-user");
            },
        );
    }

    #[test]
    fn test_default_organization() {
        temp_env::with_vars(ENV_VARS.map(|k| (k, None::<&str>)), || {
            let creds = resolve_credentials(None, Some("t"), false).unwrap();
            assert_eq!(creds.user, DEFAULT_ORGANIZATION);
        });
    }

    #[test]
    fn test_missing_token_non_interactive() {
        temp_env::with_vars(ENV_VARS.map(|k| (k, None::<&str>)), || {
            let result = resolve_credentials(None, None, false);
            assert!(matches!(result, Err(CredentialsError::TokenMissing)));
        });
    }

    #[test]
    fn test_empty_env_token_treated_as_missing() {
        temp_env::with_vars(
            [
                ("GITHUB_ACTOR", None),
                ("GITHUB_USER", None),
                ("GITHUB_TOKEN", Some("")),
            ],
            || {
                let result = resolve_credentials(None, None, false);
                assert!(matches!(result, Err(CredentialsError::TokenMissing)));
            },
        );
    }

    #[test]
    fn test_token_in_env() {
        temp_env::with_var("GITHUB_TOKEN", Some("abc"), || {
            assert!(token_in_env());
        });
        temp_env::with_var("GITHUB_TOKEN", None::<&str>, || {
            assert!(!token_in_env());
        });
    }
}
