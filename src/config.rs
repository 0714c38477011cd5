use anyhow::Result;

/// Environment variable holding the Discogs personal access token.
pub const DISCOGS_API_KEY_VAR: &str = "DISCOGS_API_KEY";
/// Environment variable holding the Pushover application token.
pub const PUSHOVER_TOKEN_VAR: &str = "PUSHOVER_TOKEN";
/// Environment variable holding the Pushover user key.
pub const PUSHOVER_USER_VAR: &str = "PUSHOVER_USER";

/// Credentials for the two external services, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub discogs_api_key: String,
    pub pushover_token: String,
    pub pushover_user: String,
}

impl Credentials {
    /// Load credentials from the process environment.
    ///
    /// Fails with a single error naming every missing variable, comma-joined
    /// in declaration order. Empty values count as missing.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing: Vec<&str> = Vec::new();
        let mut require = |name: &'static str| -> String {
            match lookup(name) {
                Some(value) if !value.is_empty() => value,
                _ => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let discogs_api_key = require(DISCOGS_API_KEY_VAR);
        let pushover_token = require(PUSHOVER_TOKEN_VAR);
        let pushover_user = require(PUSHOVER_USER_VAR);

        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }

        Ok(Self {
            discogs_api_key,
            pushover_token,
            pushover_user,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn load(vars: &[(&str, &str)]) -> Result<Credentials> {
        let map = env(vars);
        Credentials::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn loads_all_three() {
        let creds = load(&[
            (DISCOGS_API_KEY_VAR, "dg-key"),
            (PUSHOVER_TOKEN_VAR, "po-token"),
            (PUSHOVER_USER_VAR, "po-user"),
        ])
        .expect("all variables set");
        assert_eq!(creds.discogs_api_key, "dg-key");
        assert_eq!(creds.pushover_token, "po-token");
        assert_eq!(creds.pushover_user, "po-user");
    }

    #[test]
    fn missing_one_names_it() {
        let err = load(&[
            (DISCOGS_API_KEY_VAR, "dg-key"),
            (PUSHOVER_USER_VAR, "po-user"),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: PUSHOVER_TOKEN"
        );
    }

    #[test]
    fn missing_all_names_all_in_order() {
        let err = load(&[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: \
             DISCOGS_API_KEY, PUSHOVER_TOKEN, PUSHOVER_USER"
        );
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let err = load(&[
            (DISCOGS_API_KEY_VAR, ""),
            (PUSHOVER_TOKEN_VAR, "po-token"),
            (PUSHOVER_USER_VAR, "po-user"),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: DISCOGS_API_KEY"
        );
    }
}
