//! Console configuration.
//!
//! | Env Var             | Default                 | Description                       |
//! |---------------------|-------------------------|-----------------------------------|
//! | `MARCHES_API_URL`   | `http://localhost:3000` | Base URL of the dashboard API     |
//! | `SUPABASE_URL`      | --                      | Hosted auth service               |
//! | `SUPABASE_ANON_KEY` | --                      | Public key of the auth service    |
//! | `MARCHES_EMAIL`     | --                      | Account used to sign in           |
//! | `MARCHES_PASSWORD`  | --                      | Password of that account          |

use marches_auth::BackendConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Clone)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub backend: BackendConfig,
    pub credentials: Option<Credentials>,
}

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Credentials are only set when both email and password are present.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let credentials = match (read("MARCHES_EMAIL"), lookup("MARCHES_PASSWORD")) {
            (Some(email), Some(password)) if !password.is_empty() => {
                Some(Credentials { email, password })
            }
            _ => None,
        };

        Self {
            api_url: read("MARCHES_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            backend: BackendConfig::from_lookup(&lookup),
            credentials,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<set>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ConsoleConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConsoleConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_to_local_api() {
        let cfg = config(&[]);
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert!(cfg.credentials.is_none());
        assert!(!cfg.backend.is_configured());
    }

    #[test]
    fn credentials_need_both_values() {
        assert!(config(&[("MARCHES_EMAIL", "a@ormvao.ma")]).credentials.is_none());

        let cfg = config(&[
            ("MARCHES_EMAIL", " a@ormvao.ma "),
            ("MARCHES_PASSWORD", "secret"),
            ("MARCHES_API_URL", "https://marches.ormvao.ma/"),
        ]);
        assert_eq!(cfg.credentials.unwrap().email, "a@ormvao.ma");
        assert_eq!(cfg.api_url, "https://marches.ormvao.ma");
    }
}
