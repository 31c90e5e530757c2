/// Credentials of the hosted backend.
///
/// The URL and anonymous key are the two public values; without both the
/// whole client is unconfigured. The service-role key is server-only and
/// only needed for user administration.
#[derive(Clone, Default)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub service_role_key: Option<String>,
    /// HS256 secret used to verify access tokens locally.
    pub jwt_secret: Option<String>,
}

impl BackendConfig {
    /// Load from environment variables. Empty values count as absent.
    ///
    /// | Env Var                     | Required for              |
    /// |-----------------------------|---------------------------|
    /// | `SUPABASE_URL`              | everything                |
    /// | `SUPABASE_ANON_KEY`         | everything                |
    /// | `SUPABASE_SERVICE_ROLE_KEY` | user administration       |
    /// | `SUPABASE_JWT_SECRET`       | bearer token verification |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            url: read("SUPABASE_URL").map(|u| u.trim_end_matches('/').to_string()),
            anon_key: read("SUPABASE_ANON_KEY"),
            service_role_key: read("SUPABASE_SERVICE_ROLE_KEY"),
            jwt_secret: read("SUPABASE_JWT_SECRET"),
        }
    }

    /// Both public values are present.
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.anon_key.is_some()
    }

    /// User administration is possible.
    pub fn has_admin(&self) -> bool {
        self.url.is_some() && self.service_role_key.is_some()
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "<set>"))
            .field("service_role_key", &self.service_role_key.as_ref().map(|_| "<set>"))
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<set>"))
            .finish()
    }
}
