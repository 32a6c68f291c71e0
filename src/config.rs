use std::path::PathBuf;

use crate::auth::registry::DEFAULT_ADMIN_USER;

pub const DATA_PATH_ENV: &str = "MARKET_VIEWER_DATA";
pub const REGISTRY_PATH_ENV: &str = "MARKET_VIEWER_USERS";

const DEFAULT_DATA_PATH: &str = "mercados subsidiários.csv";
const DEFAULT_REGISTRY_PATH: &str = "usuarios.json";

/// Where the viewer reads its table and user registry from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub registry_path: PathBuf,
    /// Username that sees the user-management section.
    pub admin_user: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            registry_path: PathBuf::from(DEFAULT_REGISTRY_PATH),
            admin_user: DEFAULT_ADMIN_USER.to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, overridden by environment variables, overridden by the first
    /// positional argument (data path). Empty values are ignored.
    pub fn from_env_and_args<F, I>(env: F, args: I) -> Self
    where
        F: Fn(&str) -> Option<String>,
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let non_empty = |v: String| (!v.trim().is_empty()).then(|| PathBuf::from(v));

        if let Some(p) = env(DATA_PATH_ENV).and_then(non_empty) {
            config.data_path = p;
        }
        if let Some(p) = env(REGISTRY_PATH_ENV).and_then(non_empty) {
            config.registry_path = p;
        }
        if let Some(p) = args.into_iter().next().and_then(non_empty) {
            config.data_path = p;
        }
        config
    }

    /// Read the real process environment and command line.
    pub fn from_process() -> Self {
        Self::from_env_and_args(|k| std::env::var(k).ok(), std::env::args().skip(1))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let c = AppConfig::from_env_and_args(env(&[]), Vec::new());
        assert_eq!(c, AppConfig::default());
        assert_eq!(c.admin_user, "admin");
    }

    #[test]
    fn argument_beats_environment() {
        let c = AppConfig::from_env_and_args(
            env(&[(DATA_PATH_ENV, "env.csv"), (REGISTRY_PATH_ENV, "users.json")]),
            vec!["arg.csv".to_string()],
        );
        assert_eq!(c.data_path, PathBuf::from("arg.csv"));
        assert_eq!(c.registry_path, PathBuf::from("users.json"));
    }

    #[test]
    fn empty_values_are_ignored() {
        let c = AppConfig::from_env_and_args(env(&[(DATA_PATH_ENV, " ")]), vec![String::new()]);
        assert_eq!(c.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    }
}
