//! Source locations and logging configuration, resolved from the environment.

/// Tier document used when `DASHBOARD_TIERS` is unset.
pub const DEFAULT_TIERS_SOURCE: &str = "niveles.json";

/// Score exports used when `DASHBOARD_SOURCES` is unset.
pub const DEFAULT_SOURCES: &[&str] = &["Consolidado_2023-2024.csv", "Consolidado_2024-2025.csv"];

pub const DEFAULT_LOG_FILE_PATH: &str = "logs/score_dashboard.log";

/// Where to load from and where to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Path or URL of the tier document. Required at startup.
    pub tiers_source: String,
    /// Paths or URLs of the score exports. Each one is optional.
    pub sources: Vec<String>,
    pub log_file_path: String,
}

impl Settings {
    /// Reads `DASHBOARD_TIERS`, `DASHBOARD_SOURCES` and `LOG_FILE_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let sources = match get("DASHBOARD_SOURCES") {
            Some(list) => split_list(&list),
            None => DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
        };

        Self {
            tiers_source: get("DASHBOARD_TIERS")
                .unwrap_or_else(|| DEFAULT_TIERS_SOURCE.to_string()),
            sources,
            log_file_path: get("LOG_FILE_PATH")
                .unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
        }
    }
}

/// Splits a comma-separated list, dropping blank entries.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert_eq!(settings.tiers_source, "niveles.json");
        assert_eq!(
            settings.sources,
            vec!["Consolidado_2023-2024.csv", "Consolidado_2024-2025.csv"]
        );
        assert_eq!(settings.log_file_path, "logs/score_dashboard.log");
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("DASHBOARD_TIERS", "https://example.org/niveles.json"),
            ("DASHBOARD_SOURCES", " a.csv, ,b.csv "),
            ("LOG_FILE_PATH", "/tmp/dash.log"),
        ]));
        assert_eq!(settings.tiers_source, "https://example.org/niveles.json");
        assert_eq!(settings.sources, vec!["a.csv", "b.csv"]);
        assert_eq!(settings.log_file_path, "/tmp/dash.log");
    }

    #[test]
    fn test_blank_values_fall_back() {
        let settings = Settings::from_lookup(lookup(&[("DASHBOARD_TIERS", "  ")]));
        assert_eq!(settings.tiers_source, DEFAULT_TIERS_SOURCE);
    }
}
