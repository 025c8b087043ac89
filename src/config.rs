use std::env;
use std::path::PathBuf;

use crate::ui::scaling::ScalePolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub window_title: String,
    pub window_width: f32,
    pub window_height: f32,
    pub scale_policy: ScalePolicy,
    pub assets_dir: PathBuf,
    pub scripting_enabled: bool,
    pub scripts_dir: Option<PathBuf>,
    pub vsync: bool,
}

impl Default for Config {
    fn default() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }
}

impl Config {
    /// Builds the config from any key lookup (environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let window_width = lookup("RAMLA_WINDOW_WIDTH")
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|v| *v > 0.0)
            .unwrap_or(1280.0);

        let window_height = lookup("RAMLA_WINDOW_HEIGHT")
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|v| *v > 0.0)
            .unwrap_or(720.0);

        let scale_policy = match lookup("RAMLA_SCALE_POLICY") {
            Some(name) => ScalePolicy::from_name(&name).unwrap_or_else(|| {
                log::warn!("Неизвестная политика масштабирования '{}', используем contain", name);
                ScalePolicy::Contain
            }),
            None => ScalePolicy::default(),
        };

        let assets_dir = lookup("RAMLA_ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("assets"));

        let scripting_enabled = lookup("RAMLA_SCRIPTING")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        let scripts_dir = lookup("RAMLA_SCRIPTS_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let vsync = lookup("RAMLA_VSYNC").map(|v| parse_flag(&v)).unwrap_or(true);

        Self {
            window_title: "Ramla Engine".to_string(),
            window_width,
            window_height,
            scale_policy,
            assets_dir,
            scripting_enabled,
            scripts_dir,
            vsync,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]);
        assert_eq!(config.window_title, "Ramla Engine");
        assert_eq!((config.window_width, config.window_height), (1280.0, 720.0));
        assert_eq!(config.scale_policy, ScalePolicy::Contain);
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
        assert!(config.scripting_enabled);
        assert!(config.scripts_dir.is_none());
        assert!(config.vsync);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("RAMLA_WINDOW_WIDTH", "800"),
            ("RAMLA_WINDOW_HEIGHT", "-5"),
            ("RAMLA_SCALE_POLICY", "cover"),
            ("RAMLA_SCRIPTING", "off"),
            ("RAMLA_SCRIPTS_DIR", "my_scripts"),
            ("RAMLA_VSYNC", "0"),
        ]);
        assert_eq!(config.window_width, 800.0);
        assert_eq!(config.window_height, 720.0);
        assert_eq!(config.scale_policy, ScalePolicy::Cover);
        assert!(!config.scripting_enabled);
        assert_eq!(config.scripts_dir, Some(PathBuf::from("my_scripts")));
        assert!(!config.vsync);
    }

    #[test]
    fn unknown_policy_falls_back_to_contain() {
        assert_eq!(
            config(&[("RAMLA_SCALE_POLICY", "stretch")]).scale_policy,
            ScalePolicy::Contain
        );
    }
}
