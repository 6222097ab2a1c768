//! Window and renderer settings for a demo application

/// Application settings
///
/// Built in code with the `with_*` methods; [`AppConfig::with_env`] lets
/// `CUBIST_VSYNC` and `CUBIST_STATS` override the defaults at launch.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Show the frame statistics overlay
    pub show_stats: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "cubist".to_string(),
            width: 1200,
            height: 800,
            vsync: true,
            show_stats: true,
        }
    }
}

impl AppConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_stats(mut self, show_stats: bool) -> Self {
        self.show_stats = show_stats;
        self
    }

    /// Default settings with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Applies overrides from the process environment
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup; unparsable values are ignored
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        for (key, target) in [
            ("CUBIST_VSYNC", &mut self.vsync),
            ("CUBIST_STATS", &mut self.show_stats),
        ] {
            let Some(raw) = lookup(key) else {
                continue;
            };
            match parse_flag(&raw) {
                Some(value) => *target = value,
                None => log::warn!("Ignoring {}={:?}: expected a boolean", key, raw),
            }
        }
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = AppConfig::new("Blob").with_size(800, 600).with_vsync(false);
        assert_eq!(config.title, "Blob");
        assert_eq!((config.width, config.height), (800, 600));
        assert!(!config.vsync);
        assert!(config.show_stats);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default().with_overrides(|key| match key {
            "CUBIST_VSYNC" => Some("off".to_string()),
            "CUBIST_STATS" => Some("maybe".to_string()),
            _ => None,
        });
        assert!(!config.vsync);
        assert!(config.show_stats);
    }
}
