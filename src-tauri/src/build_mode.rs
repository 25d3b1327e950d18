use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// Mode baked in at compile time: debug builds are development builds.
    pub(crate) fn compiled() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Some(Self::Development),
            "prod" | "production" | "release" => Some(Self::Production),
            _ => None,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::BuildMode;

    #[test]
    fn parse_accepts_long_and_short_names() {
        assert_eq!(BuildMode::parse("development"), Some(BuildMode::Development));
        assert_eq!(BuildMode::parse(" DEV "), Some(BuildMode::Development));
        assert_eq!(BuildMode::parse("Production"), Some(BuildMode::Production));
        assert_eq!(BuildMode::parse("release"), Some(BuildMode::Production));
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert_eq!(BuildMode::parse(""), None);
        assert_eq!(BuildMode::parse("staging"), None);
    }

    #[test]
    fn compiled_mode_follows_debug_assertions() {
        let expected = if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        };
        assert_eq!(BuildMode::compiled(), expected);
    }
}
