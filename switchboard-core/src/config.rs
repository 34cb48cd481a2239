// Server configuration

/// Port the listener binds when nothing else is configured
pub const DEFAULT_PORT: u16 = 8000;

/// Environment variable read for the listener port
pub const PORT_ENV_VAR: &str = "SWITCHBOARD_PORT";

/// Listener configuration for an event bus instance
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    /// Read the configuration from the environment.
    ///
    /// An unset or non-numeric port value falls back to [`DEFAULT_PORT`].
    pub fn from_env() -> Self {
        Self {
            port: parse_port(std::env::var(PORT_ENV_VAR).ok()),
        }
    }

    pub fn with_port(port: u16) -> Self {
        Self { port }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

fn parse_port(raw: Option<String>) -> u16 {
    raw.and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port_numeric() {
        assert_eq!(parse_port(Some("9090".to_string())), 9090);
    }

    #[test]
    fn test_parse_port_unset_defaults() {
        assert_eq!(parse_port(None), DEFAULT_PORT);
    }

    #[test]
    fn test_parse_port_non_numeric_defaults() {
        assert_eq!(parse_port(Some("eight thousand".to_string())), DEFAULT_PORT);
        assert_eq!(parse_port(Some("".to_string())), DEFAULT_PORT);
        assert_eq!(parse_port(Some("-1".to_string())), DEFAULT_PORT);
    }
}
