use std::env;

const DEFAULT_BROKER_HOST: &str = "test.mosquitto.org";
const DEFAULT_BROKER_PORT: u16 = 1883;
const DEFAULT_TOPIC_ROOT: &str = "V/#";

/// Broker connection settings for the transport adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub broker_host: String,
    pub broker_port: u16,
    /// Wildcard subscription pattern, e.g. `V/#`.
    pub topic_root: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            broker_host: DEFAULT_BROKER_HOST.to_owned(),
            broker_port: DEFAULT_BROKER_PORT,
            topic_root: DEFAULT_TOPIC_ROOT.to_owned(),
        }
    }
}

impl IngestConfig {
    /// Read settings from `MQTT_BROKER_URL`, `MQTT_BROKER_PORT`, and
    /// `MQTT_TOPIC_ROOT`, falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("MQTT_BROKER_URL").ok().as_deref(),
            env::var("MQTT_BROKER_PORT").ok().as_deref(),
            env::var("MQTT_TOPIC_ROOT").ok().as_deref(),
        )
    }

    /// Blank values fall back to the defaults. An unparsable port keeps the
    /// default with a warning rather than refusing to start.
    fn from_values(host: Option<&str>, port: Option<&str>, root: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(host) = non_blank(host) {
            config.broker_host = host.to_owned();
        }
        if let Some(port) = non_blank(port) {
            match port.parse::<u16>() {
                Ok(parsed) => config.broker_port = parsed,
                Err(_) => log::warn!(
                    "Ignoring unparsable MQTT_BROKER_PORT {port:?}, using {}",
                    config.broker_port
                ),
            }
        }
        if let Some(root) = non_blank(root) {
            config.topic_root = root.to_owned();
        }
        config
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_expected_broker() {
        let config = IngestConfig::from_values(None, None, None);
        assert_eq!(config.broker_host, "test.mosquitto.org");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.topic_root, "V/#");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = IngestConfig::from_values(
            Some("broker.local"),
            Some(" 8883 "),
            Some("sensors/#"),
        );
        assert_eq!(config.broker_host, "broker.local");
        assert_eq!(config.broker_port, 8883);
        assert_eq!(config.topic_root, "sensors/#");
    }

    #[test]
    fn blank_or_unparsable_values_fall_back() {
        let config = IngestConfig::from_values(Some("   "), Some("not-a-port"), Some(""));
        assert_eq!(config, IngestConfig::default());
        let config = IngestConfig::from_values(None, Some("99999"), None);
        assert_eq!(config.broker_port, 1883);
    }
}
