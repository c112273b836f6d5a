use std::path::PathBuf;

use clap::Parser;

/// Bridges an NX-584 alarm panel's serial interface to an MQTT broker,
/// publishing zone and partition state with Home Assistant MQTT discovery
/// and accepting arm/disarm commands.
#[derive(Debug, Parser)]
#[command(name = "nx584-bridge", version, about)]
pub struct Cli {
    /// Path to the serial device the panel is attached to.
    #[arg(long, env = "NX584_DEVICE")]
    pub device: PathBuf,

    /// Identifier used in MQTT topics and discovery unique IDs for this panel.
    #[arg(long, env = "NX584_PANEL_ID")]
    pub panel_id: String,

    #[arg(long, env = "NX584_BAUD", default_value_t = 38400)]
    pub baud: u32,

    #[arg(long, env = "NX584_ZONE_COUNT", default_value_t = 48)]
    pub zone_count: u16,

    /// Server zone indices to skip during synchronization and transition
    /// dispatch. May be repeated.
    #[arg(long = "ignore-zone", env = "NX584_IGNORE_ZONES", value_delimiter = ',')]
    pub ignore_zone: Vec<u16>,

    #[arg(long, env = "NX584_BROKER_HOST", default_value = "localhost")]
    pub broker_host: String,

    #[arg(long, env = "NX584_BROKER_PORT", default_value_t = 1883)]
    pub broker_port: u16,

    #[arg(long, env = "NX584_BROKER_USERNAME")]
    pub broker_username: Option<String>,

    #[arg(long, env = "NX584_BROKER_PASSWORD")]
    pub broker_password: Option<String>,

    /// Root prefix for Home Assistant MQTT discovery topics.
    #[arg(long, env = "NX584_TOPIC_ROOT", default_value = "homeassistant")]
    pub topic_root: String,

    /// Default PIN used to authenticate arm/disarm requests, when the
    /// panel was configured to require one.
    #[arg(long, env = "NX584_DEFAULT_PIN")]
    pub default_pin: Option<String>,

    /// Default user number used to authenticate arm/disarm requests when
    /// no PIN is configured.
    #[arg(long, env = "NX584_DEFAULT_USER_NUMBER")]
    pub default_user_number: Option<u8>,

    #[arg(long, env = "NX584_REPUBLISH_INTERVAL_SECS", default_value_t = 3600)]
    pub republish_interval_secs: u64,

    #[arg(long, env = "NX584_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
