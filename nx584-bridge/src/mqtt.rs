use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use nx584_proto::controller::{Intent, Sink};
use nx584_proto::entity::{Partition, PartitionState, Zone};
use rumqttc::{Client, Event, LastWill, MqttOptions, Packet, Publish, QoS};
use serde_json::json;
use slog::{error, o, warn, Logger};

pub struct MqttConfig {
    pub broker_host: String,
    pub broker_port: u16,
    pub broker_username: Option<String>,
    pub broker_password: Option<String>,
    pub topic_root: String,
    pub panel_id: String,
}

/// Publishes zone/partition state as Home Assistant MQTT discovery
/// entities and forwards inbound arm/disarm commands into an [`Intent`]
/// channel the controller drains on its own thread.
pub struct MqttSink {
    client: Client,
    topic_root: String,
    panel_id: String,
    log: Logger,
}

impl MqttSink {
    pub fn connect(config: MqttConfig, intents: Sender<Intent>, partition_count: u8, log: Logger) -> MqttSink {
        let client_id = format!("nx584-bridge-{}", sanitize(&config.panel_id));
        let mut options = MqttOptions::new(client_id, config.broker_host.clone(), config.broker_port);
        options.set_keep_alive(Duration::from_secs(30));
        if let (Some(username), Some(password)) = (&config.broker_username, &config.broker_password) {
            options.set_credentials(username.clone(), password.clone());
        }
        let availability = availability_topic(&config.topic_root, &config.panel_id);
        options.set_last_will(LastWill::new(availability, b"offline".to_vec(), QoS::AtLeastOnce, true));

        let (client, mut connection) = Client::new(options, 64);

        for partition in 1..=partition_count {
            let topic = command_topic(&config.topic_root, &config.panel_id, partition);
            if let Err(e) = client.subscribe(topic.as_str(), QoS::AtLeastOnce) {
                error!(log, "failed to subscribe to command topic"; "topic" => topic, "error" => %e);
            }
        }

        let event_log = log.new(o!("component" => "mqtt-event-loop"));
        thread::spawn(move || {
            for notification in connection.iter() {
                match notification {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        handle_command(&publish, &intents, &event_log);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(event_log, "mqtt connection error"; "error" => %e);
                    }
                }
            }
        });

        MqttSink {
            client,
            topic_root: config.topic_root,
            panel_id: config.panel_id,
            log,
        }
    }

    fn publish_retained(&mut self, topic: &str, payload: &str) {
        if let Err(e) = self.client.publish(topic.to_string(), QoS::AtLeastOnce, true, payload.as_bytes().to_vec()) {
            error!(self.log, "mqtt publish failed"; "topic" => topic, "error" => %e);
        }
    }
}

impl Sink for MqttSink {
    fn publish_online(&mut self) {
        let topic = availability_topic(&self.topic_root, &self.panel_id);
        self.publish_retained(&topic, "online");
    }

    fn publish_offline(&mut self) {
        let topic = availability_topic(&self.topic_root, &self.panel_id);
        self.publish_retained(&topic, "offline");
    }

    fn publish_zone_config(&mut self, zone: &Zone) {
        let base = zone_base(&self.topic_root, &self.panel_id, zone.server_index());
        let payload = json!({
            "name": zone.name(),
            "unique_id": format!("{}_zone_{}", sanitize(&self.panel_id), zone.server_index()),
            "state_topic": format!("{}/state", base),
            "availability_topic": availability_topic(&self.topic_root, &self.panel_id),
            "payload_on": "ON",
            "payload_off": "OFF",
            "device_class": if zone.is_fire() { "smoke" } else { "motion" },
        });
        let topic = format!("{}/config", base);
        self.publish_retained(&topic, &payload.to_string());
    }

    fn publish_partition_config(&mut self, partition: &Partition) {
        let base = partition_base(&self.topic_root, &self.panel_id, partition.index());
        let payload = json!({
            "name": format!("Partition {}", partition.index()),
            "unique_id": format!("{}_partition_{}", sanitize(&self.panel_id), partition.index()),
            "state_topic": format!("{}/state", base),
            "command_topic": format!("{}/set", base),
            "availability_topic": availability_topic(&self.topic_root, &self.panel_id),
        });
        let topic = format!("{}/config", base);
        self.publish_retained(&topic, &payload.to_string());
    }

    fn publish_zone_state(&mut self, zone: &Zone) {
        let topic = format!("{}/state", zone_base(&self.topic_root, &self.panel_id, zone.server_index()));
        let state = if zone.faulted() { "ON" } else { "OFF" };
        self.publish_retained(&topic, state);
    }

    fn publish_partition_state(&mut self, partition: &Partition) {
        let topic = format!("{}/state", partition_base(&self.topic_root, &self.panel_id, partition.index()));
        self.publish_retained(&topic, partition_state_label(partition.state()));
    }
}

fn partition_state_label(state: PartitionState) -> &'static str {
    match state {
        PartitionState::Disarmed => "disarmed",
        PartitionState::ArmedHome => "armed_home",
        PartitionState::ArmedAway => "armed_away",
        PartitionState::Pending => "pending",
        PartitionState::Triggered => "triggered",
        PartitionState::Arming => "arming",
        PartitionState::Disarming => "disarming",
        PartitionState::Unknown => "unavailable",
    }
}

fn handle_command(publish: &Publish, intents: &Sender<Intent>, log: &Logger) {
    let partition = match extract_partition(&publish.topic) {
        Some(p) => p,
        None => return,
    };

    let payload = String::from_utf8_lossy(&publish.payload);
    let intent = match payload.to_ascii_uppercase().as_str() {
        "DISARM" => Intent::Disarm { partition },
        "ARM_HOME" | "ARM_STAY" => Intent::ArmHome { partition },
        "ARM_AWAY" => Intent::ArmAway { partition },
        other => {
            warn!(log, "ignoring unrecognized command payload"; "payload" => other.to_string());
            return;
        }
    };

    if intents.send(intent).is_err() {
        warn!(log, "controller intent channel closed, dropping command");
    }
}

fn extract_partition(topic: &str) -> Option<u8> {
    topic.split('/').find_map(|segment| segment.strip_prefix("partition_")).and_then(|n| n.parse().ok())
}

/// Home Assistant MQTT discovery identifiers only allow a restricted
/// character set; anything else is mapped to `_`.
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

fn availability_topic(topic_root: &str, panel_id: &str) -> String {
    format!("{}/alarm_control_panel/{}/availability", topic_root, sanitize(panel_id))
}

fn partition_base(topic_root: &str, panel_id: &str, partition: u8) -> String {
    format!("{}/alarm_control_panel/{}/partition_{}", topic_root, sanitize(panel_id), partition)
}

fn command_topic(topic_root: &str, panel_id: &str, partition: u8) -> String {
    format!("{}/set", partition_base(topic_root, panel_id, partition))
}

fn zone_base(topic_root: &str, panel_id: &str, zone: u16) -> String {
    format!("{}/binary_sensor/{}/zone_{:03}", topic_root, sanitize(panel_id), zone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_non_identifier_characters() {
        assert_eq!(sanitize("front door!"), "front_door_");
        assert_eq!(sanitize("panel-1"), "panel-1");
    }

    #[test]
    fn extract_partition_reads_the_segment_after_the_prefix() {
        assert_eq!(extract_partition("homeassistant/alarm_control_panel/p1/partition_3/set"), Some(3));
        assert_eq!(extract_partition("homeassistant/binary_sensor/p1/zone_001/state"), None);
    }

    #[test]
    fn partition_state_labels_match_home_assistant_alarm_panel_states() {
        assert_eq!(partition_state_label(PartitionState::Disarmed), "disarmed");
        assert_eq!(partition_state_label(PartitionState::ArmedAway), "armed_away");
        assert_eq!(partition_state_label(PartitionState::Triggered), "triggered");
    }
}
