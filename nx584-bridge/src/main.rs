mod cli;
mod logging;
mod mqtt;
mod serial;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use clap::Parser;
use nx584_proto::controller::{Controller, ControllerConfig};
use nx584_proto::framer::Framer;
use slog::{error, info, o, Logger};

use cli::Cli;
use mqtt::{MqttConfig, MqttSink};
use serial::SerialTransport;

/// Number of panel partitions the bridge subscribes command topics for.
/// The NX-584 family supports up to 8.
const MAX_PARTITIONS: u8 = 8;

fn main() {
    let cli = Cli::parse();
    let log = logging::init(&cli.log_level);

    if let Err(e) = run(cli, &log) {
        error!(log, "bridge exited with an error"; "error" => %e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, log: &Logger) -> anyhow::Result<()> {
    let device = cli
        .device
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("--device path must be valid UTF-8"))?;
    let transport = SerialTransport::open(device, cli.baud)?;
    let mut framer = Framer::new(transport, log.new(o!("component" => "framer")));

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || shutdown.store(true, Ordering::SeqCst))?;
    }

    let (intent_tx, intent_rx) = mpsc::channel();

    let mqtt_config = MqttConfig {
        broker_host: cli.broker_host.clone(),
        broker_port: cli.broker_port,
        broker_username: cli.broker_username.clone(),
        broker_password: cli.broker_password.clone(),
        topic_root: cli.topic_root.clone(),
        panel_id: cli.panel_id.clone(),
    };
    let mut sink = MqttSink::connect(mqtt_config, intent_tx, MAX_PARTITIONS, log.new(o!("component" => "mqtt")));

    let ignore_zones: HashSet<u16> = cli.ignore_zone.iter().copied().collect();
    let controller_config = ControllerConfig {
        zone_count: cli.zone_count,
        ignore_zones,
        default_pin: cli.default_pin,
        default_user_number: cli.default_user_number,
        republish_interval: Duration::from_secs(cli.republish_interval_secs),
        zone_publish_pacing: Some(Duration::from_secs(1)),
    };
    let mut controller = Controller::new(controller_config, log.new(o!("component" => "controller")));

    info!(log, "starting nx584 bridge";
        "device" => device, "panel_id" => &cli.panel_id, "baud" => cli.baud);

    controller.run(&mut framer, &mut sink, &intent_rx, &shutdown)?;

    info!(log, "shutdown complete");
    Ok(())
}
