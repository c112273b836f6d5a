//! Protocol engine for the Caddx/NetworX NX-584 alarm panel serial
//! interface: framing, the message catalog, the zone/partition entity
//! model, the command queue, and the controller that ties them together.
//!
//! This crate has no knowledge of MQTT, CLI flags or process signals —
//! that ambient machinery lives in the `nx584-bridge` binary crate, which
//! implements [`transport::Transport`] over a real serial port and
//! [`controller::Sink`] over an MQTT client.

pub mod catalog;
pub mod controller;
pub mod entity;
pub mod error;
pub mod framer;
pub mod queue;
pub mod transport;

pub use controller::{Controller, ControllerConfig, Intent, Sink};
pub use entity::{Partition, PartitionState, Zone};
pub use error::{ControllerError, FramingError, ProtocolError};
pub use framer::Framer;
pub use transport::Transport;
