//! A transparent single-connection TCP relay for STUN/TURN traffic.
//!
//! Every chunk relayed in either direction is also decoded as a STUN message.
//! The first XOR-PEER-ADDRESS found launches an external UDP demux tool for
//! that peer; the relayed bytes are never touched.

use std::sync::Arc;

use eyre::Result;

pub mod config;
pub mod gate;
pub mod launcher;
pub mod listener;
pub mod relay;
pub mod scanner;

pub use config::{Config, Endpoint};
pub use gate::{TriggerGate, DEMUX_LOCAL};
pub use launcher::{DemuxTool, Launcher};
pub use relay::{relay, RelayStats};

/// Accepts one client on the configured local endpoint and relays it to the
/// remote until the connection ends.
pub async fn run(config: Config) -> Result<()> {
	let listener = listener::bind(&config.local()).await?;
	let (client, _) = listener::accept_one(listener).await?;
	let gate = Arc::new(TriggerGate::new(DemuxTool::new(config.tool.clone())));
	relay(client, &config.remote(), gate).await?;
	Ok(())
}
