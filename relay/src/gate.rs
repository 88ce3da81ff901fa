use std::{
	net::{Ipv4Addr, SocketAddrV4},
	sync::atomic::{AtomicBool, Ordering},
};

use tracing::info;

use crate::launcher::Launcher;

/// Where the demux tool is told to bind.
pub const DEMUX_LOCAL: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::LOCALHOST, 6001);

/// Launches the demux tool for the first peer address offered and ignores
/// every later one, whichever relay direction it comes from.
pub struct TriggerGate<L> {
	fired: AtomicBool,
	launcher: L,
}
impl<L: Launcher> TriggerGate<L> {
	pub fn new(launcher: L) -> Self {
		Self { fired: AtomicBool::new(false), launcher }
	}
	/// Returns true if this call launched the tool.
	pub fn offer(&self, peer: SocketAddrV4) -> bool {
		if self.fired.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
			return false;
		}
		info!(%peer, "peer address");
		info!(tool = self.launcher.name(), "launching demux tool");
		self.launcher.launch(peer, DEMUX_LOCAL);
		true
	}
	pub fn has_fired(&self) -> bool {
		self.fired.load(Ordering::Acquire)
	}
	pub fn launcher(&self) -> &L {
		&self.launcher
	}
}
