use std::{net::SocketAddrV4, process::Stdio};

use tokio::process::Command;
use tracing::{debug, warn};

pub trait Launcher: Send + Sync + 'static {
	/// Starts the demux for `peer`, bound locally on `local`. Must not block.
	fn launch(&self, peer: SocketAddrV4, local: SocketAddrV4);

	fn name(&self) -> &str;
}

/// Runs the external UDP demux tool as
/// `<path> -H <peer ip> -P <peer port> -h <local ip> -p <local port>`.
#[derive(Debug, Clone)]
pub struct DemuxTool {
	path: String,
}
impl DemuxTool {
	pub fn new(path: impl Into<String>) -> Self {
		Self { path: path.into() }
	}
	pub fn command(&self, peer: SocketAddrV4, local: SocketAddrV4) -> Command {
		let mut cmd = Command::new(&self.path);
		cmd.arg("-H").arg(peer.ip().to_string())
			.arg("-P").arg(peer.port().to_string())
			.arg("-h").arg(local.ip().to_string())
			.arg("-p").arg(local.port().to_string())
			.stdin(Stdio::null())
			.stdout(Stdio::inherit())
			.stderr(Stdio::inherit());
		cmd
	}
}
impl Launcher for DemuxTool {
	fn launch(&self, peer: SocketAddrV4, local: SocketAddrV4) {
		let mut cmd = self.command(peer, local);
		let tool = self.path.clone();
		// Spawn and reap off the caller's task; the relay never looks at the result.
		tokio::spawn(async move {
			match cmd.spawn() {
				Ok(mut child) => {
					let pid = child.id();
					let _ = child.wait().await;
					debug!(?pid, "demux tool exited");
				}
				Err(e) => warn!(%tool, error = %e, "failed to launch demux tool"),
			}
		});
	}
	fn name(&self) -> &str {
		&self.path
	}
}
