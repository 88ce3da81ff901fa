use std::sync::{
	atomic::{AtomicU64, Ordering},
	Arc,
};

use eyre::{Result, WrapErr};
use tokio::{
	io::{AsyncReadExt, AsyncWriteExt},
	net::{
		tcp::{OwnedReadHalf, OwnedWriteHalf},
		TcpStream,
	},
};
use tracing::{debug, info};

use crate::{config::Endpoint, gate::TriggerGate, launcher::Launcher, scanner::sniff};

/// Size of the read buffer each direction keeps for the whole connection.
pub const CHUNK: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
	/// Client to remote.
	pub upstream: u64,
	/// Remote to client.
	pub downstream: u64,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
	Upstream,
	Downstream,
}

/// Copies `from` into `to` until `from` closes, showing every chunk to the
/// scanner after it has been forwarded. `count` tracks the bytes written.
async fn pump<L: Launcher>(
	dir: Direction,
	mut from: OwnedReadHalf,
	mut to: OwnedWriteHalf,
	gate: Arc<TriggerGate<L>>,
	count: Arc<AtomicU64>,
) -> Result<()> {
	let mut buff = vec![0u8; CHUNK];
	loop {
		let len = from.read(&mut buff).await.wrap_err_with(|| format!("{dir:?} read"))?;
		if len == 0 {
			debug!(?dir, total = count.load(Ordering::Relaxed), "closed");
			// Pass the close along so the other side sees EOF too.
			to.shutdown().await.wrap_err_with(|| format!("{dir:?} shutdown"))?;
			return Ok(());
		}
		let chunk = &buff[..len];
		to.write_all(chunk).await.wrap_err_with(|| format!("{dir:?} write"))?;
		count.fetch_add(len as u64, Ordering::Relaxed);

		sniff(chunk, &gate);
	}
}

/// Relays `client` to a fresh connection to `remote`. The relay ends as soon
/// as either direction stops, whether its side closed or an I/O error hit it;
/// the other direction is aborted.
pub async fn relay<L: Launcher>(
	client: TcpStream,
	remote: &Endpoint,
	gate: Arc<TriggerGate<L>>,
) -> Result<RelayStats> {
	let server = TcpStream::connect(remote.as_tuple())
		.await
		.wrap_err_with(|| format!("connecting to {remote}"))?;
	info!(%remote, local = ?server.local_addr().ok(), "connected upstream");

	let (client_rx, client_tx) = client.into_split();
	let (server_rx, server_tx) = server.into_split();
	let up = Arc::new(AtomicU64::new(0));
	let down = Arc::new(AtomicU64::new(0));

	let mut upstream = tokio::spawn(pump(Direction::Upstream, client_rx, server_tx, gate.clone(), up.clone()));
	let mut downstream = tokio::spawn(pump(Direction::Downstream, server_rx, client_tx, gate, down.clone()));

	let (res, other) = tokio::select! {
		res = &mut upstream => (res, downstream),
		res = &mut downstream => (res, upstream),
	};
	other.abort();
	// Wait for the aborted side so both sockets are gone once we return.
	let _ = other.await;

	let stats = RelayStats {
		upstream: up.load(Ordering::Relaxed),
		downstream: down.load(Ordering::Relaxed),
	};
	res??;

	info!(upstream = stats.upstream, downstream = stats.downstream, "relay finished");
	Ok(stats)
}
