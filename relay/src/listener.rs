use std::net::SocketAddr;

use eyre::{Result, WrapErr};
use tokio::net::{TcpListener, TcpStream};
use tracing::info;

use crate::config::Endpoint;

pub async fn bind(local: &Endpoint) -> Result<TcpListener> {
	let listener = TcpListener::bind(local.as_tuple())
		.await
		.wrap_err_with(|| format!("binding {local}"))?;
	info!(addr = ?listener.local_addr().ok(), "listening");
	Ok(listener)
}

/// Takes a single connection. The listener is dropped afterwards, so later
/// connection attempts are refused.
pub async fn accept_one(listener: TcpListener) -> Result<(TcpStream, SocketAddr)> {
	let (stream, peer) = listener.accept().await.wrap_err("accepting client")?;
	info!(%peer, "accepted client");
	Ok((stream, peer))
}
