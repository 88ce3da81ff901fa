use std::net::SocketAddrV4;

use stun::{
	attr::{xor_addr_v4, XOR_PEER_ADDRESS},
	Stun, MAGIC_COOKIE,
};
use tracing::{debug, trace};

use crate::{gate::TriggerGate, launcher::Launcher};

/// Peer addresses carried by the STUN message at the start of `buf`. Anything
/// that doesn't decode as STUN yields nothing; that is the usual case.
pub fn peer_addrs(buf: &[u8]) -> Vec<SocketAddrV4> {
	let msg = match Stun::decode(buf) {
		Ok(m) => m,
		Err(e) => {
			trace!(len = buf.len(), error = ?e, "not a STUN message");
			return Vec::new();
		}
	};
	msg.attrs
		.iter()
		.filter(|a| a.typ == XOR_PEER_ADDRESS)
		.filter_map(|a| match xor_addr_v4(MAGIC_COOKIE, a.value) {
			Ok(addr) => Some(addr),
			Err(e) => {
				debug!(typ = ?msg.typ, error = ?e, "skipping malformed XOR-PEER-ADDRESS");
				None
			}
		})
		.collect()
}

pub fn sniff<L: Launcher>(buf: &[u8], gate: &TriggerGate<L>) {
	for peer in peer_addrs(buf) {
		gate.offer(peer);
	}
}
