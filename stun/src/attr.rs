use std::net::{Ipv4Addr, SocketAddrV4};

// RFC 5389:
pub const MAPPED_ADDRESS: u16 = 0x0001;
pub const USERNAME: u16 = 0x0006;
pub const MESSAGE_INTEGRITY: u16 = 0x0008;
pub const ERROR_CODE: u16 = 0x0009;
pub const REALM: u16 = 0x0014;
pub const NONCE: u16 = 0x0015;
pub const XOR_MAPPED_ADDRESS: u16 = 0x0020;
pub const SOFTWARE: u16 = 0x8022;
pub const FINGERPRINT: u16 = 0x8028;

// RFC 5766:
pub const LIFETIME: u16 = 0x000D;
pub const XOR_PEER_ADDRESS: u16 = 0x0012;
pub const DATA: u16 = 0x0013;
pub const XOR_RELAYED_ADDRESS: u16 = 0x0016;
pub const REQUESTED_TRANSPORT: u16 = 0x0019;

const FAMILY_V4: u8 = 0x01;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StunAttrDecodeErr {
	/// Fewer than 4 bytes left for the type/length header.
	HeaderTruncated,
	/// The (padded) value runs past the end of the message.
	ValueTruncated,
	/// Address value shorter than family + port + IPv4 address.
	AddrTooShort(usize),
}

/// One type/length/value entry, value unpadded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StunAttr<'i> {
	pub typ: u16,
	pub value: &'i [u8],
}
impl<'i> StunAttr<'i> {
	pub fn length(&self) -> usize {
		self.value.len()
	}
	/// Encoded size: header, value and padding.
	pub fn len(&self) -> usize {
		4 + ((self.length() + 3) & !3)
	}
	/// `None` if the value doesn't fit the 16 bit length field.
	pub fn encode(&self, buff: &mut [u8]) -> Option<()> {
		let length = u16::try_from(self.length()).ok()?;
		buff[0..][..2].copy_from_slice(&self.typ.to_be_bytes());
		buff[2..][..2].copy_from_slice(&length.to_be_bytes());
		let (data, padding) = buff[4..].split_at_mut(self.value.len());
		data.copy_from_slice(self.value);
		padding.fill(0);
		Some(())
	}
}

/// Unmasks an IPv4 XOR-*-ADDRESS value: the port is XORed with the top half
/// of the cookie, the address byte-wise with the cookie. The family byte is
/// not consulted; only the cookie takes part, so IPv6 values come out wrong.
pub fn xor_addr_v4(cookie: u32, value: &[u8]) -> Result<SocketAddrV4, StunAttrDecodeErr> {
	let Some(data) = value.get(..8) else {
		return Err(StunAttrDecodeErr::AddrTooShort(value.len()));
	};
	let mask = cookie.to_be_bytes();
	let port = u16::from_be_bytes([data[2], data[3]]) ^ (cookie >> 16) as u16;
	let mut ip = [0u8; 4];
	for (out, (b, m)) in ip.iter_mut().zip(data[4..8].iter().zip(mask)) {
		*out = b ^ m;
	}
	Ok(SocketAddrV4::new(Ipv4Addr::from(ip), port))
}

pub fn encode_xor_addr_v4(cookie: u32, addr: SocketAddrV4) -> [u8; 8] {
	let mask = cookie.to_be_bytes();
	let port = addr.port() ^ (cookie >> 16) as u16;
	let mut ret = [0, FAMILY_V4, 0, 0, 0, 0, 0, 0];
	ret[2..][..2].copy_from_slice(&port.to_be_bytes());
	for (i, b) in addr.ip().octets().iter().enumerate() {
		ret[4 + i] = b ^ mask[i];
	}
	ret
}
