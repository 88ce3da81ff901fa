use bytes::Buf;

pub mod attr;
pub mod attrs;
use attr::StunAttr;
use attr::StunAttrDecodeErr;
use attrs::StunAttrs;

pub const MAGIC_COOKIE: u32 = 0x2112A442;
pub const HEADER_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StunDecodeErr {
	PacketTooSmall,
	TypeOutOfRange,
	UnalignedLength,
	BadMagic,
	AttrErr(StunAttrDecodeErr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StunTyp {
	Req(u16),
	Ind(u16),
	Res(u16),
	Err(u16),
}
impl StunTyp {
	pub fn method(&self) -> u16 {
		match self {
			Self::Req(m) => *m,
			Self::Ind(m) => *m,
			Self::Res(m) => *m,
			Self::Err(m) => *m,
		}
	}
}
impl TryFrom<u16> for StunTyp {
	type Error = StunDecodeErr;
	fn try_from(value: u16) -> Result<Self, StunDecodeErr> {
		if value >= 0x4000 {
			return Err(StunDecodeErr::TypeOutOfRange);
		}
		let method = (value & 0b00_00000_0_000_0_1111)
			| ((value & 0b00_00000_0_111_0_0000) >> 1)
			| ((value & 0b00_11111_0_000_0_0000) >> 2);
		Ok(match value & 0b00_00000_1_000_1_0000 {
			0b00_000000_0_000_0_0000 => Self::Req(method),
			0b00_000000_0_000_1_0000 => Self::Ind(method),
			0b00_000000_1_000_0_0000 => Self::Res(method),
			_ => Self::Err(method),
		})
	}
}
impl From<&StunTyp> for u16 {
	fn from(value: &StunTyp) -> Self {
		let (class, method) = match value {
			StunTyp::Req(m) => (0b00_000000_0_000_0_0000, m),
			StunTyp::Ind(m) => (0b00_000000_0_000_1_0000, m),
			StunTyp::Res(m) => (0b00_000000_1_000_0_0000, m),
			StunTyp::Err(m) => (0b00_000000_1_000_1_0000, m),
		};
		(method & 0b00_00000_0_000_0_1111)
			| ((method & 0b00_00000_0_111_0_0000) << 1)
			| ((method & 0b00_11111_0_000_0_0000) << 2)
			| class
	}
}

/// A decoded STUN message. Attribute values borrow the buffer they were
/// decoded from.
#[derive(Debug, Clone)]
pub struct Stun<'i> {
	pub typ: StunTyp,
	pub txid: [u8; 12],
	pub attrs: Vec<StunAttr<'i>>,
}
impl<'i> Stun<'i> {
	/// Size of the attribute section.
	pub fn length(&self) -> usize {
		self.attrs.iter().map(|a| a.len()).sum()
	}
	pub fn len(&self) -> usize {
		HEADER_LEN + self.length()
	}
	/// First attribute of type `typ`, if any.
	pub fn attr(&self, typ: u16) -> Option<&StunAttr<'i>> {
		self.attrs.iter().find(|a| a.typ == typ)
	}
	/// Decodes the message at the start of `buff`. Anything after the length
	/// announced in the header is left alone.
	pub fn decode(buff: &'i [u8]) -> Result<Self, StunDecodeErr> {
		let mut buf = buff;
		if buf.remaining() < HEADER_LEN { return Err(StunDecodeErr::PacketTooSmall) }
		let typ = buf.get_u16();
		let typ = StunTyp::try_from(typ)?;

		let length = buf.get_u16();
		if length % 4 != 0 {
			return Err(StunDecodeErr::UnalignedLength);
		}

		let magic = buf.get_u32();
		if magic != MAGIC_COOKIE {
			return Err(StunDecodeErr::BadMagic);
		}

		let mut txid = [0u8; 12];
		buf.copy_to_slice(&mut txid);

		if buf.remaining() < length as usize {
			return Err(StunDecodeErr::PacketTooSmall);
		}

		let attrs = StunAttrs::new(&buff[HEADER_LEN..][..length as usize])
			.collect::<Result<Vec<_>, _>>()
			.map_err(StunDecodeErr::AttrErr)?;

		Ok(Self { typ, txid, attrs })
	}
	/// Writes the message into `buff`. `None` if it doesn't fit, or if the
	/// attributes are too long for the 16 bit length field.
	pub fn encode(&self, buff: &mut [u8]) -> Option<usize> {
		let length = u16::try_from(self.length()).ok()?;
		let len = HEADER_LEN + length as usize;
		if buff.len() < len {
			return None;
		}
		buff[0..][..2].copy_from_slice(&u16::from(&self.typ).to_be_bytes());
		buff[2..][..2].copy_from_slice(&length.to_be_bytes());
		buff[4..][..4].copy_from_slice(&MAGIC_COOKIE.to_be_bytes());
		buff[8..][..12].copy_from_slice(&self.txid);

		let mut offset = HEADER_LEN;
		for attr in &self.attrs {
			let attr_len = attr.len();
			attr.encode(&mut buff[offset..][..attr_len])?;
			offset += attr_len;
		}

		Some(len)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use attr::{encode_xor_addr_v4, XOR_PEER_ADDRESS, DATA, SOFTWARE};
	use eyre::Result;
	use std::net::SocketAddrV4;

	const TXID: [u8; 12] = *b"txidtxidtxid";

	#[test]
	fn typ_roundtrips_through_the_interleaved_bits() -> Result<()> {
		// Binding request, Send indication, Allocate success, Allocate error
		for (raw, typ) in [
			(0x0001u16, StunTyp::Req(0x001)),
			(0x0016, StunTyp::Ind(0x006)),
			(0x0017, StunTyp::Ind(0x007)),
			(0x0103, StunTyp::Res(0x003)),
			(0x0113, StunTyp::Err(0x003)),
		] {
			assert_eq!(StunTyp::try_from(raw).map_err(|e| eyre::eyre!("{e:?}"))?, typ);
			assert_eq!(u16::from(&typ), raw);
		}
		assert_eq!(StunTyp::try_from(0x4000u16), Err(StunDecodeErr::TypeOutOfRange));
		Ok(())
	}

	#[test]
	fn decodes_a_data_indication() -> Result<()> {
		let peer: SocketAddrV4 = "192.0.2.1:32853".parse()?;
		let xpeer = encode_xor_addr_v4(MAGIC_COOKIE, peer);
		let msg = Stun {
			typ: StunTyp::Ind(0x007),
			txid: TXID,
			attrs: vec![
				StunAttr { typ: XOR_PEER_ADDRESS, value: &xpeer },
				StunAttr { typ: DATA, value: b"hello" },
			],
		};
		let mut buff = [0u8; 128];
		let len = msg.encode(&mut buff).ok_or(eyre::eyre!("buffer too small"))?;
		assert_eq!(len, 20 + 12 + 12);

		let decoded = Stun::decode(&buff[..len]).map_err(|e| eyre::eyre!("{e:?}"))?;
		assert_eq!(decoded.typ, StunTyp::Ind(0x007));
		assert_eq!(decoded.txid, TXID);
		assert_eq!(decoded.attrs.len(), 2);
		assert_eq!(decoded.attr(XOR_PEER_ADDRESS).map(|a| a.value), Some(&xpeer[..]));
		assert_eq!(decoded.attr(DATA).map(|a| a.value), Some(&b"hello"[..]));
		assert!(decoded.attr(SOFTWARE).is_none());
		Ok(())
	}

	#[test]
	fn ignores_bytes_past_the_message() {
		let msg = Stun { typ: StunTyp::Req(0x001), txid: TXID, attrs: Vec::new() };
		let mut buff = [0xAAu8; 40];
		assert_eq!(msg.encode(&mut buff), Some(20));
		let decoded = Stun::decode(&buff).expect("trailing bytes are not part of the message");
		assert!(decoded.attrs.is_empty());
	}

	#[test]
	fn rejects_non_stun() {
		assert_eq!(Stun::decode(b"GET / HTTP/1.1\r\n").unwrap_err(), StunDecodeErr::PacketTooSmall);
		assert_eq!(Stun::decode(&[0x16; 64]).unwrap_err(), StunDecodeErr::UnalignedLength);
		assert_eq!(Stun::decode(&[0xFF; 64]).unwrap_err(), StunDecodeErr::TypeOutOfRange);

		let mut no_magic = [0u8; 20];
		no_magic[1] = 0x01;
		assert_eq!(Stun::decode(&no_magic).unwrap_err(), StunDecodeErr::BadMagic);
	}

	#[test]
	fn rejects_a_length_past_the_buffer() {
		let msg = Stun { typ: StunTyp::Req(0x001), txid: TXID, attrs: Vec::new() };
		let mut buff = [0u8; 20];
		msg.encode(&mut buff);
		buff[3] = 8;
		assert_eq!(Stun::decode(&buff).unwrap_err(), StunDecodeErr::PacketTooSmall);
	}

	#[test]
	fn encode_needs_room() {
		let msg = Stun {
			typ: StunTyp::Req(0x001),
			txid: TXID,
			attrs: vec![StunAttr { typ: SOFTWARE, value: b"sniff" }],
		};
		assert_eq!(msg.len(), 32);
		assert_eq!(msg.encode(&mut [0u8; 31]), None);
	}

	#[test]
	fn encode_refuses_oversized_attributes() {
		let mut buff = vec![0u8; 80_000];
		// Largest value whose padded size still fits the length field.
		let value = vec![0x55u8; 0xFFFF - 4 - 3];
		let msg = Stun {
			typ: StunTyp::Ind(0x007),
			txid: TXID,
			attrs: vec![StunAttr { typ: DATA, value: &value }],
		};
		assert_eq!(msg.encode(&mut buff), Some(20 + 4 + value.len()));

		for len in [0xFFFF - 4 - 2, 0xFFFF, 70_000] {
			let value = vec![0x55u8; len];
			let msg = Stun {
				typ: StunTyp::Ind(0x007),
				txid: TXID,
				attrs: vec![StunAttr { typ: DATA, value: &value }],
			};
			assert_eq!(msg.encode(&mut buff), None, "{len} byte value");
		}

		// Two attributes that fit alone but not together.
		let half = vec![0x55u8; 40_000];
		let msg = Stun {
			typ: StunTyp::Ind(0x007),
			txid: TXID,
			attrs: vec![StunAttr { typ: DATA, value: &half }, StunAttr { typ: DATA, value: &half }],
		};
		assert_eq!(msg.encode(&mut buff), None);
	}
}
