use crate::attr::{StunAttr, StunAttrDecodeErr};

/// Walks the attribute section of a message (everything after the 20 byte
/// header, up to the header's length). Stops after the first error.
pub struct StunAttrs<'i> {
	buff: &'i [u8],
	failed: bool,
}
impl<'i> StunAttrs<'i> {
	pub fn new(buff: &'i [u8]) -> Self {
		Self { buff, failed: false }
	}
	fn fail(&mut self, e: StunAttrDecodeErr) -> Option<Result<StunAttr<'i>, StunAttrDecodeErr>> {
		self.failed = true;
		Some(Err(e))
	}
}
impl<'i> Iterator for StunAttrs<'i> {
	type Item = Result<StunAttr<'i>, StunAttrDecodeErr>;
	fn next(&mut self) -> Option<Self::Item> {
		if self.failed || self.buff.is_empty() {
			return None;
		}
		let Some(header) = self.buff.get(..4) else {
			return self.fail(StunAttrDecodeErr::HeaderTruncated);
		};
		let typ = u16::from_be_bytes([header[0], header[1]]);
		let length = u16::from_be_bytes([header[2], header[3]]) as usize;
		let padded = (length + 3) & !3;

		let rest = &self.buff[4..];
		if rest.len() < padded {
			return self.fail(StunAttrDecodeErr::ValueTruncated);
		}
		let value = &rest[..length];
		self.buff = &rest[padded..];

		Some(Ok(StunAttr { typ, value }))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::attr::{LIFETIME, USERNAME};

	#[test]
	fn walks_padded_values() {
		let buff = [
			0x00, 0x06, 0x00, 0x03, b'b', b'o', b'b', 0x00,
			0x00, 0x0D, 0x00, 0x04, 0x00, 0x00, 0x0E, 0x10,
		];
		let attrs: Vec<_> = StunAttrs::new(&buff).collect();
		assert_eq!(attrs, vec![
			Ok(StunAttr { typ: USERNAME, value: b"bob" }),
			Ok(StunAttr { typ: LIFETIME, value: &[0x00, 0x00, 0x0E, 0x10] }),
		]);
	}

	#[test]
	fn value_past_the_end() {
		let buff = [0x00, 0x12, 0x00, 0x08, 0x00, 0x01, 0x10, 0x91];
		let mut attrs = StunAttrs::new(&buff);
		assert_eq!(attrs.next(), Some(Err(StunAttrDecodeErr::ValueTruncated)));
		assert_eq!(attrs.next(), None);
	}

	#[test]
	fn missing_padding_is_truncation() {
		let buff = [0x00, 0x06, 0x00, 0x03, b'b', b'o', b'b'];
		assert_eq!(StunAttrs::new(&buff).next(), Some(Err(StunAttrDecodeErr::ValueTruncated)));
	}

	#[test]
	fn half_a_header() {
		let buff = [0x00, 0x06];
		assert_eq!(StunAttrs::new(&buff).next(), Some(Err(StunAttrDecodeErr::HeaderTruncated)));
	}
}
