//! Obyte address grammar
//!
//! An Obyte address is the base32 (RFC 4648, no padding) encoding of a 160-bit
//! checksummed hash. The 32 checksum bits are interleaved with 128 data bits at
//! offsets derived from the decimal digits of pi; the checksum itself is bytes
//! 5, 13, 21 and 29 of the SHA-256 digest of the data bits.

use std::sync::OnceLock;

use bt_types::AddressValidator;
use data_encoding::BASE32_NOPAD;
use sha2::{Digest, Sha256};

const PI_DIGITS: &[u8] = b"14159265358979323846264338327950288419716939937510";

const ADDRESS_LENGTH: usize = 32;
const HASH_BITS: usize = 160;
const CHECKSUM_BITS: usize = 32;
const DATA_BYTES: usize = (HASH_BITS - CHECKSUM_BITS) / 8;

/// Bit positions of the checksum inside the 160-bit hash
fn checksum_offsets() -> &'static [usize; CHECKSUM_BITS] {
	static OFFSETS: OnceLock<[usize; CHECKSUM_BITS]> = OnceLock::new();
	OFFSETS.get_or_init(|| {
		let mut offsets = [0usize; CHECKSUM_BITS];
		let mut offset = 0usize;
		let mut index = 0usize;
		for digit in PI_DIGITS.iter().map(|d| (d - b'0') as usize) {
			if digit == 0 {
				continue;
			}
			offset += digit;
			if offset >= HASH_BITS || index == CHECKSUM_BITS {
				break;
			}
			offsets[index] = offset;
			index += 1;
		}
		debug_assert_eq!(index, CHECKSUM_BITS);
		offsets
	})
}

fn bit(bytes: &[u8], position: usize) -> bool {
	bytes[position / 8] & (0x80 >> (position % 8)) != 0
}

fn set_bit(bytes: &mut [u8], position: usize) {
	bytes[position / 8] |= 0x80 >> (position % 8);
}

fn checksum(data: &[u8]) -> [u8; 4] {
	let digest = Sha256::digest(data);
	[digest[5], digest[13], digest[21], digest[29]]
}

/// Split a 160-bit hash into its data bytes and checksum bytes
fn separate(hash: &[u8]) -> ([u8; DATA_BYTES], [u8; 4]) {
	let offsets = checksum_offsets();
	let mut data = [0u8; DATA_BYTES];
	let mut sum = [0u8; 4];
	let (mut data_pos, mut sum_pos) = (0usize, 0usize);

	for position in 0..HASH_BITS {
		let is_checksum = sum_pos < CHECKSUM_BITS && offsets[sum_pos] == position;
		if is_checksum {
			if bit(hash, position) {
				set_bit(&mut sum, sum_pos);
			}
			sum_pos += 1;
		} else {
			if bit(hash, position) {
				set_bit(&mut data, data_pos);
			}
			data_pos += 1;
		}
	}

	(data, sum)
}

/// Build an address from 128 bits of payload
///
/// Real addresses use the truncated RIPEMD-160 of an address definition as the
/// payload; any 16 bytes produce a structurally valid address.
pub fn encode_address(data: &[u8; DATA_BYTES]) -> String {
	let offsets = checksum_offsets();
	let sum = checksum(data);
	let mut hash = [0u8; HASH_BITS / 8];
	let (mut data_pos, mut sum_pos) = (0usize, 0usize);

	for position in 0..HASH_BITS {
		let is_checksum = sum_pos < CHECKSUM_BITS && offsets[sum_pos] == position;
		let value = if is_checksum {
			sum_pos += 1;
			bit(&sum, sum_pos - 1)
		} else {
			data_pos += 1;
			bit(data, data_pos - 1)
		};
		if value {
			set_bit(&mut hash, position);
		}
	}

	BASE32_NOPAD.encode(&hash)
}

/// Validator for Obyte (destination chain) addresses
#[derive(Debug, Clone, Default)]
pub struct ObyteAddressValidator;

impl ObyteAddressValidator {
	pub fn new() -> Self {
		Self
	}
}

impl AddressValidator for ObyteAddressValidator {
	fn is_valid_address(&self, raw: &str) -> bool {
		if raw.len() != ADDRESS_LENGTH || raw != raw.to_uppercase() {
			return false;
		}
		let hash = match BASE32_NOPAD.decode(raw.as_bytes()) {
			Ok(hash) if hash.len() == HASH_BITS / 8 => hash,
			_ => return false,
		};
		let (data, sum) = separate(&hash);
		checksum(&data) == sum
	}

	fn network_name(&self) -> &str {
		"Obyte"
	}
}
