use static_assertions::const_assert_eq;

use super::AccountState;
use crate::{
    codec::Reader,
    error::EncodingResult,
};

/// The 9 byte header of authorized and vending machine buffers. `seed_or_price` is the
/// `buffer_seed` of an authorized buffer and the `price` of a vending machine buffer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EchoBufferHeader {
    pub bump: u8,
    pub seed_or_price: u64,
}

impl AccountState for EchoBufferHeader {
    const LEN: usize = 9;

    fn read(reader: &mut Reader) -> EncodingResult<Self> {
        Ok(Self {
            bump: reader.read_u8()?,
            seed_or_price: reader.read_u64()?,
        })
    }
}

const_assert_eq!(EchoBufferHeader::LEN, 1 + 8);

/// Splits an echo buffer into its header and the echoed payload that follows it.
pub fn split_echo_buffer(data: &[u8]) -> EncodingResult<(EchoBufferHeader, &[u8])> {
    let header = EchoBufferHeader::unpack(data)?;
    Ok((header, &data[EchoBufferHeader::LEN..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_follows_header() {
        let mut data = vec![255];
        data.extend_from_slice(&42u64.to_le_bytes());
        data.extend_from_slice(b"echo");
        let (header, payload) = split_echo_buffer(&data).unwrap();
        assert_eq!(header.bump, 255);
        assert_eq!(header.seed_or_price, 42);
        assert_eq!(payload, b"echo");
    }
}
