//! Read-only views over account data written by the bootcamp programs.

use crate::{
    codec::Reader,
    error::{
        EncodingError,
        EncodingResult,
    },
};

pub mod counter;
pub mod echo;
pub mod token;

/// A fixed-layout value stored at the start of an account's data.
pub trait AccountState: Sized {
    /// The number of bytes the state occupies.
    const LEN: usize;

    fn read(reader: &mut Reader) -> EncodingResult<Self>;

    /// Reads `Self` from the first [`AccountState::LEN`] bytes of `data`. Bytes past that are
    /// ignored, since accounts may be allocated larger than the state they hold.
    fn unpack(data: &[u8]) -> EncodingResult<Self> {
        if data.len() < Self::LEN {
            return Err(EncodingError::InsufficientByteLength);
        }
        Self::read(&mut Reader::new(&data[..Self::LEN]))
    }
}
