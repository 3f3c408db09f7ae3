use solana_sdk::pubkey::Pubkey;
use static_assertions::const_assert_eq;

use super::AccountState;
use crate::{
    codec::{
        Reader,
        ADDRESS_LEN,
    },
    error::EncodingResult,
};

/// The plain counter: a single little-endian `u64`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Counter {
    pub count: u64,
}

impl AccountState for Counter {
    const LEN: usize = 8;

    fn read(reader: &mut Reader) -> EncodingResult<Self> {
        Ok(Self {
            count: reader.read_u64()?,
        })
    }
}

/// A counter bound to the first authority that incremented it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthorizedCounter {
    pub authority: Pubkey,
    pub count: u64,
}

impl AccountState for AuthorizedCounter {
    const LEN: usize = 40;

    fn read(reader: &mut Reader) -> EncodingResult<Self> {
        Ok(Self {
            authority: reader.read_address()?,
            count: reader.read_u64()?,
        })
    }
}

const_assert_eq!(AuthorizedCounter::LEN, ADDRESS_LEN + 8);

/// A user's tracked count for one authorized counter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tracker {
    /// The tracker's own bump for `[user, counter]`.
    pub bump: u8,
    /// The bump of the `[counter]` authority the tracker signs with.
    pub auth_bump: u8,
    pub counter: Pubkey,
    pub count: u64,
}

impl AccountState for Tracker {
    const LEN: usize = 42;

    fn read(reader: &mut Reader) -> EncodingResult<Self> {
        Ok(Self {
            bump: reader.read_u8()?,
            auth_bump: reader.read_u8()?,
            counter: reader.read_address()?,
            count: reader.read_u64()?,
        })
    }
}

const_assert_eq!(Tracker::LEN, 1 + 1 + ADDRESS_LEN + 8);
