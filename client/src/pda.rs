//! Program derived addresses for the bootcamp programs.

use bootcamp_interface::{
    authorized_buffer_seeds,
    framework_mint_seeds,
    framework_token_account_seeds,
    program_ids::{
        FRAMEWORK_TOKEN_ID,
        TRACKER_ID,
    },
    tracker_authority_seeds,
    tracker_seeds,
    vending_machine_seeds,
};
use solana_sdk::pubkey::Pubkey;

use crate::error::{
    LedgerError,
    LedgerResult,
};

/// The most seeds an address may be derived from, counting the bump.
pub const MAX_SEEDS: usize = 16;
pub const MAX_SEED_LEN: usize = 32;

/// Searches bumps from 255 down to 0 and returns the first address, with its bump, that
/// `seeds || [bump]` hashes to off the ed25519 curve under `namespace`.
///
/// Produces the same result as [`Pubkey::find_program_address`] but reports bad seeds and an
/// exhausted search as errors instead of panicking.
pub fn derive_address(seeds: &[&[u8]], namespace: &Pubkey) -> LedgerResult<(Pubkey, u8)> {
    if seeds.len() + 1 > MAX_SEEDS || seeds.iter().any(|seed| seed.len() > MAX_SEED_LEN) {
        return Err(LedgerError::InvalidSeeds);
    }

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let candidate: Vec<&[u8]> = seeds
            .iter()
            .copied()
            .chain(std::iter::once(&bump_seed[..]))
            .collect();
        // Only on-curve hashes are rejected here; seed limits were checked above.
        if let Ok(address) = Pubkey::create_program_address(&candidate, namespace) {
            return Ok((address, bump));
        }
    }
    Err(LedgerError::NoValidBumpFound)
}

pub fn find_tracker_address(user: &Pubkey, counter: &Pubkey) -> LedgerResult<(Pubkey, u8)> {
    derive_address(tracker_seeds!(user, counter), &TRACKER_ID)
}

/// The address the tracker program signs with when it invokes the counter program.
pub fn find_tracker_authority_address(counter: &Pubkey) -> LedgerResult<(Pubkey, u8)> {
    derive_address(tracker_authority_seeds!(counter), &TRACKER_ID)
}

pub fn find_authorized_buffer_address(
    echo_program: &Pubkey,
    authority: &Pubkey,
    buffer_seed: u64,
) -> LedgerResult<(Pubkey, u8)> {
    let seed_le = buffer_seed.to_le_bytes();
    derive_address(authorized_buffer_seeds!(authority, seed_le), echo_program)
}

pub fn find_vending_machine_address(
    echo_program: &Pubkey,
    mint: &Pubkey,
    price: u64,
) -> LedgerResult<(Pubkey, u8)> {
    let price_le = price.to_le_bytes();
    derive_address(vending_machine_seeds!(mint, price_le), echo_program)
}

pub fn find_framework_mint_address(payer: &Pubkey) -> LedgerResult<(Pubkey, u8)> {
    derive_address(framework_mint_seeds!(payer), &FRAMEWORK_TOKEN_ID)
}

pub fn find_framework_token_account_address(
    payer: &Pubkey,
    mint: &Pubkey,
) -> LedgerResult<(Pubkey, u8)> {
    derive_address(framework_token_account_seeds!(payer, mint), &FRAMEWORK_TOKEN_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_seeds() {
        let seed = [0u8; 1];
        let seeds = vec![&seed[..]; MAX_SEEDS];
        assert!(matches!(
            derive_address(&seeds, &TRACKER_ID),
            Err(LedgerError::InvalidSeeds)
        ));
        assert!(derive_address(&seeds[1..], &TRACKER_ID).is_ok());
    }

    #[test]
    fn seed_too_long() {
        let long = [7u8; MAX_SEED_LEN + 1];
        assert!(matches!(
            derive_address(&[&long], &TRACKER_ID),
            Err(LedgerError::InvalidSeeds)
        ));
        assert!(derive_address(&[&long[..MAX_SEED_LEN]], &TRACKER_ID).is_ok());
    }
}
