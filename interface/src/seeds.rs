pub mod echo {
    pub const AUTHORITY_SEED_STR: &[u8] = b"authority";
    pub const VENDING_MACHINE_SEED_STR: &[u8] = b"vending_machine";
}

/// Seeds of a user's tracker for a given counter: `[user, counter]`.
#[macro_export]
macro_rules! tracker_seeds {
    ($user:expr, $counter:expr) => {
        &[$user.as_ref(), $counter.as_ref()]
    };
}

/// Seeds of the tracker program's signing authority over a counter: `[counter]`.
#[macro_export]
macro_rules! tracker_authority_seeds {
    ($counter:expr) => {
        &[$counter.as_ref()]
    };
}

/// # Example
///
/// ```
/// use bootcamp_interface::authorized_buffer_seeds;
/// use solana_sdk::pubkey::Pubkey;
///
/// let authority = Pubkey::new_unique();
/// let buffer_seed: u64 = 7;
/// let seed_bytes = buffer_seed.to_le_bytes();
/// let seeds: &[&[u8]] = authorized_buffer_seeds!(authority, seed_bytes);
/// assert_eq!(seeds.len(), 3);
/// ```
#[macro_export]
macro_rules! authorized_buffer_seeds {
    ($authority:expr, $buffer_seed_le:expr) => {
        &[
            $crate::seeds::echo::AUTHORITY_SEED_STR,
            $authority.as_ref(),
            $buffer_seed_le.as_ref(),
        ]
    };
}

#[macro_export]
macro_rules! vending_machine_seeds {
    ($mint:expr, $price_le:expr) => {
        &[
            $crate::seeds::echo::VENDING_MACHINE_SEED_STR,
            $mint.as_ref(),
            $price_le.as_ref(),
        ]
    };
}

/// Seeds of the framework token program's mint for a payer: `[payer]`.
#[macro_export]
macro_rules! framework_mint_seeds {
    ($payer:expr) => {
        &[$payer.as_ref()]
    };
}

/// Seeds of the framework token program's token account: `[payer, mint]`.
#[macro_export]
macro_rules! framework_token_account_seeds {
    ($payer:expr, $mint:expr) => {
        &[$payer.as_ref(), $mint.as_ref()]
    };
}
