//! Program ids, seeds, instruction layouts and account layouts for the bootcamp programs.

pub mod codec;
pub mod error;
pub mod instructions;
pub mod seeds;
pub mod state;

pub mod program_ids {
    use solana_sdk::pubkey::Pubkey;

    pub const SYSTEM_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("11111111111111111111111111111111");

    /// The counter program whose authority may only be set once, invoked by the tracker.
    pub const AUTHORIZED_COUNTER_ID: Pubkey =
        solana_sdk::pubkey!("EnDET6JzFbb9uAaskPmAde6ooYXzsiRM224ZJ7w2Qw6r");

    pub const TRACKER_ID: Pubkey =
        solana_sdk::pubkey!("CeAA9rP7xNJZWgrsPp84TSiQr32KGjh5VYvGSuYk7iSt");

    pub const RUNTIME_LIMITATIONS_ID: Pubkey =
        solana_sdk::pubkey!("2MZcvPeZv8C3H9VxkByexUJpGwnJgkWgyYsC5bQorJhL");

    /// The token program written against the account-validation framework.
    pub const FRAMEWORK_TOKEN_ID: Pubkey =
        solana_sdk::pubkey!("4qc9MgYgUPWPyW89gs1ykrHdr2VxSLr27RnQFJ69wyaR");
}
