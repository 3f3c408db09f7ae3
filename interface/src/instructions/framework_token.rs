//! The token program written against the account-validation framework.
//!
//! Instead of a one byte tag, the framework selects a handler with an 8 byte discriminator: the
//! first 8 bytes of `sha256("global:<handler_name>")`. Arguments follow in declaration order and
//! use the same little-endian field codec as every other program here.

use sha2::{
    Digest,
    Sha256,
};
use solana_instruction::{
    AccountMeta,
    Instruction,
};
use solana_sdk::pubkey::Pubkey;

use crate::{
    codec::{
        decode_fields,
        encode_fields,
        FieldKind,
        FieldValue,
        Fields,
    },
    error::{
        EncodingError,
        EncodingResult,
    },
    program_ids::SYSTEM_PROGRAM_ID,
};

pub const DISCRIMINATOR_LEN: usize = 8;

const INSTRUCTION_NAMESPACE: &str = "global";
const ACCOUNT_NAMESPACE: &str = "account";

/// The first 8 bytes of `sha256("<namespace>:<name>")`.
pub fn discriminator(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(format!("{namespace}:{name}").as_bytes());
    let hash = hasher.finalize();

    let mut result = [0u8; DISCRIMINATOR_LEN];
    result.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
    result
}

pub fn instruction_discriminator(handler_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    discriminator(INSTRUCTION_NAMESPACE, handler_name)
}

pub fn account_discriminator(account_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    discriminator(ACCOUNT_NAMESPACE, account_name)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FrameworkTokenInstruction {
    InitializeMint,
    InitializeTokenAccount,
    Mint { amount: u64 },
    Burn { amount: u64 },
    Transfer { amount: u64 },
}

const HANDLERS: [(&str, &[FieldKind]); 5] = [
    ("initialize_mint", &[]),
    ("initialize_token_account", &[]),
    ("mint", &[FieldKind::U64]),
    ("burn", &[FieldKind::U64]),
    ("transfer", &[FieldKind::U64]),
];

impl FrameworkTokenInstruction {
    fn handler_index(&self) -> usize {
        match self {
            Self::InitializeMint => 0,
            Self::InitializeTokenAccount => 1,
            Self::Mint { .. } => 2,
            Self::Burn { .. } => 3,
            Self::Transfer { .. } => 4,
        }
    }

    pub fn handler_name(&self) -> &'static str {
        HANDLERS[self.handler_index()].0
    }

    pub fn discriminator(&self) -> [u8; DISCRIMINATOR_LEN] {
        instruction_discriminator(self.handler_name())
    }

    fn fields(&self) -> Vec<FieldValue> {
        match self {
            Self::InitializeMint | Self::InitializeTokenAccount => vec![],
            Self::Mint { amount } | Self::Burn { amount } | Self::Transfer { amount } => {
                vec![(*amount).into()]
            }
        }
    }

    pub fn pack(&self) -> EncodingResult<Vec<u8>> {
        let mut dst = self.discriminator().to_vec();
        encode_fields(HANDLERS[self.handler_index()].1, &self.fields(), &mut dst)?;
        Ok(dst)
    }

    pub fn unpack(data: &[u8]) -> EncodingResult<Self> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(EncodingError::InsufficientByteLength);
        }
        let (disc, rest) = data.split_at(DISCRIMINATOR_LEN);
        let (index, (_, kinds)) = HANDLERS
            .iter()
            .enumerate()
            .find(|(_, (name, _))| instruction_discriminator(name) == disc)
            .ok_or(EncodingError::InvalidInstructionTag)?;
        let mut fields = Fields::new(decode_fields(kinds, rest)?);
        let instruction = match index {
            0 => Self::InitializeMint,
            1 => Self::InitializeTokenAccount,
            2 => Self::Mint {
                amount: fields.u64()?,
            },
            3 => Self::Burn {
                amount: fields.u64()?,
            },
            _ => Self::Transfer {
                amount: fields.u64()?,
            },
        };
        fields.finish()?;
        Ok(instruction)
    }
}

/// Accounts: mint (PDA of `[payer]`, writable), payer (writable, signer), system_program.
pub fn initialize_mint(
    program_id: &Pubkey,
    mint: &Pubkey,
    payer: &Pubkey,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: FrameworkTokenInstruction::InitializeMint.pack()?,
    })
}

/// Accounts: token_account (PDA of `[payer, mint]`, writable), mint, payer (writable, signer),
/// system_program.
pub fn initialize_token_account(
    program_id: &Pubkey,
    token_account: &Pubkey,
    mint: &Pubkey,
    payer: &Pubkey,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*token_account, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: FrameworkTokenInstruction::InitializeTokenAccount.pack()?,
    })
}

/// Accounts: mint (writable), destination (writable), mint authority (signer).
pub fn mint(
    program_id: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: FrameworkTokenInstruction::Mint { amount }.pack()?,
    })
}

/// Accounts: mint (writable), source (writable), owner (signer).
pub fn burn(
    program_id: &Pubkey,
    mint: &Pubkey,
    source: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data: FrameworkTokenInstruction::Burn { amount }.pack()?,
    })
}

/// Accounts: source (writable), destination (writable), owner (signer).
pub fn transfer(
    program_id: &Pubkey,
    source: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*source, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data: FrameworkTokenInstruction::Transfer { amount }.pack()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminators_are_distinct() {
        let discs: Vec<_> = HANDLERS
            .iter()
            .map(|(name, _)| instruction_discriminator(name))
            .collect();
        for (i, a) in discs.iter().enumerate() {
            for b in &discs[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_ne!(
            account_discriminator("Mint"),
            instruction_discriminator("Mint")
        );
    }

    #[test]
    fn packed_layout_is_discriminator_then_args() {
        let packed = FrameworkTokenInstruction::Burn { amount: 3 }.pack().unwrap();
        assert_eq!(packed.len(), DISCRIMINATOR_LEN + 8);
        assert_eq!(&packed[..DISCRIMINATOR_LEN], &instruction_discriminator("burn"));
        assert_eq!(&packed[DISCRIMINATOR_LEN..], &3u64.to_le_bytes());
    }

    #[test]
    fn unpack_inverts_pack() {
        for instruction in [
            FrameworkTokenInstruction::InitializeMint,
            FrameworkTokenInstruction::InitializeTokenAccount,
            FrameworkTokenInstruction::Mint { amount: 5 },
            FrameworkTokenInstruction::Burn { amount: 3 },
            FrameworkTokenInstruction::Transfer { amount: 7 },
        ] {
            let packed = instruction.pack().unwrap();
            assert_eq!(FrameworkTokenInstruction::unpack(&packed).unwrap(), instruction);
        }
        assert_eq!(
            FrameworkTokenInstruction::unpack(&[0; 8]),
            Err(EncodingError::InvalidInstructionTag)
        );
        assert_eq!(
            FrameworkTokenInstruction::unpack(&[0; 4]),
            Err(EncodingError::InsufficientByteLength)
        );
    }
}
