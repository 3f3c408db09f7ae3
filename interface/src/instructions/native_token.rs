//! A minimal token program: one mint authority per mint, token accounts keyed by owner and mint.

use solana_instruction::{
    AccountMeta,
    Instruction,
};
use solana_sdk::pubkey::Pubkey;

use super::ProgramInstruction;
use crate::{
    codec::{
        FieldKind,
        FieldValue,
        Fields,
        Layout,
        Schema,
    },
    error::{
        EncodingError,
        EncodingResult,
    },
};

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(test, derive(strum_macros::FromRepr, strum_macros::EnumIter))]
pub enum TokenInstructionTag {
    InitializeMint,
    InitializeTokenAccount,
    Mint,
    Burn,
    Transfer,
}

impl TryFrom<u8> for TokenInstructionTag {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::InitializeMint),
            1 => Ok(Self::InitializeTokenAccount),
            2 => Ok(Self::Mint),
            3 => Ok(Self::Burn),
            4 => Ok(Self::Transfer),
            _ => Err(EncodingError::InvalidInstructionTag),
        }
    }
}

pub const TOKEN_SCHEMA: Schema = Schema {
    program: "token",
    layouts: &[
        Layout {
            tag: TokenInstructionTag::InitializeMint as u8,
            name: "InitializeMint",
            fields: &[],
        },
        Layout {
            tag: TokenInstructionTag::InitializeTokenAccount as u8,
            name: "InitializeTokenAccount",
            fields: &[],
        },
        Layout {
            tag: TokenInstructionTag::Mint as u8,
            name: "Mint",
            fields: &[FieldKind::U64],
        },
        Layout {
            tag: TokenInstructionTag::Burn as u8,
            name: "Burn",
            fields: &[FieldKind::U64],
        },
        Layout {
            tag: TokenInstructionTag::Transfer as u8,
            name: "Transfer",
            fields: &[FieldKind::U64],
        },
    ],
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TokenInstruction {
    InitializeMint,
    InitializeTokenAccount,
    Mint { amount: u64 },
    Burn { amount: u64 },
    Transfer { amount: u64 },
}

impl ProgramInstruction for TokenInstruction {
    const SCHEMA: &'static Schema = &TOKEN_SCHEMA;

    fn tag(&self) -> u8 {
        let tag = match self {
            Self::InitializeMint => TokenInstructionTag::InitializeMint,
            Self::InitializeTokenAccount => TokenInstructionTag::InitializeTokenAccount,
            Self::Mint { .. } => TokenInstructionTag::Mint,
            Self::Burn { .. } => TokenInstructionTag::Burn,
            Self::Transfer { .. } => TokenInstructionTag::Transfer,
        };
        tag as u8
    }

    fn fields(&self) -> Vec<FieldValue> {
        match self {
            Self::InitializeMint | Self::InitializeTokenAccount => vec![],
            Self::Mint { amount } | Self::Burn { amount } | Self::Transfer { amount } => {
                vec![(*amount).into()]
            }
        }
    }

    fn from_fields(tag: u8, fields: &mut Fields) -> EncodingResult<Self> {
        Ok(match TokenInstructionTag::try_from(tag)? {
            TokenInstructionTag::InitializeMint => Self::InitializeMint,
            TokenInstructionTag::InitializeTokenAccount => Self::InitializeTokenAccount,
            TokenInstructionTag::Mint => Self::Mint {
                amount: fields.u64()?,
            },
            TokenInstructionTag::Burn => Self::Burn {
                amount: fields.u64()?,
            },
            TokenInstructionTag::Transfer => Self::Transfer {
                amount: fields.u64()?,
            },
        })
    }
}

/// Accounts: mint (writable), mint_authority (signer).
pub fn initialize_mint(
    program_id: &Pubkey,
    mint: &Pubkey,
    mint_authority: &Pubkey,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new_readonly(*mint_authority, true),
        ],
        data: TokenInstruction::InitializeMint.pack()?,
    })
}

/// Accounts: token_account (writable), mint, owner.
pub fn initialize_token_account(
    program_id: &Pubkey,
    token_account: &Pubkey,
    mint: &Pubkey,
    owner: &Pubkey,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*token_account, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(*owner, false),
        ],
        data: TokenInstruction::InitializeTokenAccount.pack()?,
    })
}

/// Accounts: token_account (writable), mint (writable), mint_authority (signer).
pub fn mint(
    program_id: &Pubkey,
    token_account: &Pubkey,
    mint: &Pubkey,
    mint_authority: &Pubkey,
    amount: u64,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*token_account, false),
            AccountMeta::new(*mint, false),
            AccountMeta::new_readonly(*mint_authority, true),
        ],
        data: TokenInstruction::Mint { amount }.pack()?,
    })
}

/// Accounts: token_account (writable), mint (writable), owner (signer).
pub fn burn(
    program_id: &Pubkey,
    token_account: &Pubkey,
    mint: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*token_account, false),
            AccountMeta::new(*mint, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data: TokenInstruction::Burn { amount }.pack()?,
    })
}

/// Accounts: source (writable), destination (writable), owner of the source (signer).
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
        data: TokenInstruction::Transfer { amount }.pack()?,
    })
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_instruction_tag_from_u8_exhaustive() {
        for variant in TokenInstructionTag::iter() {
            let variant_u8 = variant as u8;
            assert_eq!(
                TokenInstructionTag::from_repr(variant_u8).unwrap(),
                TokenInstructionTag::try_from(variant_u8).unwrap(),
            );
            assert!(TOKEN_SCHEMA.layout(variant_u8).is_ok());
        }
        assert!(TokenInstructionTag::try_from(5).is_err());
    }

    #[test]
    fn amounts_are_u64_le() {
        let packed = TokenInstruction::Transfer { amount: 7 }.pack().unwrap();
        assert_eq!(packed, vec![4, 7, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            TokenInstruction::unpack(&packed).unwrap(),
            TokenInstruction::Transfer { amount: 7 }
        );
    }

    #[test]
    fn unpack_rejects_extra_bytes() {
        assert_eq!(
            TokenInstruction::unpack(&[0, 1]),
            Err(EncodingError::TrailingBytes)
        );
    }
}
