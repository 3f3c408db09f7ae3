//! A program that exercises runtime limits: stack frames, compute units, CPI allocation size, zero
//! copy account access and transaction size.

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
    program_ids::SYSTEM_PROGRAM_ID,
};

/// `user` followed by 256 offers of two addresses and two `u64`s.
pub const MARKETPLACE_SIZE: usize = 32 + 256 * 80;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(test, derive(strum_macros::FromRepr, strum_macros::EnumIter))]
pub enum RuntimeInstructionTag {
    Stack,
    Runtime,
    Cpi,
    ZeroCopy,
    Echo,
}

impl TryFrom<u8> for RuntimeInstructionTag {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Stack),
            1 => Ok(Self::Runtime),
            2 => Ok(Self::Cpi),
            3 => Ok(Self::ZeroCopy),
            4 => Ok(Self::Echo),
            _ => Err(EncodingError::InvalidInstructionTag),
        }
    }
}

pub const RUNTIME_SCHEMA: Schema = Schema {
    program: "runtime-limitations",
    layouts: &[
        Layout {
            tag: RuntimeInstructionTag::Stack as u8,
            name: "Stack",
            fields: &[],
        },
        Layout {
            tag: RuntimeInstructionTag::Runtime as u8,
            name: "Runtime",
            fields: &[FieldKind::U64],
        },
        Layout {
            tag: RuntimeInstructionTag::Cpi as u8,
            name: "Cpi",
            fields: &[FieldKind::U64],
        },
        Layout {
            tag: RuntimeInstructionTag::ZeroCopy as u8,
            name: "ZeroCopy",
            fields: &[],
        },
        Layout {
            tag: RuntimeInstructionTag::Echo as u8,
            name: "Echo",
            fields: &[FieldKind::Bytes],
        },
    ],
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RuntimeInstruction {
    /// Deserializes the whole marketplace onto the stack.
    Stack,
    /// Spins for `max_iter` iterations, logging compute units every thousand.
    Runtime { max_iter: u64 },
    /// Creates a `size` byte account through the system program.
    Cpi { size: u64 },
    /// Writes the marketplace user through a zero copy view.
    ZeroCopy,
    /// Copies `data` into the buffer account, which must be exactly `data.len()` bytes.
    Echo { data: Vec<u8> },
}

impl ProgramInstruction for RuntimeInstruction {
    const SCHEMA: &'static Schema = &RUNTIME_SCHEMA;

    fn tag(&self) -> u8 {
        let tag = match self {
            Self::Stack => RuntimeInstructionTag::Stack,
            Self::Runtime { .. } => RuntimeInstructionTag::Runtime,
            Self::Cpi { .. } => RuntimeInstructionTag::Cpi,
            Self::ZeroCopy => RuntimeInstructionTag::ZeroCopy,
            Self::Echo { .. } => RuntimeInstructionTag::Echo,
        };
        tag as u8
    }

    fn fields(&self) -> Vec<FieldValue> {
        match self {
            Self::Stack | Self::ZeroCopy => vec![],
            Self::Runtime { max_iter } => vec![(*max_iter).into()],
            Self::Cpi { size } => vec![(*size).into()],
            Self::Echo { data } => vec![data.as_slice().into()],
        }
    }

    fn from_fields(tag: u8, fields: &mut Fields) -> EncodingResult<Self> {
        Ok(match RuntimeInstructionTag::try_from(tag)? {
            RuntimeInstructionTag::Stack => Self::Stack,
            RuntimeInstructionTag::Runtime => Self::Runtime {
                max_iter: fields.u64()?,
            },
            RuntimeInstructionTag::Cpi => Self::Cpi { size: fields.u64()? },
            RuntimeInstructionTag::ZeroCopy => Self::ZeroCopy,
            RuntimeInstructionTag::Echo => Self::Echo {
                data: fields.bytes()?,
            },
        })
    }
}

/// Accounts for [`RuntimeInstruction::Stack`] and [`RuntimeInstruction::ZeroCopy`]: the
/// marketplace buffer (writable) and the user (signer).
pub fn marketplace_instruction(
    program_id: &Pubkey,
    instruction: RuntimeInstruction,
    marketplace: &Pubkey,
    user: &Pubkey,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*marketplace, false),
            AccountMeta::new_readonly(*user, true),
        ],
        data: instruction.pack()?,
    })
}

pub fn stack(program_id: &Pubkey, marketplace: &Pubkey, user: &Pubkey) -> EncodingResult<Instruction> {
    marketplace_instruction(program_id, RuntimeInstruction::Stack, marketplace, user)
}

pub fn zero_copy(
    program_id: &Pubkey,
    marketplace: &Pubkey,
    user: &Pubkey,
) -> EncodingResult<Instruction> {
    marketplace_instruction(program_id, RuntimeInstruction::ZeroCopy, marketplace, user)
}

/// Takes no accounts.
pub fn runtime(program_id: &Pubkey, max_iter: u64) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![],
        data: RuntimeInstruction::Runtime { max_iter }.pack()?,
    })
}

/// `from` funds the new account, `to` is the account being created and must sign.
pub fn cpi(program_id: &Pubkey, from: &Pubkey, to: &Pubkey, size: u64) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*from, true),
            AccountMeta::new(*to, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: RuntimeInstruction::Cpi { size }.pack()?,
    })
}

pub fn echo(program_id: &Pubkey, buffer: &Pubkey, data: Vec<u8>) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new(*buffer, false)],
        data: RuntimeInstruction::Echo { data }.pack()?,
    })
}
