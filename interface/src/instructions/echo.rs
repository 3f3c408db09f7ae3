//! The echo program copies instruction data into buffers: a plain buffer, a buffer only its
//! authority may write, and a vending machine buffer that burns tokens per write.

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

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(test, derive(strum_macros::FromRepr, strum_macros::EnumIter))]
pub enum EchoInstructionTag {
    Echo,
    InitializeAuthorizedEcho,
    AuthorizedEcho,
    InitializeVendingMachineEcho,
    VendingMachineEcho,
}

impl TryFrom<u8> for EchoInstructionTag {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Echo),
            1 => Ok(Self::InitializeAuthorizedEcho),
            2 => Ok(Self::AuthorizedEcho),
            3 => Ok(Self::InitializeVendingMachineEcho),
            4 => Ok(Self::VendingMachineEcho),
            _ => Err(EncodingError::InvalidInstructionTag),
        }
    }
}

pub const ECHO_SCHEMA: Schema = Schema {
    program: "echo",
    layouts: &[
        Layout {
            tag: EchoInstructionTag::Echo as u8,
            name: "Echo",
            fields: &[FieldKind::Bytes],
        },
        Layout {
            tag: EchoInstructionTag::InitializeAuthorizedEcho as u8,
            name: "InitializeAuthorizedEcho",
            fields: &[FieldKind::U64, FieldKind::U64],
        },
        Layout {
            tag: EchoInstructionTag::AuthorizedEcho as u8,
            name: "AuthorizedEcho",
            fields: &[FieldKind::Bytes],
        },
        Layout {
            tag: EchoInstructionTag::InitializeVendingMachineEcho as u8,
            name: "InitializeVendingMachineEcho",
            fields: &[FieldKind::U64, FieldKind::U64],
        },
        Layout {
            tag: EchoInstructionTag::VendingMachineEcho as u8,
            name: "VendingMachineEcho",
            fields: &[FieldKind::Bytes],
        },
    ],
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EchoInstruction {
    /// Copies `data` into the echo buffer, truncated to the buffer's length. Fails if the buffer
    /// holds any non-zero byte.
    Echo { data: Vec<u8> },
    /// Allocates `buffer_size` bytes for the authority's buffer. The first 9 bytes hold the bump
    /// and `buffer_seed`.
    InitializeAuthorizedEcho { buffer_seed: u64, buffer_size: u64 },
    /// Copies `data` into the authorized buffer past its 9 byte header.
    AuthorizedEcho { data: Vec<u8> },
    /// Allocates `buffer_size` bytes for a vending machine buffer. The first 9 bytes hold the bump
    /// and `price`.
    InitializeVendingMachineEcho { price: u64, buffer_size: u64 },
    /// Burns `price` tokens from the user, then copies `data` past the 9 byte header.
    VendingMachineEcho { data: Vec<u8> },
}

impl ProgramInstruction for EchoInstruction {
    const SCHEMA: &'static Schema = &ECHO_SCHEMA;

    fn tag(&self) -> u8 {
        let tag = match self {
            Self::Echo { .. } => EchoInstructionTag::Echo,
            Self::InitializeAuthorizedEcho { .. } => EchoInstructionTag::InitializeAuthorizedEcho,
            Self::AuthorizedEcho { .. } => EchoInstructionTag::AuthorizedEcho,
            Self::InitializeVendingMachineEcho { .. } => {
                EchoInstructionTag::InitializeVendingMachineEcho
            }
            Self::VendingMachineEcho { .. } => EchoInstructionTag::VendingMachineEcho,
        };
        tag as u8
    }

    fn fields(&self) -> Vec<FieldValue> {
        match self {
            Self::Echo { data } | Self::AuthorizedEcho { data } | Self::VendingMachineEcho { data } => {
                vec![data.as_slice().into()]
            }
            Self::InitializeAuthorizedEcho {
                buffer_seed,
                buffer_size,
            } => vec![(*buffer_seed).into(), (*buffer_size).into()],
            Self::InitializeVendingMachineEcho { price, buffer_size } => {
                vec![(*price).into(), (*buffer_size).into()]
            }
        }
    }

    fn from_fields(tag: u8, fields: &mut Fields) -> EncodingResult<Self> {
        Ok(match EchoInstructionTag::try_from(tag)? {
            EchoInstructionTag::Echo => Self::Echo {
                data: fields.bytes()?,
            },
            EchoInstructionTag::InitializeAuthorizedEcho => Self::InitializeAuthorizedEcho {
                buffer_seed: fields.u64()?,
                buffer_size: fields.u64()?,
            },
            EchoInstructionTag::AuthorizedEcho => Self::AuthorizedEcho {
                data: fields.bytes()?,
            },
            EchoInstructionTag::InitializeVendingMachineEcho => {
                Self::InitializeVendingMachineEcho {
                    price: fields.u64()?,
                    buffer_size: fields.u64()?,
                }
            }
            EchoInstructionTag::VendingMachineEcho => Self::VendingMachineEcho {
                data: fields.bytes()?,
            },
        })
    }
}

/// | index | writable | signer | description                           |
/// |-------|----------|--------|---------------------------------------|
/// | 0     | ✅       | ❌     | echo_buffer: destination of the data  |
pub fn echo(program_id: &Pubkey, echo_buffer: &Pubkey, data: Vec<u8>) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new(*echo_buffer, false)],
        data: EchoInstruction::Echo { data }.pack()?,
    })
}

/// | index | writable | signer | description                                         |
/// |-------|----------|--------|-----------------------------------------------------|
/// | 0     | ✅       | ❌     | authorized_buffer: PDA of `["authority", authority, buffer_seed]` |
/// | 1     | ❌       | ✅     | authority: sole writer of the buffer                |
/// | 2     | ❌       | ❌     | system_program                                      |
pub fn initialize_authorized_echo(
    program_id: &Pubkey,
    authorized_buffer: &Pubkey,
    authority: &Pubkey,
    buffer_seed: u64,
    buffer_size: u64,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*authorized_buffer, false),
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: EchoInstruction::InitializeAuthorizedEcho {
            buffer_seed,
            buffer_size,
        }
        .pack()?,
    })
}

/// | index | writable | signer | description                          |
/// |-------|----------|--------|--------------------------------------|
/// | 0     | ✅       | ❌     | authorized_buffer                    |
/// | 1     | ❌       | ✅     | authority                            |
pub fn authorized_echo(
    program_id: &Pubkey,
    authorized_buffer: &Pubkey,
    authority: &Pubkey,
    data: Vec<u8>,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*authorized_buffer, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: EchoInstruction::AuthorizedEcho { data }.pack()?,
    })
}

/// | index | writable | signer | description                                                  |
/// |-------|----------|--------|--------------------------------------------------------------|
/// | 0     | ✅       | ❌     | vending_machine_buffer: PDA of `["vending_machine", mint, price]` |
/// | 1     | ❌       | ❌     | vending_machine_mint                                         |
/// | 2     | ❌       | ✅     | payer                                                        |
/// | 3     | ❌       | ❌     | system_program                                               |
pub fn initialize_vending_machine_echo(
    program_id: &Pubkey,
    vending_machine_buffer: &Pubkey,
    vending_machine_mint: &Pubkey,
    payer: &Pubkey,
    price: u64,
    buffer_size: u64,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*vending_machine_buffer, false),
            AccountMeta::new_readonly(*vending_machine_mint, false),
            AccountMeta::new_readonly(*payer, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: EchoInstruction::InitializeVendingMachineEcho { price, buffer_size }.pack()?,
    })
}

/// | index | writable | signer | description                                   |
/// |-------|----------|--------|-----------------------------------------------|
/// | 0     | ✅       | ❌     | vending_machine_buffer                        |
/// | 1     | ❌       | ✅     | user: authority of `user_token_account`       |
/// | 2     | ✅       | ❌     | user_token_account: burns `price` tokens      |
/// | 3     | ❌       | ❌     | vending_machine_mint                          |
/// | 4     | ❌       | ❌     | token_program                                 |
pub fn vending_machine_echo(
    program_id: &Pubkey,
    vending_machine_buffer: &Pubkey,
    user: &Pubkey,
    user_token_account: &Pubkey,
    vending_machine_mint: &Pubkey,
    token_program: &Pubkey,
    data: Vec<u8>,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*vending_machine_buffer, false),
            AccountMeta::new_readonly(*user, true),
            AccountMeta::new(*user_token_account, false),
            AccountMeta::new_readonly(*vending_machine_mint, false),
            AccountMeta::new_readonly(*token_program, false),
        ],
        data: EchoInstruction::VendingMachineEcho { data }.pack()?,
    })
}
