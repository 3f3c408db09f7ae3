//! The authorized counter binds itself to the first authority that increments it and rejects
//! increments signed by anyone else afterwards.

use solana_instruction::{
    AccountMeta,
    Instruction,
};
use solana_sdk::pubkey::Pubkey;

use super::ProgramInstruction;
use crate::{
    codec::{
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
pub enum CounterInstructionTag {
    Increment,
}

impl TryFrom<u8> for CounterInstructionTag {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Increment),
            _ => Err(EncodingError::InvalidInstructionTag),
        }
    }
}

pub const COUNTER_SCHEMA: Schema = Schema {
    program: "authorized-counter",
    layouts: &[Layout {
        tag: CounterInstructionTag::Increment as u8,
        name: "Increment",
        fields: &[],
    }],
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CounterInstruction {
    Increment,
}

impl ProgramInstruction for CounterInstruction {
    const SCHEMA: &'static Schema = &COUNTER_SCHEMA;

    fn tag(&self) -> u8 {
        CounterInstructionTag::Increment as u8
    }

    fn fields(&self) -> Vec<FieldValue> {
        vec![]
    }

    fn from_fields(tag: u8, _fields: &mut Fields) -> EncodingResult<Self> {
        match CounterInstructionTag::try_from(tag)? {
            CounterInstructionTag::Increment => Ok(Self::Increment),
        }
    }
}

/// | index | writable | signer | description                                        |
/// |-------|----------|--------|----------------------------------------------------|
/// | 0     | ✅       | ❌     | counter: 40-byte `[authority, count]` account      |
/// | 1     | ❌       | ✅     | authority: must match the counter's stored authority |
pub fn increment(
    program_id: &Pubkey,
    counter: &Pubkey,
    authority: &Pubkey,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*counter, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: CounterInstruction::Increment.pack()?,
    })
}

/// Increments the plain 8 byte counter, which takes the same encoding but no authority.
pub fn increment_plain(program_id: &Pubkey, counter: &Pubkey) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new(*counter, false)],
        data: CounterInstruction::Increment.pack()?,
    })
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_instruction_tag_from_u8_exhaustive() {
        for variant in CounterInstructionTag::iter() {
            let variant_u8 = variant as u8;
            assert_eq!(
                CounterInstructionTag::from_repr(variant_u8).unwrap(),
                CounterInstructionTag::try_from(variant_u8).unwrap(),
            );
        }
        assert!(CounterInstructionTag::try_from(1).is_err());
    }

    #[test]
    fn increment_requires_authority_signature() {
        let counter = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let ixn = increment(&crate::program_ids::AUTHORIZED_COUNTER_ID, &counter, &authority)
            .unwrap();
        assert_eq!(ixn.data, vec![0]);
        assert!(ixn.accounts[0].is_writable && !ixn.accounts[0].is_signer);
        assert!(ixn.accounts[1].is_signer && !ixn.accounts[1].is_writable);
    }
}
