//! The tracker program keeps a per-user count next to a shared authorized counter, which it
//! increments through a signed cross-program call.

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
    program_ids::SYSTEM_PROGRAM_ID,
};

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(test, derive(strum_macros::FromRepr, strum_macros::EnumIter))]
pub enum TrackerInstructionTag {
    Initialize,
    Increment,
}

impl TryFrom<u8> for TrackerInstructionTag {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Initialize),
            1 => Ok(Self::Increment),
            _ => Err(EncodingError::InvalidInstructionTag),
        }
    }
}

pub const TRACKER_SCHEMA: Schema = Schema {
    program: "tracker",
    layouts: &[
        Layout {
            tag: TrackerInstructionTag::Initialize as u8,
            name: "Initialize",
            fields: &[],
        },
        Layout {
            tag: TrackerInstructionTag::Increment as u8,
            name: "Increment",
            fields: &[],
        },
    ],
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TrackerInstruction {
    /// Creates the `[user, counter]` tracker account and records both bumps.
    Initialize,
    /// Increments the shared counter and the user's tracked count.
    Increment,
}

impl ProgramInstruction for TrackerInstruction {
    const SCHEMA: &'static Schema = &TRACKER_SCHEMA;

    fn tag(&self) -> u8 {
        match self {
            Self::Initialize => TrackerInstructionTag::Initialize as u8,
            Self::Increment => TrackerInstructionTag::Increment as u8,
        }
    }

    fn fields(&self) -> Vec<FieldValue> {
        vec![]
    }

    fn from_fields(tag: u8, _fields: &mut Fields) -> EncodingResult<Self> {
        Ok(match TrackerInstructionTag::try_from(tag)? {
            TrackerInstructionTag::Initialize => Self::Initialize,
            TrackerInstructionTag::Increment => Self::Increment,
        })
    }
}

/// | index | writable | signer | description                                  |
/// |-------|----------|--------|----------------------------------------------|
/// | 0     | ✅       | ❌     | tracker: PDA of `[user, counter]`            |
/// | 1     | ❌       | ✅     | user: pays for and owns the tracker          |
/// | 2     | ❌       | ❌     | authority: PDA of `[counter]`                |
/// | 3     | ❌       | ❌     | counter: the shared authorized counter       |
/// | 4     | ❌       | ❌     | system_program                               |
pub fn initialize(
    program_id: &Pubkey,
    tracker: &Pubkey,
    user: &Pubkey,
    authority: &Pubkey,
    counter: &Pubkey,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*tracker, false),
            AccountMeta::new_readonly(*user, true),
            AccountMeta::new_readonly(*authority, false),
            AccountMeta::new_readonly(*counter, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: TrackerInstruction::Initialize.pack()?,
    })
}

/// | index | writable | signer | description                                  |
/// |-------|----------|--------|----------------------------------------------|
/// | 0     | ✅       | ❌     | tracker: PDA of `[user, counter]`            |
/// | 1     | ❌       | ✅     | user                                         |
/// | 2     | ❌       | ❌     | counter_program: the authorized counter      |
/// | 3     | ✅       | ❌     | counter: the shared authorized counter       |
/// | 4     | ❌       | ❌     | authority: PDA of `[counter]`, signs the CPI |
pub fn increment(
    program_id: &Pubkey,
    tracker: &Pubkey,
    user: &Pubkey,
    counter_program: &Pubkey,
    counter: &Pubkey,
    authority: &Pubkey,
) -> EncodingResult<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*tracker, false),
            AccountMeta::new_readonly(*user, true),
            AccountMeta::new_readonly(*counter_program, false),
            AccountMeta::new(*counter, false),
            AccountMeta::new_readonly(*authority, false),
        ],
        data: TrackerInstruction::Increment.pack()?,
    })
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_instruction_tag_from_u8_exhaustive() {
        for variant in TrackerInstructionTag::iter() {
            let variant_u8 = variant as u8;
            assert_eq!(
                TrackerInstructionTag::from_repr(variant_u8).unwrap(),
                TrackerInstructionTag::try_from(variant_u8).unwrap(),
            );
            assert!(TRACKER_SCHEMA.layout(variant_u8).is_ok());
        }
        assert!(TrackerInstructionTag::try_from(2).is_err());
    }

    #[test]
    fn increment_is_a_single_tag_byte() {
        assert_eq!(TrackerInstruction::Increment.pack().unwrap(), vec![0x01]);
        assert_eq!(TrackerInstruction::Initialize.pack().unwrap(), vec![0x00]);
        assert_eq!(
            TrackerInstruction::unpack(&[0x01]).unwrap(),
            TrackerInstruction::Increment
        );
    }

    #[test]
    fn increment_account_metas() {
        let [tracker, user, counter, authority] = [(); 4].map(|_| Pubkey::new_unique());
        let program_id = crate::program_ids::TRACKER_ID;
        let counter_program = crate::program_ids::AUTHORIZED_COUNTER_ID;
        let ixn = increment(
            &program_id,
            &tracker,
            &user,
            &counter_program,
            &counter,
            &authority,
        )
        .unwrap();

        let flags: Vec<(Pubkey, bool, bool)> = ixn
            .accounts
            .iter()
            .map(|meta| (meta.pubkey, meta.is_signer, meta.is_writable))
            .collect();
        assert_eq!(
            flags,
            vec![
                (tracker, false, true),
                (user, true, false),
                (counter_program, false, false),
                (counter, false, true),
                (authority, false, false),
            ]
        );
        assert_eq!(ixn.program_id, program_id);
    }
}
