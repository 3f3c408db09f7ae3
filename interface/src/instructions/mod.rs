use crate::{
    codec::{
        FieldValue,
        Fields,
        Schema,
    },
    error::EncodingResult,
};

pub mod authorized_counter;
pub mod echo;
pub mod framework_token;
pub mod native_token;
pub mod runtime_limitations;
pub mod tracker;

/// A typed instruction for one program, backed by that program's [`Schema`].
///
/// Implementors only map between the typed variant and its `(tag, fields)` pair; the byte layout
/// itself is owned by the schema and the shared codec.
pub trait ProgramInstruction: Sized {
    const SCHEMA: &'static Schema;

    fn tag(&self) -> u8;

    fn fields(&self) -> Vec<FieldValue>;

    /// Rebuilds the variant for `tag` from already-decoded fields.
    fn from_fields(tag: u8, fields: &mut Fields) -> EncodingResult<Self>;

    fn pack(&self) -> EncodingResult<Vec<u8>> {
        Self::SCHEMA.encode(self.tag(), &self.fields())
    }

    fn unpack(data: &[u8]) -> EncodingResult<Self> {
        let (tag, fields) = Self::SCHEMA.decode(data)?;
        let mut fields = Fields::new(fields);
        let instruction = Self::from_fields(tag, &mut fields)?;
        fields.finish()?;
        Ok(instruction)
    }
}
