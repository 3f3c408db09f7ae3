#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum EncodingError {
    InvalidInstructionTag,
    FieldCountMismatch,
    FieldKindMismatch,
    ValueOutOfRange,
    BlobTooLong,
    InsufficientByteLength,
    TrailingBytes,
    InvalidAccountTag,
}

impl From<EncodingError> for &'static str {
    fn from(value: EncodingError) -> Self {
        match value {
            EncodingError::InvalidInstructionTag => "Invalid instruction tag",
            EncodingError::FieldCountMismatch => "Wrong number of fields for the instruction",
            EncodingError::FieldKindMismatch => "Field value doesn't match its declared kind",
            EncodingError::ValueOutOfRange => "Numeric field doesn't fit in its declared width",
            EncodingError::BlobTooLong => "Byte blob is longer than a u32 length prefix allows",
            EncodingError::InsufficientByteLength => "Not enough bytes passed",
            EncodingError::TrailingBytes => "Unexpected bytes after the last field",
            EncodingError::InvalidAccountTag => "Account data has the wrong tag or discriminator",
        }
    }
}

impl core::fmt::Display for EncodingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = (*self).into();
        write!(f, "{msg}")
    }
}

impl std::error::Error for EncodingError {}

pub type EncodingResult<T> = Result<T, EncodingError>;
