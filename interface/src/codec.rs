//! Flat little-endian instruction codec.
//!
//! Every instruction is a tag byte followed by its fields in declaration order. The field layout
//! of each variant lives in a [`Schema`], so the byte offsets and widths used by a program are
//! written down exactly once and shared by [`Schema::encode`] and [`Schema::decode`].

use solana_sdk::pubkey::Pubkey;

use crate::error::{
    EncodingError,
    EncodingResult,
};

/// The byte length of the little-endian `u32` that precedes every [`FieldKind::Bytes`] blob.
pub const LENGTH_PREFIX_LEN: usize = 4;

pub const ADDRESS_LEN: usize = 32;

/// The declared type, and therefore the width on the wire, of a single instruction field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    U8,
    U32,
    U64,
    Address,
    /// A `u32` length prefix followed by that many raw bytes.
    Bytes,
}

impl FieldKind {
    /// The fixed width of the field in bytes, or `None` for length-prefixed blobs.
    pub const fn width(self) -> Option<usize> {
        match self {
            Self::U8 => Some(1),
            Self::U32 => Some(4),
            Self::U64 => Some(8),
            Self::Address => Some(ADDRESS_LEN),
            Self::Bytes => None,
        }
    }

    const fn int_max(self) -> Option<u64> {
        match self {
            Self::U8 => Some(u8::MAX as u64),
            Self::U32 => Some(u32::MAX as u64),
            Self::U64 => Some(u64::MAX),
            Self::Address | Self::Bytes => None,
        }
    }
}

/// A field value prior to encoding.
///
/// Integers are carried as `i128` so that values which don't fit the declared width (negative
/// counts, sizes past `u64::MAX`) are representable and rejected by the encoder instead of being
/// silently truncated at the call site.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldValue {
    Int(i128),
    Address(Pubkey),
    Bytes(Vec<u8>),
}

macro_rules! impl_from_uint {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Int(value as i128)
                }
            }
        )*
    };
}

impl_from_uint!(u8, u16, u32, u64, usize, i64);

impl From<Pubkey> for FieldValue {
    fn from(value: Pubkey) -> Self {
        FieldValue::Address(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Bytes(value)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        FieldValue::Bytes(value.to_vec())
    }
}

/// The field layout of one instruction variant.
#[derive(Debug)]
pub struct Layout {
    pub tag: u8,
    pub name: &'static str,
    pub fields: &'static [FieldKind],
}

/// The closed set of instruction variants a single program accepts.
#[derive(Debug)]
pub struct Schema {
    pub program: &'static str,
    pub layouts: &'static [Layout],
}

impl Schema {
    pub fn layout(&self, tag: u8) -> EncodingResult<&'static Layout> {
        self.layouts
            .iter()
            .find(|layout| layout.tag == tag)
            .ok_or(EncodingError::InvalidInstructionTag)
    }

    /// Encodes `tag` and `fields` into a flat byte buffer.
    ///
    /// Fails if the tag isn't part of this schema, if the number or kinds of `fields` don't match
    /// the variant's layout, or if an integer doesn't fit its declared width.
    pub fn encode(&self, tag: u8, fields: &[FieldValue]) -> EncodingResult<Vec<u8>> {
        let layout = self.layout(tag)?;
        let mut dst = Vec::with_capacity(1 + packed_len(layout.fields, fields));
        dst.push(tag);
        encode_fields(layout.fields, fields, &mut dst)?;
        Ok(dst)
    }

    /// The exact inverse of [`Schema::encode`]. The whole buffer must be consumed.
    pub fn decode(&self, data: &[u8]) -> EncodingResult<(u8, Vec<FieldValue>)> {
        let (&tag, rest) = data
            .split_first()
            .ok_or(EncodingError::InsufficientByteLength)?;
        let layout = self.layout(tag)?;
        let fields = decode_fields(layout.fields, rest)?;
        Ok((tag, fields))
    }
}

fn packed_len(kinds: &[FieldKind], values: &[FieldValue]) -> usize {
    kinds
        .iter()
        .zip(values)
        .map(|(kind, value)| match (kind.width(), value) {
            (Some(width), _) => width,
            (None, FieldValue::Bytes(bytes)) => LENGTH_PREFIX_LEN + bytes.len(),
            (None, _) => 0,
        })
        .sum()
}

/// Appends `values` to `dst` according to `kinds`, without a leading tag.
pub fn encode_fields(
    kinds: &[FieldKind],
    values: &[FieldValue],
    dst: &mut Vec<u8>,
) -> EncodingResult<()> {
    if kinds.len() != values.len() {
        return Err(EncodingError::FieldCountMismatch);
    }
    for (kind, value) in kinds.iter().zip(values) {
        write_field(*kind, value, dst)?;
    }
    Ok(())
}

pub fn write_field(kind: FieldKind, value: &FieldValue, dst: &mut Vec<u8>) -> EncodingResult<()> {
    match (kind, value) {
        (FieldKind::Address, FieldValue::Address(address)) => {
            dst.extend_from_slice(address.as_ref());
        }
        (FieldKind::Bytes, FieldValue::Bytes(bytes)) => {
            let len = u32::try_from(bytes.len()).map_err(|_| EncodingError::BlobTooLong)?;
            dst.extend_from_slice(&len.to_le_bytes());
            dst.extend_from_slice(bytes);
        }
        (_, FieldValue::Int(int)) => {
            let (Some(max), Some(width)) = (kind.int_max(), kind.width()) else {
                return Err(EncodingError::FieldKindMismatch);
            };
            if *int < 0 || *int > max as i128 {
                return Err(EncodingError::ValueOutOfRange);
            }
            dst.extend_from_slice(&(*int as u64).to_le_bytes()[..width]);
        }
        _ => return Err(EncodingError::FieldKindMismatch),
    }
    Ok(())
}

/// Decodes a tagless field sequence, failing on short input or leftover bytes.
pub fn decode_fields(kinds: &[FieldKind], src: &[u8]) -> EncodingResult<Vec<FieldValue>> {
    let mut reader = Reader::new(src);
    let fields = kinds
        .iter()
        .map(|kind| reader.read(*kind))
        .collect::<EncodingResult<Vec<_>>>()?;
    reader.finish()?;
    Ok(fields)
}

/// A forward-only little-endian reader over a byte slice.
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn take(&mut self, len: usize) -> EncodingResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(EncodingError::InsufficientByteLength);
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> EncodingResult<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    pub fn read_u8(&mut self) -> EncodingResult<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_u32(&mut self) -> EncodingResult<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> EncodingResult<u64> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    pub fn read_address(&mut self) -> EncodingResult<Pubkey> {
        Ok(Pubkey::new_from_array(self.take_array()?))
    }

    pub fn read_bytes(&mut self) -> EncodingResult<Vec<u8>> {
        let len = self.read_u32()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    pub fn read(&mut self, kind: FieldKind) -> EncodingResult<FieldValue> {
        Ok(match kind {
            FieldKind::U8 => self.read_u8()?.into(),
            FieldKind::U32 => self.read_u32()?.into(),
            FieldKind::U64 => self.read_u64()?.into(),
            FieldKind::Address => self.read_address()?.into(),
            FieldKind::Bytes => self.read_bytes()?.into(),
        })
    }

    /// Fails if any bytes are left unread.
    pub fn finish(self) -> EncodingResult<()> {
        match self.remaining() {
            0 => Ok(()),
            _ => Err(EncodingError::TrailingBytes),
        }
    }
}

/// Pulls typed values back out of a decoded field list, in order.
pub struct Fields(std::vec::IntoIter<FieldValue>);

impl Fields {
    pub fn new(fields: Vec<FieldValue>) -> Self {
        Self(fields.into_iter())
    }

    fn next(&mut self) -> EncodingResult<FieldValue> {
        self.0.next().ok_or(EncodingError::FieldCountMismatch)
    }

    pub fn u64(&mut self) -> EncodingResult<u64> {
        match self.next()? {
            FieldValue::Int(int) => u64::try_from(int).map_err(|_| EncodingError::ValueOutOfRange),
            _ => Err(EncodingError::FieldKindMismatch),
        }
    }

    pub fn address(&mut self) -> EncodingResult<Pubkey> {
        match self.next()? {
            FieldValue::Address(address) => Ok(address),
            _ => Err(EncodingError::FieldKindMismatch),
        }
    }

    pub fn bytes(&mut self) -> EncodingResult<Vec<u8>> {
        match self.next()? {
            FieldValue::Bytes(bytes) => Ok(bytes),
            _ => Err(EncodingError::FieldKindMismatch),
        }
    }

    /// Fails if any fields are left over.
    pub fn finish(mut self) -> EncodingResult<()> {
        match self.0.next() {
            None => Ok(()),
            Some(_) => Err(EncodingError::FieldCountMismatch),
        }
    }
}
