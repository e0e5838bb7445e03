//! Protocol buffer wire format primitives.
//!
//! Just enough of proto2 to read and write `EntityProto`: varints, fixed
//! 32/64-bit values, length-delimited fields and groups. Unknown fields of
//! any wire type can be skipped.

use crate::{EntityError, EntityResult};

/// Maximum group / embedded message nesting accepted by the decoder.
pub const MAX_NESTING: usize = 64;

const MAX_FIELD_NUMBER: u64 = (1 << 29) - 1;

/// The low three bits of a field tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    Fixed32 = 5,
}

impl WireType {
    fn from_raw(field: u32, raw: u8) -> EntityResult<Self> {
        match raw {
            0 => Ok(Self::Varint),
            1 => Ok(Self::Fixed64),
            2 => Ok(Self::LengthDelimited),
            3 => Ok(Self::StartGroup),
            4 => Ok(Self::EndGroup),
            5 => Ok(Self::Fixed32),
            wire_type => Err(EntityError::InvalidWireType { field, wire_type }),
        }
    }
}

/// Cursor over an encoded message.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Returns true when every byte has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Current byte offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, len: usize) -> EntityResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or(EntityError::Truncated(self.pos))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn read_varint(&mut self) -> EntityResult<u64> {
        let start = self.pos;
        let mut value = 0u64;
        for i in 0..10u32 {
            let byte = *self.buf.get(self.pos).ok_or(EntityError::Truncated(self.pos))?;
            self.pos += 1;
            let shift = i * 7;
            if shift == 63 && byte > 1 {
                return Err(EntityError::VarintOverflow(start));
            }
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(EntityError::VarintOverflow(start))
    }

    /// Reads a field tag, returning the field number and wire type.
    pub fn read_tag(&mut self) -> EntityResult<(u32, WireType)> {
        let at = self.pos;
        let key = self.read_varint()?;
        let number = key >> 3;
        if number == 0 || number > MAX_FIELD_NUMBER {
            return Err(EntityError::InvalidFieldNumber(at));
        }
        let field = number as u32;
        let wire_type = WireType::from_raw(field, (key & 0x7) as u8)?;
        Ok((field, wire_type))
    }

    /// Reads the next tag inside a group, returning `None` at its end tag.
    pub fn read_group_tag(&mut self, group_field: u32) -> EntityResult<Option<(u32, WireType)>> {
        match self.read_tag()? {
            (field, WireType::EndGroup) if field == group_field => Ok(None),
            (field, WireType::EndGroup) => Err(EntityError::UnmatchedGroup(field)),
            tag => Ok(Some(tag)),
        }
    }

    pub fn read_int64(&mut self) -> EntityResult<i64> {
        Ok(self.read_varint()? as i64)
    }

    pub fn read_int32(&mut self) -> EntityResult<i32> {
        Ok(self.read_varint()? as i64 as i32)
    }

    pub fn read_bool(&mut self) -> EntityResult<bool> {
        Ok(self.read_varint()? != 0)
    }

    pub fn read_fixed64(&mut self) -> EntityResult<u64> {
        let bytes = self.take(8)?;
        let mut array = [0u8; 8];
        array.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(array))
    }

    pub fn read_double(&mut self) -> EntityResult<f64> {
        Ok(f64::from_bits(self.read_fixed64()?))
    }

    pub fn read_bytes(&mut self) -> EntityResult<&'a [u8]> {
        let at = self.pos;
        let len = usize::try_from(self.read_varint()?).map_err(|_| EntityError::Truncated(at))?;
        self.take(len)
    }

    /// Reads a length-delimited UTF-8 string.
    pub fn read_string(&mut self, field: u32) -> EntityResult<String> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| EntityError::InvalidUtf8(field))
    }

    /// Skips the payload of a field whose tag was just read.
    pub fn skip(&mut self, field: u32, wire_type: WireType) -> EntityResult<()> {
        self.skip_nested(field, wire_type, 0)
    }

    fn skip_nested(&mut self, field: u32, wire_type: WireType, depth: usize) -> EntityResult<()> {
        match wire_type {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::Fixed64 => {
                self.take(8)?;
            }
            WireType::LengthDelimited => {
                self.read_bytes()?;
            }
            WireType::Fixed32 => {
                self.take(4)?;
            }
            WireType::StartGroup => {
                if depth >= MAX_NESTING {
                    return Err(EntityError::TooDeep(MAX_NESTING));
                }
                while let Some((inner, inner_type)) = self.read_group_tag(field)? {
                    self.skip_nested(inner, inner_type, depth + 1)?;
                }
            }
            WireType::EndGroup => return Err(EntityError::UnmatchedGroup(field)),
        }
        Ok(())
    }
}

/// Append-only message encoder.
#[derive(Debug, Clone, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buf.push((value as u8) | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
    }

    pub fn write_tag(&mut self, field: u32, wire_type: WireType) {
        self.write_varint((u64::from(field) << 3) | wire_type as u64);
    }

    pub fn int64_field(&mut self, field: u32, value: i64) {
        self.write_tag(field, WireType::Varint);
        self.write_varint(value as u64);
    }

    pub fn int32_field(&mut self, field: u32, value: i32) {
        self.int64_field(field, i64::from(value));
    }

    pub fn bool_field(&mut self, field: u32, value: bool) {
        self.write_tag(field, WireType::Varint);
        self.write_varint(u64::from(value));
    }

    pub fn double_field(&mut self, field: u32, value: f64) {
        self.write_tag(field, WireType::Fixed64);
        self.buf.extend_from_slice(&value.to_bits().to_le_bytes());
    }

    pub fn fixed32_field(&mut self, field: u32, value: u32) {
        self.write_tag(field, WireType::Fixed32);
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn bytes_field(&mut self, field: u32, value: &[u8]) {
        self.write_tag(field, WireType::LengthDelimited);
        self.write_varint(value.len() as u64);
        self.buf.extend_from_slice(value);
    }

    pub fn string_field(&mut self, field: u32, value: &str) {
        self.bytes_field(field, value.as_bytes());
    }

    /// Writes a nested message built by `build`.
    pub fn message_field(&mut self, field: u32, build: impl FnOnce(&mut WireWriter)) {
        let mut inner = WireWriter::new();
        build(&mut inner);
        self.bytes_field(field, &inner.buf);
    }

    /// Writes a group whose body is built by `build`.
    pub fn group_field(&mut self, field: u32, build: impl FnOnce(&mut WireWriter)) {
        self.write_tag(field, WireType::StartGroup);
        build(self);
        self.write_tag(field, WireType::EndGroup);
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
