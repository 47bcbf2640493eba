// NDAT header
// Fixed-size self-describing header for the binary example container

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{NdatError, Result};

/// 4-byte ASCII tag that opens every NDAT file
pub const NDAT_MAGIC: &[u8; 4] = b"NDAT";

/// Serialized header size in bytes
pub const HEADER_SIZE: usize = 36;

/// Numeric element format of a feature or label stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementFormat {
    F32,
    I32,
    I16,
    I8,
}

impl ElementFormat {
    /// Wire tag used in the header
    pub fn tag(self) -> u16 {
        match self {
            ElementFormat::F32 => 1,
            ElementFormat::I32 => 2,
            ElementFormat::I16 => 3,
            ElementFormat::I8 => 4,
        }
    }

    pub fn from_tag(tag: u16) -> Result<Self> {
        match tag {
            1 => Ok(ElementFormat::F32),
            2 => Ok(ElementFormat::I32),
            3 => Ok(ElementFormat::I16),
            4 => Ok(ElementFormat::I8),
            other => Err(NdatError::UnknownFormat(other)),
        }
    }

    /// Bytes per element on the wire
    pub fn byte_width(self) -> usize {
        match self {
            ElementFormat::F32 | ElementFormat::I32 => 4,
            ElementFormat::I16 => 2,
            ElementFormat::I8 => 1,
        }
    }
}

/// NDAT container header
///
/// All fields little-endian. `num_examples` is written last by the writer
/// and is the single source of truth for how many records the body holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdatHeader {
    pub num_features: u32,
    pub feature_height: u32,
    pub feature_channels: u16,
    pub feature_format: ElementFormat,
    pub num_labels: u32,
    pub label_height: u32,
    pub label_channels: u16,
    pub label_format: ElementFormat,
    pub num_examples: u32,
    pub label_offset: i32,
}

impl NdatHeader {
    /// Header for a flat (1-high, 1-channel) example stream
    pub fn flat(
        num_features: u32,
        feature_format: ElementFormat,
        num_labels: u32,
        label_format: ElementFormat,
        num_examples: u32,
        label_offset: i32,
    ) -> Self {
        NdatHeader {
            num_features,
            feature_height: 1,
            feature_channels: 1,
            feature_format,
            num_labels,
            label_height: 1,
            label_channels: 1,
            label_format,
            num_examples,
            label_offset,
        }
    }

    /// Bytes occupied by one (features, labels) record
    pub fn record_bytes(&self) -> u64 {
        self.num_features as u64 * self.feature_format.byte_width() as u64
            + self.num_labels as u64 * self.label_format.byte_width() as u64
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(NDAT_MAGIC)?;
        writer.write_u32::<LittleEndian>(self.num_features)?;
        writer.write_u32::<LittleEndian>(self.feature_height)?;
        writer.write_u16::<LittleEndian>(self.feature_channels)?;
        writer.write_u16::<LittleEndian>(self.feature_format.tag())?;
        writer.write_u32::<LittleEndian>(self.num_labels)?;
        writer.write_u32::<LittleEndian>(self.label_height)?;
        writer.write_u16::<LittleEndian>(self.label_channels)?;
        writer.write_u16::<LittleEndian>(self.label_format.tag())?;
        writer.write_u32::<LittleEndian>(self.num_examples)?;
        writer.write_i32::<LittleEndian>(self.label_offset)?;
        Ok(())
    }

    /// Parse a header, validating the magic tag before anything else
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != NDAT_MAGIC {
            return Err(NdatError::CorruptHeader(
                String::from_utf8_lossy(&magic).into_owned(),
            ));
        }

        let num_features = reader.read_u32::<LittleEndian>()?;
        let feature_height = reader.read_u32::<LittleEndian>()?;
        let feature_channels = reader.read_u16::<LittleEndian>()?;
        let feature_format = ElementFormat::from_tag(reader.read_u16::<LittleEndian>()?)?;
        let num_labels = reader.read_u32::<LittleEndian>()?;
        let label_height = reader.read_u32::<LittleEndian>()?;
        let label_channels = reader.read_u16::<LittleEndian>()?;
        let label_format = ElementFormat::from_tag(reader.read_u16::<LittleEndian>()?)?;
        let num_examples = reader.read_u32::<LittleEndian>()?;
        let label_offset = reader.read_i32::<LittleEndian>()?;

        Ok(NdatHeader {
            num_features,
            feature_height,
            feature_channels,
            feature_format,
            num_labels,
            label_height,
            label_channels,
            label_format,
            num_examples,
            label_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_round_trip() {
        let header = NdatHeader::flat(5512, ElementFormat::F32, 5512, ElementFormat::I8, 321, -40);

        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);

        let parsed = NdatHeader::read_from(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_bad_magic_is_corrupt_header() {
        let header = NdatHeader::flat(10, ElementFormat::F32, 10, ElementFormat::F32, 1, 0);
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        bytes[..4].copy_from_slice(b"XXXX");

        let result = NdatHeader::read_from(&mut Cursor::new(&bytes));
        match result {
            Err(NdatError::CorruptHeader(id)) => assert_eq!(id, "XXXX"),
            other => panic!("expected CorruptHeader, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_format_tag_rejected() {
        let header = NdatHeader::flat(10, ElementFormat::F32, 10, ElementFormat::F32, 1, 0);
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        // Feature format tag sits at offset 14
        bytes[14] = 9;
        bytes[15] = 0;

        let result = NdatHeader::read_from(&mut Cursor::new(&bytes));
        assert!(matches!(result, Err(NdatError::UnknownFormat(9))));
    }

    #[test]
    fn test_record_bytes_accounts_for_both_formats() {
        let header = NdatHeader::flat(100, ElementFormat::F32, 50, ElementFormat::I16, 0, 0);
        assert_eq!(header.record_bytes(), 100 * 4 + 50 * 2);
    }

    #[test]
    fn test_layout_is_little_endian_at_fixed_offsets() {
        let header = NdatHeader::flat(0x0102, ElementFormat::I16, 7, ElementFormat::I8, 3, 0);
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();

        assert_eq!(&bytes[..4], b"NDAT");
        // num_features u32 LE at offset 4
        assert_eq!(&bytes[4..8], &[0x02, 0x01, 0x00, 0x00]);
        // feature format tag u16 LE at offset 14
        assert_eq!(&bytes[14..16], &[3, 0]);
        // num_examples u32 LE at offset 28
        assert_eq!(&bytes[28..32], &[3, 0, 0, 0]);
    }
}
