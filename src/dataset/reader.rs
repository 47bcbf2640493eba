// NDAT reader
// Reconstructs the typed feature/label arrays a writer streamed out

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::dataset::header::{ElementFormat, NdatHeader, HEADER_SIZE};
use crate::error::{NdatError, Result};

/// One decoded element run in its native numeric type
#[derive(Debug, Clone, PartialEq)]
pub enum ElementArray {
    F32(Vec<f32>),
    I32(Vec<i32>),
    I16(Vec<i16>),
    I8(Vec<i8>),
}

impl ElementArray {
    pub fn len(&self) -> usize {
        match self {
            ElementArray::F32(v) => v.len(),
            ElementArray::I32(v) => v.len(),
            ElementArray::I16(v) => v.len(),
            ElementArray::I8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            ElementArray::F32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<&[i32]> {
        match self {
            ElementArray::I32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<&[i16]> {
        match self {
            ElementArray::I16(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<&[i8]> {
        match self {
            ElementArray::I8(v) => Some(v),
            _ => None,
        }
    }
}

/// A fully decoded NDAT file
#[derive(Debug, Clone)]
pub struct TrainingData {
    pub header: NdatHeader,
    pub features: Vec<ElementArray>,
    pub labels: Vec<ElementArray>,
}

/// Read an NDAT file back into typed arrays
///
/// The magic tag is validated before any record is touched; a body shorter
/// than the header promises fails with `TruncatedFile`.
pub fn read_ndat(path: &Path) -> Result<TrainingData> {
    if !path.exists() {
        return Err(NdatError::FileNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    if file_len < HEADER_SIZE as u64 {
        return Err(NdatError::TruncatedFile {
            expected: HEADER_SIZE as u64,
            actual: file_len,
        });
    }

    let mut reader = BufReader::new(file);
    let header = NdatHeader::read_from(&mut reader)?;

    let expected_body = header.num_examples as u64 * header.record_bytes();
    let actual_body = file_len - HEADER_SIZE as u64;
    if actual_body < expected_body {
        return Err(NdatError::TruncatedFile {
            expected: expected_body,
            actual: actual_body,
        });
    }

    let mut features = Vec::with_capacity(header.num_examples as usize);
    let mut labels = Vec::with_capacity(header.num_examples as usize);

    for _ in 0..header.num_examples {
        features.push(read_elements(
            &mut reader,
            header.num_features as usize,
            header.feature_format,
        )?);
        labels.push(read_elements(
            &mut reader,
            header.num_labels as usize,
            header.label_format,
        )?);
    }

    Ok(TrainingData {
        header,
        features,
        labels,
    })
}

fn read_elements<R: Read>(
    reader: &mut R,
    count: usize,
    format: ElementFormat,
) -> std::io::Result<ElementArray> {
    Ok(match format {
        ElementFormat::F32 => {
            let mut values = vec![0.0f32; count];
            reader.read_f32_into::<LittleEndian>(&mut values)?;
            ElementArray::F32(values)
        }
        ElementFormat::I32 => {
            let mut values = vec![0i32; count];
            reader.read_i32_into::<LittleEndian>(&mut values)?;
            ElementArray::I32(values)
        }
        ElementFormat::I16 => {
            let mut values = vec![0i16; count];
            reader.read_i16_into::<LittleEndian>(&mut values)?;
            ElementArray::I16(values)
        }
        ElementFormat::I8 => {
            let mut values = vec![0i8; count];
            reader.read_i8_into(&mut values)?;
            ElementArray::I8(values)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::builder::ExampleBuilder;
    use crate::dataset::plan::WindowPlan;
    use crate::dataset::writer::write_ndat;
    use crate::markers::timeline::Marker;
    use crate::markers::{MarkerTimeline, NUM_ARTICULATIONS};
    use std::io::Write as _;

    fn marker_at(pos: usize) -> Marker {
        let mut labels = vec![0; NUM_ARTICULATIONS];
        labels[0] = 1;
        Marker { pos, labels }
    }

    /// Audio of small integral values so integer formats round-trip exactly
    fn integral_builder() -> ExampleBuilder {
        let audio: Vec<f32> = (0..1000).map(|i| (i % 100) as f32).collect();
        let markers = MarkerTimeline::new(vec![marker_at(10), marker_at(420)]);
        let plan = WindowPlan::compute(1000, 300, 300, 4);
        ExampleBuilder::new(audio, &markers, plan, 0)
    }

    fn drain(builder: &mut ExampleBuilder) -> Vec<(Vec<f32>, Vec<f32>)> {
        builder.reset();
        let mut out = Vec::new();
        while let Some(example) = builder.next_example() {
            out.push(example);
        }
        out
    }

    #[test]
    fn test_round_trip_f32_f32() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rt.ndat");

        let mut builder = integral_builder();
        write_ndat(&path, &mut builder, ElementFormat::F32, ElementFormat::F32).unwrap();
        let expected = drain(&mut builder);

        let data = read_ndat(&path).unwrap();
        assert_eq!(data.header.num_examples as usize, expected.len());
        for (i, (features, labels)) in expected.iter().enumerate() {
            assert_eq!(data.features[i].as_f32().unwrap(), features.as_slice());
            assert_eq!(data.labels[i].as_f32().unwrap(), labels.as_slice());
        }
    }

    #[test]
    fn test_round_trip_every_integer_format() {
        let dir = tempfile::tempdir().unwrap();

        for (feature_format, label_format) in [
            (ElementFormat::I32, ElementFormat::I32),
            (ElementFormat::I16, ElementFormat::I16),
            (ElementFormat::I8, ElementFormat::I8),
            (ElementFormat::F32, ElementFormat::I8),
        ] {
            let path = dir
                .path()
                .join(format!("rt_{}_{}.ndat", feature_format.tag(), label_format.tag()));

            let mut builder = integral_builder();
            write_ndat(&path, &mut builder, feature_format, label_format).unwrap();
            let expected = drain(&mut builder);

            let data = read_ndat(&path).unwrap();
            assert_eq!(data.header.feature_format, feature_format);
            assert_eq!(data.header.label_format, label_format);

            for (i, (features, labels)) in expected.iter().enumerate() {
                match &data.features[i] {
                    ElementArray::F32(v) => assert_eq!(v, features),
                    ElementArray::I32(v) => {
                        let expected: Vec<i32> = features.iter().map(|&f| f as i32).collect();
                        assert_eq!(v, &expected);
                    }
                    ElementArray::I16(v) => {
                        let expected: Vec<i16> = features.iter().map(|&f| f as i16).collect();
                        assert_eq!(v, &expected);
                    }
                    ElementArray::I8(v) => {
                        let expected: Vec<i8> = features.iter().map(|&f| f as i8).collect();
                        assert_eq!(v, &expected);
                    }
                }
                match &data.labels[i] {
                    ElementArray::F32(v) => assert_eq!(v, labels),
                    ElementArray::I32(v) => {
                        let expected: Vec<i32> = labels.iter().map(|&f| f as i32).collect();
                        assert_eq!(v, &expected);
                    }
                    ElementArray::I16(v) => {
                        let expected: Vec<i16> = labels.iter().map(|&f| f as i16).collect();
                        assert_eq!(v, &expected);
                    }
                    ElementArray::I8(v) => {
                        let expected: Vec<i8> = labels.iter().map(|&f| f as i8).collect();
                        assert_eq!(v, &expected);
                    }
                }
            }
        }
    }

    #[test]
    fn test_bad_magic_fails_before_reading_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ndat");

        let mut builder = integral_builder();
        write_ndat(&path, &mut builder, ElementFormat::F32, ElementFormat::F32).unwrap();

        // Stamp a bogus magic over a file whose body is valid
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[..4].copy_from_slice(b"XXXX");
        std::fs::write(&path, &bytes).unwrap();

        let result = read_ndat(&path);
        assert!(matches!(result, Err(NdatError::CorruptHeader(_))));
    }

    #[test]
    fn test_short_body_is_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.ndat");

        let mut builder = integral_builder();
        write_ndat(&path, &mut builder, ElementFormat::F32, ElementFormat::F32).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let mut file = File::create(&path).unwrap();
        file.write_all(&bytes[..bytes.len() - 64]).unwrap();

        let result = read_ndat(&path);
        assert!(matches!(result, Err(NdatError::TruncatedFile { .. })));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = read_ndat(Path::new("/no/such/file.ndat"));
        assert!(matches!(result, Err(NdatError::FileNotFound(_))));
    }
}
