// NDAT writer
// Streams (features, labels) records to disk, then rewrites the header with
// the count actually written

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::dataset::builder::ExampleBuilder;
use crate::dataset::header::{ElementFormat, NdatHeader};
use crate::error::Result;

/// Write every example the builder yields to `path`
///
/// A placeholder header goes out first so records can stream behind it; once
/// the stream ends the header is rewritten with the actual record count.
/// Writing the count last means a partially written file never claims more
/// records than its body holds.
///
/// Returns the number of records written.
pub fn write_ndat(
    path: &Path,
    builder: &mut ExampleBuilder,
    feature_format: ElementFormat,
    label_format: ElementFormat,
) -> Result<u32> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let plan = builder.plan().clone();
    log::info!(
        "Writing {} training examples of feature length {}, and label length {} to {}",
        builder.total_examples(),
        plan.num_features,
        plan.num_labels,
        path.display()
    );

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut header = NdatHeader::flat(
        plan.num_features as u32,
        feature_format,
        plan.num_labels as u32,
        label_format,
        0,
        plan.label_offset,
    );
    header.write_to(&mut writer)?;

    builder.reset();
    let mut written: u32 = 0;
    while let Some((features, labels)) = builder.next_example() {
        write_elements(&mut writer, &features, feature_format)?;
        write_elements(&mut writer, &labels, label_format)?;
        written += 1;
    }

    // Header goes last: its example count is the validity criterion
    header.num_examples = written;
    writer.seek(SeekFrom::Start(0))?;
    header.write_to(&mut writer)?;
    writer.flush()?;

    log::info!("Write completed successfully!");
    Ok(written)
}

/// Encode a run of values in the declared element format, little-endian
fn write_elements<W: Write>(
    writer: &mut W,
    values: &[f32],
    format: ElementFormat,
) -> std::io::Result<()> {
    match format {
        ElementFormat::F32 => {
            for &value in values {
                writer.write_f32::<LittleEndian>(value)?;
            }
        }
        ElementFormat::I32 => {
            for &value in values {
                writer.write_i32::<LittleEndian>(value as i32)?;
            }
        }
        ElementFormat::I16 => {
            for &value in values {
                writer.write_i16::<LittleEndian>(value as i16)?;
            }
        }
        ElementFormat::I8 => {
            for &value in values {
                writer.write_i8(value as i8)?;
            }
        }
    }
    Ok(())
}
