//! File helpers shared by the pipeline.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub enum Compression {
    Gzip,
    Zstd,
}

/// Open a file, possibly compressed. Supports gzip and zstd.
pub fn open_file_for_read<P: AsRef<Path>>(file: P) -> Result<Box<dyn Read>> {
    let reader: Box<dyn Read> = match detect_compression(file.as_ref())? {
        Some(Compression::Gzip) => Box::new(flate2::read::MultiGzDecoder::new(File::open(
            file.as_ref(),
        )?)),
        Some(Compression::Zstd) => {
            Box::new(zstd::stream::read::Decoder::new(File::open(file.as_ref())?)?)
        }
        None => Box::new(File::open(file.as_ref())?),
    };
    Ok(reader)
}

/// Determine the file compression type. Gzip is detected from the magic
/// header, zstd from the file extension.
fn detect_compression(file: &Path) -> Result<Option<Compression>> {
    if flate2::read::MultiGzDecoder::new(File::open(file)?)
        .header()
        .is_some()
    {
        Ok(Some(Compression::Gzip))
    } else if file.extension().is_some_and(|ext| ext == "zst") {
        Ok(Some(Compression::Zstd))
    } else {
        Ok(None)
    }
}
