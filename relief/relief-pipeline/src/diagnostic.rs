//! Scoped diagnostic depth dumps.
//!
//! When cleanup empties a mesh, the raw depth grid is persisted so the
//! failure can be inspected offline. The dump is a scoped resource: the
//! temporary file is kept only after every byte was written and its path
//! is reported in the error; any partial write is dropped and the file
//! deleted with it.
//!
//! # Dump Format
//!
//! ```text
//! UINT8[4]    – Magic "RDG1"
//! UINT32      – Height (little-endian)
//! UINT32      – Width (little-endian)
//! FLOAT32[]   – Row-major depth values (little-endian)
//! ```

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use relief_types::DepthGrid;
use tracing::warn;

/// Dump file magic.
const DUMP_MAGIC: &[u8; 4] = b"RDG1";

/// Best-effort persistence of a raw depth grid.
///
/// Returns the kept dump path, or `None` when writing failed (the
/// partially written temporary file is deleted on drop). Failures are
/// logged, never propagated: the dump decorates an error that is already
/// on its way to the caller.
pub(crate) fn persist_depth_dump(depth: &DepthGrid) -> Option<PathBuf> {
    match write_dump(depth) {
        Ok(path) => Some(path),
        Err(error) => {
            warn!(%error, "failed to persist diagnostic depth dump");
            None
        }
    }
}

fn write_dump(depth: &DepthGrid) -> io::Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("relief-depth-")
        .suffix(".rdg")
        .tempfile()?;

    {
        let mut writer = BufWriter::new(file.as_file_mut());
        writer.write_all(DUMP_MAGIC)?;
        writer.write_all(&dimension_bytes(depth.height())?)?;
        writer.write_all(&dimension_bytes(depth.width())?)?;
        for &value in depth.values() {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.flush()?;
    }

    let (_, path) = file.keep().map_err(|e| e.error)?;
    Ok(path)
}

fn dimension_bytes(dim: usize) -> io::Result<[u8; 4]> {
    u32::try_from(dim)
        .map(u32::to_le_bytes)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "grid dimension exceeds u32"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn dump_roundtrips_header_and_values() {
        let depth = DepthGrid::from_values(2, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let path = persist_depth_dump(&depth).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], DUMP_MAGIC);
        assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 2);
        assert_eq!(
            u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            3
        );
        assert_eq!(bytes.len(), 12 + 6 * 4);

        let last = f32::from_le_bytes([bytes[32], bytes[33], bytes[34], bytes[35]]);
        assert_eq!(last, 5.0);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn dump_survives_nan_values() {
        // The dump exists precisely for broken grids; NaN payloads must
        // still be written verbatim.
        let depth = DepthGrid::from_values(1, 2, vec![f32::NAN, 1.0]).unwrap();
        let path = persist_depth_dump(&depth).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let first = f32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
        assert!(first.is_nan());

        std::fs::remove_file(path).unwrap();
    }
}
