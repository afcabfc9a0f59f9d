//! SPLAT fixed-record binary decoding.
//!
//! Two headerless little-endian layouts exist, told apart by file size and,
//! when the size fits both, by a content heuristic:
//!
//! ```text
//! Standard, 32 bytes          Extended, 56 bytes
//! 0   position  3 x f32       0   position  3 x f32
//! 12  scale     3 x f32       12  scale     3 x f32
//! 24  rgba      4 x u8        24  rotation  4 x f32
//! 28  rotation  4 x u8        40  rgb       3 x f32
//!                             52  opacity   f32
//! ```
//!
//! Scale and rotation are not decoded. Y is negated on read in both layouts
//! to turn the files' Y-down convention into Y-up.

use std::io::Read;

use crate::color::normalize_u8;
use crate::core::{Pacer, PointCloud, Progress, SPLAT_PROGRESS_INTERVAL};
use crate::util::{read_f32_le, Error, Result, Vec3, Vec4};

/// Record layout of a SPLAT file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplatLayout {
    /// 32-byte records, 8-bit RGBA color.
    Standard,
    /// 56-byte records, float RGB plus opacity.
    Extended,
}

impl SplatLayout {
    /// Bytes per record.
    #[inline]
    pub const fn record_size(self) -> usize {
        match self {
            Self::Standard => 32,
            Self::Extended => 56,
        }
    }

    /// Pick the layout for a file from its full contents.
    ///
    /// When the size is a multiple of both record sizes, bytes 24..28 are
    /// read as an f32. A value in `[-1, 1]` looks like a quaternion
    /// component (Extended); anything else, NaN included, is taken to be
    /// four independent RGBA bytes (Standard). This is a heuristic, not a
    /// format marker.
    pub fn detect(bytes: &[u8]) -> Result<Self> {
        let size = bytes.len();
        let standard = size % Self::Standard.record_size() == 0;
        let extended = size % Self::Extended.record_size() == 0;

        match (standard, extended) {
            (true, false) => Ok(Self::Standard),
            (false, true) => Ok(Self::Extended),
            (false, false) => Err(Error::SizeMismatch(size as u64)),
            // Only an empty file is a multiple of both and shorter than 56 bytes
            (true, true) if size < Self::Extended.record_size() => Ok(Self::Standard),
            (true, true) => {
                let probe = read_f32_le(bytes, 24);
                let layout = if probe.is_some_and(|v| (-1.0..=1.0).contains(&v)) {
                    Self::Extended
                } else {
                    Self::Standard
                };
                tracing::debug!(size, ?probe, ?layout, "ambiguous SPLAT size, resolved by content");
                Ok(layout)
            }
        }
    }

    /// Decode one record. `record` is exactly [`Self::record_size`] bytes.
    #[inline]
    fn read_point(self, record: &[u8]) -> (Vec3, Vec4) {
        let f = |offset| read_f32_le(record, offset).unwrap_or(0.0);
        let position = Vec3::new(f(0), -f(4), f(8));
        let color = match self {
            Self::Standard => Vec4::new(
                normalize_u8(record[24] as f32),
                normalize_u8(record[25] as f32),
                normalize_u8(record[26] as f32),
                normalize_u8(record[27] as f32),
            ),
            Self::Extended => Vec4::new(f(40), f(44), f(48), f(52)),
        };
        (position, color)
    }
}

/// Decode a SPLAT stream. The whole stream is read into memory first.
pub fn decode<R: Read>(mut reader: R, progress: &mut dyn Progress) -> Result<PointCloud> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_bytes(&bytes, progress)
}

/// Decode SPLAT records from an in-memory buffer.
pub fn decode_bytes(bytes: &[u8], progress: &mut dyn Progress) -> Result<PointCloud> {
    let layout = SplatLayout::detect(bytes)?;
    let count = bytes.len() / layout.record_size();
    tracing::debug!(?layout, count, "decoding SPLAT records");

    let mut cloud = PointCloud::with_capacity(count);
    let mut pacer = Pacer::new(progress, SPLAT_PROGRESS_INTERVAL, count);
    for record in bytes.chunks_exact(layout.record_size()) {
        let (p, c) = layout.read_point(record);
        cloud.push(p, c);
        pacer.tick();
    }
    pacer.finish();
    Ok(cloud)
}
