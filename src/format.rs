//! Supported file formats and extension-based selection.

use std::fmt;
use std::io::BufRead;
use std::path::Path;

use crate::core::{PointCloud, Progress};
use crate::util::{Error, Result};
use crate::{ply, splat, xyz};

/// Point cloud file format, chosen once per file from its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// Self-describing header, ASCII or little-endian binary body.
    Ply,
    /// Fixed-record binary, 32- or 56-byte records.
    Splat,
    /// Plain-text `x y z [r g b]` lines.
    Xyz,
}

impl Format {
    /// All formats, in the order extensions are listed to users.
    pub const ALL: [Format; 3] = [Format::Ply, Format::Splat, Format::Xyz];

    /// Lowercase file extension without the dot.
    #[inline]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Ply => "ply",
            Self::Splat => "splat",
            Self::Xyz => "xyz",
        }
    }

    /// Match an extension, ignoring ASCII case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }

    /// Select the format for a path.
    ///
    /// Fails with [`Error::UnsupportedFormat`] carrying the lowercased
    /// extension (empty when the path has none).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        Self::from_extension(&ext).ok_or(Error::UnsupportedFormat(ext))
    }

    /// Run this format's decoder over `reader`.
    pub fn decode<R: BufRead>(self, reader: R, progress: &mut dyn Progress) -> Result<PointCloud> {
        match self {
            Self::Ply => ply::decode(reader, progress),
            Self::Splat => splat::decode(reader, progress),
            Self::Xyz => xyz::decode(reader, progress),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ply => "PLY",
            Self::Splat => "SPLAT",
            Self::Xyz => "XYZ",
        })
    }
}
