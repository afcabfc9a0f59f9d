//! # pcload
//!
//! Format-detecting point cloud decoder with a bounded recency cache.
//!
//! Three file formats are decoded into one [`PointCloud`] of parallel
//! position and RGBA color buffers:
//!
//! - `.ply` - self-describing header, ASCII or little-endian binary body
//! - `.splat` - fixed 32- or 56-byte binary records
//! - `.xyz` - plain-text `x y z [r g b]` lines
//!
//! ## Modules
//!
//! - [`util`] - Scalar decoding, math types, errors
//! - [`core`] - The point cloud, progress protocol and recency cache
//! - [`color`] - 8-bit and spherical-harmonics color conversion
//! - [`ply`], [`splat`], [`xyz`] - The format decoders
//! - [`format`] - Extension-based format selection
//! - [`loader`] - Dispatch and the caching [`CloudLoader`]
//! - [`source`] - Byte stream acquisition
//! - [`settings`] - Persistent loader settings
//!
//! ## Example
//!
//! ```ignore
//! use pcload::prelude::*;
//!
//! let mut loader = CloudLoader::from_fs();
//! let cloud = loader.load("scan.ply", &mut |e: ProgressEvent| {
//!     println!("{}/{}", e.loaded, e.total);
//! })?;
//! println!("{} points", cloud.len());
//! ```

pub mod util;
pub mod core;
pub mod color;
pub mod ply;
pub mod splat;
pub mod xyz;
pub mod format;
pub mod source;
pub mod loader;
pub mod settings;

// Re-export commonly used types
pub use crate::core::{PointCloud, ProgressEvent, RecencyCache};
pub use format::Format;
pub use loader::{decode_path, CloudLoader};
pub use util::{Error, ErrorKind, Result};

/// Outcome of one load: the decoded cloud or the failure reason.
pub type LoadOutcome = Result<PointCloud>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{ChannelProgress, NoProgress, PointCloud, Progress, ProgressEvent, RecencyCache};
    pub use crate::format::Format;
    pub use crate::loader::{decode_path, CloudLoader};
    pub use crate::settings::LoaderSettings;
    pub use crate::source::{FsSource, MemorySource, Source};
    pub use crate::util::{Error, ErrorKind, Result, Vec3, Vec4};
}
