//! Path-level loading: format dispatch and the caching loader.

use std::path::Path;
use std::sync::Arc;

use crate::core::{PointCloud, Progress, RecencyCache};
use crate::format::Format;
use crate::settings::LoaderSettings;
use crate::source::{FsSource, Source};
use crate::util::{Error, Result};

/// Decode the file at `path`, choosing the decoder from its extension.
///
/// The extension is checked before the stream is opened, and an
/// unopenable stream never reaches a decoder. The stream is dropped on
/// every return path.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn decode_path<S: Source + ?Sized>(
    source: &S,
    path: &Path,
    progress: &mut dyn Progress,
) -> Result<PointCloud> {
    let format = Format::from_path(path)?;
    let stream = source.open(path).map_err(|e| {
        tracing::debug!(error = %e, "open failed");
        Error::StreamUnavailable(path.to_path_buf())
    })?;
    let cloud = format.decode(stream, progress)?;
    tracing::debug!(%format, points = cloud.len(), "decoded");
    Ok(cloud)
}

/// Loads clouds through a [`RecencyCache`].
///
/// Cache hits return the shared cloud without touching the source or
/// emitting progress. Misses are decoded, centered (when enabled) and then
/// cached, so hits never re-center. A failed load leaves the cache as it was.
#[derive(Debug)]
pub struct CloudLoader<S = FsSource> {
    source: S,
    cache: RecencyCache,
    settings: LoaderSettings,
}

impl CloudLoader<FsSource> {
    /// Filesystem loader with default settings.
    pub fn from_fs() -> Self {
        Self::new(FsSource, LoaderSettings::default())
    }
}

impl<S: Source> CloudLoader<S> {
    pub fn new(source: S, settings: LoaderSettings) -> Self {
        Self {
            source,
            cache: RecencyCache::with_capacity(settings.cache_capacity),
            settings,
        }
    }

    /// Load `path`, from the cache when possible.
    pub fn load(&mut self, path: impl AsRef<Path>, progress: &mut dyn Progress) -> Result<Arc<PointCloud>> {
        let path = path.as_ref();
        if let Some(cloud) = self.cache.get(path) {
            tracing::debug!(path = %path.display(), "cache hit");
            return Ok(cloud);
        }

        let mut cloud = decode_path(&self.source, path, progress)?;
        if self.settings.center_on_load {
            let offset = cloud.center();
            tracing::trace!(path = %path.display(), ?offset, "centered");
        }

        let cloud = Arc::new(cloud);
        self.cache.put(path, Arc::clone(&cloud));
        Ok(cloud)
    }

    /// Decode `path` without consulting or filling the cache.
    ///
    /// The result is exactly what the decoder produced, not centered.
    pub fn decode_uncached(&self, path: impl AsRef<Path>, progress: &mut dyn Progress) -> Result<PointCloud> {
        decode_path(&self.source, path.as_ref(), progress)
    }

    #[inline]
    pub fn cache(&self) -> &RecencyCache {
        &self.cache
    }

    #[inline]
    pub fn cache_mut(&mut self) -> &mut RecencyCache {
        &mut self.cache
    }

    #[inline]
    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[inline]
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
