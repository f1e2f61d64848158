//! Disk-backed thumbnail cache, laid out like the freedesktop thumbnail directories.
//!
//! Thumbnails live under `<root>/{normal,large}/<md5>.png`, where the hash is taken over
//! the `file://` URI of the source. A cached file is trusted only while its modification
//! time equals the source's, so editing the source invalidates it.
use std::ffi::OsString;
use std::fs::{self, FileTimes};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use image::{DynamicImage, ImageError};
use thiserror::Error;

use crate::options::ImageSize;

mod codec;

pub use codec::{ImageCodec, ImageCrateCodec};

/// Boxes with a longer edge are scaled on every request and never cached
pub const MAX_CACHED_EDGE: u32 = 256;
const NORMAL_EDGE: u32 = 128;

//------------------------------------------------------------------------------
/// Size class subdirectory of the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    /// Boxes up to 128 pixels
    Normal,
    /// Boxes up to 256 pixels
    Large,
}

impl SizeClass {
    /// Class a target box is cached in
    pub fn for_box(size: ImageSize) -> Self {
        if size.long_edge() > NORMAL_EDGE {
            SizeClass::Large
        } else {
            SizeClass::Normal
        }
    }

    /// Name of the subdirectory
    pub fn dir_name(self) -> &'static str {
        match self {
            SizeClass::Normal => "normal",
            SizeClass::Large => "large",
        }
    }
}

/// A decoded image, already fitted into the requested box
#[derive(Debug, Clone)]
pub struct Thumbnail {
    image: DynamicImage,
}

impl Thumbnail {
    fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The pixels
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Consumes the thumbnail, returning its pixels
    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

/// Reasons a thumbnail could not be produced
#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// Neither `XDG_CACHE_HOME` nor a home directory is known
    #[error("no cache directory: XDG_CACHE_HOME is unset and the home directory is unknown")]
    NoCacheRoot,
    /// The target box has no area
    #[error("empty target box {0}")]
    EmptyBox(ImageSize),
    /// Filesystem failure
    #[error("{}: {source}", .path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
    /// Decoding or encoding failure
    #[error("{}: {source}", .path.display())]
    Image {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: ImageError,
    },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ThumbnailError + '_ {
    move |source| ThumbnailError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn image_error(path: &Path) -> impl FnOnce(ImageError) -> ThumbnailError + '_ {
    move |source| ThumbnailError::Image {
        path: path.to_path_buf(),
        source,
    }
}

//------------------------------------------------------------------------------
/// Resolves images to thumbnails, going through the on-disk cache when the box is small
/// enough.
pub struct ThumbnailCache {
    root: Option<PathBuf>,
    codec: Box<dyn ImageCodec>,
}

impl Default for ThumbnailCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ThumbnailCache {
    /// Creates a cache rooted at the user's thumbnail directory
    pub fn new() -> Self {
        let root = cache_root();
        debug!("thumbnail cache root: {root:?}");
        Self {
            root,
            codec: Box::new(ImageCrateCodec),
        }
    }

    /// Creates a cache rooted at `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            codec: Box::new(ImageCrateCodec),
        }
    }

    /// Replaces the codec
    pub fn codec(mut self, codec: impl ImageCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// The cache root, if one is known
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Where the thumbnail of `source` for `size` is stored
    pub fn cache_path(&self, source: &Path, size: ImageSize) -> Result<PathBuf, ThumbnailError> {
        let root = self.root.as_deref().ok_or(ThumbnailError::NoCacheRoot)?;
        let key = cache_key(source).map_err(io_error(source))?;
        Ok(root
            .join(SizeClass::for_box(size).dir_name())
            .join(format!("{key}.png")))
    }

    /// Returns a thumbnail of `source` fitted into `size`, or `None` if anything failed.
    ///
    /// Failures are logged and never fatal.
    pub fn resolve(&self, source: &Path, size: ImageSize) -> Option<Thumbnail> {
        match self.try_resolve(source, size) {
            Ok(thumbnail) => Some(thumbnail),
            Err(e) => {
                warn!("thumbnail unavailable: {e}");
                None
            }
        }
    }

    /// Like [`ThumbnailCache::resolve`], reporting why it failed
    pub fn try_resolve(&self, source: &Path, size: ImageSize) -> Result<Thumbnail, ThumbnailError> {
        if size.is_empty() {
            return Err(ThumbnailError::EmptyBox(size));
        }

        if size.long_edge() > MAX_CACHED_EDGE {
            trace!("thumbnail: {size} is too large to cache, scaling {}", source.display());
            let image = self.codec.decode(source).map_err(image_error(source))?;
            return Ok(Thumbnail::new(fit(image, size)));
        }

        let cache_path = self.cache_path(source, size)?;
        if let Some(thumbnail) = self.load_cached(&cache_path, source, size) {
            trace!("thumbnail: cache hit {}", cache_path.display());
            return Ok(thumbnail);
        }
        self.generate(source, &cache_path, size)
    }

    /// Loads a usable cached thumbnail. Stale files are deleted.
    fn load_cached(&self, cache_path: &Path, source: &Path, size: ImageSize) -> Option<Thumbnail> {
        let cached_mtime = fs::metadata(cache_path).and_then(|m| mtime_secs(&m)).ok()?;
        let source_mtime = fs::metadata(source).and_then(|m| mtime_secs(&m)).ok()?;

        if cached_mtime != source_mtime {
            debug!("thumbnail: {} is stale, removing", cache_path.display());
            if let Err(e) = fs::remove_file(cache_path) {
                debug!("thumbnail: could not remove {}: {e}", cache_path.display());
            }
            return None;
        }

        let image = match self.codec.decode(cache_path) {
            Ok(image) => image,
            Err(e) => {
                debug!("thumbnail: unreadable cache file {}: {e}", cache_path.display());
                return None;
            }
        };

        if image.width() < size.width && image.height() < size.height {
            debug!(
                "thumbnail: cached {}x{} is smaller than {size}",
                image.width(),
                image.height()
            );
            return None;
        }
        Some(Thumbnail::new(fit(image, size)))
    }

    /// Decodes `source`, fits it into `size` and stores it at `cache_path`.
    ///
    /// Sources smaller than the box in both dimensions are returned without being stored.
    /// A failure to store is logged; the thumbnail is still returned.
    pub fn generate(&self, source: &Path, cache_path: &Path, size: ImageSize) -> Result<Thumbnail, ThumbnailError> {
        let image = self.codec.decode(source).map_err(image_error(source))?;
        let undersized = image.width() < size.width && image.height() < size.height;
        let image = fit(image, size);

        if undersized {
            debug!("thumbnail: {} is smaller than {size}, not caching", source.display());
        } else if let Err(e) = self.persist(&image, source, cache_path) {
            warn!("thumbnail: could not store {}: {e}", cache_path.display());
        }
        Ok(Thumbnail::new(image))
    }

    /// Writes `image` to `cache_path` with the source's timestamps.
    ///
    /// The file is written next to its destination and renamed into place.
    fn persist(&self, image: &DynamicImage, source: &Path, cache_path: &Path) -> Result<(), ThumbnailError> {
        let dir = cache_path.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(dir).map_err(io_error(dir))?;
        let source_meta = fs::metadata(source).map_err(io_error(source))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".thumbnail-")
            .suffix(".png")
            .tempfile_in(dir)
            .map_err(io_error(dir))?;

        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            self.codec
                .encode_png(image, &mut writer)
                .map_err(image_error(cache_path))?;
            writer.flush().map_err(io_error(cache_path))?;
        }

        let mut times = FileTimes::new().set_modified(source_meta.modified().map_err(io_error(source))?);
        if let Ok(accessed) = source_meta.accessed() {
            times = times.set_accessed(accessed);
        }
        tmp.as_file().set_times(times).map_err(io_error(tmp.path()))?;

        tmp.persist(cache_path).map_err(|e| ThumbnailError::Io {
            path: cache_path.to_path_buf(),
            source: e.error,
        })?;
        debug!("thumbnail: stored {}", cache_path.display());
        Ok(())
    }

    /// Resolves every image once to fill the cache, skipping consecutive repeats.
    ///
    /// Does nothing for boxes that are never cached. Returns how many images were resolved.
    pub fn pregenerate<'a, I>(&self, images: I, size: ImageSize) -> usize
    where
        I: IntoIterator<Item = &'a Path>,
    {
        if size.is_empty() || size.long_edge() > MAX_CACHED_EDGE {
            return 0;
        }

        let mut last: Option<&Path> = None;
        let mut count = 0;
        for image in images {
            if last == Some(image) {
                continue;
            }
            last = Some(image);
            info!("generating thumbnail for: {}", image.display());
            self.resolve(image, size);
            count += 1;
        }
        count
    }
}

//------------------------------------------------------------------------------
/// Scales `image` down to fit `size`, keeping its aspect ratio. Never enlarges.
fn fit(image: DynamicImage, size: ImageSize) -> DynamicImage {
    if image.width() > size.width || image.height() > size.height {
        image.thumbnail(size.width, size.height)
    } else {
        image
    }
}

/// Modification time, in whole seconds relative to the epoch
fn mtime_secs(meta: &fs::Metadata) -> io::Result<i64> {
    let modified = meta.modified()?;
    Ok(match modified.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    })
}

/// Hex MD5 of the `file://` URI of `source`
pub fn cache_key(source: &Path) -> io::Result<String> {
    let absolute = std::path::absolute(source)?;
    let mut uri = b"file://".to_vec();
    uri.extend_from_slice(absolute.as_os_str().as_encoded_bytes());
    Ok(format!("{:x}", md5::compute(&uri)))
}

/// The user's thumbnail directory: `$XDG_CACHE_HOME/thumbnails`, else `~/.thumbnails`
pub fn cache_root() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir);
    cache_root_from(std::env::var_os("XDG_CACHE_HOME"), home)
}

/// [`cache_root`] with explicit environment values. An empty `XDG_CACHE_HOME` counts as unset.
pub fn cache_root_from(xdg_cache_home: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    match xdg_cache_home.filter(|dir| !dir.is_empty()) {
        Some(dir) => Some(PathBuf::from(dir).join("thumbnails")),
        None => home.map(|home| home.join(".thumbnails")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_class() {
        assert_eq!(SizeClass::for_box(ImageSize::square(86)), SizeClass::Normal);
        assert_eq!(SizeClass::for_box(ImageSize::new(128, 40)), SizeClass::Normal);
        assert_eq!(SizeClass::for_box(ImageSize::new(40, 129)), SizeClass::Large);
        assert_eq!(SizeClass::Large.dir_name(), "large");
    }

    #[test]
    fn test_cache_key() {
        // md5("file:///home/user/a.png")
        let key = cache_key(Path::new("/home/user/a.png")).unwrap();
        assert_eq!(key, format!("{:x}", md5::compute(b"file:///home/user/a.png")));
        assert_eq!(key.len(), 32);
    }

    #[test]
    fn test_cache_key_relative_is_absolutized() {
        let relative = cache_key(Path::new("a.png")).unwrap();
        let absolute = cache_key(&std::env::current_dir().unwrap().join("a.png")).unwrap();
        assert_eq!(relative, absolute);
    }

    #[test]
    fn test_cache_root_from() {
        assert_eq!(
            cache_root_from(Some("/xdg".into()), Some("/home/u".into())),
            Some(PathBuf::from("/xdg/thumbnails"))
        );
        assert_eq!(
            cache_root_from(Some("".into()), Some("/home/u".into())),
            Some(PathBuf::from("/home/u/.thumbnails"))
        );
        assert_eq!(cache_root_from(None, None), None);
    }

    #[test]
    fn test_fit_never_enlarges() {
        let small = DynamicImage::new_rgb8(20, 10);
        let fitted = fit(small, ImageSize::square(86));
        assert_eq!((fitted.width(), fitted.height()), (20, 10));

        let wide = DynamicImage::new_rgb8(400, 200);
        let fitted = fit(wide, ImageSize::square(100));
        assert_eq!((fitted.width(), fitted.height()), (100, 50));
    }

    #[test]
    fn test_empty_box() {
        let cache = ThumbnailCache::with_root("/nonexistent");
        assert!(matches!(
            cache.try_resolve(Path::new("/x.png"), ImageSize::new(0, 10)),
            Err(ThumbnailError::EmptyBox(_))
        ));
    }

    #[test]
    fn test_no_root() {
        let cache = ThumbnailCache {
            root: None,
            codec: Box::new(ImageCrateCodec),
        };
        assert!(matches!(
            cache.try_resolve(Path::new("/x.png"), ImageSize::square(64)),
            Err(ThumbnailError::NoCacheRoot)
        ));
    }
}
