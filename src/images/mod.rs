//! Image normalization and storage
//!
//! Turns an arbitrary raster into two deterministic square JPEG variants:
//! full-size 800x800 at quality 85 and thumbnail 200x200 at quality 75.
//! A center crop keeps the source aspect ratio from distorting the square
//! output. Variants are stored as a pair or not at all.

pub mod cleanup;

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use uuid::Uuid;

use crate::constants::{
    FULL_IMAGE_QUALITY, FULL_IMAGE_SIZE, THUMBNAIL_QUALITY, THUMBNAIL_SIZE, THUMBNAIL_SUFFIX,
    UPLOADS_URL_PREFIX,
};

pub use cleanup::{CleanupReport, delete_variants};

/// Errors from the media path. Always non-fatal to a generation request:
/// the orchestrator logs these and keeps the textual recipe.
#[derive(Debug)]
pub enum ImageError {
    /// The image provider call failed or returned nothing usable
    Synthesis(String),
    /// The image bytes could not be retrieved or base64-decoded
    Download(String),
    /// The bytes were not a recognized raster format
    Decode(String),
    /// Re-encoding a variant failed
    Encode(String),
    /// Filesystem trouble while writing variants
    Io(std::io::Error),
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageError::Synthesis(detail) => write!(f, "image synthesis failed: {detail}"),
            ImageError::Download(detail) => write!(f, "image retrieval failed: {detail}"),
            ImageError::Decode(detail) => write!(f, "image decode failed: {detail}"),
            ImageError::Encode(detail) => write!(f, "image encode failed: {detail}"),
            ImageError::Io(err) => write!(f, "image io failed: {err}"),
        }
    }
}

impl From<std::io::Error> for ImageError {
    fn from(err: std::io::Error) -> Self {
        ImageError::Io(err)
    }
}

/// Storage-relative serving paths for the two variants of one image.
/// Always created and destroyed together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaVariantPaths {
    /// eg `/uploads/images/full/<uuid>.jpg`
    pub image_path: String,
    /// eg `/uploads/images/thumbnails/<uuid>_thumb.jpg`
    pub thumbnail_path: String,
}

/// Filesystem-backed store for normalized recipe images.
#[derive(Clone, Debug)]
pub struct MediaStore {
    uploads_dir: PathBuf,
}

impl MediaStore {
    /// Creates a store rooted at the given uploads directory.
    pub fn new(uploads_dir: PathBuf) -> Self {
        Self { uploads_dir }
    }

    /// Normalizes raw image bytes into both variants and writes them under
    /// a fresh uuid. Decode and resize are CPU-bound, so the work runs on
    /// the blocking pool rather than the async scheduler.
    pub async fn store_variants(&self, raw: Vec<u8>) -> Result<MediaVariantPaths, ImageError> {
        let uploads_dir = self.uploads_dir.clone();
        tokio::task::spawn_blocking(move || normalize_and_write(&uploads_dir, &raw))
            .await
            .map_err(|err| ImageError::Encode(format!("normalization task failed: {err}")))?
    }

    /// Maps a stored serving path back to its location on disk.
    pub fn absolute_path(&self, storage_path: &str) -> PathBuf {
        let relative = storage_path
            .strip_prefix(UPLOADS_URL_PREFIX)
            .unwrap_or(storage_path)
            .trim_start_matches('/');
        self.uploads_dir.join(relative)
    }

    /// The directory this store serves from.
    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }
}

fn normalize_and_write(uploads_dir: &Path, raw: &[u8]) -> Result<MediaVariantPaths, ImageError> {
    let decoded = ImageReader::new(Cursor::new(raw))
        .with_guessed_format()
        .map_err(|err| ImageError::Decode(err.to_string()))?
        .decode()
        .map_err(|err| ImageError::Decode(err.to_string()))?;

    let full_dir = uploads_dir.join("images").join("full");
    let thumb_dir = uploads_dir.join("images").join("thumbnails");
    std::fs::create_dir_all(&full_dir)?;
    std::fs::create_dir_all(&thumb_dir)?;

    let key = Uuid::new_v4();
    let full_filename = format!("{key}.jpg");
    let thumb_filename = format!("{key}{THUMBNAIL_SUFFIX}.jpg");
    let full_path = full_dir.join(&full_filename);
    let thumb_path = thumb_dir.join(&thumb_filename);

    let full_bytes = encode_square_variant(&decoded, FULL_IMAGE_SIZE, FULL_IMAGE_QUALITY)?;
    std::fs::write(&full_path, full_bytes)?;

    // All-or-nothing: a thumbnail failure must not leave the full image
    // behind as an orphan.
    let thumb_result = encode_square_variant(&decoded, THUMBNAIL_SIZE, THUMBNAIL_QUALITY)
        .and_then(|bytes| std::fs::write(&thumb_path, bytes).map_err(ImageError::from));
    if let Err(err) = thumb_result {
        let _ = std::fs::remove_file(&full_path);
        return Err(err);
    }

    Ok(MediaVariantPaths {
        image_path: format!("{UPLOADS_URL_PREFIX}/images/full/{full_filename}"),
        thumbnail_path: format!("{UPLOADS_URL_PREFIX}/images/thumbnails/{thumb_filename}"),
    })
}

/// Center-crops to square, scales to `size`, and encodes as JPEG at the
/// given quality.
fn encode_square_variant(
    image: &DynamicImage,
    size: u32,
    quality: u8,
) -> Result<Vec<u8>, ImageError> {
    let (width, height) = (image.width(), image.height());
    let side = width.min(height);
    let x = (width - side) / 2;
    let y = (height - side) / 2;

    let square = image
        .crop_imm(x, y, side, side)
        .resize_exact(size, size, FilterType::Lanczos3)
        .to_rgb8();

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    square
        .write_with_encoder(encoder)
        .map_err(|err| ImageError::Encode(err.to_string()))?;
    Ok(buf)
}
