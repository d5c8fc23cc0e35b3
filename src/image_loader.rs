use image::{DynamicImage, ImageFormat, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// Sources larger than this on either axis are thumbnailed before slicing
/// to keep tile textures and pixel copies bounded.
pub const MAX_SOURCE_DIMENSION: u32 = 2048;

pub type ImageLoadResult = Result<(PathBuf, RgbaImage), String>;

/// A decode result tagged with the load request that produced it. The app
/// drops responses whose generation is no longer the latest request, so a
/// superseded in-flight load can never install a stale board.
pub struct ImageLoadResponse {
    pub generation: u64,
    pub result: ImageLoadResult,
}

pub fn load_source_image(path: &Path) -> Result<RgbaImage, String> {
    let bytes =
        fs::read(path).map_err(|err| format!("Failed to read {}: {err}", path.display()))?;

    let format = image::guess_format(&bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map_err(|err| format!("Failed to determine format for {}: {err}", path.display()))?;

    let decoded = image::load_from_memory_with_format(&bytes, format)
        .map_err(|err| format!("Failed to decode {}: {err}", path.display()))?;

    Ok(constrain_dimensions(decoded, MAX_SOURCE_DIMENSION).to_rgba8())
}

fn constrain_dimensions(image: DynamicImage, max_dimension: u32) -> DynamicImage {
    if image.width() > max_dimension || image.height() > max_dimension {
        image.thumbnail(max_dimension, max_dimension)
    } else {
        image
    }
}

/// Decodes `path` off the UI thread and delivers the result over a channel,
/// requesting a repaint once it is ready. Dropping the receiver cancels
/// delivery; the worker's send fails silently and the decode is discarded.
pub fn spawn_load(path: PathBuf, generation: u64, ctx: egui::Context) -> Receiver<ImageLoadResponse> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        log::debug!("Decoding {} (generation {generation})", path.display());
        let result = load_source_image(&path).map(|image| (path, image));
        if tx.send(ImageLoadResponse { generation, result }).is_ok() {
            ctx.request_repaint();
        }
    });
    rx
}
