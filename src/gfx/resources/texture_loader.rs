//! Background image decoding
//!
//! Decoding a large JPEG takes long enough to stall the first frames, so the
//! file is read and decoded on a worker thread. The render loop polls the
//! returned [`PendingTexture`] once per frame and uploads the pixels when they
//! arrive.

use std::path::{Path, PathBuf};

use futures::channel::oneshot;

use crate::error::{GeodomeError, Result};

/// RGBA8 pixels decoded from an image file
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Reads and decodes `path` into RGBA8 pixels
pub fn decode_image(path: &Path) -> Result<DecodedImage> {
    let failure = |reason: String| GeodomeError::ResourceLoadFailure {
        path: path.display().to_string(),
        reason,
    };

    let image = image::open(path).map_err(|e| failure(e.to_string()))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(failure("image has no pixels".to_string()));
    }

    Ok(DecodedImage {
        path: path.to_path_buf(),
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Outcome of polling a [`PendingTexture`]
#[derive(Debug)]
pub enum TextureStatus {
    Loading,
    Ready(DecodedImage),
    Failed(GeodomeError),
}

/// Handle to an image being decoded on a worker thread
pub struct PendingTexture {
    path: PathBuf,
    receiver: oneshot::Receiver<Result<DecodedImage>>,
}

impl PendingTexture {
    /// Starts decoding `path` and returns immediately
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = oneshot::channel();

        let worker_path = path.clone();
        let spawned = std::thread::Builder::new()
            .name("texture-loader".to_string())
            .spawn(move || {
                let result = decode_image(&worker_path);
                // The receiver is gone when the app shut down first
                let _ = sender.send(result);
            });
        if let Err(e) = spawned {
            log::error!("Failed to spawn texture loader thread: {}", e);
        }

        log::debug!("Loading texture {:?} in the background", path);
        Self { path, receiver }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks for a result without blocking
    ///
    /// A worker that exits without sending, including one that could not be
    /// spawned, is reported as a load failure.
    pub fn poll(&mut self) -> TextureStatus {
        match self.receiver.try_recv() {
            Ok(None) => TextureStatus::Loading,
            Ok(Some(Ok(image))) => TextureStatus::Ready(image),
            Ok(Some(Err(e))) => TextureStatus::Failed(e),
            Err(oneshot::Canceled) => TextureStatus::Failed(GeodomeError::ResourceLoadFailure {
                path: self.path.display().to_string(),
                reason: "loader thread exited without a result".to_string(),
            }),
        }
    }
}
