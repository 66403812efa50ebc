//! Resolving template artwork to pixels.
//!
//! Decoding is asynchronous. Coordinate-dependent work waits on a single-shot
//! [`ImageLoad`] with a bounded timeout and degrades to "no image" on failure.
//! Dropping the handle abandons the decode; nothing needs cancelling.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use certkit_core::{ImageError, Size};
use tiny_skia::{ColorU8, Pixmap};
use tokio::sync::oneshot;

use crate::model::ImageRef;

/// A decoded image ready for drawing.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    size: Size,
    pixmap: Arc<Pixmap>,
}

impl DecodedImage {
    /// Decodes any format the `image` crate recognises.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| ImageError::Decode {
            reason: e.to_string(),
        })?;
        Self::from_rgba(&decoded.to_rgba8())
    }

    pub fn from_rgba(rgba: &image::RgbaImage) -> Result<Self, ImageError> {
        let (width, height) = rgba.dimensions();
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| ImageError::Decode {
            reason: format!("unsupported image dimensions {}x{}", width, height),
        })?;
        // tiny-skia stores premultiplied alpha.
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(Self {
            size: Size::new(f64::from(width), f64::from(height)),
            pixmap: Arc::new(pixmap),
        })
    }

    /// Natural pixel size.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

/// Retrieves the raw bytes behind a URL reference.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError>;
}

/// Fetches images over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new() -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("certkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ImageError::Fetch {
                url: String::new(),
                reason: format!("HTTP client error: {}", e),
            })?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new().unwrap_or_else(|e| {
            tracing::warn!("{}, using a plain client", e);
            Self::with_client(reqwest::Client::new())
        })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let fetch_err = |reason: String| ImageError::Fetch {
            url: url.to_string(),
            reason,
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fetch_err(format!("HTTP {}", response.status())));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_err(format!("failed to read body: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

/// Result of waiting on an [`ImageLoad`].
#[derive(Debug)]
pub enum LoadOutcome {
    Ready(DecodedImage),
    Failed(ImageError),
    TimedOut,
}

impl LoadOutcome {
    /// The decoded image, if any.
    pub fn ok(self) -> Option<DecodedImage> {
        match self {
            LoadOutcome::Ready(image) => Some(image),
            _ => None,
        }
    }
}

/// Single-shot completion signal for one image decode.
#[derive(Debug)]
pub struct ImageLoad {
    rx: oneshot::Receiver<Result<DecodedImage, ImageError>>,
}

impl ImageLoad {
    /// Waits for the decode, giving up after `timeout`.
    pub async fn wait(self, timeout: Duration) -> LoadOutcome {
        match tokio::time::timeout(timeout, self.rx).await {
            Ok(Ok(Ok(image))) => LoadOutcome::Ready(image),
            Ok(Ok(Err(e))) => LoadOutcome::Failed(e),
            Ok(Err(_)) => LoadOutcome::Failed(ImageError::Decode {
                reason: "decode task ended without a result".to_string(),
            }),
            Err(_) => LoadOutcome::TimedOut,
        }
    }
}

/// Turns image references into decoded images.
#[derive(Clone)]
pub struct ImageLoader {
    fetcher: Arc<dyn ImageFetcher>,
}

impl ImageLoader {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Resolves and decodes `reference`. Decoding runs on the blocking pool.
    pub async fn load(&self, reference: &ImageRef) -> Result<DecodedImage, ImageError> {
        let bytes = match reference {
            ImageRef::Inline(_) => reference.inline_bytes()?,
            ImageRef::Url(url) => self.fetcher.fetch(url).await?,
        };
        tokio::task::spawn_blocking(move || DecodedImage::from_bytes(&bytes))
            .await
            .map_err(|e| ImageError::Decode {
                reason: format!("decode task failed: {}", e),
            })?
    }

    /// Starts loading on the current tokio runtime.
    pub fn spawn(&self, reference: ImageRef) -> ImageLoad {
        let (tx, rx) = oneshot::channel();
        let loader = self.clone();
        tokio::spawn(async move {
            let result = loader.load(&reference).await;
            match &result {
                Ok(image) => tracing::info!("Decoded image {} ({})", reference, image.size()),
                Err(e) => tracing::warn!("Image {} unavailable: {}", reference, e),
            }
            // Receiver gone means the caller stopped waiting.
            let _ = tx.send(result);
        });
        ImageLoad { rx }
    }

    /// Spawns a load and waits for it with `timeout`.
    pub async fn load_with_timeout(&self, reference: ImageRef, timeout: Duration) -> LoadOutcome {
        let label = reference.to_string();
        let outcome = self.spawn(reference).wait(timeout).await;
        if let LoadOutcome::TimedOut = outcome {
            tracing::warn!(
                "Image {} did not decode within {}ms, continuing without it",
                label,
                timeout.as_millis()
            );
        }
        outcome
    }
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader").finish_non_exhaustive()
    }
}
