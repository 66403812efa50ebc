use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use certkit_designer::{
    DecodedImage, ImageError, ImageFetcher, ImageLoader, ImageRef, LoadOutcome, Size,
};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// Serves a fixed body for every URL, optionally after a delay.
struct StaticFetcher {
    body: Result<Vec<u8>, ImageError>,
    delay: Duration,
}

#[async_trait]
impl ImageFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, ImageError> {
        tokio::time::sleep(self.delay).await;
        self.body.clone()
    }
}

fn loader(body: Result<Vec<u8>, ImageError>, delay: Duration) -> ImageLoader {
    ImageLoader::new(Arc::new(StaticFetcher { body, delay }))
}

#[tokio::test]
async fn test_inline_reference_decodes_without_fetching() {
    let loader = loader(
        Err(ImageError::Fetch {
            url: String::new(),
            reason: "should not be called".to_string(),
        }),
        Duration::ZERO,
    );
    let reference = ImageRef::inline_from_bytes("image/png", &png_bytes(40, 30));
    let image = loader.load(&reference).await.unwrap();
    assert_eq!(image.size(), Size::new(40.0, 30.0));
}

#[tokio::test]
async fn test_url_reference_goes_through_fetcher() {
    let loader = loader(Ok(png_bytes(1600, 1200)), Duration::ZERO);
    let outcome = loader
        .load_with_timeout(
            ImageRef::Url("https://cdn.example.com/cert.png".to_string()),
            Duration::from_secs(5),
        )
        .await;
    let image = outcome.ok().unwrap();
    assert_eq!(image.size(), Size::new(1600.0, 1200.0));
}

#[tokio::test]
async fn test_fetch_failure_is_reported() {
    let loader = loader(
        Err(ImageError::Fetch {
            url: "https://cdn.example.com/missing.png".to_string(),
            reason: "HTTP 404 Not Found".to_string(),
        }),
        Duration::ZERO,
    );
    let outcome = loader
        .load_with_timeout(
            ImageRef::Url("https://cdn.example.com/missing.png".to_string()),
            Duration::from_secs(5),
        )
        .await;
    assert!(matches!(outcome, LoadOutcome::Failed(ImageError::Fetch { .. })));
}

#[tokio::test]
async fn test_undecodable_body_is_reported() {
    let loader = loader(Ok(b"<html>".to_vec()), Duration::ZERO);
    let outcome = loader
        .load_with_timeout(
            ImageRef::Url("https://cdn.example.com/page".to_string()),
            Duration::from_secs(5),
        )
        .await;
    assert!(matches!(outcome, LoadOutcome::Failed(ImageError::Decode { .. })));
}

#[tokio::test]
async fn test_slow_decode_times_out() {
    let loader = loader(Ok(png_bytes(8, 8)), Duration::from_secs(30));
    let outcome = loader
        .load_with_timeout(
            ImageRef::Url("https://cdn.example.com/slow.png".to_string()),
            Duration::from_millis(20),
        )
        .await;
    assert!(matches!(outcome, LoadOutcome::TimedOut));
    assert!(outcome.ok().is_none());
}

#[tokio::test]
async fn test_dropped_handle_is_harmless() {
    let loader = loader(Ok(png_bytes(8, 8)), Duration::from_millis(10));
    let handle = loader.spawn(ImageRef::Url("https://cdn.example.com/a.png".to_string()));
    drop(handle);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let image = loader
        .spawn(ImageRef::Url("https://cdn.example.com/a.png".to_string()))
        .wait(Duration::from_secs(5))
        .await
        .ok();
    assert!(image.is_some());
}

#[test]
fn test_invalid_inline_payload() {
    let reference = ImageRef::Inline("data:image/png;base64,!!!".to_string());
    assert!(matches!(
        reference.inline_bytes(),
        Err(ImageError::InvalidReference { .. })
    ));
    assert!(DecodedImage::from_bytes(&[]).is_err());
}
