use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use certkit_core::DuplicateKind;
use certkit_designer::{
    ApproxMeasurer, CredentialKind, Cursor, DecodedImage, DesignerError, EditorSession, FieldKind,
    ImageError, ImageFetcher, ImageLoader, ImageRef, MemoryTemplateStore, Point, PointerOutcome,
    QrStyle, Size, TemplateStore, TextStyle, View,
};
use certkit_settings::DesignerConfig;

fn session() -> EditorSession {
    EditorSession::new(DesignerConfig::default(), Arc::new(ApproxMeasurer::default()))
}

fn blank(width: u32, height: u32) -> DecodedImage {
    DecodedImage::from_rgba(&image::RgbaImage::new(width, height)).unwrap()
}

fn draw(session: &mut EditorSession, from: Point, to: Point) {
    session.pointer_down(from).unwrap();
    session.pointer_move(to).unwrap();
    session.pointer_up(to).unwrap();
}

struct FailingFetcher;

#[async_trait]
impl ImageFetcher for FailingFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        Err(ImageError::Fetch {
            url: url.to_string(),
            reason: "HTTP 503 Service Unavailable".to_string(),
        })
    }
}

#[tokio::test]
async fn test_nothing_reacts_before_image_loads() {
    let mut s = session();
    assert!(!s.image_loaded());
    let out = s.pointer_down(Point::new(100.0, 100.0)).unwrap();
    assert_eq!(out, PointerOutcome::Unchanged);
    s.pointer_up(Point::new(300.0, 140.0)).unwrap();
    assert!(s.pending_field().is_none());

    assert!(matches!(
        s.add_qr_field(),
        Err(DesignerError::ImageNotLoaded { .. })
    ));

    // Required fields present, but coordinates cannot be converted.
    s.add_email_field().unwrap();
    s.add_issue_date_field().unwrap();
    let store = MemoryTemplateStore::new();
    assert!(matches!(
        s.save(&store).await,
        Err(DesignerError::ImageNotLoaded { .. })
    ));
}

#[tokio::test]
async fn test_duplicate_on_confirm_keeps_prompt_open() {
    let mut s = session();
    s.set_decoded_certificate(None, blank(800, 600));
    s.add_email_field().unwrap();

    draw(&mut s, Point::new(100.0, 400.0), Point::new(300.0, 440.0));
    let err = s
        .confirm_pending("Recipient Email", FieldKind::Email)
        .unwrap_err();
    assert_eq!(
        err,
        DesignerError::DuplicateField {
            kind: DuplicateKind::Email
        }
    );
    assert!(s.pending_field().is_some());
    assert_eq!(s.fields().len(), 1);

    s.confirm_pending("Course", FieldKind::Text).unwrap();
    assert!(s.pending_field().is_none());
    assert_eq!(s.fields().len(), 2);
}

#[tokio::test]
async fn test_confirm_without_drawing_fails() {
    let mut s = session();
    assert_eq!(
        s.confirm_pending("Name", FieldKind::Text),
        Err(DesignerError::NoPendingField)
    );
}

#[tokio::test]
async fn test_cancel_pending_discards_drawing() {
    let mut s = session();
    s.set_decoded_certificate(None, blank(800, 600));
    draw(&mut s, Point::new(100.0, 100.0), Point::new(300.0, 140.0));
    assert!(s.pending_field().is_some());
    s.cancel_pending();
    assert!(s.pending_field().is_none());
    assert!(s.fields().is_empty());
}

#[tokio::test]
async fn test_removing_dragged_field_ends_the_drag() {
    let mut s = session();
    s.set_decoded_certificate(None, blank(800, 600));
    draw(&mut s, Point::new(100.0, 100.0), Point::new(300.0, 140.0));
    let id = s.confirm_pending("Course", FieldKind::Text).unwrap();
    s.select(None).unwrap();

    s.pointer_down(Point::new(150.0, 120.0)).unwrap();
    assert!(!s.interaction().is_idle());
    s.remove_field(id).unwrap();
    assert!(s.interaction().is_idle());

    assert_eq!(
        s.pointer_up(Point::new(200.0, 130.0)).unwrap(),
        PointerOutcome::Unchanged
    );
    assert_eq!(
        s.pointer_move(Point::new(220.0, 150.0)).unwrap(),
        PointerOutcome::Unchanged
    );
    assert_eq!(s.cursor_at(Point::new(220.0, 150.0)), Cursor::Crosshair);
}

#[tokio::test]
async fn test_new_press_discards_pending_drawing() {
    let mut s = session();
    s.set_decoded_certificate(None, blank(800, 600));
    draw(&mut s, Point::new(100.0, 100.0), Point::new(300.0, 140.0));
    assert!(s.pending_field().is_some());

    s.pointer_down(Point::new(400.0, 300.0)).unwrap();
    assert!(s.pending_field().is_none());
    s.pointer_move(Point::new(600.0, 380.0)).unwrap();
    s.pointer_up(Point::new(600.0, 380.0)).unwrap();
    let pending = s.pending_field().unwrap();
    assert_eq!(pending.rect, certkit_designer::Rect::new(400.0, 300.0, 200.0, 80.0));
}

#[tokio::test]
async fn test_special_fields_follow_name_style() {
    let mut s = session();
    s.set_decoded_certificate(None, blank(800, 600));
    draw(&mut s, Point::new(100.0, 100.0), Point::new(500.0, 180.0));
    let name = s.confirm_pending("Name", FieldKind::Text).unwrap();
    s.set_field_style(
        name,
        TextStyle {
            font_family: "Georgia".to_string(),
            font_size: 32.0,
            font_color: "#1E3A8A".to_string(),
            bold: true,
            italic: false,
        },
    )
    .unwrap();

    let email = s.add_email_field().unwrap();
    let expiry = s.add_expiry_date_field().unwrap();
    for id in [email, expiry] {
        let style = &s.field(id).unwrap().style;
        assert_eq!(style.font_family, "Georgia");
        assert_eq!(style.font_size, 32.0);
        assert!(style.bold);
    }
    assert!(matches!(
        s.add_expiry_date_field(),
        Err(DesignerError::DuplicateField {
            kind: DuplicateKind::ExpiryDate
        })
    ));
}

#[tokio::test]
async fn test_redraws_are_coalesced() {
    let mut s = session();
    s.set_decoded_certificate(None, blank(800, 600));
    s.add_email_field().unwrap();
    s.add_issue_date_field().unwrap();
    s.set_active_view(View::Badge);

    assert!(s.render_frame().is_some());
    assert!(s.render_frame().is_none());
    let stats = s.scheduler().stats();
    assert!(stats.requested >= 3);
    assert_eq!(stats.rendered, 1);

    s.close();
    s.add_expiry_date_field().unwrap();
    assert!(s.render_frame().is_none());
}

#[tokio::test]
async fn test_qr_preview_generated_and_regenerated() {
    let mut s = session();
    s.set_decoded_certificate(None, blank(800, 600));
    let qr = s.add_qr_field().unwrap();
    assert!(s.qr_previews().contains(qr));
    wait_for_preview(&s, qr).await;

    let mut style = QrStyle::default();
    style.dots_options.color = "#FF0000".to_string();
    s.set_qr_style(qr, style.clone()).unwrap();
    assert_eq!(s.field(qr).unwrap().qr_style, Some(style));
    wait_for_preview(&s, qr).await;

    s.remove_field(qr).unwrap();
    assert!(!s.qr_previews().contains(qr));
}

async fn wait_for_preview(s: &EditorSession, id: certkit_designer::FieldId) {
    for _ in 0..200 {
        if s.qr_previews().get(id).is_some() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("QR preview for {} never completed", id);
}

#[tokio::test]
async fn test_badge_only_uses_badge_as_base() {
    let mut s = session();
    s.set_credential_kind(CredentialKind::Badge);
    s.set_decoded_certificate(None, blank(1600, 1200));
    assert!(!s.image_loaded());

    s.set_decoded_badge(None, blank(400, 400));
    assert_eq!(s.base_image().map(|i| i.size()), Some(Size::new(400.0, 400.0)));
    assert_eq!(s.active_view(), View::Certificate);
    assert_eq!(s.active_image().map(|i| i.size()), Some(Size::new(1600.0, 1200.0)));
    s.set_active_view(View::Badge);
    assert_eq!(s.active_image().map(|i| i.size()), Some(Size::new(400.0, 400.0)));
}

#[tokio::test]
async fn test_failed_image_degrades_gracefully() {
    let mut s = EditorSession::with_loader(
        DesignerConfig::default(),
        Arc::new(ApproxMeasurer::default()),
        ImageLoader::new(Arc::new(FailingFetcher)),
    );
    let reference = ImageRef::Url("https://cdn.example.com/cert.png".to_string());
    let err = s.set_certificate_image(reference.clone()).await.unwrap_err();
    assert!(matches!(err, ImageError::Fetch { .. }));
    assert!(!s.image_loaded());
    assert_eq!(s.meta().certificate_image, Some(reference));
    assert!(s.render_now().is_some());
}

#[tokio::test]
async fn test_open_with_unreachable_image_hides_positioned_fields() {
    let store = MemoryTemplateStore::new();
    let mut author = session();
    author.set_decoded_certificate(
        Some(ImageRef::Url("https://cdn.example.com/cert.png".to_string())),
        blank(1600, 1200),
    );
    draw(&mut author, Point::new(100.0, 100.0), Point::new(300.0, 140.0));
    author.confirm_pending("Name", FieldKind::Text).unwrap();
    author.add_email_field().unwrap();
    author.add_issue_date_field().unwrap();
    let id = author.save(&store).await.unwrap();

    let reopened = EditorSession::open(
        &store,
        &id,
        Arc::new(FailingFetcher),
        DesignerConfig::default(),
        Arc::new(ApproxMeasurer::default()),
    )
    .await
    .unwrap();
    assert!(!reopened.image_loaded());
    assert_eq!(reopened.fields().len(), 3);
    assert!(reopened.fields().iter().all(|f| !f.is_displayed()));
}

#[tokio::test]
async fn test_second_save_updates_and_failure_surfaces_message() {
    let store = MemoryTemplateStore::new();
    let mut s = session();
    s.set_decoded_certificate(None, blank(800, 600));
    draw(&mut s, Point::new(100.0, 100.0), Point::new(300.0, 140.0));
    s.confirm_pending("Name", FieldKind::Text).unwrap();
    s.add_email_field().unwrap();
    s.add_issue_date_field().unwrap();

    let first = s.save(&store).await.unwrap();
    s.set_name("Renamed");
    let second = s.save(&store).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&first).await.unwrap().name, "Renamed");

    store.fail_next_with("");
    let err = s.save(&store).await.unwrap_err();
    assert_eq!(err.user_message(), "Failed to save template");
}
