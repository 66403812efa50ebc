//! End-to-end walkthroughs of the create and edit flows.

use std::sync::Arc;

use certkit_core::RequiredField;
use certkit_designer::{
    ApproxMeasurer, Coordinates, DecodedImage, DesignerError, EditorSession, FieldKind,
    MemoryTemplateStore, Point, PointerOutcome, Rect, Size, TemplateStore,
};
use certkit_settings::DesignerConfig;

fn session() -> EditorSession {
    EditorSession::new(DesignerConfig::default(), Arc::new(ApproxMeasurer::default()))
}

fn blank(width: u32, height: u32) -> DecodedImage {
    DecodedImage::from_rgba(&image::RgbaImage::new(width, height)).unwrap()
}

fn draw(session: &mut EditorSession, from: Point, to: Point) -> PointerOutcome {
    session.pointer_down(from).unwrap();
    session.pointer_move(to).unwrap();
    session.pointer_up(to).unwrap()
}

#[tokio::test]
async fn test_draw_name_field_and_save() {
    let mut s = session();
    s.set_name("Course Completion");
    s.set_decoded_certificate(None, blank(1600, 1200));

    let out = draw(&mut s, Point::new(100.0, 100.0), Point::new(300.0, 140.0));
    assert!(matches!(out, PointerOutcome::FieldDrawn(_)));
    assert_eq!(
        s.pending_field().map(|p| p.rect),
        Some(Rect::new(100.0, 100.0, 200.0, 40.0))
    );

    let name = s.confirm_pending("Name", FieldKind::Text).unwrap();
    assert!(s.pending_field().is_none());
    assert_eq!(s.selected_id(), Some(name));
    assert_eq!(s.field(name).unwrap().style.font_size, 20.0);

    s.add_email_field().unwrap();
    s.add_issue_date_field().unwrap();
    assert!(s.can_save());

    let doc = s.to_document().unwrap();
    let stored = doc
        .placeholders
        .iter()
        .find(|p| p.name == "Name")
        .unwrap();
    assert_eq!(
        stored.coordinates,
        Some(Coordinates {
            x: 400.0,
            y: 240.0,
            width: 400.0,
            height: 80.0
        })
    );
    // Doubled from 20, still within what fits the 400x80 stored box.
    assert_eq!(stored.font_size, 40.0);

    let store = MemoryTemplateStore::new();
    let id = s.save(&store).await.unwrap();
    assert_eq!(s.template_id(), Some(id.as_str()));
    assert_eq!(store.get(&id).await.unwrap().placeholders.len(), 3);
}

#[tokio::test]
async fn test_edit_flow_restores_surface_geometry() {
    let store = MemoryTemplateStore::new();
    let mut s = session();
    let cert = certkit_designer::ImageRef::inline_from_bytes("image/png", &png(1600, 1200));
    s.set_certificate_image(cert).await.unwrap();
    draw(&mut s, Point::new(100.0, 100.0), Point::new(300.0, 140.0));
    s.confirm_pending("Name", FieldKind::Text).unwrap();
    s.add_email_field().unwrap();
    s.add_issue_date_field().unwrap();
    let id = s.save(&store).await.unwrap();

    let reopened = EditorSession::open(
        &store,
        &id,
        Arc::new(certkit_designer::HttpImageFetcher::default()),
        DesignerConfig::default(),
        Arc::new(ApproxMeasurer::default()),
    )
    .await
    .unwrap();

    assert_eq!(reopened.template_id(), Some(id.as_str()));
    assert_eq!(reopened.base_image().map(|i| i.size()), Some(Size::new(1600.0, 1200.0)));
    let name = reopened.store().name_field().unwrap();
    let rect = name.rect().unwrap();
    assert!((rect.x - 100.0).abs() < 0.01);
    assert!((rect.y - 100.0).abs() < 0.01);
    assert!((rect.width - 200.0).abs() < 0.01);
    assert!((rect.height - 40.0).abs() < 0.01);
    assert!((name.style.font_size - 20.0).abs() < 0.01);

    let email = reopened.fields().iter().find(|f| f.is_email()).unwrap();
    assert!(!email.is_displayed());
}

#[tokio::test]
async fn test_qr_east_handle_grows_square() {
    let mut s = session();
    s.set_decoded_certificate(None, blank(800, 600));
    let qr = s.add_qr_field().unwrap();
    let start = s.field(qr).unwrap().rect().unwrap();
    assert_eq!(start, Rect::new(350.0, 250.0, 100.0, 100.0));

    // East handle sits at the middle of the right edge.
    s.pointer_down(Point::new(450.0, 300.0)).unwrap();
    s.pointer_move(Point::new(570.0, 300.0)).unwrap();
    s.pointer_up(Point::new(570.0, 300.0)).unwrap();

    let rect = s.field(qr).unwrap().rect().unwrap();
    assert_eq!(rect, Rect::new(350.0, 250.0, 220.0, 220.0));
}

#[tokio::test]
async fn test_save_blocked_without_name_and_issue_date() {
    let mut s = session();
    s.set_decoded_certificate(None, blank(800, 600));
    s.add_email_field().unwrap();
    assert!(!s.can_save());

    let store = MemoryTemplateStore::new();
    let err = s.save(&store).await.unwrap_err();
    assert_eq!(
        err,
        DesignerError::MissingRequiredField {
            missing: vec![RequiredField::Name, RequiredField::IssueDate]
        }
    );
    assert!(store.is_empty());
    assert!(s.template_id().is_none());
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([240, 240, 240, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
