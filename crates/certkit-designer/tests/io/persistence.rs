use certkit_designer::model::{DotShape, GradientKind};
use certkit_designer::{
    Coordinates, CredentialKind, Field, FieldKind, ImageRef, Placeholder, PlaceholderCodec,
    Placement, QrStyle, Rect, Size, TemplateDocument, TemplateMeta, TextStyle,
};

const IMAGE: Size = Size::new(1600.0, 1200.0);

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.01
}

fn name_field() -> Field {
    Field::new(
        "Name",
        FieldKind::Text,
        Placement::Displayed(Rect::new(100.0, 100.0, 200.0, 40.0)),
    )
    .with_style(TextStyle {
        font_size: 20.0,
        ..TextStyle::default()
    })
}

#[test]
fn test_text_field_stores_center_and_scaled_font() {
    let codec = PlaceholderCodec::default();
    let p = codec.serialize(&name_field(), IMAGE);
    assert_eq!(
        p.coordinates,
        Some(Coordinates {
            x: 400.0,
            y: 240.0,
            width: 400.0,
            height: 80.0
        })
    );
    assert_eq!(p.font_size, 40.0);
    assert_eq!(p.kind, "text");
}

#[test]
fn test_stored_placeholder_loads_into_surface_space() {
    let codec = PlaceholderCodec::default();
    let p = Placeholder {
        id: uuid::Uuid::new_v4().to_string(),
        name: "Name".to_string(),
        kind: "text".to_string(),
        coordinates: Some(Coordinates {
            x: 400.0,
            y: 240.0,
            width: 400.0,
            height: 80.0,
        }),
        font_family: "Arial".to_string(),
        font_size: 40.0,
        font_color: "#000000".to_string(),
        bold: false,
        italic: false,
        qr_style: None,
    };
    let field = codec.deserialize(&p, Some(IMAGE));
    let rect = field.rect().unwrap();
    assert!(approx(rect.x, 100.0));
    assert!(approx(rect.y, 100.0));
    assert!(approx(rect.width, 200.0));
    assert!(approx(rect.height, 40.0));
    assert!(approx(field.style.font_size, 20.0));
    assert_eq!(field.id.to_string(), p.id);
}

#[test]
fn test_round_trip_on_non_uniform_image() {
    let codec = PlaceholderCodec::default();
    let image = Size::new(1000.0, 1414.0);
    let original = Field::new(
        "Course",
        FieldKind::Text,
        Placement::Displayed(Rect::new(123.0, 456.0, 210.0, 55.0)),
    );
    let back = codec.deserialize(&codec.serialize(&original, image), Some(image));
    let (a, b) = (original.rect().unwrap(), back.rect().unwrap());
    assert!((a.x - b.x).abs() <= 1.0);
    assert!((a.y - b.y).abs() <= 1.0);
    assert!((a.width - b.width).abs() <= 1.0);
    assert!((a.height - b.height).abs() <= 1.0);
}

#[test]
fn test_qr_style_survives_json() {
    let codec = PlaceholderCodec::default();
    let mut style = QrStyle::branded("#1E3A8A", "#FFFFFF");
    style.dots_options.shape = DotShape::ClassyRounded;
    style.dots_options.gradient = Some(certkit_designer::model::Gradient {
        kind: GradientKind::Radial,
        rotation: 0.0,
        color_stops: vec![
            certkit_designer::model::ColorStop {
                offset: 0.0,
                color: "#1E3A8A".to_string(),
            },
            certkit_designer::model::ColorStop {
                offset: 1.0,
                color: "#60A5FA".to_string(),
            },
        ],
    });
    let qr = Field::new(
        "QR Code",
        FieldKind::QrCode,
        Placement::Displayed(Rect::new(350.0, 250.0, 100.0, 100.0)),
    )
    .with_qr_style(style.clone());

    let json = serde_json::to_string(&codec.serialize(&qr, IMAGE)).unwrap();
    let p: Placeholder = serde_json::from_str(&json).unwrap();
    let back = codec.deserialize(&p, Some(IMAGE));
    assert_eq!(back.qr_style, Some(style));
    assert!(back.is_qr_code());
}

#[test]
fn test_qr_without_style_gets_default() {
    let codec = PlaceholderCodec::default();
    let p: Placeholder = serde_json::from_value(serde_json::json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "name": "QR Code",
        "type": "qrcode",
        "coordinates": { "x": 700.0, "y": 500.0, "width": 200.0, "height": 200.0 },
        "fontFamily": "Arial",
        "fontSize": 20,
        "fontColor": "#000000"
    }))
    .unwrap();
    let field = codec.deserialize(&p, Some(IMAGE));
    assert_eq!(field.kind(), FieldKind::QrCode);
    assert_eq!(field.qr_style, Some(QrStyle::default()));
    assert_eq!(field.rect(), Some(Rect::new(350.0, 250.0, 100.0, 100.0)));
}

#[test]
fn test_document_json_shape() {
    let codec = PlaceholderCodec::default();
    let meta = TemplateMeta {
        name: "Course Completion".to_string(),
        category: "Training".to_string(),
        credential_kind: CredentialKind::Both,
        certificate_image: Some(ImageRef::Url("https://cdn.example.com/cert.png".to_string())),
        badge_image: None,
    };
    let doc = codec.to_document(&meta, &[name_field()], IMAGE);
    let json = serde_json::to_value(&doc).unwrap();

    assert_eq!(json["credentialKind"], "both");
    assert_eq!(json["certificateImage"], "https://cdn.example.com/cert.png");
    assert!(json.get("badgeImage").is_none());
    assert_eq!(json["placeholders"][0]["fontSize"], 40.0);

    let parsed: TemplateDocument = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, doc);
    assert_eq!(parsed.meta(), meta);
}
