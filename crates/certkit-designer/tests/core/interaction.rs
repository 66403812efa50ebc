use certkit_designer::{
    Cursor, DragState, Field, FieldKind, FieldStore, Interaction, PendingField, Placement, Point,
    PointerOutcome, Rect, ResizeHandle,
};

fn store_with(field: Field) -> (FieldStore, certkit_designer::FieldId) {
    let mut store = FieldStore::default();
    let id = store.add_field(field).unwrap();
    (store, id)
}

#[test]
fn test_drag_on_empty_surface_draws_pending_field() {
    let mut store = FieldStore::default();
    let mut ix = Interaction::default();

    ix.pointer_down(&mut store, Point::new(100.0, 100.0), true).unwrap();
    assert!(matches!(ix.state(), DragState::Drawing { .. }));
    let out = ix
        .pointer_move(&mut store, Point::new(300.0, 140.0), true)
        .unwrap();
    assert_eq!(out, PointerOutcome::Changed);
    assert_eq!(
        ix.draft_rect(store.rules().surface),
        Some(Rect::new(100.0, 100.0, 200.0, 40.0))
    );

    let out = ix
        .pointer_up(&mut store, Point::new(300.0, 140.0), true)
        .unwrap();
    assert_eq!(
        out,
        PointerOutcome::FieldDrawn(PendingField {
            rect: Rect::new(100.0, 100.0, 200.0, 40.0)
        })
    );
    assert!(ix.is_idle());
    assert!(store.is_empty());
}

#[test]
fn test_tiny_drag_is_clamped_to_minimum() {
    let mut store = FieldStore::default();
    let mut ix = Interaction::default();
    ix.pointer_down(&mut store, Point::new(400.0, 300.0), true).unwrap();
    let out = ix
        .pointer_up(&mut store, Point::new(410.0, 305.0), true)
        .unwrap();
    let PointerOutcome::FieldDrawn(pending) = out else {
        panic!("expected a drawn field, got {:?}", out);
    };
    assert_eq!(pending.rect, Rect::new(400.0, 300.0, 50.0, 20.0));
}

#[test]
fn test_press_on_field_selects_and_moves_it() {
    let (mut store, id) = store_with(Field::new(
        "Course",
        FieldKind::Text,
        Placement::Displayed(Rect::new(100.0, 100.0, 200.0, 40.0)),
    ));
    let mut ix = Interaction::default();

    let out = ix
        .pointer_down(&mut store, Point::new(150.0, 120.0), true)
        .unwrap();
    assert_eq!(out, PointerOutcome::Changed);
    assert_eq!(store.selected_id(), Some(id));
    assert_eq!(
        ix.cursor_at(&store, Point::new(150.0, 120.0), true),
        Cursor::Grabbing
    );

    ix.pointer_move(&mut store, Point::new(250.0, 220.0), true)
        .unwrap();
    assert_eq!(
        store.get(id).unwrap().rect(),
        Some(Rect::new(200.0, 200.0, 200.0, 40.0))
    );
    ix.pointer_up(&mut store, Point::new(250.0, 220.0), true)
        .unwrap();
    assert!(ix.is_idle());
}

#[test]
fn test_press_on_empty_area_clears_selection() {
    let (mut store, id) = store_with(Field::new(
        "Course",
        FieldKind::Text,
        Placement::Displayed(Rect::new(100.0, 100.0, 200.0, 40.0)),
    ));
    store.select(Some(id)).unwrap();
    let mut ix = Interaction::default();
    let out = ix
        .pointer_down(&mut store, Point::new(600.0, 500.0), true)
        .unwrap();
    assert_eq!(out, PointerOutcome::Changed);
    assert_eq!(store.selected_id(), None);
}

#[test]
fn test_corner_handle_resizes_selected_field() {
    let (mut store, id) = store_with(Field::new(
        "Course",
        FieldKind::Text,
        Placement::Displayed(Rect::new(100.0, 100.0, 200.0, 40.0)),
    ));
    store.select(Some(id)).unwrap();
    let mut ix = Interaction::default();

    ix.pointer_down(&mut store, Point::new(301.0, 139.0), true)
        .unwrap();
    assert!(matches!(
        ix.state(),
        DragState::Resizing {
            handle: ResizeHandle::SE,
            ..
        }
    ));
    ix.pointer_move(&mut store, Point::new(341.0, 159.0), true)
        .unwrap();
    assert_eq!(
        store.get(id).unwrap().rect(),
        Some(Rect::new(100.0, 100.0, 240.0, 60.0))
    );

    // Shrinking past the minimum stops at 50x20.
    ix.pointer_move(&mut store, Point::new(0.0, 0.0), true)
        .unwrap();
    assert_eq!(
        store.get(id).unwrap().rect(),
        Some(Rect::new(100.0, 100.0, 50.0, 20.0))
    );
    ix.pointer_up(&mut store, Point::new(0.0, 0.0), true).unwrap();
}

#[test]
fn test_qr_edge_handle_keeps_square() {
    let (mut store, id) = store_with(Field::new(
        "QR Code",
        FieldKind::QrCode,
        Placement::Displayed(Rect::new(100.0, 100.0, 100.0, 100.0)),
    ));
    store.select(Some(id)).unwrap();
    let mut ix = Interaction::default();

    ix.pointer_down(&mut store, Point::new(200.0, 150.0), true)
        .unwrap();
    ix.pointer_move(&mut store, Point::new(320.0, 150.0), true)
        .unwrap();
    let rect = store.get(id).unwrap().rect().unwrap();
    assert_eq!(rect, Rect::new(100.0, 100.0, 220.0, 220.0));
}

#[test]
fn test_hover_cursor_reflects_target() {
    let (mut store, id) = store_with(Field::new(
        "Course",
        FieldKind::Text,
        Placement::Displayed(Rect::new(100.0, 100.0, 200.0, 40.0)),
    ));
    let ix = Interaction::default();
    assert_eq!(
        ix.cursor_at(&store, Point::new(150.0, 120.0), true),
        Cursor::Grab
    );
    assert_eq!(
        ix.cursor_at(&store, Point::new(500.0, 500.0), true),
        Cursor::Crosshair
    );

    // Handles only show on the selected field.
    assert_eq!(
        ix.cursor_at(&store, Point::new(300.0, 100.0), true),
        Cursor::Grab
    );
    store.select(Some(id)).unwrap();
    assert_eq!(
        ix.cursor_at(&store, Point::new(300.0, 100.0), true),
        Cursor::Resize(ResizeHandle::NE)
    );
    assert_eq!(Cursor::Resize(ResizeHandle::NE).css_name(), "ne-resize");
}

#[test]
fn test_cancel_abandons_drawing() {
    let mut store = FieldStore::default();
    let mut ix = Interaction::default();
    ix.pointer_down(&mut store, Point::new(100.0, 100.0), true).unwrap();
    ix.pointer_move(&mut store, Point::new(200.0, 200.0), true).unwrap();
    ix.cancel();
    assert!(ix.is_idle());
    let out = ix
        .pointer_up(&mut store, Point::new(200.0, 200.0), true)
        .unwrap();
    assert_eq!(out, PointerOutcome::Unchanged);
}
