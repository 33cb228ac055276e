use engine::graphics::{BLACK, Canvas, Rect, WHITE, text_height, text_width};

fn frame(w: u32, h: u32) -> Vec<u8> {
    vec![0u8; (w * h * 4) as usize]
}

#[test]
fn text_past_the_right_edge_is_clipped() {
    let mut buf = frame(12, 10);
    let mut canvas = Canvas::new(&mut buf, 12, 10).unwrap();
    canvas.clear(BLACK);
    canvas.draw_text_scaled(8, 0, "888", WHITE, 1);

    // First glyph fits, the rest is dropped without panicking.
    assert_eq!(canvas.pixel(8, 0), Some(WHITE));
    assert_eq!(canvas.pixel(11, 0), Some(BLACK));
    assert_eq!(canvas.pixel(12, 0), None);
}

#[test]
fn text_metrics_scale_with_glyph_size() {
    assert_eq!(text_width("SCORE", 2), 40);
    assert_eq!(text_height(2), 10);
    assert_eq!(text_width("", 3), 0);
}

#[test]
fn translucent_outline_keeps_center() {
    let mut buf = frame(6, 6);
    let mut canvas = Canvas::new(&mut buf, 6, 6).unwrap();
    canvas.clear(BLACK);
    canvas.blend_stroke_rect(Rect::new(0, 0, 6, 6), WHITE, 2, 128);

    assert_eq!(canvas.pixel(0, 0), Some([128, 128, 128, 255]));
    assert_eq!(canvas.pixel(1, 3), Some([128, 128, 128, 255]));
    assert_eq!(canvas.pixel(3, 3), Some(BLACK));
}

#[test]
fn zero_sized_rects_draw_nothing() {
    let mut buf = frame(4, 4);
    let mut canvas = Canvas::new(&mut buf, 4, 4).unwrap();
    canvas.clear(BLACK);
    canvas.fill_rect(Rect::new(1, 1, 0, 3), WHITE);
    canvas.stroke_rect(Rect::new(1, 1, 2, 2), WHITE, 0);
    assert!((0..4).all(|y| (0..4).all(|x| canvas.pixel(x, y) == Some(BLACK))));
}
