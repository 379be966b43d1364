use gate_packer_core::Layout;
use image::{Rgba, RgbaImage};

const MARGIN: u32 = 8;
const BACKGROUND: [u8; 4] = [255, 255, 255, 255];
const BOX_EDGE: [u8; 4] = [160, 160, 160, 255];
const GATE_EDGE: [u8; 4] = [0, 0, 0, 255];

const FONT_3X5: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Draws `layout` with its longest bounding-box side scaled to about `size` pixels.
///
/// Layout `y` grows upward, so rows are flipped. Each gate is filled, outlined,
/// and labelled with its 1-based placement index.
pub fn render_layout(layout: &Layout, size: u32) -> RgbaImage {
    let bb = layout.bounding_box;
    let longest = bb.width.max(bb.height).max(1) as f64;
    let scale = size.max(1) as f64 / longest;
    let px = |v: u64| (v as f64 * scale).round() as u32;

    let inner_w = px(bb.width as u64).max(1);
    let inner_h = px(bb.height as u64).max(1);
    let mut img = RgbaImage::from_pixel(
        inner_w + 2 * MARGIN,
        inner_h + 2 * MARGIN,
        Rgba(BACKGROUND),
    );
    draw_outline(&mut img, MARGIN, MARGIN, inner_w, inner_h, BOX_EDGE);

    for (i, p) in layout.placements.iter().enumerate() {
        let r = p.rect();
        let x0 = px(r.x as u64);
        let x1 = px(r.x2()).max(x0 + 1);
        let top = px(r.y2());
        let bottom = px(r.y as u64);
        let y0 = inner_h.saturating_sub(top);
        let y1 = inner_h.saturating_sub(bottom).max(y0 + 1);
        let (w, h) = (x1 - x0, y1 - y0);

        fill_rect(&mut img, MARGIN + x0, MARGIN + y0, w, h, palette(i));
        draw_outline(&mut img, MARGIN + x0, MARGIN + y0, w, h, GATE_EDGE);
        let label = format!("{}", i + 1);
        draw_text_centered(
            &mut img,
            MARGIN + x0 + w / 2,
            MARGIN + y0 + h / 2,
            w,
            h,
            &label,
        );
    }
    img
}

// Deterministic pastel colors cycling through hue steps.
fn palette(i: usize) -> [u8; 4] {
    let hue = (i as f32 * 0.618_034).fract() * 6.0;
    let x = 1.0 - (hue % 2.0 - 1.0).abs();
    let (r, g, b) = match hue as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let soften = |c: f32| (155.0 + c * 100.0) as u8;
    [soften(r), soften(g), soften(b), 255]
}

fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: [u8; 4]) {
    for py in y..(y + h).min(img.height()) {
        for px in x..(x + w).min(img.width()) {
            img.put_pixel(px, py, Rgba(color));
        }
    }
}

fn draw_outline(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: [u8; 4]) {
    if w == 0 || h == 0 {
        return;
    }
    let (x2, y2) = (x + w - 1, y + h - 1);
    for px in x..=x2.min(img.width() - 1) {
        if y < img.height() {
            img.put_pixel(px, y, Rgba(color));
        }
        if y2 < img.height() {
            img.put_pixel(px, y2, Rgba(color));
        }
    }
    for py in y..=y2.min(img.height() - 1) {
        if x < img.width() {
            img.put_pixel(x, py, Rgba(color));
        }
        if x2 < img.width() {
            img.put_pixel(x2, py, Rgba(color));
        }
    }
}

fn draw_char_scaled(img: &mut RgbaImage, x: u32, y: u32, ch: char, color: [u8; 4], scale: u32) {
    if scale == 0 {
        return;
    }
    if let Some(d) = ch.to_digit(10) {
        let glyph = FONT_3X5[d as usize];
        for (row_i, row) in glyph.iter().enumerate() {
            for col in 0..3 {
                if (row >> (2 - col)) & 1 == 1 {
                    let px0 = x + col * scale;
                    let py0 = y + (row_i as u32) * scale;
                    fill_rect(img, px0, py0, scale, scale, color);
                }
            }
        }
    }
}

// Skips labels that cannot fit inside the gate at 1px per font cell.
fn draw_text_centered(img: &mut RgbaImage, cx: u32, cy: u32, w: u32, h: u32, s: &str) {
    let len = s.chars().count().max(1) as u32;
    let unit_w = 4 * len - 1;
    if w < unit_w + 2 || h < 7 {
        return;
    }
    let scale = ((w * 6 / 10) / unit_w).min((h * 6 / 10) / 5).max(1);
    let text_w = unit_w * scale;
    let text_h = 5 * scale;
    let x0 = cx.saturating_sub(text_w / 2);
    let y0 = cy.saturating_sub(text_h / 2);
    let mut x = x0;
    for ch in s.chars() {
        draw_char_scaled(img, x, y0, ch, GATE_EDGE, scale);
        x += 4 * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_packer_core::{BoundingBox, Placement};

    fn layout() -> Layout {
        Layout {
            strategy: None,
            bounding_box: BoundingBox::new(4, 6),
            placements: vec![
                Placement {
                    name: "g1".into(),
                    x: 0,
                    y: 0,
                    width: 4,
                    height: 4,
                },
                Placement {
                    name: "g2".into(),
                    x: 0,
                    y: 4,
                    width: 2,
                    height: 2,
                },
            ],
        }
    }

    #[test]
    fn image_is_scaled_to_longest_side() {
        let img = render_layout(&layout(), 60);
        assert_eq!(img.dimensions(), (40 + 2 * MARGIN, 60 + 2 * MARGIN));
    }

    #[test]
    fn gates_are_drawn_with_y_up() {
        let img = render_layout(&layout(), 60);
        // g1 occupies the bottom 40 rows; g2 the top-left 20x20 block.
        let bottom_left = img.get_pixel(MARGIN + 2, MARGIN + 58);
        assert_eq!(*bottom_left, Rgba(palette(0)));
        let top_left = img.get_pixel(MARGIN + 2, MARGIN + 2);
        assert_eq!(*top_left, Rgba(palette(1)));
        // Right of g2 above g1 is empty space.
        let gap = img.get_pixel(MARGIN + 30, MARGIN + 5);
        assert_eq!(*gap, Rgba(BACKGROUND));
    }

    #[test]
    fn empty_layout_renders_blank_frame() {
        let empty = Layout {
            strategy: None,
            bounding_box: BoundingBox::new(0, 0),
            placements: Vec::new(),
        };
        let img = render_layout(&empty, 100);
        assert_eq!(img.dimensions(), (1 + 2 * MARGIN, 1 + 2 * MARGIN));
    }
}
