use crate::db::core::Design;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect as ImgRect;

const MARGIN: u32 = 20;
const MOVABLE_COLOR: Rgb<u8> = Rgb([70, 130, 220]);
const FIXED_COLOR: Rgb<u8> = Rgb([220, 80, 60]);
const CORE_COLOR: Rgb<u8> = Rgb([40, 40, 40]);
const BACKGROUND: Rgb<u8> = Rgb([250, 250, 250]);

/// Renders a frozen `Design` to a raster PNG: the core region as an outline,
/// movable cells in one color, fixed cells/terminals in another. Never called
/// from the solver's hot path; the CLI invokes this only behind `-v`.
pub fn draw_placement(design: &Design, path: &str, canvas_size: u32) -> std::io::Result<()> {
    let core_w = (design.core.width()).max(1.0);
    let core_h = (design.core.height()).max(1.0);
    let scale = (canvas_size as f64 - 2.0 * MARGIN as f64) / core_w.max(core_h);

    let img_w = (core_w * scale).round() as u32 + 2 * MARGIN;
    let img_h = (core_h * scale).round() as u32 + 2 * MARGIN;

    let mut img = RgbImage::from_pixel(img_w.max(1), img_h.max(1), BACKGROUND);

    let to_px = |x: f64, y: f64| -> (i32, i32) {
        let px = MARGIN as f64 + (x - design.core.min.x) * scale;
        let py = img_h as f64 - MARGIN as f64 - (y - design.core.min.y) * scale;
        (px.round() as i32, py.round() as i32)
    };

    let (core_x0, core_y1) = to_px(design.core.min.x, design.core.min.y);
    let (core_x1, core_y0) = to_px(design.core.max.x, design.core.max.y);
    draw_hollow_rect_mut(
        &mut img,
        ImgRect::at(core_x0, core_y0).of_size(
            (core_x1 - core_x0).max(1) as u32,
            (core_y1 - core_y0).max(1) as u32,
        ),
        CORE_COLOR,
    );

    for node in &design.nodes {
        let (x0, y1) = to_px(node.x, node.y);
        let (x1, y0) = to_px(node.x + node.width, node.y + node.height);
        let w = (x1 - x0).max(1) as u32;
        let h = (y1 - y0).max(1) as u32;
        let color = if node.is_fixed { FIXED_COLOR } else { MOVABLE_COLOR };
        draw_filled_rect_mut(&mut img, ImgRect::at(x0, y0).of_size(w, h), color);
    }

    img.save(path)
        .map_err(|e| std::io::Error::other(e.to_string()))
}
