//! Tray icon generation.
//!
//! Draws the microphone glyph for both indicator states: white microphone
//! on a green disc when live, on a red disc with a strike-through when
//! muted.

use crate::feedback::IconKind;
use tray_icon::Icon;

/// Icon size in pixels.
pub const ICON_SIZE: u32 = 32;

const LIVE_RGB: (u8, u8, u8) = (60, 180, 60);
const MUTED_RGB: (u8, u8, u8) = (220, 60, 60);

/// Build the tray icon for `kind`.
pub fn create_icon(kind: IconKind) -> Result<Icon, String> {
    let rgba = generate_microphone_icon(kind);
    Icon::from_rgba(rgba, ICON_SIZE, ICON_SIZE).map_err(|e| e.to_string())
}

/// Generate a microphone icon as RGBA data.
fn generate_microphone_icon(kind: IconKind) -> Vec<u8> {
    let size = ICON_SIZE as usize;
    let mut rgba = vec![0u8; size * size * 4];

    let (r, g, b) = match kind {
        IconKind::MicOn => LIVE_RGB,
        IconKind::MicOff => MUTED_RGB,
    };

    let center = size as f32 / 2.0;
    let radius = center - 1.0;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            let dist = (dx * dx + dy * dy).sqrt();
            // Anti-aliased edge
            let coverage = (radius + 0.5 - dist).clamp(0.0, 1.0);
            if coverage > 0.0 {
                put(&mut rgba, size, x, y, (r, g, b), (coverage * 255.0) as u8);
            }
        }
    }

    draw_microphone(&mut rgba, size);

    if kind == IconKind::MicOff {
        draw_strike_through(&mut rgba, size);
    }

    rgba
}

fn put(rgba: &mut [u8], size: usize, x: usize, y: usize, rgb: (u8, u8, u8), alpha: u8) {
    if x >= size || y >= size {
        return;
    }
    let idx = (y * size + x) * 4;
    rgba[idx] = rgb.0;
    rgba[idx + 1] = rgb.1;
    rgba[idx + 2] = rgb.2;
    rgba[idx + 3] = alpha;
}

/// Capsule, holder arc, stand and base in white.
fn draw_microphone(rgba: &mut [u8], size: usize) {
    const WHITE: (u8, u8, u8) = (255, 255, 255);
    let cx = size as f32 / 2.0;

    // Capsule: rounded rectangle 8px wide spanning y 6..18
    let half_w = size as f32 / 8.0;
    let (top, bottom) = (size as f32 * 0.19, size as f32 * 0.56);
    for y in 0..size {
        for x in 0..size {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let dx = (px - cx).abs();
            let inside = if py < top + half_w {
                let dy = top + half_w - py;
                dx * dx + dy * dy <= half_w * half_w
            } else if py > bottom - half_w {
                let dy = py - (bottom - half_w);
                dx * dx + dy * dy <= half_w * half_w
            } else {
                dx <= half_w
            };
            if inside {
                put(rgba, size, x, y, WHITE, 255);
            }
        }
    }

    // Holder: lower half ring around the capsule
    let ring_cy = bottom - half_w;
    let ring_r = half_w + 3.0;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - ring_cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if dy >= 0.0 && (dist - ring_r).abs() <= 0.8 {
                put(rgba, size, x, y, WHITE, 255);
            }
        }
    }

    // Stand and base
    let stand_top = (ring_cy + ring_r) as usize;
    let base_y = stand_top + 3;
    let cxi = size / 2;
    for y in stand_top..=base_y {
        put(rgba, size, cxi, y, WHITE, 255);
        put(rgba, size, cxi - 1, y, WHITE, 255);
    }
    for x in (cxi - 5)..(cxi + 5) {
        put(rgba, size, x, base_y, WHITE, 255);
    }
}

/// Draw a diagonal strike-through line.
fn draw_strike_through(rgba: &mut [u8], size: usize) {
    const THICKNESS: usize = 3;
    for i in 5..(size - 5) {
        for t in 0..THICKNESS {
            put(rgba, size, i + t, i, (255, 255, 255), 255);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(rgba: &[u8], x: usize, y: usize) -> [u8; 4] {
        let idx = (y * ICON_SIZE as usize + x) * 4;
        [rgba[idx], rgba[idx + 1], rgba[idx + 2], rgba[idx + 3]]
    }

    #[test]
    fn states_use_distinct_backgrounds() {
        let live = generate_microphone_icon(IconKind::MicOn);
        let muted = generate_microphone_icon(IconKind::MicOff);
        assert_eq!(live.len(), (ICON_SIZE * ICON_SIZE * 4) as usize);

        // corner is transparent, edge of disc carries the state colour
        assert_eq!(pixel(&live, 0, 0)[3], 0);
        assert_eq!(pixel(&live, 3, 16), [60, 180, 60, 255]);
        assert_eq!(pixel(&muted, 3, 16), [220, 60, 60, 255]);
    }

    #[test]
    fn muted_icon_is_struck_through() {
        let live = generate_microphone_icon(IconKind::MicOn);
        let muted = generate_microphone_icon(IconKind::MicOff);
        assert_eq!(pixel(&muted, 7, 6), [255, 255, 255, 255]);
        assert_ne!(pixel(&live, 7, 6), [255, 255, 255, 255]);
    }
}
