//! Aspect-ratio-preserving placement of the video image.

use crate::orient::Rotation;

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Rect {
    /// Rectangle from origin and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Largest rectangle inside `display` that shows the full video frame
/// without distortion, centered on the display's midpoint.
///
/// `video_ratio` is the source frame's height divided by its width. For
/// the 90°/270° rotations the texture's on-screen footprint is transposed
/// relative to its pixel-space dimensions, so the fit runs in transposed
/// space and the result is swapped back; the returned rectangle is always
/// the on-screen footprint.
///
/// Returns `None` when `video_ratio` or the display rectangle is
/// degenerate — the caller skips the draw for that tick instead of
/// dividing by zero.
#[must_use]
pub fn fit_rect(display: &Rect, rotation: Rotation, video_ratio: f32) -> Option<Rect> {
    if !video_ratio.is_finite() || video_ratio <= 0.0 || display.w <= 0.0 || display.h <= 0.0 {
        return None;
    }

    let (cx, cy) = display.center();

    let mut w = display.w;
    let mut h = display.h;
    if rotation.is_quarter_turn() {
        std::mem::swap(&mut w, &mut h);
    }

    // Largest (w, w * ratio) box inside the (possibly transposed) display.
    if w * video_ratio > h {
        w = h / video_ratio;
    } else {
        h = w * video_ratio;
    }

    if rotation.is_quarter_turn() {
        std::mem::swap(&mut w, &mut h);
    }

    Some(Rect::new(cx - w / 2.0, cy - h / 2.0, w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    const ROTATIONS: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    fn assert_close(a: f32, b: f32, context: &str) {
        assert!((a - b).abs() <= EPS, "{context}: {a} != {b}");
    }

    #[test]
    fn wide_source_in_matching_display() {
        // 1000x500 display, rotation 0, ratio 0.5: aspect matches exactly,
        // the fit is the whole display.
        let display = Rect::new(0.0, 0.0, 1000.0, 500.0);
        let rect = fit_rect(&display, Rotation::Deg0, 0.5).unwrap();
        assert_close(rect.x, 0.0, "x");
        assert_close(rect.y, 0.0, "y");
        assert_close(rect.w, 1000.0, "w");
        assert_close(rect.h, 500.0, "h");
    }

    #[test]
    fn contained_centered_and_aspect_preserving() {
        let displays = [
            Rect::new(0.0, 0.0, 1000.0, 500.0),
            Rect::new(10.0, 20.0, 300.0, 700.0),
            Rect::new(0.0, 0.0, 512.0, 512.0),
            Rect::new(-50.0, 5.0, 1920.0, 1080.0),
        ];
        let ratios = [0.25, 0.5, 0.5625, 0.75, 1.0, 4.0 / 3.0, 1.5, 3.0];

        for display in displays {
            for rotation in ROTATIONS {
                for ratio in ratios {
                    let context = format!("{display:?} {rotation:?} {ratio}");
                    let rect = fit_rect(&display, rotation, ratio).unwrap();

                    // Fully contained.
                    assert!(rect.x >= display.x - EPS, "{context}: left");
                    assert!(rect.y >= display.y - EPS, "{context}: top");
                    assert!(
                        rect.x + rect.w <= display.x + display.w + EPS,
                        "{context}: right"
                    );
                    assert!(
                        rect.y + rect.h <= display.y + display.h + EPS,
                        "{context}: bottom"
                    );

                    // Centered on the display's midpoint.
                    let (cx, cy) = display.center();
                    let (rx, ry) = rect.center();
                    assert_close(rx, cx, &context);
                    assert_close(ry, cy, &context);

                    // Aspect ratio preserved, adjusted for the transpose.
                    let footprint_ratio = if rotation.is_quarter_turn() {
                        rect.w / rect.h
                    } else {
                        rect.h / rect.w
                    };
                    assert!(
                        (footprint_ratio - ratio).abs() <= EPS * ratio.max(1.0),
                        "{context}: ratio {footprint_ratio}"
                    );

                    // Largest: at least one axis is tight against the display.
                    assert!(
                        (rect.w - display.w).abs() <= EPS || (rect.h - display.h).abs() <= EPS,
                        "{context}: not tight ({} x {})",
                        rect.w,
                        rect.h
                    );
                }
            }
        }
    }

    #[test]
    fn quarter_turn_transposes_footprint() {
        // Square source in a wide display: upright fit is height-bound,
        // the quarter-turn fit is identical for a square but a 2:1 source
        // swaps its long axis.
        let display = Rect::new(0.0, 0.0, 800.0, 400.0);
        let upright = fit_rect(&display, Rotation::Deg0, 2.0).unwrap();
        let turned = fit_rect(&display, Rotation::Deg90, 2.0).unwrap();
        assert_close(upright.w, 200.0, "upright w");
        assert_close(upright.h, 400.0, "upright h");
        assert_close(turned.w, 800.0, "turned w");
        assert_close(turned.h, 400.0, "turned h");
    }

    #[test]
    fn degenerate_inputs_yield_none() {
        let display = Rect::new(0.0, 0.0, 100.0, 100.0);
        for rotation in ROTATIONS {
            assert!(fit_rect(&display, rotation, 0.0).is_none());
            assert!(fit_rect(&display, rotation, -1.0).is_none());
            assert!(fit_rect(&display, rotation, f32::NAN).is_none());
            assert!(fit_rect(&display, rotation, f32::INFINITY).is_none());
        }
        assert!(fit_rect(&Rect::new(0.0, 0.0, 0.0, 100.0), Rotation::Deg0, 1.0).is_none());
        assert!(fit_rect(&Rect::new(0.0, 0.0, 100.0, 0.0), Rotation::Deg0, 1.0).is_none());
        assert!(fit_rect(&Rect::new(0.0, 0.0, -5.0, -5.0), Rotation::Deg0, 1.0).is_none());
    }
}
