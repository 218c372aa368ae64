//! Zoom and pan model for the receipt image lightbox.

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 5.0;
pub const WHEEL_STEP: f64 = 0.15;
pub const BUTTON_STEP: f64 = 0.25;
pub const CLICK_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragOrigin {
    pointer: (f64, f64),
    offset: (f64, f64),
}

/// Zoom level and pan offset of the lightbox image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomPan {
    zoom: f64,
    offset: (f64, f64),
    drag: Option<DragOrigin>,
    /// Set when a drag moved the image, so the trailing click is ignored.
    swallow_click: bool,
}

impl Default for ZoomPan {
    fn default() -> Self {
        Self {
            zoom: MIN_ZOOM,
            offset: (0.0, 0.0),
            drag: None,
            swallow_click: false,
        }
    }
}

impl ZoomPan {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    pub fn percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn can_pan(&self) -> bool {
        self.zoom > MIN_ZOOM
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn at_max(&self) -> bool {
        self.zoom >= MAX_ZOOM
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = ((zoom.clamp(MIN_ZOOM, MAX_ZOOM)) * 100.0).round() / 100.0;
        if !self.can_pan() {
            self.offset = (0.0, 0.0);
            self.drag = None;
        }
    }

    /// Mouse wheel: scrolling up (negative delta) zooms in.
    pub fn wheel(&mut self, delta_y: f64) {
        if delta_y < 0.0 {
            self.set_zoom(self.zoom + WHEEL_STEP);
        } else if delta_y > 0.0 {
            self.set_zoom(self.zoom - WHEEL_STEP);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + BUTTON_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - BUTTON_STEP);
    }

    /// Click on the image: step in, or reset once fully zoomed.
    pub fn click(&mut self) {
        if std::mem::take(&mut self.swallow_click) {
            return;
        }
        if self.at_max() {
            self.reset();
        } else {
            self.set_zoom(self.zoom + CLICK_STEP);
        }
    }

    /// Start a drag. Ignored at base zoom.
    pub fn begin_drag(&mut self, x: f64, y: f64) -> bool {
        if !self.can_pan() {
            return false;
        }
        self.drag = Some(DragOrigin {
            pointer: (x, y),
            offset: self.offset,
        });
        true
    }

    pub fn drag_to(&mut self, x: f64, y: f64) {
        if let Some(origin) = self.drag {
            let dx = x - origin.pointer.0;
            let dy = y - origin.pointer.1;
            self.offset = (origin.offset.0 + dx, origin.offset.1 + dy);
            if dx != 0.0 || dy != 0.0 {
                self.swallow_click = true;
            }
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// CSS `transform` value for the image element.
    pub fn transform_css(&self) -> String {
        format!(
            "scale({:.2}) translate({:.1}px, {:.1}px)",
            self.zoom,
            self.offset.0 / self.zoom,
            self.offset.1 / self.zoom
        )
    }

    pub fn cursor(&self) -> &'static str {
        if self.is_dragging() {
            "grabbing"
        } else if self.at_max() {
            "zoom-out"
        } else if self.can_pan() {
            "grab"
        } else {
            "zoom-in"
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    #[test]
    fn zoom_is_clamped() {
        let mut zp = ZoomPan::default();
        zp.zoom_out();
        assert_eq!(zp.zoom(), MIN_ZOOM);
        for _ in 0..40 {
            zp.zoom_in();
        }
        assert_eq!(zp.zoom(), MAX_ZOOM);
        assert_eq!(zp.percent(), 500);
    }

    #[test]
    fn wheel_direction_and_step() {
        let mut zp = ZoomPan::default();
        zp.wheel(-120.0);
        assert_eq!(zp.zoom(), 1.15);
        zp.wheel(-1.0);
        assert_eq!(zp.zoom(), 1.3);
        zp.wheel(3.0);
        assert_eq!(zp.zoom(), 1.15);
        zp.wheel(0.0);
        assert_eq!(zp.zoom(), 1.15);
    }

    #[test]
    fn click_steps_then_resets_at_max() {
        let mut zp = ZoomPan::default();
        for _ in 0..8 {
            zp.click();
        }
        assert_eq!(zp.zoom(), MAX_ZOOM);
        zp.click();
        assert_eq!(zp, ZoomPan::default());
    }

    #[test]
    fn drag_pans_only_when_zoomed() {
        let mut zp = ZoomPan::default();
        assert!(!zp.begin_drag(10.0, 10.0));
        zp.drag_to(50.0, 50.0);
        assert_eq!(zp.offset(), (0.0, 0.0));

        zp.zoom_in();
        assert!(zp.begin_drag(10.0, 10.0));
        zp.drag_to(30.0, 5.0);
        zp.end_drag();
        assert_eq!(zp.offset(), (20.0, -5.0));

        // The click that ends a drag does not zoom.
        zp.click();
        assert_eq!(zp.zoom(), 1.25);

        // Continuing from the previous offset.
        zp.begin_drag(0.0, 0.0);
        zp.drag_to(5.0, 5.0);
        zp.end_drag();
        assert_eq!(zp.offset(), (25.0, 0.0));
    }

    #[test]
    fn returning_to_base_zoom_recenters() {
        let mut zp = ZoomPan::default();
        zp.zoom_in();
        zp.begin_drag(0.0, 0.0);
        zp.drag_to(40.0, 40.0);
        zp.end_drag();
        zp.zoom_out();
        assert_eq!(zp.offset(), (0.0, 0.0));
        assert_eq!(zp.transform_css(), "scale(1.00) translate(0.0px, 0.0px)");
    }

    #[test]
    fn cursor_reflects_state() {
        let mut zp = ZoomPan::default();
        assert_eq!(zp.cursor(), "zoom-in");
        zp.zoom_in();
        assert_eq!(zp.cursor(), "grab");
        zp.begin_drag(0.0, 0.0);
        assert_eq!(zp.cursor(), "grabbing");
    }
}
