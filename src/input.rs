//! Viewport and pointer tracking for the backdrop.
//!
//! The tracker is the only writer of pointer/viewport state; the animation
//! loop only reads it. Events are folded in as they arrive (latest value
//! wins, nothing is queued) and the loop picks up whatever is current at the
//! start of its frame.

use glam::Vec2;
use winit::event::WindowEvent;

/// Current draw-surface geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
    /// Platform pixel ratio.
    pub scale_factor: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale_factor: 1.0,
        }
    }

    /// Width-over-height aspect ratio.
    pub fn aspect(&self) -> f32 {
        if self.height > 0 {
            self.width as f32 / self.height as f32
        } else {
            1.0
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

/// Pointer state normalized against the current viewport.
///
/// The normalized vector lives in `[-1, 1] x [-1, 1]` with the origin at the
/// viewport center. It keeps screen convention: y grows downward, and the
/// camera negates it when deriving its world-space target.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerTracker {
    pointer: Vec2,
    position: Vec2,
    viewport: Viewport,
}

impl PointerTracker {
    /// Create a tracker with the pointer resting at the viewport center.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pointer: Vec2::ZERO,
            position: Vec2::new(width as f32 / 2.0, height as f32 / 2.0),
            viewport: Viewport::new(width, height),
        }
    }

    /// Normalized pointer vector, `[-1, 1]` on each axis.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Raw pointer position in physical pixels.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.viewport.scale_factor = scale_factor;
    }

    /// Fold a winit window event into the tracked state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.set_cursor(position.x, position.y);
            }

            WindowEvent::Resized(size) => {
                self.viewport.resize(size.width, size.height);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.viewport.scale_factor = *scale_factor;
            }

            _ => {}
        }
    }

    fn set_cursor(&mut self, x: f64, y: f64) {
        self.position = Vec2::new(x as f32, y as f32);

        let (w, h) = (self.viewport.width, self.viewport.height);
        if w > 0 && h > 0 {
            self.pointer = Vec2::new(
                (x as f32 / w as f32) * 2.0 - 1.0,
                (y as f32 / h as f32) * 2.0 - 1.0,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cursor updates go through set_cursor directly (normally fed by
    // handle_event from winit's CursorMoved).

    #[test]
    fn test_center_normalizes_to_zero() {
        let mut tracker = PointerTracker::new(800, 600);
        tracker.set_cursor(400.0, 300.0);

        assert!(tracker.pointer().x.abs() < 1e-6);
        assert!(tracker.pointer().y.abs() < 1e-6);
    }

    #[test]
    fn test_corners_normalize_to_unit_range() {
        let mut tracker = PointerTracker::new(800, 600);

        tracker.set_cursor(0.0, 0.0);
        assert_eq!(tracker.pointer(), Vec2::new(-1.0, -1.0));

        tracker.set_cursor(800.0, 600.0);
        assert_eq!(tracker.pointer(), Vec2::new(1.0, 1.0));

        // Screen convention: below center is positive y.
        tracker.set_cursor(400.0, 600.0);
        assert_eq!(tracker.pointer(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_last_write_wins() {
        let mut tracker = PointerTracker::new(800, 600);
        tracker.set_cursor(100.0, 100.0);
        tracker.set_cursor(700.0, 500.0);

        assert_eq!(tracker.position(), Vec2::new(700.0, 500.0));
        assert!(tracker.pointer().x > 0.0);
    }

    #[test]
    fn test_resize_updates_aspect_and_future_normalization() {
        let mut tracker = PointerTracker::new(800, 600);
        assert!((tracker.viewport().aspect() - 800.0 / 600.0).abs() < 1e-6);

        tracker.viewport.resize(1600, 900);
        assert!((tracker.viewport().aspect() - 1600.0 / 900.0).abs() < 1e-6);

        // The stored pointer is untouched by a resize; only new events use
        // the new dimensions.
        tracker.set_cursor(800.0, 450.0);
        assert_eq!(tracker.pointer(), Vec2::ZERO);
    }

    #[test]
    fn test_zero_viewport_keeps_last_pointer() {
        let mut tracker = PointerTracker::new(800, 600);
        tracker.set_cursor(800.0, 600.0);
        tracker.viewport.resize(0, 0);
        tracker.set_cursor(10.0, 10.0);

        assert_eq!(tracker.pointer(), Vec2::new(1.0, 1.0));
        assert_eq!(tracker.viewport().aspect(), 1.0);
    }

    #[test]
    fn test_scale_factor_tracks_platform_ratio() {
        let mut tracker = PointerTracker::new(800, 600);
        assert_eq!(tracker.viewport().scale_factor, 1.0);
        tracker.set_scale_factor(2.0);
        assert_eq!(tracker.viewport().scale_factor, 2.0);
    }
}
