//! Angle conventions shared by the renderer and the winner resolver.
//!
//! The drawing surface has y growing downward, so a positive rotation turns the
//! wheel clockwise on screen and "up" is `-π/2`. The renderer rotates its frame
//! by [`WheelGeometry::frame_rotation`]; [`WheelGeometry::resolve`] is the exact
//! inverse of that rotation. Both read the same constants from here.

use std::f64::consts::{FRAC_PI_2, TAU};

/// Direction of the fixed pointer on the surface.
pub const POINTER_ANGLE: f64 = -FRAC_PI_2;

/// Outer ring band width as a fraction of the wheel radius.
pub const RING_WIDTH_FACTOR: f64 = 0.2;

/// Label anchor distance inward from the rim, as a fraction of the ring width.
pub const LABEL_INSET_FACTOR: f64 = 0.55;

/// Share of the per-slice arc length a label may occupy.
pub const LABEL_FILL_FACTOR: f64 = 0.8;

pub const MIN_FONT_SIZE: f32 = 8.0;
pub const MIN_INITIAL_FONT_SIZE: f32 = 9.0;
pub const HUB_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    segment_count: usize,
    slice: f64,
}

impl WheelGeometry {
    pub fn new(segment_count: usize) -> Self {
        let segment_count = segment_count.max(1);
        Self {
            segment_count,
            slice: TAU / segment_count as f64,
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Angular width of one segment.
    pub fn slice(&self) -> f64 {
        self.slice
    }

    /// Offset that puts the centre of segment 0 under the pointer at angle 0.
    pub fn base_offset(&self) -> f64 {
        POINTER_ANGLE - self.slice / 2.0
    }

    /// Rotation applied to the wheel frame for a given wheel angle.
    pub fn frame_rotation(&self, angle: f64) -> f64 {
        angle + self.base_offset()
    }

    /// Angular span `[start, end)` of segment `index` in the wheel frame.
    pub fn segment_span(&self, index: usize) -> (f64, f64) {
        let start = index as f64 * self.slice;
        (start, start + self.slice)
    }

    pub fn segment_center(&self, index: usize) -> f64 {
        index as f64 * self.slice + self.slice / 2.0
    }

    /// Segment covering a wheel-frame angle.
    pub fn segment_at(&self, local_angle: f64) -> usize {
        let local = local_angle.rem_euclid(TAU);
        (local / self.slice).floor() as usize % self.segment_count
    }

    /// Wheel-frame angle that currently sits under the pointer.
    pub fn local_angle_under_pointer(&self, angle: f64) -> f64 {
        (POINTER_ANGLE - self.frame_rotation(angle)).rem_euclid(TAU)
    }

    /// Index of the segment under the pointer when the wheel is at `angle`.
    pub fn resolve(&self, angle: f64) -> usize {
        self.segment_at(self.local_angle_under_pointer(angle))
    }
}

/// Radii and text sizing derived from the surface side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelLayout {
    pub radius: f64,
    pub ring_width: f64,
    pub inner_radius: f64,
    pub label_radius: f64,
    pub label_max_width: f64,
    pub initial_font_size: f32,
}

impl WheelLayout {
    pub fn new(surface_size: u32, geometry: &WheelGeometry) -> Self {
        let radius = surface_size as f64 / 2.0;
        let ring_width = radius * RING_WIDTH_FACTOR;
        let initial_font_size = ((ring_width * 0.4).floor() as f32).max(MIN_INITIAL_FONT_SIZE);
        Self {
            radius,
            ring_width,
            inner_radius: radius - ring_width,
            label_radius: radius - ring_width * LABEL_INSET_FACTOR,
            label_max_width: radius * geometry.slice() * LABEL_FILL_FACTOR,
            initial_font_size,
        }
    }
}

/// Square surface side for an available viewport dimension.
pub fn viewport_side(available: u32, max_size: u32, scale: f64) -> u32 {
    let scaled = (available as f64 * scale).floor();
    (scaled as u32).clamp(1, max_size.max(1))
}
