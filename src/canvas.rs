//! Drawing surface abstraction and the software rasterizer behind the window.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::str::FromStr;

use rusttype::{point, Font, PositionedGlyph, Scale};
use serde::{Deserialize, Serialize};

use crate::geometry::WheelGeometry;

// ============================================================================
// COLOR
// ============================================================================

/// RGBA color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Black with the given opacity in `[0, 1]`.
    pub fn shadow(opacity: f64) -> Self {
        Self::rgba(0, 0, 0, (opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 && hex.len() != 8 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        let a = if hex.len() == 8 { channel(6)? } else { 0xff };
        Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| format!("invalid color '{}', expected #rrggbb or #rrggbbaa", s))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

// ============================================================================
// TRANSFORM
// ============================================================================

/// 2D affine transform in the `[a c e; b d f]` layout used by canvas APIs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            e: self.e + self.a * dx + self.c * dy,
            f: self.f + self.b * dx + self.d * dy,
            ..self
        }
    }

    pub fn rotated(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            ..self
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        Some(Self {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }
}

// ============================================================================
// PATHS
// ============================================================================

/// Closed shapes expressed in the surface's current local frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Path {
    /// Annular sector between two radii; `inner == 0` gives a pie wedge.
    Sector {
        inner: f64,
        outer: f64,
        start: f64,
        end: f64,
    },
    Circle { radius: f64 },
    Polygon(Vec<(f64, f64)>),
}

impl Path {
    pub fn wedge(radius: f64, start: f64, end: f64) -> Self {
        Path::Sector {
            inner: 0.0,
            outer: radius,
            start,
            end,
        }
    }

    /// Signed distance from a local point to the outline, negative inside.
    pub fn signed_distance(&self, x: f64, y: f64) -> f64 {
        match self {
            Path::Circle { radius } => x.hypot(y) - radius,
            Path::Sector {
                inner,
                outer,
                start,
                end,
            } => sector_signed_distance(x, y, *inner, *outer, *start, *end),
            Path::Polygon(points) => polygon_signed_distance(x, y, points),
        }
    }

    /// Points whose bounding box covers the shape.
    fn hull_points(&self) -> Vec<(f64, f64)> {
        match self {
            Path::Circle { radius } => vec![
                (-radius, -radius),
                (*radius, -radius),
                (-radius, *radius),
                (*radius, *radius),
            ],
            Path::Sector {
                inner,
                outer,
                start,
                end,
            } => {
                const SAMPLES: usize = 16;
                let span = (end - start).min(TAU);
                // Chords sag inside the arc; push samples out to cover it.
                let reach = outer / (span / (2.0 * SAMPLES as f64)).cos().max(0.5);
                let mut points = Vec::with_capacity(2 * SAMPLES + 4);
                for i in 0..=SAMPLES {
                    let theta = start + span * i as f64 / SAMPLES as f64;
                    points.push((theta.cos() * reach, theta.sin() * reach));
                    points.push((theta.cos() * inner, theta.sin() * inner));
                }
                points
            }
            Path::Polygon(points) => points.clone(),
        }
    }
}

fn angle_within(theta: f64, start: f64, span: f64) -> bool {
    (theta - start).rem_euclid(TAU) <= span
}

fn segment_distance(px: f64, py: f64, (x0, y0): (f64, f64), (x1, y1): (f64, f64)) -> f64 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((px - x0) * dx + (py - y0) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (x0 + t * dx - px).hypot(y0 + t * dy - py)
}

fn arc_distance(x: f64, y: f64, radius: f64, start: f64, span: f64) -> f64 {
    let r = x.hypot(y);
    if angle_within(y.atan2(x), start, span) {
        return (r - radius).abs();
    }
    let end = start + span;
    let to_start = (start.cos() * radius - x).hypot(start.sin() * radius - y);
    let to_end = (end.cos() * radius - x).hypot(end.sin() * radius - y);
    to_start.min(to_end)
}

fn sector_signed_distance(x: f64, y: f64, inner: f64, outer: f64, start: f64, end: f64) -> f64 {
    let r = x.hypot(y);
    let span = end - start;
    if span >= TAU - 1e-9 {
        let outside_outer = r - outer;
        return if inner > 0.0 {
            outside_outer.max(inner - r)
        } else {
            outside_outer
        };
    }

    let inside = r >= inner && r <= outer && angle_within(y.atan2(x), start, span);
    let edge = |theta: f64| {
        let (sin, cos) = theta.sin_cos();
        segment_distance(x, y, (cos * inner, sin * inner), (cos * outer, sin * outer))
    };
    let mut distance = arc_distance(x, y, outer, start, span)
        .min(edge(start))
        .min(edge(end));
    if inner > 0.0 {
        distance = distance.min(arc_distance(x, y, inner, start, span));
    }
    if inside {
        -distance
    } else {
        distance
    }
}

fn polygon_signed_distance(x: f64, y: f64, points: &[(f64, f64)]) -> f64 {
    if points.len() < 2 {
        return f64::INFINITY;
    }
    let mut inside = false;
    let mut distance = f64::INFINITY;
    for (i, &p0) in points.iter().enumerate() {
        let p1 = points[(i + 1) % points.len()];
        distance = distance.min(segment_distance(x, y, p0, p1));
        if (p0.1 > y) != (p1.1 > y) {
            let cross_x = p0.0 + (y - p0.1) * (p1.0 - p0.0) / (p1.1 - p0.1);
            if x < cross_x {
                inside = !inside;
            }
        }
    }
    if inside {
        -distance
    } else {
        distance
    }
}


// ============================================================================
// WHEEL PAINT
// ============================================================================

/// How one layer of a [`WheelPaint`] is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Color),
    Stroke { color: Color, line_width: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPaint {
    pub wedge: Color,
    pub ring: Color,
}

/// Backing disk, wedges and ring bands of a wheel, in the wheel's own frame.
///
/// Segment `i` spans `WheelGeometry::segment_span(i)`. Wedges run from the
/// centre to `inner_radius`, ring bands from `inner_radius` to `radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelPaint {
    pub radius: f64,
    pub inner_radius: f64,
    pub backing: Color,
    pub segments: Vec<SegmentPaint>,
    pub wedge_outline: Color,
    pub ring_outline: Color,
    pub outline_width: f64,
}

impl WheelPaint {
    pub fn geometry(&self) -> WheelGeometry {
        WheelGeometry::new(self.segments.len())
    }

    pub fn wedge_path(&self, index: usize) -> Path {
        let (start, end) = self.geometry().segment_span(index);
        Path::wedge(self.inner_radius, start, end)
    }

    pub fn ring_path(&self, index: usize) -> Path {
        let (start, end) = self.geometry().segment_span(index);
        Path::Sector {
            inner: self.inner_radius,
            outer: self.radius,
            start,
            end,
        }
    }

    /// Every layer in paint order: the backing disk, each wedge followed by its
    /// outline, then each ring band followed by its outline.
    pub fn layers(&self) -> Vec<(Path, Paint)> {
        let mut layers = Vec::with_capacity(1 + 4 * self.segments.len());
        layers.push((Path::Circle { radius: self.radius }, Paint::Fill(self.backing)));
        let wedge_outline = Paint::Stroke {
            color: self.wedge_outline,
            line_width: self.outline_width,
        };
        for (index, colors) in self.segments.iter().enumerate() {
            let path = self.wedge_path(index);
            layers.push((path.clone(), Paint::Fill(colors.wedge)));
            layers.push((path, wedge_outline));
        }
        let ring_outline = Paint::Stroke {
            color: self.ring_outline,
            line_width: self.outline_width,
        };
        for (index, colors) in self.segments.iter().enumerate() {
            let path = self.ring_path(index);
            layers.push((path.clone(), Paint::Fill(colors.ring)));
            layers.push((path, ring_outline));
        }
        layers
    }
}

/// Distance from a point at radius `r` to a ray from the origin `offset`
/// radians away from it.
fn ray_distance(r: f64, offset: f64) -> f64 {
    if offset < FRAC_PI_2 {
        r * offset.sin()
    } else {
        r
    }
}

// ============================================================================
// SURFACE
// ============================================================================

/// Text width measurement, needed to fit labels before they are drawn.
pub trait TextMeasure {
    fn measure_text(&self, text: &str, font_size: f32) -> f64;
}

/// Square 2D drawing surface with a canvas-style transform stack.
pub trait Surface: TextMeasure {
    /// Side length in pixels.
    fn size(&self) -> u32;
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, angle: f64);
    fn fill_path(&mut self, path: &Path, color: Color);
    fn stroke_path(&mut self, path: &Path, color: Color, line_width: f64);
    /// Draws `text` centred horizontally and vertically on the local origin.
    fn fill_text(&mut self, text: &str, font_size: f32, color: Color);

    fn fill_wheel(&mut self, wheel: &WheelPaint) {
        paint_layers(self, wheel);
    }
}

/// Paints `wheel` one layer at a time through `fill_path` and `stroke_path`.
pub fn paint_layers<S: Surface + ?Sized>(surface: &mut S, wheel: &WheelPaint) {
    for (path, paint) in wheel.layers() {
        match paint {
            Paint::Fill(color) => surface.fill_path(&path, color),
            Paint::Stroke { color, line_width } => surface.stroke_path(&path, color, line_width),
        }
    }
}

/// Loaded label font.
pub struct LabelFont {
    font: Font<'static>,
}

impl LabelFont {
    pub fn from_bytes(data: Vec<u8>) -> Option<Self> {
        Font::try_from_vec(data).map(|font| Self { font })
    }

    /// Advance width of the laid-out string.
    pub fn text_width(&self, text: &str, font_size: f32) -> f64 {
        let scale = Scale::uniform(font_size);
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|glyph| {
                (glyph.position().x + glyph.unpositioned().h_metrics().advance_width) as f64
            })
            .unwrap_or(0.0)
    }

    fn layout(&self, text: &str, font_size: f32) -> (Vec<PositionedGlyph<'static>>, f64) {
        let scale = Scale::uniform(font_size);
        let v_metrics = self.font.v_metrics(scale);
        // Middle baseline: the em box is centred on y = 0.
        let baseline = (v_metrics.ascent + v_metrics.descent) / 2.0;
        let glyphs: Vec<PositionedGlyph<'static>> = self
            .font
            .layout(text, scale, point(0.0, baseline))
            .collect();
        (glyphs, self.text_width(text, font_size))
    }
}

impl fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelFont").field("glyphs", &self.font.glyph_count()).finish()
    }
}

/// Anti-aliased rasterizer over a square RGBA8 framebuffer.
pub struct PixelCanvas<'a> {
    frame: &'a mut [u8],
    size: usize,
    background: Color,
    font: Option<&'a LabelFont>,
    transform: Transform,
    stack: Vec<Transform>,
    distance_evaluations: usize,
}

impl<'a> PixelCanvas<'a> {
    /// `frame` must hold `size * size` RGBA pixels.
    pub fn new(frame: &'a mut [u8], size: u32, background: Color, font: Option<&'a LabelFont>) -> Self {
        let size = size as usize;
        debug_assert!(frame.len() >= size * size * 4);
        Self {
            frame,
            size,
            background,
            font,
            transform: Transform::IDENTITY,
            stack: Vec::new(),
            distance_evaluations: 0,
        }
    }

    /// Signed-distance evaluations performed by this canvas so far.
    pub fn distance_evaluations(&self) -> usize {
        self.distance_evaluations
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let idx = (y * self.size + x) * 4;
        let px = &self.frame[idx..idx + 4];
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    fn blend_pixel(&mut self, x: i64, y: i64, color: Color, coverage: f64) {
        if x < 0 || y < 0 || x as usize >= self.size || y as usize >= self.size {
            return;
        }
        let alpha = coverage.clamp(0.0, 1.0) * color.a as f64 / 255.0;
        if alpha <= 0.0 {
            return;
        }
        let idx = (y as usize * self.size + x as usize) * 4;
        let dst = &mut self.frame[idx..idx + 4];
        let src = [color.r, color.g, color.b];
        for channel in 0..3 {
            let blended = src[channel] as f64 * alpha + dst[channel] as f64 * (1.0 - alpha);
            dst[channel] = blended.round() as u8;
        }
        dst[3] = 0xff;
    }

    /// Splats a sub-pixel sample across its four neighbours.
    fn blend_subpixel(&mut self, x: f64, y: f64, color: Color, coverage: f64) {
        let x_floor = x.floor();
        let y_floor = y.floor();
        let x_frac = x - x_floor;
        let y_frac = y - y_floor;
        let (xi, yi) = (x_floor as i64, y_floor as i64);
        let samples = [
            (xi, yi, (1.0 - x_frac) * (1.0 - y_frac)),
            (xi + 1, yi, x_frac * (1.0 - y_frac)),
            (xi, yi + 1, (1.0 - x_frac) * y_frac),
            (xi + 1, yi + 1, x_frac * y_frac),
        ];
        for (px, py, weight) in samples {
            if weight * coverage > 0.001 {
                self.blend_pixel(px, py, color, weight * coverage);
            }
        }
    }

    /// Screen-space pixel range covering `path`, padded by `pad` pixels.
    fn screen_bounds(&self, path: &Path, pad: f64) -> Option<(i64, i64, i64, i64)> {
        let points = path.hull_points();
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (x, y) in points {
            let (sx, sy) = self.transform.apply(x, y);
            min_x = min_x.min(sx);
            min_y = min_y.min(sy);
            max_x = max_x.max(sx);
            max_y = max_y.max(sy);
        }
        if !min_x.is_finite() || !max_x.is_finite() {
            return None;
        }
        let limit = self.size as i64 - 1;
        let x0 = ((min_x - pad).floor() as i64).max(0);
        let y0 = ((min_y - pad).floor() as i64).max(0);
        let x1 = ((max_x + pad).ceil() as i64).min(limit);
        let y1 = ((max_y + pad).ceil() as i64).min(limit);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }

    fn rasterize(&mut self, path: &Path, color: Color, pad: f64, coverage: impl Fn(f64) -> f64) {
        let Some(inverse) = self.transform.invert() else {
            return;
        };
        let Some((x0, y0, x1, y1)) = self.screen_bounds(path, pad) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (lx, ly) = inverse.apply(x as f64 + 0.5, y as f64 + 0.5);
                self.distance_evaluations += 1;
                let alpha = coverage(path.signed_distance(lx, ly));
                if alpha > 0.0 {
                    self.blend_pixel(x, y, color, alpha);
                }
            }
        }
    }

    /// Fill and outline of one wheel layer at a single pixel.
    fn paint_wheel_layer(&mut self, (x, y): (i64, i64), local: (f64, f64), path: &Path, (fill, outline): (Color, Color), band: f64) {
        self.distance_evaluations += 1;
        let distance = path.signed_distance(local.0, local.1);
        self.blend_pixel(x, y, fill, (0.5 - distance).clamp(0.0, 1.0));
        self.blend_pixel(x, y, outline, (band - distance.abs()).clamp(0.0, 1.0));
    }
}

impl TextMeasure for PixelCanvas<'_> {
    fn measure_text(&self, text: &str, font_size: f32) -> f64 {
        self.font.map_or(0.0, |font| font.text_width(text, font_size))
    }
}

impl Surface for PixelCanvas<'_> {
    fn size(&self) -> u32 {
        self.size as u32
    }

    fn clear(&mut self) {
        let (r, g, b) = self.background.as_tuple();
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[r, g, b, 0xff]);
        }
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.stack.pop() {
            self.transform = transform;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.translated(dx, dy);
    }

    fn rotate(&mut self, angle: f64) {
        self.transform = self.transform.rotated(angle);
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        self.rasterize(path, color, 2.0, |distance| (0.5 - distance).clamp(0.0, 1.0));
    }

    fn stroke_path(&mut self, path: &Path, color: Color, line_width: f64) {
        let half = line_width / 2.0;
        self.rasterize(path, color, half + 2.0, |distance| {
            (half + 0.5 - distance.abs()).clamp(0.0, 1.0)
        });
    }

    /// Single polar pass over the wheel's pixels. Radius and angle are computed
    /// once per pixel; pixels clear of every outline band take their region's
    /// colour directly, and only pixels near a boundary evaluate the layers
    /// that can reach them, in layer order.
    fn fill_wheel(&mut self, wheel: &WheelPaint) {
        let count = wheel.segments.len();
        if count == 0 {
            return;
        }
        let Some(inverse) = self.transform.invert() else {
            return;
        };
        let band = wheel.outline_width / 2.0 + 0.5;
        let Some((x0, y0, x1, y1)) = self.screen_bounds(&Path::Circle { radius: wheel.radius }, band + 1.0) else {
            return;
        };
        let geometry = wheel.geometry();
        let slice = geometry.slice();
        let radial_edges = count > 1;
        // Inside this radius segments beyond the adjacent ones reach the band.
        let crowded_radius = band / slice.min(FRAC_PI_2).sin();
        let mut candidates: Vec<usize> = Vec::with_capacity(count);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let local = inverse.apply(x as f64 + 0.5, y as f64 + 0.5);
                let r = local.0.hypot(local.1);
                let to_rim = r - wheel.radius;
                if to_rim >= band {
                    continue;
                }
                let theta = local.1.atan2(local.0).rem_euclid(TAU);
                let index = geometry.segment_at(theta);
                let offset = (theta - index as f64 * slice).clamp(0.0, slice);
                let near_start = radial_edges && ray_distance(r, offset) < band;
                let near_end = radial_edges && ray_distance(r, slice - offset) < band;
                let near_inner = (r - wheel.inner_radius).abs() < band;

                if !(near_start || near_end || near_inner || to_rim > -band) {
                    let colors = wheel.segments[index];
                    let fill = if r < wheel.inner_radius { colors.wedge } else { colors.ring };
                    self.blend_pixel(x, y, wheel.backing, 1.0);
                    self.blend_pixel(x, y, fill, 1.0);
                    continue;
                }

                candidates.clear();
                if radial_edges && r < crowded_radius {
                    candidates.extend(0..count);
                } else {
                    candidates.push(index);
                    if near_start {
                        candidates.push((index + count - 1) % count);
                    }
                    if near_end {
                        candidates.push((index + 1) % count);
                    }
                    candidates.sort_unstable();
                    candidates.dedup();
                }

                self.blend_pixel(x, y, wheel.backing, (0.5 - to_rim).clamp(0.0, 1.0));
                if r < wheel.inner_radius + band {
                    for &i in &candidates {
                        let path = wheel.wedge_path(i);
                        self.paint_wheel_layer((x, y), local, &path, (wheel.segments[i].wedge, wheel.wedge_outline), band);
                    }
                }
                if r > wheel.inner_radius - band {
                    for &i in &candidates {
                        let path = wheel.ring_path(i);
                        self.paint_wheel_layer((x, y), local, &path, (wheel.segments[i].ring, wheel.ring_outline), band);
                    }
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, font_size: f32, color: Color) {
        let Some(font) = self.font else {
            return;
        };
        let (glyphs, width) = font.layout(text, font_size);
        let offset_x = -width / 2.0;
        let transform = self.transform;
        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            let mut samples = Vec::new();
            glyph.draw(|gx, gy, v| {
                if v > 0.001 {
                    let lx = offset_x + (bb.min.x + gx as i32) as f64 + 0.5;
                    let ly = (bb.min.y + gy as i32) as f64 + 0.5;
                    samples.push((lx, ly, v as f64));
                }
            });
            for (lx, ly, v) in samples {
                let (sx, sy) = transform.apply(lx, ly);
                self.blend_subpixel(sx - 0.5, sy - 0.5, color, v);
            }
        }
    }
}
