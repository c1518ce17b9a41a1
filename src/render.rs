//! Wheel rendering as a retained-mode scene.
//!
//! A [`Scene`] is a flat list of [`DrawCommand`]s built from the wheel angle,
//! segments and surface size. It holds no state beyond those inputs, so the
//! same inputs always produce the same commands, and it can be replayed onto
//! any [`Surface`].

use std::f64::consts::FRAC_PI_2;

use crate::canvas::{Color, Path, SegmentPaint, Surface, TextMeasure, WheelPaint};
use crate::config::Palette;
use crate::geometry::{WheelGeometry, WheelLayout, HUB_RADIUS, MIN_FONT_SIZE};
use crate::segment::{Segment, Segments};

const WEDGE_OUTLINE_OPACITY: f64 = 0.12;
const RING_OUTLINE_OPACITY: f64 = 0.15;
const HUB_OUTLINE_OPACITY: f64 = 0.2;
const OUTLINE_WIDTH: f64 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Save,
    Restore,
    Translate { dx: f64, dy: f64 },
    Rotate(f64),
    Fill { path: Path, color: Color },
    Stroke { path: Path, color: Color, line_width: f64 },
    Text { text: String, font_size: f32, color: Color },
    /// Backing disk, wedges and ring bands with their outlines.
    Wheel(WheelPaint),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn fill_and_outline(&mut self, path: Path, fill: Color, outline_opacity: f64) {
        self.add_command(DrawCommand::Fill {
            path: path.clone(),
            color: fill,
        });
        self.add_command(DrawCommand::Stroke {
            path,
            color: Color::shadow(outline_opacity),
            line_width: OUTLINE_WIDTH,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn extend(&mut self, other: Scene) {
        self.commands.extend(other.commands);
    }

    /// Replay every command onto `surface`.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear => surface.clear(),
                DrawCommand::Save => surface.save(),
                DrawCommand::Restore => surface.restore(),
                DrawCommand::Translate { dx, dy } => surface.translate(*dx, *dy),
                DrawCommand::Rotate(angle) => surface.rotate(*angle),
                DrawCommand::Fill { path, color } => surface.fill_path(path, *color),
                DrawCommand::Stroke {
                    path,
                    color,
                    line_width,
                } => surface.stroke_path(path, *color, *line_width),
                DrawCommand::Text {
                    text,
                    font_size,
                    color,
                } => surface.fill_text(text, *font_size, *color),
                DrawCommand::Wheel(wheel) => surface.fill_wheel(wheel),
            }
        }
    }
}

/// Largest font size, stepping down from the layout's initial size, at which
/// `label` fits one slice of arc. Never goes below the minimum font size.
pub fn fit_font_size<M: TextMeasure + ?Sized>(label: &str, layout: &WheelLayout, measure: &M) -> f32 {
    let mut font_size = layout.initial_font_size;
    while measure.measure_text(label, font_size) > layout.label_max_width && font_size > MIN_FONT_SIZE {
        font_size -= 1.0;
    }
    font_size
}

/// Build the full wheel for `angle` on a square surface of side `size`.
pub fn wheel_scene<M: TextMeasure + ?Sized>(
    angle: f64,
    segments: &Segments,
    size: u32,
    palette: &Palette,
    measure: &M,
) -> Scene {
    let geometry = segments.geometry();
    let layout = WheelLayout::new(size, &geometry);
    let mut scene = Scene::new();

    scene.add_command(DrawCommand::Clear);
    scene.add_command(DrawCommand::Save);
    scene.add_command(DrawCommand::Translate {
        dx: layout.radius,
        dy: layout.radius,
    });
    // The only place the wheel angle enters rendering.
    scene.add_command(DrawCommand::Rotate(geometry.frame_rotation(angle)));

    // Backing disk, wedges and ring bands with their outlines.
    scene.add_command(DrawCommand::Wheel(WheelPaint {
        radius: layout.radius,
        inner_radius: layout.inner_radius,
        backing: palette.light,
        segments: segments
            .iter()
            .map(|segment| SegmentPaint {
                wedge: palette.wedge(segment.wedge_tone()),
                ring: palette.ring(segment.ring_tone()),
            })
            .collect(),
        wedge_outline: Color::shadow(WEDGE_OUTLINE_OPACITY),
        ring_outline: Color::shadow(RING_OUTLINE_OPACITY),
        outline_width: OUTLINE_WIDTH,
    }));

    for segment in segments {
        add_label(&mut scene, segment, &geometry, &layout, palette, measure);
    }

    scene.fill_and_outline(
        Path::Circle { radius: HUB_RADIUS },
        palette.highlight,
        HUB_OUTLINE_OPACITY,
    );

    scene.add_command(DrawCommand::Restore);
    scene
}

fn add_label<M: TextMeasure + ?Sized>(
    scene: &mut Scene,
    segment: &Segment,
    geometry: &WheelGeometry,
    layout: &WheelLayout,
    palette: &Palette,
    measure: &M,
) {
    let center = geometry.segment_center(segment.index());
    scene.add_command(DrawCommand::Save);
    // Text runs along the sub-frame's x axis, tangent to the rim; its origin
    // is pushed out along -y, which points at the segment centre.
    scene.add_command(DrawCommand::Rotate(center + FRAC_PI_2));
    scene.add_command(DrawCommand::Translate {
        dx: 0.0,
        dy: -layout.label_radius,
    });
    scene.add_command(DrawCommand::Text {
        text: segment.label().to_string(),
        font_size: fit_font_size(segment.label(), layout, measure),
        color: palette.ring(segment.label_tone()),
    });
    scene.add_command(DrawCommand::Restore);
}

/// Fixed indicator at the top of the surface, drawn over the wheel.
pub fn pointer_scene(size: u32, palette: &Palette) -> Scene {
    let side = size as f64;
    let center = side / 2.0;
    let half_width = (side * 0.03).max(6.0);
    let depth = (side * 0.06).max(10.0);
    let mut scene = Scene::new();
    scene.fill_and_outline(
        Path::Polygon(vec![
            (center - half_width, 0.0),
            (center + half_width, 0.0),
            (center, depth),
        ]),
        palette.pointer,
        0.25,
    );
    scene
}

/// Draws the wheel at `angle` onto `surface`.
pub fn draw_wheel<S: Surface>(surface: &mut S, angle: f64, segments: &Segments, palette: &Palette) {
    let scene = wheel_scene(angle, segments, surface.size(), palette, &*surface);
    scene.render(surface);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Paint, PixelCanvas};
    use crate::geometry::POINTER_ANGLE;
    use crate::segment::{Prize, Tone};
    use std::f64::consts::TAU;

    /// Monospaced stand-in for a font: every glyph advances `ratio * size`.
    struct FixedAdvance(f64);

    impl TextMeasure for FixedAdvance {
        fn measure_text(&self, text: &str, font_size: f32) -> f64 {
            text.chars().count() as f64 * font_size as f64 * self.0
        }
    }

    fn segments(n: usize) -> Segments {
        let prizes: Vec<Prize> = (0..n).map(|i| Prize::Number(100.0 * (i + 1) as f64)).collect();
        Segments::build(&prizes).unwrap()
    }

    fn count<F: Fn(&DrawCommand) -> bool>(scene: &Scene, predicate: F) -> usize {
        scene.commands().iter().filter(|c| predicate(c)).count()
    }

    fn wheel_paint(scene: &Scene) -> &WheelPaint {
        scene
            .commands()
            .iter()
            .find_map(|command| match command {
                DrawCommand::Wheel(wheel) => Some(wheel),
                _ => None,
            })
            .expect("scene has a wheel")
    }

    /// Wedge index whose span covers the surface direction `screen_angle`,
    /// read back from a built scene.
    fn wedge_at_screen_angle(scene: &Scene, screen_angle: f64) -> Option<usize> {
        let rotation = scene.commands().iter().find_map(|command| match command {
            DrawCommand::Rotate(angle) => Some(*angle),
            _ => None,
        })?;
        let local = (screen_angle - rotation).rem_euclid(TAU);
        wheel_paint(scene)
            .layers()
            .into_iter()
            .filter_map(|(path, paint)| match (path, paint) {
                (Path::Sector { inner, start, end, .. }, Paint::Fill(_)) if inner == 0.0 => Some((start, end)),
                _ => None,
            })
            .position(|(start, end)| local >= start && local < end)
    }

    #[test]
    fn test_scene_is_deterministic() {
        let segs = segments(40);
        let palette = Palette::default();
        let a = wheel_scene(12.345, &segs, 600, &palette, &FixedAdvance(0.6));
        let b = wheel_scene(12.345, &segs, 600, &palette, &FixedAdvance(0.6));
        assert_eq!(a, b);
    }

    #[test]
    fn test_scene_layers_in_order() {
        let segs = segments(5);
        let scene = wheel_scene(0.0, &segs, 400, &Palette::default(), &FixedAdvance(0.6));
        let commands = scene.commands();

        assert_eq!(commands[0], DrawCommand::Clear);
        assert_eq!(commands[1], DrawCommand::Save);
        assert!(matches!(commands[3], DrawCommand::Rotate(_)));
        assert!(matches!(&commands[4], DrawCommand::Wheel(wheel) if wheel.radius == 200.0));
        assert_eq!(commands.last(), Some(&DrawCommand::Restore));

        let layers = wheel_paint(&scene).layers();
        assert!(matches!(layers[0].0, Path::Circle { radius } if radius == 200.0));
        let wedges = layers
            .iter()
            .filter(|(path, paint)| matches!((path, paint), (Path::Sector { inner, .. }, Paint::Fill(_)) if *inner == 0.0))
            .count();
        let rings = layers
            .iter()
            .filter(|(path, paint)| matches!((path, paint), (Path::Sector { inner, .. }, Paint::Fill(_)) if *inner > 0.0))
            .count();
        let wheel_outlines = layers.iter().filter(|(_, paint)| matches!(paint, Paint::Stroke { .. })).count();
        let labels = count(&scene, |c| matches!(c, DrawCommand::Text { .. }));
        let outlines = count(&scene, |c| matches!(c, DrawCommand::Stroke { .. }));
        assert_eq!((wedges, rings, wheel_outlines, labels, outlines), (5, 5, 10, 5, 1));

        // Labels come after the wheel, the hub is the last shape.
        let first_label = commands.iter().position(|c| matches!(c, DrawCommand::Text { .. })).unwrap();
        assert!(first_label > 4);
        assert!(matches!(
            commands[commands.len() - 3],
            DrawCommand::Fill { path: Path::Circle { radius }, .. } if radius == HUB_RADIUS
        ));
    }

    #[test]
    fn test_angle_only_changes_frame_rotation() {
        let segs = segments(7);
        let palette = Palette::default();
        let a = wheel_scene(0.0, &segs, 300, &palette, &FixedAdvance(0.6));
        let b = wheel_scene(3.0, &segs, 300, &palette, &FixedAdvance(0.6));
        let differing: Vec<usize> = (0..a.commands().len())
            .filter(|&i| a.commands()[i] != b.commands()[i])
            .collect();
        assert_eq!(differing, vec![3]);
    }

    #[test]
    fn test_colors_follow_parity() {
        let segs = segments(4);
        let palette = Palette::default();
        let scene = wheel_scene(0.0, &segs, 300, &palette, &FixedAdvance(0.6));
        let text_colors: Vec<Color> = scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(
            text_colors,
            vec![palette.highlight, palette.dark, palette.highlight, palette.dark]
        );
        let wheel = wheel_paint(&scene);
        let wedge_colors: Vec<Color> = wheel.segments.iter().map(|s| s.wedge).collect();
        let ring_colors: Vec<Color> = wheel.segments.iter().map(|s| s.ring).collect();
        assert_eq!(ring_colors, vec![palette.dark, palette.highlight, palette.dark, palette.highlight]);
        assert_eq!(wedge_colors, vec![palette.dark, palette.light, palette.dark, palette.light]);
    }

    #[test]
    fn test_font_shrinks_to_fit_and_stops_at_floor() {
        let layout = WheelLayout::new(600, &WheelGeometry::new(40));
        // label_max_width is about 37.7px
        assert_eq!(fit_font_size("0", &layout, &FixedAdvance(0.6)), 24.0);
        assert_eq!(fit_font_size("1000", &layout, &FixedAdvance(0.6)), 15.0);
        assert_eq!(fit_font_size("a very long label", &layout, &FixedAdvance(0.6)), MIN_FONT_SIZE);
    }

    #[test]
    fn test_labels_sit_on_their_own_segment() {
        let segs = segments(40);
        let geometry = segs.geometry();
        let layout = WheelLayout::new(600, &geometry);
        for segment in &segs {
            let center = geometry.segment_center(segment.index());
            // Sub-frame rotation then translate(0, -r): origin at r·(sin(φ), -cos(φ)) with φ = center + π/2.
            let phi = center + FRAC_PI_2;
            let (x, y) = (layout.label_radius * phi.sin(), -layout.label_radius * phi.cos());
            assert_eq!(geometry.segment_at(y.atan2(x)), segment.index());
        }
    }

    #[test]
    fn test_scene_wedge_under_pointer_matches_resolve() {
        for n in [1, 2, 3, 7, 40] {
            let segs = segments(n);
            let geometry = segs.geometry();
            for k in 0..200 {
                let angle = k as f64 * 0.0917 + 0.013;
                let scene = wheel_scene(angle, &segs, 200, &Palette::default(), &FixedAdvance(0.6));
                assert_eq!(
                    wedge_at_screen_angle(&scene, POINTER_ANGLE),
                    Some(geometry.resolve(angle)),
                    "n = {n}, angle = {angle}"
                );
            }
        }
    }

    #[test]
    fn test_pixels_under_pointer_match_resolve() {
        let segs = segments(7);
        let geometry = segs.geometry();
        let palette = Palette::default();
        let slice = geometry.slice();
        let mut frame = vec![0u8; 200 * 200 * 4];
        for k in 0..28 {
            let angle = k as f64 * slice / 2.0 + slice * 0.15;
            let mut canvas = PixelCanvas::new(&mut frame, 200, palette.background, None);
            draw_wheel(&mut canvas, angle, &segs, &palette);
            // Halfway up the wedge area, straight under the pointer.
            let sample = canvas.pixel(100, 40).unwrap();
            let expected = palette.wedge(Tone::for_index(geometry.resolve(angle)));
            assert_eq!(sample, expected, "angle {angle}");
        }
    }

    #[test]
    fn test_pixel_output_is_repeatable() {
        let segs = segments(9);
        let palette = Palette::default();
        let mut first = vec![0u8; 120 * 120 * 4];
        let mut second = vec![7u8; 120 * 120 * 4];
        draw_wheel(&mut PixelCanvas::new(&mut first, 120, palette.background, None), 1.7, &segs, &palette);
        draw_wheel(&mut PixelCanvas::new(&mut second, 120, palette.background, None), 1.7, &segs, &palette);
        assert!(first == second);
    }

    #[test]
    fn test_pointer_points_down_from_top_edge() {
        let scene = pointer_scene(600, &Palette::default());
        match &scene.commands()[0] {
            DrawCommand::Fill { path: Path::Polygon(points), .. } => {
                assert_eq!(points.len(), 3);
                assert_eq!(points[2], (300.0, 36.0));
                assert!(points.iter().all(|p| p.1 >= 0.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_default_wheel_frame_stays_within_distance_budget() {
        let segs = segments(40);
        let palette = Palette::default();
        let mut frame = vec![0u8; 600 * 600 * 4];
        let mut canvas = PixelCanvas::new(&mut frame, 600, palette.background, None);
        draw_wheel(&mut canvas, 7.3, &segs, &palette);
        // Only pixels near an edge, the rim or the ring boundary are
        // evaluated exactly, a small fraction of the frame.
        let evaluations = canvas.distance_evaluations();
        assert!(evaluations < 600 * 600 / 3, "{evaluations} distance evaluations");
    }
}
