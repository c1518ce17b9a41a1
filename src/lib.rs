// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod canvas;
pub mod config;
pub mod error;
pub mod geometry;
pub mod render;
pub mod segment;
pub mod spin;

// External crate imports
use pixels::{PixelsBuilder, SurfaceTexture};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

// Standard library imports
use std::str::FromStr;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

pub use canvas::{Color, LabelFont, PixelCanvas, Surface, TextMeasure};
pub use config::Config;
pub use error::{Result, WheelError};
pub use render::Scene;
pub use segment::{Prize, Segment, Segments};
pub use spin::SpinStep;

use geometry::viewport_side;
use spin::SpinController;

/// How often the idle event loop wakes up to drain the command channel.
const COMMAND_POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Commands accepted from other threads while the window is open.
#[derive(Debug, Clone, PartialEq)]
pub enum WheelCommand {
    Spin,
    /// Place the wheel at an angle in radians; ignored mid-spin.
    SetAngle(f64),
}

impl FromStr for WheelCommand {
    type Err = String;

    /// Parses `spin` (or an empty line) and `angle <radians>`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (None, _, _) | (Some("spin"), None, _) => Ok(WheelCommand::Spin),
            (Some("angle"), Some(value), None) => value
                .parse::<f64>()
                .ok()
                .filter(|angle| angle.is_finite())
                .map(WheelCommand::SetAngle)
                .ok_or_else(|| format!("invalid angle '{}'", value)),
            _ => Err(format!("unknown command '{}'", s.trim())),
        }
    }
}

/// Presentation target for spin status and results.
pub trait ResultSink {
    /// Whether the spin trigger should currently accept input.
    fn set_trigger_enabled(&mut self, enabled: bool);
    /// A spin has started.
    fn spinning(&mut self);
    /// The wheel stopped on `winner`.
    fn publish(&mut self, winner: &Segment);
}

/// Plain-text status line, as shown next to the wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    text: String,
    trigger_enabled: bool,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            text: "Result: -".to_string(),
            trigger_enabled: true,
        }
    }
}

impl StatusLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }
}

impl ResultSink for StatusLine {
    fn set_trigger_enabled(&mut self, enabled: bool) {
        self.trigger_enabled = enabled;
    }

    fn spinning(&mut self) {
        self.text = "Result: spinning...".to_string();
    }

    fn publish(&mut self, winner: &Segment) {
        self.text = format!("Result: {}", winner.label());
    }
}

/// Main wheel struct - the primary public interface
pub struct Wheel {
    config: Config,
    segments: Segments,
    controller: SpinController,
    rng: StdRng,
    last_winner: Option<usize>,
}

impl Wheel {
    pub fn new(config: Config) -> Result<Self> {
        let rng = match config.spin.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: Config, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let segments = Segments::build(&config.prizes)?;
        info!("Wheel ready with {} segments", segments.len());
        let controller = SpinController::new(config.spin.clone())?;
        Ok(Self {
            config,
            segments,
            controller,
            rng,
            last_winner: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn segments(&self) -> &Segments {
        &self.segments
    }

    pub fn angle(&self) -> f64 {
        self.controller.current_angle()
    }

    pub fn is_spinning(&self) -> bool {
        self.controller.is_spinning()
    }

    pub fn set_angle(&mut self, angle: f64) -> bool {
        self.controller.set_angle(angle)
    }

    /// Segment under the pointer at the current angle.
    pub fn winner(&self) -> &Segment {
        self.segments.winner(self.angle())
    }

    /// Winner of the most recently completed spin.
    pub fn last_winner(&self) -> Option<&Segment> {
        self.last_winner.and_then(|index| self.segments.get(index))
    }

    /// Start a spin. A request while a spin is running is ignored.
    pub fn request_spin(&mut self, now: Instant, sink: &mut dyn ResultSink) -> bool {
        if !self.controller.request_spin(now, &mut self.rng) {
            debug!("Spin request ignored, wheel already spinning");
            return false;
        }
        if let Some(session) = self.controller.state().session() {
            info!(
                "Spin started: {:.3} -> {:.3} rad over {} ms",
                session.initial_angle,
                session.target_angle,
                session.duration.as_millis()
            );
        }
        sink.set_trigger_enabled(false);
        sink.spinning();
        true
    }

    /// Advance the animation to `now`, publishing the winner when it stops.
    pub fn tick(&mut self, now: Instant, sink: &mut dyn ResultSink) -> SpinStep {
        let step = self.controller.step(now);
        if let SpinStep::Done { angle } = step {
            sink.set_trigger_enabled(true);
            let winner = self.segments.winner(angle);
            info!(
                "Spin finished at {:.3} rad: segment {} ({})",
                angle,
                winner.index(),
                winner.label()
            );
            self.last_winner = Some(winner.index());
            sink.publish(winner);
        }
        step
    }

    pub fn apply_command(&mut self, command: WheelCommand, now: Instant, sink: &mut dyn ResultSink) {
        match command {
            WheelCommand::Spin => {
                self.request_spin(now, sink);
            }
            WheelCommand::SetAngle(angle) => {
                if !self.set_angle(angle) {
                    debug!("Ignoring angle {} while spinning", angle);
                }
            }
        }
    }

    /// Run one spin against a simulated clock that advances by `frame` per step.
    pub fn spin_to_completion(
        &mut self,
        start: Instant,
        frame: Duration,
        sink: &mut dyn ResultSink,
    ) -> &Segment {
        let frame = frame.max(Duration::from_millis(1));
        self.request_spin(start, sink);
        let mut now = start;
        while self.is_spinning() {
            now += frame;
            self.tick(now, sink);
        }
        self.winner()
    }

    /// Full frame: wheel at the current angle plus the pointer overlay.
    pub fn scene<M: TextMeasure + ?Sized>(&self, size: u32, measure: &M) -> Scene {
        let palette = &self.config.palette;
        let mut scene = render::wheel_scene(self.angle(), &self.segments, size, palette, measure);
        scene.extend(render::pointer_scene(size, palette));
        scene
    }

    pub fn draw<S: Surface>(&self, surface: &mut S) {
        let scene = self.scene(surface.size(), &*surface);
        scene.render(surface);
    }

    pub fn show(self) -> Result<()> {
        self.run_window(None)
    }

    pub fn show_with_commands(self, receiver: Receiver<WheelCommand>) -> Result<()> {
        self.run_window(Some(receiver))
    }

    fn run_window(mut self, receiver: Option<Receiver<WheelCommand>>) -> Result<()> {
        let window_config = self.config.window.clone();
        let background = self.config.palette.background;
        let font = match self.config.font.load() {
            Ok(font) => font,
            Err(e) => {
                warn!("{}, labels will not be drawn", e);
                None
            }
        };

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&window_config.title)
            .with_inner_size(LogicalSize::new(
                window_config.initial_width as f64,
                window_config.initial_height as f64,
            ))
            .build(&event_loop)?;
        let window = Arc::new(window);

        let size = window.inner_size();
        let mut side = viewport_side(
            size.width.min(size.height),
            window_config.max_size,
            window_config.viewport_scale,
        );
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = PixelsBuilder::new(side, side, surface_texture)
            .clear_color(pixels::wgpu::Color {
                r: background.r as f64 / 255.0,
                g: background.g as f64 / 255.0,
                b: background.b as f64 / 255.0,
                a: 1.0,
            })
            .build()?;

        let window_clone = window.clone();
        let mut sink = TitleSink::new(window.clone(), window_config.title.clone());
        let frame_duration = Duration::try_from_secs_f64(1.0 / window_config.max_framerate)
            .map_err(|e| WheelError::InvalidConfig(format!("max_framerate: {}", e)))?;
        let mut last_frame = Instant::now();

        event_loop.run(move |event, window_target| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if new_size.width == 0 || new_size.height == 0 {
                        return;
                    }
                    if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                        warn!("Failed to resize surface: {}", e);
                    }
                    let new_side = viewport_side(
                        new_size.width.min(new_size.height),
                        window_config.max_size,
                        window_config.viewport_scale,
                    );
                    match pixels.resize_buffer(new_side, new_side) {
                        Ok(()) => {
                            side = new_side;
                            debug!("Wheel surface resized to {}px", side);
                        }
                        Err(e) => warn!("Failed to resize wheel buffer: {}", e),
                    }
                    window_clone.request_redraw();
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                } => match logical_key {
                    Key::Named(NamedKey::Space | NamedKey::Enter) => {
                        self.request_spin(Instant::now(), &mut sink);
                        window_clone.request_redraw();
                    }
                    Key::Named(NamedKey::Escape) => window_target.exit(),
                    _ => {}
                },
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    self.request_spin(Instant::now(), &mut sink);
                    window_clone.request_redraw();
                }
                WindowEvent::RedrawRequested => {
                    self.tick(Instant::now(), &mut sink);
                    let mut canvas = PixelCanvas::new(pixels.frame_mut(), side, background, font.as_ref());
                    self.draw(&mut canvas);
                    if let Err(e) = pixels.render() {
                        error!("Render failed: {}", e);
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if let Some(ref receiver) = receiver {
                    while let Ok(command) = receiver.try_recv() {
                        self.apply_command(command, Instant::now(), &mut sink);
                        window_clone.request_redraw();
                    }
                }
                if self.is_spinning() {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                    window_target.set_control_flow(ControlFlow::WaitUntil(last_frame + frame_duration));
                } else {
                    window_target
                        .set_control_flow(ControlFlow::WaitUntil(Instant::now() + COMMAND_POLL_INTERVAL));
                }
            }
            _ => {}
        })?;

        Ok(())
    }
}

// ============================================================================
// INTERNAL IMPLEMENTATION
// ============================================================================

/// Writes the status line into the window title.
struct TitleSink {
    window: Arc<Window>,
    title: String,
    status: StatusLine,
}

impl TitleSink {
    fn new(window: Arc<Window>, title: String) -> Self {
        Self {
            window,
            title,
            status: StatusLine::default(),
        }
    }

    fn refresh(&self) {
        self.window
            .set_title(&format!("{} | {}", self.title, self.status.text()));
    }
}

impl ResultSink for TitleSink {
    fn set_trigger_enabled(&mut self, enabled: bool) {
        self.status.set_trigger_enabled(enabled);
        debug!("Spin trigger {}", if enabled { "enabled" } else { "disabled" });
    }

    fn spinning(&mut self) {
        self.status.spinning();
        self.refresh();
    }

    fn publish(&mut self, winner: &Segment) {
        self.status.publish(winner);
        info!("{}", self.status.text());
        self.refresh();
    }
}
