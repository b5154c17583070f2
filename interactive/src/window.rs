use crate::{
    input::InputState,
    palette::Palette,
    ripple::{RippleConfig, RippleShape, Ripples},
};
use anyhow::anyhow;
use padkeys_core::{FrameSig, FrameSigT, Sig, SigT};
use padkeys_keyboard::{KeyEvent, KeyEvents, KeyLayout};
use padkeys_player::{Config, Player};
use rgb_int::Rgb24;
use sdl2::{
    event::{Event, WindowEvent},
    gfx::primitives::DrawRenderer,
    keyboard::Scancode,
    pixels::Color,
    render::Canvas,
    video::Window as Sdl2Window,
};
use std::{
    ops::ControlFlow,
    thread,
    time::{Duration, Instant},
};

const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / 60);
const WARMUP_FRAMES: usize = 10;

pub struct WindowBuilder {
    title: Option<String>,
    width_px: Option<u32>,
    height_px: Option<u32>,
    background: Option<Rgb24>,
    palette: Option<Palette>,
    layout: Option<KeyLayout>,
    ripples: Option<bool>,
    ripple_config: Option<RippleConfig>,
    player_config: Option<Config>,
}

impl Default for WindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowBuilder {
    pub fn new() -> Self {
        Self {
            title: None,
            width_px: None,
            height_px: None,
            background: None,
            palette: None,
            layout: None,
            ripples: None,
            ripple_config: None,
            player_config: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn width_px(mut self, width_px: u32) -> Self {
        self.width_px = Some(width_px);
        self
    }

    pub fn height_px(mut self, height_px: u32) -> Self {
        self.height_px = Some(height_px);
        self
    }

    pub fn background(mut self, background: Rgb24) -> Self {
        self.background = Some(background);
        self
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Keys outside the layout are ignored.
    pub fn layout(mut self, layout: KeyLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Whether pressing a key spawns a ripple.
    pub fn ripples(mut self, ripples: bool) -> Self {
        self.ripples = Some(ripples);
        self
    }

    pub fn ripple_config(mut self, ripple_config: RippleConfig) -> Self {
        self.ripple_config = Some(ripple_config);
        self
    }

    pub fn player_config(mut self, player_config: Config) -> Self {
        self.player_config = Some(player_config);
        self
    }

    pub fn build(self) -> Window {
        Window {
            title: self.title.unwrap_or_else(|| "padkeys".to_string()),
            width_px: self.width_px.unwrap_or(960),
            height_px: self.height_px.unwrap_or(720),
            background: self
                .background
                .unwrap_or_else(|| Rgb24::new(0x28, 0x2C, 0x34)),
            palette: self.palette.unwrap_or_default(),
            ripples: self.ripples.unwrap_or(true),
            ripple_config: self.ripple_config.unwrap_or_default(),
            player_config: self.player_config.unwrap_or_default(),
            input_state: InputState::new(self.layout.unwrap_or_default()),
        }
    }
}

fn colour_with_opacity(colour: Rgb24, opacity_01: f32) -> Color {
    Color::RGBA(
        colour.r,
        colour.g,
        colour.b,
        (opacity_01.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

fn to_px(x: f32) -> i16 {
    x.round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

fn draw_ripple(
    canvas: &mut Canvas<Sdl2Window>,
    shape: &RippleShape,
    config: &RippleConfig,
) {
    if shape.opacity_01 <= 0.0 {
        return;
    }
    let x = to_px(shape.centre_x);
    let y = to_px(shape.centre_y);
    let fill = colour_with_opacity(
        shape.colour,
        shape.opacity_01 * config.fill_opacity_01,
    );
    let _ = canvas.filled_ellipse(
        x,
        y,
        to_px(shape.radius_x),
        to_px(shape.radius_y),
        fill,
    );
    // The outline is centred on the edge of the ellipse.
    let stroke = colour_with_opacity(shape.colour, shape.opacity_01);
    let half_stroke = config.stroke_width_px as f32 / 2.0;
    for i in 0..config.stroke_width_px {
        let offset = i as f32 - half_stroke;
        let rx = shape.radius_x + offset;
        let ry = shape.radius_y + offset;
        if rx > 0.0 && ry > 0.0 {
            let _ = canvas.ellipse(x, y, to_px(rx), to_px(ry), stroke);
        }
    }
}

struct WindowRunning {
    window: Window,
    canvas: Canvas<Sdl2Window>,
    event_pump: sdl2::EventPump,
    ripples: Ripples,
    background: Color,
    last_render: Instant,
}

impl WindowRunning {
    fn render(&mut self) {
        self.canvas.set_draw_color(self.background);
        self.canvas.clear();
        for shape in
            self.ripples.shapes(self.window.width_px, self.window.height_px)
        {
            draw_ripple(&mut self.canvas, &shape, self.ripples.config());
        }
        self.canvas.present();
    }

    fn ripple_for_key_event(&mut self, key_event: &KeyEvent) {
        if !self.window.ripples {
            return;
        }
        match self.window.input_state.layout().index_of(key_event.key) {
            Some(index) => {
                let colour = self.window.palette.colour(index);
                self.ripples.key_event(key_event, colour);
            }
            None => log::warn!("No colour for key outside the layout"),
        }
    }

    fn handle_events(&mut self) -> ControlFlow<()> {
        // Collected first as handling events needs mutable access to the rest of self.
        let events = self.event_pump.poll_iter().collect::<Vec<_>>();
        for event in events {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => return ControlFlow::Break(()),
                Event::KeyDown {
                    scancode: Some(scancode),
                    repeat,
                    ..
                } => {
                    if let Some(key_event) =
                        self.window.input_state.key_down(scancode, repeat)
                    {
                        self.ripple_for_key_event(&key_event);
                    }
                }
                Event::KeyUp {
                    scancode: Some(scancode),
                    ..
                } => {
                    self.window.input_state.key_up(scancode);
                }
                Event::Window {
                    win_event: WindowEvent::FocusLost,
                    ..
                } => self.window.input_state.focus_lost(),
                _ => (),
            }
        }
        ControlFlow::Continue(())
    }

    fn handle_frame_if_enough_time_since_previous_frame(
        &mut self,
    ) -> ControlFlow<()> {
        self.handle_events()?;
        let since_last_render = self.last_render.elapsed();
        if since_last_render > FRAME_DURATION {
            self.ripples.tick(since_last_render);
            self.render();
            self.last_render = Instant::now();
        }
        ControlFlow::Continue(())
    }
}

#[derive(Clone)]
pub struct Window {
    title: String,
    width_px: u32,
    height_px: u32,
    background: Rgb24,
    palette: Palette,
    ripples: bool,
    ripple_config: RippleConfig,
    player_config: Config,
    input_state: InputState,
}

impl Window {
    pub fn builder() -> WindowBuilder {
        WindowBuilder::new()
    }

    fn run(self) -> anyhow::Result<WindowRunning> {
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
        let window = video_subsystem
            .window(self.title.as_str(), self.width_px, self.height_px)
            .position_centered()
            .build()?;
        let mut canvas = window
            .into_canvas()
            .target_texture()
            .present_vsync()
            .build()?;
        canvas.set_blend_mode(sdl2::render::BlendMode::Blend);
        let event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;
        let background =
            Color::RGB(self.background.r, self.background.g, self.background.b);
        let ripples = Ripples::new(self.ripple_config);
        Ok(WindowRunning {
            window: self,
            canvas,
            event_pump,
            ripples,
            background,
            last_render: Instant::now(),
        })
    }

    /// The key presses and releases of keys in this window's layout, grouped by audio frame.
    pub fn key_events(
        &self,
    ) -> FrameSig<impl FrameSigT<Item = KeyEvents> + use<>> {
        self.input_state.key_events()
    }

    pub fn layout(&self) -> &KeyLayout {
        self.input_state.layout()
    }

    /// Opens the window and plays the signal until the window is closed.
    pub fn play_mono<S>(&self, sig: S) -> anyhow::Result<()>
    where
        S: SigT<Item = f32>,
    {
        let player = Player::new()?;
        let mut window_running = self.clone().run()?;
        // Render a few frames to warm up. The first few frames can take longer than usual to
        // render, so warming up prevents the audio from stuttering on startup.
        for _ in 0..WARMUP_FRAMES {
            if window_running
                .handle_frame_if_enough_time_since_previous_frame()
                .is_break()
            {
                return Ok(());
            }
            thread::sleep(FRAME_DURATION);
        }
        player.play_signal_sync_mono_callback(
            Sig(sig),
            |_buf| {
                // Interleave rendering with sending samples to the sound card. Rendering needs to
                // happen on the main thread as this is a requirement of SDL, and sending samples
                // to the sound card needs to happen on the main thread as signals are not `Send`.
                window_running.handle_frame_if_enough_time_since_previous_frame()
            },
            self.player_config,
        )
    }
}
