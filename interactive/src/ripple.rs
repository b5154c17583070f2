use padkeys_keyboard::KeyEvent;
use rgb_int::Rgb24;
use std::time::Duration;

/// Timing and appearance of ripples.
#[derive(Debug, Clone, Copy)]
pub struct RippleConfig {
    /// Time taken for a ripple to reach its final size. Ripples are usually removed before this.
    pub animation_duration: Duration,
    /// Ripples are removed this long after they spawn.
    pub lifetime: Duration,
    pub stroke_width_px: u32,
    /// Opacity of the fill relative to the opacity of the outline
    pub fill_opacity_01: f32,
    /// Ripples are drawn as if lying on a plane rotated around the horizontal axis by this angle.
    pub tilt_deg: f32,
    /// Whether presses generated by the OS while a key is held spawn ripples. Holding a key
    /// then produces a stream of ripples.
    pub spawn_on_repeat: bool,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            animation_duration: Duration::from_secs(20),
            lifetime: Duration::from_secs(7),
            stroke_width_px: 5,
            fill_opacity_01: 0.25,
            tilt_deg: 45.0,
            spawn_on_repeat: true,
        }
    }
}

/// Where and how to draw a ripple during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleShape {
    pub centre_x: f32,
    pub centre_y: f32,
    pub radius_x: f32,
    pub radius_y: f32,
    pub colour: Rgb24,
    /// Opacity of the outline. The fill's opacity is scaled down further.
    pub opacity_01: f32,
}

/// Slow start and slow finish
fn ease_in_out(t_01: f32) -> f32 {
    let t_01 = t_01.clamp(0.0, 1.0);
    t_01 * t_01 * (3.0 - (2.0 * t_01))
}

fn lerp(from: f32, to: f32, t_01: f32) -> f32 {
    from + ((to - from) * t_01)
}

#[derive(Debug, Clone, Copy)]
struct Ripple {
    colour: Rgb24,
    age: Duration,
}

impl Ripple {
    /// An ellipse starting as a point two thirds of the way down the window which grows to the
    /// size of the window while drifting down and fading out.
    fn shape(
        &self,
        config: &RippleConfig,
        width_px: u32,
        height_px: u32,
    ) -> RippleShape {
        let width = width_px as f32;
        let height = height_px as f32;
        let t_01 = ease_in_out(
            self.age.as_secs_f32() / config.animation_duration.as_secs_f32(),
        );
        let tilt_scale = config.tilt_deg.to_radians().cos();
        RippleShape {
            centre_x: width / 2.0,
            centre_y: lerp(height / 1.5, (height / 2.0) + (height / 4.0), t_01),
            radius_x: lerp(0.0, width, t_01),
            radius_y: lerp(0.0, height, t_01) * tilt_scale,
            colour: self.colour,
            opacity_01: lerp(1.0, -1.0, t_01).max(0.0),
        }
    }
}

/// The collection of ripples currently visible.
pub struct Ripples {
    config: RippleConfig,
    ripples: Vec<Ripple>,
}

impl Ripples {
    pub fn new(config: RippleConfig) -> Self {
        Self {
            config,
            ripples: Vec::new(),
        }
    }

    pub fn config(&self) -> &RippleConfig {
        &self.config
    }

    pub fn spawn(&mut self, colour: Rgb24) {
        self.ripples.push(Ripple {
            colour,
            age: Duration::ZERO,
        });
    }

    /// Spawn a ripple in response to a key event. Returns whether a ripple was spawned.
    pub fn key_event(&mut self, key_event: &KeyEvent, colour: Rgb24) -> bool {
        if !key_event.pressed || (key_event.repeat && !self.config.spawn_on_repeat)
        {
            return false;
        }
        self.spawn(colour);
        true
    }

    /// Advance the animation, removing ripples which have outlived their lifetime.
    pub fn tick(&mut self, elapsed: Duration) {
        for ripple in &mut self.ripples {
            ripple.age += elapsed;
        }
        let lifetime = self.config.lifetime;
        self.ripples.retain(|ripple| ripple.age < lifetime);
    }

    pub fn len(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }

    /// Shapes in the order they should be drawn (oldest first).
    pub fn shapes(
        &self,
        width_px: u32,
        height_px: u32,
    ) -> impl Iterator<Item = RippleShape> + '_ {
        self.ripples
            .iter()
            .map(move |ripple| ripple.shape(&self.config, width_px, height_px))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use padkeys_keyboard::{Key, Note};

    const WHITE: Rgb24 = Rgb24 {
        r: 255,
        g: 255,
        b: 255,
    };

    #[test]
    fn new_ripple_is_a_point() {
        let mut ripples = Ripples::new(RippleConfig::default());
        ripples.spawn(WHITE);
        let shape = ripples.shapes(900, 600).next().unwrap();
        assert_eq!(shape.centre_x, 450.0);
        assert_eq!(shape.centre_y, 400.0);
        assert_eq!(shape.radius_x, 0.0);
        assert_eq!(shape.radius_y, 0.0);
        assert_eq!(shape.opacity_01, 1.0);
    }

    #[test]
    fn ripple_grows_and_fades() {
        let mut ripples = Ripples::new(RippleConfig::default());
        ripples.spawn(WHITE);
        ripples.tick(Duration::from_secs(1));
        let early = ripples.shapes(900, 600).next().unwrap();
        ripples.tick(Duration::from_secs(5));
        let late = ripples.shapes(900, 600).next().unwrap();
        assert!(late.radius_x > early.radius_x);
        assert!(late.radius_y > early.radius_y);
        assert!(late.centre_y > early.centre_y);
        assert!(late.opacity_01 < early.opacity_01);
        assert!(late.radius_y < late.radius_x * (600.0 / 900.0));
    }

    #[test]
    fn full_animation_reaches_window_size() {
        let config = RippleConfig {
            lifetime: Duration::from_secs(30),
            tilt_deg: 0.0,
            ..Default::default()
        };
        let mut ripples = Ripples::new(config);
        ripples.spawn(WHITE);
        ripples.tick(Duration::from_secs(25));
        let shape = ripples.shapes(800, 400).next().unwrap();
        assert_eq!(shape.radius_x, 800.0);
        assert_eq!(shape.radius_y, 400.0);
        assert!((shape.centre_y - 300.0).abs() < 1e-3);
        assert_eq!(shape.opacity_01, 0.0);
    }

    #[test]
    fn ripples_expire() {
        let mut ripples = Ripples::new(RippleConfig::default());
        ripples.spawn(WHITE);
        ripples.tick(Duration::from_secs(4));
        ripples.spawn(WHITE);
        assert_eq!(ripples.len(), 2);
        ripples.tick(Duration::from_secs(3));
        assert_eq!(ripples.len(), 1);
        ripples.tick(Duration::from_secs(4));
        assert!(ripples.is_empty());
    }

    #[test]
    fn held_key_keeps_spawning() {
        let mut ripples = Ripples::new(RippleConfig::default());
        let press = KeyEvent::press(Key::A, Note::A_4);
        let repeat = KeyEvent {
            repeat: true,
            ..press
        };
        assert!(ripples.key_event(&press, WHITE));
        for _ in 0..20 {
            ripples.tick(Duration::from_millis(100));
            assert!(ripples.key_event(&repeat, WHITE));
        }
        assert_eq!(ripples.len(), 21);
        assert!(!ripples.key_event(&KeyEvent::release(Key::A, Note::A_4), WHITE));
        assert_eq!(ripples.len(), 21);
    }

    #[test]
    fn repeats_can_be_ignored() {
        let mut ripples = Ripples::new(RippleConfig {
            spawn_on_repeat: false,
            ..Default::default()
        });
        let press = KeyEvent::press(Key::S, Note::B_4);
        assert!(ripples.key_event(&press, WHITE));
        assert!(!ripples.key_event(
            &KeyEvent {
                repeat: true,
                ..press
            },
            WHITE
        ));
        assert_eq!(ripples.len(), 1);
    }
}
