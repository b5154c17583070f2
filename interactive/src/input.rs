use padkeys_core::{FrameSig, FrameSigT};
use padkeys_keyboard::{Key, KeyEvent, KeyEventQueue, KeyEvents, KeyLayout};
use sdl2::keyboard::Scancode;

pub fn key_of_scancode(scancode: Scancode) -> Option<Key> {
    let key = match scancode {
        Scancode::A => Key::A,
        Scancode::B => Key::B,
        Scancode::C => Key::C,
        Scancode::D => Key::D,
        Scancode::E => Key::E,
        Scancode::F => Key::F,
        Scancode::G => Key::G,
        Scancode::H => Key::H,
        Scancode::I => Key::I,
        Scancode::J => Key::J,
        Scancode::K => Key::K,
        Scancode::L => Key::L,
        Scancode::M => Key::M,
        Scancode::N => Key::N,
        Scancode::O => Key::O,
        Scancode::P => Key::P,
        Scancode::Q => Key::Q,
        Scancode::R => Key::R,
        Scancode::S => Key::S,
        Scancode::T => Key::T,
        Scancode::U => Key::U,
        Scancode::V => Key::V,
        Scancode::W => Key::W,
        Scancode::X => Key::X,
        Scancode::Y => Key::Y,
        Scancode::Z => Key::Z,
        Scancode::Num0 => Key::N0,
        Scancode::Num1 => Key::N1,
        Scancode::Num2 => Key::N2,
        Scancode::Num3 => Key::N3,
        Scancode::Num4 => Key::N4,
        Scancode::Num5 => Key::N5,
        Scancode::Num6 => Key::N6,
        Scancode::Num7 => Key::N7,
        Scancode::Num8 => Key::N8,
        Scancode::Num9 => Key::N9,
        Scancode::LeftBracket => Key::LeftBracket,
        Scancode::RightBracket => Key::RightBracket,
        Scancode::Semicolon => Key::Semicolon,
        Scancode::Apostrophe => Key::Apostrophe,
        Scancode::Comma => Key::Comma,
        Scancode::Period => Key::Period,
        Scancode::Minus => Key::Minus,
        Scancode::Equals => Key::Equals,
        Scancode::Slash => Key::Slash,
        Scancode::Space => Key::Space,
        Scancode::Backslash => Key::Backslash,
        _ => return None,
    };
    Some(key)
}

/// Translates keyboard events from sdl into key events for the notes in a layout. Keys outside
/// the layout are ignored.
#[derive(Clone)]
pub struct InputState {
    layout: KeyLayout,
    queue: KeyEventQueue,
}

impl InputState {
    pub(crate) fn new(layout: KeyLayout) -> Self {
        Self {
            layout,
            queue: KeyEventQueue::new(),
        }
    }

    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    fn key_event(&self, scancode: Scancode, pressed: bool, repeat: bool) -> Option<KeyEvent> {
        let key = key_of_scancode(scancode)?;
        let note = self.layout.note(key)?;
        let key_event = KeyEvent {
            key,
            note,
            pressed,
            repeat,
        };
        self.queue.push(key_event);
        Some(key_event)
    }

    /// Returns the event passed on to the synthesizer, if the key is in the layout.
    pub(crate) fn key_down(&self, scancode: Scancode, repeat: bool) -> Option<KeyEvent> {
        self.key_event(scancode, true, repeat)
    }

    pub(crate) fn key_up(&self, scancode: Scancode) -> Option<KeyEvent> {
        self.key_event(scancode, false, false)
    }

    /// Key releases can't be observed while the window is unfocused so treat every key as
    /// released.
    pub(crate) fn focus_lost(&self) {
        log::debug!("Focus lost, releasing all keys");
        self.queue.push_release_all();
    }

    pub fn key_events(
        &self,
    ) -> FrameSig<impl FrameSigT<Item = KeyEvents> + use<>> {
        self.queue.clone().frame_sig()
    }
}
