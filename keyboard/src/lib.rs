mod event;
mod key;
mod note;
mod voice;

pub use event::{KeyEvent, KeyEventQueue, KeyEvents};
pub use key::{Key, KeyLayout};
pub use note::{Note, NoteName, freq_hz_of_midi_index};
pub use voice::{Voice, VoiceTable};
