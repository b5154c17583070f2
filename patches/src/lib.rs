mod enveloped_voice;
mod flute;
mod pad;
mod synth;

pub use enveloped_voice::EnvelopedVoice;
pub use flute::FluteConfig;
pub use pad::PadConfig;
pub use synth::{KeyboardSynth, KeyboardSynthBuilder, keyboard_synth};

/// The sounds that can be assigned to the keyboard.
#[derive(Clone, Debug)]
pub enum Instrument {
    Pad(PadConfig),
    Flute(FluteConfig),
}

impl Default for Instrument {
    fn default() -> Self {
        Self::Pad(PadConfig::default())
    }
}
