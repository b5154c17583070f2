pub mod oscillator;
pub use oscillator::{
    Oscillator, OscillatorBuilder, oscillator, pulse, saw, sine, triangle,
    waveform,
};

pub mod noise;

pub mod biquad_filter;
pub use biquad_filter::{
    BiquadFilter, BiquadMode, biquad_filter, high_pass, low_pass, low_shelf,
};

pub mod envelope;
pub use envelope::ExpEnvelope;
