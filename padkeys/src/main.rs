use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use padkeys_core::SigT;
use padkeys_interactive::{Palette, Window};
use padkeys_keyboard::{KeyLayout, Note, Voice};
use padkeys_modules::BiquadMode;
use padkeys_patches::{FluteConfig, Instrument, PadConfig, keyboard_synth};
use padkeys_player::Config;

#[derive(Clone, Copy, ValueEnum)]
enum InstrumentArg {
    Pad,
    Flute,
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    LowPass,
    LowShelf,
}

impl From<FilterArg> for BiquadMode {
    fn from(filter: FilterArg) -> Self {
        match filter {
            FilterArg::LowPass => Self::LowPass,
            FilterArg::LowShelf => Self::LowShelf,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PaletteArg {
    Ice,
    Pastel,
}

impl From<PaletteArg> for Palette {
    fn from(palette: PaletteArg) -> Self {
        match palette {
            PaletteArg::Ice => Self::Ice,
            PaletteArg::Pastel => Self::Pastel,
        }
    }
}

#[derive(Parser)]
#[command(name = "padkeys")]
#[command(
    about = "Play a synthesized pad with the keys a, s, d, f, g and h. Press escape to quit."
)]
struct Cli {
    #[arg(short, long, value_enum, default_value_t = InstrumentArg::Pad)]
    instrument: InstrumentArg,
    /// Attack time in seconds. Defaults to the instrument's own attack.
    #[arg(long)]
    attack_s: Option<f32>,
    /// Release time in seconds. Defaults to the instrument's own release.
    #[arg(long)]
    release_s: Option<f32>,
    /// Filter applied to the pad
    #[arg(long, value_enum, default_value_t = FilterArg::LowPass)]
    filter: FilterArg,
    /// Gain of the noise mixed into the pad
    #[arg(long, default_value_t = 0.1)]
    noise_gain: f32,
    #[arg(short, long, default_value_t = 0.25)]
    volume: f32,
    /// Shift every key by this many octaves
    #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
    octave: i8,
    #[arg(short, long, value_enum, default_value_t = PaletteArg::Ice)]
    palette: PaletteArg,
    #[arg(long, default_value_t = 960)]
    width: u32,
    #[arg(long, default_value_t = 720)]
    height: u32,
    #[arg(long, default_value_t = 0.01)]
    target_latency_s: f32,
    /// Don't draw ripples when keys are pressed
    #[arg(long)]
    no_ripples: bool,
}

impl Cli {
    fn instrument(&self) -> Instrument {
        match self.instrument {
            InstrumentArg::Pad => {
                let default = PadConfig::default();
                Instrument::Pad(PadConfig {
                    attack_s: self.attack_s.unwrap_or(default.attack_s),
                    release_s: self.release_s.unwrap_or(default.release_s),
                    filter_mode: self.filter.into(),
                    noise_gain: self.noise_gain,
                    ..default
                })
            }
            InstrumentArg::Flute => {
                let default = FluteConfig::default();
                Instrument::Flute(FluteConfig {
                    attack_s: self.attack_s.unwrap_or(default.attack_s),
                    release_s: self.release_s.unwrap_or(default.release_s),
                    ..default
                })
            }
        }
    }
}

fn play<V, F>(window: &Window, volume: f32, make_voice: F) -> anyhow::Result<()>
where
    V: SigT<Item = f32> + Voice,
    F: FnMut(Note) -> V,
{
    let synth = keyboard_synth(window.key_events())
        .volume(volume)
        .build(make_voice);
    window.play_mono(synth.clamp_unit())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let layout = KeyLayout::home_row()
        .transpose_octaves(cli.octave)
        .ok_or_else(|| anyhow!("octave {} is out of range", cli.octave))?;
    for (key, note) in layout.iter() {
        log::info!("{:?}: {}", key, note);
    }
    let window = Window::builder()
        .title("padkeys")
        .width_px(cli.width)
        .height_px(cli.height)
        .palette(cli.palette.into())
        .layout(layout)
        .ripples(!cli.no_ripples)
        .player_config(Config {
            target_latency_s: cli.target_latency_s,
        })
        .build();
    match cli.instrument() {
        Instrument::Pad(pad) => {
            let noise = pad.noise();
            play(&window, cli.volume, move |note| pad.voice(note, &noise))
        }
        Instrument::Flute(flute) => {
            play(&window, cli.volume, move |note| flute.voice(note))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pad_flags() {
        let cli = Cli::parse_from([
            "padkeys",
            "--filter",
            "low-shelf",
            "--noise-gain",
            "0.2",
            "--release-s",
            "5",
        ]);
        let Instrument::Pad(pad) = cli.instrument() else {
            panic!("expected pad");
        };
        assert_eq!(pad.filter_mode, BiquadMode::LowShelf);
        assert_eq!(pad.noise_gain, 0.2);
        assert_eq!(pad.release_s, 5.0);
        assert_eq!(pad.attack_s, PadConfig::default().attack_s);
    }

    #[test]
    fn flute_attack_overrides_default() {
        let cli = Cli::parse_from([
            "padkeys",
            "--instrument",
            "flute",
            "--attack-s",
            "0.5",
        ]);
        let Instrument::Flute(flute) = cli.instrument() else {
            panic!("expected flute");
        };
        assert_eq!(flute.attack_s, 0.5);
        assert_eq!(flute.release_s, FluteConfig::default().release_s);
    }

    #[test]
    fn negative_octave() {
        let cli = Cli::parse_from(["padkeys", "--octave", "-2"]);
        assert_eq!(cli.octave, -2);
        assert!(KeyLayout::home_row().transpose_octaves(cli.octave).is_some());
    }
}
