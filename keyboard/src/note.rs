//! 12-tone equal temperament following the A_440Hz convention. Only allows representation of MIDI
//! notes. The frequency of A4 (the A above middle C) is 440Hz. The lowest note is C in the octave
//! "-1" and the highest note is G9.
use std::{fmt::Display, str::FromStr};

const NOTES_PER_OCTAVE: u8 = 12;
const MAX_MIDI_INDEX: u8 = 127;
const A_4_FREQ_HZ: f32 = 440.0;
const A_4_MIDI_INDEX: u8 = 69;
const MIN_OCTAVE: i8 = -1;
const MAX_OCTAVE: i8 = 9;

pub fn freq_hz_of_midi_index(midi_index: u8) -> f32 {
    A_4_FREQ_HZ
        * (2_f32.powf(
            (midi_index as f32 - A_4_MIDI_INDEX as f32)
                / (NOTES_PER_OCTAVE as f32),
        ))
}

/// A note without an octave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteName {
    relative_midi_index: u8,
}

impl NoteName {
    const fn from_index(relative_midi_index: u8) -> Self {
        assert!(relative_midi_index < NOTES_PER_OCTAVE);
        Self {
            relative_midi_index,
        }
    }

    pub const C: Self = Self::from_index(0);
    pub const C_SHARP: Self = Self::from_index(1);
    pub const D: Self = Self::from_index(2);
    pub const D_SHARP: Self = Self::from_index(3);
    pub const E: Self = Self::from_index(4);
    pub const F: Self = Self::from_index(5);
    pub const F_SHARP: Self = Self::from_index(6);
    pub const G: Self = Self::from_index(7);
    pub const G_SHARP: Self = Self::from_index(8);
    pub const A: Self = Self::from_index(9);
    pub const A_SHARP: Self = Self::from_index(10);
    pub const B: Self = Self::from_index(11);

    /// Accidentals are always written as sharps, like "C" or "C#".
    pub const fn to_str_sharp(self) -> &'static str {
        match self.relative_midi_index {
            0 => "C",
            1 => "C#",
            2 => "D",
            3 => "D#",
            4 => "E",
            5 => "F",
            6 => "F#",
            7 => "G",
            8 => "G#",
            9 => "A",
            10 => "A#",
            11 => "B",
            _ => unreachable!(),
        }
    }

    pub fn from_str_sharp(s: &str) -> Option<Self> {
        let relative_midi_index = match s {
            "C" => 0,
            "C#" => 1,
            "D" => 2,
            "D#" => 3,
            "E" => 4,
            "F" => 5,
            "F#" => 6,
            "G" => 7,
            "G#" => 8,
            "A" => 9,
            "A#" => 10,
            "B" => 11,
            _ => return None,
        };
        Some(Self {
            relative_midi_index,
        })
    }
}

/// Definition of notes based on MIDI tuned to A_440
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Note {
    midi_index: u8,
}

impl Note {
    pub const A_4: Self = Self::from_midi_index(69);
    pub const B_4: Self = Self::from_midi_index(71);
    pub const C_5: Self = Self::from_midi_index(72);
    pub const D_5: Self = Self::from_midi_index(74);
    pub const E_5: Self = Self::from_midi_index(76);
    pub const F_5: Self = Self::from_midi_index(77);

    /// Returns `None` if the combination of note name and octave is outside the MIDI range.
    pub const fn new(name: NoteName, octave: i8) -> Option<Self> {
        if octave < MIN_OCTAVE || octave > MAX_OCTAVE {
            return None;
        }
        let midi_index = (octave + 1) as u8 * NOTES_PER_OCTAVE
            + name.relative_midi_index;
        if midi_index > MAX_MIDI_INDEX {
            None
        } else {
            Some(Self { midi_index })
        }
    }

    pub const fn from_midi_index(midi_index: u8) -> Self {
        assert!(midi_index <= MAX_MIDI_INDEX);
        Self { midi_index }
    }

    pub const fn to_midi_index(self) -> u8 {
        self.midi_index
    }

    pub fn freq_hz(self) -> f32 {
        freq_hz_of_midi_index(self.midi_index)
    }

    pub const fn octave(self) -> i8 {
        (self.midi_index / NOTES_PER_OCTAVE) as i8 - 1
    }

    pub const fn note_name(self) -> NoteName {
        NoteName::from_index(self.midi_index % NOTES_PER_OCTAVE)
    }

    pub const fn add_semitones_checked(
        self,
        num_semitones: i16,
    ) -> Option<Self> {
        let midi_index = self.midi_index as i16 + num_semitones;
        if midi_index < 0 || midi_index > MAX_MIDI_INDEX as i16 {
            None
        } else {
            Some(Self {
                midi_index: midi_index as u8,
            })
        }
    }

    pub const fn add_octaves_checked(self, num_octaves: i8) -> Option<Self> {
        self.add_semitones_checked(num_octaves as i16 * NOTES_PER_OCTAVE as i16)
    }

    /// Saturates at the ends of the MIDI range.
    pub const fn add_semitones(self, num_semitones: i16) -> Self {
        let midi_index = self.midi_index as i16 + num_semitones;
        Self {
            midi_index: if midi_index < 0 {
                0
            } else if midi_index > MAX_MIDI_INDEX as i16 {
                MAX_MIDI_INDEX
            } else {
                midi_index as u8
            },
        }
    }
}

/// Example formats: "A4", "C#5", "C-1"
impl Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.note_name().to_str_sharp(), self.octave())
    }
}

impl FromStr for Note {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split_at = s
            .find(|c: char| c == '-' || c.is_ascii_digit())
            .ok_or_else(|| format!("Missing octave in note string: {}", s))?;
        let (name, octave) = s.split_at(split_at);
        let name = NoteName::from_str_sharp(name)
            .ok_or_else(|| format!("Failed to parse note name: {}", name))?;
        let octave = octave
            .parse::<i8>()
            .map_err(|e| format!("Failed to parse octave: {}", e))?;
        Note::new(name, octave)
            .ok_or_else(|| format!("Note out of MIDI range: {}", s))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn a4_is_440() {
        assert_eq!(Note::A_4.freq_hz(), 440.0);
    }

    #[test]
    fn layout_note_frequencies() {
        let expected = [
            (Note::B_4, 493.88),
            (Note::C_5, 523.25),
            (Note::D_5, 587.33),
            (Note::E_5, 659.25),
            (Note::F_5, 698.46),
        ];
        for (note, freq_hz) in expected {
            assert!(
                (note.freq_hz() - freq_hz).abs() < 0.01,
                "{} was {}",
                note,
                note.freq_hz()
            );
        }
    }

    #[test]
    fn octave_and_name() {
        assert_eq!(Note::C_5.octave(), 5);
        assert_eq!(Note::C_5.note_name(), NoteName::C);
        assert_eq!(Note::new(NoteName::A, 4), Some(Note::A_4));
        assert_eq!(Note::new(NoteName::A, 9), None);
    }

    #[test]
    fn string_round_trip() {
        assert_eq!(Note::A_4.to_string(), "A4");
        assert_eq!("A4".parse::<Note>().unwrap(), Note::A_4);
        let c_sharp_5 = Note::C_5.add_semitones(1);
        assert_eq!(c_sharp_5.to_string(), "C#5");
        assert_eq!(c_sharp_5.to_string().parse::<Note>().unwrap(), c_sharp_5);
        assert_eq!("C-1".parse::<Note>().unwrap().to_midi_index(), 0);
        assert!("H4".parse::<Note>().is_err());
        assert!("A".parse::<Note>().is_err());
    }

    #[test]
    fn octave_shift_checked() {
        assert_eq!(Note::A_4.add_octaves_checked(-1).unwrap().freq_hz(), 220.0);
        assert_eq!(Note::A_4.add_octaves_checked(6), None);
        assert_eq!(Note::from_midi_index(1).add_semitones(-5).to_midi_index(), 0);
    }
}
