use crate::Note;

/// A key on a computer keyboard. Only keys that could reasonably be assigned a note are
/// represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    N0,
    N1,
    N2,
    N3,
    N4,
    N5,
    N6,
    N7,
    N8,
    N9,
    LeftBracket,
    RightBracket,
    Semicolon,
    Apostrophe,
    Comma,
    Period,
    Minus,
    Equals,
    Slash,
    Space,
    Backslash,
}

/// Assignment of notes to keys. The order of assignments is significant as it's used to pick
/// colours for the visualization.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyLayout {
    assignments: Vec<(Key, Note)>,
}

impl KeyLayout {
    pub fn new(assignments: impl IntoIterator<Item = (Key, Note)>) -> Self {
        let mut layout = Self {
            assignments: Vec::new(),
        };
        for (key, note) in assignments {
            if let Some(existing) =
                layout.assignments.iter_mut().find(|(k, _)| *k == key)
            {
                log::warn!("Key {:?} assigned twice, using {}", key, note);
                existing.1 = note;
            } else {
                layout.assignments.push((key, note));
            }
        }
        layout
    }

    /// The six keys of the left-hand home row, playing the notes A4 through F5 of the A minor
    /// scale.
    pub fn home_row() -> Self {
        Self::new([
            (Key::A, Note::A_4),
            (Key::S, Note::B_4),
            (Key::D, Note::C_5),
            (Key::F, Note::D_5),
            (Key::G, Note::E_5),
            (Key::H, Note::F_5),
        ])
    }

    /// Returns `None` for keys with no note assigned.
    pub fn note(&self, key: Key) -> Option<Note> {
        self.assignments
            .iter()
            .find_map(|&(k, note)| if k == key { Some(note) } else { None })
    }

    /// The position of the key within the layout.
    pub fn index_of(&self, key: Key) -> Option<usize> {
        self.assignments.iter().position(|&(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, Note)> + '_ {
        self.assignments.iter().cloned()
    }

    /// Shift every note by a whole number of octaves. Returns `None` if any note would leave the
    /// MIDI range.
    pub fn transpose_octaves(&self, num_octaves: i8) -> Option<Self> {
        let assignments = self
            .assignments
            .iter()
            .map(|&(key, note)| {
                note.add_octaves_checked(num_octaves).map(|note| (key, note))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self { assignments })
    }
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self::home_row()
    }
}
