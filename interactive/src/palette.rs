pub use rgb_int::Rgb24;

/// Colour schemes for ripples. Each key in the layout takes the colour at its position in the
/// layout, wrapping around if the layout has more keys than the palette has colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// Pale blues fading to white
    #[default]
    Ice,
    /// One pastel shade per hue
    Pastel,
}

const ICE: [(u8, u8, u8); 6] = [
    (0xBD, 0xE7, 0xFF),
    (0xCD, 0xED, 0xFF),
    (0xDC, 0xF2, 0xFF),
    (0xE9, 0xF7, 0xFF),
    (0xF3, 0xFB, 0xFF),
    (0xFF, 0xFF, 0xFF),
];

const PASTEL: [(u8, u8, u8); 6] = [
    (0xFF, 0xCC, 0xCC),
    (0xFF, 0xCC, 0x99),
    (0xFF, 0xFF, 0x99),
    (0xCC, 0xFF, 0xCC),
    (0xCC, 0xFF, 0xFF),
    (0xCC, 0xCC, 0xFF),
];

impl Palette {
    fn table(self) -> &'static [(u8, u8, u8); 6] {
        match self {
            Self::Ice => &ICE,
            Self::Pastel => &PASTEL,
        }
    }

    pub fn colour(self, index: usize) -> Rgb24 {
        let table = self.table();
        let (r, g, b) = table[index % table.len()];
        Rgb24::new(r, g, b)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_and_last_ice_colours() {
        assert_eq!(Palette::Ice.colour(0), Rgb24::new(189, 231, 255));
        assert_eq!(Palette::Ice.colour(5), Rgb24::new(255, 255, 255));
    }

    #[test]
    fn ice_lightens_towards_white() {
        let reds = (0..6).map(|i| Palette::Ice.colour(i).r).collect::<Vec<_>>();
        assert!(reds.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn colours_wrap() {
        assert_eq!(Palette::Pastel.colour(6), Palette::Pastel.colour(0));
        assert_eq!(Palette::Pastel.colour(2), Rgb24::new(255, 255, 153));
    }
}
