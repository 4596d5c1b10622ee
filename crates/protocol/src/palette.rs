use crate::types::Color;

/// The ten Tableau colors, in matplotlib's `TABLEAU_COLORS` order.
const TABLEAU: [Color; 10] = [
    Color::rgb(0x1f, 0x77, 0xb4), // blue
    Color::rgb(0xff, 0x7f, 0x0e), // orange
    Color::rgb(0x2c, 0xa0, 0x2c), // green
    Color::rgb(0xd6, 0x27, 0x28), // red
    Color::rgb(0x94, 0x67, 0xbd), // purple
    Color::rgb(0x8c, 0x56, 0x4b), // brown
    Color::rgb(0xe3, 0x77, 0xc2), // pink
    Color::rgb(0x7f, 0x7f, 0x7f), // gray
    Color::rgb(0xbc, 0xbd, 0x22), // olive
    Color::rgb(0x17, 0xbe, 0xcf), // cyan
];

/// A fixed, ordered color palette indexed cyclically.
///
/// Position `i` in a selection always maps to `colors[i % len]`, so a
/// selection larger than the palette repeats colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn tableau() -> Self {
        Self {
            colors: TABLEAU.to_vec(),
        }
    }

    /// Color for the item at `index` in selection order.
    pub fn color_at(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::tableau()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_past_the_end() {
        let palette = Palette::tableau();
        assert_eq!(palette.color_at(0), palette.color_at(10));
        assert_eq!(palette.color_at(3), palette.color_at(23));
        assert_ne!(palette.color_at(0), palette.color_at(1));
        assert_eq!(palette.color_at(0).to_hex(), "#1f77b4");
    }
}
