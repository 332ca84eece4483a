use rand::Rng;

/// First code point of the katakana block used for the rain.
pub const KATAKANA_START: u32 = 0x30a0;
/// Number of printable katakana symbols.
pub const KATAKANA_COUNT: u32 = 96;
/// Number of blank placeholders appended after the printable symbols.
pub const BLANK_COUNT: usize = 10;

/// Ordered set of symbols a cell can show.
///
/// `None` entries are blank placeholders: they take part in random selection
/// but are never drawn, which thins out the rain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<Option<char>>,
}

impl Alphabet {
    pub fn new(symbols: Vec<Option<char>>) -> Self {
        assert!(!symbols.is_empty(), "alphabet must contain at least one symbol");
        assert!(symbols.len() <= usize::from(u8::MAX) + 1, "alphabet indices must fit in a byte");
        Self { symbols }
    }

    /// The 96 katakana symbols followed by the blank placeholders.
    pub fn katakana() -> Self {
        let printable = (KATAKANA_START..KATAKANA_START + KATAKANA_COUNT).filter_map(char::from_u32);
        let symbols =
            printable.map(Some).chain(std::iter::repeat(None).take(BLANK_COUNT)).collect();
        Self::new(symbols)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol stored at `index`, `None` for blanks and out of range indices.
    pub fn symbol(&self, index: u8) -> Option<char> {
        self.symbols.get(usize::from(index)).copied().flatten()
    }

    /// Printable symbols with their alphabet indices.
    pub fn printable(&self) -> impl Iterator<Item = (u8, char)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .filter_map(|(index, symbol)| symbol.map(|ch| (index as u8, ch)))
    }

    /// Uniformly draws an alphabet index, blanks included.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        rng.gen_range(0..self.symbols.len()) as u8
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::katakana()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn katakana_has_printable_block_then_blanks() {
        let alphabet = Alphabet::katakana();
        assert_eq!(alphabet.len(), 106);
        assert_eq!(alphabet.symbol(0), Some('\u{30a0}'));
        assert_eq!(alphabet.symbol(95), Some('\u{30ff}'));
        assert!((96..106).all(|index| alphabet.symbol(index).is_none()));
        assert_eq!(alphabet.printable().count(), 96);
    }

    #[test]
    fn samples_stay_in_range() {
        let alphabet = Alphabet::katakana();
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..1000).all(|_| usize::from(alphabet.sample(&mut rng)) < alphabet.len()));
    }

    #[test]
    fn out_of_range_index_is_blank() {
        let alphabet = Alphabet::new(vec![Some('a'), None]);
        assert_eq!(alphabet.symbol(1), None);
        assert_eq!(alphabet.symbol(200), None);
    }
}
