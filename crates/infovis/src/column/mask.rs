//! One-bit-per-row undefined flags.

const WORD_BITS: usize = u64::BITS as usize;

/// Bitmap of undefined cells. A set bit means the cell has no value.
#[derive(Debug, Clone, Default)]
pub(crate) struct UndefinedMask {
    words: Vec<u64>,
}

impl UndefinedMask {
    pub(crate) fn get(&self, index: usize) -> bool {
        self.words
            .get(index / WORD_BITS)
            .is_some_and(|word| word & (1 << (index % WORD_BITS)) != 0)
    }

    /// Set or clear one flag. Returns `true` if the flag changed.
    pub(crate) fn set(&mut self, index: usize, undefined: bool) -> bool {
        let word_index = index / WORD_BITS;
        if word_index >= self.words.len() {
            if !undefined {
                return false;
            }
            self.words.resize(word_index + 1, 0);
        }
        let bit = 1 << (index % WORD_BITS);
        let word = &mut self.words[word_index];
        let was = *word & bit != 0;
        if undefined {
            *word |= bit;
        } else {
            *word &= !bit;
        }
        was != undefined
    }

    /// Flag every index in `start..end` as undefined.
    pub(crate) fn set_range(&mut self, start: usize, end: usize) {
        for index in start..end {
            self.set(index, true);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.words.clear();
    }

    pub(crate) fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }
}
