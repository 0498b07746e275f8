use std::fmt;

use rand::Rng;

use super::cnf::Valuation;

const WORD_BITS: usize = u64::BITS as usize;

/// A total assignment over variables `1..=len`, packed 64 to a word.
///
/// Access is zero-based: index `i` holds variable `i + 1`. Cloning copies the
/// words, so candidates are cheap to derive from the current assignment.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    words: Vec<u64>,
    len: usize,
}

impl Assignment {
    pub fn new(len: usize) -> Self {
        Assignment {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut words: Vec<u64> = (0..len.div_ceil(WORD_BITS)).map(|_| rng.gen()).collect();
        let tail = len % WORD_BITS;
        if let (Some(last), true) = (words.last_mut(), tail > 0) {
            *last &= (1u64 << tail) - 1;
        }
        Assignment { words, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.len, "index {} out of range for {} variables", index, self.len);
        self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    pub fn set(&mut self, index: usize, value: bool) {
        assert!(index < self.len, "index {} out of range for {} variables", index, self.len);
        let mask = 1 << (index % WORD_BITS);
        if value {
            self.words[index / WORD_BITS] |= mask;
        } else {
            self.words[index / WORD_BITS] &= !mask;
        }
    }

    pub fn flip(&mut self, index: usize) {
        assert!(index < self.len, "index {} out of range for {} variables", index, self.len);
        self.words[index / WORD_BITS] ^= 1 << (index % WORD_BITS);
    }

    /// Copy of `self` with `variable` (1-based) toggled.
    pub fn flipped(&self, variable: usize) -> Self {
        let mut candidate = self.clone();
        candidate.flip(variable - 1);
        candidate
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|index| self.get(index))
    }

    pub fn model(&self) -> Vec<i64> {
        self.iter()
            .enumerate()
            .map(|(index, value)| {
                let variable = index as i64 + 1;
                if value {
                    variable
                } else {
                    -variable
                }
            })
            .collect()
    }

    pub fn apply_partial(&mut self, partial: &[Option<bool>]) {
        for (index, value) in partial.iter().enumerate().take(self.len) {
            if let Some(value) = *value {
                self.set(index, value);
            }
        }
    }
}

impl Valuation for Assignment {
    fn num_vars(&self) -> usize {
        self.len
    }

    fn value(&self, variable: usize) -> Option<bool> {
        (1..=self.len).contains(&variable).then(|| self.get(variable - 1))
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, lit) in self.model().into_iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{lit}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{self}]")
    }
}
