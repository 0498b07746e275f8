use std::cmp::Ordering;
use std::fmt;

use crate::error::Error;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    pub variable: usize,
    pub polarity: bool,
}

impl Literal {
    // Panics on 0, untrusted input goes through TryFrom
    pub fn new(val: i64) -> Self {
        if val == 0 {
            panic!("0 cannot be a literal");
        }
        Literal {
            variable: val.unsigned_abs() as usize,
            polarity: val > 0,
        }
    }

    pub fn positive(variable: usize) -> Self {
        Literal {
            variable,
            polarity: true,
        }
    }

    pub fn negate(self) -> Self {
        Literal {
            variable: self.variable,
            polarity: !self.polarity,
        }
    }

    pub fn to_i64(self) -> i64 {
        if self.polarity {
            self.variable as i64
        } else {
            -(self.variable as i64)
        }
    }
}

impl TryFrom<i64> for Literal {
    type Error = Error;

    fn try_from(val: i64) -> Result<Self, Self::Error> {
        if val == 0 {
            return Err(Error::ZeroLiteral);
        }
        Ok(Literal::new(val))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_i64())
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.polarity {
            write!(f, "{}", self.variable)
        } else {
            write!(f, "¬{}", self.variable)
        }
    }
}

// Same order as the signed integers: -3 < -1 < 1 < 2.
impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_i64().cmp(&other.to_i64())
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::Literal;
    use crate::error::Error;

    #[test]
    fn signed_round_trip() {
        let lit = Literal::new(-7);
        assert_eq!(lit.variable, 7);
        assert!(!lit.polarity);
        assert_eq!(lit.to_i64(), -7);
        assert_eq!(lit.negate(), Literal::new(7));
        assert_eq!(lit.to_string(), "-7");
    }

    #[test]
    fn ordered_like_integers() {
        let mut lits = vec![Literal::new(2), Literal::new(-1), Literal::new(1), Literal::new(-3)];
        lits.sort();
        let values: Vec<i64> = lits.into_iter().map(Literal::to_i64).collect();
        assert_eq!(values, vec![-3, -1, 1, 2]);
    }

    #[test]
    fn zero_is_rejected() {
        assert!(matches!(Literal::try_from(0i64), Err(Error::ZeroLiteral)));
        assert_eq!(Literal::try_from(4i64).ok(), Some(Literal::positive(4)));
    }
}
