//! This module contains a useful trait to deal with saturating operations.

use crate::units::Fixed;

/// A trait that provides saturating operators.
pub trait Saturating {
    /// A saturating addition.
    fn sadd(&self, rhs: &Self) -> Self;
}

macro_rules! impl_saturating {
    ($ty: ty) => {
        impl Saturating for $ty {
            fn sadd(&self, rhs: &Self) -> Self {
                self.saturating_add(*rhs)
            }
        }
    };
}

impl_saturating!(i32);

impl Saturating for Fixed {
    fn sadd(&self, rhs: &Self) -> Self {
        Fixed(self.0.sadd(&rhs.0))
    }
}

#[cfg(test)]
mod tests {
    use crate::saturating::Saturating;
    use crate::units::Fixed;

    #[test]
    fn test_add() {
        assert_eq!(3i32.sadd(&4), 7);
        assert_eq!(i32::max_value().sadd(&1), i32::max_value());
        assert_eq!(i32::min_value().sadd(&-1), i32::min_value());
    }

    #[test]
    fn test_add_fixed() {
        assert_eq!(Fixed(64).sadd(&Fixed(17)), Fixed(81));
        assert_eq!(Fixed(i32::max_value() - 10).sadd(&Fixed(64)), Fixed(i32::max_value()));
    }
}
