//! Integer helpers: floored modulo, gcd and lcm over many values

use num_integer::Integer;
use thiserror::Error;

pub use num_integer::{gcd, lcm};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("division by zero")]
    DivisionByZero,
}

/// Floored modulo: the result takes the sign of `divisor`.
///
/// ```
/// use aoc_2023::utils::math::modulo;
///
/// assert_eq!(modulo(-5, 4), Ok(3));
/// assert_eq!(modulo(-5, -4), Ok(-1));
/// assert!(modulo(1, 0).is_err());
/// ```
pub fn modulo<T: Integer + Copy>(value: T, divisor: T) -> Result<T, MathError> {
    if divisor.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    Ok(value.mod_floor(&divisor))
}

/// Floored quotient and modulo
pub fn divmod<T: Integer + Copy>(value: T, divisor: T) -> Result<(T, T), MathError> {
    if divisor.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    Ok(value.div_mod_floor(&divisor))
}

/// Greatest common divisor of all values, `None` when empty
pub fn gcd_all<T: Integer + Copy>(values: impl IntoIterator<Item = T>) -> Option<T> {
    values.into_iter().reduce(|a, b| a.gcd(&b))
}

/// Least common multiple of all values, `None` when empty
pub fn lcm_all<T: Integer + Copy>(values: impl IntoIterator<Item = T>) -> Option<T> {
    values.into_iter().reduce(|a, b| a.lcm(&b))
}
