//! Plain IEEE-754 arithmetic. Division by zero and negative square roots are not
//! errors here, they produce infinities and NaN.

pub fn sum(a: f64, b: f64) -> f64 {
    a + b
}

pub fn difference(a: f64, b: f64) -> f64 {
    a - b
}

pub fn product(a: f64, b: f64) -> f64 {
    a * b
}

pub fn quotient(a: f64, b: f64) -> f64 {
    a / b
}

pub fn mean(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}

pub fn square_root(a: f64) -> f64 {
    a.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_scenarios() {
        assert_eq!(sum(2.0, 3.0), 5.0);
        assert_eq!(difference(2.0, 3.0), -1.0);
        assert_eq!(product(2.0, 3.0), 6.0);
        assert_eq!(quotient(10.0, 2.0), 5.0);
        assert_eq!(mean(4.0, 6.0), 5.0);
        assert_eq!(square_root(16.0), 4.0);
    }

    #[test]
    fn division_by_zero_follows_float_semantics() {
        assert_eq!(quotient(1.0, 0.0), f64::INFINITY);
        assert_eq!(quotient(-1.0, 0.0), f64::NEG_INFINITY);
        assert!(quotient(0.0, 0.0).is_nan());
    }

    #[test]
    fn square_root_of_negative_is_nan() {
        assert!(square_root(-4.0).is_nan());
    }
}
