//! Unit conversions applied at the adapter boundary. All of them round to
//! 4 decimal places; the corrector rounds again to the record's final
//! precision, so this is just enough to avoid compounding floating-point
//! noise between the two passes.

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    round4((f - 32.0) * 5.0 / 9.0)
}

pub fn mph_to_kmh(mph: f64) -> f64 {
    round4(mph * 1.60934)
}

pub fn inches_to_mm(inches: f64) -> f64 {
    round4(inches * 25.4)
}

pub fn psi_to_hpa(psi: f64) -> f64 {
    round4(psi * 33.8639)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fahrenheit_freezing_point() {
        assert_eq!(fahrenheit_to_celsius(32.0), 0.0);
    }

    #[test]
    fn mph_conversion() {
        assert_eq!(mph_to_kmh(10.0), 16.0934);
    }

    #[test]
    fn inches_conversion() {
        assert_eq!(inches_to_mm(1.0), 25.4);
    }

    #[test]
    fn psi_conversion() {
        assert_eq!(psi_to_hpa(1.0), 33.8639);
    }
}
