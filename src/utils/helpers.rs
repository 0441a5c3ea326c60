// utils/helpers.rs
use std::time::Instant;

/// Arrondir à `decimals` décimales (formatage des réponses uniquement)
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Formater une durée écoulée en millisecondes
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Convertir une variable d'environnement booléenne ("1", "true", "yes", "on")
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3456.789, 2), 3456.79);
        assert_eq!(round_to(-1.005_1, 2), -1.01);
        assert_eq!(round_to(12.0, 2), 12.0);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("peut-être"), None);
    }
}
