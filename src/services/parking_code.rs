//! Parking area codes: one uppercase letter followed by two digits, e.g. `K42`.
//!
//! Codes are drawn uniformly at random and are not checked for uniqueness.

use rand::Rng;

/// Generate a random parking area code.
pub fn generate_parking_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let letter = char::from(rng.random_range(b'A'..=b'Z'));
    let digits: String = (0..2)
        .map(|_| char::from(rng.random_range(b'0'..=b'9')))
        .collect();

    format!("{letter}{digits}")
}

/// Whether `code` has the parking area code shape.
pub fn is_valid_parking_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 3
        && bytes[0].is_ascii_uppercase()
        && bytes[1].is_ascii_digit()
        && bytes[2].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_codes_match_pattern() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let code = generate_parking_code(&mut rng);
            assert!(is_valid_parking_code(&code), "bad code {code}");
        }
    }

    #[test]
    fn generated_codes_cover_the_alphabet() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut letters = std::collections::HashSet::new();
        for _ in 0..5_000 {
            letters.insert(generate_parking_code(&mut rng).chars().next().unwrap());
        }
        assert_eq!(letters.len(), 26);
    }

    #[test]
    fn validation_rejects_other_shapes() {
        assert!(is_valid_parking_code("A00"));
        assert!(is_valid_parking_code("Z99"));
        assert!(!is_valid_parking_code("a12"));
        assert!(!is_valid_parking_code("AB1"));
        assert!(!is_valid_parking_code("A123"));
        assert!(!is_valid_parking_code("Ä12"));
        assert!(!is_valid_parking_code(""));
    }
}
