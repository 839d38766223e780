//! 多项式滚动哈希（按 UTF-16 码元计算）。

/// `h = (h * 31 + unit) mod capacity` over the UTF-16 code units of `key`,
/// starting from 0. A zero capacity hashes everything to 0.
pub fn polynomial_hash(key: &str, capacity: usize) -> usize {
    if capacity == 0 {
        return 0;
    }
    key.encode_utf16()
        .fold(0, |hash, unit| (hash * 31 + usize::from(unit)) % capacity)
}

/// Home position of `key` in every tier, each tier using its own capacity
/// as modulus.
pub fn hash_per_tier(key: &str, capacities: &[usize]) -> Vec<usize> {
    capacities
        .iter()
        .map(|&capacity| polynomial_hash(key, capacity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(polynomial_hash("alice7", 50), 45);
        assert_eq!(polynomial_hash("alice27", 50), 45);
        assert_eq!(polynomial_hash("", 50), 0);
        assert_eq!(polynomial_hash("é", 50), 233 % 50);
    }

    #[test]
    fn hashes_code_units_not_chars() {
        // U+1F600 is the surrogate pair D83D DE00
        assert_eq!(polynomial_hash("😀", 50), 49);
    }

    #[test]
    fn per_tier_uses_each_capacity() {
        assert_eq!(
            hash_per_tier("alice7", &[25, 12, 6, 4, 2, 1]),
            vec![20, 7, 1, 3, 1, 0]
        );
        assert_eq!(polynomial_hash("alice7", 0), 0);
    }
}
