//! Shannon entropy scoring for high-entropy string detection.

/// Shannon entropy of `s` in bits per byte. `0.0` for empty input.
///
/// Random hex scores about 4, random base64 about 6, repeated bytes near 0.
pub fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq = [0usize; 256];
    for &b in s.as_bytes() {
        freq[b as usize] += 1;
    }

    let len = s.len() as f64;
    freq.iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}
