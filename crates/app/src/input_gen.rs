//! Sample Base64 text for runs without an input file.
//!
//! Base64 of a small JPEG is far from uniform: long runs of `A` from zeroed
//! regions, a handful of dominant symbols, and repeated header fragments.
//! The generator mixes sections of each kind so the coder has something to
//! work with, then finishes with standard `=` padding.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::Write;

const BASE64: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Generate `len` symbols of Base64 text, reproducible from `seed`.
pub fn generate_sample_base64(seed: u64, len: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut text = String::with_capacity(len);

    while text.len() < len {
        let section = (len - text.len()).min(rng.gen_range(16..=256));

        match rng.gen_range(0..10) {
            // 30% zero runs
            0..=2 => text.extend(std::iter::repeat('A').take(section)),

            // 40% skewed toward the front of the alphabet
            3..=6 => {
                for _ in 0..section {
                    let r: f64 = rng.gen();
                    let idx = ((r * r) * BASE64.len() as f64) as usize;
                    text.push(BASE64[idx.min(BASE64.len() - 1)] as char);
                }
            }

            // 10% repeating fragment
            7 => {
                let fragment = generate_fragment(&mut rng);
                text.extend(fragment.chars().cycle().take(section));
            }

            // 20% uniform
            _ => {
                for _ in 0..section {
                    text.push(BASE64[rng.gen_range(0..BASE64.len())] as char);
                }
            }
        }
    }

    if len >= 4 && len % 4 == 0 {
        let padding = rng.gen_range(0..=2);
        text.truncate(len - padding);
        text.extend(std::iter::repeat('=').take(padding));
    }
    text
}

fn generate_fragment(rng: &mut ChaCha8Rng) -> String {
    let fragment_len = rng.gen_range(4..=24);
    (0..fragment_len)
        .map(|_| BASE64[rng.gen_range(0..BASE64.len())] as char)
        .collect()
}

/// Write a generated sample to a file.
pub fn write_sample_file(path: &std::path::Path, seed: u64, len: usize) -> std::io::Result<()> {
    let text = generate_sample_base64(seed, len);
    let mut file = std::fs::File::create(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}
