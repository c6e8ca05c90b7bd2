use rand::Rng;
use time::Duration;

pub const CODE_LEN: usize = 6;
pub const CODE_TTL: Duration = Duration::hours(1);

/// Six uppercase hexadecimal digits from 24 random bits.
pub fn generate() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..=0xFF_FFFF);
    format!("{n:06X}")
}

/// Trimmed, uppercased form used for lookups.
pub fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
