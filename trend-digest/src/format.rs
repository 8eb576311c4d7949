//! Small text formatting helpers shared by prompts, reports and notifications.

/// Groups digits with commas: `27391` -> `"27,391"`.
#[must_use]
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One star glyph per score point.
#[must_use]
pub fn star_rating(score: u8) -> String {
    "⭐".repeat(usize::from(score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(27_391), "27,391");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn repeats_stars() {
        assert_eq!(star_rating(3), "⭐⭐⭐");
        assert_eq!(star_rating(0), "");
    }
}
