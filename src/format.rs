/// Formats `value` with `separator` between groups of three digits.
pub fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_from_the_right() {
        assert_eq!(group_thousands(0, ','), "0");
        assert_eq!(group_thousands(358, ','), "358");
        assert_eq!(group_thousands(3_589, ','), "3,589");
        assert_eq!(group_thousands(100_000, ','), "100,000");
        assert_eq!(group_thousands(1_234_567, '.'), "1.234.567");
    }
}
