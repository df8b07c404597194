//! Thousands-separated integers for diagnostic output

use std::fmt;

/// Render `val` with a comma every three digits, e.g. `1234567` -> `"1,234,567"`
pub fn pretty_num(val: u64) -> String {
    let digits = val.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `Display` adapter around [`pretty_num`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grouped(pub u64);

impl fmt::Display for Grouped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&pretty_num(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pretty_num_known_values() {
        assert_eq!(pretty_num(0), "0");
        assert_eq!(pretty_num(7), "7");
        assert_eq!(pretty_num(999), "999");
        assert_eq!(pretty_num(1000), "1,000");
        assert_eq!(pretty_num(200_000), "200,000");
        assert_eq!(pretty_num(1_234_567), "1,234,567");
        assert_eq!(pretty_num(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[test]
    fn test_grouped_display_padding() {
        assert_eq!(format!("{}", Grouped(2_000_000)), "2,000,000");
        assert_eq!(format!("{:>8}", Grouped(1234)), "   1,234");
    }

    proptest! {
        #[test]
        fn prop_pretty_num_round_trips(val in any::<u64>()) {
            let s = pretty_num(val);
            prop_assert!(s.chars().all(|c| c.is_ascii_digit() || c == ','));
            prop_assert!(!s.starts_with(','));
            prop_assert!(!s.ends_with(','));
            let stripped: String = s.chars().filter(|&c| c != ',').collect();
            prop_assert_eq!(stripped.parse::<u64>().unwrap(), val);
        }

        #[test]
        fn prop_groups_are_three_digits(val in any::<u64>()) {
            let s = pretty_num(val);
            let mut groups = s.split(',');
            let head = groups.next().unwrap();
            prop_assert!((1..=3).contains(&head.len()));
            for g in groups {
                prop_assert_eq!(g.len(), 3);
            }
        }
    }
}
