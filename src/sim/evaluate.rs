//! Answer evaluation

use super::condition::Condition;

/// Judge a submitted card value against the active round.
///
/// Pure. A value that is not on the board is simply wrong.
#[inline]
pub fn evaluate(selected: i32, numbers: &[i32], condition: &Condition) -> bool {
    condition.check(selected, numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_break_by_value() {
        let numbers = [7, 3, 7, 1];
        let max = Condition::Max { target: 7 };
        assert!(evaluate(7, &numbers, &max));
        assert!(!evaluate(3, &numbers, &max));
    }

    #[test]
    fn test_evaluate_is_repeatable() {
        let numbers = [2, 5, 10];
        for condition in [Condition::Even, Condition::Odd, Condition::Min { target: 2 }] {
            for selected in [2, 5, 10, 99] {
                assert_eq!(
                    evaluate(selected, &numbers, &condition),
                    evaluate(selected, &numbers, &condition)
                );
            }
        }
    }

    #[test]
    fn test_foreign_value_rejected() {
        assert!(!evaluate(4, &[1, 3, 5], &Condition::Even));
        assert!(!evaluate(-1, &[], &Condition::Odd));
    }
}
