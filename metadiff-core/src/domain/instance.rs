// metadiff-core/src/domain/instance.rs

use serde::Serialize;

/// The two instances a report compares, in first-seen order of the staged key column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstancePair {
    pub first: String,
    pub second: String,
}

impl InstancePair {
    /// First two distinct values, by first occurrence. `None` when fewer than two exist.
    pub fn from_values<I, S>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let distinct = distinct_in_order(values);
        let mut it = distinct.into_iter();
        match (it.next(), it.next()) {
            (Some(first), Some(second)) => Some(Self { first, second }),
            _ => None,
        }
    }
}

/// Deduplicate while keeping first-seen order.
pub fn distinct_in_order<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for value in values {
        let value: String = value.into();
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_two_distinct_by_first_seen() {
        let pair = InstancePair::from_values(["A", "A", "B", "C"]);
        assert_eq!(
            pair,
            Some(InstancePair {
                first: "A".into(),
                second: "B".into()
            })
        );
    }

    #[test]
    fn test_single_instance_is_not_a_pair() {
        assert_eq!(InstancePair::from_values(["A", "A"]), None);
        assert_eq!(InstancePair::from_values(Vec::<String>::new()), None);
    }

    #[test]
    fn test_distinct_in_order() {
        assert_eq!(distinct_in_order(["b", "a", "b", "c", "a"]), vec!["b", "a", "c"]);
    }
}
