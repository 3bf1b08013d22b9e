//! Ordering of a row sequence by the `Sorting` axis.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseSortOrderError;
use crate::host::ContinuousValue;
use crate::host::HostRow;
use crate::row::RowRecord;
use crate::row::RowSequence;

/// Sorting axis expression meaning "nothing selected".
pub const EMPTY_SORT_EXPRESSION: &str = "<>";

/// Value of the persisted `sortOrder` property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Reads the property leniently: anything but `"asc"` sorts descending.
    pub fn from_property(value: &str) -> Self {
        if value == "asc" {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Applies the direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            other => Err(ParseSortOrderError(other.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precomputed sort key of a row.
#[derive(Clone, Debug, PartialEq)]
pub enum SortKey {
    /// Leaf index in the host's categorical order.
    Ordinal(usize),
    Continuous(ContinuousValue),
}

type Keyed<R> = (SortKey, RowRecord<R>);

/// Returns `false` for an empty expression and for the "no selection" sentinel.
pub fn sorting_enabled(expression: &str) -> bool {
    !expression.is_empty() && expression != EMPTY_SORT_EXPRESSION
}

/// Ascending comparison of two keys. Mismatched or unsupported pairs compare equal.
pub fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Ordinal(a), SortKey::Ordinal(b)) => a.cmp(b),
        (SortKey::Continuous(a), SortKey::Continuous(b)) => compare_continuous(a, b),
        _ => Ordering::Equal,
    }
}

pub fn compare_continuous(a: &ContinuousValue, b: &ContinuousValue) -> Ordering {
    match (a, b) {
        (ContinuousValue::Date(a), ContinuousValue::Date(b)) => {
            a.timestamp_millis().cmp(&b.timestamp_millis())
        }
        (ContinuousValue::Number(a), ContinuousValue::Number(b)) => {
            a.partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        (ContinuousValue::Text(a), ContinuousValue::Text(b)) => locale_compare(a, b),
        _ => Ordering::Equal,
    }
}

/// Case-insensitive comparison with a code-point tie break.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Reorders `rows` in place by the `Sorting` axis.
pub fn sort_rows<R: HostRow>(rows: &mut RowSequence<R>, order: SortOrder, categorical: bool) {
    let keyed: Vec<Keyed<R>> = rows
        .take()
        .into_iter()
        .map(|row| (row.sort_key(categorical), row))
        .collect();
    let sorted = merge_sort_by(keyed, &|a: &Keyed<R>, b: &Keyed<R>| {
        order.apply(compare_keys(&a.0, &b.0))
    });
    tracing::trace!(
        target: "ratatui_textcards::sort",
        rows = sorted.len(),
        order = order.as_str(),
        categorical,
        "sorted rows"
    );
    rows.replace(sorted.into_iter().map(|(_, row)| row).collect());
}

// Mixed value types make the comparator non-transitive, which the std sorts may reject with a
// panic. A plain merge sort tolerates it and keeps equal pairs in input order.
fn merge_sort_by<T>(mut items: Vec<T>, cmp: &impl Fn(&T, &T) -> Ordering) -> Vec<T> {
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, cmp);
    let right = merge_sort_by(right, cmp);

    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(r, l) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right {
            right.next()
        } else {
            left.next()
        };
        out.extend(next);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::materialize;
    use crate::testing::MemoryRow;
    use chrono::TimeZone;
    use chrono::Utc;

    fn contents<R: HostRow>(rows: &RowSequence<R>) -> Vec<String> {
        rows.records().iter().map(RowRecord::content).collect()
    }

    #[test]
    fn parses_sort_order_property() {
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Ascending));
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Descending));
        assert!("up".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::from_property("whatever"), SortOrder::Descending);
        assert_eq!(SortOrder::Ascending.toggled().to_string(), "desc");
    }

    #[test]
    fn sorting_disabled_for_empty_expressions() {
        assert!(!sorting_enabled(""));
        assert!(!sorting_enabled("<>"));
        assert!(sorting_enabled("<[Sales]>"));
    }

    #[test]
    fn categorical_sort_follows_leaf_index() {
        let mut rows = materialize(vec![
            MemoryRow::new("c").with_leaf_index(2),
            MemoryRow::new("a").with_leaf_index(0),
            MemoryRow::new("b").with_leaf_index(1),
        ]);
        sort_rows(&mut rows, SortOrder::Ascending, true);
        assert_eq!(contents(&rows), ["a", "b", "c"]);
        sort_rows(&mut rows, SortOrder::Descending, true);
        assert_eq!(contents(&rows), ["c", "b", "a"]);
    }

    #[test]
    fn continuous_sort_handles_numbers_dates_and_text() {
        let mut rows = materialize(vec![
            MemoryRow::new("3").with_number(3.5),
            MemoryRow::new("1").with_number(-1.0),
            MemoryRow::new("2").with_number(2.0),
        ]);
        sort_rows(&mut rows, SortOrder::Ascending, false);
        assert_eq!(contents(&rows), ["1", "2", "3"]);

        let day = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
        let mut rows = materialize(vec![
            MemoryRow::new("jan2").with_date(day(2)),
            MemoryRow::new("jan9").with_date(day(9)),
            MemoryRow::new("jan1").with_date(day(1)),
        ]);
        sort_rows(&mut rows, SortOrder::Descending, false);
        assert_eq!(contents(&rows), ["jan9", "jan2", "jan1"]);

        let mut rows = materialize(vec![
            MemoryRow::new("b").with_text("banana"),
            MemoryRow::new("A").with_text("Apple"),
            MemoryRow::new("c").with_text("cherry"),
        ]);
        sort_rows(&mut rows, SortOrder::Ascending, false);
        assert_eq!(contents(&rows), ["A", "b", "c"]);
    }

    #[test]
    fn ascending_result_is_non_decreasing() {
        let values = [9.0, 1.0, 4.0, 4.0, -3.0, 7.5, 0.0, 2.0, 8.0, 1.0];
        let mut rows = materialize(
            values
                .iter()
                .map(|v| MemoryRow::new(v.to_string()).with_number(*v))
                .collect(),
        );
        sort_rows(&mut rows, SortOrder::Ascending, false);
        let keys: Vec<SortKey> = rows.records().iter().map(|r| r.sort_key(false)).collect();
        for pair in keys.windows(2) {
            assert_ne!(compare_keys(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn mixed_types_compare_equal_and_keep_order() {
        assert_eq!(
            compare_continuous(
                &ContinuousValue::Text("x".into()),
                &ContinuousValue::Number(1.0)
            ),
            Ordering::Equal
        );

        let mut rows = materialize(vec![
            MemoryRow::new("first").with_text("zzz"),
            MemoryRow::new("second").with_number(1.0),
        ]);
        sort_rows(&mut rows, SortOrder::Ascending, false);
        assert_eq!(contents(&rows), ["first", "second"]);
    }

    #[test]
    fn non_transitive_comparisons_do_not_panic() {
        let mut rows = materialize(
            (0..64)
                .map(|i| {
                    let row = MemoryRow::new(i.to_string());
                    match i % 3 {
                        0 => row.with_number(f64::from(64 - i)),
                        1 => row.with_text(format!("t{}", 64 - i)),
                        _ => row.with_number(f64::NAN),
                    }
                })
                .collect(),
        );
        sort_rows(&mut rows, SortOrder::Descending, false);
        assert_eq!(rows.len(), 64);
    }

    #[test]
    fn locale_compare_folds_case() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), "a".cmp("A"));
        assert_eq!(locale_compare("Zed", "zed"), Ordering::Less);
    }
}
