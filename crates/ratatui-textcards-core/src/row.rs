//! Row model: a stable, ordered projection of host rows.

use std::ops::Deref;
use std::rc::Rc;

use crate::host::Axis;
use crate::host::HierarchyBinding;
use crate::host::HostRow;
use crate::host::MarkingOperation;
use crate::sort::SortKey;
use crate::text;

/// Optional hierarchy lookups of one data view.
///
/// Emptiness is read once per data view; every per-row lookup goes through these bindings so an
/// empty axis is never queried.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings {
    pub tooltip: HierarchyBinding,
    pub annotation: HierarchyBinding,
}

impl Bindings {
    pub fn none() -> Self {
        Self {
            tooltip: HierarchyBinding::empty(),
            annotation: HierarchyBinding::empty(),
        }
    }

    pub fn has_annotation(&self) -> bool {
        !self.annotation.is_empty
    }

    pub fn has_tooltip(&self) -> bool {
        !self.tooltip.is_empty
    }
}

/// A host row plus the ordinal it had in the host's base order.
#[derive(Clone, Debug)]
pub struct RowRecord<R> {
    row: R,
    ordinal: usize,
}

impl<R: HostRow> RowRecord<R> {
    pub fn new(row: R, ordinal: usize) -> Self {
        Self { row, ordinal }
    }

    pub fn row(&self) -> &R {
        &self.row
    }

    /// Position of the row before any sorting.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn content(&self) -> String {
        self.row.formatted_value(Axis::Content)
    }

    /// `None` when the content value is null; such rows produce no card.
    pub fn content_key(&self) -> Option<String> {
        self.row.categorical_key(Axis::Content)
    }

    pub fn has_content(&self) -> bool {
        self.content_key().is_some()
    }

    pub fn annotation(&self, bindings: &Bindings) -> Option<String> {
        if !bindings.has_annotation() {
            return None;
        }
        Some(self.row.formatted_value(Axis::Annotation))
    }

    /// Tooltip text for the tooltip hierarchy, one `level: value` line per level.
    pub fn tooltip(&self, bindings: &Bindings) -> Option<String> {
        if !bindings.has_tooltip() {
            return None;
        }
        Some(text::hierarchy_tooltip(
            &bindings.tooltip.levels,
            &self.row.path(Axis::Tooltip),
        ))
    }

    /// Tooltip text shown when hovering the annotation header.
    pub fn annotation_tooltip(&self, bindings: &Bindings) -> Option<String> {
        if !bindings.has_annotation() {
            return None;
        }
        Some(text::hierarchy_tooltip(
            &bindings.annotation.levels,
            &self.row.path(Axis::Annotation),
        ))
    }

    pub fn color(&self) -> String {
        self.row.color()
    }

    pub fn is_marked(&self) -> bool {
        self.row.is_marked()
    }

    pub fn mark(&self, operation: MarkingOperation) {
        self.row.mark(operation);
    }

    pub fn sort_key(&self, categorical: bool) -> SortKey {
        if categorical {
            SortKey::Ordinal(self.row.leaf_index(Axis::Sorting))
        } else {
            SortKey::Continuous(self.row.continuous_value(Axis::Sorting))
        }
    }
}

/// A mutable row sequence for one data view. Only the sort engine reorders it.
#[derive(Clone, Debug)]
pub struct RowSequence<R> {
    rows: Vec<RowRecord<R>>,
}

impl<R: HostRow> RowSequence<R> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> &[RowRecord<R>] {
        &self.rows
    }

    pub(crate) fn take(&mut self) -> Vec<RowRecord<R>> {
        std::mem::take(&mut self.rows)
    }

    pub(crate) fn replace(&mut self, rows: Vec<RowRecord<R>>) {
        self.rows = rows;
    }

    /// Ends the sorting phase; the returned rows can no longer be reordered.
    pub fn freeze(self) -> FrozenRows<R> {
        FrozenRows {
            rows: self.rows.into(),
        }
    }
}

/// The read-only row snapshot shared by the render and marking engines.
#[derive(Debug)]
pub struct FrozenRows<R> {
    rows: Rc<[RowRecord<R>]>,
}

impl<R> Clone for FrozenRows<R> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
        }
    }
}

impl<R> Deref for FrozenRows<R> {
    type Target = [RowRecord<R>];

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}

pub fn materialize<R: HostRow>(rows: Vec<R>) -> RowSequence<R> {
    RowSequence {
        rows: rows
            .into_iter()
            .enumerate()
            .map(|(ordinal, row)| RowRecord::new(row, ordinal))
            .collect(),
    }
}

/// Returns `true` when **no** row is marked, including for an empty slice.
///
/// Cards render at full opacity in this state; otherwise unmarked cards are dimmed.
pub fn all_marked<R: HostRow>(rows: &[RowRecord<R>]) -> bool {
    !rows.iter().any(RowRecord::is_marked)
}

/// Returns `true` when at least one row carries a non-null content value.
pub fn has_displayable_content<R: HostRow>(rows: &[RowRecord<R>]) -> bool {
    rows.iter().any(RowRecord::has_content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryRow;

    #[test]
    fn all_marked_is_vacuously_true() {
        let rows: RowSequence<MemoryRow> = materialize(Vec::new());
        assert!(all_marked(rows.records()));
    }

    #[test]
    fn all_marked_turns_false_on_first_marked_row() {
        let rows = materialize(vec![
            MemoryRow::new("a"),
            MemoryRow::new("b").marked(),
            MemoryRow::new("c"),
        ]);
        assert!(!all_marked(rows.records()));

        let rows = materialize(vec![MemoryRow::new("a"), MemoryRow::new("b")]);
        assert!(all_marked(rows.records()));
    }

    #[test]
    fn empty_bindings_skip_per_row_lookups() {
        let row = RowRecord::new(
            MemoryRow::new("text")
                .with_annotation(["Region", "North"])
                .with_tooltip(["x"]),
            0,
        );
        let bindings = Bindings::none();
        assert_eq!(row.annotation(&bindings), None);
        assert_eq!(row.tooltip(&bindings), None);

        let bindings = Bindings {
            tooltip: HierarchyBinding::with_levels(vec!["Id".into()]),
            annotation: HierarchyBinding::with_levels(vec!["Area".into(), "Region".into()]),
        };
        assert_eq!(row.annotation(&bindings).as_deref(), Some("Region » North"));
        assert_eq!(row.tooltip(&bindings).as_deref(), Some("Id: x"));
        assert_eq!(
            row.annotation_tooltip(&bindings).as_deref(),
            Some("Area: Region\nRegion: North")
        );
    }

    #[test]
    fn null_content_is_not_displayable() {
        let rows = materialize(vec![MemoryRow::null(), MemoryRow::null()]);
        assert!(!has_displayable_content(rows.records()));
        let rows = materialize(vec![MemoryRow::null(), MemoryRow::new("x")]);
        assert!(has_displayable_content(rows.records()));
    }

    #[test]
    fn frozen_rows_keep_sorted_order_and_ordinals() {
        let mut rows = materialize(vec![MemoryRow::new("a"), MemoryRow::new("b")]);
        let mut taken = rows.take();
        taken.reverse();
        rows.replace(taken);
        let frozen = rows.freeze();
        assert_eq!(frozen[0].content(), "b");
        assert_eq!(frozen[0].ordinal(), 1);
        assert_eq!(frozen.clone().len(), 2);
    }
}
