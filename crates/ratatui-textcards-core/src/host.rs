//! Capabilities consumed from the host analytics application.
//!
//! The host owns the data engine, the marking model, the theme and the overlays. This crate only
//! sees them through the traits below, so any host (or the in-memory doubles in
//! [`crate::testing`]) can drive the engines.

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::error::HostResult;
use crate::sort::SortOrder;

/// Expression the card-by axis carries when every row becomes its own card.
pub const ROW_ID_EXPRESSION: &str = "<baserowid()>";

/// Named axis roles recognised by the text card visualization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Content,
    Sorting,
    CardBy,
    Tooltip,
    Annotation,
}

impl Axis {
    /// Name of the axis as registered with the host.
    pub fn name(self) -> &'static str {
        match self {
            Axis::Content => "Content",
            Axis::Sorting => "Sorting",
            Axis::CardBy => "Card by",
            Axis::Tooltip => "Tooltip",
            Axis::Annotation => "Annotation",
        }
    }
}

/// Marking operations understood by the host marking model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkingOperation {
    /// Clear other marked rows, then mark these.
    Replace,
    /// Flip membership of these rows.
    ToggleOrAdd,
}

/// Runtime-typed value of a continuous axis.
#[derive(Clone, Debug, PartialEq)]
pub enum ContinuousValue {
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
    Bool(bool),
    Null,
}

/// A row handle into the host's data view.
///
/// Handles stay valid for the lifetime of one data view. `mark` mutates host-side state only,
/// which is why it takes `&self`.
pub trait HostRow {
    /// Key of the categorical value bound to `axis`, `None` when the value is null.
    fn categorical_key(&self, axis: Axis) -> Option<String>;

    /// Display string of the categorical value bound to `axis`.
    fn formatted_value(&self, axis: Axis) -> String;

    /// Formatted value of each hierarchy level bound to `axis`, root first.
    fn path(&self, axis: Axis) -> Vec<String>;

    /// Ordinal of the row's leaf in the host-defined categorical order of `axis`.
    fn leaf_index(&self, axis: Axis) -> usize;

    /// Value of the continuous expression bound to `axis`.
    fn continuous_value(&self, axis: Axis) -> ContinuousValue;

    /// Display color as a hex string (`#rrggbb`).
    fn color(&self) -> String;

    fn is_marked(&self) -> bool;

    fn mark(&self, operation: MarkingOperation);
}

/// Hierarchy lookup for an optional axis.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HierarchyBinding {
    pub is_empty: bool,
    /// Level names, root first.
    pub levels: Vec<String>,
}

impl HierarchyBinding {
    pub fn empty() -> Self {
        Self {
            is_empty: true,
            levels: Vec::new(),
        }
    }

    pub fn with_levels(levels: Vec<String>) -> Self {
        Self {
            is_empty: levels.is_empty(),
            levels,
        }
    }
}

/// A host-delivered, versioned snapshot of query results.
#[async_trait(?Send)]
pub trait DataView {
    type Row: HostRow;

    /// Errors the host attached to this data view.
    async fn errors(&self) -> HostResult<Vec<String>>;

    /// Every row of the view, `None` when the view expired during the fetch.
    async fn all_rows(&self) -> HostResult<Option<Vec<Self::Row>>>;

    async fn hierarchy(&self, axis: Axis) -> HostResult<HierarchyBinding>;

    async fn has_expired(&self) -> HostResult<bool>;

    /// Clears every mark in the host marking model.
    fn clear_marking(&self);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontStyling {
    pub color: String,
    pub size: u32,
    pub family: String,
    pub style: String,
    pub weight: String,
}

/// Theme values read from the host styling service.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostStyling {
    pub font: FontStyling,
    pub line_color: String,
    pub tick_color: String,
    pub background_color: String,
}

/// Controls and persisted properties exposed by the host.
pub trait ModHost {
    fn styling(&self) -> HostStyling;

    fn show_errors(&self, messages: &[String]);

    fn hide_errors(&self);

    fn show_tooltip(&self, text: &str);

    fn hide_tooltip(&self);

    /// Tells the host the visualization finished rendering (used for export).
    fn signal_render_complete(&self);

    fn set_sort_order(&self, order: SortOrder);

    fn set_use_custom_card_by(&self, value: bool);

    fn set_card_by_expression(&self, expression: &str);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Binding of columns to an axis role.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AxisBinding {
    pub expression: String,
    /// Column parts bound to the axis.
    pub parts: Vec<String>,
    pub is_categorical: bool,
}

impl AxisBinding {
    pub fn new(expression: impl Into<String>, parts: Vec<String>) -> Self {
        Self {
            expression: expression.into(),
            parts,
            is_categorical: true,
        }
    }

    pub fn continuous(mut self) -> Self {
        self.is_categorical = false;
        self
    }
}

/// Everything the host pushes to the visualization in one read cycle.
#[derive(Debug)]
pub struct Delivery<D> {
    pub data_view: D,
    pub window: WindowSize,
    pub content: AxisBinding,
    pub sorting: AxisBinding,
    pub sort_order: SortOrder,
    pub card_by: AxisBinding,
    pub use_custom_card_by: bool,
    pub tooltip: AxisBinding,
    pub annotation: AxisBinding,
}
