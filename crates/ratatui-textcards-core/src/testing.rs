//! In-memory host doubles.
//!
//! [`MemoryRow`], [`MemoryDataView`] and [`RecordingHost`] implement the host capabilities
//! without a real analytics application. They back the unit tests, the integration scenarios
//! and the demo. Clones of a row share its marking state, just like two handles to the same
//! host row would.

use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::error::HostError;
use crate::error::HostResult;
use crate::host::Axis;
use crate::host::AxisBinding;
use crate::host::ContinuousValue;
use crate::host::DataView;
use crate::host::Delivery;
use crate::host::FontStyling;
use crate::host::HierarchyBinding;
use crate::host::HostRow;
use crate::host::HostStyling;
use crate::host::MarkingOperation;
use crate::host::ModHost;
use crate::host::ROW_ID_EXPRESSION;
use crate::host::WindowSize;
use crate::sort::SortOrder;
use crate::text;

#[derive(Debug, Default)]
struct MarkState {
    marked: Cell<bool>,
    calls: RefCell<Vec<MarkingOperation>>,
}

/// A host row held in memory.
///
/// `Replace` only marks this row; the double does not unmark the rest of the view.
#[derive(Clone, Debug)]
pub struct MemoryRow {
    content: Option<String>,
    annotation: Vec<String>,
    tooltip: Vec<String>,
    leaf_index: usize,
    sort_value: ContinuousValue,
    color: String,
    state: Rc<MarkState>,
}

impl MemoryRow {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            annotation: Vec::new(),
            tooltip: Vec::new(),
            leaf_index: 0,
            sort_value: ContinuousValue::Null,
            color: "#4c78a8".to_string(),
            state: Rc::default(),
        }
    }

    /// A row whose content value is null.
    pub fn null() -> Self {
        Self {
            content: None,
            ..Self::new("")
        }
    }

    pub fn marked(self) -> Self {
        self.state.marked.set(true);
        self
    }

    pub fn with_annotation<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.annotation = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tooltip<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tooltip = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_leaf_index(mut self, leaf_index: usize) -> Self {
        self.leaf_index = leaf_index;
        self
    }

    pub fn with_number(mut self, value: f64) -> Self {
        self.sort_value = ContinuousValue::Number(value);
        self
    }

    pub fn with_date(mut self, value: DateTime<Utc>) -> Self {
        self.sort_value = ContinuousValue::Date(value);
        self
    }

    pub fn with_text(mut self, value: impl Into<String>) -> Self {
        self.sort_value = ContinuousValue::Text(value.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Number of `mark` calls this row received.
    pub fn mark_calls(&self) -> usize {
        self.state.calls.borrow().len()
    }

    pub fn last_operation(&self) -> Option<MarkingOperation> {
        self.state.calls.borrow().last().copied()
    }

    fn unmark(&self) {
        self.state.marked.set(false);
    }
}

impl HostRow for MemoryRow {
    fn categorical_key(&self, axis: Axis) -> Option<String> {
        match axis {
            Axis::Content => self.content.clone(),
            Axis::Annotation => self.annotation.first().cloned(),
            Axis::Tooltip => self.tooltip.first().cloned(),
            Axis::Sorting | Axis::CardBy => None,
        }
    }

    fn formatted_value(&self, axis: Axis) -> String {
        match axis {
            Axis::Content => self
                .content
                .clone()
                .unwrap_or_else(|| "(Empty)".to_string()),
            Axis::Annotation => text::join_path(&self.annotation),
            Axis::Tooltip => text::join_path(&self.tooltip),
            Axis::Sorting => match &self.sort_value {
                ContinuousValue::Number(n) => n.to_string(),
                ContinuousValue::Date(d) => d.to_rfc3339(),
                ContinuousValue::Text(s) => s.clone(),
                ContinuousValue::Bool(b) => b.to_string(),
                ContinuousValue::Null => String::new(),
            },
            Axis::CardBy => String::new(),
        }
    }

    fn path(&self, axis: Axis) -> Vec<String> {
        match axis {
            Axis::Annotation => self.annotation.clone(),
            Axis::Tooltip => self.tooltip.clone(),
            _ => vec![self.formatted_value(axis)],
        }
    }

    fn leaf_index(&self, _axis: Axis) -> usize {
        self.leaf_index
    }

    fn continuous_value(&self, _axis: Axis) -> ContinuousValue {
        self.sort_value.clone()
    }

    fn color(&self) -> String {
        self.color.clone()
    }

    fn is_marked(&self) -> bool {
        self.state.marked.get()
    }

    fn mark(&self, operation: MarkingOperation) {
        match operation {
            MarkingOperation::Replace => self.state.marked.set(true),
            MarkingOperation::ToggleOrAdd => self.state.marked.set(!self.state.marked.get()),
        }
        self.state.calls.borrow_mut().push(operation);
    }
}

/// Lets a test expire a data view after it was handed to the controller.
#[derive(Clone, Debug, Default)]
pub struct ExpiryHandle(Rc<Cell<bool>>);

impl ExpiryHandle {
    pub fn expire(&self) {
        self.0.set(true);
    }
}

/// A data view over [`MemoryRow`]s with scriptable failures.
#[derive(Clone, Debug, Default)]
pub struct MemoryDataView {
    rows: Vec<MemoryRow>,
    errors: Vec<String>,
    errors_failure: Option<HostError>,
    rows_failure: Option<HostError>,
    expire_on_fetch: bool,
    expired: Rc<Cell<bool>>,
    tooltip_levels: Vec<String>,
    annotation_levels: Vec<String>,
    clear_calls: Rc<Cell<usize>>,
}

impl MemoryDataView {
    pub fn new(rows: Vec<MemoryRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn with_errors<I, S>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.errors = errors.into_iter().map(Into::into).collect();
        self
    }

    /// `all_rows` reports the view as expired.
    pub fn expire_on_fetch(mut self) -> Self {
        self.expire_on_fetch = true;
        self
    }

    pub fn fail_errors_query(mut self, err: HostError) -> Self {
        self.errors_failure = Some(err);
        self
    }

    pub fn fail_row_fetch(mut self, err: HostError) -> Self {
        self.rows_failure = Some(err);
        self
    }

    pub fn with_tooltip_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tooltip_levels = levels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_annotation_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.annotation_levels = levels.into_iter().map(Into::into).collect();
        self
    }

    pub fn expiry_handle(&self) -> ExpiryHandle {
        ExpiryHandle(self.expired.clone())
    }

    /// Handles to the rows; they share marking state with the view.
    pub fn rows(&self) -> &[MemoryRow] {
        &self.rows
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_calls.get()
    }

    /// Shared counter of `clear_marking` calls, readable after the view was moved.
    pub fn clear_counter(&self) -> Rc<Cell<usize>> {
        self.clear_calls.clone()
    }
}

#[async_trait(?Send)]
impl DataView for MemoryDataView {
    type Row = MemoryRow;

    async fn errors(&self) -> HostResult<Vec<String>> {
        match &self.errors_failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.errors.clone()),
        }
    }

    async fn all_rows(&self) -> HostResult<Option<Vec<MemoryRow>>> {
        if let Some(err) = &self.rows_failure {
            return Err(err.clone());
        }
        if self.expire_on_fetch || self.expired.get() {
            return Ok(None);
        }
        Ok(Some(self.rows.clone()))
    }

    async fn hierarchy(&self, axis: Axis) -> HostResult<HierarchyBinding> {
        match axis {
            Axis::Tooltip => Ok(HierarchyBinding::with_levels(self.tooltip_levels.clone())),
            Axis::Annotation => Ok(HierarchyBinding::with_levels(
                self.annotation_levels.clone(),
            )),
            other => Err(HostError::UnknownAxis(other.name().to_string())),
        }
    }

    async fn has_expired(&self) -> HostResult<bool> {
        Ok(self.expired.get())
    }

    fn clear_marking(&self) {
        self.clear_calls.set(self.clear_calls.get() + 1);
        for row in &self.rows {
            row.unmark();
        }
    }
}

/// A call made by the controller into the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCall {
    ShowErrors(Vec<String>),
    HideErrors,
    ShowTooltip(String),
    HideTooltip,
    RenderComplete,
    SetSortOrder(SortOrder),
    SetUseCustomCardBy(bool),
    SetCardByExpression(String),
}

/// A [`ModHost`] that records every call.
#[derive(Clone, Debug)]
pub struct RecordingHost {
    calls: Rc<RefCell<Vec<HostCall>>>,
    styling: HostStyling,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            calls: Rc::default(),
            styling: HostStyling {
                font: FontStyling {
                    color: "#3a3a3a".to_string(),
                    size: 12,
                    family: "sans-serif".to_string(),
                    style: "normal".to_string(),
                    weight: "normal".to_string(),
                },
                line_color: "#d4d4d4".to_string(),
                tick_color: "#8a8a8a".to_string(),
                background_color: "#ffffff".to_string(),
            },
        }
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<HostCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    /// Messages currently on the error overlay, following show/hide calls.
    pub fn visible_errors(&self) -> Option<Vec<String>> {
        let mut visible = None;
        for call in self.calls.borrow().iter() {
            match call {
                HostCall::ShowErrors(messages) => visible = Some(messages.clone()),
                HostCall::HideErrors => visible = None,
                _ => {}
            }
        }
        visible
    }

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl ModHost for RecordingHost {
    fn styling(&self) -> HostStyling {
        self.styling.clone()
    }

    fn show_errors(&self, messages: &[String]) {
        self.record(HostCall::ShowErrors(messages.to_vec()));
    }

    fn hide_errors(&self) {
        self.record(HostCall::HideErrors);
    }

    fn show_tooltip(&self, text: &str) {
        self.record(HostCall::ShowTooltip(text.to_string()));
    }

    fn hide_tooltip(&self) {
        self.record(HostCall::HideTooltip);
    }

    fn signal_render_complete(&self) {
        self.record(HostCall::RenderComplete);
    }

    fn set_sort_order(&self, order: SortOrder) {
        self.record(HostCall::SetSortOrder(order));
    }

    fn set_use_custom_card_by(&self, value: bool) {
        self.record(HostCall::SetUseCustomCardBy(value));
    }

    fn set_card_by_expression(&self, expression: &str) {
        self.record(HostCall::SetCardByExpression(expression.to_string()));
    }
}

/// A delivery with a valid configuration: one content column, cards by row id, no sorting.
pub fn delivery<D>(data_view: D, window: WindowSize) -> Delivery<D> {
    Delivery {
        data_view,
        window,
        content: AxisBinding::new("<[Text]>", vec!["Text".to_string()]),
        sorting: AxisBinding::new("", Vec::new()),
        sort_order: SortOrder::Ascending,
        card_by: AxisBinding::new(ROW_ID_EXPRESSION, vec!["row id".to_string()]),
        use_custom_card_by: false,
        tooltip: AxisBinding::default(),
        annotation: AxisBinding::default(),
    }
}

/// `count` rows with content `card 0`, `card 1`, ...
pub fn numbered_rows(count: usize) -> Vec<MemoryRow> {
    (0..count)
        .map(|i| MemoryRow::new(format!("card {i}")).with_number(i as f64))
        .collect()
}
