//! Validation of each incoming data view before anything is rendered.
//!
//! The checks run in a fixed order so exactly one message is visible at a time: configuration
//! problems pre-empt data errors, which pre-empt emptiness.

use crate::error::HostError;
use crate::host::Axis;
use crate::host::AxisBinding;
use crate::host::DataView;
use crate::host::HierarchyBinding;
use crate::host::ModHost;
use crate::host::ROW_ID_EXPRESSION;
use crate::row::Bindings;
use crate::row::RowSequence;
use crate::row::has_displayable_content;
use crate::row::materialize;

pub const MISSING_CONTENT_MESSAGE: &str = "Select the 'Content' of the text cards to get started!";
pub const MULTIPLE_CONTENT_MESSAGE: &str =
    "Selecting multiple columns in 'Content' is not supported.";
pub const NO_CARDS_MESSAGE: &str = "No available text cards.";

/// In-place warning shown while the card-by axis is customised without consent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardByWarning {
    pub expression: String,
}

impl CardByWarning {
    pub fn message(&self) -> String {
        format!(
            "'Card by' is set to '{}'. Text cards expect one card per row; \
             reset 'Card by' to the row id or keep the custom expression.",
            self.expression
        )
    }
}

/// How the user resolves a [`CardByWarning`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarningChoice {
    /// Put the card-by axis back on the row id.
    UseRowId,
    /// Persist the custom card-by expression.
    KeepCustom,
}

impl WarningChoice {
    pub fn apply<H: ModHost>(self, host: &H) {
        match self {
            WarningChoice::UseRowId => host.set_card_by_expression(ROW_ID_EXPRESSION),
            WarningChoice::KeepCustom => host.set_use_custom_card_by(true),
        }
    }
}

/// A binding problem that blocks rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigIssue {
    /// Shown in place, not on the error overlay.
    CustomCardBy(CardByWarning),
    MissingContent,
    MultipleContent(usize),
}

impl ConfigIssue {
    /// Overlay message for issues shown on the host's error overlay.
    pub fn overlay_message(&self) -> Option<&'static str> {
        match self {
            ConfigIssue::CustomCardBy(_) => None,
            ConfigIssue::MissingContent => Some(MISSING_CONTENT_MESSAGE),
            ConfigIssue::MultipleContent(_) => Some(MULTIPLE_CONTENT_MESSAGE),
        }
    }
}

/// Checks the axis bindings. The card-by check comes first.
pub fn check_configuration(
    content: &AxisBinding,
    card_by: &AxisBinding,
    use_custom_card_by: bool,
) -> Result<(), ConfigIssue> {
    if card_by.expression != ROW_ID_EXPRESSION && !use_custom_card_by {
        return Err(ConfigIssue::CustomCardBy(CardByWarning {
            expression: card_by.expression.clone(),
        }));
    }
    match content.parts.len() {
        0 => Err(ConfigIssue::MissingContent),
        1 => Ok(()),
        n => Err(ConfigIssue::MultipleContent(n)),
    }
}

/// Data-dependent result of the gate.
#[derive(Debug)]
pub enum Admission<R> {
    /// The host reported errors for the view.
    DataErrors(Vec<String>),
    /// The view expired while rows were fetched.
    Expired,
    Admitted {
        rows: RowSequence<R>,
        bindings: Bindings,
        /// `false` when every row has a null content value.
        has_content: bool,
    },
}

/// Runs the data checks of the gate: host errors, row fetch, emptiness.
///
/// Hierarchies are only looked up for axes with columns bound in `tooltip` and `annotation`.
/// Host failures never propagate. A failed error query is reported as a data error, a failed row
/// fetch is treated like expiry and a failed hierarchy lookup disables that hierarchy.
pub async fn admit<D: DataView>(
    data_view: &D,
    tooltip: &AxisBinding,
    annotation: &AxisBinding,
) -> Admission<D::Row> {
    match data_view.errors().await {
        Ok(errors) if !errors.is_empty() => {
            tracing::debug!(target: "ratatui_textcards::gate", count = errors.len(), "data view has errors");
            return Admission::DataErrors(errors);
        }
        Ok(_) => {}
        Err(err) => {
            tracing::warn!(target: "ratatui_textcards::gate", %err, "error query failed");
            return Admission::DataErrors(vec![err.to_string()]);
        }
    }

    let rows = match data_view.all_rows().await {
        Ok(Some(rows)) => rows,
        Ok(None) => {
            tracing::debug!(target: "ratatui_textcards::gate", "data view expired during row fetch");
            return Admission::Expired;
        }
        Err(err) => {
            tracing::warn!(target: "ratatui_textcards::gate", %err, "row fetch failed");
            return Admission::Expired;
        }
    };

    let bindings = Bindings {
        tooltip: hierarchy_or_empty(data_view, Axis::Tooltip, tooltip).await,
        annotation: hierarchy_or_empty(data_view, Axis::Annotation, annotation).await,
    };

    let rows = materialize(rows);
    let has_content = has_displayable_content(rows.records());
    Admission::Admitted {
        rows,
        bindings,
        has_content,
    }
}

async fn hierarchy_or_empty<D: DataView>(
    data_view: &D,
    axis: Axis,
    binding: &AxisBinding,
) -> HierarchyBinding {
    if binding.parts.is_empty() {
        return HierarchyBinding::empty();
    }
    match data_view.hierarchy(axis).await {
        Ok(binding) => binding,
        Err(HostError::UnknownAxis(name)) => {
            tracing::debug!(target: "ratatui_textcards::gate", axis = %name, "axis not bound");
            HierarchyBinding::empty()
        }
        Err(err) => {
            tracing::warn!(target: "ratatui_textcards::gate", axis = axis.name(), %err, "hierarchy lookup failed");
            HierarchyBinding::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryDataView;
    use crate::testing::MemoryRow;

    fn content(parts: usize) -> AxisBinding {
        AxisBinding::new(
            "<[Text]>",
            (0..parts).map(|i| format!("Column {i}")).collect(),
        )
    }

    fn row_id() -> AxisBinding {
        AxisBinding::new(ROW_ID_EXPRESSION, vec!["row id".into()])
    }

    fn unbound() -> AxisBinding {
        AxisBinding::default()
    }

    fn bound(column: &str) -> AxisBinding {
        AxisBinding::new(format!("<[{column}]>"), vec![column.to_string()])
    }

    #[test]
    fn card_by_warning_pre_empts_content_checks() {
        let custom = AxisBinding::new("<[Category]>", vec!["Category".into()]);
        let issue = check_configuration(&content(0), &custom, false).unwrap_err();
        assert!(matches!(issue, ConfigIssue::CustomCardBy(ref w) if w.expression == "<[Category]>"));
        assert_eq!(issue.overlay_message(), None);

        assert_eq!(
            check_configuration(&content(0), &custom, true),
            Err(ConfigIssue::MissingContent)
        );
    }

    #[test]
    fn content_needs_exactly_one_column() {
        assert_eq!(
            check_configuration(&content(0), &row_id(), false),
            Err(ConfigIssue::MissingContent)
        );
        assert_eq!(
            check_configuration(&content(2), &row_id(), false),
            Err(ConfigIssue::MultipleContent(2))
        );
        assert_eq!(check_configuration(&content(1), &row_id(), false), Ok(()));
        assert_eq!(
            ConfigIssue::MultipleContent(3).overlay_message(),
            Some(MULTIPLE_CONTENT_MESSAGE)
        );
    }

    #[tokio::test]
    async fn data_errors_pre_empt_rows() {
        let view = MemoryDataView::new(vec![MemoryRow::new("a")]).with_errors(["bad column"]);
        assert!(matches!(
            admit(&view, &unbound(), &unbound()).await,
            Admission::DataErrors(errors) if errors == ["bad column"]
        ));
    }

    #[tokio::test]
    async fn expired_fetch_is_silent() {
        let view = MemoryDataView::new(vec![MemoryRow::new("a")]).expire_on_fetch();
        assert!(matches!(admit(&view, &unbound(), &unbound()).await, Admission::Expired));
    }

    #[tokio::test]
    async fn failed_queries_are_downgraded() {
        let view = MemoryDataView::new(vec![MemoryRow::new("a")])
            .fail_errors_query(HostError::Query("timeout".into()));
        assert!(matches!(
            admit(&view, &unbound(), &unbound()).await,
            Admission::DataErrors(errors) if errors == ["host query failed: timeout"]
        ));

        let view = MemoryDataView::new(vec![MemoryRow::new("a")])
            .fail_row_fetch(HostError::Query("gone".into()));
        assert!(matches!(admit(&view, &unbound(), &unbound()).await, Admission::Expired));
    }

    #[tokio::test]
    async fn admits_rows_and_reports_missing_content() {
        let view = MemoryDataView::new(vec![MemoryRow::null(), MemoryRow::null()])
            .with_annotation_levels(["Region"]);
        match admit(&view, &unbound(), &bound("Region")).await {
            Admission::Admitted {
                rows,
                bindings,
                has_content,
            } => {
                assert_eq!(rows.len(), 2);
                assert!(!has_content);
                assert!(bindings.has_annotation());
                assert!(!bindings.has_tooltip());
            }
            other => panic!("unexpected admission: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unbound_axes_skip_the_hierarchy_lookup() {
        let view = MemoryDataView::new(vec![MemoryRow::new("a")])
            .with_tooltip_levels(["Id"])
            .with_annotation_levels(["Region"]);
        match admit(&view, &unbound(), &unbound()).await {
            Admission::Admitted { bindings, .. } => {
                assert!(!bindings.has_tooltip());
                assert!(!bindings.has_annotation());
            }
            other => panic!("unexpected admission: {other:?}"),
        }
        match admit(&view, &bound("Id"), &unbound()).await {
            Admission::Admitted { bindings, .. } => {
                assert!(bindings.has_tooltip());
                assert!(!bindings.has_annotation());
            }
            other => panic!("unexpected admission: {other:?}"),
        }
    }
}
