//! The text card controller.
//!
//! [`TextCards`] owns one visualization instance: its session state, the frozen row snapshot of
//! the last admitted data view and the cards rendered from it. The host drives it with
//! deliveries and scroll reports; the painter feeds it pointer and key gestures.
//!
//! Both async entry points take `&mut self`, so a delivery and an append can never interleave
//! on one instance. A superseded delivery is simply a future that was dropped.

use crate::gate;
use crate::gate::Admission;
use crate::gate::CardByWarning;
use crate::gate::ConfigIssue;
use crate::gate::WarningChoice;
use crate::host::DataView;
use crate::host::Delivery;
use crate::host::ModHost;
use crate::host::WindowSize;
use crate::input::KeyEvent;
use crate::marking;
use crate::marking::CardGeometry;
use crate::marking::GestureIntent;
use crate::marking::MarkOutcome;
use crate::marking::PendingGesture;
use crate::marking::PointerPress;
use crate::options::TextCardOptions;
use crate::paging;
use crate::paging::Card;
use crate::paging::PageContext;
use crate::paging::PageRequest;
use crate::row::Bindings;
use crate::row::FrozenRows;
use crate::selection::SelectionAction;
use crate::session::SessionState;
use crate::sort;
use crate::sort::SortOrder;
use crate::theme::CardStyle;
use crate::viewport::ScrollMetrics;

const TARGET: &str = "ratatui_textcards::controller";

/// What a delivery ended in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The card-by warning is shown in place.
    Warning,
    /// A configuration message is on the error overlay.
    ConfigurationError,
    /// The data view carried errors; previous cards are kept.
    DataErrors,
    /// The data view expired while rows were fetched; previous cards are kept.
    Expired,
    Rendered {
        cards: usize,
        has_content: bool,
    },
}

/// What a scroll report ended in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppendOutcome {
    NotAtBottom,
    /// No data view was admitted yet.
    NoData,
    /// The snapshot's data view expired; nothing was appended.
    Expired,
    /// Number of cards appended (zero once every row is rendered).
    Appended(usize),
}

/// Result of a key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Copy(String),
    /// Signed distance to scroll the container by.
    ScrollBy(i32),
}

/// Part of a card under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardRegion {
    /// Border, color bar or copy button.
    Frame,
    Content,
    Annotation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoverTarget {
    pub index: usize,
    pub region: CardRegion,
}

impl HoverTarget {
    pub fn new(index: usize, region: CardRegion) -> Self {
        Self { index, region }
    }
}

struct Snapshot<D: DataView> {
    data_view: D,
    rows: FrozenRows<D::Row>,
    bindings: Bindings,
    window: WindowSize,
}

/// One text card visualization bound to a host.
pub struct TextCards<D: DataView, H: ModHost> {
    host: H,
    options: TextCardOptions,
    session: SessionState,
    snapshot: Option<Snapshot<D>>,
    cards: Vec<Card>,
    style: CardStyle,
    warning: Option<CardByWarning>,
    container_height: u32,
    sort_toggle: Option<SortOrder>,
    pending: Option<PendingGesture>,
    hovered: Option<HoverTarget>,
    deliveries: u64,
}

impl<D: DataView, H: ModHost> TextCards<D, H> {
    pub fn new(host: H) -> Self {
        Self::with_options(host, TextCardOptions::default())
    }

    pub fn with_options(host: H, options: TextCardOptions) -> Self {
        Self {
            host,
            options,
            session: SessionState::new(),
            snapshot: None,
            cards: Vec::new(),
            style: CardStyle::default(),
            warning: None,
            container_height: 0,
            sort_toggle: None,
            pending: None,
            hovered: None,
            deliveries: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn options(&self) -> &TextCardOptions {
        &self.options
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Cards currently rendered, in display order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.iter().find(|card| card.index == index)
    }

    pub fn style(&self) -> &CardStyle {
        &self.style
    }

    pub fn warning(&self) -> Option<&CardByWarning> {
        self.warning.as_ref()
    }

    /// Current order shown on the sort toggle, `None` while sorting is disabled.
    pub fn sort_toggle(&self) -> Option<SortOrder> {
        self.sort_toggle
    }

    pub fn container_height(&self) -> u32 {
        self.container_height
    }

    /// Rows in the current snapshot, rendered or not.
    pub fn row_count(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.rows.len())
    }

    pub fn has_more(&self) -> bool {
        self.session.cursor < self.row_count()
    }

    pub fn hovered(&self) -> Option<HoverTarget> {
        self.hovered
    }

    /// Runs the gate on a new delivery and rebuilds the cards when it is admitted.
    pub async fn on_data_view(&mut self, delivery: Delivery<D>) -> DeliveryOutcome {
        self.deliveries += 1;
        let Delivery {
            data_view,
            window,
            content,
            sorting,
            sort_order,
            card_by,
            use_custom_card_by,
            tooltip,
            annotation,
        } = delivery;

        match gate::check_configuration(&content, &card_by, use_custom_card_by) {
            Ok(()) => self.warning = None,
            Err(ConfigIssue::CustomCardBy(warning)) => {
                tracing::debug!(target: TARGET, delivery = self.deliveries, expression = %warning.expression, "custom card by without consent");
                self.host.hide_errors();
                self.warning = Some(warning);
                return DeliveryOutcome::Warning;
            }
            Err(issue) => {
                tracing::debug!(target: TARGET, delivery = self.deliveries, ?issue, "configuration blocks rendering");
                self.warning = None;
                if let Some(message) = issue.overlay_message() {
                    self.host.show_errors(&[message.to_string()]);
                }
                return DeliveryOutcome::ConfigurationError;
            }
        }

        self.host.hide_errors();
        let admission = gate::admit(&data_view, &tooltip, &annotation).await;
        if let Admission::DataErrors(errors) = &admission {
            self.host.show_errors(errors);
            return DeliveryOutcome::DataErrors;
        }
        self.host.hide_errors();
        self.container_height = window
            .height
            .saturating_sub(self.options.container_inset);

        let Admission::Admitted {
            mut rows,
            bindings,
            has_content,
        } = admission
        else {
            tracing::debug!(target: TARGET, delivery = self.deliveries, "delivery expired; keeping previous cards");
            return DeliveryOutcome::Expired;
        };

        if !has_content {
            self.host.show_errors(&[gate::NO_CARDS_MESSAGE.to_string()]);
        }

        if sort::sorting_enabled(&sorting.expression) {
            sort::sort_rows(&mut rows, sort_order, sorting.is_categorical);
            self.sort_toggle = Some(sort_order);
        } else {
            self.sort_toggle = None;
        }
        let rows = rows.freeze();

        let styling = self.host.styling();
        let request = PageRequest::rebuild(self.session.cursor, self.options.page_size);
        let ctx = PageContext {
            window,
            bindings: &bindings,
            styling: &styling,
            options: &self.options,
        };
        let batch = paging::render_page(&rows, request, &ctx);

        self.session.cursor = batch.next_cursor;
        self.cards = batch.cards;
        self.style = batch.style;
        self.pending = None;
        if self.hovered.take().is_some() {
            self.host.hide_tooltip();
        }
        self.snapshot = Some(Snapshot {
            data_view,
            rows,
            bindings,
            window,
        });
        self.host.signal_render_complete();

        tracing::debug!(
            target: TARGET,
            delivery = self.deliveries,
            rows = self.row_count(),
            cards = self.cards.len(),
            cursor = self.session.cursor,
            "rebuilt cards"
        );
        DeliveryOutcome::Rendered {
            cards: self.cards.len(),
            has_content,
        }
    }

    /// Appends the next page once the container is scrolled to the bottom.
    pub async fn on_scroll(&mut self, metrics: ScrollMetrics) -> AppendOutcome {
        if !paging::is_scrolled_to_bottom(metrics, self.options.bottom_tolerance) {
            return AppendOutcome::NotAtBottom;
        }
        let Some(snapshot) = &self.snapshot else {
            return AppendOutcome::NoData;
        };

        let expired = match snapshot.data_view.has_expired().await {
            Ok(expired) => expired,
            Err(err) => {
                tracing::warn!(target: TARGET, %err, "expiry check failed; skipping append");
                true
            }
        };
        if expired {
            tracing::debug!(target: TARGET, cursor = self.session.cursor, "data view expired before append");
            return AppendOutcome::Expired;
        }

        let styling = self.host.styling();
        let request = PageRequest::append(self.session.cursor, self.options.page_size);
        let ctx = PageContext {
            window: snapshot.window,
            bindings: &snapshot.bindings,
            styling: &styling,
            options: &self.options,
        };
        let batch = paging::render_page(&snapshot.rows, request, &ctx);

        let appended = batch.cards.len();
        self.session.cursor = batch.next_cursor;
        self.style = batch.style;
        self.cards.extend(batch.cards);
        tracing::debug!(target: TARGET, appended, cursor = self.session.cursor, "appended cards");
        AppendOutcome::Appended(appended)
    }

    /// Starts a gesture on card `index`.
    ///
    /// The painter uses the returned gesture to decide whether the press drags the card's
    /// scrollbar and whether text selection is suppressed until the release.
    pub fn press_card(
        &mut self,
        index: usize,
        geometry: CardGeometry,
        pointer: PointerPress,
    ) -> PendingGesture {
        let gesture = marking::press(geometry, pointer, self.options.scroll_thumb_zone);
        tracing::trace!(target: TARGET, index, scrolling = gesture.scrolling, "card pressed");
        self.pending = Some(gesture);
        gesture
    }

    /// Completes the pending gesture on card `index` and issues its mark calls.
    ///
    /// Marking state changes reach the cards through the next delivery from the host.
    pub fn release_card(&mut self, index: usize, selected_text: &str) -> GestureIntent {
        let Some(gesture) = self.pending.take() else {
            return GestureIntent::Ignore;
        };
        let intent = gesture.release(index, self.session.mark_anchor, selected_text);
        self.dispatch(intent);
        intent
    }

    /// Handles a press on the container outside every card.
    pub fn press_background(&mut self, x: u32, container_width: u32) -> Option<GestureIntent> {
        self.pending = None;
        let intent = marking::background_press(x, container_width, self.options.scrollbar_strip)?;
        self.dispatch(intent);
        Some(intent)
    }

    fn dispatch(&mut self, intent: GestureIntent) -> MarkOutcome {
        let Some(snapshot) = &self.snapshot else {
            return MarkOutcome::Unchanged;
        };
        let outcome = marking::apply(&snapshot.rows, &mut self.session.mark_anchor, intent);
        if outcome == MarkOutcome::ClearRequested {
            snapshot.data_view.clear_marking();
        }
        tracing::debug!(target: TARGET, ?intent, ?outcome, anchor = self.session.mark_anchor, "gesture applied");
        outcome
    }

    pub fn on_key(&self, key: &KeyEvent, selected_text: &str) -> KeyAction {
        if let SelectionAction::CopyRequested(text) =
            self.options.selection.action_for(key, selected_text)
        {
            return KeyAction::Copy(text);
        }
        match self.options.scroll.action_for(key) {
            Some(action) => KeyAction::ScrollBy(self.options.scroll.delta(action)),
            None => KeyAction::None,
        }
    }

    /// Copy button of card `index`: requests its full content.
    pub fn copy_card(&self, index: usize) -> SelectionAction {
        match self.card(index) {
            Some(card) => SelectionAction::CopyRequested(card.content.clone()),
            None => SelectionAction::None,
        }
    }

    /// Moves the hover to `target` and shows or hides the host tooltip.
    pub fn hover(&mut self, target: Option<HoverTarget>) {
        if self.hovered == target {
            return;
        }
        self.hovered = target;
        match target.and_then(|t| self.tooltip_for(t)) {
            Some(text) => self.host.show_tooltip(&text),
            None => self.host.hide_tooltip(),
        }
    }

    fn tooltip_for(&self, target: HoverTarget) -> Option<String> {
        let snapshot = self.snapshot.as_ref()?;
        let row = snapshot.rows.get(target.index)?;
        match target.region {
            CardRegion::Frame => None,
            CardRegion::Content => row.tooltip(&snapshot.bindings),
            CardRegion::Annotation => row.annotation_tooltip(&snapshot.bindings),
        }
    }

    /// Resolves the card-by warning. Returns `false` when no warning is shown.
    pub fn resolve_warning(&mut self, choice: WarningChoice) -> bool {
        if self.warning.take().is_none() {
            return false;
        }
        tracing::debug!(target: TARGET, ?choice, "card by warning resolved");
        choice.apply(&self.host);
        true
    }

    /// Writes the opposite sort order to the host property.
    ///
    /// The host re-delivers with the new order; until then the toggle shows the requested order.
    pub fn toggle_sort_order(&mut self) -> Option<SortOrder> {
        let next = self.sort_toggle?.toggled();
        self.host.set_sort_order(next);
        self.sort_toggle = Some(next);
        Some(next)
    }
}
