//! End-to-end runs of the controller against the in-memory host.

use ratatui_textcards::controller::AppendOutcome;
use ratatui_textcards::controller::DeliveryOutcome;
use ratatui_textcards::controller::TextCards;
use ratatui_textcards::gate::MULTIPLE_CONTENT_MESSAGE;
use ratatui_textcards::gate::NO_CARDS_MESSAGE;
use ratatui_textcards::host::AxisBinding;
use ratatui_textcards::host::HostRow;
use ratatui_textcards::host::MarkingOperation;
use ratatui_textcards::host::WindowSize;
use ratatui_textcards::input::KeyModifiers;
use ratatui_textcards::input::MouseButton;
use ratatui_textcards::marking::CardGeometry;
use ratatui_textcards::marking::GestureIntent;
use ratatui_textcards::marking::PointerPress;
use ratatui_textcards::options::TextCardOptions;
use ratatui_textcards::paging::CardEmphasis;
use ratatui_textcards::sort::SortOrder;
use ratatui_textcards::viewport::ScrollMetrics;
use ratatui_textcards_core::testing::HostCall;
use ratatui_textcards_core::testing::MemoryDataView;
use ratatui_textcards_core::testing::MemoryRow;
use ratatui_textcards_core::testing::RecordingHost;
use ratatui_textcards_core::testing::delivery;
use ratatui_textcards_core::testing::numbered_rows;

type Cards = TextCards<MemoryDataView, RecordingHost>;

const WINDOW: WindowSize = WindowSize {
    width: 800,
    height: 600,
};

const AT_BOTTOM: ScrollMetrics = ScrollMetrics {
    scroll_height: 1000,
    scroll_top: 900,
    client_height: 100,
};

const GEOMETRY: CardGeometry = CardGeometry {
    right: 400,
    height: 40,
    max_height: 300,
};

fn contents(cards: &Cards) -> Vec<String> {
    cards.cards().iter().map(|c| c.content.clone()).collect()
}

fn click(cards: &mut Cards, index: usize, modifiers: KeyModifiers) -> GestureIntent {
    let pointer = PointerPress::new(10, MouseButton::Left, modifiers);
    cards.press_card(index, GEOMETRY, pointer);
    cards.release_card(index, "")
}

#[tokio::test]
async fn pages_through_every_row_then_stops() {
    let mut cards = Cards::new(RecordingHost::new());
    let outcome = cards
        .on_data_view(delivery(MemoryDataView::new(numbered_rows(250)), WINDOW))
        .await;
    assert_eq!(
        outcome,
        DeliveryOutcome::Rendered {
            cards: 100,
            has_content: true
        }
    );
    assert!(cards.has_more());

    assert_eq!(cards.on_scroll(AT_BOTTOM).await, AppendOutcome::Appended(100));
    assert_eq!(cards.on_scroll(AT_BOTTOM).await, AppendOutcome::Appended(50));
    assert!(!cards.has_more());
    assert_eq!(cards.on_scroll(AT_BOTTOM).await, AppendOutcome::Appended(0));

    let expected: Vec<String> = (0..250).map(|i| format!("card {i}")).collect();
    assert_eq!(contents(&cards), expected);
}

#[tokio::test]
async fn custom_page_size_drives_every_batch() {
    let options = TextCardOptions::default().with_page_size(40);
    let mut cards = Cards::with_options(RecordingHost::new(), options);
    cards
        .on_data_view(delivery(MemoryDataView::new(numbered_rows(100)), WINDOW))
        .await;
    assert_eq!(cards.cards().len(), 40);
    assert_eq!(cards.on_scroll(AT_BOTTOM).await, AppendOutcome::Appended(40));
    assert_eq!(cards.on_scroll(AT_BOTTOM).await, AppendOutcome::Appended(20));
    assert!(!cards.has_more());
}

#[tokio::test]
async fn scrolling_short_of_the_bottom_renders_nothing() {
    let mut cards = Cards::new(RecordingHost::new());
    cards
        .on_data_view(delivery(MemoryDataView::new(numbered_rows(250)), WINDOW))
        .await;
    let metrics = ScrollMetrics {
        scroll_top: 500,
        ..AT_BOTTOM
    };
    assert_eq!(cards.on_scroll(metrics).await, AppendOutcome::NotAtBottom);
    assert_eq!(cards.cards().len(), 100);
}

#[tokio::test]
async fn redelivery_keeps_the_rows_already_scrolled_into_view() {
    let view = MemoryDataView::new(numbered_rows(250));
    let mut cards = Cards::new(RecordingHost::new());
    cards.on_data_view(delivery(view.clone(), WINDOW)).await;
    cards.on_scroll(AT_BOTTOM).await;
    assert_eq!(cards.session().cursor, 200);

    cards.on_data_view(delivery(view, WINDOW)).await;
    assert_eq!(cards.cards().len(), 200);
    assert_eq!(cards.session().cursor, 200);
    assert_eq!(cards.cards()[199].content, "card 199");
}

#[tokio::test]
async fn expired_view_blocks_append_until_the_next_delivery() {
    let view = MemoryDataView::new(numbered_rows(250));
    let expiry = view.expiry_handle();
    let mut cards = Cards::new(RecordingHost::new());
    cards.on_data_view(delivery(view, WINDOW)).await;

    expiry.expire();
    assert_eq!(cards.on_scroll(AT_BOTTOM).await, AppendOutcome::Expired);
    assert_eq!(cards.cards().len(), 100);
    assert_eq!(cards.session().cursor, 100);

    let fresh = MemoryDataView::new(numbered_rows(250));
    cards.on_data_view(delivery(fresh, WINDOW)).await;
    assert_eq!(cards.on_scroll(AT_BOTTOM).await, AppendOutcome::Appended(100));
}

#[tokio::test]
async fn view_expiring_during_fetch_keeps_previous_cards() {
    let mut cards = Cards::new(RecordingHost::new());
    cards
        .on_data_view(delivery(MemoryDataView::new(numbered_rows(3)), WINDOW))
        .await;

    let stale = MemoryDataView::new(numbered_rows(10)).expire_on_fetch();
    assert_eq!(
        cards.on_data_view(delivery(stale, WINDOW)).await,
        DeliveryOutcome::Expired
    );
    assert_eq!(cards.cards().len(), 3);
}

#[tokio::test]
async fn card_by_warning_takes_precedence_over_content_errors() {
    let host = RecordingHost::new();
    let mut cards = Cards::new(host.clone());
    let mut d = delivery(MemoryDataView::new(numbered_rows(3)), WINDOW);
    d.card_by = AxisBinding::new("<[Category]>", vec!["Category".to_string()]);
    d.content = AxisBinding::new(
        "<[A] NEST [B]>",
        vec!["A".to_string(), "B".to_string()],
    );
    assert_eq!(cards.on_data_view(d).await, DeliveryOutcome::Warning);
    assert!(cards.warning().is_some());
    assert_eq!(host.visible_errors(), None);

    let mut d = delivery(MemoryDataView::new(numbered_rows(3)), WINDOW);
    d.content = AxisBinding::new(
        "<[A] NEST [B]>",
        vec!["A".to_string(), "B".to_string()],
    );
    assert_eq!(
        cards.on_data_view(d).await,
        DeliveryOutcome::ConfigurationError
    );
    assert!(cards.warning().is_none());
    assert_eq!(
        host.visible_errors(),
        Some(vec![MULTIPLE_CONTENT_MESSAGE.to_string()])
    );
}

#[tokio::test]
async fn data_errors_are_shown_and_cleared_by_a_clean_delivery() {
    let host = RecordingHost::new();
    let mut cards = Cards::new(host.clone());
    let broken = MemoryDataView::new(numbered_rows(3)).with_errors(["column missing"]);
    assert_eq!(
        cards.on_data_view(delivery(broken, WINDOW)).await,
        DeliveryOutcome::DataErrors
    );
    assert_eq!(host.visible_errors(), Some(vec!["column missing".to_string()]));

    cards
        .on_data_view(delivery(MemoryDataView::new(numbered_rows(3)), WINDOW))
        .await;
    assert_eq!(host.visible_errors(), None);
    assert_eq!(host.calls().last(), Some(&HostCall::RenderComplete));
}

#[tokio::test]
async fn all_null_content_shows_the_empty_message() {
    let host = RecordingHost::new();
    let mut cards = Cards::new(host.clone());
    let view = MemoryDataView::new(vec![MemoryRow::null(), MemoryRow::null()]);
    assert_eq!(
        cards.on_data_view(delivery(view, WINDOW)).await,
        DeliveryOutcome::Rendered {
            cards: 0,
            has_content: false
        }
    );
    assert_eq!(
        host.visible_errors(),
        Some(vec![NO_CARDS_MESSAGE.to_string()])
    );
}

#[tokio::test]
async fn click_then_shift_click_marks_an_inclusive_range() {
    let view = MemoryDataView::new(numbered_rows(10));
    let rows = view.rows().to_vec();
    let mut cards = Cards::new(RecordingHost::new());
    cards.on_data_view(delivery(view.clone(), WINDOW)).await;

    assert_eq!(
        click(&mut cards, 5, KeyModifiers::none()),
        GestureIntent::MarkSingle {
            index: 5,
            operation: MarkingOperation::Replace
        }
    );
    assert_eq!(
        click(&mut cards, 2, KeyModifiers::shift()),
        GestureIntent::MarkRange {
            start: 2,
            end: 5,
            operation: MarkingOperation::Replace
        }
    );
    let marked: Vec<usize> = (0..10).filter(|&i| rows[i].is_marked()).collect();
    assert_eq!(marked, vec![2, 3, 4, 5]);

    // Marks show up once the host re-delivers.
    cards.on_data_view(delivery(view, WINDOW)).await;
    assert_eq!(cards.cards()[3].emphasis, CardEmphasis::Marked);
    assert_eq!(cards.cards()[7].emphasis, CardEmphasis::Dimmed);
}

#[tokio::test]
async fn ctrl_click_toggles_and_background_clears() {
    let view = MemoryDataView::new(numbered_rows(4));
    let rows = view.rows().to_vec();
    let mut cards = Cards::new(RecordingHost::new());
    cards.on_data_view(delivery(view.clone(), WINDOW)).await;

    click(&mut cards, 1, KeyModifiers::ctrl());
    click(&mut cards, 3, KeyModifiers::ctrl());
    assert!(rows[1].is_marked() && rows[3].is_marked());
    click(&mut cards, 1, KeyModifiers::ctrl());
    assert!(!rows[1].is_marked());
    assert_eq!(rows[1].last_operation(), Some(MarkingOperation::ToggleOrAdd));

    assert_eq!(
        cards.press_background(20, 400),
        Some(GestureIntent::ClearAll)
    );
    assert_eq!(view.clear_calls(), 1);
    assert!(rows.iter().all(|r| !r.is_marked()));
}

#[tokio::test]
async fn sorted_delivery_is_stable_and_toggles_through_the_host() {
    let host = RecordingHost::new();
    let mut cards = Cards::new(host.clone());
    let rows = vec![
        MemoryRow::new("a").with_number(3.0),
        MemoryRow::new("b").with_number(1.0),
        MemoryRow::new("c").with_number(2.0),
        MemoryRow::new("d").with_number(1.0),
    ];
    let mut d = delivery(MemoryDataView::new(rows.clone()), WINDOW);
    d.sorting = AxisBinding::new("Sum([Value])", vec!["Value".to_string()]).continuous();
    d.sort_order = SortOrder::Descending;
    cards.on_data_view(d).await;
    assert_eq!(contents(&cards), ["a", "c", "b", "d"]);
    assert_eq!(cards.sort_toggle(), Some(SortOrder::Descending));

    assert_eq!(cards.toggle_sort_order(), Some(SortOrder::Ascending));
    assert_eq!(
        host.calls().last(),
        Some(&HostCall::SetSortOrder(SortOrder::Ascending))
    );

    let mut d = delivery(MemoryDataView::new(rows), WINDOW);
    d.sorting = AxisBinding::new("Sum([Value])", vec!["Value".to_string()]).continuous();
    d.sort_order = SortOrder::Ascending;
    cards.on_data_view(d).await;
    assert_eq!(contents(&cards), ["b", "d", "c", "a"]);
}
