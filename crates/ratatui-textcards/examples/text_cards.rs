use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use futures::executor::block_on;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui_textcards::controller::TextCards;
use ratatui_textcards::crossterm_input::input_event_from_crossterm;
use ratatui_textcards::host::AxisBinding;
use ratatui_textcards::host::Delivery;
use ratatui_textcards::host::FontStyling;
use ratatui_textcards::host::HostStyling;
use ratatui_textcards::host::ModHost;
use ratatui_textcards::host::ROW_ID_EXPRESSION;
use ratatui_textcards::host::WindowSize;
use ratatui_textcards::options::TextCardOptions;
use ratatui_textcards::sort::SortOrder;
use ratatui_textcards::view::TextCardsView;
use ratatui_textcards::view::ViewAction;
use ratatui_textcards_core::testing::MemoryDataView;
use ratatui_textcards_core::testing::MemoryRow;

const COLORS: [&str; 4] = ["#4e79a7", "#f28e2b", "#59a14f", "#e15759"];
const REGIONS: [&str; 3] = ["North", "South", "West"];

/// Host state the demo shows in its status line.
#[derive(Debug)]
struct HostState {
    overlay: Option<Vec<String>>,
    tooltip: Option<String>,
    sort_order: SortOrder,
    use_custom_card_by: bool,
    card_by: String,
    /// Set when a persisted property changed and the host should re-deliver.
    dirty: bool,
}

#[derive(Clone, Debug)]
struct DemoHost(Rc<RefCell<HostState>>);

impl DemoHost {
    fn new() -> Self {
        Self(Rc::new(RefCell::new(HostState {
            overlay: None,
            tooltip: None,
            sort_order: SortOrder::Ascending,
            use_custom_card_by: false,
            card_by: ROW_ID_EXPRESSION.to_string(),
            dirty: false,
        })))
    }
}

impl ModHost for DemoHost {
    fn styling(&self) -> HostStyling {
        HostStyling {
            font: FontStyling {
                color: "#d0d0d0".to_string(),
                size: 12,
                family: "monospace".to_string(),
                style: "normal".to_string(),
                weight: "normal".to_string(),
            },
            line_color: "#5a5a5a".to_string(),
            tick_color: "#8a8a8a".to_string(),
            background_color: "#1e1e1e".to_string(),
        }
    }

    fn show_errors(&self, messages: &[String]) {
        self.0.borrow_mut().overlay = Some(messages.to_vec());
    }

    fn hide_errors(&self) {
        self.0.borrow_mut().overlay = None;
    }

    fn show_tooltip(&self, text: &str) {
        self.0.borrow_mut().tooltip = Some(text.replace('\n', "  "));
    }

    fn hide_tooltip(&self) {
        self.0.borrow_mut().tooltip = None;
    }

    fn signal_render_complete(&self) {
        tracing::debug!(target: "text_cards_demo", "render complete");
    }

    fn set_sort_order(&self, order: SortOrder) {
        let mut state = self.0.borrow_mut();
        state.sort_order = order;
        state.dirty = true;
    }

    fn set_use_custom_card_by(&self, value: bool) {
        let mut state = self.0.borrow_mut();
        state.use_custom_card_by = value;
        state.dirty = true;
    }

    fn set_card_by_expression(&self, expression: &str) {
        let mut state = self.0.borrow_mut();
        state.card_by = expression.to_string();
        state.dirty = true;
    }
}

fn demo_rows() -> Vec<MemoryRow> {
    (0..250)
        .map(|i| {
            let region = REGIONS[i % REGIONS.len()];
            let body = if i % 7 == 0 {
                format!(
                    "Order {i}: customer asked for a callback about the delayed shipment.\n\
                     Notes: priority account, escalate if not resolved this week."
                )
            } else {
                format!("Order {i}: delivered on time.")
            };
            MemoryRow::new(body)
                .with_number(((i * 37) % 101) as f64)
                .with_color(COLORS[i % COLORS.len()])
                .with_annotation([region.to_string(), format!("Store {}", i % 5)])
                .with_tooltip([region.to_string()])
        })
        .collect()
}

fn delivery(data: &MemoryDataView, host: &DemoHost, area: Rect) -> Delivery<MemoryDataView> {
    let state = host.0.borrow();
    Delivery {
        data_view: data.clone(),
        window: WindowSize::new(area.width as u32, area.height as u32),
        content: AxisBinding::new("<[Comment]>", vec!["Comment".to_string()]),
        sorting: AxisBinding::new("Sum([Value])", vec!["Value".to_string()]).continuous(),
        sort_order: state.sort_order,
        card_by: AxisBinding::new(state.card_by.clone(), vec!["row id".to_string()]),
        use_custom_card_by: state.use_custom_card_by,
        tooltip: AxisBinding::new("<[Region]>", vec!["Region".to_string()]),
        annotation: AxisBinding::new(
            "<[Region] NEST [Store]>",
            vec!["Region".to_string(), "Store".to_string()],
        ),
    }
}

fn init_logging() {
    let Ok(path) = std::env::var("TEXTCARDS_LOG") else {
        return;
    };
    let Ok(file) = File::create(path) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
}

fn main() -> io::Result<()> {
    init_logging();

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend<Error = io::Error>>(terminal: &mut Terminal<B>) -> io::Result<()> {
    let host = DemoHost::new();
    let data = MemoryDataView::new(demo_rows())
        .with_tooltip_levels(["Region"])
        .with_annotation_levels(["Region", "Store"]);
    let options = TextCardOptions::terminal().with_page_size(50);
    let mut cards = TextCards::with_options(host.clone(), options);
    let mut view = TextCardsView::new();

    let mut delivered_area = None;
    let mut notice = String::new();

    loop {
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        let [main, _] = split(area);
        if delivered_area != Some(main) || host.0.borrow().dirty {
            host.0.borrow_mut().dirty = false;
            let outcome = block_on(cards.on_data_view(delivery(&data, &host, main)));
            tracing::debug!(target: "text_cards_demo", ?outcome, "delivered");
            delivered_area = Some(main);
        }

        terminal.draw(|f| {
            let [main, status] = split(f.area());
            let buf = f.buffer_mut();
            view.render(main, buf, &cards);

            let state = host.0.borrow();
            let (line, style) = if let Some(messages) = &state.overlay {
                (messages.join(" | "), Style::default().add_modifier(Modifier::BOLD))
            } else if let Some(tooltip) = &state.tooltip {
                (tooltip.clone(), Style::default())
            } else if !notice.is_empty() {
                (notice.clone(), Style::default())
            } else {
                (
                    "click: mark  ctrl-click: toggle  shift-click: range  drag: select  ctrl-c: copy  q: quit"
                        .to_string(),
                    Style::default().add_modifier(Modifier::DIM),
                )
            };
            let span = Span::styled(line, style);
            buf.set_span(status.x, status.y, &span, status.width);
        })?;

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let ev = crossterm::event::read()?;
        if let Event::Key(key) = &ev {
            if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('q') {
                return Ok(());
            }
        }
        let Some(input) = input_event_from_crossterm(ev) else {
            continue;
        };

        match view.handle_event(&mut cards, input) {
            ViewAction::Scrolled(metrics) => {
                let outcome = block_on(cards.on_scroll(metrics));
                tracing::debug!(target: "text_cards_demo", ?outcome, "scrolled");
            }
            ViewAction::CopyRequested(text) => {
                notice = format!("copied {} chars", text.chars().count());
            }
            // Marks reach the cards with the next delivery, as a host refresh would do.
            ViewAction::Gesture(_) => host.0.borrow_mut().dirty = true,
            ViewAction::Redraw | ViewAction::None => {}
        }
    }
}

fn split(area: Rect) -> [Rect; 2] {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(area)
}
