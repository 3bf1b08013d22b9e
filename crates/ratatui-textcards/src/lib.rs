//! `ratatui-textcards` renders one card per row of a host data view in a ratatui terminal.
//!
//! Each card shows the row's content, an optional annotation header and a color bar. Clicking
//! a card marks its row; ctrl-click toggles, shift-click marks a range and clicking the
//! background clears the marking. Cards arrive in pages: scrolling to the bottom asks the
//! controller for the next batch.
//!
//! The engines live in `ratatui-textcards-core` and are re-exported here. This crate adds
//! [`view::TextCardsView`], the painter and event router for terminals.
//!
//! ## Getting started
//!
//! - Implement [`host::DataView`], [`host::HostRow`] and [`host::ModHost`] for your data source.
//! - Feed every host delivery to [`controller::TextCards::on_data_view`].
//! - Each frame, call [`view::TextCardsView::render`]; route input through
//!   [`view::TextCardsView::handle_event`] and pass [`view::ViewAction::Scrolled`] metrics to
//!   [`controller::TextCards::on_scroll`].
//!
//! ## Features
//!
//! - `crossterm`: conversions from crossterm events into [`input::InputEvent`].
pub use ratatui_textcards_core::controller;
pub use ratatui_textcards_core::error;
pub use ratatui_textcards_core::gate;
pub use ratatui_textcards_core::host;
pub use ratatui_textcards_core::input;
pub use ratatui_textcards_core::keymap;
pub use ratatui_textcards_core::marking;
pub use ratatui_textcards_core::options;
pub use ratatui_textcards_core::paging;
pub use ratatui_textcards_core::render;
pub use ratatui_textcards_core::row;
pub use ratatui_textcards_core::scroll;
pub use ratatui_textcards_core::selection;
pub use ratatui_textcards_core::session;
pub use ratatui_textcards_core::sort;
pub use ratatui_textcards_core::text;
pub use ratatui_textcards_core::theme;
pub use ratatui_textcards_core::viewport;
pub use ratatui_textcards_core::wrapping;

#[cfg(feature = "crossterm")]
pub use ratatui_textcards_core::crossterm_input;

pub mod view;
