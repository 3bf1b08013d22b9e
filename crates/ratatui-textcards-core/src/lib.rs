//! `ratatui-textcards-core` holds the engines behind the text card visualization.
//!
//! A text card view shows one card per row of a host-managed data view: the row's content, an
//! optional annotation header and a color bar. The host owns the data, the marking model and the
//! theme; this crate decides what to render, in which order and in how many batches, and what
//! each pointer gesture means for marking.
//!
//! ## Design goals
//!
//! - Host agnostic: everything the host provides is behind the traits in [`host`].
//! - Single threaded: host calls are `async`, but nothing here needs `Send` or a specific runtime.
//! - Copy is app-controlled: gestures yield [`selection::SelectionAction::CopyRequested`] and the
//!   caller decides how to integrate with a clipboard.
//!
//! ## Getting started
//!
//! Most users should depend on the facade crate `ratatui-textcards`, which adds a terminal
//! painter. Use this crate directly to drive the engines from another front end.
//!
//! Useful entry points:
//! - [`controller::TextCards`]: one visualization instance; feed it deliveries and gestures.
//! - [`gate`]: the checks every delivery passes before anything is rendered.
//! - [`paging::render_page`]: batch rendering over a frozen row snapshot.
//! - [`sort::sort_rows`]: ordering by the `Sorting` axis.
//! - [`marking`]: gesture classification and mark calls.
//!
//! ## Testing
//!
//! The `testing` feature exposes in-memory host doubles ([`testing::MemoryDataView`],
//! [`testing::RecordingHost`]) for integration tests and demos.
pub mod error;
pub mod host;

pub mod row;
pub mod sort;

pub mod gate;
pub mod marking;
pub mod paging;

pub mod controller;
pub mod options;
pub mod session;

pub mod text;
pub mod theme;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod input;
pub mod keymap;
pub mod render;
pub mod scroll;
pub mod selection;
pub mod viewport;
pub mod wrapping;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
