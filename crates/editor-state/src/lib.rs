//! The coordinator between the window and the file.
//!
//! A [`document::Document`] owns the [`io::line_store::LineStore`], the text
//! currently on display, and the [`editor_core::session::SearchSession`] over
//! that text. The UI turns every user action into a [`command::Command`] and
//! hands it to [`document::Document::execute`].

pub mod command;
pub mod document;
pub mod errors;
pub mod status;
