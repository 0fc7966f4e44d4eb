//! REPL, CLI, import, and snapshots for cxg.
//!
//! This crate provides:
//! - [`UdParser`] - The parser seam, with [`ConlluParser`] and [`PretaggedParser`]
//! - [`import`] - Bulk JSON import with per-row error reports
//! - [`service`] - Compile, test-pattern, and import over a whole graph
//! - [`Session`] and [`Repl`] - The interactive pattern-debugging loop
//! - Grammar snapshot serialization and deserialization

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod conllu;
pub mod editor;
pub mod import;
pub mod repl;
pub mod serialize;
pub mod service;
pub mod session;
pub mod ud;

pub use conllu::ConlluParser;
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use import::{ImportReport, RowError};
pub use repl::{Outcome, Repl, format_report, format_results};
pub use serialize::{from_bytes, load_from_file, save_to_file, to_bytes};
pub use session::Session;
pub use ud::{PretaggedParser, UdParser};
