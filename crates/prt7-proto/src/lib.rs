//! PRT-7 wire protocol.
//!
//! The PRT-7 link carries one ASCII instruction per line:
//!
//! ```text
//! L,<byte>   load one byte to be decoded and appended to the message
//! M,<int>    rotate the cipher by a signed amount
//! ```
//!
//! This crate is pure data handling with no I/O: [`LineAssembler`] turns raw
//! byte chunks from a transport into lines, and [`parse`] turns a line into a
//! [`Frame`].
//!
//! # Components
//!
//! - [`Frame`]: closed set of protocol instructions
//! - [`parse`]: line to frame conversion with typed [`ParseError`]s
//! - [`LineAssembler`]: incremental CR/LF line splitter

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
mod frame;
mod line;
mod parser;

pub use errors::{ParseError, Result};
pub use frame::{Frame, FrameKind};
pub use line::{LineAssembler, MAX_LINE_LEN};
pub use parser::{parse, parse_rotation};
