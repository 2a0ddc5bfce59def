// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! These traits are the seams between the tree and the outside world: a
//! [`RawSource`] produces nested raw data, a [`ConfigParser`] turns text into it.
//! Adapters implement them.

pub mod parser;
pub mod source;

// Re-export commonly used types
pub use parser::ConfigParser;
pub use source::RawSource;
