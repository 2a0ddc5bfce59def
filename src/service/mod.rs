// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer that assembles a configuration tree from several sources.
//!
//! The [`SourceRegistry`] maps source types to factories; the [`Assembler`] resolves
//! descriptors through it and merges the fetched data in order.

pub mod assembler;
pub mod registry;

// Re-export commonly used types
pub use assembler::{Assembler, AssemblerBuilder, SourceDescriptor};
pub use registry::{SourceFactory, SourceRegistry};
