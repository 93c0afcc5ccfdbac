// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host pipeline interface for the Conduit network editor.
//!
//! The editor mirrors an external, authoritative pipeline model. This crate
//! defines the narrow surface through which the canvas talks to that model:
//!
//! - [`PipelineHost`]: queries and fire-and-forget mutation requests
//! - [`PipelineEvent`]: typed change notifications delivered by the embedder
//! - [`Fragment`]: the copy/paste data model
//! - [`MemoryHost`]: a complete in-memory host used by tests and the demo
//!
//! The canvas never treats its own copy of the graph as authoritative: it
//! requests changes here and waits for the corresponding notification before
//! anything becomes visible.

pub mod event;
pub mod fragment;
pub mod host;
pub mod memory;

pub use event::PipelineEvent;
pub use fragment::{Fragment, FragmentEntity, FragmentWire};
pub use host::{EntityKind, EntityRef, InputPortSpec, OutputPortSpec, PipelineHost};
pub use memory::MemoryHost;
