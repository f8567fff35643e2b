//! # Trellis engine
//!
//! Turns a pre-validated layout description (see `trellis-core`) into a
//! live tree of backing views, and keeps those views efficiently reusable
//! across rapid rebind cycles.
//!
//! The moving parts, leaf first:
//!
//! - [`pool`] — the generic, type-keyed recycler that amortizes adapter
//!   construction.
//! - [`styles`] — resolution of cascaded style attributes into concrete
//!   geometry and appearance.
//! - [`frame`] — the per-render-pass context resolving bindings, styles
//!   and templates.
//! - [`factory`] — element-variant dispatch to typed adapter factories
//!   and the routing of released adapters back into pools.
//! - [`adapters`] — the adapters themselves: text (plain and rich),
//!   images, custom host views, the three containers, and templates.
//!
//! Everything runs on the UI-owning thread; the only asynchronous edge is
//! image loading, handled with per-request cancellation tokens.

pub mod adapter;
pub mod adapters;
pub mod factory;
pub mod frame;
pub mod media;
pub mod pool;
pub mod styles;

#[cfg(test)]
pub(crate) mod testutil;

pub use adapter::{AdapterBase, CancelToken, ElementAdapter, TouchPhase, Views};
pub use adapters::*;
pub use factory::{AdapterFactory, EngineConfig};
pub use frame::FrameContext;
pub use media::MediaQueryHelper;
pub use pool::{AdapterKind, KeyedRecyclerPool, RecyclerKey};
pub use styles::{ResolvedStyle, resolve_fill};
