//! # Trellis data model
//!
//! The immutable input consumed by the rendering/binding engine: a tree of
//! typed [`element::Element`]s referencing [`style::Style`]s,
//! [`template::Template`]s and [`binding::BindingValue`]s, plus the
//! host-facing traits ([`host::AssetProvider`],
//! [`host::CustomElementProvider`], [`host::ActionHandler`]) and the
//! backing-view arena the engine renders into.
//!
//! Everything here is plain data: a model tree is immutable for the
//! duration of a render pass, and all mutation happens in the engine crate
//! through adapters.

pub mod actions;
pub mod binding;
pub mod color;
pub mod content;
pub mod debug;
pub mod element;
pub mod error;
pub mod geometry;
pub mod host;
pub mod image;
pub mod media;
pub mod style;
pub mod styled;
pub mod template;
pub mod text;
pub mod views;

pub use actions::*;
pub use binding::*;
pub use color::*;
pub use content::*;
pub use debug::*;
pub use element::*;
pub use error::*;
pub use geometry::*;
pub use host::*;
pub use image::*;
pub use media::*;
pub use style::*;
pub use styled::*;
pub use template::*;
pub use text::*;
pub use views::*;
