pub(crate) mod container;

pub mod chunked;
pub mod custom;
pub mod grid;
pub mod image;
pub mod list;
pub mod stack;
pub mod template;
pub mod text;

pub use chunked::ChunkedTextAdapter;
pub use custom::CustomElementAdapter;
pub use grid::GridRowAdapter;
pub use image::ImageElementAdapter;
pub use list::ElementListAdapter;
pub use stack::ElementStackAdapter;
pub use template::{
    TemplateAdapter, TemplateAdapterModel, bind_template_adapter,
    create_and_bind_template_adapter, create_template_adapter,
};
pub use text::ParameterizedTextAdapter;
