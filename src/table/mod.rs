//! Table composition: options in, view name and payload out.

pub mod options;
pub mod payload;
pub mod render;
pub mod view;

#[doc(inline)]
pub use options::{QueryCallback, TableOptions, TransformCallback};
#[doc(inline)]
pub use payload::{PageLinks, PageMeta, PaginationState, TableData, TablePayload};
#[doc(inline)]
pub use render::{InertiaTable, RenderedTable};
#[doc(inline)]
pub use view::{view_name, InertiaPage, PageObject, ViewRenderer};
