//! Query building and execution for table renders.
//!
//! - **Select**: [`TableQuery`], the owned builder threaded through render steps
//! - **Order**: ORDER BY specifier parsing
//! - **Execution**: `all`, `count`, `paginate`, `find_for_binding`
//! - **Value Conversion**: SeaQuery values to may_postgres parameters

pub mod execution;
pub mod order;
pub mod select;
pub(crate) mod value_conversion;

#[doc(inline)]
pub use execution::Page;
#[doc(inline)]
pub use order::{parse_order, Direction, OrderDirective};
#[doc(inline)]
pub use select::TableQuery;
