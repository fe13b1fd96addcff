//! Record kinds.
//!
//! Each submodule contains:
//! - A `FromRow` row struct implementing [`Record`](crate::store::Record)
//! - Its column enum
//! - The projection structs handlers read it through

pub mod counter;
pub mod user;
