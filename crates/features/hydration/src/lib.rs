//! # Component hydration
//!
//! Each component may declare a `dynamicData` requirement. Its `dataType` label is parsed into
//! the closed [`DataType`](clic_domain::DataType) union and dispatched to a fetch strategy:
//!
//! | Strategy  | Labels                                   | Result                               |
//! |-----------|------------------------------------------|--------------------------------------|
//! | List      | `properties`, `testimonios`, ...         | `{items, total, page, pageCount}`    |
//! | Single    | `{list}_single`                          | `{item}` (`null` when not found)     |
//! | Category  | `categorias_{list}`                      | `{categories: [{slug, count}]}`      |
//! | Aggregate | `stats`, `carrusel`, `texto_suelto`      | `{value}`                            |
//!
//! Fetches of one page run concurrently on a `JoinSet`, each bounded by the configured timeout.
//! A failure, a timeout or a panic only affects its own component, which keeps empty data and
//! an error marker.

mod error;
mod filters;
mod resolver;

pub use crate::error::{HydrationError, HydrationErrorExt};
pub use crate::resolver::DataResolver;
