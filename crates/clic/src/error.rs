use clic_catalog::CatalogError;
use clic_composition::CompositionError;
use clic_routing::RoutingError;
use std::borrow::Cow;

/// Request-level failures. Only infrastructure faults end up here: an unknown path is a
/// [`PageOutcome::NotFound`](crate::PageOutcome) and a failed component fetch is a marker on
/// the component.
#[clic_derive::clic_error]
pub enum EngineError {
    #[error("Route resolution failed{}: {source}", format_context(.context))]
    Routing {
        #[source]
        source: RoutingError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Component composition failed{}: {source}", format_context(.context))]
    Composition {
        #[source]
        source: CompositionError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Catalog unavailable{}: {source}", format_context(.context))]
    Catalog {
        #[source]
        source: CatalogError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Engine error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
