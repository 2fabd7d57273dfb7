pub use crate::path::split_path;
pub use crate::repository::{
    ComponentSource, ContentSource, NavigationSource, RepositoryError, RepositoryErrorExt,
    TagSource,
};
pub use clic_domain::config::EngineConfig;
pub use clic_domain::{PageIdentity, TenantId};
