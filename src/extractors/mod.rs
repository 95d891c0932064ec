//! Identity extraction from profile stores
//!
//! Both on-disk formats implement [`IdentitySource`]; the scanner picks one via
//! [`source_for`] from the detected [`StoreFormat`] and never branches on format
//! again. Records produced by either source are indistinguishable.

pub mod hierarchical;
pub mod relational;
pub mod schema;

use std::path::Path;
use std::time::Duration;

pub use hierarchical::HierarchicalSource;
pub use relational::RelationalSource;

use crate::error::StoreError;
use crate::models::{DataStore, Identity, StoreFormat};
use crate::utils::MAX_PROFILE_BYTES;

/// A readable store of ESI owners
pub trait IdentitySource: Send + Sync {
    fn format(&self) -> StoreFormat;

    fn path(&self) -> &Path;

    /// Read every owner in the store
    ///
    /// # Errors
    ///
    /// Fails with a [`StoreError`] local to this store; callers fold it into
    /// the scan report instead of aborting.
    fn extract(&self) -> Result<Vec<Identity>, StoreError>;
}

/// Pick the extractor for a detected store; `None` for [`StoreFormat::Unknown`]
pub fn source_for(store: &DataStore, read_timeout: Duration) -> Option<Box<dyn IdentitySource>> {
    match store.format {
        StoreFormat::Relational => Some(Box::new(RelationalSource::new(&store.path, read_timeout))),
        StoreFormat::Hierarchical => {
            Some(Box::new(HierarchicalSource::new(&store.path, MAX_PROFILE_BYTES)))
        }
        StoreFormat::Unknown => None,
    }
}
