//! Resolution of entrance identifiers into entities.

use crate::entity::SpatialEntity;
use std::sync::Arc;

/// Looks entities up by key in an external index.
///
/// A miss is an expected outcome (deleted, not yet indexed, or a malformed
/// reference) and is reported as `None`, never as an error.
pub trait EntranceResolver: Send + Sync {
    fn resolve(&self, key: &str) -> Option<Arc<SpatialEntity>>;
}

impl<T: EntranceResolver + ?Sized> EntranceResolver for &T {
    fn resolve(&self, key: &str) -> Option<Arc<SpatialEntity>> {
        (**self).resolve(key)
    }
}

impl<T: EntranceResolver + ?Sized> EntranceResolver for Arc<T> {
    fn resolve(&self, key: &str) -> Option<Arc<SpatialEntity>> {
        (**self).resolve(key)
    }
}

/// Adapts a closure into a resolver.
///
/// ```
/// use placemark::{EntranceResolver, FnResolver, SpatialEntity};
/// use std::sync::Arc;
///
/// let resolver = FnResolver(|_key: &str| -> Option<Arc<SpatialEntity>> { None });
/// assert!(resolver.resolve("node/1").is_none());
/// ```
pub struct FnResolver<F>(pub F);

impl<F> EntranceResolver for FnResolver<F>
where
    F: Fn(&str) -> Option<Arc<SpatialEntity>> + Send + Sync,
{
    fn resolve(&self, key: &str) -> Option<Arc<SpatialEntity>> {
        (self.0)(key)
    }
}

/// Resolver that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl EntranceResolver for NoopResolver {
    fn resolve(&self, _key: &str) -> Option<Arc<SpatialEntity>> {
        None
    }
}
