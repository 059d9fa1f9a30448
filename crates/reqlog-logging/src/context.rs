//! Per-call-chain context values
//!
//! `Context` is an immutable chain of typed values. Each value is keyed by
//! the `TypeId` of a marker type, so a key is only reachable by code that
//! can name its marker. The request id lives under a private marker that no
//! other crate can name, which rules out collisions with unrelated data.

use std::any::{Any, TypeId};
use std::sync::Arc;

use reqlog_core_types::RequestId;

/// Immutable, cheaply clonable bag of request-scoped values
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

struct Node {
    key: TypeId,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

impl Context {
    /// The empty root context
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context that additionally maps marker `K` to `value`
    ///
    /// The receiver is left untouched; a later value for the same key
    /// shadows earlier ones in the derived context only.
    pub fn with_value<K, V>(&self, value: V) -> Self
    where
        K: 'static,
        V: Any + Send + Sync,
    {
        Self {
            head: Some(Arc::new(Node {
                key: TypeId::of::<K>(),
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Raw value stored under marker `K`, nearest first
    pub fn value<K: 'static>(&self) -> Option<&(dyn Any + Send + Sync)> {
        let key = TypeId::of::<K>();
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            if n.key == key {
                return Some(n.value.as_ref());
            }
            node = n.parent.as_deref();
        }
        None
    }

    /// Value under marker `K` if it has type `V`
    pub fn value_as<K: 'static, V: 'static>(&self) -> Option<&V> {
        self.value::<K>().and_then(|v| v.downcast_ref::<V>())
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("request_id", &get_request_id(self))
            .finish_non_exhaustive()
    }
}

enum RequestIdKey {}

pub(crate) fn with_request_id(ctx: &Context, id: RequestId) -> Context {
    ctx.with_value::<RequestIdKey, _>(id)
}

/// The request id carried by `ctx`, or `""` when none is set
///
/// A value of an unexpected type under the request-id key also yields `""`.
pub fn get_request_id(ctx: &Context) -> &str {
    ctx.value_as::<RequestIdKey, RequestId>()
        .map(RequestId::as_str)
        .unwrap_or("")
}
