//! The `kvstore` provider: a namespace-scoped key/value store consumed
//! directly by workflows, never by a declared trigger. All reconcile and
//! match operations use the adapter's no-op defaults.

use floww_postgres::types::ProviderKind;

use crate::adapter::Adapter;

pub struct KvstoreAdapter;

impl Adapter for KvstoreAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Kvstore
    }
}
