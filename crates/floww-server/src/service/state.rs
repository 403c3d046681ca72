//! Application state and dependency injection.

use std::sync::Arc;

use floww_core::QuotaCheck;
use floww_postgres::PgClient;
use floww_runtime::{ImageResolver, RuntimeBackend};
use floww_scheduler::JobStore;
use floww_webhook::WebhookService;
use url::Url;

use crate::error::Error;
use crate::service::jwt::WorkflowJwt;
use crate::service::{DispatchConfig, ServiceConfig};

/// Application state, used for the [`State`] extraction (dependency
/// injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pg_client: PgClient,
    job_store: Arc<dyn JobStore>,
    runtime_backend: Arc<dyn RuntimeBackend>,
    image_resolver: Arc<dyn ImageResolver>,
    delivery: WebhookService,
    quota_check: Arc<dyn QuotaCheck>,

    workflow_jwt: WorkflowJwt,
    public_base_url: Url,
    encryption_key: Arc<floww_core::crypto::EncryptionKey>,
}

impl ServiceState {
    /// Assembles state from already-constructed dependencies. The
    /// concrete `job_store`/`runtime_backend`/`image_resolver`/`delivery`/
    /// `quota_check` implementations are selected by the caller (the CLI's
    /// bootstrap), since which one to use depends on configuration this
    /// crate doesn't parse on its own (`RUNTIME_TYPE`, managed vs
    /// self-hosted).
    pub fn new(
        pg_client: PgClient,
        job_store: Arc<dyn JobStore>,
        runtime_backend: Arc<dyn RuntimeBackend>,
        image_resolver: Arc<dyn ImageResolver>,
        delivery: WebhookService,
        quota_check: Arc<dyn QuotaCheck>,
        dispatch_config: &DispatchConfig,
    ) -> Result<Self, Error<'static>> {
        let encryption_key = dispatch_config
            .encryption_key()
            .map_err(|error| Error::internal().with_context(error.to_string()))?;

        Ok(Self {
            pg_client,
            job_store,
            runtime_backend,
            image_resolver,
            delivery,
            quota_check,
            workflow_jwt: WorkflowJwt::new(&dispatch_config.workflow_jwt_secret, dispatch_config.workflow_jwt_expiration()),
            public_base_url: dispatch_config.public_api_url.clone(),
            encryption_key: Arc::new(encryption_key),
        })
    }

    /// Builds the full dependency set from [`ServiceConfig`], connecting to
    /// PostgreSQL. The runtime/job-store/delivery/quota implementations are
    /// still supplied by the caller — see [`Self::new`].
    pub async fn from_config(
        config: &ServiceConfig,
        job_store: Arc<dyn JobStore>,
        runtime_backend: Arc<dyn RuntimeBackend>,
        image_resolver: Arc<dyn ImageResolver>,
        delivery: WebhookService,
        quota_check: Arc<dyn QuotaCheck>,
    ) -> Result<Self, Error<'static>> {
        let pg_client = config.connect_postgres().await.map_err(|error| Error::internal().with_context(error.to_string()))?;
        Self::new(pg_client, job_store, runtime_backend, image_resolver, delivery, quota_check, &config.dispatch_config)
    }

    pub fn pg_client(&self) -> &PgClient {
        &self.pg_client
    }

    pub fn job_store(&self) -> &Arc<dyn JobStore> {
        &self.job_store
    }

    pub fn runtime_backend(&self) -> &Arc<dyn RuntimeBackend> {
        &self.runtime_backend
    }

    pub fn image_resolver(&self) -> &Arc<dyn ImageResolver> {
        &self.image_resolver
    }

    pub fn delivery(&self) -> &WebhookService {
        &self.delivery
    }

    pub fn quota_check(&self) -> &Arc<dyn QuotaCheck> {
        &self.quota_check
    }

    pub fn workflow_jwt(&self) -> &WorkflowJwt {
        &self.workflow_jwt
    }

    pub fn public_base_url(&self) -> &Url {
        &self.public_base_url
    }

    pub fn encryption_key(&self) -> &floww_core::crypto::EncryptionKey {
        &self.encryption_key
    }

    /// The shared handle backing [`Self::encryption_key`], for callers (the
    /// lifecycle manager's [`SyncContext`](floww_providers::SyncContext))
    /// that need an owned `Arc` rather than a borrow.
    pub fn encryption_key_handle(&self) -> Arc<floww_core::crypto::EncryptionKey> {
        self.encryption_key.clone()
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+ $(,)?) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient, job_store: Arc<dyn JobStore>, delivery: WebhookService, workflow_jwt: WorkflowJwt);
