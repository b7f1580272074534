use std::sync::Arc;

use crate::config::Config;
use crate::generation::backend::ScriptBackend;
use crate::metrics::MetricsSink;
use crate::profiles::ProfileSet;

/// Shared application state, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn ScriptBackend>,
    pub profiles: Arc<ProfileSet>,
    pub metrics: Arc<dyn MetricsSink>,
    pub config: Config,
}
