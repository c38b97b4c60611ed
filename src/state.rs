use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::collab::map::RecordingMap;
use crate::collab::store::{FileStore, Store};
use crate::config::Config;
use crate::error::AppError;
use crate::session::Session;

pub type HostedSession = Session<RecordingMap>;

/// Shared handle to the single hosted session. Requests take the lock for
/// the duration of one session operation, so mutations never interleave.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    session: Arc<Mutex<HostedSession>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = FileStore::new(&config.data_dir);
        Self::with_store(config, Box::new(store))
    }

    pub fn with_store(config: Config, store: Box<dyn Store>) -> Self {
        let session = Session::new(config.session.clone(), RecordingMap::new(), store);
        Self {
            config: Arc::new(config),
            session: Arc::new(Mutex::new(session)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn with_session<T>(
        &self,
        f: impl FnOnce(&mut HostedSession) -> T,
    ) -> Result<T, AppError> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| AppError::Internal("Session lock poisoned".to_string()))?;
        session.tick(Instant::now());
        Ok(f(&mut session))
    }

    /// Runs the session's timers; called periodically from `main`.
    pub fn tick(&self) {
        if let Err(err) = self.with_session(|_| ()) {
            tracing::error!("Session tick failed: {}", err);
        }
    }
}
