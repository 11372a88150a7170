//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::service::PayrollService;

/// Shared application state.
///
/// Holds the loaded configuration and the payroll service over the open
/// database pool.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    service: Arc<PayrollService>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: ConfigLoader, service: PayrollService) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the payroll service.
    pub fn service(&self) -> &PayrollService {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone_and_send() {
        fn assert_state<T: Clone + Send + Sync + 'static>() {}
        assert_state::<AppState>();
    }
}
