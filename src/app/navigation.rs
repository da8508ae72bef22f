// SPDX-License-Identifier: GPL-3.0-only

//! Navigation host seam
//!
//! The scan screen does not own routing. It only asks the host to go back, or
//! to open the scanner from elsewhere in the app.

use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Screens of the inventory app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Overview,
    AddProduct,
    DeleteProduct,
    AddStorage,
    ScanBarcode,
}

impl Route {
    /// Router path of the screen
    pub fn path(&self) -> &'static str {
        match self {
            Route::Overview => "/overview",
            Route::AddProduct => "/addProduct",
            Route::DeleteProduct => "/deleteProduct",
            Route::AddStorage => "/addStorage",
            Route::ScanBarcode => "/scanBarcode",
        }
    }
}

/// What the screen asked the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationRequest {
    Back,
    To(Route),
}

pub trait NavigationHost: Send + Sync {
    fn navigate_back(&self);
    fn navigate_to(&self, route: Route);
}

/// Ask the host to show the scan screen
pub fn open_scanner(host: &dyn NavigationHost) {
    info!(path = Route::ScanBarcode.path(), "Opening scanner");
    host.navigate_to(Route::ScanBarcode);
}

/// Navigation host that records requests instead of routing
#[derive(Debug, Clone, Default)]
pub struct NavigationLog {
    requests: Arc<Mutex<Vec<NavigationRequest>>>,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<NavigationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, request: NavigationRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }
}

impl NavigationHost for NavigationLog {
    fn navigate_back(&self) {
        self.push(NavigationRequest::Back);
    }

    fn navigate_to(&self, route: Route) {
        self.push(NavigationRequest::To(route));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_scanner_requests_scan_route() {
        let log = NavigationLog::new();
        open_scanner(&log);
        log.navigate_back();
        assert_eq!(
            log.requests(),
            vec![
                NavigationRequest::To(Route::ScanBarcode),
                NavigationRequest::Back
            ]
        );
        assert_eq!(Route::ScanBarcode.path(), "/scanBarcode");
    }
}
