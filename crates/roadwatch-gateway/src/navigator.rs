//! Navigation and user notification.
//!
//! The gateway never renders anything itself. When a session ends it asks
//! the host surface to move the user to the login entry point, and on a
//! role mismatch it asks the host to show an access-denied notice first.

/// The host surface's navigation capability.
pub trait Navigator: Send + Sync {
    /// Send the user to `target`.
    fn redirect(&self, target: &str);

    /// Show a blocking notice to the user.
    fn alert(&self, message: &str);
}

impl<T: Navigator + ?Sized> Navigator for std::sync::Arc<T> {
    fn redirect(&self, target: &str) {
        (**self).redirect(target);
    }

    fn alert(&self, message: &str) {
        (**self).alert(message);
    }
}

/// Something a [`RecordingNavigator`] was asked to do.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// `redirect(target)` was called.
    Redirect(String),
    /// `alert(message)` was called.
    Alert(String),
}

/// A navigator that records every call for later assertions.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    events: parking_lot::Mutex<Vec<NavigationEvent>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordingNavigator {
    /// Create a navigator with no recorded events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in order.
    #[must_use]
    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events.lock().clone()
    }

    /// Recorded redirect targets, in order.
    #[must_use]
    pub fn redirects(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                NavigationEvent::Redirect(target) => Some(target.clone()),
                NavigationEvent::Alert(_) => None,
            })
            .collect()
    }

    /// Recorded alert messages, in order.
    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                NavigationEvent::Alert(message) => Some(message.clone()),
                NavigationEvent::Redirect(_) => None,
            })
            .collect()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Navigator for RecordingNavigator {
    fn redirect(&self, target: &str) {
        self.events
            .lock()
            .push(NavigationEvent::Redirect(target.to_string()));
    }

    fn alert(&self, message: &str) {
        self.events
            .lock()
            .push(NavigationEvent::Alert(message.to_string()));
    }
}
