//! Nullable push channel: records messages instead of sending them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use txwatch_websocket::{ClientMessage, PushChannel};

/// A test push channel whose connection state is set by the test.
pub struct NullPushChannel {
    connected: AtomicBool,
    emitted: Mutex<Vec<ClientMessage>>,
}

impl NullPushChannel {
    pub fn new(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
            emitted: Mutex::new(Vec::new()),
        }
    }

    pub fn connected() -> Self {
        Self::new(true)
    }

    pub fn disconnected() -> Self {
        Self::new(false)
    }

    /// Simulate the connection coming up or dropping.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// All messages "sent" so far (for assertions).
    pub fn emitted(&self) -> Vec<ClientMessage> {
        self.emitted.lock().unwrap().clone()
    }

    /// Forget recorded messages.
    pub fn reset(&self) {
        self.emitted.lock().unwrap().clear();
    }
}

impl Default for NullPushChannel {
    fn default() -> Self {
        Self::connected()
    }
}

impl PushChannel for NullPushChannel {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn emit(&self, message: ClientMessage) {
        self.emitted.lock().unwrap().push(message);
    }
}
