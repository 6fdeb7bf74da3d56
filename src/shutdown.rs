use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tiny_http::Server;

/// Cancels a running [`crate::server::MusicServer::serve`] loop.
///
/// Triggering only flips a flag and wakes the listener; the serve loop does
/// the actual winding down.
#[derive(Clone)]
pub struct ShutdownHandle {
    requested: Arc<AtomicBool>,
    server: Arc<Server>,
}

impl ShutdownHandle {
    pub(crate) fn new(server: Arc<Server>) -> Self {
        Self {
            requested: Arc::new(AtomicBool::new(false)),
            server,
        }
    }

    pub fn shutdown(&self) {
        self.requested.store(true, Ordering::SeqCst);
        self.server.unblock();
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}
