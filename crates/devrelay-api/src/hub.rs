//! Fan-out hub for telemetry reporters.
//!
//! Every connected reporter socket subscribes to one broadcast channel.
//! Commands issued from chat or the dashboard, and readings sent by any
//! reporter, are published there and reach every open socket.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use devrelay_core::{DeviceCommand, Identity, RelayFrame, ReporterFrame};

const DEFAULT_CAPACITY: usize = 64;

/// Broadcast hub shared by all reporter sockets.
#[derive(Debug)]
pub struct ReporterHub {
    frames: broadcast::Sender<RelayFrame>,
    connected: AtomicUsize,
    closing: CancellationToken,
}

impl Default for ReporterHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ReporterHub {
    pub fn new(capacity: usize) -> Self {
        let (frames, _) = broadcast::channel(capacity);
        Self {
            frames,
            connected: AtomicUsize::new(0),
            closing: CancellationToken::new(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RelayFrame> {
        self.frames.subscribe()
    }

    /// Publish a frame to every subscriber. Returns how many received it.
    pub fn publish(&self, frame: RelayFrame) -> usize {
        self.frames.send(frame).unwrap_or(0)
    }

    /// Push a device command on behalf of `chat`.
    pub fn dispatch(&self, command: DeviceCommand, chat: &Identity) -> usize {
        let receivers = self.publish(RelayFrame::TelegramCommand {
            command,
            chat_id: chat.to_string(),
        });
        if receivers == 0 {
            debug!(command = command.as_str(), chat_id = %chat, "No reporters connected");
        } else {
            info!(command = command.as_str(), chat_id = %chat, receivers, "Device command pushed");
        }
        receivers
    }

    /// Open reporter sockets.
    pub fn connected(&self) -> usize {
        self.connected.load(Ordering::SeqCst)
    }

    /// Track a new reporter socket until the returned session is dropped.
    pub fn session(self: &Arc<Self>) -> ReporterSession {
        self.connected.fetch_add(1, Ordering::SeqCst);
        ReporterSession {
            hub: Arc::clone(self),
            device_id: None,
        }
    }

    /// Ask every reporter socket to close.
    pub fn close(&self) {
        self.closing.cancel();
    }

    /// Resolves once [`close`](Self::close) has been called.
    pub async fn closed(&self) {
        self.closing.cancelled().await
    }
}

/// One reporter connection.
#[derive(Debug)]
pub struct ReporterSession {
    hub: Arc<ReporterHub>,
    device_id: Option<String>,
}

impl ReporterSession {
    /// Device id announced by `device_register`, if any.
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// Apply a frame received from the reporter.
    pub fn handle(&mut self, frame: ReporterFrame) {
        match frame {
            ReporterFrame::DeviceRegister {
                device_id,
                device_info,
            } => {
                info!(
                    device_id = %device_id,
                    platform = device_info.platform.as_deref().unwrap_or("unknown"),
                    "Reporter registered"
                );
                self.device_id = Some(device_id.clone());
                self.hub.publish(RelayFrame::DeviceConnected { device_id });
            }
            ReporterFrame::DeviceData {
                device_id,
                kind,
                data,
            } => {
                debug!(device_id = %device_id, kind = %kind, "Device data received");
                self.hub.publish(RelayFrame::DeviceData {
                    device_id,
                    kind,
                    data,
                });
            }
        }
    }
}

impl Drop for ReporterSession {
    fn drop(&mut self) {
        self.hub.connected.fetch_sub(1, Ordering::SeqCst);
        if let Some(device_id) = self.device_id.take() {
            info!(device_id = %device_id, "Reporter disconnected");
            self.hub.publish(RelayFrame::DeviceDisconnected { device_id });
        }
    }
}
