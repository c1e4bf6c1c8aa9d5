//! Layer 2 capture sessions.
//!
//! [`pnet`]'s data link receiver blocks, so every session gets a dedicated
//! reader thread that forwards frames into an async queue. The thread exits
//! once the queue's receiving side is dropped, within one read timeout.

use std::io;
use std::thread;
use std::time::Duration;

use arpsweep_common::error::ScanError;
use pnet::datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender, NetworkInterface};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

const SNAPSHOT_LEN: usize = 65_536;
const MAX_READ_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    pub snapshot_len: usize,
    pub promiscuous: bool,
    pub read_timeout: Duration,
}

impl CaptureOptions {
    /// Receive-all capture whose reads never block longer than the scan budget.
    pub fn for_timeout(timeout: Duration) -> Self {
        Self {
            snapshot_len: SNAPSHOT_LEN,
            promiscuous: true,
            read_timeout: timeout.min(MAX_READ_TIMEOUT),
        }
    }
}

/// Writes raw frames onto the wire, one at a time.
pub trait FrameWriter: Send {
    fn write(&mut self, frame: &[u8]) -> io::Result<()>;
}

/// Opens capture sessions on named interfaces.
pub trait Transport: Send + Sync {
    fn open(&self, intf: &NetworkInterface, opts: &CaptureOptions) -> Result<CaptureHandle, ScanError>;
}

/// An open session: a writer plus the stream of every frame seen on the link.
///
/// The session ends once the writer is dropped and `frames` is closed or dropped.
pub struct CaptureHandle {
    pub writer: Box<dyn FrameWriter>,
    pub frames: UnboundedReceiver<Vec<u8>>,
}

impl CaptureHandle {
    pub fn new(writer: Box<dyn FrameWriter>, frames: UnboundedReceiver<Vec<u8>>) -> Self {
        Self { writer, frames }
    }
}

/// Production transport backed by [`pnet::datalink`].
pub struct PnetTransport;

impl Transport for PnetTransport {
    fn open(&self, intf: &NetworkInterface, opts: &CaptureOptions) -> Result<CaptureHandle, ScanError> {
        let cfg = Config {
            read_buffer_size: opts.snapshot_len,
            read_timeout: Some(opts.read_timeout),
            promiscuous: opts.promiscuous,
            ..Default::default()
        };

        let unavailable = |source: io::Error| ScanError::TransportUnavailable {
            interface: intf.name.clone(),
            source,
        };

        let (tx, rx) = open_eth_channel(intf, &cfg, datalink::channel).map_err(unavailable)?;
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();

        thread::Builder::new()
            .name(format!("capture-{}", intf.name))
            .spawn(move || forward_frames(rx, queue_tx))
            .map_err(unavailable)?;

        Ok(CaptureHandle::new(Box::new(PnetWriter(tx)), queue_rx))
    }
}

struct PnetWriter(Box<dyn DataLinkSender>);

impl FrameWriter for PnetWriter {
    fn write(&mut self, frame: &[u8]) -> io::Result<()> {
        self.0
            .send_to(frame, None)
            .unwrap_or_else(|| Err(io::Error::other("data link sender rejected the frame")))
    }
}

fn forward_frames(mut rx: Box<dyn DataLinkReceiver>, queue: UnboundedSender<Vec<u8>>) {
    loop {
        match rx.next() {
            Ok(frame) => {
                if queue.send(frame.to_vec()).is_err() {
                    break;
                }
            }
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                if queue.is_closed() {
                    break;
                }
            }
            Err(e) => {
                debug!("capture reader stopped: {e}");
                break;
            }
        }
    }
    trace!("capture reader exited");
}

fn open_eth_channel<F>(
    intf: &NetworkInterface,
    cfg: &Config,
    channel_opener: F,
) -> io::Result<(Box<dyn DataLinkSender>, Box<dyn DataLinkReceiver>)>
where
    F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>,
{
    match channel_opener(intf, *cfg)? {
        Channel::Ethernet(tx, rx) => {
            debug!("capture session opened on {}", intf.name);
            Ok((tx, rx))
        }
        _ => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("non-ethernet channel for {}", intf.name),
        )),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
