//! One interface's probe cycle.
//!
//! The task selects a network, opens a capture session and spawns a listener
//! before the first probe leaves, so no reply can race the listener. Probes
//! are written synchronously on the blocking pool. The task then waits for
//! the deadline, stops the listener and drains whatever is still queued.

use std::sync::Arc;
use std::time::Duration;

use arpsweep_common::error::ScanError;
use arpsweep_common::network::device::DeviceInfo;
use arpsweep_common::network::subnet::{self, ScanNetwork};
use arpsweep_common::vendors::VendorLookup;
use arpsweep_protocols::arp;
use pnet::datalink::NetworkInterface;
use pnet::util::MacAddr;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, error, trace};

use crate::network::channel::{CaptureHandle, CaptureOptions, FrameWriter, Transport};

/// Used when `now + timeout` does not fit in an [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

pub(crate) struct InterfaceScan {
    pub(crate) intf: NetworkInterface,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) vendors: Arc<dyn VendorLookup>,
    pub(crate) sink: UnboundedSender<DeviceInfo>,
}

impl InterfaceScan {
    /// Runs until `timeout` has elapsed since the call and returns the number
    /// of replies collected.
    ///
    /// A write failure stops the sweep but not the listener; it is reported
    /// once the deadline has passed.
    pub(crate) async fn run(self, timeout: Duration) -> Result<usize, ScanError> {
        let deadline = deadline_after(timeout);

        let network: ScanNetwork = subnet::select_network(&self.intf)?;
        let src_mac: MacAddr = self
            .intf
            .mac
            .ok_or_else(|| ScanError::MissingHardwareAddress {
                interface: self.intf.name.clone(),
            })?;
        debug!(
            "using network range {} mask {} (broadcast {}) for interface {}",
            network.network(),
            network.mask(),
            network.broadcast(),
            self.intf.name
        );

        let CaptureHandle { writer, frames } = self
            .transport
            .open(&self.intf, &CaptureOptions::for_timeout(timeout))?;

        let (stop_tx, stop_rx) = oneshot::channel();
        let listener = tokio::spawn(listen(
            frames,
            src_mac,
            self.vendors.clone(),
            self.sink.clone(),
            stop_rx,
        ));

        let interface = self.intf.name.clone();
        let send_deadline = deadline.into_std();
        let sent = tokio::task::spawn_blocking(move || {
            send_probes(writer, &interface, src_mac, network, send_deadline)
        })
        .await
        .unwrap_or_else(|e| {
            Err(ScanError::TransportWriteFailed {
                interface: self.intf.name.clone(),
                source: std::io::Error::other(e.to_string()),
            })
        });

        tokio::time::sleep_until(deadline).await;
        let _ = stop_tx.send(());

        let replies = listener.await.unwrap_or_else(|e| {
            error!("listener on {} aborted: {e}", self.intf.name);
            0
        });

        sent.map(|_| replies)
    }
}

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

fn send_probes(
    mut writer: Box<dyn FrameWriter>,
    interface: &str,
    src_mac: MacAddr,
    network: ScanNetwork,
    deadline: std::time::Instant,
) -> Result<usize, ScanError> {
    let mut sent = 0;
    for target in network.targets() {
        if std::time::Instant::now() >= deadline {
            debug!("deadline reached on {interface} after {sent} probes");
            break;
        }
        trace!("probing {} below {}", target.addr, target.broadcast);
        let frame = arp::create_request(src_mac, network.addr(), target.addr)?;
        writer
            .write(&frame)
            .map_err(|source| ScanError::TransportWriteFailed {
                interface: interface.to_string(),
                source,
            })?;
        sent += 1;
    }
    debug!("{sent} probes written on {interface}");
    Ok(sent)
}

async fn listen(
    mut frames: UnboundedReceiver<Vec<u8>>,
    own_mac: MacAddr,
    vendors: Arc<dyn VendorLookup>,
    sink: UnboundedSender<DeviceInfo>,
    mut stop: oneshot::Receiver<()>,
) -> usize {
    let mut found = 0;

    loop {
        tokio::select! {
            biased;
            _ = &mut stop => break,
            frame = frames.recv() => match frame {
                Some(bytes) => found += record_reply(&bytes, own_mac, vendors.as_ref(), &sink),
                None => break,
            },
        }
    }

    frames.close();
    while let Ok(bytes) = frames.try_recv() {
        found += record_reply(&bytes, own_mac, vendors.as_ref(), &sink);
    }
    found
}

fn record_reply(
    bytes: &[u8],
    own_mac: MacAddr,
    vendors: &dyn VendorLookup,
    sink: &UnboundedSender<DeviceInfo>,
) -> usize {
    let Some(reply) = arp::classify_reply(bytes, own_mac) else {
        return 0;
    };
    debug!("IP {} is at {}", reply.sender_ip, reply.sender_mac);

    let device = DeviceInfo::new(reply.sender_ip, reply.sender_mac)
        .with_vendor(vendors.lookup(reply.sender_mac));
    match sink.send(device) {
        Ok(()) => 1,
        Err(_) => 0,
    }
}
