//! The scan orchestrator.
//!
//! Every interface the [`InterfaceSource`] reports gets its own task, and all
//! tasks share the same time budget. A failing interface is logged and
//! contributes nothing; the others keep running. The only state shared
//! between tasks is the result queue.
//!
//! Results are not deduplicated: a host seen from two interfaces is reported
//! twice.

use std::sync::Arc;
use std::time::Duration;

use arpsweep_common::error::ScanError;
use arpsweep_common::network::device::DeviceInfo;
use arpsweep_common::system::InterfaceSource;
use arpsweep_common::vendors::VendorLookup;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span};

use crate::network::channel::{PnetTransport, Transport};
use crate::system::SystemInterfaces;

mod task;

use task::InterfaceScan;

pub struct Scanner {
    interfaces: Arc<dyn InterfaceSource>,
    transport: Arc<dyn Transport>,
    vendors: Arc<dyn VendorLookup>,
}

impl Scanner {
    pub fn new(
        interfaces: Arc<dyn InterfaceSource>,
        transport: Arc<dyn Transport>,
        vendors: Arc<dyn VendorLookup>,
    ) -> Self {
        Self {
            interfaces,
            transport,
            vendors,
        }
    }

    /// Scanner over the host's interfaces and raw data link channels.
    pub fn system(vendors: Arc<dyn VendorLookup>) -> Self {
        Self::new(Arc::new(SystemInterfaces), Arc::new(PnetTransport), vendors)
    }

    /// Probes every interface in parallel for `timeout` and returns all replies.
    ///
    /// Fails only when the interfaces cannot be enumerated.
    pub async fn scan(&self, timeout: Duration) -> Result<Vec<DeviceInfo>, ScanError> {
        let interfaces = self.interfaces.interfaces().map_err(|e| match e {
            ScanError::NoInterfaces(_) => e,
            other => ScanError::NoInterfaces(other.to_string()),
        })?;
        if interfaces.is_empty() {
            return Err(ScanError::NoInterfaces("no interfaces reported".to_string()));
        }

        let (sink, mut results) = mpsc::unbounded_channel::<DeviceInfo>();
        let mut tasks = JoinSet::new();

        for intf in interfaces {
            let name = intf.name.clone();
            let span = info_span!("interface", name = %name);
            let scan = InterfaceScan {
                intf,
                transport: self.transport.clone(),
                vendors: self.vendors.clone(),
                sink: sink.clone(),
            };
            tasks.spawn(async move { (name, scan.run(timeout).await) }.instrument(span));
        }
        drop(sink);

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Ok(found))) => debug!("{name}: {found} replies"),
                Ok((_, Err(e))) => info!("{e}"),
                Err(e) => error!("interface task aborted: {e}"),
            }
        }

        let mut devices = Vec::new();
        while let Ok(device) = results.try_recv() {
            devices.push(device);
        }
        Ok(devices)
    }
}
