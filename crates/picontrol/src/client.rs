//! Process image client
//!
//! [`ProcessImageClient`] owns at most one handle on the process image. The
//! handle is opened by the first operation that needs it and released by
//! [`ProcessImageClient::close`] or when the client is dropped.

use picontrol_protocol::{
    DeviceInfo, DeviceSelector, DioResetCounter, Event, LAST_MESSAGE_LEN, MAX_DEVICES,
};
use picontrol_transport::{ControlRequest, DeviceTransport, ImageHandle, Transport};
use tracing::{debug, trace, warn};

use crate::{config::ClientConfig, error::Result};

/// Lifecycle state of the client's handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// No handle held
    Closed,
    /// Handle acquired and usable
    Open,
}

/// Client for the piControl process image.
///
/// All operations block and take `&mut self`; a client is meant to be used
/// from one thread at a time.
///
/// # Example
///
/// ```rust,no_run
/// use picontrol::ProcessImageClient;
///
/// let mut client = ProcessImageClient::new();
/// let led = client.resolve_variable("RevPiLED")?;
/// client.write(u32::from(led.offset), &[0x01])?;
/// # Ok::<(), picontrol::Error>(())
/// ```
pub struct ProcessImageClient<T: Transport = DeviceTransport> {
    transport: T,
    handle: Option<T::Handle>,
    config: ClientConfig,
}

impl ProcessImageClient<DeviceTransport> {
    /// Create a client for the default device node.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client for the device node named in `config`.
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = DeviceTransport::new(config.device_path.clone());
        Self::with_transport(transport, config)
    }

    /// Create a client configured from the environment.
    ///
    /// See [`ClientConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_config(ClientConfig::from_env()?))
    }
}

impl Default for ProcessImageClient<DeviceTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> ProcessImageClient<T> {
    /// Create a client over a custom transport.
    ///
    /// `config.device_path` is not used; the transport decides what it opens.
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            handle: None,
            config,
        }
    }

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Transport the client opens handles from.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current handle state.
    pub fn state(&self) -> HandleState {
        if self.handle.is_some() {
            HandleState::Open
        } else {
            HandleState::Closed
        }
    }

    /// Whether a handle is held.
    pub fn is_open(&self) -> bool {
        self.state() == HandleState::Open
    }

    /// Acquire the handle if none is held.
    ///
    /// Operations call this themselves; calling it up front only moves the
    /// failure earlier. A failed attempt leaves the client closed and the
    /// next operation tries again.
    pub fn open(&mut self) -> Result<()> {
        self.handle().map(|_| ())
    }

    /// Release the handle if one is held. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            debug!(path = %self.transport.path().display(), "Released process image handle");
        }
    }

    pub(crate) fn handle(&mut self) -> Result<&mut T::Handle> {
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => {
                let handle = self.transport.open().inspect_err(|e| {
                    warn!(path = %self.transport.path().display(), error = %e, "Process image unavailable");
                })?;
                debug!(path = %self.transport.path().display(), "Acquired process image handle");
                handle
            }
        };
        Ok(self.handle.insert(handle))
    }

    /// Issue a control request on the (lazily opened) handle.
    pub(crate) fn control(&mut self, request: ControlRequest<'_>) -> Result<i32> {
        let kind = request.request();
        let result = self.handle()?.control(request);
        match &result {
            Ok(status) => trace!(request = %kind, status, "Control request completed"),
            Err(e) => debug!(request = %kind, error = %e, "Control request rejected"),
        }
        Ok(result?)
    }

    /// Ask the driver to reinitialize the process image.
    pub fn reset(&mut self) -> Result<()> {
        self.control(ControlRequest::Reset)?;
        debug!("Process image reset");
        Ok(())
    }

    /// Read process data at `offset` into `buf`.
    ///
    /// Issues a single read; returns the number of bytes actually read,
    /// which may be less than `buf.len()`.
    pub fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<usize> {
        let handle = self.handle()?;
        handle.seek(offset)?;
        let n = handle.read(buf)?;
        trace!(offset, requested = buf.len(), read = n, "Read process data");
        Ok(n)
    }

    /// Read up to `length` bytes at `offset` into a new buffer.
    ///
    /// The buffer is cut to the number of bytes actually read.
    pub fn read_vec(&mut self, offset: u32, length: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; length];
        let n = self.read(offset, &mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Write `data` at `offset`.
    ///
    /// Issues a single write; returns the number of bytes actually written,
    /// which may be less than `data.len()`.
    pub fn write(&mut self, offset: u32, data: &[u8]) -> Result<usize> {
        let handle = self.handle()?;
        handle.seek(offset)?;
        let n = handle.write(data)?;
        trace!(offset, requested = data.len(), written = n, "Wrote process data");
        Ok(n)
    }

    /// Describe one device, looked up by address or module type.
    pub fn device_info(&mut self, selector: DeviceSelector) -> Result<DeviceInfo> {
        let mut info = selector.to_request();
        self.control(ControlRequest::GetDeviceInfo(&mut info))?;
        Ok(info)
    }

    /// Describe the connected devices.
    ///
    /// At most [`MAX_DEVICES`] devices are reported; any beyond that are
    /// left out by the driver.
    pub fn device_info_list(&mut self) -> Result<Vec<DeviceInfo>> {
        let mut list = [DeviceInfo::default(); MAX_DEVICES];
        let count = self.device_info_list_into(&mut list)?;
        Ok(list[..count].to_vec())
    }

    /// Fill `list` with device descriptors and return how many were filled.
    pub fn device_info_list_into(&mut self, list: &mut [DeviceInfo; MAX_DEVICES]) -> Result<usize> {
        let reported = self.control(ControlRequest::GetDeviceInfoList(list))?;
        let count = usize::try_from(reported).unwrap_or(0).min(MAX_DEVICES);
        debug!(reported, count, "Listed devices");
        Ok(count)
    }

    /// Reset the counters selected by `bitfield` on the DIO module at `address`.
    pub fn reset_counter(&mut self, address: u8, bitfield: u16) -> Result<()> {
        let request = DioResetCounter { address, bitfield };
        self.control(ControlRequest::DioResetCounter(&request))?;
        Ok(())
    }

    /// Block until the driver reports an event.
    pub fn wait_for_event(&mut self) -> Result<Event> {
        let mut raw = 0;
        self.control(ControlRequest::WaitForEvent(&mut raw))?;
        Ok(Event::from(raw))
    }

    /// Start a firmware update and fetch the driver's message about it.
    ///
    /// With `None` the driver picks the module to update. Returns the
    /// driver's last message when it has one.
    pub fn update_firmware(&mut self, address: Option<u32>) -> Result<Option<String>> {
        self.control(ControlRequest::UpdateDeviceFirmware(address))?;

        let mut message = [0u8; LAST_MESSAGE_LEN];
        if let Err(e) = self.control(ControlRequest::GetLastMessage(&mut message)) {
            warn!(error = %e, "Firmware update started but no message available");
            return Ok(None);
        }

        let end = message.iter().position(|b| *b == 0).unwrap_or(message.len());
        Ok((end > 0).then(|| String::from_utf8_lossy(&message[..end]).into_owned()))
    }
}

impl<T: Transport> Drop for ProcessImageClient<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T: Transport> std::fmt::Debug for ProcessImageClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessImageClient")
            .field("path", &self.transport.path())
            .field("state", &self.state())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picontrol_transport::{Call, SimulatedTransport};

    fn client(sim: &SimulatedTransport) -> ProcessImageClient<SimulatedTransport> {
        ProcessImageClient::with_transport(sim.clone(), ClientConfig::default())
    }

    #[test]
    fn test_new_client_is_closed() {
        let sim = SimulatedTransport::new(16);
        let client = client(&sim);
        assert_eq!(client.state(), HandleState::Closed);
        assert!(sim.calls().is_empty());
    }

    #[test]
    fn test_open_is_idempotent() {
        let sim = SimulatedTransport::new(16);
        let mut client = client(&sim);

        client.open().unwrap();
        client.open().unwrap();

        assert!(client.is_open());
        assert_eq!(sim.calls(), vec![Call::Open]);
    }

    #[test]
    fn test_drop_releases_handle() {
        let sim = SimulatedTransport::new(16);
        {
            let mut client = client(&sim);
            client.open().unwrap();
        }
        assert_eq!(sim.calls(), vec![Call::Open, Call::Close]);
    }

    #[test]
    fn test_update_firmware_returns_message() {
        let sim = SimulatedTransport::new(16).with_last_message("Update of module 31 started");
        let mut client = client(&sim);

        let message = client.update_firmware(Some(31)).unwrap();

        assert_eq!(message.as_deref(), Some("Update of module 31 started"));
        assert_eq!(sim.firmware_updates(), vec![Some(31)]);
    }

    #[test]
    fn test_update_firmware_without_message() {
        let sim = SimulatedTransport::new(16);
        let mut client = client(&sim);
        assert_eq!(client.update_firmware(None).unwrap(), None);
    }
}
