//! In-memory process image collaborator
//!
//! [`SimulatedTransport`] answers every request the way the piControl driver
//! does, against a process image held in memory. Clones share state, so a
//! test can hand one clone to a client and inspect the image, the request
//! log and the driver state through another.

use crate::error::{Result, TransportError};
use crate::traits::{ControlRequest, ImageHandle, Transport};
use nix::errno::Errno;
use picontrol_protocol::{
    DEFAULT_DEVICE_PATH, DeviceInfo, DeviceSelector, LAST_MESSAGE_LEN, MAX_DEVICES,
    PROCESS_IMAGE_SIZE, Request, SpiVariable, VariableName,
};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Kind of operation, used to inject failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Acquiring a handle
    Open,
    /// Repositioning the cursor
    Seek,
    /// Reading bytes
    Read,
    /// Writing bytes
    Write,
    /// Issuing a control request
    Control,
}

/// One call that reached the simulated collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// Handle acquisition attempt
    Open,
    /// Handle released
    Close,
    /// Cursor moved to the offset
    Seek(u32),
    /// Read of the given length
    Read(usize),
    /// Write of the given length
    Write(usize),
    /// Control request
    Control(Request),
}

impl Call {
    /// Whether the call is a byte-range transfer.
    pub fn is_transfer(&self) -> bool {
        matches!(self, Self::Read(_) | Self::Write(_))
    }
}

#[derive(Debug)]
struct SimState {
    image: Vec<u8>,
    available: bool,
    devices: Vec<DeviceInfo>,
    variables: HashMap<VariableName, SpiVariable>,
    events: VecDeque<i32>,
    last_message: String,
    counter_resets: Vec<(u8, u16)>,
    firmware_updates: Vec<Option<u32>>,
    resets: usize,
    transfer_limit: Option<usize>,
    failures: HashMap<Operation, Errno>,
    calls: Vec<Call>,
}

/// Simulated piControl driver
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    state: Arc<Mutex<SimState>>,
    path: PathBuf,
}

impl SimulatedTransport {
    /// Create a collaborator with a zeroed process image of `size` bytes
    pub fn new(size: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                image: vec![0; size],
                available: true,
                devices: Vec::new(),
                variables: HashMap::new(),
                events: VecDeque::new(),
                last_message: String::new(),
                counter_resets: Vec::new(),
                firmware_updates: Vec::new(),
                resets: 0,
                transfer_limit: None,
                failures: HashMap::new(),
                calls: Vec::new(),
            })),
            path: PathBuf::from(DEFAULT_DEVICE_PATH),
        }
    }

    /// Register a device
    pub fn with_device(self, device: DeviceInfo) -> Self {
        self.lock().devices.push(device);
        self
    }

    /// Register a variable
    ///
    /// The name is stored the way the driver stores it, so names longer
    /// than the field are registered under their truncated form.
    pub fn with_variable(self, name: &str, offset: u16, bit: u8, length: u16) -> Self {
        let key = VariableName::truncating(name);
        let record = SpiVariable {
            name: *key.as_raw(),
            address: offset,
            bit,
            length,
        };
        self.lock().variables.insert(key, record);
        self
    }

    /// Set the message returned by the last-message request
    pub fn with_last_message(self, message: impl Into<String>) -> Self {
        self.lock().last_message = message.into();
        self
    }

    /// Make every open attempt fail, as if the device node were missing
    pub fn unavailable(self) -> Self {
        self.set_available(false);
        self
    }

    /// Toggle whether open attempts succeed
    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }

    /// Fail the next operation of `kind` with `errno`
    pub fn fail_next(&self, kind: Operation, errno: Errno) {
        self.lock().failures.insert(kind, errno);
    }

    /// Cap every transfer at `limit` bytes to produce short reads and writes
    pub fn set_transfer_limit(&self, limit: Option<usize>) {
        self.lock().transfer_limit = limit;
    }

    /// Queue an event for the wait-for-event request
    pub fn push_event(&self, event: i32) {
        self.lock().events.push_back(event);
    }

    /// Overwrite image bytes directly, bypassing the request log
    pub fn poke(&self, offset: usize, data: &[u8]) {
        self.lock().image[offset..offset + data.len()].copy_from_slice(data);
    }

    /// Copy of the whole process image
    pub fn image(&self) -> Vec<u8> {
        self.lock().image.clone()
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Forget the recorded calls
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Number of reset requests served
    pub fn resets(&self) -> usize {
        self.lock().resets
    }

    /// Counter resets served, as `(address, bitfield)`
    pub fn counter_resets(&self) -> Vec<(u8, u16)> {
        self.lock().counter_resets.clone()
    }

    /// Firmware updates served, by module address
    pub fn firmware_updates(&self) -> Vec<Option<u32>> {
        self.lock().firmware_updates.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new(PROCESS_IMAGE_SIZE)
    }
}

impl Transport for SimulatedTransport {
    type Handle = SimulatedHandle;

    fn open(&self) -> Result<SimulatedHandle> {
        let mut state = self.lock();
        state.calls.push(Call::Open);

        let injected = state.failures.remove(&Operation::Open);
        let errno = injected.or((!state.available).then_some(Errno::ENOENT));
        if let Some(errno) = errno {
            return Err(TransportError::Unavailable {
                path: self.path.clone(),
                errno,
            });
        }

        Ok(SimulatedHandle {
            state: Arc::clone(&self.state),
            cursor: 0,
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Open handle on a [`SimulatedTransport`]
#[derive(Debug)]
pub struct SimulatedHandle {
    state: Arc<Mutex<SimState>>,
    cursor: usize,
}

impl SimulatedHandle {
    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Range `len` bytes from the cursor, limited like the driver limits it.
    fn transfer_range(&self, state: &SimState, len: usize) -> Result<std::ops::Range<usize>> {
        let len = state.transfer_limit.map_or(len, |limit| len.min(limit));
        let end = self
            .cursor
            .checked_add(len)
            .filter(|end| *end <= state.image.len())
            .ok_or(TransportError::Transfer {
                errno: Errno::EINVAL,
            })?;
        Ok(self.cursor..end)
    }
}

impl ImageHandle for SimulatedHandle {
    fn seek(&mut self, offset: u32) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call::Seek(offset));
        if let Some(errno) = state.failures.remove(&Operation::Seek) {
            return Err(TransportError::Seek { offset, errno });
        }
        drop(state);

        self.cursor = offset as usize;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut state = self.lock();
        state.calls.push(Call::Read(buf.len()));
        if let Some(errno) = state.failures.remove(&Operation::Read) {
            return Err(TransportError::Transfer { errno });
        }

        let range = self.transfer_range(&state, buf.len())?;
        let n = range.len();
        buf[..n].copy_from_slice(&state.image[range]);
        drop(state);

        self.cursor += n;
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let mut state = self.lock();
        state.calls.push(Call::Write(data.len()));
        if let Some(errno) = state.failures.remove(&Operation::Write) {
            return Err(TransportError::Transfer { errno });
        }

        let range = self.transfer_range(&state, data.len())?;
        let n = range.len();
        state.image[range].copy_from_slice(&data[..n]);
        drop(state);

        self.cursor += n;
        Ok(n)
    }

    fn control(&mut self, request: ControlRequest<'_>) -> Result<i32> {
        let kind = request.request();
        let mut state = self.lock();
        state.calls.push(Call::Control(kind));
        if let Some(errno) = state.failures.remove(&Operation::Control) {
            return Err(TransportError::Control {
                request: kind,
                errno,
            });
        }

        serve(&mut state, request).map_err(|errno| TransportError::Control {
            request: kind,
            errno,
        })
    }
}

impl Drop for SimulatedHandle {
    fn drop(&mut self) {
        self.lock().calls.push(Call::Close);
    }
}

/// Answer one control request against the simulated driver state.
fn serve(state: &mut SimState, request: ControlRequest<'_>) -> std::result::Result<i32, Errno> {
    match request {
        ControlRequest::Reset => {
            state.resets += 1;
            state.events.push_back(1);
            Ok(0)
        }
        ControlRequest::GetDeviceInfoList(list) => {
            let count = state.devices.len().min(MAX_DEVICES);
            list[..count].copy_from_slice(&state.devices[..count]);
            Ok(count as i32)
        }
        ControlRequest::GetDeviceInfo(info) => {
            let selector = if info.module_type != 0 {
                DeviceSelector::ModuleType(info.module_type)
            } else {
                DeviceSelector::Address(info.address)
            };
            let device = state
                .devices
                .iter()
                .find(|device| selector.matches(device))
                .ok_or(Errno::ENXIO)?;
            *info = *device;
            Ok(0)
        }
        ControlRequest::GetBitValue(value) => {
            let byte = bit_byte(state, value.address, value.bit)?;
            value.value = (*byte >> value.bit) & 1;
            Ok(0)
        }
        ControlRequest::SetBitValue(value) => {
            let byte = bit_byte(state, value.address, value.bit)?;
            if value.is_set() {
                *byte |= 1 << value.bit;
            } else {
                *byte &= !(1 << value.bit);
            }
            Ok(0)
        }
        ControlRequest::FindVariable(variable) => {
            let key = VariableName::from_raw(variable.name);
            let found = state.variables.get(&key).ok_or(Errno::ENOENT)?;
            variable.address = found.address;
            variable.bit = found.bit;
            variable.length = found.length;
            Ok(0)
        }
        ControlRequest::DioResetCounter(counter) => {
            if !state.devices.iter().any(|d| d.address == counter.address) {
                return Err(Errno::EINVAL);
            }
            state.counter_resets.push((counter.address, counter.bitfield));
            Ok(0)
        }
        ControlRequest::UpdateDeviceFirmware(address) => {
            state.firmware_updates.push(address);
            Ok(0)
        }
        ControlRequest::GetLastMessage(message) => {
            message.fill(0);
            let bytes = state.last_message.as_bytes();
            let len = bytes.len().min(LAST_MESSAGE_LEN - 1);
            message[..len].copy_from_slice(&bytes[..len]);
            Ok(0)
        }
        ControlRequest::WaitForEvent(event) => {
            *event = state.events.pop_front().ok_or(Errno::EAGAIN)?;
            Ok(0)
        }
    }
}

/// Byte holding bit `bit` at `address`, rejecting what the driver rejects.
fn bit_byte(state: &mut SimState, address: u16, bit: u8) -> std::result::Result<&mut u8, Errno> {
    if bit > 7 {
        return Err(Errno::EINVAL);
    }
    state.image.get_mut(usize::from(address)).ok_or(Errno::EFAULT)
}
