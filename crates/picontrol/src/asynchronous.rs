//! Async wrapper for the process image client
//!
//! Every call runs the blocking client on tokio's blocking pool, one call at
//! a time. When a timeout is configured, a call that does not finish in time
//! returns [`Error::Timeout`]; the blocking call itself keeps running until
//! the driver returns and holds the client until then.

use std::sync::Arc;
use std::time::Duration;

use picontrol_protocol::{DeviceInfo, DeviceSelector, Event, Variable};
use picontrol_transport::{DeviceTransport, Transport};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{
    client::ProcessImageClient,
    config::ClientConfig,
    error::{Error, Result},
    value::VariableValue,
};

/// Shareable async handle on a [`ProcessImageClient`].
///
/// Cloning is cheap; all clones drive the same client.
///
/// # Example
///
/// ```rust,no_run
/// use picontrol::{AsyncProcessImageClient, ClientConfig};
/// use std::time::Duration;
///
/// # async fn example() -> picontrol::Result<()> {
/// let config = ClientConfig::default().with_timeout(Duration::from_millis(500));
/// let client = AsyncProcessImageClient::with_config(config);
/// let value = client.read_variable("Counter_1").await?;
/// println!("Counter_1 = {value}");
/// # Ok(())
/// # }
/// ```
pub struct AsyncProcessImageClient<T: Transport = DeviceTransport> {
    inner: Arc<Mutex<ProcessImageClient<T>>>,
    timeout: Option<Duration>,
}

impl AsyncProcessImageClient<DeviceTransport> {
    /// Create an async client for the device node named in `config`.
    pub fn with_config(config: ClientConfig) -> Self {
        Self::from_client(ProcessImageClient::with_config(config))
    }

    /// Create an async client configured from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_client(ProcessImageClient::from_env()?))
    }
}

impl<T> AsyncProcessImageClient<T>
where
    T: Transport + Send + 'static,
    T::Handle: Send,
{
    /// Wrap a blocking client, taking the timeout from its configuration.
    pub fn from_client(client: ProcessImageClient<T>) -> Self {
        let timeout = client.config().timeout;
        Self {
            inner: Arc::new(Mutex::new(client)),
            timeout,
        }
    }

    /// Timeout applied to each call.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run `f` against the blocking client on the blocking pool.
    pub async fn call<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut ProcessImageClient<T>) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let task = tokio::task::spawn_blocking(move || {
            let mut client = inner.blocking_lock();
            f(&mut *client)
        });

        let joined = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
                warn!(timeout = ?limit, "Process image call timed out");
                Error::Timeout(limit)
            })?,
            None => task.await,
        };

        joined.map_err(|e| Error::Task(e.to_string()))?
    }

    /// See [`ProcessImageClient::open`].
    pub async fn open(&self) -> Result<()> {
        self.call(|client| client.open()).await
    }

    /// See [`ProcessImageClient::close`].
    pub async fn close(&self) -> Result<()> {
        self.call(|client| {
            client.close();
            Ok(())
        })
        .await
    }

    /// See [`ProcessImageClient::reset`].
    pub async fn reset(&self) -> Result<()> {
        self.call(|client| client.reset()).await
    }

    /// See [`ProcessImageClient::read_vec`].
    pub async fn read(&self, offset: u32, length: usize) -> Result<Vec<u8>> {
        self.call(move |client| client.read_vec(offset, length)).await
    }

    /// See [`ProcessImageClient::write`].
    pub async fn write(&self, offset: u32, data: Vec<u8>) -> Result<usize> {
        self.call(move |client| client.write(offset, &data)).await
    }

    /// See [`ProcessImageClient::device_info`].
    pub async fn device_info(&self, selector: DeviceSelector) -> Result<DeviceInfo> {
        self.call(move |client| client.device_info(selector)).await
    }

    /// See [`ProcessImageClient::device_info_list`].
    pub async fn device_info_list(&self) -> Result<Vec<DeviceInfo>> {
        self.call(|client| client.device_info_list()).await
    }

    /// See [`ProcessImageClient::resolve_variable`].
    pub async fn resolve_variable(&self, name: impl Into<String>) -> Result<Variable> {
        let name = name.into();
        self.call(move |client| client.resolve_variable(&name)).await
    }

    /// See [`ProcessImageClient::find_variable`].
    pub async fn find_variable(&self, name: impl Into<String>) -> Result<u16> {
        let name = name.into();
        self.call(move |client| client.find_variable(&name)).await
    }

    /// See [`ProcessImageClient::variable_exists`]. A timed out call counts as "no".
    pub async fn variable_exists(&self, name: impl Into<String>) -> bool {
        let name = name.into();
        self.call(move |client| Ok(client.variable_exists(&name)))
            .await
            .unwrap_or(false)
    }

    /// See [`ProcessImageClient::get_bit`].
    pub async fn get_bit(&self, offset: u16, bit: u8) -> Result<bool> {
        self.call(move |client| client.get_bit(offset, bit)).await
    }

    /// See [`ProcessImageClient::set_bit`].
    pub async fn set_bit(&self, offset: u16, bit: u8, value: bool) -> Result<()> {
        self.call(move |client| client.set_bit(offset, bit, value)).await
    }

    /// See [`ProcessImageClient::read_variable`].
    pub async fn read_variable(&self, name: impl Into<String>) -> Result<VariableValue> {
        let name = name.into();
        self.call(move |client| client.read_variable(&name)).await
    }

    /// See [`ProcessImageClient::write_variable`].
    pub async fn write_variable(&self, name: impl Into<String>, value: u32) -> Result<VariableValue> {
        let name = name.into();
        self.call(move |client| client.write_variable(&name, value)).await
    }

    /// See [`ProcessImageClient::reset_counter`].
    pub async fn reset_counter(&self, address: u8, bitfield: u16) -> Result<()> {
        self.call(move |client| client.reset_counter(address, bitfield)).await
    }

    /// See [`ProcessImageClient::wait_for_event`].
    pub async fn wait_for_event(&self) -> Result<Event> {
        self.call(|client| client.wait_for_event()).await
    }

    /// See [`ProcessImageClient::update_firmware`].
    pub async fn update_firmware(&self, address: Option<u32>) -> Result<Option<String>> {
        self.call(move |client| client.update_firmware(address)).await
    }
}

impl<T: Transport> Clone for AsyncProcessImageClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            timeout: self.timeout,
        }
    }
}

impl<T: Transport> std::fmt::Debug for AsyncProcessImageClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncProcessImageClient")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
