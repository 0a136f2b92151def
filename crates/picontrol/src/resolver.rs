//! Variable name resolution

use picontrol_protocol::{SpiVariable, Variable, VariableName};
use picontrol_transport::{ControlRequest, Transport, TransportError};
use tracing::{debug, warn};

use crate::{
    client::ProcessImageClient,
    config::NamePolicy,
    error::{Error, Result},
};

impl<T: Transport> ProcessImageClient<T> {
    /// Encode `name` for the driver according to the configured policy.
    pub(crate) fn variable_name(&self, name: &str) -> Result<VariableName> {
        match self.config().name_policy {
            NamePolicy::Reject => Ok(VariableName::strict(name)?),
            NamePolicy::Truncate => {
                let encoded = VariableName::truncating(name);
                if encoded.truncated_from(name) {
                    warn!(name, sent = %encoded, "Variable name truncated");
                }
                Ok(encoded)
            }
        }
    }

    /// Look up a variable by name.
    ///
    /// # Errors
    ///
    /// [`Error::Resolution`] when the driver does not know the name,
    /// [`Error::InvalidName`] when strict names are enabled and the name does
    /// not fit, or a transport error when the device is unavailable.
    pub fn resolve_variable(&mut self, name: &str) -> Result<Variable> {
        let mut lookup = SpiVariable::lookup(self.variable_name(name)?);

        match self.control(ControlRequest::FindVariable(&mut lookup)) {
            Ok(_) => {}
            Err(Error::Transport(TransportError::Control { errno, .. })) => {
                return Err(Error::Resolution {
                    name: name.to_string(),
                    errno,
                });
            }
            Err(e) => return Err(e),
        }

        let variable = Variable::from(lookup);
        debug!(
            name,
            offset = variable.offset,
            bit = variable.bit,
            length = variable.length,
            "Resolved variable"
        );
        Ok(variable)
    }

    /// Byte offset of a variable in the process image.
    pub fn find_variable(&mut self, name: &str) -> Result<u16> {
        Ok(self.resolve_variable(name)?.offset)
    }

    /// Whether the driver knows a variable by this name.
    ///
    /// Any failure, including an unavailable device, counts as "no".
    pub fn variable_exists(&mut self, name: &str) -> bool {
        self.resolve_variable(name).is_ok()
    }
}
