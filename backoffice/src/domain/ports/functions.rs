//! Port for invoking the gateway's serverless functions.
//!
//! Used at minimum for the `contact-notification` email function. The
//! payload and result are opaque JSON; each calling service owns its own
//! payload shape.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Failures raised by callable-function adapters.
    pub enum FunctionError {
        /// The function endpoint could not be reached.
        Transport { message: String } => "function transport failed: {message}",
        /// The invocation exceeded its deadline.
        Timeout { message: String } => "function invocation timed out: {message}",
        /// The function ran and rejected the payload.
        Rejected { status: u16, message: String } => "function rejected the payload ({status}): {message}",
    }
}

/// Outbound port for invoking a named serverless function.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    /// Invoke `name` with a JSON payload and return the JSON result.
    async fn invoke(&self, name: &str, payload: &Value) -> Result<Value, FunctionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages_carry_the_status() {
        let err = FunctionError::rejected(422_u16, "missing email");
        assert_eq!(
            err.to_string(),
            "function rejected the payload (422): missing email"
        );
    }
}
