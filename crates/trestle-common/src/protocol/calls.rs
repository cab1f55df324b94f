use crate::value::Value;
use serde::{Deserialize, Serialize};

pub type ExtensionName = String;
pub type MethodName = String;

/// A method call crossing the bridge.
///
/// Sent script→native to invoke a bound method, or native→script as a
/// broadcast (a degenerate call with no return path and no handle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallMessage {
    pub extension: ExtensionName,
    pub method: MethodName,
    pub args: Vec<Value>,
}

impl CallMessage {
    pub fn new(
        extension: impl Into<String>,
        method: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        CallMessage {
            extension: extension.into(),
            method: method.into(),
            args,
        }
    }
}
