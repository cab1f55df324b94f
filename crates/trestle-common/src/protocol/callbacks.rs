use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Resolution of a previously issued callback parameter.
///
/// Sent native→script. `handle` is the opaque correlation token minted when
/// the owning call was dispatched; `args` carries the callback's arguments
/// in exactly the order the native handler supplied them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackMessage {
    pub handle: String,
    pub args: Vec<Value>,
}

impl CallbackMessage {
    pub fn new(handle: impl Into<String>, args: Vec<Value>) -> Self {
        CallbackMessage {
            handle: handle.into(),
            args,
        }
    }
}
