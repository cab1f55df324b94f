pub mod callbacks;
pub mod calls;
pub mod error;


pub use callbacks::CallbackMessage;
pub use calls::{CallMessage, ExtensionName, MethodName};
pub use error::{BridgeError, Result};

use serde::{Deserialize, Serialize};

/// Either message kind, as it travels over a transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Call(CallMessage),
    Callback(CallbackMessage),
}

impl From<CallMessage> for Message {
    fn from(message: CallMessage) -> Self {
        Message::Call(message)
    }
}

impl From<CallbackMessage> for Message {
    fn from(message: CallbackMessage) -> Self {
        Message::Callback(message)
    }
}
