use std::sync::Mutex;

use serde_json::Value;

use passkey_bridge::{BridgeError, EventChannel};

/// Records every outbound event instead of sending it.
#[derive(Default)]
pub struct SpyChannel {
    sent: Mutex<Vec<(String, Value)>>,
}

impl SpyChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent(&self) -> Vec<(String, Value)> {
        self.sent.lock().unwrap().clone()
    }

    /// The `response` body of the only event sent.
    pub fn single_response(&self) -> Value {
        let sent = self.sent();
        assert_eq!(sent.len(), 1, "expected exactly one outbound event");
        assert_eq!(sent[0].0, "client_response");
        sent[0].1["response"].clone()
    }
}

impl EventChannel for SpyChannel {
    fn push_event(&self, event: &str, payload: Value) -> Result<(), BridgeError> {
        self.sent
            .lock()
            .unwrap()
            .push((event.to_string(), payload));
        Ok(())
    }
}
