/// Errors raised at the boundary with the extension APIs
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// A `chrome.*` call rejected or threw
    #[error("browser API error: {0}")]
    Js(String),

    #[error("failed to convert value: {0}")]
    Conversion(String),

    #[error("{0} is not available in this browser")]
    Unavailable(&'static str),
}

impl From<JsValue> for BridgeError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|message| message.as_string())
            })
            .unwrap_or_else(|| format!("{:?}", value));
        BridgeError::Js(message)
    }
}

impl From<serde_wasm_bindgen::Error> for BridgeError {
    fn from(error: serde_wasm_bindgen::Error) -> Self {
        BridgeError::Conversion(error.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(error: serde_json::Error) -> Self {
        BridgeError::Conversion(error.to_string())
    }
}
