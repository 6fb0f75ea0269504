use poem_openapi::Object;

/// Uniform body for endpoints whose payload is just an acknowledgement
#[derive(Object, Debug)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        ActionResponse {
            success: true,
            message: message.into(),
        }
    }
}
