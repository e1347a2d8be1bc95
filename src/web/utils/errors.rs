use serde_json::Value;

pub const CODE_INTERNAL: &str = "BVW-CORE-500";
pub const CODE_BAD_REQUEST: &str = "BVW-CORE-400";
pub const CODE_NOT_FOUND: &str = "BVW-CORE-404";
pub const CODE_UNAUTHORIZED: &str = "BVW-CORE-401";

pub fn internal_error_json(details: &str) -> Value {
    error_json(CODE_INTERNAL, "Internal error", Some(details))
}

pub fn bad_request_json(details: &str) -> Value {
    error_json(CODE_BAD_REQUEST, "Invalid request", Some(details))
}

pub fn not_found_json(details: &str) -> Value {
    error_json(CODE_NOT_FOUND, "Not found", Some(details))
}

pub fn unauthorized_json(details: &str) -> Value {
    error_json(CODE_UNAUTHORIZED, "Unauthorized", Some(details))
}

pub fn error_json(code: &str, safe_message: &str, details: Option<&str>) -> Value {
    let message = if cfg!(debug_assertions) {
        details.unwrap_or(safe_message)
    } else {
        safe_message
    };
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    })
}
