pub use masterror::{AppError, AppResult};

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create error for a script exceeding the configured size limit
pub fn input_too_large_error(size: usize, limit: usize) -> AppError {
    AppError::bad_request(format!(
        "Script is too large: {} bytes (limit {} bytes, {})",
        size,
        limit,
        human_size(limit)
    ))
}

/// Create error for a script file with an unsupported extension
pub fn unsupported_file_error(path: &str) -> AppError {
    AppError::bad_request(format!(
        "Unsupported file type '{}': expected .sql, .txt, .js or .mongo",
        path
    ))
}

fn human_size(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    const KIB: usize = 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MiB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{} KiB", bytes / KIB)
    } else {
        format!("{} B", bytes)
    }
}
