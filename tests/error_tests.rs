// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_review::error::{
    config_error, file_read_error, input_too_large_error, unsupported_file_error
};

#[test]
fn test_file_read_error() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error = file_read_error("/path/to/deploy.sql", io_error);
    assert!(!error.to_string().is_empty());
}

#[test]
fn test_config_error() {
    let error = config_error("Invalid configuration value");
    assert!(!error.to_string().is_empty());
}

#[test]
fn test_input_too_large_error() {
    let error = input_too_large_error(5 * 1024 * 1024, 4 * 1024 * 1024);
    assert!(!error.to_string().is_empty());
}

#[test]
fn test_unsupported_file_error() {
    let error = unsupported_file_error("deploy.sh");
    assert!(!error.to_string().is_empty());
}

