use thiserror::Error;

/// Errors arising from decoding an inbound sensor line.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("line is not valid UTF-8")]
    NotUtf8(#[from] std::str::Utf8Error),

    #[error("checksum field {digits:?} is not a decimal number")]
    BadChecksumDigits { digits: String },

    #[error("checksum mismatch (claimed {claimed}, computed {computed})")]
    ChecksumMismatch { claimed: String, computed: u8 },

    #[error("expected 3 comma-separated fields, got {got} in {payload:?}")]
    FieldCount { got: usize, payload: String },

    #[error("invalid {field} value {value:?}")]
    BadField { field: &'static str, value: String },
}

/// Errors from the serial line transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serial port error: {0}")]
    Port(#[from] serialport::Error),

    #[error("serial port closed")]
    Closed,
}

/// Errors loading, saving or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Outcome of decoding an inbound line
pub type FrameResult<T> = std::result::Result<T, FrameError>;
