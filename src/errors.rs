pub type Result<T> = std::result::Result<T, Error>;

// Error code layout:
//  - 100-199: invalid settings values
//  - 400-499: vault errors
//  - internal errors carry no code (always mapped to HTTP 500)
// Borrowed HTTP status codes:
//  - 401: unauthorized

#[derive(Debug, thiserror::Error, strum_macros::EnumProperty)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Error {
    #[strum(props(status_code = 422, code = 100))]
    #[error("ttlMinutes must be between {min} and {max}, provided: {provided}")]
    TtlOutOfRange { min: u32, max: u32, provided: u32 },
    #[strum(props(status_code = 422, code = 101))]
    #[error("checkInterval must be between {min} and {max}, provided: {provided}")]
    IntervalOutOfRange { min: u32, max: u32, provided: u32 },
    #[strum(props(code = 110))]
    #[error("invalid trash mode: {0}, only 'local' or 'permanent' are allowed")]
    InvalidTrashMode(String),
    #[strum(props(code = 410))]
    #[error("vault root is not a directory: {0}")]
    VaultRootMissing(String),
    #[strum(props(code = 411))]
    #[error("file is outside of the vault: {0}")]
    OutsideVault(String),
    #[strum(props(status_code = 401))]
    #[error("unauthorized access")]
    Unauthorized,
    #[error("internal error: {0}")]
    Internal(String),
    #[error("key error: {0}")]
    Key(#[from] crate::keys::KeyError),
    #[error("task join error: {0}")]
    TokioTaskJoin(#[from] tokio::task::JoinError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("job scheduler error: {0}")]
    JobScheduler(#[from] tokio_cron_scheduler::JobSchedulerError),
}

#[macro_export]
macro_rules! fail {
    ($msg:expr) => {
        $crate::errors::Error::Internal(format!($msg))
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::errors::Error::Internal(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! err {
    ($msg:expr) => {
        Err($crate::fail!($msg))
    };
    ($fmt:expr, $($arg:tt)*) => {
        Err($crate::fail!($fmt, $($arg)*))
    };
}
