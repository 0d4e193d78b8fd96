//! Status codes returned by the native runtime and the error type they map to.

use thiserror::Error;

use crate::native::native_enum;

pub type Result<T> = std::result::Result<T, BaconError>;

native_enum! {
    /// Status codes returned by every native call.
    pub enum ErrorCode {
        None = 0 => "none",
        Unknown = 1 => "unknown",
        InvalidArgument = 2 => "invalid_argument",
        InvalidHandle = 3 => "invalid_handle",
        StackUnderflow = 4 => "stack_underflow",
        UnsupportedFormat = 5 => "unsupported_format",
        ShaderCompileError = 6 => "shader_compile_error",
        ShaderLinkError = 7 => "shader_link_error",
        NotRendering = 8 => "not_rendering",
        InvalidFontSize = 9 => "invalid_font_size",
        NotLooping = 10 => "not_looping",
        Running = 11 => "running",
        RenderingToSelf = 12 => "rendering_to_self",
        IoError = 13 => "io_error",
    }
}

/// Errors raised by the runtime.
///
/// Most variants correspond one-to-one with a non-zero [`ErrorCode`]; see
/// [`BaconError::code`].
#[derive(Debug, Error)]
pub enum BaconError {
    #[error("unknown native error")]
    Unknown,

    #[error("invalid argument")]
    InvalidArgument,

    #[error("invalid handle")]
    InvalidHandle,

    #[error("stack underflow")]
    StackUnderflow,

    #[error("unsupported format")]
    UnsupportedFormat,

    #[error("shader failed to compile")]
    ShaderCompile,

    #[error("shader failed to link")]
    ShaderLink,

    #[error("not rendering")]
    NotRendering,

    #[error("invalid font size")]
    InvalidFontSize,

    #[error("game loop is not running")]
    NotLooping,

    #[error("game loop is already running")]
    Running,

    #[error("image cannot be drawn while it is the render target")]
    RenderingToSelf,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("font could not be loaded: {0}")]
    FontLoad(String),

    #[error("unrecognized native status code {0}")]
    Unrecognized(i32),
}

impl BaconError {
    /// Builds the error for a native status code.
    ///
    /// Returns `None` for [`ErrorCode::None`], which signals success.
    pub fn from_code(code: ErrorCode) -> Option<Self> {
        let error = match code {
            ErrorCode::None => return None,
            ErrorCode::Unknown => BaconError::Unknown,
            ErrorCode::InvalidArgument => BaconError::InvalidArgument,
            ErrorCode::InvalidHandle => BaconError::InvalidHandle,
            ErrorCode::StackUnderflow => BaconError::StackUnderflow,
            ErrorCode::UnsupportedFormat => BaconError::UnsupportedFormat,
            ErrorCode::ShaderCompileError => BaconError::ShaderCompile,
            ErrorCode::ShaderLinkError => BaconError::ShaderLink,
            ErrorCode::NotRendering => BaconError::NotRendering,
            ErrorCode::InvalidFontSize => BaconError::InvalidFontSize,
            ErrorCode::NotLooping => BaconError::NotLooping,
            ErrorCode::Running => BaconError::Running,
            ErrorCode::RenderingToSelf => BaconError::RenderingToSelf,
            ErrorCode::IoError => BaconError::Io(std::io::Error::other(
                "native runtime reported an I/O failure",
            )),
        };
        Some(error)
    }

    /// The native status code this error corresponds to, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            BaconError::Unknown => Some(ErrorCode::Unknown),
            BaconError::InvalidArgument => Some(ErrorCode::InvalidArgument),
            BaconError::InvalidHandle => Some(ErrorCode::InvalidHandle),
            BaconError::StackUnderflow => Some(ErrorCode::StackUnderflow),
            BaconError::UnsupportedFormat => Some(ErrorCode::UnsupportedFormat),
            BaconError::ShaderCompile => Some(ErrorCode::ShaderCompileError),
            BaconError::ShaderLink => Some(ErrorCode::ShaderLinkError),
            BaconError::NotRendering => Some(ErrorCode::NotRendering),
            BaconError::InvalidFontSize => Some(ErrorCode::InvalidFontSize),
            BaconError::NotLooping => Some(ErrorCode::NotLooping),
            BaconError::Running => Some(ErrorCode::Running),
            BaconError::RenderingToSelf => Some(ErrorCode::RenderingToSelf),
            BaconError::Io(_) => Some(ErrorCode::IoError),
            BaconError::FontLoad(_) | BaconError::Unrecognized(_) => None,
        }
    }
}

/// Translates a raw native status into a `Result`.
///
/// Zero is success. Codes outside the table produce
/// [`BaconError::Unrecognized`] carrying the raw value.
pub fn check(status: i32) -> Result<()> {
    match ErrorCode::from_raw(status) {
        Some(code) => match BaconError::from_code(code) {
            Some(error) => Err(error),
            None => Ok(()),
        },
        None => Err(BaconError::Unrecognized(status)),
    }
}
