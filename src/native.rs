//! Values shared with the native runtime: operation codes, blend factors,
//! log levels and resource handles.
//!
//! Every enumeration here is generated by [`native_enum!`], which keeps the
//! Rust variant, the integer the native library expects and the lowercase
//! name used in logs in one static table.

/// Declares a closed enumeration backed by a fixed `i32` table.
///
/// The generated type gets `to_raw`/`from_raw` for the native integer, and
/// `name`/`from_name` for the stable lowercase label. Lookups that do not
/// match a table entry return `None`.
macro_rules! native_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:literal => $label:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(i32)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant = $value,
            )+
        }

        impl $name {
            /// Every variant paired with its name, in declaration order.
            pub const TABLE: &'static [($name, &'static str)] = &[$(($name::$variant, $label)),+];

            /// The integer the native library uses for this value.
            pub const fn to_raw(self) -> i32 {
                self as i32
            }

            /// Looks up the variant for a native integer.
            pub const fn from_raw(raw: i32) -> Option<Self> {
                match raw {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Stable lowercase name of the value.
            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Parses a name produced by [`Self::name`].
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

pub(crate) use native_enum;

native_enum! {
    /// Operation codes understood by the native command executor.
    pub enum Command {
        PushTransform = 0 => "push_transform",
        PopTransform = 1 => "pop_transform",
        Translate = 2 => "translate",
        Scale = 3 => "scale",
        Rotate = 4 => "rotate",
        SetTransform = 5 => "set_transform",
        PushColor = 6 => "push_color",
        PopColor = 7 => "pop_color",
        SetColor = 8 => "set_color",
        MultiplyColor = 9 => "multiply_color",
        SetBlending = 10 => "set_blending",
        DrawImage = 11 => "draw_image",
        DrawImageRegion = 12 => "draw_image_region",
        /// Reserved by the executor; never recorded by [`crate::commands::CommandBuffer`].
        DrawImageQuad = 13 => "draw_image_quad",
        DrawLine = 14 => "draw_line",
        DrawRect = 15 => "draw_rect",
        FillRect = 16 => "fill_rect",
        SetShaderUniformFloats = 17 => "set_shader_uniform_floats",
        SetShaderUniformInts = 18 => "set_shader_uniform_ints",
        SetSharedShaderUniformFloats = 19 => "set_shared_shader_uniform_floats",
        SetSharedShaderUniformInts = 20 => "set_shared_shader_uniform_ints",
        SetShader = 21 => "set_shader",
        Clear = 22 => "clear",
        SetFrameBuffer = 23 => "set_frame_buffer",
        SetViewport = 24 => "set_viewport",
    }
}

native_enum! {
    /// Blend factors accepted by `set_blending`.
    ///
    /// The default blend mode is `(One, OneMinusSrcAlpha)`, which suits
    /// premultiplied alpha.
    pub enum BlendFactor {
        Zero = 0 => "zero",
        One = 1 => "one",
        SrcColor = 2 => "src_color",
        OneMinusSrcColor = 3 => "one_minus_src_color",
        DstColor = 4 => "dst_color",
        OneMinusDstColor = 5 => "one_minus_dst_color",
        SrcAlpha = 6 => "src_alpha",
        OneMinusSrcAlpha = 7 => "one_minus_src_alpha",
        DstAlpha = 8 => "dst_alpha",
        OneMinusDstAlpha = 9 => "one_minus_dst_alpha",
    }
}

native_enum! {
    /// Severity attached to messages emitted by the native runtime.
    pub enum LogLevel {
        Trace = 0 => "trace",
        Info = 1 => "info",
        Warning = 2 => "warning",
        Error = 3 => "error",
        Fatal = 4 => "fatal",
        Disable = 5 => "disable",
    }
}

impl LogLevel {
    /// Maps the native severity onto the `log` facade.
    ///
    /// `Disable` is not a message severity; it falls back to `Error` like any
    /// unrecognized level.
    pub fn to_log_level(self) -> log::Level {
        match self {
            LogLevel::Trace => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Error | LogLevel::Fatal | LogLevel::Disable => log::Level::Error,
        }
    }
}

/// Log target used for messages forwarded from the native runtime.
pub const LOG_TARGET: &str = "bacon";

/// Forwards a message received from the native log callback to `log`.
pub fn forward_log(level: i32, message: &[u8]) {
    let level = LogLevel::from_raw(level)
        .map(LogLevel::to_log_level)
        .unwrap_or(log::Level::Error);
    log::log!(target: LOG_TARGET, level, "{}", String::from_utf8_lossy(message));
}

/// Native handle of an image or framebuffer. `0` addresses the window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub i32);

/// Native handle of a compiled shader. `0` selects the default shader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub i32);

/// Native handle of a uniform, either per-shader or shared by all shaders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UniformHandle(pub i32);
