//! Deferred drawing commands.
//!
//! Drawing calls made during a frame are encoded into a [`CommandBuffer`]
//! instead of being sent to the native renderer one at a time. The buffer
//! holds two streams:
//!
//! * the command stream: operation codes, plus any integer parameters
//!   (handles, blend factors, counts, integer uniforms) directly after them;
//! * the data stream: every floating-point parameter, in recording order.
//!
//! [`CommandBuffer::flush`] hands both streams to a [`CommandExecutor`] in a
//! single call and clears them.
//!
//! ```rust
//! use bacon::commands::{CommandBuffer, RecordingExecutor};
//! use bacon::native::{Command, ImageHandle};
//! use bacon::Image;
//! use euclid::default::Box2D;
//! use euclid::point2;
//!
//! let mut buffer = CommandBuffer::new();
//! let image = Image::from_handle(ImageHandle(5), 10, 10);
//! buffer.translate(1.0, 2.0);
//! buffer.draw_image(&image, Box2D::new(point2(0.0, 0.0), point2(10.0, 10.0)));
//!
//! let mut executor = RecordingExecutor::new();
//! buffer.flush(&mut executor).unwrap();
//! assert_eq!(
//!     executor.batches()[0].commands,
//!     vec![Command::Translate.to_raw(), Command::DrawImage.to_raw(), 5]
//! );
//! ```

use euclid::default::{Box2D, Transform3D};

use crate::error::{ErrorCode, Result, check};
use crate::image::Image;
use crate::native::{BlendFactor, Command, ShaderHandle, UniformHandle};

/// RGBA color. Components are usually in `0.0..=1.0`; values outside that
/// range are passed through for use by custom shaders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<(f32, f32, f32, f32)> for Color {
    fn from((r, g, b, a): (f32, f32, f32, f32)) -> Self {
        Self::new(r, g, b, a)
    }
}

/// Receives flushed command batches.
///
/// Implemented by the native runtime binding. The executor must run the
/// operations in stream order and return a native status code (`0` on
/// success, see [`ErrorCode`]).
pub trait CommandExecutor {
    fn execute_commands(&mut self, commands: &[i32], data: &[f32]) -> i32;
}

impl<E: CommandExecutor + ?Sized> CommandExecutor for &mut E {
    fn execute_commands(&mut self, commands: &[i32], data: &[f32]) -> i32 {
        (**self).execute_commands(commands, data)
    }
}

/// Append-only encoding of one frame's drawing operations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandBuffer {
    commands: Vec<i32>,
    data: Vec<f32>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer with room for the given number of command words and
    /// float operands.
    pub fn with_capacity(commands: usize, data: usize) -> Self {
        Self {
            commands: Vec::with_capacity(commands),
            data: Vec::with_capacity(data),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The command stream recorded so far.
    pub fn commands(&self) -> &[i32] {
        &self.commands
    }

    /// The float operand stream recorded so far.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Drops everything recorded since the last flush.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.data.clear();
    }

    /// Sends the recorded streams to `executor` in one call.
    ///
    /// Does nothing when no command has been recorded. The buffer is emptied
    /// even when the executor reports a failure; the failure is returned as
    /// the matching [`crate::BaconError`].
    pub fn flush<E: CommandExecutor + ?Sized>(&mut self, executor: &mut E) -> Result<()> {
        if self.commands.is_empty() {
            return Ok(());
        }

        log::trace!(
            "flushing {} command words and {} operands",
            self.commands.len(),
            self.data.len()
        );
        let status = executor.execute_commands(&self.commands, &self.data);
        self.clear();

        check(status).inspect_err(|e| {
            let code = ErrorCode::from_raw(status).map_or("unrecognized", ErrorCode::name);
            log::warn!("command batch rejected ({code}): {e}");
        })
    }

    fn op(&mut self, command: Command) {
        self.commands.push(command.to_raw());
    }

    fn rect(&mut self, rect: &Box2D<f32>) {
        self.data
            .extend_from_slice(&[rect.min.x, rect.min.y, rect.max.x, rect.max.y]);
    }
}

/// transform stack
impl CommandBuffer {
    /// Saves the current transform on the transform stack.
    pub fn push_transform(&mut self) {
        self.op(Command::PushTransform);
    }

    /// Restores the most recently pushed transform.
    pub fn pop_transform(&mut self) {
        self.op(Command::PopTransform);
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.op(Command::Translate);
        self.data.extend_from_slice(&[x, y]);
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.op(Command::Scale);
        self.data.extend_from_slice(&[sx, sy]);
    }

    /// Rotates counter-clockwise by `radians`.
    pub fn rotate(&mut self, radians: f32) {
        self.op(Command::Rotate);
        self.data.push(radians);
    }

    /// Replaces the current transform.
    ///
    /// The sixteen entries are recorded in `Transform3D::to_array` order,
    /// which is the column-major layout the renderer uploads directly.
    pub fn set_transform(&mut self, transform: &Transform3D<f32>) {
        self.op(Command::SetTransform);
        self.data.extend_from_slice(&transform.to_array());
    }
}

/// color stack and blending
impl CommandBuffer {
    pub fn push_color(&mut self) {
        self.op(Command::PushColor);
    }

    pub fn pop_color(&mut self) {
        self.op(Command::PopColor);
    }

    pub fn set_color(&mut self, color: Color) {
        self.op(Command::SetColor);
        self.data.extend_from_slice(&color.to_array());
    }

    /// Multiplies the current color component-wise.
    pub fn multiply_color(&mut self, color: Color) {
        self.op(Command::MultiplyColor);
        self.data.extend_from_slice(&color.to_array());
    }

    pub fn set_blending(&mut self, src: BlendFactor, dest: BlendFactor) {
        self.commands
            .extend_from_slice(&[Command::SetBlending.to_raw(), src.to_raw(), dest.to_raw()]);
    }
}

/// drawing
impl CommandBuffer {
    /// Draws `image` stretched over `dest`.
    pub fn draw_image(&mut self, image: &Image, dest: Box2D<f32>) {
        self.commands
            .extend_from_slice(&[Command::DrawImage.to_raw(), image.handle().0]);
        self.rect(&dest);
    }

    /// Draws `image` at its native resolution with its top-left corner at `(x, y)`.
    pub fn draw_image_at(&mut self, image: &Image, x: f32, y: f32) {
        self.commands
            .extend_from_slice(&[Command::DrawImage.to_raw(), image.handle().0]);
        self.data.extend_from_slice(&[
            x,
            y,
            x + image.width() as f32,
            y + image.height() as f32,
        ]);
    }

    /// Draws the texel rectangle `src` of `image` over `dest`.
    pub fn draw_image_region(&mut self, image: &Image, dest: Box2D<f32>, src: Box2D<f32>) {
        self.commands
            .extend_from_slice(&[Command::DrawImageRegion.to_raw(), image.handle().0]);
        self.rect(&dest);
        self.rect(&src);
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.op(Command::DrawLine);
        self.data.extend_from_slice(&[x1, y1, x2, y2]);
    }

    /// Outlines `rect` with the current color; no texture is applied.
    pub fn draw_rect(&mut self, rect: Box2D<f32>) {
        self.op(Command::DrawRect);
        self.rect(&rect);
    }

    /// Fills `rect` with the current color; no texture is applied.
    pub fn fill_rect(&mut self, rect: Box2D<f32>) {
        self.op(Command::FillRect);
        self.rect(&rect);
    }

    /// Clears the current framebuffer.
    pub fn clear_color(&mut self, color: Color) {
        self.op(Command::Clear);
        self.data.extend_from_slice(&color.to_array());
    }
}

/// shaders
impl CommandBuffer {
    pub fn set_shader_uniform_floats(
        &mut self,
        shader: ShaderHandle,
        uniform: UniformHandle,
        values: &[f32],
    ) {
        self.commands.extend_from_slice(&[
            Command::SetShaderUniformFloats.to_raw(),
            shader.0,
            uniform.0,
            values.len() as i32,
        ]);
        self.data.extend_from_slice(values);
    }

    /// Integer uniform values travel in the command stream after the count.
    pub fn set_shader_uniform_ints(
        &mut self,
        shader: ShaderHandle,
        uniform: UniformHandle,
        values: &[i32],
    ) {
        self.commands.extend_from_slice(&[
            Command::SetShaderUniformInts.to_raw(),
            shader.0,
            uniform.0,
            values.len() as i32,
        ]);
        self.commands.extend_from_slice(values);
    }

    pub fn set_shared_shader_uniform_floats(&mut self, uniform: UniformHandle, values: &[f32]) {
        self.commands.extend_from_slice(&[
            Command::SetSharedShaderUniformFloats.to_raw(),
            uniform.0,
            values.len() as i32,
        ]);
        self.data.extend_from_slice(values);
    }

    pub fn set_shared_shader_uniform_ints(&mut self, uniform: UniformHandle, values: &[i32]) {
        self.commands.extend_from_slice(&[
            Command::SetSharedShaderUniformInts.to_raw(),
            uniform.0,
            values.len() as i32,
        ]);
        self.commands.extend_from_slice(values);
    }

    /// Selects `shader`, or the default shader for `None`.
    pub fn set_shader(&mut self, shader: Option<ShaderHandle>) {
        let handle = shader.unwrap_or_default();
        self.commands
            .extend_from_slice(&[Command::SetShader.to_raw(), handle.0]);
    }
}

/// render targets
impl CommandBuffer {
    /// Redirects drawing into `target`, or back to the window for `None`.
    pub fn set_frame_buffer(&mut self, target: Option<&Image>, content_scale: f32) {
        let handle = target.map_or(0, |image| image.handle().0);
        self.commands
            .extend_from_slice(&[Command::SetFrameBuffer.to_raw(), handle]);
        self.data.push(content_scale);
    }

    /// Sets the viewport in pixels, origin at the upper-left corner.
    pub fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32, content_scale: f32) {
        self.commands
            .extend_from_slice(&[Command::SetViewport.to_raw(), x, y, width, height]);
        self.data.push(content_scale);
    }
}

/// One batch received by a [`RecordingExecutor`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordedBatch {
    pub commands: Vec<i32>,
    pub data: Vec<f32>,
}

/// Executor that stores every batch instead of rendering it.
///
/// Useful when no native runtime is available. A failure status can be
/// queued with [`RecordingExecutor::fail_next`]; it is returned for the next
/// batch only.
#[derive(Clone, Debug, Default)]
pub struct RecordingExecutor {
    batches: Vec<RecordedBatch>,
    next_status: i32,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next batch report `code`.
    pub fn fail_next(&mut self, code: ErrorCode) {
        self.next_status = code.to_raw();
    }

    /// Makes the next batch report an arbitrary raw status.
    pub fn fail_next_raw(&mut self, status: i32) {
        self.next_status = status;
    }

    pub fn batches(&self) -> &[RecordedBatch] {
        &self.batches
    }

    pub fn take_batches(&mut self) -> Vec<RecordedBatch> {
        std::mem::take(&mut self.batches)
    }
}

impl CommandExecutor for RecordingExecutor {
    fn execute_commands(&mut self, commands: &[i32], data: &[f32]) -> i32 {
        self.batches.push(RecordedBatch {
            commands: commands.to_vec(),
            data: data.to_vec(),
        });
        std::mem::take(&mut self.next_status)
    }
}
