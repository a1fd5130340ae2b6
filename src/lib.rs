//! Freehand pointer input to variable-width triangle-strip ribbons, with an
//! undoable history of committed strokes.
//!
//! Pipeline: pointer events -> [`sampler`] -> in-progress [`Stroke`] ->
//! [`history`] commit -> [`geometry`] mesh -> [`buffer`] dirty flag -> a
//! [`RenderBackend`] draws one strip per stroke. [`Canvas`] owns all of it.

pub mod buffer;
pub mod canvas;
pub mod config;
pub mod error;
pub mod gamma;
pub mod geometry;
pub mod history;
pub mod logging;
pub mod raster;
pub mod sampler;
pub mod types;

pub use buffer::{BufferCoordinator, RenderBackend};
pub use canvas::{Canvas, InputEvent};
pub use config::{BrushConfig, GeometryParams, SamplerParams};
pub use error::Error;
pub use geometry::GeometryBuilder;
pub use history::StrokeHistory;
pub use sampler::{InputSampler, PointerEvent};
pub use types::{FrameBuffer, Rgb, Stroke, StrokePoint, Vec2, Vertex};
