//! Touch input path
//!
//! Raw controller reports are reduced to a [`TouchSample`], mapped into
//! display coordinates by a [`TouchMapper`] and handed to the renderer as a
//! [`PointerEvent`] through [`PointerReader`].

mod mapper;
mod orientation;
mod reader;

pub use mapper::{PointerEvent, PointerState, TouchMapper, TouchSample};
pub use orientation::{Orientation, Rotation};
pub use reader::{PointerReader, ReaderStats};
