//! Display output path
//!
//! The renderer hands rendered regions to a [`FlushTarget`] together with a
//! [`FlushSignal`]; the [`FlushAdapter`] streams them to a [`PixelSink`] and
//! raises the signal when done.
//!
//! [`FlushTarget`]: crate::traits::FlushTarget
//! [`PixelSink`]: crate::traits::PixelSink

mod fill;
mod flush;
mod region;
mod signal;

pub use fill::fill_solid;
pub use flush::{FlushAdapter, FlushError, FlushStats};
pub use region::{Area, DirtyRegion};
pub use signal::FlushSignal;
