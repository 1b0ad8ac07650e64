//! viewport media-query tracking
//!
//! screen conditions evaluate against the host viewport. the registry keeps
//! one live query per section/item id and republishes asynchronous match
//! flips to subscribers; the backend trait is the seam to the host
//! environment's matching facility.

mod registry;
mod viewport;

pub use registry::{MediaQueryRegistry, ScreenUpdate};
pub use viewport::{
    ChangeListener, FixedViewport, MediaQueryHandle, ViewportBackend, ViewportError,
};
