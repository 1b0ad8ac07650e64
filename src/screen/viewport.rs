//! viewport backend seam
//!
//! abstracts the host environment's media-query matching facility. a real
//! embedding bridges this to its UI toolkit; [`FixedViewport`] is a built-in
//! backend for headless/server embeddings and tests, evaluating the common
//! width/height feature syntax against a mutable viewport size.

use std::sync::{Arc, LazyLock, Mutex, Weak};

use regex::Regex;
use thiserror::Error;

/// callback fired on every match/unmatch transition of a live query
pub type ChangeListener = Box<dyn Fn(bool) + Send + Sync>;

/// a live media query registered with the viewport backend
pub trait MediaQueryHandle: Send + Sync {
    /// current match state of the query
    fn matches(&self) -> bool;

    /// install or clear the change listener; a handle carries at most one,
    /// setting replaces any previous listener
    fn set_listener(&self, listener: Option<ChangeListener>);
}

/// the host environment's media-query matching facility
pub trait ViewportBackend: Send + Sync {
    /// register `query` and return a live handle for it
    fn match_media(&self, query: &str) -> Result<Box<dyn MediaQueryHandle>, ViewportError>;
}

/// error raised at the viewport seam
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewportError {
    /// the backend cannot interpret the query string
    #[error("unsupported media query: {query}")]
    UnsupportedQuery { query: String },
}

// ============================================================================
// Fixed Viewport Backend
// ============================================================================

/// one width/height constraint inside a media query
#[derive(Debug, Clone, Copy, PartialEq)]
enum Feature {
    MinWidth(f64),
    MaxWidth(f64),
    MinHeight(f64),
    MaxHeight(f64),
}

impl Feature {
    fn matches(&self, width: f64, height: f64) -> bool {
        match self {
            Feature::MinWidth(v) => width >= *v,
            Feature::MaxWidth(v) => width <= *v,
            Feature::MinHeight(v) => height >= *v,
            Feature::MaxHeight(v) => height <= *v,
        }
    }
}

static FEATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(\s*(min-width|max-width|min-height|max-height)\s*:\s*([0-9]+(?:\.[0-9]+)?)px\s*\)$")
        .expect("static feature pattern")
});

/// parse `(min-width: 768px)`-style features joined with `and`
fn parse_query(query: &str) -> Result<Vec<Feature>, ViewportError> {
    let unsupported = || ViewportError::UnsupportedQuery {
        query: query.to_string(),
    };

    let mut features = Vec::new();
    for part in query.split(" and ") {
        let caps = FEATURE_RE.captures(part.trim()).ok_or_else(unsupported)?;
        let value: f64 = caps[2].parse().map_err(|_| unsupported())?;
        features.push(match &caps[1] {
            "min-width" => Feature::MinWidth(value),
            "max-width" => Feature::MaxWidth(value),
            "min-height" => Feature::MinHeight(value),
            _ => Feature::MaxHeight(value),
        });
    }
    Ok(features)
}

/// shared state of one fixed-viewport query handle
struct HandleShared {
    features: Vec<Feature>,
    matches: Mutex<bool>,
    listener: Mutex<Option<ChangeListener>>,
}

struct FixedQueryHandle {
    shared: Arc<HandleShared>,
}

impl MediaQueryHandle for FixedQueryHandle {
    fn matches(&self) -> bool {
        self.shared.matches.lock().map(|m| *m).unwrap_or(false)
    }

    fn set_listener(&self, listener: Option<ChangeListener>) {
        if let Ok(mut slot) = self.shared.listener.lock() {
            *slot = listener;
        }
    }
}

struct ViewportInner {
    width: f64,
    height: f64,
    // live handles; dead ones are pruned on resize
    handles: Vec<Weak<HandleShared>>,
}

/// built-in backend evaluating queries against a fixed, mutable viewport size
pub struct FixedViewport {
    inner: Mutex<ViewportInner>,
}

impl FixedViewport {
    /// create a backend with the given viewport size in pixels
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: Mutex::new(ViewportInner {
                width: width as f64,
                height: height as f64,
                handles: Vec::new(),
            }),
        }
    }

    /// resize the viewport, re-evaluating every live query and firing the
    /// listeners of those whose match state flipped
    pub fn set_size(&self, width: u32, height: u32) {
        let mut flipped: Vec<(Arc<HandleShared>, bool)> = Vec::new();

        if let Ok(mut inner) = self.inner.lock() {
            inner.width = width as f64;
            inner.height = height as f64;
            let (w, h) = (inner.width, inner.height);

            inner.handles.retain(|weak| {
                let Some(shared) = weak.upgrade() else {
                    return false;
                };
                let now = shared.features.iter().all(|f| f.matches(w, h));
                if let Ok(mut matches) = shared.matches.lock() {
                    if *matches != now {
                        *matches = now;
                        flipped.push((Arc::clone(&shared), now));
                    }
                }
                true
            });
        }

        // listeners run outside the viewport lock; they re-enter shared state
        for (shared, now) in flipped {
            if let Ok(slot) = shared.listener.lock() {
                if let Some(listener) = slot.as_ref() {
                    listener(now);
                }
            }
        }
    }

    /// number of live query handles, for introspection
    pub fn live_handles(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| {
                inner
                    .handles
                    .iter()
                    .filter(|weak| weak.strong_count() > 0)
                    .count()
            })
            .unwrap_or(0)
    }
}

impl ViewportBackend for FixedViewport {
    fn match_media(&self, query: &str) -> Result<Box<dyn MediaQueryHandle>, ViewportError> {
        let features = parse_query(query)?;

        let shared = Arc::new(HandleShared {
            features,
            matches: Mutex::new(false),
            listener: Mutex::new(None),
        });

        if let Ok(mut inner) = self.inner.lock() {
            let now = shared
                .features
                .iter()
                .all(|f| f.matches(inner.width, inner.height));
            if let Ok(mut matches) = shared.matches.lock() {
                *matches = now;
            }
            inner.handles.push(Arc::downgrade(&shared));
        }

        Ok(Box::new(FixedQueryHandle { shared }))
    }
}
