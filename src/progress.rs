//! Progress-callback trait for pipeline stage events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::FlashcardConfigBuilder::progress_callback`] to hear about
//! each stage as it starts and finishes. The CLI uses it to drive a spinner;
//! library callers can forward the events wherever they like.
//!
//! # Example
//!
//! ```rust
//! use note2anki::{ConversionProgressCallback, FlashcardConfig};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl ConversionProgressCallback for Printer {
//!     fn on_generation_complete(&self, card_count: usize) {
//!         eprintln!("{card_count} cards generated");
//!     }
//! }
//!
//! let config = FlashcardConfig::builder()
//!     .api_key("sk-test")
//!     .progress_callback(Arc::new(Printer))
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as it moves through its stages.
///
/// All methods default to no-ops so callers only override what they need.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called before the document is opened.
    fn on_extraction_start(&self, input: &Path) {
        let _ = input;
    }

    /// Called once the plain text is available.
    ///
    /// # Arguments
    /// * `chars` — number of characters extracted
    fn on_extraction_complete(&self, chars: usize) {
        let _ = chars;
    }

    /// Called just before the completion request is sent.
    fn on_generation_start(&self, model: &str) {
        let _ = model;
    }

    /// Called when the model output has been parsed into cards.
    fn on_generation_complete(&self, card_count: usize) {
        let _ = card_count;
    }

    /// Called after the output file has been written. Never called on a dry run.
    fn on_export_complete(&self, output: &Path, card_count: usize) {
        let _ = (output, card_count);
    }
}

/// Ignores every event. For callers that must pass a [`ProgressCallback`]
/// but want no reporting; an unset `progress_callback` skips the calls.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::FlashcardConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        extracted_chars: AtomicUsize,
        generated: AtomicUsize,
        exported: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_extraction_complete(&self, chars: usize) {
            self.extracted_chars.store(chars, Ordering::SeqCst);
        }

        fn on_generation_complete(&self, card_count: usize) {
            self.generated.store(card_count, Ordering::SeqCst);
        }

        fn on_export_complete(&self, _output: &Path, card_count: usize) {
            self.exported.store(card_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_extraction_start(Path::new("notes.md"));
        cb.on_extraction_complete(120);
        cb.on_generation_start("claude-3-5-haiku-20241022");
        cb.on_generation_complete(4);
        cb.on_export_complete(Path::new("out.txt"), 4);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_extraction_complete(300);
        tracker.on_generation_complete(7);
        tracker.on_export_complete(Path::new("deck.csv"), 7);

        assert_eq!(tracker.extracted_chars.load(Ordering::SeqCst), 300);
        assert_eq!(tracker.generated.load(Ordering::SeqCst), 7);
        assert_eq!(tracker.exported.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn default_config_has_no_callback() {
        let config = crate::config::FlashcardConfig::default();
        assert!(config.progress_callback.is_none());
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_generation_start("model");
        cb.on_generation_complete(1);
    }
}
