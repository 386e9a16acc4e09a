//! # RustKit Text
//!
//! Text measurement for the RustKit layout resolver.
//!
//! Layout treats text as a black box: it asks how wide a string is, where
//! it may wrap, and how many lines it takes at a given width. This crate
//! answers those questions.
//!
//! ## Modules
//!
//! - [`line_break`]: Unicode Line Breaking Algorithm (UAX #14) and unbreakable runs
//! - [`segmentation`]: Grapheme cluster boundaries (UAX #29)
//! - [`measure`]: The [`TextMeasurer`] trait, an approximate measurer and wrapping

pub mod line_break;
pub mod measure;
pub mod segmentation;

pub use measure::{
    max_content_width, min_content_width, wrap_text, ApproximateMeasurer, TextMeasurer,
    WrappedText,
};

use thiserror::Error;

/// Errors for rustkit-text operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextError {
    #[error("Invalid advance ratio: {0}")]
    InvalidAdvance(f32),
}
