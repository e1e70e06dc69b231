//! Layout resolution for gallery items.
//!
//! A [`LayoutResolver`] proposes a layout per item; [`apply_layouts`] fills
//! whatever it could not decide with the fixed rule and reports how the
//! layouts were chosen.

mod apply;
pub mod error;
pub mod gemini;
pub mod json;
pub mod prompts;
mod request;
pub mod resolver;

pub use allpi_core::DelegationMode;
pub use apply::{LayoutOutcome, apply_layouts};
pub use error::LayoutError;
pub use gemini::{GeminiClassifier, GeminiConfig, batch_output_budget};
pub use request::{LayoutDecision, LayoutRequest};
pub use resolver::{DelegatedResolver, LayoutClassifier, LayoutResolver, RuleResolver};
