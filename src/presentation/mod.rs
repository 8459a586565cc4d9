//! UI shell helpers: theme preference, page metadata and text reports
//!
//! Nothing here feeds back into the estimate; these only consume
//! `CalculationResult` and the selected state.

pub mod theme;
pub mod seo;
pub mod report;

pub use theme::{JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Theme};
pub use seo::PageMeta;
pub use report::{format_currency, render_report};
