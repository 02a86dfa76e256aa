/// Implementation using the analytic stationary point of the isoelastic profit
mod closed_form;
pub use closed_form::ClosedForm;

/// Implementation using a bounded golden-section search
mod golden_section;
pub use golden_section::{GoldenSection, GoldenSectionSettings};
