mod benefit;
mod check;
mod screener;

pub use benefit::{Benefit, BenefitDetail, CheckConfig};
pub use check::{EligibilityCheck, ParameterDefinition};
pub use screener::Screener;

/// Opaque, already-authenticated identity of the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerId(pub String);

impl CallerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn owns(&self, owner_id: &str) -> bool {
        !self.0.is_empty() && self.0 == owner_id
    }
}
