//! Participant records consumed from the surrounding application.

use serde::{Deserialize, Serialize};

/// A meeting participant. Immutable for the duration of a scheduling request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Caller-supplied identifier.
    pub id: String,
    /// IANA timezone identifier, e.g. "America/New_York".
    pub timezone: String,
    /// ISO 3166-1 alpha-2 country code, e.g. "US".
    pub country: String,
}

impl Participant {
    pub fn new(
        id: impl Into<String>,
        timezone: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timezone: timezone.into(),
            country: country.into(),
        }
    }
}
