//! AI profile identifiers.

use serde::{Deserialize, Serialize};

/// The fixed set of AI behavioral profiles known to the simulator.
///
/// Wire values are lowercase (`"professor"`); parsing from command-line
/// arguments is case-insensitive via [`FromStr`](std::str::FromStr).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum ProfileId {
    #[display("riley")]
    Riley,
    #[display("carmen")]
    Carmen,
    #[display("liam")]
    Liam,
    #[display("professor")]
    Professor,
    #[display("charlie")]
    Charlie,
    #[display("custom")]
    Custom,
}

impl ProfileId {
    /// All known profiles, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Riley,
        Self::Carmen,
        Self::Liam,
        Self::Professor,
        Self::Charlie,
        Self::Custom,
    ];

    /// The lowercase wire spelling, also used as a DataFrame cell value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Riley => "riley",
            Self::Carmen => "carmen",
            Self::Liam => "liam",
            Self::Professor => "professor",
            Self::Charlie => "charlie",
            Self::Custom => "custom",
        }
    }
}
