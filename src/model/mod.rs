//! Record types shared by every pipeline stage
//!
//! Each table written to disk has one struct here. Categorical columns are
//! closed enums whose serialized form is the exact cell text used in the
//! flat files, so a table written by the generator reads back unchanged.

use thiserror::Error;

/// Error returned when a cell does not match any variant of a categorical column
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {column} value '{value}'")]
pub struct UnknownVariant {
    pub column: &'static str,
    pub value: String,
}

/// Declares a closed categorical column.
///
/// Generates the enum, `ALL`, `as_str`, `FromStr`, `Display` and serde impls
/// that read and write the given cell text.
macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident ($column:literal) {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::model::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::model::UnknownVariant {
                        column: $column,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub mod call;
pub mod customer;
pub mod document;
pub mod feature_request;
pub mod interaction;
pub mod narrative;
pub mod telemetry;

pub use call::{Call, CallType};
pub use customer::{
    Certifications, CompetingSystems, ContractType, Customer, ImplementationStatus, MrrBand,
    OrgType, PaymentStatus, Segment,
};
pub use document::{ContextDocument, DocType};
pub use feature_request::FeatureRequest;
pub use interaction::{rank_topics, Channel, Interaction, PatientImpact, Priority, Sentiment, Topic};
pub use narrative::{CallTranscript, EmailThread, NpsCategory, OutcomeRecord, OutcomeStatus, SurveyResponse};
pub use telemetry::UsageTelemetry;

/// Turns `snake_case` cell text into a title for display ("ehr_integration" -> "Ehr Integration")
pub fn title_case(raw: &str) -> String {
    raw.split(|c| c == '_' || c == ' ')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Truncates on a character boundary, never splitting a multi-byte char
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Formats an integer with thousands separators (12345 -> "12,345")
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Same as [`thousands`] for rounded floating point amounts
pub fn thousands_f64(value: f64) -> String {
    let rounded = value.round();
    if rounded < 0.0 {
        format!("-{}", thousands((-rounded) as u64))
    } else {
        thousands(rounded as u64)
    }
}
