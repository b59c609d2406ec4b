// src/well_known.rs
// NFC Forum well-known record types (see https://nfc-forum.org/build/assigned-numbers)

// TODO: add the remaining RTD entries (Sp, Hs, Hr, Hc, Sig, ...) with their descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownType {
    Text,
    Uri,
}

impl WellKnownType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "T" => Some(Self::Text),
            "U" => Some(Self::Uri),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Text => "T",
            Self::Uri => "U",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Uri => "URI",
        }
    }
}

/// Human description of a well-known type code, `None` when the code is not known.
pub fn describe(code: &str) -> Option<&'static str> {
    WellKnownType::from_code(code).map(|t| t.description())
}
