//! Schema versions of the animation pack format.

use std::fmt;

use clap::ValueEnum;

/// Structural contract a pack conforms to.
///
/// Migrations only move forward, one version at a time. The pipeline never
/// inspects a document to guess its version; the caller names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum SchemaVersion {
    #[value(alias = "1")]
    V1,
    #[value(alias = "2")]
    V2,
    #[value(alias = "3")]
    V3,
    #[value(alias = "4")]
    V4,
    #[value(alias = "5")]
    V5,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 5] = [
        SchemaVersion::V1,
        SchemaVersion::V2,
        SchemaVersion::V3,
        SchemaVersion::V4,
        SchemaVersion::V5,
    ];

    /// The version after this one, or `None` for the latest.
    pub fn next(self) -> Option<SchemaVersion> {
        match self {
            SchemaVersion::V1 => Some(SchemaVersion::V2),
            SchemaVersion::V2 => Some(SchemaVersion::V3),
            SchemaVersion::V3 => Some(SchemaVersion::V4),
            SchemaVersion::V4 => Some(SchemaVersion::V5),
            SchemaVersion::V5 => None,
        }
    }

    /// The version before this one, or `None` for the first.
    pub fn previous(self) -> Option<SchemaVersion> {
        Self::ALL.into_iter().find(|v| v.next() == Some(self))
    }

    pub fn number(self) -> u8 {
        match self {
            SchemaVersion::V1 => 1,
            SchemaVersion::V2 => 2,
            SchemaVersion::V3 => 3,
            SchemaVersion::V4 => 4,
            SchemaVersion::V5 => 5,
        }
    }

    /// Parse `v3`, `V3` or `3`.
    pub fn parse(s: &str) -> Option<SchemaVersion> {
        let digits = s.strip_prefix(['v', 'V']).unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|v| digits.parse::<u8>().ok() == Some(v.number()))
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}
