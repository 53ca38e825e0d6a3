//! Column type model for inferred CSV schemas

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primitive type assigned to a CSV column by schema inference.
///
/// Inference is a strict AND over the sampled values: a single value that
/// fails a type's check demotes the column to the next looser type, down
/// to `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    DateTime,
    String,
}

impl ColumnType {
    /// Stable textual form, as persisted in the catalog
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::DateTime => "datetime",
            ColumnType::String => "string",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = UnknownColumnType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integer" => Ok(ColumnType::Integer),
            "float" => Ok(ColumnType::Float),
            "boolean" => Ok(ColumnType::Boolean),
            "datetime" => Ok(ColumnType::DateTime),
            "string" => Ok(ColumnType::String),
            other => Err(UnknownColumnType(other.to_string())),
        }
    }
}

/// Error for unrecognized persisted column types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColumnType(pub String);

impl fmt::Display for UnknownColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown column type: {}", self.0)
    }
}

impl std::error::Error for UnknownColumnType {}

/// One entry of an inferred schema: column name plus its detected type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}
