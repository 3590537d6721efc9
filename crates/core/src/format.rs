//! Output formats.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The closed set of writer formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WriterFormat {
    /// Office Open XML presentation (.pptx).
    #[default]
    PowerPoint2007,
    /// OpenDocument presentation (.odp).
    ODPresentation,
    /// JSON dump of the document object graph.
    Serialized,
}

impl WriterFormat {
    pub const ALL: [WriterFormat; 3] = [
        WriterFormat::PowerPoint2007,
        WriterFormat::ODPresentation,
        WriterFormat::Serialized,
    ];

    /// Writer name as used in configuration.
    pub fn name(self) -> &'static str {
        match self {
            Self::PowerPoint2007 => "PowerPoint2007",
            Self::ODPresentation => "ODPresentation",
            Self::Serialized => "Serialized",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::PowerPoint2007),
            "odp" => Some(Self::ODPresentation),
            "json" => Some(Self::Serialized),
            _ => None,
        }
    }

    /// Detect format from a file name's extension.
    pub fn from_file_name(name: impl AsRef<Path>) -> Result<Self> {
        let name = name.as_ref();
        name.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| {
                Error::UnsupportedFormat(format!(
                    "cannot infer writer from file name '{}'",
                    name.display()
                ))
            })
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::PowerPoint2007 => "pptx",
            Self::ODPresentation => "odp",
            Self::Serialized => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::PowerPoint2007 => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            Self::ODPresentation => "application/vnd.oasis.opendocument.presentation",
            Self::Serialized => "application/json",
        }
    }
}

impl fmt::Display for WriterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WriterFormat {
    type Err = Error;

    /// Accepts writer names (case-insensitive) and bare extensions.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .or_else(|| Self::from_extension(s))
            .ok_or_else(|| Error::UnsupportedFormat(s.to_string()))
    }
}
