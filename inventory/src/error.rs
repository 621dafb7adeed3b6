use crate::common::*;

/// Identifies a point-group inside an annotation document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupLocation {
    /// Position of the enclosing `<image>` in the document.
    pub image_index: usize,
    pub image_name: Option<String>,
    /// Position of the `<points>` element inside its image.
    pub group_index: usize,
    pub label: Option<String>,
}

impl Display for GroupLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "image #{}", self.image_index)?;
        if let Some(name) = &self.image_name {
            write!(f, " ('{}')", name)?;
        }
        write!(f, ", point group #{}", self.group_index)?;
        if let Some(label) = &self.label {
            write!(f, " (label '{}')", label)?;
        }
        Ok(())
    }
}

/// The reason a single `x,y` pair is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("expect 2 components, but found {0}")]
    Arity(usize),
    #[error("'{0}' is not a finite number")]
    NotANumber(String),
}

/// The annotation document cannot be turned into point records.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read annotation file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed annotation document: {0}")]
    Document(#[from] serde_xml_rs::Error),
    #[error("{location}: missing coordinate list")]
    MissingCoordinates { location: GroupLocation },
    #[error("{location}: malformed coordinate pair '{pair}' in '{raw}': {reason}")]
    InvalidCoordinate {
        location: GroupLocation,
        pair: String,
        raw: String,
        reason: CoordinateError,
    },
}

impl ParseError {
    /// The offending point-group, if the error is local to one.
    pub fn location(&self) -> Option<&GroupLocation> {
        match self {
            Self::MissingCoordinates { location } | Self::InvalidCoordinate { location, .. } => {
                Some(location)
            }
            Self::Io { .. } | Self::Document(_) => None,
        }
    }
}

/// The catalog settings are unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("the color palette is empty")]
    EmptyPalette,
    #[error("{0} must not be blank")]
    BlankSetting(&'static str),
    #[error("blank key found in {0}")]
    BlankKey(&'static str),
    #[error("keys '{first}' and '{second}' in {section} both normalize to '{key}'")]
    DuplicateKey {
        section: &'static str,
        key: String,
        first: String,
        second: String,
    },
    #[error("the no-color key '{0}' is not in the palette")]
    MissingNoColor(String),
    #[error("fallback color '{fallback}' for type '{kind}' is not in the palette")]
    UnknownFallback { kind: String, fallback: String },
    #[error("allow list for type '{kind}' is empty")]
    EmptyAllowList { kind: String },
    #[error("fallback color '{fallback}' for type '{kind}' is not in its allow list")]
    FallbackNotAllowed { kind: String, fallback: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_location_display() {
        let location = GroupLocation {
            image_index: 0,
            image_name: Some("board.jpg".into()),
            group_index: 3,
            label: Some("cristal".into()),
        };
        assert_eq!(
            location.to_string(),
            "image #0 ('board.jpg'), point group #3 (label 'cristal')"
        );

        let location = GroupLocation {
            image_index: 2,
            image_name: None,
            group_index: 0,
            label: None,
        };
        assert_eq!(location.to_string(), "image #2, point group #0");
    }
}
