use crate::common::*;

pub use color_key::*;
pub use point::*;
pub use size::*;

mod color_key {
    use super::*;
    use crate::error::ConfigError;

    /// The canonical color key used for palette lookup and grouping.
    ///
    /// A key is trimmed, lower-cased, and has every internal whitespace
    /// character replaced by an underscore. It is never empty.
    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
    #[serde(transparent)]
    pub struct ColorKey(String);

    impl ColorKey {
        /// Normalize raw attribute text. Blank text has no key.
        pub fn normalize(raw: &str) -> Option<Self> {
            let key: String = raw
                .trim()
                .chars()
                .map(|ch| if ch.is_whitespace() { '_' } else { ch })
                .collect();
            (!key.is_empty()).then(|| Self(key.to_lowercase()))
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl FromStr for ColorKey {
        type Err = ConfigError;

        fn from_str(text: &str) -> Result<Self, Self::Err> {
            Self::normalize(text).ok_or(ConfigError::BlankKey("color key"))
        }
    }

    impl Borrow<str> for ColorKey {
        fn borrow(&self) -> &str {
            &self.0
        }
    }

    impl AsRef<str> for ColorKey {
        fn as_ref(&self) -> &str {
            &self.0
        }
    }

    impl Display for ColorKey {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            Display::fmt(&self.0, f)
        }
    }
}

mod point {
    use super::*;

    /// One marker as written in the annotation document.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct AnnotatedPoint {
        pub x: R64,
        pub y: R64,
        /// The point-group label, if present and not blank.
        pub label: Option<String>,
        /// The raw color attribute, if present and not blank.
        pub color: Option<String>,
        /// The raw size attribute, if present and not blank.
        pub size: Option<String>,
    }

    /// One marker with its derived inventory fields.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
    pub struct PointRecord {
        pub x: R64,
        pub y: R64,
        #[serde(rename = "type")]
        pub kind: String,
        pub color_raw: Option<String>,
        /// The normalized color after type overrides.
        #[serde(rename = "color")]
        pub color_key: ColorKey,
        pub size: String,
        pub display_color: String,
    }
}

mod size {
    use super::*;

    /// Image dimensions in pixels.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PixelSize {
        pub width: usize,
        pub height: usize,
    }

    impl PixelSize {
        pub fn new(width: usize, height: usize) -> Self {
            Self { width, height }
        }

        /// Check if the point lies on the image, borders included.
        pub fn contains(&self, x: R64, y: R64) -> bool {
            (0.0..=(self.width as f64)).contains(&x.raw())
                && (0.0..=(self.height as f64)).contains(&y.raw())
        }
    }

    impl Display for PixelSize {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "{}x{}", self.width, self.height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_key_normalization() {
        let expect = "azul_rey";
        for raw in [" Azul Rey ", "AZUL_REY", "azul_rey", "azul\tREY", "\n Azul Rey"] {
            let key = ColorKey::normalize(raw).unwrap();
            assert_eq!(key.as_str(), expect);

            // idempotent
            let again = ColorKey::normalize(key.as_str()).unwrap();
            assert_eq!(again, key);
        }
    }

    #[test]
    fn color_key_keeps_whitespace_runs() {
        let key = ColorKey::normalize("Azul  Rey").unwrap();
        assert_eq!(key.as_str(), "azul__rey");
        assert_ne!(key, ColorKey::normalize("Azul Rey").unwrap());
        assert_eq!(
            ColorKey::normalize(" RSB \t Azul ").unwrap().as_str(),
            "rsb___azul"
        );
    }

    #[test]
    fn color_key_blank() {
        assert_eq!(ColorKey::normalize(""), None);
        assert_eq!(ColorKey::normalize("  \n "), None);
        assert!("".parse::<ColorKey>().is_err());
    }

    #[test]
    fn color_key_keeps_punctuation() {
        let key: ColorKey = "RSB/GBM Subl".parse().unwrap();
        assert_eq!(key.as_str(), "rsb/gbm_subl");
    }

    #[test]
    fn pixel_size_contains() {
        let size = PixelSize::new(100, 50);
        assert!(size.contains(r64(0.0), r64(0.0)));
        assert!(size.contains(r64(100.0), r64(50.0)));
        assert!(!size.contains(r64(100.5), r64(10.0)));
        assert!(!size.contains(r64(10.0), r64(-1.0)));
        assert_eq!(size.to_string(), "100x50");
    }
}
