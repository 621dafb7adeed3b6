use crate::common::*;

pub use report::*;

pub static CONFIG_VERSION: Lazy<VersionReq> = Lazy::new(|| VersionReq::parse("0.1.0").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_version")]
    pub version: Version,
    /// Palette, type rules and attribute names.
    pub catalog: Catalog,
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }

    /// The configuration used when no file is given.
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            version: Version::new(0, 1, 0),
            catalog: Catalog::new(CatalogConfig::default())?,
            report: ReportConfig::default(),
        })
    }

    /// Load the file if given, otherwise use the built-in configuration.
    pub fn open_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::open(path)
                .with_context(|| format!("failed to load config file '{}'", path.display())),
            None => Self::builtin(),
        }
    }

    pub fn to_json5_string(&self) -> Result<String> {
        // JSON is valid JSON5
        let text = serde_json::to_string_pretty(self)?;
        Ok(text)
    }
}

mod report {
    use super::*;

    /// Report options.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ReportConfig {
        /// The report title, followed by the model name if one is given.
        #[serde(default = "default_title_prefix")]
        pub title_prefix: String,
        /// Marker diameter in screen pixels.
        #[serde(default = "default_marker_size")]
        pub marker_size: u32,
    }

    impl ReportConfig {
        pub fn title(&self, model_name: Option<&str>) -> String {
            match model_name.map(str::trim).filter(|name| !name.is_empty()) {
                Some(name) => format!("{} {}", self.title_prefix, name),
                None => self.title_prefix.clone(),
            }
        }
    }

    impl Default for ReportConfig {
        fn default() -> Self {
            Self {
                title_prefix: default_title_prefix(),
                marker_size: default_marker_size(),
            }
        }
    }

    fn default_title_prefix() -> String {
        "Componentes".into()
    }

    fn default_marker_size() -> u32 {
        10
    }
}

pub fn deserialize_version<'de, D>(deserializer: D) -> Result<Version, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    let version = Version::parse(&text).map_err(|err| {
        D::Error::custom(format!(
            "failed to parse version number '{}': {:?}",
            text, err
        ))
    })?;

    if !CONFIG_VERSION.matches(&version) {
        return Err(D::Error::custom(format!(
            "incompatible version: get '{}', but it is incompatible with requirement '{}'",
            version, &*CONFIG_VERSION,
        )));
    }

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title() {
        let config = ReportConfig::default();
        assert_eq!(config.title(None), "Componentes");
        assert_eq!(config.title(Some("  ")), "Componentes");
        assert_eq!(config.title(Some("Mariposa 12")), "Componentes Mariposa 12");
    }

    #[test]
    fn builtin_round_trip() -> Result<()> {
        let config = Config::builtin()?;
        let text = config.to_json5_string()?;
        let loaded: Config = json5::from_str(&text)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn reject_incompatible_version() {
        let text = r#"{ version: "2.0.0", catalog: { palette: { sin_color: "gray" } } }"#;
        let err = json5::from_str::<Config>(text).unwrap_err();
        assert!(err.to_string().contains("incompatible version"));
    }

    #[test]
    fn reject_invalid_catalog() {
        let text = r#"{
            version: "0.1.0",
            catalog: {
                palette: { plata: "silver" },
            },
        }"#;
        assert!(json5::from_str::<Config>(text).is_err());
    }

    #[test]
    fn minimal_config() -> Result<()> {
        let text = r#"{
            version: "0.1.3",
            catalog: {
                palette: { sin_color: "gray", rojo: "red" },
                rules: {
                    balin: { kind: "FillMissing", fallback: "rojo" },
                },
            },
        }"#;
        let config: Config = json5::from_str(text)?;
        assert_eq!(config.report, ReportConfig::default());
        assert_eq!(config.catalog.normalize_color("balin", None).as_str(), "rojo");
        assert_eq!(config.catalog.default_size("microperla"), None);
        Ok(())
    }
}
