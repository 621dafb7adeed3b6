//! Color palette, per-type override rules and the normalizer built on them.

use crate::{common::*, error::ConfigError, record::*};

/// The palette shipped with the tool.
pub const DEFAULT_PALETTE: &[(&str, &str)] = &[
    ("plata", "silver"),
    ("dorado", "gold"),
    ("rosa", "pink"),
    ("ab_aguamarina", "aquamarine"),
    ("ab_amatista", "mediumpurple"),
    ("ab_cristal", "lightcyan"),
    ("ab_peridot", "lightgreen"),
    ("ab_rose", "lightpink"),
    ("ab_zafiro", "deepskyblue"),
    ("aguamarina", "turquoise"),
    ("amatista", "purple"),
    ("black_diamond", "black"),
    ("blue_zircon", "darkturquoise"),
    ("cristal", "silver"),
    ("fuschia", "fuchsia"),
    ("jet", "black"),
    ("jonquil", "gold"),
    ("opal_blue_zircone", "skyblue"),
    ("opal_green", "lightgreen"),
    ("peridot", "limegreen"),
    ("rose", "pink"),
    ("siam", "crimson"),
    ("topaz", "orange"),
    ("violet", "violet"),
    ("zafiro", "royalblue"),
    ("sin_color", "gray"),
    ("gmb_morado", "#9400D3"),
    ("rsb_azul", "#0000FF"),
    ("rsb/gbm_subl", "#87CEFA"),
    ("amarillo", "#FFFF00"),
    ("azul_rey", "#0000CD"),
    ("rojo", "#FF0000"),
    ("turqueza", "#40E0D0"),
    ("turqueza_metalico", "#00CED1"),
    ("teal", "#008080"),
    ("mauva", "#E0B0FF"),
    ("lilac", "#C8A2C8"),
    ("azul_purpura", "#8A2BE2"),
    ("orquida", "#DA70D6"),
    ("purpura", "#800080"),
    ("salmon", "#FA8072"),
    ("gris", "#808080"),
    ("azul_agua", "#00FFFF"),
    ("verde_jade", "#00A86B"),
    ("morado", "#7A288A"),
    ("otro", "#D3D3D3"),
];

pub const DEFAULT_DISPLAY_COLOR: &str = "gray";
pub const DEFAULT_NO_COLOR_KEY: &str = "sin_color";
pub const DEFAULT_UNTYPED_LABEL: &str = "sin_tipo";

/// Normalize a point-group label into the key used by rule tables.
pub fn type_key(label: &str) -> String {
    label.trim().to_lowercase()
}

pub use attribute_names::*;
mod attribute_names {
    use super::*;

    /// Names of the `<attribute>` elements carrying color and size.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AttributeNames {
        pub color: String,
        pub size: String,
    }

    impl Default for AttributeNames {
        fn default() -> Self {
            Self {
                color: "color".into(),
                size: "tamaño".into(),
            }
        }
    }
}

pub use color_rule::*;
mod color_rule {
    use super::*;

    /// A type-specific correction applied to a normalized color.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "kind")]
    pub enum ColorRule {
        /// Keep the color if it is allowed, otherwise use the fallback.
        AllowList {
            allowed: IndexSet<String>,
            fallback: String,
        },
        /// Replace the no-color key only.
        FillMissing { fallback: String },
        /// Keep the color if the palette knows it, otherwise use the fallback.
        KnownColor { fallback: String },
    }

    impl ColorRule {
        pub fn fallback(&self) -> &str {
            match self {
                Self::AllowList { fallback, .. }
                | Self::FillMissing { fallback }
                | Self::KnownColor { fallback } => fallback,
            }
        }
    }

    /// The validated form of [ColorRule].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(super) enum Rule {
        AllowList {
            allowed: IndexSet<ColorKey>,
            fallback: ColorKey,
        },
        FillMissing {
            fallback: ColorKey,
        },
        KnownColor {
            fallback: ColorKey,
        },
    }

    impl Rule {
        pub fn fallback(&self) -> &ColorKey {
            match self {
                Self::AllowList { fallback, .. }
                | Self::FillMissing { fallback }
                | Self::KnownColor { fallback } => fallback,
            }
        }

        pub fn to_config(&self) -> ColorRule {
            match self {
                Self::AllowList { allowed, fallback } => ColorRule::AllowList {
                    allowed: allowed.iter().map(|key| key.to_string()).collect(),
                    fallback: fallback.to_string(),
                },
                Self::FillMissing { fallback } => ColorRule::FillMissing {
                    fallback: fallback.to_string(),
                },
                Self::KnownColor { fallback } => ColorRule::KnownColor {
                    fallback: fallback.to_string(),
                },
            }
        }
    }
}

pub use catalog_config::*;
mod catalog_config {
    use super::*;

    /// The unvalidated catalog settings, as stored in configuration files.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CatalogConfig {
        /// Color key to display color.
        pub palette: IndexMap<String, String>,
        /// Display color for keys missing in the palette.
        #[serde(default = "default_display")]
        pub default_display: String,
        /// The key assigned to points without a color.
        #[serde(default = "default_no_color")]
        pub no_color: String,
        /// The type assigned to point-groups without a label.
        #[serde(default = "default_untyped")]
        pub untyped: String,
        /// Type key to color override rule.
        #[serde(default)]
        pub rules: IndexMap<String, ColorRule>,
        /// Type key to the size used when a point has none.
        #[serde(default)]
        pub size_defaults: IndexMap<String, String>,
        #[serde(default)]
        pub attributes: AttributeNames,
    }

    impl Default for CatalogConfig {
        fn default() -> Self {
            let palette = DEFAULT_PALETTE
                .iter()
                .map(|&(key, color)| (key.to_owned(), color.to_owned()))
                .collect();
            let allow_list = |allowed: &[&str], fallback: &str| ColorRule::AllowList {
                allowed: allowed.iter().map(|&key| key.to_owned()).collect(),
                fallback: fallback.to_owned(),
            };
            let rules = IndexMap::from_iter([
                ("balin".to_owned(), allow_list(&["plata", "dorado"], "plata")),
                (
                    "dicroico".to_owned(),
                    allow_list(&["gmb_morado", "rsb_azul", "rsb/gbm_subl"], "gmb_morado"),
                ),
                (
                    "microperla".to_owned(),
                    ColorRule::KnownColor {
                        fallback: "otro".to_owned(),
                    },
                ),
            ]);
            let size_defaults = IndexMap::from_iter([("microperla".to_owned(), "pp01".to_owned())]);

            Self {
                palette,
                default_display: default_display(),
                no_color: default_no_color(),
                untyped: default_untyped(),
                rules,
                size_defaults,
                attributes: AttributeNames::default(),
            }
        }
    }

    fn default_display() -> String {
        DEFAULT_DISPLAY_COLOR.to_owned()
    }

    fn default_no_color() -> String {
        DEFAULT_NO_COLOR_KEY.to_owned()
    }

    fn default_untyped() -> String {
        DEFAULT_UNTYPED_LABEL.to_owned()
    }
}

pub use catalog::*;
mod catalog {
    use super::*;

    /// The validated, read-only lookup tables used to enrich points.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(try_from = "CatalogConfig", into = "CatalogConfig")]
    pub struct Catalog {
        palette: IndexMap<ColorKey, String>,
        default_display: String,
        no_color: ColorKey,
        untyped: String,
        rules: IndexMap<String, Rule>,
        size_defaults: IndexMap<String, String>,
        attributes: AttributeNames,
    }

    impl Catalog {
        pub fn new(config: CatalogConfig) -> Result<Self, ConfigError> {
            let CatalogConfig {
                palette: orig_palette,
                default_display,
                no_color,
                untyped,
                rules: orig_rules,
                size_defaults: orig_size_defaults,
                attributes,
            } = config;

            ensure_not_blank(&default_display, "default_display")?;
            ensure_not_blank(&untyped, "untyped")?;
            ensure_not_blank(&attributes.color, "attributes.color")?;
            ensure_not_blank(&attributes.size, "attributes.size")?;
            let no_color = ColorKey::normalize(&no_color).ok_or(ConfigError::BlankSetting("no_color"))?;

            // palette
            if orig_palette.is_empty() {
                return Err(ConfigError::EmptyPalette);
            }
            let palette = normalize_keys(orig_palette, "palette", |key| {
                ColorKey::normalize(key).ok_or(ConfigError::BlankKey("palette"))
            })?;
            if !palette.contains_key(&no_color) {
                return Err(ConfigError::MissingNoColor(no_color.to_string()));
            }

            // override rules
            let rules = normalize_keys(orig_rules, "rules", normalize_type_key)?;
            let rules: IndexMap<_, _> = rules
                .into_iter()
                .map(|(kind, rule)| {
                    let rule = validate_rule(&kind, rule, &palette)?;
                    Ok((kind, rule))
                })
                .collect::<Result<_, ConfigError>>()?;

            // default sizes
            let size_defaults =
                normalize_keys(orig_size_defaults, "size_defaults", normalize_type_key)?;

            Ok(Self {
                palette,
                default_display,
                no_color,
                untyped,
                rules,
                size_defaults,
                attributes,
            })
        }

        pub fn palette(&self) -> &IndexMap<ColorKey, String> {
            &self.palette
        }

        pub fn no_color(&self) -> &ColorKey {
            &self.no_color
        }

        pub fn untyped(&self) -> &str {
            &self.untyped
        }

        pub fn default_display(&self) -> &str {
            &self.default_display
        }

        pub fn attributes(&self) -> &AttributeNames {
            &self.attributes
        }

        /// Check if a type has a color override rule.
        pub fn has_rule(&self, kind: &str) -> bool {
            self.rules.contains_key(&type_key(kind))
        }

        /// Resolve the type of a point-group, substituting the untyped label.
        pub fn resolve_kind<'a>(&'a self, label: Option<&'a str>) -> &'a str {
            label
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .unwrap_or(&self.untyped)
        }

        /// Normalize a raw color and apply the override rule of the type.
        pub fn normalize_color(&self, kind: &str, raw: Option<&str>) -> ColorKey {
            let color = raw
                .and_then(ColorKey::normalize)
                .unwrap_or_else(|| self.no_color.clone());

            match self.rules.get(&type_key(kind)) {
                Some(rule) => self.apply_rule(rule, color),
                None => color,
            }
        }

        /// Look up the display color, falling back to the default display color.
        pub fn display_color(&self, key: &ColorKey) -> &str {
            self.palette
                .get(key)
                .map(String::as_str)
                .unwrap_or(&self.default_display)
        }

        /// The size assigned to points of this type that carry none.
        pub fn default_size(&self, kind: &str) -> Option<&str> {
            self.size_defaults.get(&type_key(kind)).map(String::as_str)
        }

        pub fn enrich(&self, point: &AnnotatedPoint) -> PointRecord {
            let AnnotatedPoint {
                x,
                y,
                ref label,
                ref color,
                ref size,
            } = *point;

            let kind = self.resolve_kind(label.as_deref());
            let color_key = self.normalize_color(kind, color.as_deref());
            let display_color = self.display_color(&color_key).to_owned();
            let size = size
                .as_deref()
                .map(str::trim)
                .or_else(|| self.default_size(kind))
                .unwrap_or("")
                .to_owned();

            PointRecord {
                x,
                y,
                kind: kind.to_owned(),
                color_raw: color.clone(),
                color_key,
                size,
                display_color,
            }
        }

        pub fn enrich_all<'a, I>(&self, points: I) -> Vec<PointRecord>
        where
            I: IntoIterator<Item = &'a AnnotatedPoint>,
        {
            points.into_iter().map(|point| self.enrich(point)).collect()
        }

        fn apply_rule(&self, rule: &Rule, color: ColorKey) -> ColorKey {
            let keep = match rule {
                Rule::AllowList { allowed, .. } => allowed.contains(&color),
                Rule::FillMissing { .. } => color != self.no_color,
                Rule::KnownColor { .. } => self.palette.contains_key(&color),
            };

            if keep {
                color
            } else {
                rule.fallback().clone()
            }
        }
    }

    impl TryFrom<CatalogConfig> for Catalog {
        type Error = ConfigError;

        fn try_from(config: CatalogConfig) -> Result<Self, Self::Error> {
            Self::new(config)
        }
    }

    impl From<Catalog> for CatalogConfig {
        fn from(catalog: Catalog) -> Self {
            let Catalog {
                palette,
                default_display,
                no_color,
                untyped,
                rules,
                size_defaults,
                attributes,
            } = catalog;

            Self {
                palette: palette
                    .into_iter()
                    .map(|(key, color)| (key.to_string(), color))
                    .collect(),
                default_display,
                no_color: no_color.to_string(),
                untyped,
                rules: rules
                    .iter()
                    .map(|(kind, rule)| (kind.clone(), rule.to_config()))
                    .collect(),
                size_defaults,
                attributes,
            }
        }
    }

    fn ensure_not_blank(value: &str, name: &'static str) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            Err(ConfigError::BlankSetting(name))
        } else {
            Ok(())
        }
    }

    fn normalize_type_key(key: &str) -> Result<String, ConfigError> {
        let key = type_key(key);
        if key.is_empty() {
            Err(ConfigError::BlankKey("type keys"))
        } else {
            Ok(key)
        }
    }

    /// Re-key an ordered map, rejecting keys that collide after normalization.
    fn normalize_keys<K, V, F>(
        map: IndexMap<String, V>,
        section: &'static str,
        normalize: F,
    ) -> Result<IndexMap<K, V>, ConfigError>
    where
        K: Clone + Hash + Eq + Display,
        F: Fn(&str) -> Result<K, ConfigError>,
    {
        let mut originals: IndexMap<K, String> = IndexMap::with_capacity(map.len());
        let mut output = IndexMap::with_capacity(map.len());

        for (orig_key, value) in map {
            let key = normalize(&orig_key)?;
            if let Some(first) = originals.get(&key) {
                return Err(ConfigError::DuplicateKey {
                    section,
                    key: key.to_string(),
                    first: first.clone(),
                    second: orig_key,
                });
            }
            originals.insert(key.clone(), orig_key);
            output.insert(key, value);
        }

        Ok(output)
    }

    fn validate_rule(
        kind: &str,
        rule: ColorRule,
        palette: &IndexMap<ColorKey, String>,
    ) -> Result<Rule, ConfigError> {
        let fallback = ColorKey::normalize(rule.fallback())
            .filter(|fallback| palette.contains_key(fallback))
            .ok_or_else(|| ConfigError::UnknownFallback {
                kind: kind.to_owned(),
                fallback: rule.fallback().to_owned(),
            })?;

        let rule = match rule {
            ColorRule::AllowList { allowed, .. } => {
                let allowed: IndexSet<_> = allowed
                    .iter()
                    .filter_map(|key| ColorKey::normalize(key))
                    .collect();
                if allowed.is_empty() {
                    return Err(ConfigError::EmptyAllowList {
                        kind: kind.to_owned(),
                    });
                }
                if !allowed.contains(&fallback) {
                    return Err(ConfigError::FallbackNotAllowed {
                        kind: kind.to_owned(),
                        fallback: fallback.to_string(),
                    });
                }
                Rule::AllowList { allowed, fallback }
            }
            ColorRule::FillMissing { .. } => Rule::FillMissing { fallback },
            ColorRule::KnownColor { .. } => Rule::KnownColor { fallback },
        };

        Ok(rule)
    }
}
