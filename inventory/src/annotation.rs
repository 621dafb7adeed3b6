//! CVAT point annotation parsing.

use crate::{
    catalog::AttributeNames,
    common::*,
    error::{CoordinateError, GroupLocation, ParseError},
    record::{AnnotatedPoint, PixelSize},
};

/// The XML schema of a CVAT "for images" export. Only point shapes are read.
mod schema {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    pub struct Annotations {
        #[serde(default, rename = "image")]
        pub images: Vec<Image>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    pub struct Image {
        pub id: Option<String>,
        pub name: Option<String>,
        pub width: Option<String>,
        pub height: Option<String>,
        /// All shapes of the image in document order.
        #[serde(default, rename = "$value")]
        pub shapes: Vec<Shape>,
    }

    /// Shapes that may appear in an `<image>`. Only point-groups are kept.
    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    pub enum Shape {
        #[serde(rename = "points")]
        Points(Points),
        #[serde(rename = "box")]
        BoundingBox(Ignored),
        #[serde(rename = "polygon")]
        Polygon(Ignored),
        #[serde(rename = "polyline")]
        Polyline(Ignored),
        #[serde(rename = "ellipse")]
        Ellipse(Ignored),
        #[serde(rename = "cuboid")]
        Cuboid(Ignored),
        #[serde(rename = "skeleton")]
        Skeleton(Ignored),
        #[serde(rename = "mask")]
        Mask(Ignored),
        #[serde(rename = "tag")]
        Tag(Ignored),
    }

    impl Shape {
        pub fn into_points(self) -> Option<Points> {
            match self {
                Self::Points(points) => Some(points),
                _ => None,
            }
        }
    }

    /// A shape whose attributes and children are skipped.
    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    pub struct Ignored {}

    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    pub struct Points {
        pub label: Option<String>,
        pub points: Option<String>,
        #[serde(default, rename = "attribute")]
        pub attributes: Vec<Attribute>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    pub struct Attribute {
        pub name: String,
        #[serde(default, rename = "$value")]
        pub value: Option<String>,
    }
}

/// An `<image>` entry of the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageEntry {
    pub index: usize,
    pub id: Option<String>,
    pub name: Option<String>,
    /// The size declared in the document, if both dimensions are present.
    pub size: Option<PixelSize>,
    pub num_points: usize,
}

/// The parsed annotation document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotations {
    pub images: Vec<ImageEntry>,
    /// Points of all images in document order.
    pub points: Vec<AnnotatedPoint>,
}

impl Annotations {
    pub fn parse(text: &str, names: &AttributeNames) -> Result<Self, ParseError> {
        let document: schema::Annotations = serde_xml_rs::from_str(text)?;
        let mut images = Vec::with_capacity(document.images.len());
        let mut points = vec![];

        for (image_index, image) in document.images.into_iter().enumerate() {
            let schema::Image {
                id,
                name,
                width,
                height,
                shapes,
            } = image;
            let num_points_before = points.len();
            let groups = shapes.into_iter().filter_map(schema::Shape::into_points);

            for (group_index, group) in groups.enumerate() {
                let schema::Points {
                    label,
                    points: coordinates,
                    attributes,
                } = group;
                let label = non_blank(label);
                let location = || GroupLocation {
                    image_index,
                    image_name: name.clone(),
                    group_index,
                    label: label.clone(),
                };

                let raw = coordinates.ok_or_else(|| ParseError::MissingCoordinates {
                    location: location(),
                })?;
                let pairs = parse_coordinate_list(&raw).map_err(|(pair, reason)| {
                    ParseError::InvalidCoordinate {
                        location: location(),
                        pair,
                        raw: raw.clone(),
                        reason,
                    }
                })?;

                // the last attribute wins on duplicated names
                let mut color = None;
                let mut size = None;
                for schema::Attribute { name: key, value } in attributes {
                    if key == names.color {
                        color = non_blank(value);
                    } else if key == names.size {
                        size = non_blank(value);
                    }
                }

                points.extend(pairs.into_iter().map(|[x, y]| AnnotatedPoint {
                    x,
                    y,
                    label: label.clone(),
                    color: color.clone(),
                    size: size.clone(),
                }));
            }

            let size = match (parse_dimension(&width), parse_dimension(&height)) {
                (Some(width), Some(height)) => Some(PixelSize::new(width, height)),
                _ => None,
            };

            images.push(ImageEntry {
                index: image_index,
                id,
                name,
                size,
                num_points: points.len() - num_points_before,
            });
        }

        debug!(
            "parsed {} points from {} images",
            points.len(),
            images.len()
        );

        Ok(Self { images, points })
    }

    pub fn open<P>(path: P, names: &AttributeNames) -> Result<Self, ParseError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&text, names)
    }
}

/// Parse a `x,y;x,y;...` list. On failure, returns the offending pair and the reason.
pub fn parse_coordinate_list(raw: &str) -> Result<Vec<[R64; 2]>, (String, CoordinateError)> {
    raw.split(';')
        .map(|pair| {
            let components: Vec<_> = pair.split(',').collect();
            let (x, y) = match *components.as_slice() {
                [x, y] => (x, y),
                _ => {
                    return Err((pair.to_owned(), CoordinateError::Arity(components.len())));
                }
            };
            let parse = |text: &str| {
                let text = text.trim();
                text.parse::<f64>()
                    .ok()
                    .and_then(R64::try_new)
                    .ok_or_else(|| (pair.to_owned(), CoordinateError::NotANumber(text.to_owned())))
            };
            Ok([parse(x)?, parse(y)?])
        })
        .collect()
}

/// Drop blank text. Non-blank text is kept as written.
fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|text| !text.trim().is_empty())
}

fn parse_dimension(text: &Option<String>) -> Option<usize> {
    let text = text.as_deref()?;
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value.round() as usize),
        _ => {
            warn!("ignore invalid image dimension '{}'", text);
            None
        }
    }
}
