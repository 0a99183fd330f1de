//! Shape-tagged generic values
//!
//! Scene data is persisted as loosely typed field maps. A bounding volume
//! becomes a map with a `"shape"` tag:
//!
//! | shape      | fields                                        |
//! |------------|-----------------------------------------------|
//! | `"box"`    | `center`, `axis0`, `axis1`, `axis2`, `extents` |
//! | `"sphere"` | `center`, `radius`                            |
//!
//! An empty volume is an empty map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::BoundingVolume;
use crate::error::KernelError;
use crate::foundation::math::Vec3;
use crate::geometry::{Box3, Sphere3};

/// Tag field naming the shape
pub const SHAPE_FIELD: &str = "shape";

/// Single field of a generic value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Text
    Text(String),
    /// Single number
    Float(f32),
    /// Number list
    Floats(Vec<f32>),
}

/// Field map keyed by name
pub type GenericValue = BTreeMap<String, FieldValue>;

fn floats(v: &Vec3) -> FieldValue {
    FieldValue::Floats(v.iter().copied().collect())
}

fn field<'a>(value: &'a GenericValue, name: &str) -> Result<&'a FieldValue, KernelError> {
    value.get(name).ok_or_else(|| KernelError::MissingField(name.to_string()))
}

fn vec3_field(value: &GenericValue, name: &str) -> Result<Vec3, KernelError> {
    match field(value, name)? {
        FieldValue::Floats(items) if items.len() == 3 => Ok(Vec3::new(items[0], items[1], items[2])),
        other => Err(KernelError::InvalidField {
            field: name.to_string(),
            reason: format!("expected three numbers, found {other:?}"),
        }),
    }
}

fn float_field(value: &GenericValue, name: &str) -> Result<f32, KernelError> {
    match field(value, name)? {
        FieldValue::Float(number) => Ok(*number),
        other => Err(KernelError::InvalidField {
            field: name.to_string(),
            reason: format!("expected a number, found {other:?}"),
        }),
    }
}

impl BoundingVolume {
    /// Field map describing this volume
    pub fn to_generic(&self) -> GenericValue {
        let mut value = GenericValue::new();
        match self {
            Self::Empty => {}
            Self::Box(b) => {
                value.insert(SHAPE_FIELD.to_string(), FieldValue::Text("box".to_string()));
                value.insert("center".to_string(), floats(&b.center));
                for (i, axis) in b.axes.iter().enumerate() {
                    value.insert(format!("axis{i}"), floats(axis));
                }
                value.insert("extents".to_string(), floats(&b.extents));
            }
            Self::Sphere(sphere) => {
                value.insert(SHAPE_FIELD.to_string(), FieldValue::Text("sphere".to_string()));
                value.insert("center".to_string(), floats(&sphere.center));
                value.insert("radius".to_string(), FieldValue::Float(sphere.radius));
            }
        }
        value
    }

    /// Volume described by a field map
    pub fn from_generic(value: &GenericValue) -> Result<Self, KernelError> {
        let Some(shape) = value.get(SHAPE_FIELD) else {
            return Ok(Self::Empty);
        };
        let FieldValue::Text(shape) = shape else {
            return Err(KernelError::InvalidField {
                field: SHAPE_FIELD.to_string(),
                reason: format!("expected text, found {shape:?}"),
            });
        };

        match shape.as_str() {
            "box" => Ok(Self::Box(Box3::new(
                vec3_field(value, "center")?,
                [vec3_field(value, "axis0")?, vec3_field(value, "axis1")?, vec3_field(value, "axis2")?],
                vec3_field(value, "extents")?,
            ))),
            "sphere" => Ok(Self::Sphere(Sphere3::new(
                vec3_field(value, "center")?,
                float_field(value, "radius")?,
            ))),
            other => Err(KernelError::UnknownShape(other.to_string())),
        }
    }
}
