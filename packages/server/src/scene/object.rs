//! Scene object model and value coercion.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::SceneError;
use crate::messages::{BasicState, ObjectSnapshot, PhysicsState, Vec3Dto};
use crate::numeric::{WIRE_PRECISION, truncate};

/// String literals accepted as `true` when coercing into a boolean property
/// (matched case-insensitively). Everything else coerces to `false`.
const TRUE_LITERALS: [&str; 3] = ["true", "1", "yes"];

/// A three-component vector in scene space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }

    fn to_dto(self) -> Vec3Dto {
        Vec3Dto {
            x: truncate(self.x, WIRE_PRECISION),
            y: truncate(self.y, WIRE_PRECISION),
            z: truncate(self.z, WIRE_PRECISION),
        }
    }

    fn to_degrees_dto(self) -> Vec3Dto {
        Vec3Dto {
            x: truncate(self.x.to_degrees(), WIRE_PRECISION),
            y: truncate(self.y.to_degrees(), WIRE_PRECISION),
            z: truncate(self.z.to_degrees(), WIRE_PRECISION),
        }
    }
}

/// One axis of a transform vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Parse an optional wire axis name. An absent axis defaults to `x`.
    pub fn parse(axis: Option<&str>) -> Result<Self, SceneError> {
        match axis.unwrap_or("x") {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(SceneError::InvalidValue(format!("unknown axis '{other}'"))),
        }
    }
}

/// A custom ("game") property value stored on a scene object.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Text(String),
    Vector(Vec3),
}

impl PropertyValue {
    /// Coerce a raw wire value to this property's stored type.
    ///
    /// Numeric properties parse the raw value as a float, boolean
    /// properties match string input against [`TRUE_LITERALS`], and text
    /// properties stringify scalars. Vector properties cannot be
    /// overwritten wholesale.
    pub fn coerce(&self, raw: &Value) -> Result<PropertyValue, SceneError> {
        match self {
            PropertyValue::Float(_) | PropertyValue::Int(_) => {
                Ok(PropertyValue::Float(parse_float(raw)?))
            }
            PropertyValue::Bool(_) => match raw {
                Value::Bool(b) => Ok(PropertyValue::Bool(*b)),
                Value::String(s) => Ok(PropertyValue::Bool(
                    TRUE_LITERALS.contains(&s.to_lowercase().as_str()),
                )),
                other => Err(SceneError::InvalidValue(format!(
                    "could not convert {other} to a boolean"
                ))),
            },
            PropertyValue::Text(_) => match raw {
                Value::String(s) => Ok(PropertyValue::Text(s.clone())),
                Value::Number(n) => Ok(PropertyValue::Text(n.to_string())),
                Value::Bool(b) => Ok(PropertyValue::Text(b.to_string())),
                other => Err(SceneError::InvalidValue(format!(
                    "could not convert {other} to a string"
                ))),
            },
            PropertyValue::Vector(_) => Err(SceneError::InvalidValue(
                "vector properties cannot be overwritten directly".to_string(),
            )),
        }
    }

    /// Normalized wire representation: scalars or an `{x,y,z}` object.
    pub fn to_wire(&self) -> Value {
        match self {
            PropertyValue::Float(f) => {
                serde_json::Number::from_f64(truncate(*f, WIRE_PRECISION))
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
            PropertyValue::Int(i) => Value::from(*i),
            PropertyValue::Bool(b) => Value::from(*b),
            PropertyValue::Text(s) => Value::from(s.clone()),
            PropertyValue::Vector(v) => {
                let dto = v.to_dto();
                serde_json::json!({"x": dto.x, "y": dto.y, "z": dto.z})
            }
        }
    }
}

/// Parse a raw wire value (number or numeric string) as a float.
pub fn parse_float(raw: &Value) -> Result<f64, SceneError> {
    match raw {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| SceneError::InvalidValue(format!("could not convert {n} to a number"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| SceneError::InvalidValue(format!("could not convert '{s}' to a number"))),
        other => Err(SceneError::InvalidValue(format!(
            "could not convert {other} to a number"
        ))),
    }
}

/// Physics body state of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub mass: f64,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl RigidBody {
    pub fn with_mass(mass: f64) -> Self {
        Self {
            mass,
            linear_velocity: Vec3::default(),
            angular_velocity: Vec3::default(),
        }
    }
}

/// One object of the scene graph.
///
/// `rotation` stores euler angles in radians; the wire works in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub visible: bool,
    pub physics: Option<RigidBody>,
    pub properties: BTreeMap<String, PropertyValue>,
    pub materials: Option<Vec<String>>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::default(),
            rotation: Vec3::default(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            visible: true,
            physics: None,
            properties: BTreeMap::new(),
            materials: None,
        }
    }

    /// Apply a single property write with the wire's coercion rules.
    pub fn update_property(
        &mut self,
        property: &str,
        value: &Value,
        axis: Option<&str>,
    ) -> Result<(), SceneError> {
        match property {
            "position" => {
                let axis = Axis::parse(axis)?;
                self.position.set(axis, parse_float(value)?);
            }
            "scale" => {
                let axis = Axis::parse(axis)?;
                self.scale.set(axis, parse_float(value)?);
            }
            "rotation" => {
                let axis = Axis::parse(axis)?;
                let degrees = parse_float(value)?;
                // Rebuild the full euler triple and write it back in one
                // step instead of patching a derived single-axis view.
                let mut angles = self.rotation;
                angles.set(axis, degrees.to_radians());
                self.rotation = angles;
            }
            name => {
                let current = self.properties.get(name).ok_or_else(|| {
                    SceneError::PropertyNotFound {
                        object: self.name.clone(),
                        property: name.to_string(),
                    }
                })?;
                let coerced = current.coerce(value)?;
                self.properties.insert(name.to_string(), coerced);
            }
        }
        Ok(())
    }

    /// Build the wire-shaped snapshot of this object, all numerics
    /// truncated, rotation converted to degrees.
    pub fn snapshot(&self) -> ObjectSnapshot {
        let physics = match &self.physics {
            Some(body) => PhysicsState::Rigid {
                mass: truncate(body.mass, WIRE_PRECISION),
                linear_velocity: body.linear_velocity.to_dto(),
                angular_velocity: body.angular_velocity.to_dto(),
            },
            None => PhysicsState::not_applicable(),
        };

        let game = self
            .properties
            .iter()
            .map(|(name, value)| (name.clone(), value.to_wire()))
            .collect();

        let materials = match &self.materials {
            Some(names) => names.clone(),
            None => vec![crate::messages::NOT_APPLICABLE.to_string()],
        };

        ObjectSnapshot {
            basic: BasicState {
                position: self.position.to_dto(),
                rotation: self.rotation.to_degrees_dto(),
                scale: self.scale.to_dto(),
            },
            physics,
            game,
            materials,
        }
    }
}
