//! Structural parameter schemas for operations.
//!
//! Schemas are declared statically alongside each operation and serve two
//! purposes: they are rendered as JSON Schema for tool discovery, and they
//! validate incoming arguments before any backend call is made. Validation is
//! purely structural (presence, JSON type, enumerations, numeric ranges).

use serde_json::{json, Map, Value};

/// Name of the explicit-credential argument accepted by every operation.
pub const API_KEY_PARAM: &str = "api_key";

/// JSON type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl ParamType {
    /// JSON Schema `type` keyword for this parameter type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

/// Where a parameter ends up in the backend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// Substituted into a `{name}` placeholder of the path template.
    Path,
    /// Appended to the query string when present.
    Query,
    /// Available to the body-construction rule.
    Body,
}

/// Static default applied when an optional parameter is omitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Str(&'static str),
}

impl DefaultValue {
    fn to_json(self) -> Value {
        match self {
            Self::Str(s) => json!(s),
        }
    }
}

/// Single parameter definition.
///
/// Built with `const` constructors so operation catalogs can be plain statics.
#[derive(Debug, Clone, Copy)]
pub struct ParamDef {
    /// Argument name as seen by callers.
    pub name: &'static str,
    pub ty: ParamType,
    pub required: bool,
    pub description: &'static str,
    pub location: ParamLocation,
    pub default: Option<DefaultValue>,
    /// Allowed values for string parameters; empty means unrestricted.
    pub allowed: &'static [&'static str],
    /// Inclusive numeric range.
    pub range: Option<(f64, f64)>,
}

impl ParamDef {
    const fn base(name: &'static str, ty: ParamType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: false,
            description,
            location: ParamLocation::Body,
            default: None,
            allowed: &[],
            range: None,
        }
    }

    /// Required string substituted into the path template.
    #[must_use]
    pub const fn path(name: &'static str, description: &'static str) -> Self {
        let mut def = Self::base(name, ParamType::String, description);
        def.required = true;
        def.location = ParamLocation::Path;
        def
    }

    /// Optional integer appended to the query string.
    #[must_use]
    pub const fn query_int(name: &'static str, description: &'static str) -> Self {
        let mut def = Self::base(name, ParamType::Integer, description);
        def.location = ParamLocation::Query;
        def
    }

    /// Optional body string.
    #[must_use]
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self::base(name, ParamType::String, description)
    }

    /// Optional body integer.
    #[must_use]
    pub const fn integer(name: &'static str, description: &'static str) -> Self {
        Self::base(name, ParamType::Integer, description)
    }

    /// Optional body number.
    #[must_use]
    pub const fn number(name: &'static str, description: &'static str) -> Self {
        Self::base(name, ParamType::Number, description)
    }

    /// Marks the parameter as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default used when the parameter is omitted.
    #[must_use]
    pub const fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Restricts a string parameter to a fixed set of values.
    #[must_use]
    pub const fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = allowed;
        self
    }

    /// Restricts a numeric parameter to an inclusive range.
    #[must_use]
    pub const fn between(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// JSON Schema fragment describing this parameter.
    #[must_use]
    pub fn json_schema(&self) -> Value {
        let mut schema = json!({
            "type": self.ty.as_str(),
            "description": self.description,
        });
        if let Some(default) = self.default {
            schema["default"] = default.to_json();
        }
        if !self.allowed.is_empty() {
            schema["enum"] = json!(self.allowed);
        }
        if let Some((min, max)) = self.range {
            schema["minimum"] = json!(min);
            schema["maximum"] = json!(max);
        }
        schema
    }

    fn check(&self, value: &Value, errors: &mut Vec<String>) {
        if !self.ty.accepts(value) {
            errors.push(format!(
                "parameter `{}` must be of type {}",
                self.name,
                self.ty.as_str()
            ));
            return;
        }
        if !self.allowed.is_empty() {
            if let Some(s) = value.as_str() {
                if !self.allowed.contains(&s) {
                    errors.push(format!(
                        "parameter `{}` must be one of: {}",
                        self.name,
                        self.allowed.join(", ")
                    ));
                }
            }
        }
        if let (Some((min, max)), Some(n)) = (self.range, value.as_f64()) {
            if n < min || n > max {
                errors.push(format!(
                    "parameter `{}` must be between {min} and {max}",
                    self.name
                ));
            }
        }
    }
}

/// Result of validating arguments against a parameter schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// The arguments conform; carries them with defaults applied and nulls dropped.
    Valid(Map<String, Value>),
    /// One or more constraints failed.
    Invalid {
        /// Human-readable descriptions of each validation failure.
        errors: Vec<String>,
    },
}

/// Renders a complete JSON Schema object for a parameter list.
///
/// The optional `api_key` credential override is appended to every schema.
#[must_use]
pub fn input_schema(params: &[ParamDef]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for param in params {
        properties.insert(param.name.to_string(), param.json_schema());
        if param.required {
            required.push(param.name);
        }
    }
    properties.insert(
        API_KEY_PARAM.to_string(),
        json!({
            "type": "string",
            "description": "Open WebUI API key to use instead of the caller's session credential",
        }),
    );
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

/// Validates `args` against `params`.
///
/// Unknown arguments are rejected. `null` is treated the same as an omitted
/// argument. `api_key` is always accepted when it is a string.
#[must_use]
pub fn validate(params: &[ParamDef], args: &Map<String, Value>) -> ValidationResult {
    let mut errors = Vec::new();

    for key in args.keys() {
        if key != API_KEY_PARAM && !params.iter().any(|p| p.name == key) {
            errors.push(format!("unknown parameter `{key}`"));
        }
    }

    match args.get(API_KEY_PARAM) {
        None | Some(Value::Null | Value::String(_)) => {}
        Some(_) => errors.push(format!("parameter `{API_KEY_PARAM}` must be of type string")),
    }

    let mut validated = Map::new();
    for param in params {
        match args.get(param.name) {
            None | Some(Value::Null) => {
                if let Some(default) = param.default {
                    validated.insert(param.name.to_string(), default.to_json());
                } else if param.required {
                    errors.push(format!("missing required parameter `{}`", param.name));
                }
            }
            Some(value) => {
                param.check(value, &mut errors);
                validated.insert(param.name.to_string(), value.clone());
            }
        }
    }

    if let Some(Value::String(key)) = args.get(API_KEY_PARAM) {
        validated.insert(API_KEY_PARAM.to_string(), Value::String(key.clone()));
    }

    if errors.is_empty() {
        ValidationResult::Valid(validated)
    } else {
        ValidationResult::Invalid { errors }
    }
}
