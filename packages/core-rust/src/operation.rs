//! Static operation descriptors and argument binding.
//!
//! An [`OperationDescriptor`] declares how one named capability maps onto a
//! backend request: method, path template, parameter schema, and how the JSON
//! body is built. [`OperationDescriptor::bind`] turns caller arguments into a
//! concrete [`RequestOptions`] plus the explicit credential override, or a
//! validation error. Binding never touches the network.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::credential::Credential;
use crate::error::GatewayError;
use crate::schema::{self, ParamDef, ParamLocation, ValidationResult, API_KEY_PARAM};
use crate::types::{HttpMethod, RequestOptions};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Characters that would let a path argument escape its segment. `\` is a
/// separator for http(s) URLs and `%` could smuggle an encoded one.
const FORBIDDEN_SEGMENT_CHARS: &[char] = &['/', '\\', '?', '#', '%'];

/// Builds the JSON body from validated body-location arguments.
pub type BodyBuilder = fn(&Map<String, Value>) -> Value;

/// How the request body is constructed.
#[derive(Debug, Clone, Copy)]
pub enum BodyRule {
    /// No body is sent.
    Empty,
    /// Every present body-location parameter becomes a top-level field.
    Fields,
    /// Operation-specific construction over the body-location arguments.
    Custom(BodyBuilder),
}

/// Declarative description of one operation.
#[derive(Debug, Clone, Copy)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub method: HttpMethod,
    /// Path relative to the backend base URL; `{name}` marks a path parameter.
    pub path: &'static str,
    pub params: &'static [ParamDef],
    pub body: BodyRule,
}

/// A bound operation, ready for credential resolution and dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Request with `credential` still unset.
    pub request: RequestOptions,
    /// The caller-supplied `api_key`, if any.
    pub explicit_credential: Option<Credential>,
}

impl OperationDescriptor {
    /// JSON Schema for the operation's arguments, including `api_key`.
    #[must_use]
    pub fn input_schema(&self) -> Value {
        schema::input_schema(self.params)
    }

    /// Names of the placeholders in the path template, in order.
    #[must_use]
    pub fn path_placeholders(&self) -> Vec<&'static str> {
        PLACEHOLDER
            .captures_iter(self.path)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Validates `args` and builds the backend request.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Validation` when the arguments fail the schema,
    /// or when a path argument is empty or contains `/`, `?` or `#`.
    pub fn bind(&self, args: &Map<String, Value>) -> Result<Binding, GatewayError> {
        let validated = match schema::validate(self.params, args) {
            ValidationResult::Valid(map) => map,
            ValidationResult::Invalid { errors } => return Err(GatewayError::Validation { errors }),
        };

        let path = self.expand_path(&validated)?;
        let mut request = RequestOptions::new(self.method, path);

        let mut body_args = Map::new();
        for param in self.params {
            let Some(value) = validated.get(param.name) else {
                continue;
            };
            match param.location {
                ParamLocation::Path => {}
                ParamLocation::Query => {
                    request = request.with_query(param.name, query_value(value));
                }
                ParamLocation::Body => {
                    body_args.insert(param.name.to_string(), value.clone());
                }
            }
        }

        request.body = match self.body {
            BodyRule::Empty => None,
            BodyRule::Fields => Some(Value::Object(body_args)),
            BodyRule::Custom(build) => Some(build(&body_args)),
        };

        let explicit_credential = validated
            .get(API_KEY_PARAM)
            .and_then(Value::as_str)
            .and_then(Credential::new);

        Ok(Binding {
            request,
            explicit_credential,
        })
    }

    fn expand_path(&self, args: &Map<String, Value>) -> Result<String, GatewayError> {
        let mut errors = Vec::new();
        let path = PLACEHOLDER.replace_all(self.path, |caps: &Captures<'_>| {
            let name = &caps[1];
            match args.get(name).and_then(Value::as_str) {
                Some(segment) if segment.is_empty() => {
                    errors.push(format!("parameter `{name}` must not be empty"));
                    String::new()
                }
                Some(segment) if segment.contains(FORBIDDEN_SEGMENT_CHARS) => {
                    errors.push(format!(
                        "parameter `{name}` must not contain '/', '\\', '?', '#' or '%'"
                    ));
                    String::new()
                }
                Some("." | "..") => {
                    errors.push(format!("parameter `{name}` must not be a dot segment"));
                    String::new()
                }
                Some(segment) => segment.to_string(),
                None => {
                    errors.push(format!("missing path parameter `{name}`"));
                    String::new()
                }
            }
        });

        if errors.is_empty() {
            Ok(path.into_owned())
        } else {
            Err(GatewayError::Validation { errors })
        }
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
