use serde_json::Value;

use crate::error::{Error, Result};
use crate::request::{PayloadShape, RequestMethod};

/// Turn an approval payload into the result for `method`.
///
/// Total over the known methods; anything else is `UnsupportedMethod`.
pub fn shape_result(method: &str, data: Value) -> Result<Value> {
    let method: RequestMethod = method.parse()?;
    match method.payload_shape() {
        PayloadShape::Signature => match data {
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::String(signature)) => Ok(Value::String(signature)),
                Some(other) => Err(Error::InvalidData(format!(
                    "{} expects a string 'data' field, got {}",
                    method,
                    kind_of(&other)
                ))),
                None => Err(Error::InvalidData(format!(
                    "{} expects a 'data' field",
                    method
                ))),
            },
            other => Err(Error::InvalidData(format!(
                "{} expects an object, got {}",
                method,
                kind_of(&other)
            ))),
        },
        PayloadShape::Structured => match data {
            Value::Object(map) => Ok(Value::Object(map)),
            other => Err(Error::InvalidData(format!(
                "{} expects an object, got {}",
                method,
                kind_of(&other)
            ))),
        },
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
