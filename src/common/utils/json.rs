use rustc_serialize::json::{Array, Json, Object};

use crate::common::{ParseError, ParseResult};

type Result<T> = ParseResult<T>;

pub fn parse_json(string: &str) -> Result<Json> {
    Json::from_str(string)
        .map_err(ParseError::Parser)
}

pub fn parse_json_as_object(json: &Json) -> Result<&Object> {
    json.as_object()
        .ok_or(incompatible_type_error(""))
}

pub fn parse_string_from_json_object<'a>(object: &'a Object, property: &str) -> Result<&'a str> {
    parse_value_from_json_object(object, property)?
        .as_string()
        .ok_or(incompatible_type_error(property))
}

pub fn parse_object_from_json_object<'a>(object: &'a Object, property: &str) -> Result<&'a Object> {
    parse_value_from_json_object(object, property)?
        .as_object()
        .ok_or(incompatible_type_error(property))
}

/// `null` maps to `None`, any other non-object value is a type error.
pub fn parse_option_object_from_json_object<'a>(object: &'a Object, property: &str) -> Result<Option<&'a Object>> {
    let value = parse_value_from_json_object(object, property)?;

    if value.is_null() {
        return Ok(None);
    }

    value.as_object()
        .map(Some)
        .ok_or(incompatible_type_error(property))
}

pub fn parse_array_from_json_object<'a>(object: &'a Object, property: &str) -> Result<&'a Array> {
    parse_value_from_json_object(object, property)?
        .as_array()
        .ok_or(incompatible_type_error(property))
}

pub fn parse_string_array_from_json_object(object: &Object, property: &str) -> Result<Vec<String>> {
    parse_array_from_json_object(object, property)?
        .iter()
        .map(|item| {
            item.as_string()
                .map(|string| string.to_string())
                .ok_or(incompatible_type_error(property))
        })
        .collect()
}

pub fn parse_u64_from_json_object(object: &Object, property: &str) -> Result<u64> {
    parse_u64(parse_value_from_json_object(object, property)?, property)
}

pub fn parse_i64_from_json_object(object: &Object, property: &str) -> Result<i64> {
    match *parse_value_from_json_object(object, property)? {
        Json::I64(value) => Ok(value),
        Json::U64(value) if value <= i64::MAX as u64 => Ok(value as i64),
        Json::U64(_) => Err(out_of_range_error(property)),
        _ => Err(incompatible_type_error(property))
    }
}

pub fn parse_f64_from_json_object(object: &Object, property: &str) -> Result<f64> {
    parse_value_from_json_object(object, property)?
        .as_f64()
        .ok_or(incompatible_type_error(property))
}

/// Non-negative integer; negative integers are out of range, fractions are a type error.
pub fn parse_u64(json: &Json, property: &str) -> Result<u64> {
    match *json {
        Json::U64(value) => Ok(value),
        Json::I64(value) if value >= 0 => Ok(value as u64),
        Json::I64(_) => Err(out_of_range_error(property)),
        _ => Err(incompatible_type_error(property))
    }
}

fn parse_value_from_json_object<'a>(object: &'a Object, property: &str) -> Result<&'a Json> {
    object.get(property)
        .ok_or(missed_property_error(property))
}

fn incompatible_type_error(property: &str) -> ParseError {
    ParseError::IncompatibleType(property.to_string())
}

fn missed_property_error(property: &str) -> ParseError {
    ParseError::MissedProperty(property.to_string())
}

fn out_of_range_error(property: &str) -> ParseError {
    ParseError::OutOfRange(property.to_string())
}
