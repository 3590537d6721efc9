//! Named property application.
//!
//! Configuration maps carry `{name -> value}` pairs that are applied to a
//! target object through the mutator convention: the key `bold` resolves to
//! the mutator `setBold`. Each target kind registers its mutators in a static
//! table, so dispatch is explicit and checked at compile time while still
//! accepting arbitrary configuration keys.

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Property map as it appears in the configuration tree.
///
/// Iteration follows insertion order (`serde_json` is built with
/// `preserve_order`).
pub type PropertyMap = Map<String, Value>;

/// A mutator applying one JSON value to a target.
pub type Setter<T> = fn(&mut T, &Value) -> Result<()>;

/// An object that accepts named properties.
pub trait PropertyTarget: Sized + 'static {
    /// Kind name used in error messages (`font`, `shape`, ...).
    const KIND: &'static str;

    /// Mutator table, keyed by configuration name.
    fn setters() -> &'static [(&'static str, Setter<Self>)];

    /// Look up the mutator for a configuration key.
    fn setter(key: &str) -> Option<Setter<Self>> {
        let wanted = mutator_name(key);
        Self::setters()
            .iter()
            .find(|(name, _)| mutator_name(name) == wanted)
            .map(|(_, setter)| *setter)
    }
}

/// Mutator name for a configuration key: capitalize, prefix with `set`.
pub fn mutator_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_uppercase(), chars.as_str()),
        None => "set".to_string(),
    }
}

/// Apply every entry of `properties` to `target`, in map order.
///
/// Stops at the first unknown key or rejected value. Entries applied before
/// the failure are not rolled back.
pub fn apply_properties<'t, T: PropertyTarget>(
    target: &'t mut T,
    properties: &PropertyMap,
) -> Result<&'t mut T> {
    for (name, value) in properties {
        let setter = T::setter(name).ok_or_else(|| Error::UnsupportedProperty {
            target: T::KIND,
            property: name.clone(),
        })?;
        log::trace!("{}: {} = {}", T::KIND, mutator_name(name), value);
        setter(target, value)?;
    }
    Ok(target)
}

// Value coercions shared by the setter tables.

pub(crate) fn expect_str<'v>(target: &'static str, key: &str, value: &'v Value) -> Result<&'v str> {
    value
        .as_str()
        .ok_or_else(|| Error::invalid_value(target, key, "a string"))
}

/// Strings, with `null` clearing the property.
pub(crate) fn expect_opt_string(
    target: &'static str,
    key: &str,
    value: &Value,
) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(Error::invalid_value(target, key, "a string or null")),
    }
}

pub(crate) fn expect_bool(target: &'static str, key: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::invalid_value(target, key, "a boolean"))
}

pub(crate) fn expect_f64(target: &'static str, key: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::invalid_value(target, key, "a number"))
}

pub(crate) fn expect_i64(target: &'static str, key: &str, value: &Value) -> Result<i64> {
    if let Some(v) = value.as_i64() {
        return Ok(v);
    }
    // Accept whole floats such as `100.0`.
    match value.as_f64() {
        Some(v) if v.fract() == 0.0 && v.is_finite() => Ok(v as i64),
        _ => Err(Error::invalid_value(target, key, "an integer")),
    }
}
