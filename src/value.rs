//! The value-builder collaborator: out of scope for this crate to
//! define, so we consume `serde_json`'s tree directly. `Value`
//! is a JSON-style value model — null/bool/int-or-decimal/string, ordered
//! sequences, insertion-ordered string-keyed maps (via the `preserve_order`
//! feature) — which is exactly the superset the parser needs to build
//! into.

pub use serde_json::{Map, Number, Value};

/// The YAML 1.2 default tags.
pub mod tag {
    pub const NULL: &str = "tag:yaml.org,2002:null";
    pub const BOOL: &str = "tag:yaml.org,2002:bool";
    pub const INT: &str = "tag:yaml.org,2002:int";
    pub const FLOAT: &str = "tag:yaml.org,2002:float";
    pub const STR: &str = "tag:yaml.org,2002:str";
    pub const SEQ: &str = "tag:yaml.org,2002:seq";
    pub const MAP: &str = "tag:yaml.org,2002:map";

    /// The default tag for a node that carries no explicit/inferred tag,
    /// derived from the shape of its already-materialized value.
    pub fn default_for(value: &super::Value) -> &'static str {
        match value {
            super::Value::Null => NULL,
            super::Value::Bool(_) => BOOL,
            super::Value::Number(n) => {
                let text = n.to_string();
                if text.contains('.') || text.contains('e') || text.contains('E') {
                    FLOAT
                } else {
                    INT
                }
            }
            super::Value::String(_) => STR,
            super::Value::Array(_) => SEQ,
            super::Value::Object(_) => MAP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tag_distinguishes_int_from_float() {
        assert_eq!(tag::default_for(&Value::from(65)), tag::INT);
        assert_eq!(tag::default_for(&serde_json::Number::from_f64(0.278).map(Value::Number).unwrap()), tag::FLOAT);
    }
}
