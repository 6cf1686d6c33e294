use schemars::{schema_for, JsonSchema};
use serde_json::Value;

/// A self-contained JSON schema for `T`, suitable for pasting into a prompt.
///
/// - every object gets `additionalProperties: false` and lists all of its
///   properties as `required`
/// - `$ref`s are inlined and `definitions`, `$schema` and `title` are dropped
pub fn json_schema<T: JsonSchema>() -> Value {
    let schema = schema_for!(T);
    let mut value = serde_json::to_value(schema).unwrap_or_default();

    fix_object_schemas(&mut value);
    inline_refs(&mut value);

    if let Value::Object(map) = &mut value {
        map.remove("definitions");
        map.remove("$schema");
        map.remove("title");
    }

    value
}

fn fix_object_schemas(value: &mut Value) {
    if let Value::Object(map) = value {
        if map.get("type") == Some(&Value::String("object".to_string())) {
            map.insert("additionalProperties".to_string(), Value::Bool(false));

            if let Some(Value::Object(props)) = map.get("properties") {
                let all_keys: Vec<Value> = props.keys().map(|k| Value::String(k.clone())).collect();
                map.insert("required".to_string(), Value::Array(all_keys));
            }
        }

        for (_, v) in map.iter_mut() {
            fix_object_schemas(v);
        }
    } else if let Value::Array(arr) = value {
        for item in arr.iter_mut() {
            fix_object_schemas(item);
        }
    }
}

fn inline_refs(value: &mut Value) {
    let definitions = if let Value::Object(map) = value {
        map.get("definitions").cloned()
    } else {
        None
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref").cloned() {
                if let Some(type_name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(type_name) {
                        *value = def.clone();
                        inline_refs_recursive(value, definitions);
                        return;
                    }
                }
            }

            if let Some(Value::Array(mut all_of)) = map.get("allOf").cloned() {
                if all_of.len() == 1 {
                    *value = all_of.remove(0);
                    inline_refs_recursive(value, definitions);
                    return;
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct Finding {
        label: String,
        severity: Option<u8>,
    }

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct Report {
        summary: String,
        findings: Vec<Finding>,
    }

    #[test]
    fn drops_schema_metadata() {
        let schema = json_schema::<Report>();
        let obj = schema.as_object().unwrap();
        assert!(!obj.contains_key("definitions"));
        assert!(!obj.contains_key("$schema"));
        assert!(!obj.contains_key("title"));
        assert_eq!(obj.get("additionalProperties"), Some(&Value::Bool(false)));
    }

    #[test]
    fn nested_structs_are_inlined_and_fully_required() {
        let schema = json_schema::<Report>();
        let items = &schema["properties"]["findings"]["items"];
        assert!(items.get("$ref").is_none());
        assert_eq!(items["type"], "object");

        let required: Vec<&str> = items["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"label"));
        assert!(required.contains(&"severity"));
    }
}
