//! Layered merging of YAML configuration values.
//!
//! # Merge Rules
//!
//! - Mappings are merged recursively
//! - Sequences and scalars in the overlay replace the base
//! - Null values in the overlay remove the key, restoring its default

use serde_yaml::Value;

/// Deep merge `overlay` onto `base`.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();

            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    result.remove(key);
                } else if let Some(base_value) = base_map.get(key) {
                    result.insert(key.clone(), deep_merge(base_value, overlay_value));
                } else {
                    result.insert(key.clone(), overlay_value.clone());
                }
            }

            Value::Mapping(result)
        }

        // An empty file parses to null and leaves the base untouched.
        (base, Value::Null) => base.clone(),

        (_, overlay) => overlay.clone(),
    }
}

/// Merge config layers in order (later overrides earlier).
pub fn merge_configs(configs: &[Value]) -> Value {
    configs
        .iter()
        .fold(Value::Mapping(Default::default()), |acc, config| {
            deep_merge(&acc, config)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn overlay_replaces_at_conflict_point() {
        let base = yaml(
            r#"
toolbox:
  executable: saga_cmd
  timeout_secs: 600
"#,
        );
        let overlay = yaml(
            r#"
toolbox:
  executable: /opt/saga/bin/saga_cmd
"#,
        );

        let result = deep_merge(&base, &overlay);

        assert_eq!(result["toolbox"]["executable"], "/opt/saga/bin/saga_cmd");
        assert_eq!(result["toolbox"]["timeout_secs"], 600);
    }

    #[test]
    fn null_removes_inherited_value() {
        let base = yaml("defaults:\n  threshold: 500\n  min_slope: 0.1\n");
        let overlay = yaml("defaults:\n  threshold: null\n");

        let result = deep_merge(&base, &overlay);

        assert!(result["defaults"].get("threshold").is_none());
        assert_eq!(result["defaults"]["min_slope"], 0.1);
    }

    #[test]
    fn empty_overlay_returns_base_unchanged() {
        let base = yaml("channels:\n  min_segment_length: 20\n");
        let overlay = yaml("");

        let result = deep_merge(&base, &overlay);

        assert_eq!(result["channels"]["min_segment_length"], 20);
    }

    #[test]
    fn merge_configs_merges_multiple_in_order() {
        let configs = vec![yaml("a: 1\nb: 2"), yaml("b: 3\nc: 4"), yaml("c: 5")];

        let result = merge_configs(&configs);

        assert_eq!(result["a"], 1);
        assert_eq!(result["b"], 3);
        assert_eq!(result["c"], 5);
    }
}
