//! # Form Fields
//!
//! Routed calls go out as multipart forms. Nested payloads are flattened into
//! bracketed keys, so `{"data_botol": [{"koding": "A"}]}` becomes the single
//! field `data_botol[0][koding] = A`.
use serde_json::Value;

pub fn flatten(payload: &Value) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    push_fields(&mut fields, payload, None);

    fields
}

fn push_fields(fields: &mut Vec<(String, String)>, value: &Value, parent: Option<&str>) {
    let key = |child: &str| match parent {
        Some(parent) => format!("{parent}[{child}]"),
        None => child.to_string(),
    };

    match value {
        Value::Object(map) => {
            for (child, value) in map {
                push_fields(fields, value, Some(&key(child)));
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                push_fields(fields, value, Some(&key(&index.to_string())));
            }
        }
        scalar => {
            // bare scalars have no field name
            if let Some(parent) = parent {
                fields.push((parent.to_string(), scalar_text(scalar)));
            }
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::flatten;

    fn pairs(fields: &[(&str, &str)]) -> Vec<(String, String)> {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_nested() {
        let payload = json!({
            "no_sampel": "SMP-001",
            "data_botol": [
                { "koding": "A", "jumlah": 2 },
                { "koding": "B", "jumlah": 0 }
            ]
        });

        let mut fields = flatten(&payload);
        fields.sort();

        assert_eq!(
            fields,
            pairs(&[
                ("data_botol[0][jumlah]", "2"),
                ("data_botol[0][koding]", "A"),
                ("data_botol[1][jumlah]", "0"),
                ("data_botol[1][koding]", "B"),
                ("no_sampel", "SMP-001"),
            ])
        );
    }

    #[test]
    fn test_empty_values() {
        let payload = json!({ "a": null, "b": false, "c": {}, "d": [] });

        let mut fields = flatten(&payload);
        fields.sort();

        assert_eq!(fields, pairs(&[("a", ""), ("b", "")]));
        assert!(flatten(&json!({})).is_empty());
        assert!(flatten(&json!("bare")).is_empty());
    }
}
