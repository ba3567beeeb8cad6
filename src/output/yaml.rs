//! YAML rendering and the fix-up passes applied to rendered manifests

use crate::error::{KubifyError, Result};
use serde_yaml::Value;

/// Key commented out of YAML manifests; Rancher cannot parse it
pub const EXTERNAL_NAME_KEY: &str = "ExternalName:";

/// Render a JSON document as YAML
pub fn to_yaml(document: &serde_json::Value) -> Result<String> {
    serde_yaml::to_string(document).map_err(|e| KubifyError::Yaml(e.to_string()))
}

/// Sequence opened by an `env:` key
struct EnvBlock {
    key_indent: usize,
    item_indent: Option<usize>,
}

impl EnvBlock {
    fn contains(&mut self, indent: usize, body: &str) -> bool {
        let item = body.starts_with("- ");
        match self.item_indent {
            None if item && indent >= self.key_indent => {
                self.item_indent = Some(indent);
                true
            }
            None => false,
            Some(item_indent) => indent > item_indent || (indent == item_indent && item),
        }
    }
}

/// Re-emit every env var `value:` as a double-quoted scalar.
///
/// The YAML emitter leaves plain-looking strings unquoted, and numeric or
/// boolean looking values would change type when the manifest is edited
/// and re-read.
pub fn quote_env_values(yaml: &str) -> Result<String> {
    let lines: Vec<&str> = yaml.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut block: Option<EnvBlock> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let indent = indent_of(line);
        let body = &line[indent..];

        if let Some(env) = block.as_mut() {
            if !env.contains(indent, body) {
                block = None;
            }
        }

        if block.is_none() {
            let key = body.strip_prefix("- ").unwrap_or(body);
            if key.trim_end() == "env:" {
                block = Some(EnvBlock {
                    key_indent: indent + body.len() - key.len(),
                    item_indent: None,
                });
            }
            out.push(line.to_string());
            i += 1;
            continue;
        }

        let item_indent = block.as_ref().and_then(|b| b.item_indent).unwrap_or(indent);
        let key_col = item_indent + 2;
        let key = if indent == item_indent {
            body.strip_prefix("- ")
        } else if indent == key_col {
            Some(body)
        } else {
            None
        };

        let Some(scalar) = key.and_then(|k| k.strip_prefix("value:")) else {
            out.push(line.to_string());
            i += 1;
            continue;
        };

        // Block scalars continue on more deeply indented lines
        let mut end = i + 1;
        while end < lines.len()
            && (lines[end].trim().is_empty() || indent_of(lines[end]) > key_col)
        {
            end += 1;
        }

        let mut document = format!("value:{}", scalar);
        for continuation in &lines[i + 1..end] {
            document.push('\n');
            document.push_str(continuation.get(key_col..).unwrap_or(""));
        }
        // Block scalar chomping needs the final line break
        document.push('\n');

        let value = scalar_string(&document)?;
        let prefix = &line[..line.len() - scalar.len() - "value:".len()];
        out.push(format!("{}value: {}", prefix, serde_json::to_string(&value)?));
        i = end;
    }

    let mut result = out.join("\n");
    if yaml.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

/// Prefix every `ExternalName:` key with `# `
pub fn comment_external_name(yaml: &str) -> String {
    let mut result: String = yaml
        .lines()
        .map(|line| {
            let indent = indent_of(line);
            let body = &line[indent..];
            let offset = if body.starts_with("- ") { indent + 2 } else { indent };
            if line[offset..].starts_with(EXTERNAL_NAME_KEY) {
                format!("{}# {}", &line[..offset], &line[offset..])
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    if yaml.ends_with('\n') {
        result.push('\n');
    }
    result
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Decode the `value` of a one-key YAML document as a string
fn scalar_string(document: &str) -> Result<String> {
    let parsed: serde_yaml::Mapping =
        serde_yaml::from_str(document).map_err(|e| KubifyError::Yaml(e.to_string()))?;

    Ok(match parsed.get("value") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => {
            return Err(KubifyError::Yaml(format!(
                "Unexpected environment value {:?}",
                other
            )))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_env_values() {
        let document = json!({
            "containers": [{
                "name": "web",
                "env": [
                    {"name": "NAMESPACE", "value": "default"},
                    {"name": "ENABLED", "value": "true"},
                    {"name": "PORT", "value": "8080"},
                    {"name": "EMPTY", "value": ""},
                    {"name": "QUOTE", "value": "say \"hi\""}
                ],
                "image": "nginx"
            }]
        });

        let yaml = quote_env_values(&to_yaml(&document).unwrap()).unwrap();

        assert!(yaml.contains("value: \"default\""));
        assert!(yaml.contains("value: \"true\""));
        assert!(yaml.contains("value: \"8080\""));
        assert!(yaml.contains("value: \"\""));
        assert!(yaml.contains(r#"value: "say \"hi\"""#));
        assert!(yaml.contains("image: nginx"));

        let reparsed: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(reparsed, document);
    }

    #[test]
    fn test_quote_multiline_value() {
        let document = json!({
            "env": [{"name": "SCRIPT", "value": "line one\nline two\n"}],
            "other": {"value": "untouched"}
        });

        let yaml = quote_env_values(&to_yaml(&document).unwrap()).unwrap();

        assert!(yaml.contains(r#"value: "line one\nline two\n""#));
        assert!(yaml.contains("value: untouched"));

        let reparsed: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(reparsed, document);
    }

    #[test]
    fn test_quote_value_with_trailing_newline() {
        let document = json!({
            "containers": [{
                "env": [
                    {"name": "A", "value": "end\n"},
                    {"name": "KEY", "value": "-----BEGIN KEY-----\nabc\n-----END KEY-----\n"},
                    {"name": "KEEP", "value": "tail\n\n"}
                ],
                "image": "x"
            }]
        });

        let yaml = quote_env_values(&to_yaml(&document).unwrap()).unwrap();

        assert!(yaml.contains(r#"value: "end\n""#));
        assert!(yaml.contains(r#"value: "tail\n\n""#));

        let reparsed: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(reparsed, document);
    }

    #[test]
    fn test_values_outside_env_are_untouched() {
        let yaml = "labels:\n  value: plain\nenv: []\n";
        assert_eq!(quote_env_values(yaml).unwrap(), yaml);
    }

    #[test]
    fn test_comment_external_name() {
        let yaml = "spec:\n  ExternalName: db.example.com\n  type: ClusterIP\n";
        assert_eq!(
            comment_external_name(yaml),
            "spec:\n  # ExternalName: db.example.com\n  type: ClusterIP\n"
        );

        let untouched = "spec:\n  externalName: db.example.com\n";
        assert_eq!(comment_external_name(untouched), untouched);
    }
}
