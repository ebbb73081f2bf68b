//! Interpolation of `${key.path}` references
//!
//! Runs over the fully composed tree. A string that is exactly one
//! reference takes the referenced value as is, keeping its type. A
//! reference embedded in a longer string is substituted textually and must
//! point at a string, number or boolean.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::{Error, KeyPath, Result};

static REFERENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^${}]*)\}").unwrap());

/// Whether `text` contains at least one `${...}` reference.
pub fn has_references(text: &str) -> bool {
    REFERENCE_PATTERN.is_match(text)
}

/// Key paths referenced by `text`, in order of appearance.
pub fn references(text: &str) -> Vec<String> {
    REFERENCE_PATTERN
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

/// Return a copy of `tree` with every reference substituted.
///
/// # Errors
///
/// - `MissingReference` when a reference names an absent key
/// - `CyclicReference` when references loop back on themselves
/// - `InvalidInterpolation` for a malformed reference or a non-scalar
///   value embedded in a longer string
pub fn resolve(tree: &Value) -> Result<Value> {
    let mut resolver = Resolver {
        tree,
        resolved: HashMap::new(),
        stack: Vec::new(),
    };
    resolver.resolve_node(&KeyPath::root(), tree)
}

struct Resolver<'a> {
    tree: &'a Value,
    /// Interpolated strings already substituted, by key path.
    resolved: HashMap<KeyPath, Value>,
    /// Strings currently being substituted, outermost first.
    stack: Vec<KeyPath>,
}

impl Resolver<'_> {
    fn resolve_node(&mut self, path: &KeyPath, node: &Value) -> Result<Value> {
        match node {
            Value::String(text) if has_references(text) => self.resolve_string(path, text),
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, child) in map {
                    let value = self.resolve_node(&path.child(key.as_str()), child)?;
                    out.insert(key.clone(), value);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, child)| self.resolve_node(&path.child(index.to_string()), child))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    fn resolve_string(&mut self, path: &KeyPath, text: &str) -> Result<Value> {
        if let Some(value) = self.resolved.get(path) {
            return Ok(value.clone());
        }
        if let Some(start) = self.stack.iter().position(|seen| seen == path) {
            let mut chain: Vec<String> =
                self.stack[start..].iter().map(KeyPath::to_string).collect();
            chain.push(path.to_string());
            return Err(Error::CyclicReference { chain });
        }

        self.stack.push(path.clone());
        let result = self.substitute(&path.to_string(), text);
        self.stack.pop();

        let value = result?;
        self.resolved.insert(path.clone(), value.clone());
        Ok(value)
    }

    fn substitute(&mut self, key: &str, text: &str) -> Result<Value> {
        if let Some(whole) = REFERENCE_PATTERN.captures(text) {
            let span = whole.get(0).map(|m| m.range());
            if span == Some(0..text.len()) {
                return self.follow(key, &whole[1]);
            }
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in REFERENCE_PATTERN.captures_iter(text) {
            let Some(span) = caps.get(0) else {
                continue;
            };
            out.push_str(&text[last..span.start()]);
            let reference = caps[1].trim();
            match self.follow(key, reference)? {
                Value::String(s) => out.push_str(&s),
                Value::Number(n) => out.push_str(&n.to_string()),
                Value::Bool(b) => out.push_str(&b.to_string()),
                other => {
                    return Err(Error::InvalidInterpolation {
                        key: key.to_string(),
                        reason: format!(
                            "'${{{}}}' is {} and cannot be embedded in a string",
                            reference,
                            crate::error::value_kind(&other)
                        ),
                    });
                }
            }
            last = span.end();
        }
        out.push_str(&text[last..]);

        if has_references(&out) {
            return Err(Error::InvalidInterpolation {
                key: key.to_string(),
                reason: format!("substitution produced a new reference in '{out}'"),
            });
        }
        Ok(Value::String(out))
    }

    /// Resolve the value a single reference points at.
    fn follow(&mut self, key: &str, reference: &str) -> Result<Value> {
        let reference = reference.trim();
        let target = KeyPath::parse(reference).map_err(|e| Error::InvalidInterpolation {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        let raw = target
            .lookup(self.tree)
            .ok_or_else(|| Error::MissingReference {
                key: key.to_string(),
                reference: reference.to_string(),
            })?;
        self.resolve_node(&target, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_run_directory_template() {
        let tree = json!({
            "paths": {
                "workdir": "/data",
                "run_dir": "${paths.workdir}/projects/${general.project_name}/${general.sub_project_name}"
            },
            "general": {"project_name": "test", "sub_project_name": "sub_test"}
        });

        let resolved = resolve(&tree).unwrap();
        assert_eq!(resolved["paths"]["run_dir"], "/data/projects/test/sub_test");
    }

    #[test]
    fn test_whole_string_reference_keeps_type() {
        let tree = json!({
            "synthesize": {"parallel_workers": 8, "parallel": true},
            "move_cutouts": {"parallel_workers": "${synthesize.parallel_workers}", "parallel": "${synthesize.parallel}"},
            "filters": {"min": 1},
            "copy": "${filters}"
        });

        let resolved = resolve(&tree).unwrap();
        assert_eq!(resolved["move_cutouts"]["parallel_workers"], json!(8));
        assert_eq!(resolved["move_cutouts"]["parallel"], json!(true));
        assert_eq!(resolved["copy"], json!({"min": 1}));
    }

    #[test]
    fn test_scalars_embedded_as_text() {
        let tree = json!({"n": 4, "f": 0.5, "b": false, "s": "n=${n} f=${f} b=${b}"});
        assert_eq!(resolve(&tree).unwrap()["s"], "n=4 f=0.5 b=false");
    }

    #[test]
    fn test_chained_references() {
        let tree = json!({"a": "${b}/a", "b": "${c}/b", "c": "root"});
        let resolved = resolve(&tree).unwrap();
        assert_eq!(resolved["a"], "root/b/a");
        assert_eq!(resolved["b"], "root/b");
    }

    #[test]
    fn test_missing_reference() {
        let tree = json!({"paths": {"run_dir": "${paths.workdir}/run"}});
        match resolve(&tree) {
            Err(Error::MissingReference { key, reference }) => {
                assert_eq!(key, "paths.run_dir");
                assert_eq!(reference, "paths.workdir");
            }
            other => panic!("Expected MissingReference, got {:?}", other),
        }
    }

    #[test]
    fn test_two_key_cycle() {
        let tree = json!({"x": "${y}", "y": "${x}"});
        match resolve(&tree) {
            Err(Error::CyclicReference { chain }) => {
                assert_eq!(chain, vec!["x", "y", "x"]);
            }
            other => panic!("Expected CyclicReference, got {:?}", other),
        }
    }

    #[test]
    fn test_self_reference_through_parent_mapping() {
        let tree = json!({"a": {"b": "${a}"}});
        assert!(matches!(resolve(&tree), Err(Error::CyclicReference { .. })));
    }

    #[test]
    fn test_mapping_embedded_in_string_is_rejected() {
        let tree = json!({"filters": {"min": 1}, "s": "filters: ${filters}"});
        assert!(matches!(
            resolve(&tree),
            Err(Error::InvalidInterpolation { .. })
        ));
    }

    #[test]
    fn test_malformed_reference_is_rejected() {
        let tree = json!({"s": "${not a path}"});
        assert!(matches!(
            resolve(&tree),
            Err(Error::InvalidInterpolation { .. })
        ));
    }

    #[test]
    fn test_sequence_elements_resolve() {
        let tree = json!({"first": "create_recipes", "tasks": ["${first}", "synthesize"]});
        assert_eq!(
            resolve(&tree).unwrap()["tasks"],
            json!(["create_recipes", "synthesize"])
        );
    }

    #[test]
    fn test_references_listing() {
        assert_eq!(
            references("${paths.workdir}/projects/${ general.project_name }"),
            vec!["paths.workdir", "general.project_name"]
        );
        assert!(!has_references("plain $text {here}"));
    }

    #[test]
    fn test_dotted_key_and_nested_path_resolve_separately() {
        let tree = json!({
            "a.b": "${v1}",
            "a": {"b": "${v2}"},
            "v1": "one",
            "v2": "two"
        });
        let resolved = resolve(&tree).unwrap();
        assert_eq!(resolved["a.b"], "one");
        assert_eq!(resolved["a"]["b"], "two");
    }

    #[test]
    fn test_substitution_forming_a_reference_is_rejected() {
        let tree = json!({"d": "$", "s": "${d}{x}", "x": "boom"});
        match resolve(&tree) {
            Err(Error::InvalidInterpolation { key, .. }) => assert_eq!(key, "s"),
            other => panic!("Expected InvalidInterpolation, got {:?}", other),
        }
    }

    #[test]
    fn test_resolving_twice_is_stable() {
        let tree = json!({"a": "${b}-x", "b": "y", "c": ["${a}"]});
        let once = resolve(&tree).unwrap();
        let twice = resolve(&once).unwrap();
        assert_eq!(once, twice);
    }
}
