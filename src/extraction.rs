use crate::types::*;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("details column is not JSON")]
    NotJson,
    #[error("details is not a JSON object")]
    NotObject,
    #[error("details has no `actions` array")]
    MissingActions,
    #[error("action {index} has no `transformationConfig.template` string")]
    MissingTemplate { index: usize },
}

/// Templates of one record, in action order.
///
/// All-or-nothing: one action without a template string rejects the whole record.
pub fn extract_templates(details: &Details) -> Result<Vec<String>, ExtractError> {
    let value = match details {
        Details::Parsed(v) => v,
        Details::Raw(_) => return Err(ExtractError::NotJson),
    };
    let obj = value.as_object().ok_or(ExtractError::NotObject)?;
    let actions = obj.get("actions").and_then(Value::as_array).ok_or(ExtractError::MissingActions)?;

    actions
        .iter()
        .enumerate()
        .map(|(index, action)| {
            action
                .pointer("/transformationConfig/template")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(ExtractError::MissingTemplate { index })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(v: Value) -> Details { Details::Parsed(v) }

    #[test]
    fn yields_templates_in_order() {
        let d = parsed(json!({"actions": [
            {"transformationConfig": {"template": "first"}},
            {"transformationConfig": {"template": "second", "other": 1}},
        ]}));
        assert_eq!(extract_templates(&d).unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn empty_actions_is_not_an_error() {
        assert_eq!(extract_templates(&parsed(json!({"actions": []}))).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn raw_details_rejected() {
        assert_eq!(extract_templates(&Details::Raw("not json".into())), Err(ExtractError::NotJson));
    }

    #[test]
    fn shape_errors() {
        assert_eq!(extract_templates(&parsed(json!([1, 2]))), Err(ExtractError::NotObject));
        assert_eq!(extract_templates(&parsed(json!({}))), Err(ExtractError::MissingActions));
        assert_eq!(extract_templates(&parsed(json!({"actions": {"a": 1}}))), Err(ExtractError::MissingActions));
    }

    #[test]
    fn null_or_missing_template_rejects_record() {
        let d = parsed(json!({"actions": [
            {"transformationConfig": {"template": "ok"}},
            {"transformationConfig": {"template": null}},
        ]}));
        assert_eq!(extract_templates(&d), Err(ExtractError::MissingTemplate { index: 1 }));

        let d = parsed(json!({"actions": [{"name": "no config"}]}));
        assert_eq!(extract_templates(&d), Err(ExtractError::MissingTemplate { index: 0 }));
    }

    #[test]
    fn reserialized_details_yield_same_templates() {
        let original = json!({"actions": [
            {"transformationConfig": {"template": "{{ title }}"}},
            {"transformationConfig": {"template": "{% if a %}x{% endif %}"}},
        ]});
        let direct: Vec<String> = original["actions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["transformationConfig"]["template"].as_str().unwrap().to_string())
            .collect();
        let text = serde_json::to_string(&original).unwrap();
        let reparsed = parsed(serde_json::from_str(&text).unwrap());
        assert_eq!(extract_templates(&reparsed).unwrap(), direct);
    }
}
