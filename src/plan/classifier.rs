//! Risk Classifier (§4.D): tags each resource with a danger flag and reason
//! using action kind, resource-type rules, and sensitive-property rules.
//! Total — the classifier never fails and holds no global state.

use std::collections::HashSet;

use crate::plan::model::{ChangeType, PropertyChange};

/// Caller-supplied rules; the classifier itself has no global state (§4.D).
#[derive(Debug, Clone, Default)]
pub struct RiskRules {
    pub sensitive_resource_types: HashSet<String>,
    /// `(resource_type, property_name)` pairs considered sensitive.
    pub sensitive_properties: HashSet<(String, String)>,
}

/// Classify one resource's riskiness. Returns `(is_dangerous, danger_reason)`
/// with `danger_reason` empty when not dangerous.
pub fn classify(
    resource_type: &str,
    change_type: ChangeType,
    property_changes: &[PropertyChange],
    rules: &RiskRules,
) -> (bool, String) {
    if change_type == ChangeType::Delete
        && rules.sensitive_resource_types.contains(resource_type)
    {
        return (true, "deletion of sensitive resource type".to_string());
    }

    if change_type == ChangeType::Replace
        && rules.sensitive_resource_types.contains(resource_type)
    {
        return (true, "replacement of sensitive resource type".to_string());
    }

    let has_sensitive_property = property_changes.iter().any(|pc| {
        rules
            .sensitive_properties
            .contains(&(resource_type.to_string(), pc.name.clone()))
    });
    if has_sensitive_property {
        return (true, "sensitive property changed".to_string());
    }

    if change_type == ChangeType::Replace {
        return (true, "resource replacement".to_string());
    }

    if change_type == ChangeType::Delete {
        return (true, "resource deletion".to_string());
    }

    (false, String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::PropertyAction;

    fn rules() -> RiskRules {
        let mut r = RiskRules::default();
        r.sensitive_resource_types.insert("aws_db_instance".to_string());
        r.sensitive_properties
            .insert(("aws_db_instance".to_string(), "password".to_string()));
        r
    }

    #[test]
    fn deletion_of_sensitive_type_is_dangerous() {
        let (dangerous, reason) = classify("aws_db_instance", ChangeType::Delete, &[], &rules());
        assert!(dangerous);
        assert_eq!(reason, "deletion of sensitive resource type");
    }

    #[test]
    fn replace_of_sensitive_type_is_dangerous() {
        let (dangerous, reason) = classify("aws_db_instance", ChangeType::Replace, &[], &rules());
        assert!(dangerous);
        assert_eq!(reason, "replacement of sensitive resource type");
    }

    #[test]
    fn sensitive_property_change_is_dangerous_even_on_update() {
        let pc = PropertyChange {
            name: "password".to_string(),
            path: vec!["password".to_string()],
            before: None,
            after: None,
            action: PropertyAction::Update,
            sensitive: true,
            size: 0,
            triggers_replacement: false,
        };
        let (dangerous, reason) =
            classify("aws_db_instance", ChangeType::Update, &[pc], &rules());
        assert!(dangerous);
        assert_eq!(reason, "sensitive property changed");
    }

    #[test]
    fn plain_replace_without_rule_match_is_still_dangerous() {
        let (dangerous, reason) =
            classify("aws_instance", ChangeType::Replace, &[], &RiskRules::default());
        assert!(dangerous);
        assert_eq!(reason, "resource replacement");
    }

    #[test]
    fn plain_delete_without_rule_match_is_still_dangerous() {
        let (dangerous, reason) =
            classify("aws_instance", ChangeType::Delete, &[], &RiskRules::default());
        assert!(dangerous);
        assert_eq!(reason, "resource deletion");
    }

    #[test]
    fn update_is_not_dangerous_by_default() {
        let (dangerous, reason) =
            classify("aws_instance", ChangeType::Update, &[], &RiskRules::default());
        assert!(!dangerous);
        assert_eq!(reason, "");
    }

    #[test]
    fn no_op_is_not_dangerous() {
        let (dangerous, _) =
            classify("aws_instance", ChangeType::NoOp, &[], &RiskRules::default());
        assert!(!dangerous);
    }
}
