//! Change Extractor (§4.B): walk the plan tree and emit one typed change
//! record per resource and per output, in input order. Pure and total.

use crate::plan::raw::{RawOutputChange, RawPlanDocument, RawResourceChange};

/// Split a loaded plan document into its resource and output change
/// sequences, preserving insertion order.
pub fn extract(doc: RawPlanDocument) -> (Vec<RawResourceChange>, Vec<RawOutputChange>) {
    (doc.resource_changes, doc.output_changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::raw::RawChange;

    #[test]
    fn preserves_order_and_is_total_on_empty_input() {
        let doc = RawPlanDocument {
            format_version: None,
            terraform_version: None,
            resource_changes: vec![
                RawResourceChange {
                    address: "a".to_string(),
                    resource_type: "aws_instance".to_string(),
                    name: "a".to_string(),
                    module_address: None,
                    provider_name: None,
                    change: RawChange {
                        actions: vec!["create".to_string()],
                        before: None,
                        after: None,
                        before_sensitive: None,
                        after_sensitive: None,
                        replace_paths: None,
                    },
                },
                RawResourceChange {
                    address: "b".to_string(),
                    resource_type: "aws_instance".to_string(),
                    name: "b".to_string(),
                    module_address: None,
                    provider_name: None,
                    change: RawChange {
                        actions: vec!["delete".to_string()],
                        before: None,
                        after: None,
                        before_sensitive: None,
                        after_sensitive: None,
                        replace_paths: None,
                    },
                },
            ],
            output_changes: vec![],
            configuration: None,
        };

        let (resources, outputs) = extract(doc);
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].address, "a");
        assert_eq!(resources[1].address, "b");
        assert!(outputs.is_empty());
    }
}
