use launix_model::{ColumnType, Descriptor, RawOptions};
use pretty_assertions::assert_eq;
use serde_json::json;

fn sample() -> Descriptor {
    Descriptor::from_value(&json!({
        "tables": {
            "orders": {
                "descSingle": "Order",
                "tblname": "tbl_orders",
                "columns": {
                    "status": {
                        "desc": "Status",
                        "required": true,
                        "type": {"type": "Number", "options": [{"name": "Open", "value": 1}]}
                    },
                    "note": {"type": "string"},
                    "broken": "not a column"
                },
                "actions": [
                    {"path": "orders/print", "title": "Print", "params": ["id", 7, "copies"]},
                    {"path": "orders/mail", "httpMethod": "post"},
                    {"title": "no path"}
                ]
            },
            "customers": {
                "descSingle": "Customer",
                "tblname": "tbl_customers",
                "columns": [
                    {"id": "name", "desc": "", "type": "STRING"},
                    {"desc": "missing id"}
                ]
            },
            "junk": 42
        }
    }))
}

// ── Normalization ───────────────────────────────────────────────

#[test]
fn keeps_descriptor_order_and_skips_non_objects() {
    let descriptor = sample();
    let keys: Vec<&str> = descriptor.tables().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["orders", "customers"]);
    assert_eq!(descriptor.len(), 2);
}

#[test]
fn bare_mapping_is_accepted() {
    let descriptor = Descriptor::from_value(&json!({
        "orders": {"columns": {}, "actions": []}
    }));
    assert_eq!(descriptor.len(), 1);
    assert!(descriptor.table("orders").is_some());
}

#[test]
fn non_object_document_is_empty() {
    assert!(Descriptor::from_value(&json!([1, 2, 3])).is_empty());
    assert!(Descriptor::from_value(&json!(null)).is_empty());
}

#[test]
fn mapping_columns_take_their_key_as_id() {
    let descriptor = sample();
    let orders = descriptor.table("orders").unwrap();
    let ids: Vec<&str> = orders.columns.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["status", "note"]);

    let status = &orders.columns[0];
    assert_eq!(status.desc.as_deref(), Some("Status"));
    assert!(status.required);
    assert_eq!(status.column_type.tag, "number");
    assert!(status.column_type.prefers_numeric());
}

#[test]
fn sequence_columns_need_an_id() {
    let descriptor = sample();
    let customers = descriptor.table("customers").unwrap();
    assert_eq!(customers.columns.len(), 1);
    assert_eq!(customers.columns[0].id, "name");
    // Empty descriptions count as absent.
    assert_eq!(customers.columns[0].desc, None);
    assert_eq!(customers.columns[0].column_type.tag, "string");
}

#[test]
fn column_type_defaults_to_string() {
    assert_eq!(ColumnType::from_raw(None).tag, "string");
    assert_eq!(ColumnType::from_raw(Some(&json!(5))).tag, "string");
    assert_eq!(ColumnType::from_raw(Some(&json!({"info": "x"}))).tag, "string");
}

#[test]
fn column_type_object_form() {
    let raw = json!({
        "type": "Foreign-Key",
        "info": "customer of the order",
        "references": "customers",
        "options": {"a": "Alpha"}
    });
    let column_type = ColumnType::from_raw(Some(&raw));
    assert_eq!(column_type.tag, "foreign-key");
    assert_eq!(column_type.info.as_deref(), Some("customer of the order"));
    assert_eq!(column_type.references.as_deref(), Some("customers"));
    assert_eq!(
        column_type.options,
        Some(RawOptions::Mapping(vec![("a".to_string(), json!("Alpha"))]))
    );
}

#[test]
fn actions_need_a_path_and_keep_string_params() {
    let descriptor = sample();
    let orders = descriptor.table("orders").unwrap();
    assert_eq!(orders.actions.len(), 2);

    let print = orders.action("orders/print").unwrap();
    assert_eq!(print.params, vec!["id".to_string(), "copies".to_string()]);
    assert_eq!(print.method(), "GET");
    assert_eq!(print.label(), "Print");

    let mail = orders.action("orders/mail").unwrap();
    assert_eq!(mail.method(), "POST");
    assert_eq!(mail.label(), "orders/mail");
}

// ── Table resolution ────────────────────────────────────────────

#[test]
fn resolves_by_key_external_name_and_label() {
    let descriptor = sample();
    assert_eq!(descriptor.resolve_table("orders"), Some("orders"));
    assert_eq!(descriptor.resolve_table("TBL_CUSTOMERS"), Some("customers"));
    assert_eq!(descriptor.resolve_table("order"), Some("orders"));
    assert_eq!(descriptor.resolve_table("invoices"), None);
}

#[test]
fn exact_key_wins_over_label_match() {
    let descriptor = Descriptor::from_value(&json!({
        "a": {"descSingle": "b"},
        "b": {"descSingle": "Something"}
    }));
    assert_eq!(descriptor.resolve_table("b"), Some("b"));
}

#[test]
fn first_label_match_wins() {
    let descriptor = Descriptor::from_value(&json!({
        "first": {"descSingle": "Shared"},
        "second": {"tblname": "shared"}
    }));
    assert_eq!(descriptor.resolve_table("SHARED"), Some("first"));
}

// ── Pickers ─────────────────────────────────────────────────────

#[test]
fn table_entries_filter_on_display_label() {
    let descriptor = sample();
    let all = descriptor.table_entries(None);
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "Order (tbl_orders)");
    assert_eq!(all[0].value, "orders");

    let filtered = descriptor.table_entries(Some("cust"));
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].value, "customers");
}

#[test]
fn action_entries_filter_on_label() {
    let descriptor = sample();
    let orders = descriptor.table("orders").unwrap();
    let entries = orders.action_entries(Some("PRI"));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Print");
    assert_eq!(entries[0].value, "orders/print");
}

#[test]
fn action_param_fields_are_plain_strings() {
    let descriptor = sample();
    let orders = descriptor.table("orders").unwrap();
    let fields = orders.action_param_fields("orders/print");
    let ids: Vec<&str> = fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["id", "copies"]);
    assert!(fields.iter().all(|f| !f.required));

    assert!(orders.action_param_fields("orders/unknown").is_empty());
}
