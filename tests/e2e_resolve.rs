//! End-to-end tests for property path resolution.
//!
//! Uses hand-written `Introspect` types (an invoice with lines and a
//! customer) alongside map-backed `Record`s and JSON-built values.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use propkit::path::{self, NullPlaceholder};
use propkit::{Error, Introspect, Record, Result, TypeInfo, Value};

// ============================================================================
// Domain model
// ============================================================================

static CUSTOMER: TypeInfo = TypeInfo::new("shop::Customer");
static LINE: TypeInfo = TypeInfo::new("shop::Line");
static INVOICE: TypeInfo = TypeInfo::new("shop::Invoice");
static ROW: TypeInfo = TypeInfo::new("shop::Row");

#[derive(Clone)]
struct Customer {
    name: String,
    vip: bool,
}

#[derive(Clone)]
struct Line {
    sku: String,
    price: i64,
}

#[derive(Clone)]
struct Invoice {
    number: String,
    issued: NaiveDate,
    customer: Option<Customer>,
    lines: Vec<Line>,
    tax: i64,
}

impl Introspect for Customer {
    fn type_info(&self) -> &'static TypeInfo { &CUSTOMER }

    fn property(&self, name: &str) -> Result<Option<Value>> {
        Ok(match name {
            "name" => Some(self.name.as_str().into()),
            "vip" => Some(self.vip.into()),
            _ => None,
        })
    }

    fn clone_boxed(&self) -> Box<dyn Introspect> { Box::new(self.clone()) }
}

impl Introspect for Line {
    fn type_info(&self) -> &'static TypeInfo { &LINE }

    fn property(&self, name: &str) -> Result<Option<Value>> {
        Ok(match name {
            "sku" => Some(self.sku.as_str().into()),
            "price" => Some(self.price.into()),
            _ => None,
        })
    }

    fn clone_boxed(&self) -> Box<dyn Introspect> { Box::new(self.clone()) }
}

impl Introspect for Invoice {
    fn type_info(&self) -> &'static TypeInfo { &INVOICE }

    fn property(&self, name: &str) -> Result<Option<Value>> {
        Ok(match name {
            "number" => Some(self.number.as_str().into()),
            "issued" => Some(self.issued.into()),
            "customer" => Some(self.customer.clone().map(Value::object).unwrap_or(Value::Null)),
            "lines" => Some(Value::List(self.lines.iter().cloned().map(Value::object).collect())),
            "tax" => Some(self.tax.into()),
            "total" => Some((self.lines.iter().map(|l| l.price).sum::<i64>() + self.tax).into()),
            _ => None,
        })
    }

    fn clone_boxed(&self) -> Box<dyn Introspect> { Box::new(self.clone()) }
}

fn invoice(customer: Option<Customer>) -> Value {
    Value::object(Invoice {
        number: "INV-7".into(),
        issued: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        customer,
        lines: vec![
            Line { sku: "pen".into(), price: 10 },
            Line { sku: "ink".into(), price: 4 },
            Line { sku: "pen".into(), price: 10 },
        ],
        tax: 2,
    })
}

fn ada() -> Option<Customer> {
    Some(Customer { name: "Ada".into(), vip: true })
}

// ============================================================================
// 1. Dot paths through objects
// ============================================================================

#[test]
fn test_nested_object_path() {
    let root = invoice(ada());
    assert_eq!(path::resolve(&root, "customer.name").unwrap(), Value::from("Ada"));
    assert_eq!(path::resolve(&root, "customer.vip").unwrap(), Value::Bool(true));
    assert_eq!(path::resolve(&root, "total").unwrap(), Value::Int(26));
    assert_eq!(
        path::resolve(&root, "issued").unwrap(),
        Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    );
}

#[test]
fn test_null_intermediate_is_null() {
    let root = invoice(None);
    assert_eq!(path::resolve(&root, "customer.name").unwrap(), Value::Null);
}

#[test]
fn test_group_name_from_json() {
    let root = Value::parse_json(r#"{"group": {"name": "X"}, "missing": null}"#).unwrap();
    assert_eq!(path::resolve(&root, "group.name").unwrap(), Value::from("X"));
    assert_eq!(path::resolve(&root, "missing.name").unwrap(), Value::Null);
}

#[test]
fn test_unknown_property_degrades_to_null() {
    let root = invoice(ada());
    assert_eq!(path::resolve(&root, "customer.email").unwrap(), Value::Null);
    assert_eq!(path::resolve(&root, "nope.deeper.still").unwrap(), Value::Null);
}

#[test]
fn test_blank_path_is_invalid() {
    let root = invoice(ada());
    assert!(matches!(path::resolve(&root, ""), Err(Error::InvalidArgument(_))));
    assert!(matches!(path::resolve(&root, "customer..name"), Err(Error::InvalidArgument(_))));
}

// ============================================================================
// 2. Broadcast over collections
// ============================================================================

#[test]
fn test_broadcast_dedupes_in_first_seen_order() {
    let root = invoice(ada());
    assert_eq!(
        path::resolve(&root, "lines.sku").unwrap(),
        Value::Set(vec![Value::from("pen"), Value::from("ink")])
    );
    assert_eq!(
        path::resolve_all(&root, "lines.price").unwrap(),
        vec![Value::Int(10), Value::Int(4)]
    );
}

#[test]
fn test_broadcast_spec_example() {
    let root = Value::List(vec![
        Value::object(Record::new(&ROW).with_property("n", 1)),
        Value::object(Record::new(&ROW).with_property("n", 2)),
    ]);
    assert_eq!(path::resolve_all(&root, "n").unwrap(), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_broadcast_over_many_elements() {
    let rows = |n: i64| {
        Value::List(
            (0..n)
                .map(|i| Value::object(Record::new(&ROW).with_property("n", i % 40_000)))
                .collect(),
        )
    };
    let distinct = path::resolve_all(&rows(40_000), "n").unwrap();
    assert_eq!(distinct.len(), 40_000);
    assert_eq!(distinct[39_999], Value::Int(39_999));

    let repeated = path::resolve_all(&rows(80_000), "n").unwrap();
    assert_eq!(repeated, distinct);
}

#[test]
fn test_collect_properties_keeps_every_element() {
    let root = invoice(ada());
    let lines = path::resolve(&root, "lines").unwrap();
    assert_eq!(
        path::collect_properties(&lines, "sku").unwrap(),
        vec![Value::from("pen"), Value::from("ink"), Value::from("pen")]
    );
}

// ============================================================================
// 3. Templates
// ============================================================================

#[test]
fn test_template_price_tax() {
    let root = Value::parse_json(r#"{"price": 10, "tax": 2}"#).unwrap();
    assert_eq!(path::resolve(&root, "[price]-[tax]").unwrap(), Value::from("10-2"));
}

#[test]
fn test_template_on_object_graph() {
    let root = invoice(ada());
    let rendered = path::render(&root, "[number] for [customer.name] ([total])", &NullPlaceholder::default()).unwrap();
    // Text after the last bracket is not emitted.
    assert_eq!(rendered, "INV-7 for Ada (26");
}

#[test]
fn test_template_placeholder_for_null() {
    let root = invoice(None);
    let rendered = path::render_with_placeholder(&root, "[number]/[customer.name]", "anonymous").unwrap();
    assert_eq!(rendered, "INV-7/anonymous");
}

#[test]
fn test_template_with_broadcast_value() {
    let root = invoice(ada());
    let rendered = path::render_with_placeholder(&root, "skus: [lines.sku]", "").unwrap();
    assert_eq!(rendered, "skus: [pen, ink]");
}

// ============================================================================
// 4. Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_broadcast_is_distinct_first_seen(ns in proptest::collection::vec(0i64..6, 0..20)) {
        let root = Value::List(
            ns.iter().map(|n| Value::object(Record::new(&ROW).with_property("n", *n))).collect(),
        );
        let mut expected: Vec<i64> = Vec::new();
        for n in &ns {
            if !expected.contains(n) {
                expected.push(*n);
            }
        }
        let resolved = path::resolve_all(&root, "n").unwrap();
        prop_assert_eq!(resolved, expected.into_iter().map(Value::Int).collect::<Vec<_>>());
    }

    #[test]
    fn prop_null_root_never_errors(p in "[a-z.\\[\\] ]{0,12}") {
        prop_assert_eq!(path::resolve(&Value::Null, &p).unwrap(), Value::Null);
    }
}
