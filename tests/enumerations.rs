//! Integration tests for kinds registered through the inventory.

use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

use smart_enumerations::{
    ENUMERATIONS, EnumValue, Enumeration, EnumerationRegistry, Error, Member, ParseFailure,
    TypeRef, members, register_enumeration,
};

#[derive(Clone, Debug)]
pub struct Color {
    value: EnumValue,
    rgb: u32,
}

impl Color {
    pub const RED: Color = Color { value: EnumValue::new_static("RED"), rgb: 0xff0000 };
    pub const GREEN: Color = Color { value: EnumValue::new_static("Green"), rgb: 0x00ff00 };
    pub const BLUE: Color = Color { value: EnumValue::new_static("blue"), rgb: 0x0000ff };
}

impl Enumeration for Color {
    const NAME: &'static str = "Color";

    fn value(&self) -> &EnumValue {
        &self.value
    }

    fn members() -> Vec<Member<Self>> {
        members! { fields: [RED, GREEN, BLUE] }
    }
}

register_enumeration!(Color);

#[derive(Clone, Debug)]
pub struct Currency(EnumValue);

impl Currency {
    pub const USD: Currency = Currency(EnumValue::with_static_label("USD", "US Dollar"));
    pub const EUR: Currency = Currency(EnumValue::with_static_label("EUR", "Euro"));

    pub fn bitcoin() -> Currency {
        Currency(EnumValue::new_static("BitcoinCash"))
    }

    pub fn accounting_unit() -> Currency {
        Currency(EnumValue::new_static("XXX"))
    }
}

impl Enumeration for Currency {
    const NAME: &'static str = "Currency";

    fn value(&self) -> &EnumValue {
        &self.0
    }

    fn members() -> Vec<Member<Self>> {
        members! {
            fields: [USD, EUR],
            properties: [bitcoin, accounting_unit],
        }
    }
}

register_enumeration!(Currency);

#[derive(Clone, Debug)]
pub struct ReportLine(EnumValue);

impl ReportLine {
    pub const NET_INCOME: ReportLine = ReportLine(EnumValue::new_static("NetIncome"));
    pub const EBITDA: ReportLine = ReportLine(EnumValue::new_static("EBITDAMargin"));
    pub const TAX: ReportLine = ReportLine(EnumValue::new_static("tax"));
}

impl Enumeration for ReportLine {
    const NAME: &'static str = "ReportLine";

    fn value(&self) -> &EnumValue {
        &self.0
    }

    fn members() -> Vec<Member<Self>> {
        members! { fields: [NET_INCOME, EBITDA, TAX] }
    }
}

register_enumeration!(ReportLine);

fn keys<K: Enumeration>(values: impl Iterator<Item = K>) -> Vec<String> {
    values.map(|value| value.key().to_string()).collect()
}

fn hash_of<K: Enumeration>(value: &K) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash_key(&mut hasher);
    hasher.finish()
}

fn assert_round_trip<K: Enumeration>() {
    for value in K::all() {
        let parsed = K::parse(value.key()).unwrap().unwrap();
        assert!(parsed.equals(&value));

        let upper = value.key().to_uppercase();
        let parsed = K::parse(upper.as_str()).unwrap().unwrap();
        assert!(parsed.equals(&value));
        assert_eq!(hash_of(&parsed), hash_of(&value));
    }
}

#[test]
fn test_color_scenario() {
    assert_eq!(keys(Color::all()), ["blue", "Green", "RED"]);

    let green = Color::parse("green").unwrap().unwrap();
    assert_eq!(green.key(), "Green");
    assert_eq!(green.rgb, 0x00ff00);
    assert!(green.equals(&Color::GREEN));

    let error = Color::parse("purple").unwrap_err();
    assert_eq!(error, Error::InvalidValue { value: "purple".to_string(), kind: "Color" });
    assert_eq!(error.to_string(), "'purple' is not a valid Color");
}

#[test]
fn test_round_trip_every_kind() {
    assert_round_trip::<Color>();
    assert_round_trip::<Currency>();
    assert_round_trip::<ReportLine>();
}

#[test]
fn test_empty_input_is_no_value() {
    assert!(Color::parse("").unwrap().is_none());
    assert!(Color::parse(None).unwrap().is_none());
    assert!(Currency::parse("").unwrap().is_none());
    assert!(Currency::safe_parse(None).is_none());
    assert!(Currency::can_parse(""));
}

#[test]
fn test_unmatched_input() {
    for raw in ["purple", " red", "redd", "Gree"] {
        assert!(matches!(Color::parse(raw), Err(Error::InvalidValue { .. })));
        assert_eq!(Color::try_parse(raw).unwrap_err(), ParseFailure);
        assert!(Color::safe_parse(raw).is_none());
        assert!(!Color::can_parse(raw));
    }
}

#[test]
fn test_fields_before_properties() {
    assert_eq!(keys(Currency::all()), ["EUR", "USD", "XXX", "BitcoinCash"]);

    let labels: Vec<String> = Currency::all().map(|c| c.display_label()).collect();
    assert_eq!(labels, ["Euro", "US Dollar", "XXX", "Bitcoin Cash"]);
}

#[test]
fn test_order_is_independent_of_cache_state() {
    let fresh = EnumerationRegistry::default();
    let first = keys(fresh.all_values::<Currency>());
    let second = keys(fresh.all_values::<Currency>());
    assert_eq!(first, second);
    assert_eq!(first, keys(Currency::all()));
}

#[test]
fn test_derived_labels() {
    let labels: Vec<String> = ReportLine::all().map(|line| line.label().into_owned()).collect();
    assert_eq!(labels, ["EBITDA Margin", "Net Income", "tax"]);
    assert_eq!(ReportLine::NET_INCOME.value().to_string(), "Net Income");
}

#[test]
fn test_equality_by_key() {
    let shouting = Color { value: EnumValue::new("GREEN"), rgb: 0 };
    assert!(shouting.equals(&Color::GREEN));
    assert_eq!(hash_of(&shouting), hash_of(&Color::GREEN));
    assert!(!Color::RED.equals(&Color::GREEN));
}

#[test]
fn test_resolve_kind_by_name_is_cached() {
    let registry = EnumerationRegistry::default();
    let kind = registry.resolve_kind_by_name("currency").unwrap();
    assert!(kind.is::<Currency>());
    assert_eq!(kind.name(), "Currency");
    assert_eq!(registry.scanner().scan_count(), 1);

    for name in ["currency", "CURRENCY", "Currency"] {
        assert_eq!(registry.resolve_kind_by_name(name).unwrap(), kind);
    }
    assert_eq!(registry.scanner().scan_count(), 1);
}

#[test]
fn test_resolve_unknown_kind() {
    let registry = EnumerationRegistry::default();
    assert_eq!(
        registry.resolve_kind_by_name("Planet").unwrap_err(),
        Error::NotFound { name: "planet".to_string() }
    );
    assert!(registry.all_values_by_name("planet").is_err());
}

#[test]
fn test_all_values_by_name() {
    let values: Vec<_> = ENUMERATIONS.get().all_values_by_name("reportline").unwrap().collect();
    let labels: Vec<String> = values.iter().map(|value| value.to_string()).collect();
    assert_eq!(labels, ["EBITDA Margin", "Net Income", "tax"]);

    let line = values[1].downcast_ref::<ReportLine>().unwrap();
    assert!(line.equals(&ReportLine::NET_INCOME));
    assert!(values[0].downcast_ref::<Color>().is_none());
}

#[test]
fn test_registered_kinds_are_discoverable() {
    let registry = EnumerationRegistry::default();
    let names: Vec<&str> = registry
        .scanner()
        .find_assignable_types(&TypeRef::ENUMERATION)
        .into_iter()
        .map(|info| info.name())
        .collect();
    for expected in ["Color", "Currency", "ReportLine"] {
        assert!(names.contains(&expected), "{expected} not in {names:?}");
    }

    let modules = registry
        .scanner()
        .find_modules_containing(&TypeRef::ENUMERATION)
        .unwrap();
    assert!(modules.iter().any(|module| module.name() == "enumerations"));
}
