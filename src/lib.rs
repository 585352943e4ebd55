//! Smart enumerations: closed sets of named values that behave like objects.
//!
//! An enumeration kind is an ordinary type whose values are declared as
//! associated constants (or associated functions) of the type itself. Each
//! value carries a key that is unique within its kind, an optional
//! human-readable label, and whatever extra fields the kind defines. This
//! crate supplies the operations common to all such kinds:
//!
//! - enumerate every value of a kind, in a fixed order
//! - parse a value from its key, ignoring case
//! - compare values by key
//! - resolve a kind from its name at run time, without a compile-time
//!   reference to it
//!
//! # Basic Usage
//!
//! ```rust
//! use smart_enumerations::{EnumValue, Enumeration, Member, members, register_enumeration};
//!
//! #[derive(Clone, Debug)]
//! pub struct Currency {
//!     value: EnumValue,
//!     decimals: u8,
//! }
//!
//! impl Currency {
//!     pub const USD: Currency = Currency { value: EnumValue::new_static("USD"), decimals: 2 };
//!     pub const JPY: Currency = Currency { value: EnumValue::new_static("JPY"), decimals: 0 };
//!     pub const EUR: Currency = Currency {
//!         value: EnumValue::with_static_label("EUR", "Euro"),
//!         decimals: 2,
//!     };
//! }
//!
//! impl Enumeration for Currency {
//!     const NAME: &'static str = "Currency";
//!
//!     fn value(&self) -> &EnumValue {
//!         &self.value
//!     }
//!
//!     fn members() -> Vec<Member<Self>> {
//!         members! { fields: [USD, JPY, EUR] }
//!     }
//! }
//!
//! register_enumeration!(Currency);
//!
//! // Values in member order: fields sorted by name
//! let keys: Vec<String> = Currency::all().map(|c| c.key().to_string()).collect();
//! assert_eq!(keys, ["EUR", "JPY", "USD"]);
//!
//! // Parsing ignores case; empty input is no value
//! let jpy = Currency::parse("jpy").unwrap().unwrap();
//! assert_eq!(jpy.decimals, 0);
//! assert!(Currency::parse("").unwrap().is_none());
//! assert!(!Currency::can_parse("GBP"));
//!
//! // Labels are explicit or derived from the key
//! assert_eq!(Currency::EUR.label(), "Euro");
//!
//! // Kinds resolve by name
//! let registry = smart_enumerations::ENUMERATIONS.get();
//! let values = registry.all_values_by_name("currency").unwrap();
//! assert_eq!(values.count(), 3);
//! ```
//!
//! # Registries
//!
//! [`EnumerationRegistry`] performs every operation and caches what it
//! discovers: the sorted member list of each kind and the kind found for
//! each name. [`ENUMERATIONS`] is a process-wide instance, used by the
//! [`Enumeration`] trait's associated functions and configured with
//! [`set_registry_config`] before first access. Programs that prefer to own
//! their registry construct one with [`EnumerationRegistry::new`] or
//! [`EnumerationRegistry::with_config`].
//!
//! # Kind Discovery
//!
//! [`register_enumeration!`] submits a kind's [`TypeInfo`] to an inventory
//! collected at startup. Name resolution scans that inventory through a
//! [`TypeScanner`] for concrete types assignable to [`TypeRef::ENUMERATION`]
//! and picks the first whose simple name matches. A custom [`TypeCatalog`]
//! can stand in for the inventory.
//!
//! # Config File Feature
//!
//! When the `config-file` feature is enabled (default), a
//! [`RegistryConfig`] can be loaded from JSON with
//! [`RegistryConfig::from_json_file`]. To disable it:
//!
//! ```toml
//! [dependencies]
//! smart-enumerations = { version = "0.1", default-features = false }
//! ```

mod enum_value;
pub use enum_value::EnumValue;

mod wordify;
pub use wordify::wordify;

mod enumeration;
pub use enumeration::{DynEnumeration, Enumeration, Member, MemberKind};

mod type_scanner;
pub use type_scanner::{
    InventoryCatalog, ModuleHandle, StaticCatalog, TypeCatalog, TypeFlavor, TypeInfo, TypeRef,
    TypeScanner,
};

mod enumeration_registry;
pub use enumeration_registry::{AllValues, DynValues, EnumerationRegistry, Kind};

mod global_registry;
pub use global_registry::*;

mod config;
pub use config::{ConfigError, RegistryConfig, add_excluded_modules, set_registry_config};

mod error;
pub use error::{Error, IntrospectionError, ParseFailure, Result};

#[doc(hidden)]
pub use inventory;
