use std::sync::OnceLock;

use tracing::debug;

use crate::EnumerationRegistry;

/// Registers an enumeration kind so it can be resolved by name.
///
/// Submits the kind's [`TypeInfo`](crate::TypeInfo) to the inventory read by
/// [`InventoryCatalog`](crate::InventoryCatalog), recording the module path
/// the macro is invoked from. Registration happens at program startup; there
/// is no runtime call to make.
///
/// # Examples
///
/// ```
/// use smart_enumerations::*;
///
/// #[derive(Clone, Debug)]
/// pub struct Weekday(EnumValue);
///
/// impl Weekday {
///     pub const MONDAY: Weekday = Weekday(EnumValue::new_static("Monday"));
///     pub const TUESDAY: Weekday = Weekday(EnumValue::new_static("Tuesday"));
/// }
///
/// impl Enumeration for Weekday {
///     const NAME: &'static str = "Weekday";
///
///     fn value(&self) -> &EnumValue {
///         &self.0
///     }
///
///     fn members() -> Vec<Member<Self>> {
///         members! { fields: [MONDAY, TUESDAY] }
///     }
/// }
///
/// register_enumeration!(Weekday);
///
/// let kind = ENUMERATIONS.get().resolve_kind_by_name("weekday").unwrap();
/// assert!(kind.is::<Weekday>());
///
/// let days: Vec<String> = ENUMERATIONS
///     .get()
///     .all_values_by_name("WEEKDAY")
///     .unwrap()
///     .map(|day| day.display_label())
///     .collect();
/// assert_eq!(days, ["Monday", "Tuesday"]);
/// ```
#[macro_export]
macro_rules! register_enumeration {
    ($kind:ty) => {
        $crate::inventory::submit! {
            $crate::TypeInfo::enumeration::<$kind>(::std::module_path!())
        }
    };
}

/// A lazily initialized process-wide [`EnumerationRegistry`].
///
/// The registry is built on first access from the configuration installed
/// with [`set_registry_config`](crate::set_registry_config), after which the
/// configuration is locked. Initialization happens once even when first
/// accessed from several threads.
#[doc(hidden)]
#[derive(Debug)]
pub struct LazyEnumerations {
    registry: OnceLock<EnumerationRegistry>,
}

impl LazyEnumerations {
    /// Gets the global registry, initializing it if necessary.
    pub fn get(&self) -> &EnumerationRegistry {
        self.registry.get_or_init(|| {
            let config = crate::config::get_and_lock_config();
            debug!(?config, "initializing global enumeration registry");
            EnumerationRegistry::with_config(config)
        })
    }
}

/// The process-wide enumeration registry.
///
/// Used by the associated functions of [`Enumeration`](crate::Enumeration).
///
/// # Examples
///
/// ```
/// use smart_enumerations::*;
///
/// let registry = ENUMERATIONS.get();
/// assert!(matches!(
///     registry.resolve_kind_by_name("no_such_kind"),
///     Err(Error::NotFound { .. })
/// ));
/// ```
pub static ENUMERATIONS: LazyEnumerations = LazyEnumerations { registry: OnceLock::new() };

#[cfg(test)]
mod tests {
    use crate::{EnumValue, Enumeration, Member, members};

    #[derive(Debug)]
    struct Suit(EnumValue);

    impl Suit {
        const HEARTS: Suit = Suit(EnumValue::new_static("Hearts"));
        const SPADES: Suit = Suit(EnumValue::new_static("Spades"));
    }

    impl Enumeration for Suit {
        const NAME: &'static str = "Suit";

        fn value(&self) -> &EnumValue {
            &self.0
        }

        fn members() -> Vec<Member<Self>> {
            members! { fields: [SPADES, HEARTS] }
        }
    }

    register_enumeration!(Suit);

    #[test]
    fn test_registered_kind_resolves() {
        let registry = crate::ENUMERATIONS.get();
        let kind = registry.resolve_kind_by_name("suit").unwrap();
        assert!(kind.is::<Suit>());
        assert_eq!(kind.module(), module_path!());

        let suits: Vec<String> = registry
            .all_values_by_name("Suit")
            .unwrap()
            .map(|suit| suit.key().to_string())
            .collect();
        assert_eq!(suits, ["Hearts", "Spades"]);
    }

    #[test]
    fn test_global_registry_is_shared() {
        assert!(std::ptr::eq(crate::ENUMERATIONS.get(), crate::ENUMERATIONS.get()));
        assert!(crate::set_registry_config(crate::RegistryConfig::new()).is_err());
    }

    #[test]
    fn test_trait_operations_use_global_registry() {
        assert_eq!(Suit::all().count(), 2);
        assert_eq!(Suit::parse("SPADES").unwrap().unwrap().key(), "Spades");
        assert!(Suit::parse(None).unwrap().is_none());
        assert!(Suit::try_parse("clubs").is_err());
        assert!(Suit::safe_parse("hearts").is_some());
        assert!(!Suit::can_parse("clubs"));
    }
}
