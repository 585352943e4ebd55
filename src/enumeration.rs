use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::Hasher;

use crate::{AllValues, ENUMERATIONS, EnumValue, ParseFailure, Result};

/// A closed set of named values: an enumeration kind.
///
/// Implementors embed an [`EnumValue`] and declare their values as associated
/// constants (fields) or associated functions (properties) returning `Self`,
/// listed by [`Enumeration::members`]. Register the kind with
/// [`register_enumeration!`](crate::register_enumeration) to make it
/// resolvable by name.
///
/// The provided associated functions (`all`, `parse`, ...) use the
/// process-wide registry [`ENUMERATIONS`]. Code that owns an
/// [`EnumerationRegistry`](crate::EnumerationRegistry) calls the same
/// operations on it directly.
///
/// # Examples
///
/// ```
/// use smart_enumerations::{EnumValue, Enumeration, Member, members, register_enumeration};
///
/// #[derive(Clone, Debug)]
/// pub struct Color {
///     value: EnumValue,
///     rgb: u32,
/// }
///
/// impl Color {
///     pub const RED: Color = Color { value: EnumValue::new_static("RED"), rgb: 0xff0000 };
///     pub const GREEN: Color = Color { value: EnumValue::new_static("Green"), rgb: 0x00ff00 };
///     pub const BLUE: Color = Color { value: EnumValue::new_static("blue"), rgb: 0x0000ff };
/// }
///
/// impl Enumeration for Color {
///     const NAME: &'static str = "Color";
///
///     fn value(&self) -> &EnumValue {
///         &self.value
///     }
///
///     fn members() -> Vec<Member<Self>> {
///         members! { fields: [RED, GREEN, BLUE] }
///     }
/// }
///
/// register_enumeration!(Color);
///
/// let keys: Vec<String> = Color::all().map(|c| c.key().to_string()).collect();
/// assert_eq!(keys, ["blue", "Green", "RED"]);
///
/// let green = Color::parse("green").unwrap().unwrap();
/// assert_eq!(green.rgb, 0x00ff00);
/// assert!(Color::parse("purple").is_err());
/// ```
pub trait Enumeration: Sized + Send + Sync + 'static {
    /// The simple type name used for name-based resolution.
    const NAME: &'static str;

    /// The key and label of this value.
    fn value(&self) -> &EnumValue;

    /// The declared singleton accessors of this kind, in any order.
    ///
    /// Called once per registry while the registry's member cache is locked,
    /// so it must not enumerate or parse any kind itself.
    fn members() -> Vec<Member<Self>>;

    fn key(&self) -> &str {
        self.value().key()
    }

    fn label(&self) -> Cow<'_, str> {
        self.value().label()
    }

    fn display_label(&self) -> String {
        self.value().display_label()
    }

    /// Same instance, or keys equal ignoring case.
    fn equals(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.value().equals(other.value())
    }

    fn hash_key<H: Hasher>(&self, state: &mut H) {
        self.value().hash_key(state)
    }

    fn all() -> AllValues<Self> {
        ENUMERATIONS.get().all_values::<Self>()
    }

    fn parse<'a>(raw: impl Into<Option<&'a str>>) -> Result<Option<Self>> {
        ENUMERATIONS.get().parse::<Self>(raw)
    }

    fn try_parse<'a>(
        raw: impl Into<Option<&'a str>>,
    ) -> std::result::Result<Option<Self>, ParseFailure> {
        ENUMERATIONS.get().try_parse::<Self>(raw)
    }

    fn safe_parse<'a>(raw: impl Into<Option<&'a str>>) -> Option<Self> {
        ENUMERATIONS.get().safe_parse::<Self>(raw)
    }

    fn can_parse<'a>(raw: impl Into<Option<&'a str>>) -> bool {
        ENUMERATIONS.get().can_parse::<Self>(raw)
    }
}

/// Whether a member is a stored constant or a computed accessor.
///
/// Fields sort before properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemberKind {
    Field,
    Property,
}

/// One declared singleton accessor of an enumeration kind.
pub struct Member<K> {
    name: &'static str,
    kind: MemberKind,
    read: fn() -> K,
}

impl<K> Member<K> {
    pub const fn field(name: &'static str, read: fn() -> K) -> Self {
        Self { name, kind: MemberKind::Field, read }
    }

    pub const fn property(name: &'static str, read: fn() -> K) -> Self {
        Self { name, kind: MemberKind::Property, read }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Produces the member's current value.
    pub fn read(&self) -> K {
        (self.read)()
    }
}

impl<K> Clone for Member<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Member<K> {}

impl<K> fmt::Debug for Member<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Builds the member list of an enumeration kind.
///
/// `fields` name associated constants of type `Self`, `properties` name
/// associated functions returning `Self`. Either section may be omitted.
///
/// ```
/// # use smart_enumerations::{EnumValue, Enumeration, Member, MemberKind, members};
/// #[derive(Clone, Debug)]
/// pub struct Network(EnumValue);
///
/// impl Network {
///     pub const MAIN_NET: Network = Network(EnumValue::new_static("MainNet"));
///     pub const TEST_NET: Network = Network(EnumValue::new_static("TestNet"));
///
///     pub fn regtest() -> Network {
///         Network(EnumValue::with_label("RegTest", "Regression Test"))
///     }
/// }
///
/// impl Enumeration for Network {
///     const NAME: &'static str = "Network";
///
///     fn value(&self) -> &EnumValue {
///         &self.0
///     }
///
///     fn members() -> Vec<Member<Self>> {
///         members! {
///             fields: [MAIN_NET, TEST_NET],
///             properties: [regtest],
///         }
///     }
/// }
///
/// let members = Network::members();
/// assert_eq!(members.len(), 3);
/// assert_eq!(members[2].name(), "regtest");
/// assert_eq!(members[2].kind(), MemberKind::Property);
/// ```
#[macro_export]
macro_rules! members {
    (
        $(fields: [$($field:ident),* $(,)?])? $(,)?
        $(properties: [$($property:ident),* $(,)?])? $(,)?
    ) => {
        ::std::vec![
            $($($crate::Member::field(::std::stringify!($field), || Self::$field),)*)?
            $($($crate::Member::property(::std::stringify!($property), Self::$property),)*)?
        ]
    };
}

/// Type-erased view of a value of any enumeration kind.
///
/// Produced by name-based enumeration, where the kind is only known at run
/// time. Use [`downcast_ref`](#method.downcast_ref) to recover the concrete
/// kind.
pub trait DynEnumeration: Send + Sync + 'static {
    fn enum_value(&self) -> &EnumValue;

    fn kind_name(&self) -> &'static str;

    fn kind_id(&self) -> TypeId;

    fn as_any(&self) -> &dyn Any;
}

impl<K: Enumeration> DynEnumeration for K {
    fn enum_value(&self) -> &EnumValue {
        self.value()
    }

    fn kind_name(&self) -> &'static str {
        K::NAME
    }

    fn kind_id(&self) -> TypeId {
        TypeId::of::<K>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn DynEnumeration {
    pub fn key(&self) -> &str {
        self.enum_value().key()
    }

    pub fn label(&self) -> Cow<'_, str> {
        self.enum_value().label()
    }

    pub fn display_label(&self) -> String {
        self.enum_value().display_label()
    }

    /// Same kind and keys equal ignoring case.
    pub fn equals(&self, other: &dyn DynEnumeration) -> bool {
        self.kind_id() == other.kind_id() && self.enum_value().equals(other.enum_value())
    }

    pub fn downcast_ref<K: Enumeration>(&self) -> Option<&K> {
        self.as_any().downcast_ref::<K>()
    }
}

impl fmt::Debug for dyn DynEnumeration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.kind_name())
            .field("key", &self.key())
            .finish()
    }
}

impl fmt::Display for dyn DynEnumeration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Planet(EnumValue);

    impl Planet {
        const MARS: Planet = Planet(EnumValue::new_static("Mars"));
        const EARTH: Planet = Planet(EnumValue::new_static("Earth"));

        fn dwarf() -> Planet {
            Planet(EnumValue::with_label("Pluto", "Dwarf planet"))
        }
    }

    impl Enumeration for Planet {
        const NAME: &'static str = "Planet";

        fn value(&self) -> &EnumValue {
            &self.0
        }

        fn members() -> Vec<Member<Self>> {
            members! {
                fields: [MARS, EARTH],
                properties: [dwarf],
            }
        }
    }

    #[derive(Debug)]
    struct Moon(EnumValue);

    impl Enumeration for Moon {
        const NAME: &'static str = "Moon";

        fn value(&self) -> &EnumValue {
            &self.0
        }

        fn members() -> Vec<Member<Self>> {
            members! {}
        }
    }

    #[test]
    fn test_members_macro() {
        let members = Planet::members();
        let summary: Vec<_> = members.iter().map(|m| (m.name(), m.kind())).collect();
        assert_eq!(
            summary,
            [
                ("MARS", MemberKind::Field),
                ("EARTH", MemberKind::Field),
                ("dwarf", MemberKind::Property),
            ]
        );
        assert_eq!(members[2].read().label(), "Dwarf planet");
        assert!(Moon::members().is_empty());
    }

    #[test]
    fn test_typed_equality() {
        let mars = Planet::MARS;
        assert!(mars.equals(&mars));
        assert!(mars.equals(&Planet(EnumValue::new("MARS"))));
        assert!(!mars.equals(&Planet::EARTH));
    }

    #[test]
    fn test_dyn_view() {
        let mars: Box<dyn DynEnumeration> = Box::new(Planet::MARS);
        let also_mars: Box<dyn DynEnumeration> = Box::new(Planet(EnumValue::new("mars")));
        let moon_mars: Box<dyn DynEnumeration> = Box::new(Moon(EnumValue::new("Mars")));

        assert_eq!(mars.kind_name(), "Planet");
        assert_eq!(mars.key(), "Mars");
        assert_eq!(mars.to_string(), "Mars");
        assert!(mars.equals(also_mars.as_ref()));
        assert!(!mars.equals(moon_mars.as_ref()));
        assert!(mars.downcast_ref::<Planet>().is_some());
        assert!(mars.downcast_ref::<Moon>().is_none());
    }

    #[test]
    fn test_member_kind_order() {
        assert!(MemberKind::Field < MemberKind::Property);
    }
}
