use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::enum_value::keys_match;
use crate::type_scanner::EnumerationVTable;
use crate::{
    DynEnumeration, Enumeration, Error, InventoryCatalog, Member, ParseFailure, RegistryConfig,
    Result, TypeCatalog, TypeInfo, TypeRef, TypeScanner,
};

/// Values of a kind that is only known at run time.
pub type DynValues = Box<dyn Iterator<Item = Box<dyn DynEnumeration>> + Send>;

type MemberList<K> = Arc<[Member<K>]>;

/// Enumerates, resolves and parses enumeration values.
///
/// The registry keeps two caches that only grow: the sorted member list of
/// each kind it has enumerated, and the kind resolved for each lowercased
/// name. Each cache is guarded by its own lock, held across lookup,
/// computation and insertion, so a member list or name mapping is computed at
/// most once per registry.
///
/// Most programs use the process-wide [`ENUMERATIONS`](crate::ENUMERATIONS)
/// registry through the [`Enumeration`] trait's associated functions. A
/// registry can also be constructed over an explicit [`TypeCatalog`] and
/// passed to the code that needs it.
///
/// # Examples
///
/// ```
/// use smart_enumerations::{EnumValue, Enumeration, EnumerationRegistry, Member, members};
///
/// #[derive(Clone, Debug)]
/// pub struct Currency(EnumValue);
///
/// impl Currency {
///     pub const USD: Currency = Currency(EnumValue::with_static_label("USD", "US Dollar"));
///     pub const EUR: Currency = Currency(EnumValue::with_static_label("EUR", "Euro"));
/// }
///
/// impl Enumeration for Currency {
///     const NAME: &'static str = "Currency";
///
///     fn value(&self) -> &EnumValue {
///         &self.0
///     }
///
///     fn members() -> Vec<Member<Self>> {
///         members! { fields: [USD, EUR] }
///     }
/// }
///
/// let registry = EnumerationRegistry::default();
///
/// let labels: Vec<String> = registry
///     .all_values::<Currency>()
///     .map(|currency| currency.display_label())
///     .collect();
/// assert_eq!(labels, ["Euro", "US Dollar"]);
///
/// let usd = registry.parse::<Currency>("usd").unwrap();
/// assert_eq!(usd.unwrap().key(), "USD");
/// assert!(registry.parse::<Currency>("").unwrap().is_none());
/// assert!(!registry.can_parse::<Currency>("GBP"));
/// ```
pub struct EnumerationRegistry {
    scanner: TypeScanner,
    members: Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
    kinds: Mutex<HashMap<String, Kind>>,
    member_discoveries: AtomicUsize,
}

impl EnumerationRegistry {
    /// Creates a registry that resolves kinds from `catalog`.
    pub fn new(catalog: Arc<dyn TypeCatalog>) -> Self {
        Self::with_scanner(TypeScanner::new(catalog))
    }

    /// Creates a registry from a configuration. Without a configured catalog
    /// the registry uses the [`InventoryCatalog`].
    pub fn with_config(config: RegistryConfig) -> Self {
        let (excluded_modules, catalog) = config.into_parts();
        let catalog = catalog.unwrap_or_else(|| Arc::new(InventoryCatalog));
        Self::with_scanner(TypeScanner::new(catalog).with_excluded_modules(excluded_modules))
    }

    /// Creates a registry over an existing scanner.
    pub fn with_scanner(scanner: TypeScanner) -> Self {
        Self {
            scanner,
            members: Mutex::new(HashMap::new()),
            kinds: Mutex::new(HashMap::new()),
            member_discoveries: AtomicUsize::new(0),
        }
    }

    /// The scanner used for name resolution.
    pub fn scanner(&self) -> &TypeScanner {
        &self.scanner
    }

    /// Number of kinds whose member lists have been computed.
    pub fn member_discovery_count(&self) -> usize {
        self.member_discoveries.load(Ordering::Relaxed)
    }

    /// Returns every value of `K`.
    ///
    /// Values come out in member order: fields before properties, each group
    /// sorted by member name. The member list is computed once per kind;
    /// the values themselves are read again on every call.
    pub fn all_values<K: Enumeration>(&self) -> AllValues<K> {
        AllValues { members: self.members_of::<K>(), next: 0 }
    }

    /// Resolves the kind whose simple name matches `name`, ignoring case.
    ///
    /// When several kinds share a name, the first one found by the scanner
    /// is cached and returned from then on. Records that match the name but
    /// carry no enumeration dispatch are skipped.
    pub fn resolve_kind_by_name(&self, name: &str) -> Result<Kind> {
        let name = name.to_lowercase();

        let mut kinds = self.kinds.lock();
        if let Some(kind) = kinds.get(&name) {
            return Ok(*kind);
        }

        let kind = self
            .scanner
            .find_assignable_types(&TypeRef::ENUMERATION)
            .into_iter()
            .filter(|info| info.name().to_lowercase() == name)
            .find_map(Kind::from_info)
            .ok_or_else(|| Error::NotFound { name: name.clone() })?;

        debug!(name = %name, kind = kind.name(), module = kind.module(), "cached enumeration kind");
        kinds.insert(name, kind);
        Ok(kind)
    }

    /// Returns every value of the kind named `name`.
    pub fn all_values_by_name(&self, name: &str) -> Result<DynValues> {
        let kind = self.resolve_kind_by_name(name)?;
        Ok(kind.all_values(self))
    }

    /// Parses `raw` as a key of `K`, ignoring case.
    ///
    /// Returns `Ok(None)` for an empty or absent input. When several members
    /// share a key, the first in member order wins.
    pub fn parse<'a, K: Enumeration>(&self, raw: impl Into<Option<&'a str>>) -> Result<Option<K>> {
        let raw = match raw.into() {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(None),
        };

        self.all_values::<K>()
            .find(|value| keys_match(value.key(), raw))
            .map(Some)
            .ok_or_else(|| Error::InvalidValue { value: raw.to_string(), kind: K::NAME })
    }

    /// Like [`parse`](Self::parse), with the failure cause discarded.
    pub fn try_parse<'a, K: Enumeration>(
        &self,
        raw: impl Into<Option<&'a str>>,
    ) -> std::result::Result<Option<K>, ParseFailure> {
        self.parse::<K>(raw).map_err(|_| ParseFailure)
    }

    /// The parsed value, or `None` on empty input or failure.
    pub fn safe_parse<'a, K: Enumeration>(&self, raw: impl Into<Option<&'a str>>) -> Option<K> {
        self.try_parse::<K>(raw).ok().flatten()
    }

    /// True unless parsing fails. Empty input parses to no value and counts
    /// as success.
    pub fn can_parse<'a, K: Enumeration>(&self, raw: impl Into<Option<&'a str>>) -> bool {
        self.try_parse::<K>(raw).is_ok()
    }

    fn members_of<K: Enumeration>(&self) -> MemberList<K> {
        let id = TypeId::of::<K>();

        // Held across `K::members()`; the lock is not reentrant.
        let mut cache = self.members.lock();
        if let Some(members) = cache.get(&id).and_then(|entry| entry.downcast_ref::<MemberList<K>>()) {
            return members.clone();
        }

        let mut members = K::members();
        members.sort_by_key(|member| (member.kind(), member.name()));
        let members: MemberList<K> = members.into();

        self.member_discoveries.fetch_add(1, Ordering::Relaxed);
        debug!(kind = K::NAME, members = members.len(), "cached enumeration members");
        cache.insert(id, Box::new(members.clone()));
        members
    }
}

impl Default for EnumerationRegistry {
    fn default() -> Self {
        Self::new(Arc::new(InventoryCatalog))
    }
}

impl fmt::Debug for EnumerationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumerationRegistry")
            .field("scanner", &self.scanner)
            .field("cached_kinds", &self.kinds.lock().len())
            .field("cached_member_lists", &self.members.lock().len())
            .finish()
    }
}

pub(crate) fn dispatch_all_values<K: Enumeration>(registry: &EnumerationRegistry) -> DynValues {
    Box::new(
        registry
            .all_values::<K>()
            .map(|value| Box::new(value) as Box<dyn DynEnumeration>),
    )
}

/// An enumeration kind resolved at run time.
#[derive(Clone, Copy)]
pub struct Kind {
    info: &'static TypeInfo,
    vtable: EnumerationVTable,
}

impl Kind {
    /// Returns `None` for a record that does not describe an enumeration kind.
    pub fn from_info(info: &'static TypeInfo) -> Option<Self> {
        info.enumeration_vtable().map(|vtable| Self { info, vtable })
    }

    /// Simple name of the kind, as declared by `Enumeration::NAME`.
    pub fn name(&self) -> &'static str {
        self.info.name()
    }

    /// Module path the kind was registered from.
    pub fn module(&self) -> &'static str {
        self.info.module()
    }

    /// The catalog record this kind was resolved from.
    pub fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    /// The `TypeId` of the kind's Rust type.
    pub fn type_id(&self) -> TypeId {
        (self.vtable.type_id)()
    }

    /// True if this kind is `K`.
    pub fn is<K: Enumeration>(&self) -> bool {
        self.type_id() == TypeId::of::<K>()
    }

    /// Every value of this kind, read through `registry`.
    pub fn all_values(&self, registry: &EnumerationRegistry) -> DynValues {
        (self.vtable.all_values)(registry)
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for Kind {}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kind")
            .field("name", &self.name())
            .field("module", &self.module())
            .finish()
    }
}

/// Iterator over the values of one kind, in member order.
///
/// Each value is produced by reading its member when the iterator reaches
/// it.
pub struct AllValues<K> {
    members: MemberList<K>,
    next: usize,
}

impl<K> Iterator for AllValues<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let member = self.members.get(self.next)?;
        self.next += 1;
        Some(member.read())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.members.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl<K> ExactSizeIterator for AllValues<K> {}

impl<K> FusedIterator for AllValues<K> {}

impl<K> fmt::Debug for AllValues<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllValues")
            .field("members", &self.members)
            .field("next", &self.next)
            .finish()
    }
}
