//! Discovery of registered types by "is-a" relationship.
//!
//! Types are described by [`TypeInfo`] records grouped into modules by a
//! [`TypeCatalog`]. The default catalog, [`InventoryCatalog`], holds every
//! record submitted through [`register_enumeration!`](crate::register_enumeration)
//! or `inventory::submit!`, grouped by crate. [`TypeScanner`] searches a
//! catalog for concrete types assignable to a target [`TypeRef`].

use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, trace};

use crate::enumeration_registry::dispatch_all_values;
use crate::{DynValues, Enumeration, EnumerationRegistry, IntrospectionError};

/// Identity of a type or contract.
///
/// A reference with `arity > 0` is generic. When its `args` are empty it is
/// an open generic definition, otherwise a closed instantiation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef {
    module: &'static str,
    name: &'static str,
    arity: usize,
    args: &'static [TypeRef],
}

impl TypeRef {
    /// The base contract every enumeration kind is assignable to.
    pub const ENUMERATION: TypeRef = TypeRef::new(env!("CARGO_CRATE_NAME"), "Enumeration");

    /// A non-generic type or contract.
    pub const fn new(module: &'static str, name: &'static str) -> Self {
        Self { module, name, arity: 0, args: &[] }
    }

    /// A closed generic instantiation such as `Repository<Color>`.
    pub const fn generic(module: &'static str, name: &'static str, args: &'static [TypeRef]) -> Self {
        Self { module, name, arity: args.len(), args }
    }

    /// An open generic definition such as `Repository<_>`.
    pub const fn generic_definition(module: &'static str, name: &'static str, arity: usize) -> Self {
        Self { module, name, arity, args: &[] }
    }

    /// Module path the type is declared in.
    pub fn module(&self) -> &'static str {
        self.module
    }

    /// Simple name, without generic arguments.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Generic arguments; empty for an open definition or a non-generic type.
    pub fn args(&self) -> &'static [TypeRef] {
        self.args
    }

    /// True if the type takes generic parameters.
    pub fn is_generic(&self) -> bool {
        self.arity > 0
    }

    /// The open generic definition of this reference, or the reference itself
    /// when it is not generic.
    pub fn definition(&self) -> TypeRef {
        TypeRef { args: &[], ..*self }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)?;
        if self.is_generic() {
            f.write_str("<")?;
            for i in 0..self.arity {
                if i > 0 {
                    f.write_str(", ")?;
                }
                match self.args.get(i) {
                    Some(arg) => write!(f, "{}", arg)?,
                    None => f.write_str("_")?,
                }
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// Shape of a catalogued type. Only concrete types are returned by scans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeFlavor {
    Concrete,
    Abstract,
    Interface,
}

#[derive(Clone, Copy)]
pub(crate) struct EnumerationVTable {
    pub(crate) type_id: fn() -> TypeId,
    pub(crate) all_values: fn(&EnumerationRegistry) -> DynValues,
}

const ENUMERATION_SUPERTYPES: &[TypeRef] = &[TypeRef::ENUMERATION];

/// A catalog record describing one type.
pub struct TypeInfo {
    name: &'static str,
    module: &'static str,
    flavor: TypeFlavor,
    assignable_to: &'static [TypeRef],
    enumeration: Option<EnumerationVTable>,
}

inventory::collect!(TypeInfo);

impl TypeInfo {
    /// Describes a type that is not itself an enumeration kind.
    ///
    /// `assignable_to` lists the contracts the type satisfies, besides itself.
    pub const fn new(
        name: &'static str,
        module: &'static str,
        flavor: TypeFlavor,
        assignable_to: &'static [TypeRef],
    ) -> Self {
        Self { name, module, flavor, assignable_to, enumeration: None }
    }

    /// Describes the enumeration kind `K`, declared in `module`.
    pub const fn enumeration<K: Enumeration>(module: &'static str) -> Self {
        Self {
            name: K::NAME,
            module,
            flavor: TypeFlavor::Concrete,
            assignable_to: ENUMERATION_SUPERTYPES,
            enumeration: Some(EnumerationVTable {
                type_id: TypeId::of::<K>,
                all_values: dispatch_all_values::<K>,
            }),
        }
    }

    /// Simple type name, without module path.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Full module path the type was declared in.
    pub fn module(&self) -> &'static str {
        self.module
    }

    /// The crate the type belongs to: the first segment of its module path.
    pub fn crate_name(&self) -> &'static str {
        self.module.split("::").next().unwrap_or(self.module)
    }

    /// Whether the type is concrete, abstract or an interface.
    pub fn flavor(&self) -> TypeFlavor {
        self.flavor
    }

    pub fn is_concrete(&self) -> bool {
        self.flavor == TypeFlavor::Concrete
    }

    /// The non-generic reference naming this type.
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::new(self.module, self.name)
    }

    /// The `TypeId` of the enumeration kind this record describes, if any.
    pub fn enumeration_type_id(&self) -> Option<TypeId> {
        self.enumeration.map(|vtable| (vtable.type_id)())
    }

    pub(crate) fn enumeration_vtable(&self) -> Option<EnumerationVTable> {
        self.enumeration
    }

    /// True if this type is `target` or declares it.
    pub fn is_assignable_to(&self, target: &TypeRef) -> bool {
        self.type_ref() == *target || self.assignable_to.contains(target)
    }

    /// True if this type declares any instantiation of `target`'s generic
    /// definition.
    pub fn is_assignable_to_definition(&self, target: &TypeRef) -> bool {
        let definition = target.definition();
        self.assignable_to
            .iter()
            .any(|declared| declared.is_generic() && declared.definition() == definition)
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("flavor", &self.flavor)
            .field("assignable_to", &self.assignable_to)
            .field("enumeration", &self.enumeration.is_some())
            .finish()
    }
}

/// A named group of types, listed and introspected as a unit.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleHandle(String);

impl ModuleHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of types currently known to the program.
pub trait TypeCatalog: Send + Sync {
    /// Lists the modules in scan order.
    fn modules(&self) -> Vec<ModuleHandle>;

    /// Lists the types of one module.
    fn types(&self, module: &ModuleHandle) -> Result<Vec<&'static TypeInfo>, IntrospectionError>;
}

/// Catalog of every [`TypeInfo`] submitted to the inventory, one module per
/// crate, modules in name order.
#[derive(Clone, Copy, Debug, Default)]
pub struct InventoryCatalog;

impl InventoryCatalog {
    /// The inventory grouped by crate, built on first use. Submissions are
    /// fixed at startup.
    fn grouped() -> &'static BTreeMap<&'static str, Vec<&'static TypeInfo>> {
        static GROUPED: OnceLock<BTreeMap<&'static str, Vec<&'static TypeInfo>>> = OnceLock::new();
        GROUPED.get_or_init(|| {
            let mut modules: BTreeMap<&'static str, Vec<&'static TypeInfo>> = BTreeMap::new();
            for info in inventory::iter::<TypeInfo> {
                modules.entry(info.crate_name()).or_default().push(info);
            }
            debug!(modules = modules.len(), "grouped type inventory");
            modules
        })
    }
}

impl TypeCatalog for InventoryCatalog {
    fn modules(&self) -> Vec<ModuleHandle> {
        Self::grouped().keys().copied().map(ModuleHandle::new).collect()
    }

    fn types(&self, module: &ModuleHandle) -> Result<Vec<&'static TypeInfo>, IntrospectionError> {
        Ok(Self::grouped().get(module.name()).cloned().unwrap_or_default())
    }
}

/// A catalog assembled explicitly, module by module.
///
/// Modules are scanned in the order they were added. A module added with
/// [`with_unreadable_module`](Self::with_unreadable_module) fails
/// introspection with the given reason.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use smart_enumerations::{StaticCatalog, TypeFlavor, TypeInfo, TypeRef, TypeScanner};
///
/// const SHAPE: TypeRef = TypeRef::new("geometry", "Shape");
/// static CIRCLE: TypeInfo = TypeInfo::new("Circle", "geometry", TypeFlavor::Concrete, &[SHAPE]);
///
/// let catalog = StaticCatalog::new()
///     .with_module("geometry", [&CIRCLE])
///     .with_unreadable_module("legacy", "types unavailable");
/// let scanner = TypeScanner::new(Arc::new(catalog));
///
/// let found = scanner.find_assignable_types(&SHAPE);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].name(), "Circle");
/// assert!(scanner.find_modules_containing(&SHAPE).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    modules: Vec<(ModuleHandle, Result<Vec<&'static TypeInfo>, String>)>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(
        mut self,
        name: impl Into<String>,
        types: impl IntoIterator<Item = &'static TypeInfo>,
    ) -> Self {
        self.modules
            .push((ModuleHandle::new(name), Ok(types.into_iter().collect())));
        self
    }

    pub fn with_unreadable_module(
        mut self,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.modules.push((ModuleHandle::new(name), Err(reason.into())));
        self
    }
}

impl TypeCatalog for StaticCatalog {
    fn modules(&self) -> Vec<ModuleHandle> {
        self.modules.iter().map(|(module, _)| module.clone()).collect()
    }

    fn types(&self, module: &ModuleHandle) -> Result<Vec<&'static TypeInfo>, IntrospectionError> {
        match self.modules.iter().find(|(handle, _)| handle == module) {
            Some((_, Ok(types))) => Ok(types.clone()),
            Some((_, Err(reason))) => Err(IntrospectionError::new(module.name(), reason.clone())),
            None => Ok(Vec::new()),
        }
    }
}

/// Searches a [`TypeCatalog`] for types satisfying an "is-a" relationship.
pub struct TypeScanner {
    catalog: Arc<dyn TypeCatalog>,
    excluded_modules: Vec<String>,
    scans: AtomicUsize,
}

impl TypeScanner {
    pub fn new(catalog: Arc<dyn TypeCatalog>) -> Self {
        Self {
            catalog,
            excluded_modules: Vec::new(),
            scans: AtomicUsize::new(0),
        }
    }

    /// Modules with these names are never introspected.
    pub fn with_excluded_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_modules.extend(modules.into_iter().map(Into::into));
        self
    }

    pub fn excluded_modules(&self) -> &[String] {
        &self.excluded_modules
    }

    /// Returns every concrete type assignable to `target`, or, when `target`
    /// is generic, to its generic definition.
    ///
    /// Modules whose types cannot be listed are skipped. The result is empty
    /// when nothing matches.
    pub fn find_assignable_types(&self, target: &TypeRef) -> Vec<&'static TypeInfo> {
        self.scans.fetch_add(1, Ordering::Relaxed);

        let mut found = Vec::new();
        for module in self.introspectable_modules() {
            let types = match self.catalog.types(&module) {
                Ok(types) => types,
                Err(error) => {
                    debug!(%error, "skipping module during type scan");
                    continue;
                }
            };
            found.extend(types.into_iter().filter(|info| {
                info.is_concrete()
                    && (info.is_assignable_to(target)
                        || (target.is_generic() && info.is_assignable_to_definition(target)))
            }));
        }
        found
    }

    /// Returns each module holding at least one type assignable to `target`.
    ///
    /// Unlike [`find_assignable_types`](Self::find_assignable_types), a module
    /// that cannot be introspected fails the whole call.
    pub fn find_modules_containing(
        &self,
        target: &TypeRef,
    ) -> Result<Vec<ModuleHandle>, IntrospectionError> {
        let mut containing = Vec::new();
        for module in self.introspectable_modules() {
            let types = self.catalog.types(&module)?;
            if types.iter().any(|info| info.is_assignable_to(target)) {
                containing.push(module);
            }
        }
        Ok(containing)
    }

    /// Number of [`find_assignable_types`](Self::find_assignable_types) scans
    /// run so far.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }

    fn introspectable_modules(&self) -> impl Iterator<Item = ModuleHandle> + '_ {
        self.catalog.modules().into_iter().filter(|module| {
            let excluded = self.excluded_modules.iter().any(|name| name == module.name());
            if excluded {
                trace!(module = %module, "module excluded from type scan");
            }
            !excluded
        })
    }
}

impl fmt::Debug for TypeScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeScanner")
            .field("excluded_modules", &self.excluded_modules)
            .field("scans", &self.scan_count())
            .finish_non_exhaustive()
    }
}
