//! The breakpoint site registry: one record per installed address.

use std::collections::HashMap;

use crate::types::{Address, Mode, Size, Type};

/// The canonical in-registry record for one breakpoint/watchpoint address.
///
/// Invariant: `refs > 0` if and only if `kind` contains [`Type::PERMANENT`].
/// The manager is the only code that constructs or mutates a `Site`; callers
/// only ever see an owned clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site
{
    /// The target address this site watches.
    pub address: Address,
    /// Accumulated lifecycle tags.
    pub kind: Type,
    /// Access class (exec, read, write, or a legal combination).
    pub mode: Mode,
    /// Byte width.
    pub size: Size,
    /// Count of outstanding *exactly-permanent* installs at this address.
    pub refs: u32,
}

impl Site
{
    pub(crate) fn new(address: Address, kind: Type, mode: Mode, size: Size) -> Self
    {
        let refs = u32::from(kind == Type::PERMANENT);
        Self {
            address,
            kind,
            mode,
            size,
            refs,
        }
    }
}

/// Address-keyed map of [`Site`]s. At most one site per address.
#[derive(Debug, Default)]
pub struct SiteRegistry(HashMap<Address, Site>);

impl SiteRegistry
{
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self
    {
        Self(HashMap::new())
    }

    /// Look up the site at `address`, if any.
    #[must_use]
    pub fn get(&self, address: Address) -> Option<&Site>
    {
        self.0.get(&address)
    }

    /// Look up the site at `address` for mutation, if any.
    pub fn get_mut(&mut self, address: Address) -> Option<&mut Site>
    {
        self.0.get_mut(&address)
    }

    /// Whether a site exists at `address`.
    #[must_use]
    pub fn contains(&self, address: Address) -> bool
    {
        self.0.contains_key(&address)
    }

    /// Insert or replace the site at its own address.
    pub fn insert(&mut self, site: Site)
    {
        self.0.insert(site.address, site);
    }

    /// Remove and return the site at `address`, if any.
    pub fn remove(&mut self, address: Address) -> Option<Site>
    {
        self.0.remove(&address)
    }

    /// Number of sites currently tracked.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.0.len()
    }

    /// Whether the registry holds no sites.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.0.is_empty()
    }

    /// Iterate over all sites in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Site>
    {
        self.0.values()
    }

    /// Iterate mutably over all sites in unspecified order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Site>
    {
        self.0.values_mut()
    }
}
