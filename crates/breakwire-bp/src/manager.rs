//! The generic breakpoint lifecycle shared by every backend.
//!
//! This replaces what would, in an object-oriented port, be an abstract base
//! class with virtual `enableLocation`/`disableLocation`/`isValid` methods
//! overridden per architecture. Here the shared algorithm lives once, in
//! [`Manager<B>`], generic over a [`Backend`] that supplies only the parts
//! that actually differ between software and hardware breakpoints.

use crate::error::{BreakpointError, Result};
use crate::site::{Site, SiteRegistry};
use crate::traced::TracedProcess;
use crate::types::{Address, Mode, Size, Type};

/// Architecture/kind-specific mechanics a [`Manager`] drives.
///
/// A `Backend` owns whatever side tables it needs (original instruction
/// bytes, a hardware slot table, ...). The manager owns the [`SiteRegistry`]
/// and the lifecycle rules in [`Manager::add`]/[`Manager::remove`]/
/// [`Manager::enable`]/[`Manager::disable`]; the backend only knows how to
/// push one site's state into the target and validate a request.
pub trait Backend
{
    /// Extra validation beyond `address.valid()`, which [`Manager::add`]
    /// already checks before calling this.
    fn is_valid(&self, size: Size, mode: Mode) -> Result<()>;

    /// Push `site`'s state into the target. Called when a newly created site
    /// is added while the manager is enabled, and once per site during
    /// [`Manager::enable`].
    fn enable_location(&mut self, process: &mut dyn TracedProcess, site: &Site) -> Result<()>;

    /// Undo [`Backend::enable_location`]. Called by [`Manager::disable`] and,
    /// if the manager is enabled, by [`Manager::remove`].
    fn disable_location(&mut self, process: &mut dyn TracedProcess, site: &Site) -> Result<()>;

    /// Canonicalize a request the backend cannot express exactly, before
    /// validation runs (e.g. x86 hardware has no read-only mode and upgrades
    /// it to read-write). Default: no change.
    fn normalize_mode(&self, mode: Mode) -> Mode
    {
        mode
    }

    /// Debug-only capacity check, run at the top of [`Manager::add`] before
    /// the new site is created. Default: no-op.
    fn before_add(&self, _site_count: usize)
    {
    }

    /// Release any backend-local slot/table bookkeeping for `address`.
    /// Called by [`Manager::remove`] once the site has actually been erased
    /// from the registry — unlike `disable_location`, this does not run on a
    /// plain [`Manager::disable`] (which may be followed by a re-enable).
    fn release_location(&mut self, _address: Address)
    {
    }

    /// Drop all backend-local bookkeeping, without touching the target.
    /// Called by [`Manager::clear`] at process teardown. Default: no-op.
    fn clear(&mut self)
    {
    }
}

/// Generic breakpoint manager: the site registry plus the lifecycle
/// algorithm, parameterized over a [`Backend`].
pub struct Manager<B: Backend>
{
    enabled: bool,
    sites: SiteRegistry,
    backend: B,
}

impl<B: Backend> Manager<B>
{
    /// Construct a manager around a fresh backend. Starts disabled, with an
    /// empty registry.
    pub fn new(backend: B) -> Self
    {
        Self {
            enabled: false,
            sites: SiteRegistry::new(),
            backend,
        }
    }

    /// Shared reference to the backend, for backend-specific queries (e.g.
    /// `max_watchpoints`).
    pub fn backend(&self) -> &B
    {
        &self.backend
    }

    /// Mutable reference to the backend.
    pub fn backend_mut(&mut self) -> &mut B
    {
        &mut self.backend
    }

    /// Whether `enable()` has been called without a matching `disable()`.
    #[must_use]
    pub fn is_enabled(&self) -> bool
    {
        self.enabled
    }

    fn is_valid(&self, address: Address, size: Size, mode: Mode) -> Result<()>
    {
        if !address.valid() {
            return Err(BreakpointError::InvalidAddress(address));
        }
        self.backend.is_valid(size, mode)
    }

    /// Install or merge a breakpoint/watchpoint request at `address`.
    ///
    /// A fresh request at an address already tracked merges its lifecycle
    /// tags into the existing site rather than creating a second one; a
    /// repeated exactly-`PERMANENT` request bumps its refcount instead.
    pub fn add(
        &mut self,
        process: &mut dyn TracedProcess,
        address: Address,
        kind: Type,
        size: Size,
        mode: Mode,
    ) -> Result<()>
    {
        self.backend.before_add(self.sites.len());
        let mode = self.backend.normalize_mode(mode);
        self.is_valid(address, size, mode)?;

        let newly_created = if let Some(existing) = self.sites.get_mut(address) {
            if existing.mode != mode {
                return Err(BreakpointError::InvalidArgument(format!(
                    "site at {address} already has mode {:?}, requested {mode:?}",
                    existing.mode
                )));
            }
            existing.kind |= kind;
            if kind == Type::PERMANENT {
                existing.refs += 1;
            }
            false
        } else {
            self.sites.insert(Site::new(address, kind, mode, size));
            true
        };

        if self.enabled && newly_created {
            let site = self.sites.get(address).expect("just inserted").clone();
            self.backend.enable_location(process, &site)?;
        }
        Ok(())
    }

    /// Remove a reference to the breakpoint/watchpoint at `address`.
    ///
    /// Drops one `PERMANENT` refcount; the site is only erased, and the
    /// backend only asked to disable it, once every tag is gone.
    pub fn remove(&mut self, process: &mut dyn TracedProcess, address: Address) -> Result<()>
    {
        if !address.valid() {
            return Err(BreakpointError::InvalidArgument(
                "address is not valid".to_string(),
            ));
        }

        enum Action
        {
            Retain,
            Erase,
        }

        let action = {
            let site = self
                .sites
                .get_mut(address)
                .ok_or_else(|| BreakpointError::NotFound(format!("no site at {address}")))?;

            if !site.kind.contains(Type::PERMANENT) {
                Action::Erase
            } else {
                assert!(site.refs > 0, "permanent site with zero refcount at {address}");
                site.refs -= 1;
                if site.refs > 0 {
                    Action::Retain
                } else if site.kind == Type::PERMANENT {
                    Action::Erase
                } else {
                    site.kind.remove(Type::PERMANENT);
                    Action::Retain
                }
            }
        };

        match action {
            Action::Retain => Ok(()),
            Action::Erase => {
                let site = self.sites.remove(address).expect("looked up above");
                let result = if self.enabled {
                    self.backend.disable_location(process, &site)
                } else {
                    Ok(())
                };
                self.backend.release_location(address);
                result
            }
        }
    }

    /// Whether a site exists at `address`.
    #[must_use]
    pub fn has(&self, address: Address) -> bool
    {
        address.valid() && self.sites.contains(address)
    }

    /// Iterate over all tracked sites in unspecified order.
    pub fn enumerate(&self) -> impl Iterator<Item = &Site>
    {
        self.sites.iter()
    }

    /// Fetch a copy of the site at `address`, if any.
    #[must_use]
    pub fn site(&self, address: Address) -> Option<Site>
    {
        self.sites.get(address).cloned()
    }

    /// Enter the enabled state and push every tracked site into the target.
    /// Idempotent: a second call warns and re-sweeps rather than failing.
    pub fn enable(&mut self, process: &mut dyn TracedProcess)
    {
        if self.enabled {
            tracing::warn!("enable() called while already enabled");
        }
        self.enabled = true;

        let addresses: Vec<Address> = self.sites.iter().map(|s| s.address).collect();
        for address in addresses {
            let site = self.sites.get(address).expect("address taken from registry").clone();
            if let Err(err) = self.backend.enable_location(process, &site) {
                tracing::warn!(%address, %err, "failed to enable breakpoint site");
            }
        }
    }

    /// Leave the enabled state, withdraw every tracked site from the target,
    /// and sweep one-shot/until-hit sites that have served their purpose.
    /// Idempotent: a second call warns and re-sweeps rather than failing.
    pub fn disable(&mut self, process: &mut dyn TracedProcess)
    {
        if !self.enabled {
            tracing::warn!("disable() called while already disabled");
        }

        let addresses: Vec<Address> = self.sites.iter().map(|s| s.address).collect();
        for address in &addresses {
            let site = self.sites.get(*address).expect("address taken from registry").clone();
            if let Err(err) = self.backend.disable_location(process, &site) {
                tracing::warn!(address = %address, %err, "failed to disable breakpoint site");
            }
        }
        self.enabled = false;

        let to_drop: Vec<Address> = self
            .sites
            .iter_mut()
            .filter_map(|site| {
                site.kind.remove(Type::TEMPORARY_ONE_SHOT);
                if site.kind.is_empty() {
                    assert_eq!(site.refs, 0, "site swept at {} still has outstanding refs", site.address);
                    Some(site.address)
                } else {
                    None
                }
            })
            .collect();
        for address in to_drop {
            self.sites.remove(address);
        }
    }

    /// Address-based hit test: clears the `TEMPORARY_UNTIL_HIT` bit on the
    /// site at `address`, if one exists, and returns a copy of it.
    pub fn hit_by_address(&mut self, address: Address) -> Option<Site>
    {
        if !address.valid() {
            return None;
        }
        let site = self.sites.get_mut(address)?;
        site.kind.remove(Type::TEMPORARY_UNTIL_HIT);
        Some(site.clone())
    }

    /// Erase both the registry and all backend bookkeeping without touching
    /// the target. Only used when the traced process is being torn down.
    pub fn clear(&mut self)
    {
        self.backend.clear();
        self.enabled = false;
        self.sites = SiteRegistry::new();
    }
}
