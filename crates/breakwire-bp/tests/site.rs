//! Unit coverage for [`Site`] construction and the [`SiteRegistry`] merge
//! rules, exercised through [`Manager`] since `Site::new` is crate-private.

mod support;

use breakwire_bp::software::SoftwareBackend;
use breakwire_bp::{Address, Manager, Mode, Size, Type};
use support::MockProcess;

#[test]
fn test_new_permanent_site_starts_with_one_ref()
{
    let mut process = MockProcess::new().with_byte(0x1000, 0x90);
    let mut manager = Manager::new(SoftwareBackend::x86_64());
    let addr = Address::new(0x1000);

    manager.add(&mut process, addr, Type::PERMANENT, Size::One, Mode::EXEC).unwrap();

    assert_eq!(manager.site(addr).unwrap().refs, 1);
}

#[test]
fn test_new_non_exact_permanent_site_starts_unreferenced()
{
    let mut process = MockProcess::new().with_byte(0x1000, 0x90);
    let mut manager = Manager::new(SoftwareBackend::x86_64());
    let addr = Address::new(0x1000);

    manager
        .add(&mut process, addr, Type::PERMANENT | Type::TEMPORARY_ONE_SHOT, Size::One, Mode::EXEC)
        .unwrap();

    assert_eq!(manager.site(addr).unwrap().refs, 0);
}

#[test]
fn test_registry_holds_one_site_per_address()
{
    let mut process = MockProcess::new().with_byte(0x1000, 0x90);
    let mut manager = Manager::new(SoftwareBackend::x86_64());
    let addr = Address::new(0x1000);

    manager
        .add(&mut process, addr, Type::TEMPORARY_ONE_SHOT, Size::One, Mode::EXEC)
        .unwrap();
    manager
        .add(&mut process, addr, Type::TEMPORARY_UNTIL_HIT, Size::One, Mode::EXEC)
        .unwrap();

    let site = manager.site(addr).unwrap();
    assert!(site.kind.contains(Type::TEMPORARY_ONE_SHOT));
    assert!(site.kind.contains(Type::TEMPORARY_UNTIL_HIT));
}
