//! Unit coverage for [`SoftwareBackend`] trap-byte installation and removal.

mod support;

use breakwire_bp::software::SoftwareBackend;
use breakwire_bp::{Address, Manager, Mode, Size, Type};
use support::{MockProcess, MockThread};

#[test]
fn test_install_patches_trap_and_saves_original()
{
    let mut process = MockProcess::new().with_byte(0x1000, 0x55);
    let mut manager = Manager::new(SoftwareBackend::x86_64());
    let addr = Address::new(0x1000);

    manager.add(&mut process, addr, Type::PERMANENT, Size::One, Mode::EXEC).unwrap();
    manager.enable(&mut process);

    assert_eq!(process.byte_at(0x1000), 0xCC);
}

#[test]
fn test_hit_rewinds_ip_and_identifies_site()
{
    let mut process = MockProcess::new().with_byte(0x1000, 0x55);
    let mut manager = Manager::new(SoftwareBackend::x86_64());
    let addr = Address::new(0x1000);

    manager.add(&mut process, addr, Type::PERMANENT, Size::One, Mode::EXEC).unwrap();
    manager.enable(&mut process);

    let mut thread = MockThread::stopped(1);
    thread.ip = Address::new(0x1001);

    let site = manager.hit_by_thread(&mut thread).unwrap().unwrap();
    assert_eq!(site.address, addr);
    assert_eq!(thread.ip, addr);
}

#[test]
fn test_disable_restores_original_byte()
{
    let mut process = MockProcess::new().with_byte(0x1000, 0x55);
    let mut manager = Manager::new(SoftwareBackend::x86_64());
    let addr = Address::new(0x1000);

    manager.add(&mut process, addr, Type::PERMANENT, Size::One, Mode::EXEC).unwrap();
    manager.enable(&mut process);
    manager.disable(&mut process);

    assert_eq!(process.byte_at(0x1000), 0x55);
}

#[test]
fn test_size_must_match_trap_width()
{
    let mut process = MockProcess::new().with_byte(0x1000, 0x55);
    let mut manager = Manager::new(SoftwareBackend::x86_64());
    let addr = Address::new(0x1000);

    let err = manager
        .add(&mut process, addr, Type::PERMANENT, Size::Four, Mode::EXEC)
        .unwrap_err();
    assert!(matches!(err, breakwire_bp::BreakpointError::InvalidArgument(_)));
}
