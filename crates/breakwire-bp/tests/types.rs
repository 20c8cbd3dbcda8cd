//! Unit coverage for the small value types: [`Address`], [`Mode`], [`Type`],
//! [`Size`].

use breakwire_bp::{Address, Mode, Size, Type};

#[test]
fn test_null_is_invalid()
{
    assert!(!Address::NULL.valid());
}

#[test]
fn test_nonzero_is_valid()
{
    assert!(Address::new(1).valid());
}

#[test]
fn test_display_is_lowercase_hex_padded()
{
    assert_eq!(format!("{}", Address::new(0xDEAD)), "0x000000000000dead");
}

#[test]
fn test_arithmetic_wraps()
{
    let max = Address::new(u64::MAX);
    assert_eq!(max + 1, Address::NULL);
    assert_eq!(Address::NULL - 1, max);
}

#[test]
fn test_ordering_is_numeric()
{
    assert!(Address::new(1) < Address::new(2));
}

#[test]
fn test_exec_conflicts_with_read_write()
{
    assert!((Mode::EXEC | Mode::READ).conflicts_exec_with_rw());
    assert!((Mode::EXEC | Mode::WRITE).conflicts_exec_with_rw());
    assert!(!(Mode::READ | Mode::WRITE).conflicts_exec_with_rw());
}

#[test]
fn test_type_accumulates_bits()
{
    let mut kind = Type::PERMANENT;
    kind |= Type::TEMPORARY_UNTIL_HIT;
    assert!(kind.contains(Type::PERMANENT));
    assert!(kind.contains(Type::TEMPORARY_UNTIL_HIT));
    assert!(!kind.contains(Type::TEMPORARY_ONE_SHOT));
}

#[test]
fn test_size_round_trips_through_bytes()
{
    for size in [Size::One, Size::Two, Size::Four, Size::Eight] {
        assert_eq!(Size::from_bytes(size.bytes()), Some(size));
    }
    assert_eq!(Size::from_bytes(3), None);
}
