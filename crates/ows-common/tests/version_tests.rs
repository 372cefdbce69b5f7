//! Tests for VERSION parameter parsing and ordinal encoding.

use ows_common::version::{ProtocolVersion, VersionParseError};

// ============================================================================
// Accepted forms
// ============================================================================

#[test]
fn test_parse_three_components() {
    let v = ProtocolVersion::parse("1.1.0").unwrap();
    assert_eq!((v.major, v.minor, v.patch), (1, 1, 0));
}

#[test]
fn test_parse_multi_digit_components() {
    let v = ProtocolVersion::parse("2.10.11").unwrap();
    assert_eq!(v, ProtocolVersion::new(2, 10, 11));
}

#[test]
fn test_parse_leading_zeros() {
    let v = ProtocolVersion::parse("01.00.00").unwrap();
    assert_eq!(v, ProtocolVersion::new(1, 0, 0));
}

// ============================================================================
// Rejected forms
// ============================================================================

fn assert_invalid(raw: &str) {
    match ProtocolVersion::parse(raw) {
        Err(VersionParseError::InvalidVersionFormat(text)) => assert_eq!(text, raw),
        Ok(v) => panic!("{:?} should not parse, got {}", raw, v),
    }
}

#[test]
fn test_parse_two_components() {
    assert_invalid("1.0");
}

#[test]
fn test_parse_letters() {
    assert_invalid("a.b.c");
    assert_invalid("1.1.x");
}

#[test]
fn test_parse_empty() {
    assert_invalid("");
}

#[test]
fn test_parse_four_components() {
    assert_invalid("1.1.0.0");
}

#[test]
fn test_parse_signed_components() {
    assert_invalid("+1.1.0");
    assert_invalid("1.-1.0");
}

#[test]
fn test_parse_empty_component() {
    assert_invalid("1..00");
    assert_invalid("1.10.");
}

#[test]
fn test_parse_too_short() {
    assert_invalid("1.0.");
    assert_invalid("110");
}

#[test]
fn test_parse_whitespace() {
    assert_invalid(" 1.1.0");
    assert_invalid("1.1.0 ");
}

// ============================================================================
// Ordinal
// ============================================================================

#[test]
fn test_ordinal_families() {
    assert_eq!(ProtocolVersion::new(1, 0, 0).ordinal(), 100);
    assert_eq!(ProtocolVersion::new(1, 1, 0).ordinal(), 110);
    assert_eq!(ProtocolVersion::new(1, 3, 0).ordinal(), 130);
    assert_eq!(ProtocolVersion::new(1, 1, 1).ordinal(), 111);
}

#[test]
fn test_parsed_ordinal() {
    assert_eq!(ProtocolVersion::parse("1.0.0").unwrap().ordinal(), 100);
}

#[test]
fn test_ordinal_of_huge_components() {
    let v = ProtocolVersion::parse("50000000.0.0").unwrap();
    assert_eq!(v.ordinal(), 5_000_000_000);

    // Must not wrap around into the 1.0.0 family
    let v = ProtocolVersion::parse("1073741825.0.0").unwrap();
    assert_ne!(v.ordinal(), 100);

    let max = ProtocolVersion::new(u32::MAX, u32::MAX, u32::MAX);
    assert_eq!(max.ordinal(), u64::from(u32::MAX) * 111);
}
