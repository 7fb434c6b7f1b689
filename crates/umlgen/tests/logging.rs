//! Tests for logging functionality
//!
//! Only one global subscriber can be installed per process, so repeated
//! initialization is allowed to fail but never to panic.

use std::str::FromStr;

use umlgen::core::logging::{init_logging, LogFormat};
use umlgen::{DiagramOptions, TypeDescriptor, TypeRegistry};

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("xml").is_err());
}

#[test]
fn test_log_format_variants() {
    let variants = LogFormat::variants();
    assert!(variants.contains(&"compact"));
    assert!(variants.contains(&"pretty"));
    assert!(variants.contains(&"json"));
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}

#[test]
fn test_build_with_trace_logging() {
    let _ = init_logging(Some("trace"), Some("compact"));

    let registry = TypeRegistry::new().with(TypeDescriptor::class("shop.Car"));
    let text = umlgen::render(&registry, DiagramOptions::new().with_type("shop.Car")).unwrap();
    assert!(text.contains("class \"Car\""));
}
