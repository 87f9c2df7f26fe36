use std::error::Error;

use ripple_core::{RippleError, TransactionFailed};

#[test]
fn closed_displays_reason() {
    assert_eq!(
        RippleError::Closed.to_string(),
        "processor is already closed"
    );
}

#[test]
fn delivery_preserves_source() {
    let error = RippleError::delivery(std::io::Error::other("disk gone"));

    assert!(error.to_string().contains("disk gone"));
    assert!(error.source().is_some());
}

#[test]
fn transaction_failed_displays_cause_when_present() {
    let bare = TransactionFailed::new();
    assert_eq!(bare.to_string(), "transaction failed");

    let caused = TransactionFailed::with_cause(std::io::Error::other("validator said no"));
    assert!(caused.to_string().contains("validator said no"));
    assert!(caused.source().is_some());
}

#[test]
fn transaction_failed_converts_to_ripple_error() {
    let wrapped: RippleError = TransactionFailed::new().into();
    assert!(matches!(wrapped, RippleError::Transaction(_)));
}
