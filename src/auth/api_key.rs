use subtle::ConstantTimeEq;

/// Expected `Authorization` header value for a shared API key.
pub fn expected_header(api_key: &str) -> String {
    format!("Basic {}", api_key)
}

/// Constant-time comparison of the presented header against the expected one.
///
/// Unequal lengths are rejected without comparing contents; only the length
/// of the secret can leak.
pub fn verify(presented: Option<&[u8]>, expected: &[u8]) -> bool {
    match presented {
        Some(value) => value.ct_eq(expected).into(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_header_accepted() {
        let expected = expected_header("s3cret-key-0123456789");
        assert!(verify(Some(b"Basic s3cret-key-0123456789"), expected.as_bytes()));
    }

    #[test]
    fn test_mismatches_rejected() {
        let expected = expected_header("s3cret-key-0123456789");
        assert!(!verify(None, expected.as_bytes()));
        assert!(!verify(Some(b""), expected.as_bytes()));
        assert!(!verify(Some(b"Basic s3cret-key-012345678X"), expected.as_bytes()));
        assert!(!verify(Some(b"Bearer s3cret-key-0123456789"), expected.as_bytes()));
        assert!(!verify(Some(b"s3cret-key-0123456789"), expected.as_bytes()));
        assert!(!verify(Some(b"Basic s3cret-key-0123456789 "), expected.as_bytes()));
    }
}
