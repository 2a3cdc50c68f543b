//! Query classification
//!
//! Decides whether a query looks like a wallet address. This is a shape
//! heuristic only and performs no address validation: any 30+ character
//! token without spaces or `?` counts as an address, including long words
//! or transaction hashes.

const MIN_ADDRESS_LEN: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    AddressLike,
    Freeform,
}

impl Classification {
    pub fn is_address(self) -> bool {
        matches!(self, Classification::AddressLike)
    }
}

/// Length is counted in chars, not bytes.
pub fn classify(query: &str) -> Classification {
    if query.chars().count() >= MIN_ADDRESS_LEN && !query.contains(' ') && !query.contains('?') {
        Classification::AddressLike
    } else {
        Classification::Freeform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base58_address_is_address_like() {
        assert_eq!(
            classify("4Nd1mYQzvvGvCbW7wQHcK3n5QkZfTsvZ3xPcY1Rw9aBc"),
            Classification::AddressLike
        );
    }

    #[test]
    fn exactly_thirty_chars_is_address_like() {
        let q = "a".repeat(30);
        assert!(classify(&q).is_address());
        assert!(!classify(&q[..29]).is_address());
    }

    #[test]
    fn spaces_or_question_marks_mean_freeform() {
        let long = "x".repeat(40);
        assert_eq!(classify(&format!("{} y", long)), Classification::Freeform);
        assert_eq!(classify(&format!("{}?", long)), Classification::Freeform);
        assert_eq!(classify("What is BSSC?"), Classification::Freeform);
    }

    #[test]
    fn long_unspaced_phrase_is_misclassified() {
        // Known limitation of the heuristic.
        assert!(classify("whatisthecurrentpriceofbssctoday").is_address());
    }

    #[test]
    fn counts_chars_not_bytes() {
        // 15 two-byte chars: 30 bytes but only 15 chars.
        assert!(!classify(&"é".repeat(15)).is_address());
    }
}
