//! Ticket identifier generation.
//!
//! Identifiers are short and human-presentable: a category prefix derived
//! from the pass name plus a random 4-digit suffix. There is NO global
//! uniqueness guarantee here; collisions are caught by the store's unique
//! index and retried by intake (see [`crate::service`]).

use crate::types::TicketId;
use rand::Rng;

/// How many identifiers intake will try before failing loudly.
pub const MAX_MINT_ATTEMPTS: u32 = 5;

/// Prefix used for the pre-registration path, regardless of pass category.
pub const PRE_REGISTRATION_PREFIX: &str = "PRE";

/// Ordered substring containment tests mapping pass names to prefixes.
///
/// Order matters: the first matching marker wins.
const PREFIXES: [(&str, &str); 5] = [
    ("standard", "ST"),
    ("elite", "E"),
    ("pro", "P"),
    ("cultural", "C"),
    ("sports", "SP"),
];

/// Fallback prefix for unrecognized pass names.
const DEFAULT_PREFIX: &str = "D";

/// Derive the ticket prefix for a pass name.
#[must_use]
pub fn prefix_for_pass(pass_name: &str) -> &'static str {
    let name = pass_name.to_lowercase();
    for (marker, prefix) in PREFIXES {
        if name.contains(marker) {
            return prefix;
        }
    }
    DEFAULT_PREFIX
}

/// Mint a ticket identifier for a paid registration.
///
/// Format: category prefix + uniformly random 4-digit number
/// (1000-9999 inclusive).
#[must_use]
pub fn mint(pass_name: &str) -> TicketId {
    with_prefix(prefix_for_pass(pass_name))
}

/// Mint a ticket identifier for the pre-registration path (`PRE` prefix).
#[must_use]
pub fn mint_pre_registration() -> TicketId {
    with_prefix(PRE_REGISTRATION_PREFIX)
}

fn with_prefix(prefix: &str) -> TicketId {
    let suffix: u32 = rand::thread_rng().gen_range(1000..=9999);
    TicketId::new(format!("{prefix}{suffix}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn suffix_is_four_digits(id: &TicketId, prefix: &str) -> bool {
        let rest = id.as_str().strip_prefix(prefix).unwrap();
        rest.len() == 4 && rest.chars().all(|c| c.is_ascii_digit()) && !rest.starts_with('0')
    }

    #[test]
    fn test_prefix_mapping() {
        assert_eq!(prefix_for_pass("Standard Pass"), "ST");
        assert_eq!(prefix_for_pass("Elite Pass"), "E");
        assert_eq!(prefix_for_pass("Pro Pass"), "P");
        assert_eq!(prefix_for_pass("Cultural Pass"), "C");
        assert_eq!(prefix_for_pass("Sports Pass"), "SP");
        assert_eq!(prefix_for_pass("Something Else"), "D");
    }

    #[test]
    fn test_prefix_order_is_significant() {
        // "standard" is tested before "pro", so a name containing both
        // resolves to ST.
        assert_eq!(prefix_for_pass("Standard Pro Pass"), "ST");
    }

    #[test]
    fn test_minted_ids_match_expected_shape() {
        for _ in 0..100 {
            let id = mint("Sports Pass");
            assert!(id.as_str().starts_with("SP"));
            assert!(suffix_is_four_digits(&id, "SP"));
        }
    }

    #[test]
    fn test_suffix_range_is_inclusive() {
        // 1000..=9999: every suffix has exactly four digits.
        for _ in 0..500 {
            let id = mint("Elite Pass");
            let suffix: u32 = id.as_str().strip_prefix('E').unwrap().parse().unwrap();
            assert!((1000..=9999).contains(&suffix));
        }
    }

    #[test]
    fn test_pre_registration_prefix() {
        let id = mint_pre_registration();
        assert!(id.as_str().starts_with("PRE"));
        assert!(suffix_is_four_digits(&id, "PRE"));
    }
}
