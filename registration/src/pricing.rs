//! Pricing resolver.
//!
//! Computes the amount payable for a pass plus an optional set of selected
//! sub-events. Team/sports passes take their price from the first selected
//! event's team price when one is set; everything else charges the pass
//! price as stored.

use crate::types::{Amount, Pass, SubEvent};

/// Resolve the amount payable for `pass` with the given selections.
///
/// Rule: if the pass name carries a team/sports marker and the FIRST
/// selected event has a positive `team_price`, that override wins.
/// Otherwise the pass price passes through unchanged. Multi-event team
/// pricing is never summed or averaged; only the first selection is
/// consulted.
///
/// No currency validation happens here. Negative or non-numeric stored
/// prices pass through uninspected; data hygiene is upstream's job.
#[must_use]
pub fn resolve_amount(pass: &Pass, selected: &[SubEvent]) -> Amount {
    if pass.has_team_pricing() {
        if let Some(event) = selected.first() {
            if let Some(team_price) = event.team_price {
                if team_price > 0 {
                    return Amount::from_units(team_price);
                }
            }
        }
    }

    pass.price.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventId, PassId};

    fn pass(name: &str, price: &str) -> Pass {
        Pass {
            id: PassId::new(),
            name: name.to_string(),
            price: Amount::from_raw(price),
            is_active: true,
            color: "blue".to_string(),
        }
    }

    fn event(team_price: Option<i64>) -> SubEvent {
        SubEvent {
            id: EventId::new(),
            name: "Football".to_string(),
            team_price,
        }
    }

    #[test]
    fn test_plain_price_passes_through() {
        let resolved = resolve_amount(&pass("Standard Pass", "299"), &[]);
        assert_eq!(resolved.as_str(), "299");
    }

    #[test]
    fn test_dual_tier_price_passes_through_untouched() {
        let resolved = resolve_amount(&pass("Elite Pass", "500/1000"), &[]);
        assert_eq!(resolved.as_str(), "500/1000");
    }

    #[test]
    fn test_sports_pass_takes_team_price_from_first_event() {
        let resolved = resolve_amount(
            &pass("Sports Pass", "200"),
            &[event(Some(600)), event(Some(900))],
        );
        assert_eq!(resolved.as_str(), "600");
    }

    #[test]
    fn test_sports_pass_team_price_must_be_positive() {
        let resolved = resolve_amount(&pass("Sports Pass", "200"), &[event(Some(0))]);
        assert_eq!(resolved.as_str(), "200");

        let resolved = resolve_amount(&pass("Sports Pass", "200"), &[event(None)]);
        assert_eq!(resolved.as_str(), "200");
    }

    #[test]
    fn test_only_first_event_is_consulted() {
        // First event has no override; the second one's is ignored.
        let resolved = resolve_amount(
            &pass("Sports Pass", "200"),
            &[event(None), event(Some(750))],
        );
        assert_eq!(resolved.as_str(), "200");
    }

    #[test]
    fn test_non_sports_pass_ignores_team_price() {
        let resolved = resolve_amount(&pass("Cultural Pass", "350"), &[event(Some(750))]);
        assert_eq!(resolved.as_str(), "350");
    }

    #[test]
    fn test_spec_scenario_team_price_750() {
        let resolved = resolve_amount(&pass("Sports Pass", "400"), &[event(Some(750))]);
        assert_eq!(resolved.as_str(), "750");
    }
}
