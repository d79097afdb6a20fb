//! Static account directory: which emails may order, and at which tier.

use tapdesk_core::PriceTier;

/// The ordering accounts and their assigned price tiers.
const TIER_BY_EMAIL: &[(&str, PriceTier)] = &[
    ("smallbar@beer.ru", PriceTier::Basic),
    ("bigbar@beer.ru", PriceTier::Level1),
];

/// Canonical form used for every email comparison in the app.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Look up the price tier assigned to an account, if any.
pub fn resolve_tier(email: &str) -> Option<PriceTier> {
    let normalized = normalize_email(email);
    TIER_BY_EMAIL
        .iter()
        .find(|(known, _)| *known == normalized)
        .map(|(_, tier)| *tier)
}

/// Whether this email belongs to a known ordering account.
pub fn is_allowed(email: &str) -> bool {
    resolve_tier(email).is_some()
}
