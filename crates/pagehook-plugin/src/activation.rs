//! Per-route plugin activation policy.

use crate::manifest::RouteRules;

/// Literal allow-list entry matching every page.
const WILDCARD: &str = "all";

/// Decides whether a plugin runs on the current page.
///
/// Checked in order, deny before allow:
/// 1. `off` contains the page id → denied, even when `on` is `["all"]`.
/// 2. The first `on` entry is the literal `"all"` → allowed.
/// 3. `on` contains the page id → allowed.
/// 4. Otherwise denied.
///
/// The default is deny: a plugin with empty rules is inert everywhere,
/// and a plugin declaring only `off` rules is never loaded at all.
/// Activation always needs an explicit allow.
pub fn route_allowed(rules: &RouteRules, page_id: &str) -> bool {
    if rules.off.iter().any(|r| r == page_id) {
        return false;
    }

    if rules.on.first().is_some_and(|first| first == WILDCARD) {
        return true;
    }

    rules.on.iter().any(|r| r == page_id)
}
