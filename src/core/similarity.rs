//! Similar-name lookup for error hints.

use crate::constants::SIMILARITY_THRESHOLD_PERCENT;
use strsim::levenshtein;

/// Find the known name closest to `target` by Levenshtein distance.
///
/// Returns `None` when nothing is within [`SIMILARITY_THRESHOLD_PERCENT`] of
/// the target's length. Ties are broken by the candidates' order.
pub fn closest_match<'a, I>(target: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let max_distance = target.chars().count() * SIMILARITY_THRESHOLD_PERCENT / 100;

    candidates
        .into_iter()
        .map(|candidate| (candidate, levenshtein(target, candidate)))
        .filter(|(_, distance)| *distance <= max_distance)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate.to_string())
}
