//! Match resolver: pair a multi-selection with partners in the other tree.
//!
//! Given the selection on one side and the endpoint hovered on the other,
//! every selected endpoint is assigned a distinct compatible partner by a
//! circular scan of the other tree's visible endpoints. The scan for each
//! selected endpoint starts at the hovered endpoint, so partners cluster
//! around the pointer. The result is all-or-nothing: if one selected
//! endpoint finds no unassigned partner, nothing is matched.
//!
//! Cost is O(|selection| · N) compatibility checks for N visible endpoints.

use crate::id::EndpointId;
use crate::model::Endpoint;
use crate::oracle::{CompatibilityOracle, Rating};

/// Outcome of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// One partner per selected endpoint, in selection order, or empty.
    pub partners: Vec<EndpointId>,
    /// Rating of each pair, parallel to `partners`.
    pub ratings: Vec<Rating>,
    /// Minimum of `ratings`; `Impossible` when there are no partners.
    pub worst_rating: Rating,
    /// Why no match exists. Only set when `partners` is empty.
    pub infeasible_reason: Option<String>,
}

impl Default for MatchResult {
    fn default() -> Self {
        Self::infeasible("nothing hovered")
    }
}

impl MatchResult {
    pub fn infeasible(reason: impl Into<String>) -> Self {
        Self {
            partners: Vec::new(),
            ratings: Vec::new(),
            worst_rating: Rating::Impossible,
            infeasible_reason: Some(reason.into()),
        }
    }

    pub fn is_feasible(&self) -> bool {
        !self.partners.is_empty()
    }

    /// `(selected, partner)` pairs given the selection this result was
    /// resolved for.
    pub fn pairs<'a>(
        &'a self,
        selection: &'a [EndpointId],
    ) -> impl Iterator<Item = (EndpointId, EndpointId)> + 'a {
        selection.iter().copied().zip(self.partners.iter().copied())
    }
}

/// Resolve partners for `selection` with `hovered` as the anchor.
///
/// `other_visible` must be the opposite tree's visible endpoints in display
/// order; it determines tie-breaking.
///
/// # Panics
/// If `hovered` passes the feasibility gate but is not in `other_visible`.
pub fn resolve(
    hovered: Option<&Endpoint>,
    selection: &[&Endpoint],
    other_visible: &[&Endpoint],
    oracle: &dyn CompatibilityOracle,
) -> MatchResult {
    let Some(hovered) = hovered else {
        return MatchResult::infeasible("no endpoint under the pointer");
    };
    if !selection.iter().any(|s| oracle.is_compatible(s, hovered)) {
        return MatchResult::infeasible(format!(
            "\"{}\" cannot be connected to the selection",
            hovered.label
        ));
    }

    let start = other_visible
        .iter()
        .position(|c| c.id == hovered.id)
        .unwrap_or_else(|| panic!("hovered endpoint {} is not visible", hovered.id));
    let n = other_visible.len();

    let mut partners: Vec<EndpointId> = Vec::with_capacity(selection.len());
    let mut ratings = Vec::with_capacity(selection.len());

    for selected in selection {
        let found = (0..n)
            .map(|step| other_visible[(start + step) % n])
            .find(|c| !partners.contains(&c.id) && oracle.is_compatible(selected, c));

        match found {
            Some(candidate) => {
                partners.push(candidate.id);
                ratings.push(oracle.rate(selected, candidate));
            }
            None => {
                log::trace!("no partner left for {}", selected.id);
                return MatchResult::infeasible(format!(
                    "no free partner for \"{}\"",
                    selected.label
                ));
            }
        }
    }

    let worst_rating = ratings.iter().copied().min().unwrap_or(Rating::Impossible);
    MatchResult {
        partners,
        ratings,
        worst_rating,
        infeasible_reason: None,
    }
}

/// Every endpoint of `other_visible` that would yield a feasible match if
/// hovered, in display order. Used to highlight drop targets on press.
pub fn reachable(
    selection: &[&Endpoint],
    other_visible: &[&Endpoint],
    oracle: &dyn CompatibilityOracle,
) -> Vec<EndpointId> {
    if selection.is_empty() {
        return Vec::new();
    }
    other_visible
        .iter()
        .filter(|candidate| {
            resolve(Some(**candidate), selection, other_visible, oracle).is_feasible()
        })
        .map(|candidate| candidate.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InterfaceKind;
    use pretty_assertions::assert_eq;

    fn node(uri: &str) -> Endpoint {
        Endpoint::group(uri, InterfaceKind::Generic)
    }

    /// Oracle from an explicit list of compatible URI pairs.
    fn table(
        pairs: &'static [(&'static str, &'static str)],
    ) -> impl Fn(&Endpoint, &Endpoint) -> bool {
        move |a: &Endpoint, b: &Endpoint| {
            pairs.iter().any(|(x, y)| {
                (a.id.as_str() == *x && b.id.as_str() == *y)
                    || (a.id.as_str() == *y && b.id.as_str() == *x)
            })
        }
    }

    #[test]
    fn single_selection_takes_nearest_from_anchor() {
        let a = node("/s/a");
        let (p, q, r) = (node("/o/p"), node("/o/q"), node("/o/r"));
        let visible = [&p, &q, &r];
        let oracle = table(&[("/s/a", "/o/p"), ("/s/a", "/o/r")]);

        // Hovering p itself matches p.
        let m = resolve(Some(&p), &[&a], &visible, &oracle);
        assert_eq!(m.partners, vec![p.id]);

        // Hovering r matches r, not the earlier p.
        let m = resolve(Some(&r), &[&a], &visible, &oracle);
        assert_eq!(m.partners, vec![r.id]);
        assert_eq!(m.worst_rating, Rating::NoConversion);
        assert_eq!(m.infeasible_reason, None);
    }

    #[test]
    fn gate_rejects_hover_incompatible_with_everything() {
        let a = node("/s/a");
        let (p, q) = (node("/o/p"), node("/o/q"));
        let oracle = table(&[("/s/a", "/o/p")]);
        let m = resolve(Some(&q), &[&a], &[&p, &q], &oracle);
        assert!(!m.is_feasible());
        assert!(m.infeasible_reason.is_some());
        assert_eq!(m.worst_rating, Rating::Impossible);
    }

    #[test]
    fn missing_hover_is_infeasible() {
        let a = node("/s/a");
        let oracle = table(&[]);
        let m = resolve(None, &[&a], &[], &oracle);
        assert!(!m.is_feasible());
    }

    #[test]
    #[should_panic(expected = "is not visible")]
    fn hover_outside_visible_list_panics() {
        let a = node("/s/a");
        let p = node("/o/p");
        let hidden = node("/o/hidden");
        let oracle = table(&[("/s/a", "/o/hidden")]);
        resolve(Some(&hidden), &[&a], &[&p], &oracle);
    }

    #[test]
    fn reachable_lists_feasible_hovers_in_display_order() {
        let a = node("/s/a");
        let (p, q, r) = (node("/o/p"), node("/o/q"), node("/o/r"));
        let oracle = table(&[("/s/a", "/o/r"), ("/s/a", "/o/p")]);
        assert_eq!(reachable(&[&a], &[&p, &q, &r], &oracle), vec![p.id, r.id]);
        assert!(reachable(&[], &[&p, &q, &r], &oracle).is_empty());
    }

    #[test]
    fn pairs_zip_selection_and_partners() {
        let a = node("/s/a");
        let p = node("/o/p");
        let oracle = table(&[("/s/a", "/o/p")]);
        let m = resolve(Some(&p), &[&a], &[&p], &oracle);
        let selection = [a.id];
        assert_eq!(m.pairs(&selection).collect::<Vec<_>>(), vec![(a.id, p.id)]);
    }
}
