//! Relative symlink target construction.
//!
//! All synthetic symlinks in the namespace point back up through the virtual
//! tree with `../` repetitions, then down into their destination. Targets
//! are pure ASCII (separators, dots and hex ids), so byte truncation is
//! always char-boundary safe.

use crate::store::ObjectId;

/// What a synthetic symlink points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDestination {
    /// a commit directory, reached as `commit/<id>` from the root
    Commit,
    /// a sibling node inside `/inherit`, reached as a bare `<id>`
    InheritSibling,
}

const COMMIT_PREFIX: &str = "commit/";

/// Build a relative target: `depth` repetitions of `../` followed by the
/// destination. Depth 0 with a commit destination yields `commit/<id>`
/// with no leading `../` (the `/HEAD` case).
pub fn build_target(depth: usize, destination: LinkDestination, id: ObjectId) -> String {
    let hex = id.to_string();
    let mut target = String::with_capacity(depth * 3 + COMMIT_PREFIX.len() + hex.len());
    for _ in 0..depth {
        target.push_str("../");
    }
    if destination == LinkDestination::Commit {
        target.push_str(COMMIT_PREFIX);
    }
    target.push_str(&hex);
    target
}

/// Bounded variant for callers with a fixed-size reply buffer: truncates
/// silently at `max_len` bytes and never produces anything longer.
pub fn build_target_bounded(
    depth: usize,
    destination: LinkDestination,
    id: ObjectId,
    max_len: usize,
) -> String {
    let mut target = build_target(depth, destination, id);
    target.truncate(max_len);
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::OID_HEX_LEN;

    fn id() -> ObjectId {
        ObjectId::from_hex(&"a".repeat(OID_HEX_LEN)).unwrap()
    }

    #[test]
    fn test_head_target_has_no_ascent() {
        let target = build_target(0, LinkDestination::Commit, id());
        assert_eq!(target, format!("commit/{}", "a".repeat(OID_HEX_LEN)));
    }

    #[test]
    fn test_ref_target_ascends_per_component() {
        let target = build_target(2, LinkDestination::Commit, id());
        assert_eq!(target, format!("../../commit/{}", "a".repeat(OID_HEX_LEN)));
    }

    #[test]
    fn test_inherit_sibling_has_no_commit_infix() {
        let target = build_target(1, LinkDestination::InheritSibling, id());
        assert_eq!(target, format!("../{}", "a".repeat(OID_HEX_LEN)));
    }

    #[test]
    fn test_capacity_is_exact_for_worst_case() {
        let target = build_target(3, LinkDestination::Commit, id());
        assert_eq!(target.len(), 3 * 3 + "commit/".len() + OID_HEX_LEN);
    }

    #[test]
    fn test_bounded_truncates_silently() {
        let full = build_target(1, LinkDestination::Commit, id());
        let bounded = build_target_bounded(1, LinkDestination::Commit, id(), 9);
        assert_eq!(bounded, &full[..9]);

        let roomy = build_target_bounded(1, LinkDestination::Commit, id(), 4096);
        assert_eq!(roomy, full);
    }
}
