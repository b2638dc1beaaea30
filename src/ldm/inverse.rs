//! Link types and their inverses

use indexmap::IndexMap;
use std::sync::LazyLock;

const CORE: &str = "http://open-services.net/ns/core#";
const RM: &str = "http://open-services.net/ns/rm#";
const QM: &str = "http://open-services.net/ns/qm#";
const CM: &str = "http://open-services.net/ns/cm#";
const RM_NAV: &str = "http://jazz.net/ns/rm/navigation#";

/// (namespace, local name) pairs: link type → inverse link type
///
/// Several forward types share one inverse (e.g. the `cm:relatedTest*`
/// family all invert to `qm:relatedChangeRequest`); a reverse lookup then
/// takes the first entry.
const PAIRS: &[((&str, &str), (&str, &str))] = &[
    ((CORE, "related"), (CORE, "related")),
    ((RM, "constraints"), (RM, "constrainedBy")),
    ((RM, "constrainedBy"), (RM, "constraints")),
    ((RM, "decomposes"), (RM, "decomposedBy")),
    ((RM, "decomposedBy"), (RM, "decomposes")),
    ((RM, "elaborates"), (RM, "elaboratedBy")),
    ((RM, "elaboratedBy"), (RM, "elaborates")),
    ((RM, "satisfies"), (RM, "satisfiedBy")),
    ((RM, "satisfiedBy"), (RM, "satisfies")),
    ((RM, "specifies"), (RM, "specifiedBy")),
    ((RM, "specifiedBy"), (RM, "specifies")),
    ((QM, "validatesRequirement"), (RM, "validatedBy")),
    ((QM, "validatesRequirementCollection"), (RM, "validatedBy")),
    ((CM, "implementsRequirement"), (RM, "implementedBy")),
    ((CM, "tracksRequirement"), (RM, "trackedBy")),
    ((CM, "affectsRequirement"), (RM, "affectedBy")),
    ((RM, "implementedBy"), (CM, "implementsRequirement")),
    ((RM, "trackedBy"), (CM, "tracksRequirement")),
    ((RM, "affectedBy"), (CM, "affectsRequirement")),
    ((CM, "testedByTestCase"), (QM, "testsChangeRequest")),
    ((QM, "testsChangeRequest"), (CM, "testedByTestCase")),
    ((CM, "relatedTestScript"), (QM, "relatedChangeRequest")),
    ((CM, "relatedTestCase"), (QM, "relatedChangeRequest")),
    ((CM, "relatedTestPlan"), (QM, "relatedChangeRequest")),
    ((CM, "relatedTestExecutionRecord"), (QM, "relatedChangeRequest")),
    ((CM, "blocksTestExecutionRecord"), (QM, "blockedByChangeRequest")),
    ((QM, "blockedByChangeRequest"), (CM, "blocksTestExecutionRecord")),
    ((CM, "affectsTestResult"), (QM, "affectedByChangeRequest")),
    ((QM, "affectedByChangeRequest"), (CM, "affectsTestResult")),
    ((CM, "affectedByDefect"), (CM, "affectsPlanItem")),
    ((CM, "affectsPlanItem"), (CM, "affectedByDefect")),
    ((RM_NAV, "parent"), (RM_NAV, "children")),
    ((RM_NAV, "children"), (RM_NAV, "parent")),
];

static INVERSE_LINK_TYPES: LazyLock<IndexMap<String, String>> = LazyLock::new(|| {
    PAIRS
        .iter()
        .map(|((ns, local), (inv_ns, inv_local))| {
            (format!("{}{}", ns, local), format!("{}{}", inv_ns, inv_local))
        })
        .collect()
});

/// The link type → inverse map, in declaration order
pub fn inverse_link_types() -> &'static IndexMap<String, String> {
    &INVERSE_LINK_TYPES
}

/// How an inverse was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InverseLookup {
    /// The link type is a key of the map
    Direct(String),
    /// The link type is a value of exactly one key
    Reverse(String),
    /// The link type is a value of several keys; the first was taken
    Ambiguous { chosen: String, candidates: Vec<String> },
    /// Unknown link type; it stands in for its own inverse
    Identity(String),
}

impl InverseLookup {
    pub fn inverse(&self) -> &str {
        match self {
            InverseLookup::Direct(s)
            | InverseLookup::Reverse(s)
            | InverseLookup::Identity(s)
            | InverseLookup::Ambiguous { chosen: s, .. } => s,
        }
    }
}

/// Inverse of a link type: direct, then reverse (first key wins), then identity
pub fn lookup_inverse(link_type: &str) -> InverseLookup {
    let map = inverse_link_types();
    if let Some(inverse) = map.get(link_type) {
        return InverseLookup::Direct(inverse.clone());
    }

    let mut candidates: Vec<String> = map
        .iter()
        .filter(|(_, inverse)| inverse.as_str() == link_type)
        .map(|(key, _)| key.clone())
        .collect();

    match candidates.len() {
        0 => InverseLookup::Identity(link_type.to_string()),
        1 => InverseLookup::Reverse(candidates.remove(0)),
        _ => InverseLookup::Ambiguous {
            chosen: candidates[0].clone(),
            candidates,
        },
    }
}
