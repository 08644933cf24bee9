use std::collections::BTreeSet;

use mock_cluster::capabilities::{capabilities_path, load_capabilities};
use testcluster::features::mock_supports;
use testcluster::{FeatureCode, NodeVersion};

#[test]
fn documented_mock_downgrades_match_the_catalog() {
    let doc = load_capabilities(&capabilities_path()).expect("parse capabilities yaml");
    let mock_version: NodeVersion = doc.mock_version.parse().expect("mock version");
    let mock_version = mock_version.into_mock();

    let documented = doc.downgraded_features();
    for token in &documented {
        token
            .parse::<FeatureCode>()
            .unwrap_or_else(|_| panic!("downgrade '{token}' is not a known feature"));
    }

    let gated: BTreeSet<String> = doc
        .version_gated
        .iter()
        .map(|g| g.feature.clone())
        .collect();

    // Every feature the catalog withholds from the mock must carry a rationale.
    for feature in FeatureCode::KNOWN {
        let token = feature.as_str().to_string();
        if gated.contains(&token) {
            continue;
        }
        let supported = mock_supports(feature, &mock_version);
        assert_eq!(
            !supported,
            documented.contains(&token),
            "mock support for '{token}' disagrees with capabilities/mock.yaml"
        );
    }
}

#[test]
fn version_gates_hold_at_their_minimum() {
    let doc = load_capabilities(&capabilities_path()).expect("parse capabilities yaml");
    for gate in &doc.version_gated {
        let feature: FeatureCode = gate.feature.parse().expect("known feature");
        let min: NodeVersion = gate.min_mock_version.parse().expect("version");
        let min = min.into_mock();
        assert!(mock_supports(feature, &min), "{feature} at {min}");

        let below = NodeVersion::mock(min.major, min.minor, min.patch.saturating_sub(1), 0);
        assert!(!mock_supports(feature, &below), "{feature} at {below}");
    }
}
