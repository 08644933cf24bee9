use testcluster::{FeatureCode, FeatureFlags, FeatureResolver, NodeVersion};

fn server(major: u32, minor: u32, patch: u32) -> FeatureResolver {
    FeatureResolver::new(
        NodeVersion::new(major, minor, patch, 0),
        FeatureFlags::default(),
    )
}

fn mock(major: u32, minor: u32, patch: u32) -> FeatureResolver {
    FeatureResolver::new(
        NodeVersion::mock(major, minor, patch, 0),
        FeatureFlags::default(),
    )
}

#[test]
fn server_thresholds_flip_exactly_at_the_listed_release() {
    // (features, threshold, a release just below it)
    let table: &[(&[FeatureCode], (u32, u32, u32), (u32, u32, u32))] = &[
        (&[FeatureCode::KeyValue], (1, 8, 0), (1, 7, 9)),
        (&[FeatureCode::View], (2, 0, 0), (1, 9, 9)),
        (&[FeatureCode::Query], (4, 0, 0), (3, 9, 9)),
        (
            &[
                FeatureCode::Subdoc,
                FeatureCode::Xattr,
                FeatureCode::ExpandMacros,
            ],
            (4, 5, 0),
            (4, 4, 9),
        ),
        (
            &[
                FeatureCode::Rbac,
                FeatureCode::Search,
                FeatureCode::SearchIndex,
                FeatureCode::UserManager,
            ],
            (5, 0, 0),
            (4, 9, 9),
        ),
        (
            &[FeatureCode::Analytics, FeatureCode::AnalyticsIndex],
            (6, 0, 0),
            (5, 9, 9),
        ),
        (
            &[
                FeatureCode::Durability,
                FeatureCode::UserGroup,
                FeatureCode::SearchAnalyze,
                FeatureCode::AnalyticsIndexPendingMutations,
            ],
            (6, 5, 0),
            (6, 4, 9),
        ),
        (&[FeatureCode::Collections], (7, 0, 0), (6, 9, 9)),
    ];

    for (features, at, below) in table {
        let at_threshold = server(at.0, at.1, at.2);
        let under = server(below.0, below.1, below.2);
        for feature in features.iter().copied() {
            assert!(
                at_threshold.supports(feature),
                "{feature} should be supported at {:?}",
                at
            );
            assert!(
                !under.supports(feature),
                "{feature} should be unsupported at {:?}",
                below
            );
        }
    }
}

#[test]
fn threshold_ignores_qualifier_and_counts_build() {
    let resolver = FeatureResolver::new(
        "4.0.0-4051-enterprise".parse().unwrap(),
        FeatureFlags::default(),
    );
    assert!(resolver.supports(FeatureCode::Query));
    assert!(!resolver.supports(FeatureCode::Subdoc));
}

#[test]
fn real_servers_are_unaffected_by_mock_only_gaps() {
    let old = server(1, 0, 0);
    for feature in [
        FeatureCode::SubdocMockBug,
        FeatureCode::BucketMgr,
        FeatureCode::GetMeta,
        FeatureCode::Ping,
    ] {
        assert!(old.supports(feature), "{feature}");
    }
}

#[test]
fn adjoin_is_disabled_only_on_the_broken_releases() {
    assert!(!server(5, 5, 1).supports(FeatureCode::Adjoin));
    assert!(!server(5, 5, 2).supports(FeatureCode::Adjoin));
    assert!(!server(5, 5, 3).supports(FeatureCode::Adjoin));
    assert!(server(5, 5, 0).supports(FeatureCode::Adjoin));
    assert!(server(5, 5, 4).supports(FeatureCode::Adjoin));
    assert!(server(6, 0, 0).supports(FeatureCode::Adjoin));

    let with_build = FeatureResolver::new(NodeVersion::new(5, 5, 1, 3511), FeatureFlags::default());
    assert!(with_build.supports(FeatureCode::Adjoin));
}

#[test]
fn view_upsert_defect_marks_only_650() {
    assert!(!server(6, 5, 0).supports(FeatureCode::ViewIndexUpsertBug));
    assert!(server(6, 5, 1).supports(FeatureCode::ViewIndexUpsertBug));
    assert!(server(6, 0, 4).supports(FeatureCode::ViewIndexUpsertBug));
}

#[test]
fn features_without_a_server_rule_are_unsupported() {
    let modern = server(7, 6, 2);
    assert!(!modern.supports(FeatureCode::Replicas));
    assert!(!modern.supports(FeatureCode::All));
    assert!(modern.not_supports(FeatureCode::Replicas));
}

#[test]
fn mock_lacks_exactly_the_documented_services() {
    let resolver = mock(1, 5, 15);
    let missing = [
        FeatureCode::SearchIndex,
        FeatureCode::Analytics,
        FeatureCode::Query,
        FeatureCode::Search,
        FeatureCode::Xattr,
        FeatureCode::Collections,
        FeatureCode::SubdocMockBug,
        FeatureCode::ExpandMacros,
        FeatureCode::Durability,
        FeatureCode::UserGroup,
        FeatureCode::UserManager,
        FeatureCode::AnalyticsIndex,
        FeatureCode::BucketMgr,
        FeatureCode::SearchAnalyze,
        FeatureCode::AnalyticsIndexPendingMutations,
        FeatureCode::GetMeta,
        FeatureCode::Ping,
    ];
    for feature in FeatureCode::KNOWN {
        let expected = !missing.contains(&feature);
        assert_eq!(resolver.supports(feature), expected, "{feature}");
    }
}

#[test]
fn mock_rbac_follows_the_mock_version() {
    assert!(!mock(1, 5, 5).supports(FeatureCode::Rbac));
    assert!(mock(1, 5, 6).supports(FeatureCode::Rbac));
    assert!(mock(1, 5, 15).supports(FeatureCode::Rbac));
}

#[test]
fn mock_ignores_server_thresholds() {
    // 1.5.15 would be far too old for views on a real server.
    assert!(mock(1, 5, 15).supports(FeatureCode::View));
    assert!(mock(1, 5, 15).supports(FeatureCode::Adjoin));
    assert!(!server(1, 5, 15).supports(FeatureCode::View));
}

#[test]
fn documented_examples() {
    assert!(!server(3, 9, 9).supports(FeatureCode::Query));
    assert!(server(4, 0, 0).supports(FeatureCode::Query));
    assert!(!server(5, 5, 1).supports(FeatureCode::Adjoin));
    assert!(server(5, 5, 4).supports(FeatureCode::Adjoin));
}

#[test]
fn token_lookup_treats_unknown_tokens_as_unsupported() {
    let resolver = server(7, 0, 0);
    assert!(resolver.supports_token("collections"));
    assert!(!resolver.supports_token("hyperdrive"));

    let everything_on = FeatureResolver::new(NodeVersion::new(7, 0, 0, 0), "*".parse().unwrap());
    assert!(!everything_on.supports_token("hyperdrive"));
}

#[test]
fn report_covers_every_known_feature() {
    let report = server(6, 5, 0).report();
    assert_eq!(report.len(), FeatureCode::KNOWN.len());
    let query = report
        .iter()
        .find(|d| d.feature == FeatureCode::Query)
        .unwrap();
    assert!(query.supported);
}

#[test]
fn resolution_is_deterministic() {
    let resolver = server(6, 0, 0);
    let first: Vec<bool> = resolver.report().iter().map(|d| d.supported).collect();
    let second: Vec<bool> = resolver.report().iter().map(|d| d.supported).collect();
    assert_eq!(first, second);
}
