use super::common::*;
use crate::service::{NewCheck, ServiceError, UpdateCheck};
use crate::store::layout;

#[test]
fn created_check_starts_at_initial_version_with_working_id() {
    let harness = harness();
    let check = harness
        .checks
        .create_check(&owner(), new_check("below-threshold"))
        .expect("check created");

    assert_eq!(check.id, "W-owner-1-income-below-threshold");
    assert_eq!(check.version, "0.1.0");
    assert!(!check.is_public);
    assert!(harness
        .blobs
        .inner()
        .contains(&layout::check_model_path(&check.id)));

    assert!(matches!(
        harness
            .checks
            .create_check(&owner(), new_check("below-threshold")),
        Err(ServiceError::Conflict(_))
    ));
}

#[test]
fn malformed_initial_version_is_rejected() {
    let harness = harness();
    let request = NewCheck {
        version: Some("1.x".to_string()),
        ..new_check("below-threshold")
    };
    assert!(matches!(
        harness.checks.create_check(&owner(), request),
        Err(ServiceError::MalformedVersion(_))
    ));
}

#[test]
fn publishing_snapshots_then_bumps_patch_version() {
    let harness = harness();
    let owner = owner();
    let working = harness
        .checks
        .create_check(&owner, new_check("below-threshold"))
        .unwrap();

    let first = harness.checks.publish_check(&owner, &working.id).unwrap();
    assert_eq!(first.id, "P-owner-1-income-below-threshold-0.1.0");
    assert!(first.date_published.is_some());
    assert_eq!(first.dmn_model, working.dmn_model);
    assert!(harness
        .blobs
        .inner()
        .contains(&layout::check_model_path(&first.id)));

    let bumped = harness.checks.get_working_check(&owner, &working.id).unwrap();
    assert_eq!(bumped.version, "0.1.1");
    assert_eq!(bumped.dmn_model, working.dmn_model);

    let second = harness.checks.publish_check(&owner, &working.id).unwrap();
    assert_eq!(second.id, "P-owner-1-income-below-threshold-0.1.1");

    let versions: Vec<String> = harness
        .checks
        .published_versions(&owner, &working.id)
        .unwrap()
        .into_iter()
        .map(|check| check.version)
        .collect();
    assert_eq!(versions, vec!["0.1.1", "0.1.0"]);
}

#[test]
fn saturated_patch_version_fails_before_anything_is_published() {
    let harness = harness();
    let owner = owner();
    let request = NewCheck {
        version: Some("1.0.18446744073709551615".to_string()),
        ..new_check("below-threshold")
    };
    let working = harness.checks.create_check(&owner, request).unwrap();

    assert!(matches!(
        harness.checks.publish_check(&owner, &working.id),
        Err(ServiceError::MalformedVersion(_))
    ));
    assert!(harness
        .documents
        .is_empty(layout::PUBLISHED_CUSTOM_CHECKS));
    let unchanged = harness.checks.get_working_check(&owner, &working.id).unwrap();
    assert_eq!(unchanged.version, "1.0.18446744073709551615");
}

#[test]
fn latest_published_checks_follow_archival() {
    let harness = harness();
    let owner = owner();
    let income = harness
        .checks
        .create_check(&owner, new_check("below-threshold"))
        .unwrap();
    let assets = harness
        .checks
        .create_check(&owner, new_check("asset-limit"))
        .unwrap();
    for _ in 0..3 {
        harness.checks.publish_check(&owner, &income.id).unwrap();
    }
    let assets_published = harness.checks.publish_check(&owner, &assets.id).unwrap();

    let latest = harness.checks.latest_published_checks(&owner).unwrap();
    let mut ids: Vec<&str> = latest.iter().map(|check| check.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(
        ids,
        vec![
            "P-owner-1-income-asset-limit-0.1.0",
            "P-owner-1-income-below-threshold-0.1.2",
        ]
    );

    harness.checks.archive_check(&owner, &assets.id).unwrap();
    let latest = harness.checks.latest_published_checks(&owner).unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].name, "below-threshold");

    assert!(matches!(
        harness.checks.get_published_check(&owner, &assets_published.id),
        Err(ServiceError::NotFound { .. })
    ));
    assert!(harness
        .checks
        .list_working_checks(&owner, false)
        .unwrap()
        .iter()
        .all(|check| !check.is_archived));
    assert_eq!(harness.checks.list_working_checks(&owner, true).unwrap().len(), 2);
}

#[test]
fn archived_checks_reject_edits_and_publishing() {
    let harness = harness();
    let owner = owner();
    let check = harness
        .checks
        .create_check(&owner, new_check("below-threshold"))
        .unwrap();
    harness.checks.archive_check(&owner, &check.id).unwrap();

    assert!(matches!(
        harness.checks.publish_check(&owner, &check.id),
        Err(ServiceError::Conflict(_))
    ));
    assert!(matches!(
        harness.checks.update_check(
            &owner,
            &check.id,
            UpdateCheck {
                description: Some("edited".to_string()),
                ..UpdateCheck::default()
            }
        ),
        Err(ServiceError::Conflict(_))
    ));
}

#[test]
fn checks_are_owner_scoped() {
    let harness = harness();
    let check = harness
        .checks
        .create_check(&owner(), new_check("below-threshold"))
        .unwrap();
    let published = harness.checks.publish_check(&owner(), &check.id).unwrap();

    assert!(matches!(
        harness.checks.get_working_check(&stranger(), &check.id),
        Err(ServiceError::Unauthorized { .. })
    ));
    assert!(matches!(
        harness.checks.get_published_check(&stranger(), &published.id),
        Err(ServiceError::NotFound { .. })
    ));
    assert!(harness
        .checks
        .latest_published_checks(&stranger())
        .unwrap()
        .is_empty());
}

#[test]
fn library_lookups_are_public() {
    let harness = harness();
    assert_eq!(harness.checks.library_checks(None).len(), 1);
    assert_eq!(harness.checks.library_checks(Some("age")).len(), 1);
    assert!(harness.checks.library_checks(Some("income")).is_empty());
    assert!(harness.checks.library_check("lib-age-over").unwrap().is_public);
    assert!(matches!(
        harness.checks.library_check("nope"),
        Err(ServiceError::NotFound { .. })
    ));
}
