//! Entity list-then-create resolution.

mod common;

use assert_matches::assert_matches;
use common::{entity, unauthorized, FakeEntities};
use wonderpay_core::{CoreError, OrganizationProfile, PortError, TenantResolver};

#[tokio::test]
async fn first_listed_entity_wins_without_creation() {
    let entities = FakeEntities::with(vec![entity("ent-1"), entity("ent-2")]);
    let resolver = TenantResolver::new(entities.clone(), OrganizationProfile::default());

    assert_eq!(resolver.resolve_tenant("T").await.unwrap(), "ent-1");
    assert_eq!(entities.lists(), 1);
    assert_eq!(entities.creates(), 0);
}

#[tokio::test]
async fn empty_listing_creates_exactly_one_entity() {
    let entities = FakeEntities::empty();
    let resolver = TenantResolver::new(entities.clone(), OrganizationProfile::default());

    assert_eq!(resolver.resolve_tenant("T").await.unwrap(), "created-1");
    assert_eq!(entities.creates(), 1);

    let bodies = entities.created_bodies.lock().unwrap().clone();
    assert_eq!(bodies[0]["type"], "organization");
    assert_eq!(bodies[0]["organization"]["legal_name"], "Wonderland Studio LLC");
    assert_eq!(bodies[0]["email"], "mitch@wonderland.studio");
    assert_eq!(*entities.seen_tokens.lock().unwrap(), vec!["T", "T"]);
}

#[tokio::test]
async fn repeated_resolution_reuses_the_created_entity() {
    let entities = FakeEntities::empty();
    let resolver = TenantResolver::new(entities.clone(), OrganizationProfile::default());

    let first = resolver.resolve_tenant("T").await.unwrap();
    let second = resolver.resolve_tenant("T").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(entities.creates(), 1);
}

#[tokio::test]
async fn custom_profile_is_sent_on_creation() {
    let entities = FakeEntities::empty();
    let profile = OrganizationProfile {
        legal_name: "Looking Glass Ltd".to_string(),
        ..OrganizationProfile::default()
    };
    let resolver = TenantResolver::new(entities.clone(), profile);

    resolver.resolve_tenant("T").await.unwrap();
    let bodies = entities.created_bodies.lock().unwrap().clone();
    assert_eq!(bodies[0]["organization"]["legal_name"], "Looking Glass Ltd");
}

#[tokio::test]
async fn listing_failure_is_a_tenant_error() {
    let entities = FakeEntities::empty();
    entities.fail_listing(unauthorized());
    let resolver = TenantResolver::new(entities.clone(), OrganizationProfile::default());

    let err = resolver.resolve_tenant("T").await.unwrap_err();
    assert_matches!(err, CoreError::Tenant(ref m) if m.contains("401"));
    assert_eq!(entities.creates(), 0);
}

#[tokio::test]
async fn creation_failure_is_a_tenant_error() {
    let entities = FakeEntities::empty();
    entities.fail_creation(PortError::Transport("connection reset".into()));
    let resolver = TenantResolver::new(entities.clone(), OrganizationProfile::default());

    let err = resolver.resolve_tenant("T").await.unwrap_err();
    assert_matches!(err, CoreError::Tenant(ref m) if m.contains("connection reset"));
}
