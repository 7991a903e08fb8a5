//! End-to-end flows through the database: decode, check, add, find.

use assertd::{AddOutcome, AssertionType, DatabaseError, Ref};
use assertd_store::{Backstore, SqliteBackstore};
use assertd_testkit::fixtures::{SigningAuthority, TestFixture, ROOT_ACCOUNT};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn pk(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn enterprise_store_needs_its_operator() -> anyhow::Result<()> {
    init_tracing();
    let fixture = TestFixture::new();

    let encoded = fixture.root.enterprise_store("op-id1", "store1", 0).encode();
    let store = assertd::decode(&encoded)?;
    assert_eq!(
        fixture.db.prerequisites(&store),
        vec![Ref::new(AssertionType::Account, ["op-id1"])]
    );

    let err = fixture.db.check(&store).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Prerequisite(_)));
    assert_eq!(
        err.to_string(),
        "enterprise-store assertion for operator-id \"op-id1\" and store \"store1\" \
         does not have a matching account assertion for the operator \"op-id1\""
    );

    let operator = SigningAuthority::new("op-id1", 5);
    fixture.db.add(&fixture.root.account_for(&operator)).await?;
    fixture.db.check(&store).await?;

    // Check does not store.
    assert!(fixture
        .db
        .find(AssertionType::EnterpriseStore, &pk(&["op-id1", "store1"]))
        .await
        .unwrap_err()
        .is_not_found());

    let (added, outcome) = fixture.db.add_bytes(&encoded).await?;
    assert_eq!(outcome, AddOutcome::Inserted);
    let found = fixture
        .db
        .find(AssertionType::EnterpriseStore, &pk(&["op-id1", "store1"]))
        .await?;
    assert_eq!(found, added);
    assert_eq!(
        found.as_enterprise_store().map(|s| s.address().as_str()),
        Some("https://store.example.com/")
    );
    Ok(())
}

#[tokio::test]
async fn revisions_replace_and_never_regress() -> anyhow::Result<()> {
    init_tracing();
    let fixture = TestFixture::new();
    let operator = SigningAuthority::new("op-id1", 5);
    fixture.db.add(&fixture.root.account_for(&operator)).await?;

    let r1 = fixture.root.enterprise_store("op-id1", "store1", 1);
    let r2 = fixture.root.enterprise_store("op-id1", "store1", 2);

    assert_eq!(fixture.db.add(&r1).await?, AddOutcome::Inserted);
    assert_eq!(fixture.db.add(&r1).await?, AddOutcome::Unchanged);
    assert_eq!(
        fixture.db.add(&r2).await?,
        AddOutcome::Replaced {
            previous_revision: 1
        }
    );

    let err = fixture.db.add(&r1).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "revision 1 of enterprise-store assertion for operator-id \"op-id1\" and store \"store1\" \
         is older than the current revision 2"
    );

    let current = fixture
        .db
        .find(AssertionType::EnterpriseStore, &pk(&["op-id1", "store1"]))
        .await?;
    assert_eq!(current.revision(), 2);
    assert_eq!(fixture.db.store().count(Some(AssertionType::EnterpriseStore)).await?, 1);
    Ok(())
}

#[tokio::test]
async fn equal_revision_with_other_content_is_ignored() -> anyhow::Result<()> {
    let fixture = TestFixture::new();
    let operator = SigningAuthority::new("op-id1", 5);
    fixture.db.add(&fixture.root.account_for(&operator)).await?;

    let first = fixture
        .root
        .enterprise_store_at("op-id1", "store1", 4, "https://one.example.com");
    let second = fixture
        .root
        .enterprise_store_at("op-id1", "store1", 4, "https://two.example.com");

    fixture.db.add(&first).await?;
    assert_eq!(fixture.db.add(&second).await?, AddOutcome::Unchanged);

    let current = fixture
        .db
        .find(AssertionType::EnterpriseStore, &pk(&["op-id1", "store1"]))
        .await?;
    assert_eq!(current, first);
    Ok(())
}

#[tokio::test]
async fn trusted_roots_cannot_be_replaced() -> anyhow::Result<()> {
    let fixture = TestFixture::new();
    let root_account = fixture.root.account();

    assert_eq!(fixture.db.add(&root_account).await?, AddOutcome::Unchanged);

    let impostor = fixture.root.sign(
        assertd::AssertionBuilder::new(AssertionType::Account)
            .header("account-id", ROOT_ACCOUNT)
            .header("display-name", "Someone Else")
            .header("validation", "verified")
            .header("timestamp", "2020-01-01T00:00:00Z")
            .revision(9),
    );
    let err = fixture.db.add(&impostor).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Trusted { .. }));
    Ok(())
}

#[tokio::test]
async fn snap_chain_builds_up_in_order() -> anyhow::Result<()> {
    init_tracing();
    let fixture = TestFixture::new();
    let dev = fixture.third_party("dev-1", 7).await;

    let declaration = fixture.root.snap_declaration("snap-id-1", "dev-1");
    let revision = fixture.root.snap_revision("snap-id-1", "dev-1", 0);
    let build = dev.snap_build("snap-id-1");

    // Nothing referencing the snap can be added before its declaration.
    let err = fixture.db.add(&revision).await.unwrap_err();
    assert!(err
        .to_string()
        .ends_with("does not have a matching snap-declaration assertion for the snap \"snap-id-1\""));
    assert!(matches!(
        fixture.db.add(&build).await.unwrap_err(),
        DatabaseError::Prerequisite(_)
    ));

    fixture.db.add(&declaration).await?;
    fixture.db.add(&revision).await?;
    fixture.db.add(&build).await?;

    let builds = fixture
        .db
        .find_many(AssertionType::SnapBuild, &[("snap-id", "snap-id-1")])
        .await?;
    assert_eq!(builds, vec![build]);
    assert!(fixture
        .db
        .find_many(AssertionType::SnapBuild, &[("snap-id", "snap-id-2")])
        .await?
        .is_empty());
    Ok(())
}

#[tokio::test]
async fn sqlite_database_survives_reopen() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("assertions.db");
    let operator = SigningAuthority::new("op-id1", 5);

    {
        let fixture = TestFixture::with_store(SqliteBackstore::open(&path)?);
        fixture.db.add(&fixture.root.account_for(&operator)).await?;
        fixture
            .db
            .add(&fixture.root.enterprise_store("op-id1", "store1", 3))
            .await?;
    }

    let fixture = TestFixture::with_store(SqliteBackstore::open(&path)?);
    let store = fixture
        .db
        .find(AssertionType::EnterpriseStore, &pk(&["op-id1", "store1"]))
        .await?;
    assert_eq!(store.revision(), 3);

    let err = fixture
        .db
        .add(&fixture.root.enterprise_store("op-id1", "store1", 2))
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::RevisionConflict { current: 3, .. }));

    let accounts = fixture.db.find_many(AssertionType::Account, &[]).await?;
    let ids: Vec<&str> = accounts.iter().map(|a| a.primary_key()[0].as_str()).collect();
    assert_eq!(ids, vec!["canonical", "op-id1"]);
    Ok(())
}

#[tokio::test]
async fn concurrent_adds_keep_the_highest_revision() -> anyhow::Result<()> {
    let fixture = std::sync::Arc::new(TestFixture::new());
    let operator = SigningAuthority::new("op-id1", 5);
    fixture.db.add(&fixture.root.account_for(&operator)).await?;

    let mut handles = Vec::new();
    for revision in 0..8u64 {
        let fixture = fixture.clone();
        handles.push(tokio::spawn(async move {
            let a = fixture.root.enterprise_store("op-id1", "store1", revision);
            // Lower revisions may lose the race.
            let _ = fixture.db.add(&a).await;
        }));
    }
    for handle in handles {
        handle.await?;
    }

    let current = fixture
        .db
        .find(AssertionType::EnterpriseStore, &pk(&["op-id1", "store1"]))
        .await?;
    assert_eq!(current.revision(), 7);
    Ok(())
}
