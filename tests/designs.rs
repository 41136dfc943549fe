mod support;

use schemashare::db;
use schemashare::services::{is_share_token, SHARE_TOKEN_LEN};
use serde_json::json;

use support::{count_rows, create_design, test_db};

#[tokio::test]
async fn created_design_gets_a_share_token() {
    let t = test_db().await;
    let design = db::create_design(&t.pool, "Shop ERD", Some("orders"), true, Some("alice"))
        .await
        .unwrap();

    assert_eq!(design.share_token.len(), SHARE_TOKEN_LEN);
    assert!(is_share_token(&design.share_token));
    assert!(design.is_public);
    assert_eq!(design.description.as_deref(), Some("orders"));

    let by_token = db::get_design_by_share_token(&t.pool, &design.share_token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_token.id, design.id);

    let other = create_design(&t.pool, "Other").await;
    assert_ne!(other.share_token, design.share_token);
}

#[tokio::test]
async fn rename_keeps_identity_and_share_token() {
    let t = test_db().await;
    let design = create_design(&t.pool, "Before").await;

    let renamed = db::rename_design(&t.pool, &design.id, "After")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(renamed.id, design.id);
    assert_eq!(renamed.name, "After");
    assert_eq!(renamed.share_token, design.share_token);
    assert_eq!(renamed.created_at, design.created_at);

    assert!(db::rename_design(&t.pool, "missing", "x").await.unwrap().is_none());
}

#[tokio::test]
async fn update_leaves_absent_fields_alone() {
    let t = test_db().await;
    let design = db::create_design(&t.pool, "Name", Some("desc"), false, None)
        .await
        .unwrap();

    let updated = db::update_design(&t.pool, &design.id, None, Some("new desc"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "Name");
    assert_eq!(updated.description.as_deref(), Some("new desc"));
}

#[tokio::test]
async fn delete_removes_everything_owned_by_the_design() {
    let t = test_db().await;
    let design = create_design(&t.pool, "doomed").await;
    let keeper = create_design(&t.pool, "keeper").await;

    for d in [&design, &keeper] {
        db::save_snapshot(&t.pool, &d.id, &json!({ "tables": [] }), None)
            .await
            .unwrap();
        db::create_version(&t.pool, &d.id, &json!({}), None, None, None)
            .await
            .unwrap();
        db::create_version(&t.pool, &d.id, &json!({}), None, None, None)
            .await
            .unwrap();
        assert!(db::acquire_lock(&t.pool, &d.id, "owner", None).await.unwrap());
    }

    assert!(db::delete_design(&t.pool, &design.id).await.unwrap());

    assert!(db::get_design(&t.pool, &design.id).await.unwrap().is_none());
    for table in ["design_snapshots", "design_versions", "design_locks"] {
        assert_eq!(count_rows(&t.pool, table, &design.id).await, 0, "{table}");
    }
    assert!(db::get_design_by_share_token(&t.pool, &design.share_token)
        .await
        .unwrap()
        .is_none());

    // 다른 설계는 영향을 받지 않습니다.
    assert_eq!(count_rows(&t.pool, "design_versions", &keeper.id).await, 2);
    assert_eq!(count_rows(&t.pool, "design_snapshots", &keeper.id).await, 1);
    assert_eq!(count_rows(&t.pool, "design_locks", &keeper.id).await, 1);

    assert!(!db::delete_design(&t.pool, &design.id).await.unwrap());
}

#[tokio::test]
async fn list_filters_by_search_and_reports_snapshot_summary() {
    let t = test_db().await;
    let shop = db::create_design(&t.pool, "Shop ERD", None, false, None)
        .await
        .unwrap();
    db::create_design(&t.pool, "Blog", Some("posts and comments"), false, None)
        .await
        .unwrap();
    db::create_design(&t.pool, "100%_done", None, false, None)
        .await
        .unwrap();

    db::save_snapshot(
        &t.pool,
        &shop.id,
        &json!({ "database": "postgresql", "tables": [{ "name": "orders" }, { "name": "items" }] }),
        None,
    )
    .await
    .unwrap();

    let (all, total) = db::list_designs(&t.pool, None, 10, 0).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(all.len(), 3);

    let (found, total) = db::list_designs(&t.pool, Some("erd"), 10, 0).await.unwrap();
    assert_eq!(total, 1);
    let summary = &found[0];
    assert_eq!(summary.id, shop.id);
    assert_eq!(summary.database.as_deref(), Some("postgresql"));
    assert_eq!(summary.table_count, Some(2));
    assert!(summary.last_modified.is_some());

    let (found, _) = db::list_designs(&t.pool, Some("comments"), 10, 0).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Blog");
    assert!(found[0].last_modified.is_none());
    assert!(found[0].table_count.is_none());

    // 와일드카드 문자는 글자 그대로 찾습니다.
    let (found, total) = db::list_designs(&t.pool, Some("%_"), 10, 0).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(found[0].name, "100%_done");
}

#[tokio::test]
async fn list_pages_without_overlap() {
    let t = test_db().await;
    for i in 0..5 {
        create_design(&t.pool, &format!("design {i}")).await;
    }

    let (first, total) = db::list_designs(&t.pool, None, 2, 0).await.unwrap();
    let (second, _) = db::list_designs(&t.pool, None, 2, 2).await.unwrap();
    let (third, _) = db::list_designs(&t.pool, None, 2, 4).await.unwrap();

    assert_eq!(total, 5);
    assert_eq!((first.len(), second.len(), third.len()), (2, 2, 1));

    let mut ids: Vec<_> = first
        .iter()
        .chain(&second)
        .chain(&third)
        .map(|d| d.id.clone())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}
