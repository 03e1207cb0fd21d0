use logistics_site::admin::AdminManager;
use logistics_site::content::sources::LocalSource;
use logistics_site::content::{BackendKind, ContentSources, ResolutionOrigin};
use logistics_site::database::models::{AdminTable, ContentRowInput, SubmissionKind, SubmissionStatus};
use logistics_site::database::Queries;
use logistics_site::error::SiteError;
use logistics_site::sections::{SectionDefinition, SectionKind, SiteContent};
use serde_json::{json, Map, Value};
use std::sync::Arc;

mod common;
use common::*;

fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_save_inserts_without_id_and_updates_with_id() {
    let db = setup_test_db().await;
    let admin = AdminManager::new(db.clone());

    let created = admin
        .save(
            AdminTable::Services,
            &ContentRowInput {
                fields: fields(json!({"title": "Air Freight"})),
                display_order: 2,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(created.created);
    assert!(!created.row.id.is_empty());

    let updated = admin
        .save(
            AdminTable::Services,
            &ContentRowInput {
                id: Some(created.row.id.clone()),
                fields: fields(json!({"title": "Air Express"})),
                display_order: 1,
                visible: true,
            },
        )
        .await
        .unwrap();
    assert!(!updated.created);
    assert_eq!(updated.row.id, created.row.id);
    assert_eq!(updated.row.fields["title"], "Air Express");

    let rows = admin.list(AdminTable::Services).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].display_order, 1);
}

#[tokio::test]
async fn test_update_of_unknown_id_is_not_found() {
    let db = setup_test_db().await;
    let admin = AdminManager::new(db);

    let result = admin
        .save(
            AdminTable::Testimonials,
            &ContentRowInput {
                id: Some("missing".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(SiteError::NotFound(_))));
}

#[tokio::test]
async fn test_list_orders_by_display_order() {
    let db = setup_test_db().await;
    let admin = AdminManager::new(db);

    for (title, order) in [("Third", 3), ("First", 1), ("Second", 2)] {
        admin
            .save(
                AdminTable::TeamMembers,
                &ContentRowInput {
                    fields: fields(json!({ "name": title })),
                    display_order: order,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let names: Vec<String> = admin
        .list(AdminTable::TeamMembers)
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.fields["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let db = setup_test_db().await;
    let admin = AdminManager::new(db.clone());

    let saved = admin
        .save(
            AdminTable::JobListings,
            &ContentRowInput {
                fields: fields(json!({"title": "Warehouse Supervisor"})),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let pending = admin
        .request_delete(AdminTable::JobListings, &saved.row.id)
        .await
        .unwrap();
    assert_eq!(pending.row().fields["title"], "Warehouse Supervisor");

    // Abandoning the pending delete leaves the row in place.
    drop(pending);
    assert!(admin.get(AdminTable::JobListings, &saved.row.id).await.is_ok());

    let pending = admin
        .request_delete(AdminTable::JobListings, &saved.row.id)
        .await
        .unwrap();
    let deleted = pending.confirm().await.unwrap();
    assert_eq!(deleted.id, saved.row.id);

    assert!(matches!(
        admin.get(AdminTable::JobListings, &saved.row.id).await,
        Err(SiteError::NotFound(_))
    ));
    assert!(matches!(
        admin.request_delete(AdminTable::JobListings, &saved.row.id).await,
        Err(SiteError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_deactivated_item_leaves_public_section() {
    let db = setup_test_db().await;
    let admin = AdminManager::new(db.clone());
    let content = SiteContent::new(
        ContentSources::new().with_source(Arc::new(LocalSource::new(db.clone()))),
        vec![SectionDefinition::new(SectionKind::Services, BackendKind::Local, "services")],
    );

    let mut ids = Vec::new();
    for (title, order) in [("Road Freight", 1), ("Sea Freight", 2)] {
        let saved = admin
            .save(
                AdminTable::Services,
                &ContentRowInput {
                    fields: fields(json!({ "title": title })),
                    display_order: order,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        ids.push(saved.row.id);
    }

    let view = content.section(SectionKind::Services).await;
    assert_eq!(view.origin, ResolutionOrigin::Live);
    assert_eq!(view.data.as_array().unwrap().len(), 2);

    admin
        .set_visibility(AdminTable::Services, &ids[1], false)
        .await
        .unwrap();

    let view = content.section(SectionKind::Services).await;
    let titles: Vec<&str> = view
        .data
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Road Freight"]);
    assert_eq!(view.data[0]["is_active"], true);

    // Still stored, just hidden.
    let row = admin.get(AdminTable::Services, &ids[1]).await.unwrap();
    assert!(!row.visible);
}

#[tokio::test]
async fn test_jobs_use_published_flag_locally() {
    let db = setup_test_db().await;
    let admin = AdminManager::new(db.clone());
    let content = SiteContent::new(
        ContentSources::new().with_source(Arc::new(LocalSource::new(db.clone()))),
        vec![],
    );

    admin
        .save(
            AdminTable::JobListings,
            &ContentRowInput {
                fields: fields(json!({"title": "Draft role"})),
                visible: false,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let view = content.section(SectionKind::Jobs).await;
    assert_eq!(view.origin, ResolutionOrigin::Fallback);
}

#[tokio::test]
async fn test_submission_status_updates() {
    let db = setup_test_db().await;
    let admin = AdminManager::new(db.clone());

    let first = Queries::insert_submission(
        db.pool(),
        SubmissionKind::Enquiry,
        &json!({"name": "Lee", "message": "Rates to Penang?"}),
        None,
    )
    .await
    .unwrap();
    Queries::insert_submission(
        db.pool(),
        SubmissionKind::Application,
        &json!({"name": "Sam"}),
        Some("job-1"),
    )
    .await
    .unwrap();

    let all = admin.submissions(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].kind, SubmissionKind::Application);
    assert_eq!(all[0].job_listing_id.as_deref(), Some("job-1"));

    let enquiries = admin.submissions(Some(SubmissionKind::Enquiry)).await.unwrap();
    assert_eq!(enquiries.len(), 1);
    assert_eq!(enquiries[0].status, SubmissionStatus::New);

    let updated = admin
        .update_submission_status(&first.id, SubmissionStatus::Contacted)
        .await
        .unwrap();
    assert_eq!(updated.status, SubmissionStatus::Contacted);

    assert!(matches!(
        admin
            .update_submission_status("nope", SubmissionStatus::Closed)
            .await,
        Err(SiteError::NotFound(_))
    ));
}
