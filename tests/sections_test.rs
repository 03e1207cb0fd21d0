use logistics_site::content::{BackendKind, ContentSources, ResolutionOrigin, SinglePolicy};
use logistics_site::sections::fallbacks::{fallback_list, fallback_record};
use logistics_site::sections::{SectionDefinition, SectionKind, SiteContent};
use serde_json::{json, Value};
use std::sync::Arc;

mod common;
use common::*;

fn content_with(source: StubSource, definitions: Vec<SectionDefinition>) -> SiteContent {
    SiteContent::new(ContentSources::new().with_source(Arc::new(source)), definitions)
}

fn titles(data: &Value) -> Vec<String> {
    data.as_array()
        .expect("list section data is an array")
        .iter()
        .filter_map(|item| item.get("title").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_empty_list_renders_fallback() {
    let content = content_with(
        StubSource::rows(BackendKind::Strapi, vec![]),
        vec![SectionDefinition::new(SectionKind::Services, BackendKind::Strapi, "services")],
    );

    let view = content.section(SectionKind::Services).await;

    let expected: Vec<Value> = fallback_list(SectionKind::Services)
        .into_iter()
        .map(|r| r.into_value())
        .collect();
    assert_eq!(view.origin, ResolutionOrigin::Fallback);
    assert_eq!(view.data, Value::Array(expected));
    assert_eq!(view.notice, None);
}

#[tokio::test]
async fn test_backend_error_falls_back_for_lists() {
    let content = content_with(
        StubSource::failing(BackendKind::Supabase, "HTTP 503: upstream down"),
        vec![SectionDefinition::new(SectionKind::Testimonials, BackendKind::Supabase, "testimonials")],
    );

    let view = content.section(SectionKind::Testimonials).await;

    assert_eq!(view.origin, ResolutionOrigin::Fallback);
    assert_eq!(
        view.data.as_array().map(Vec::len),
        Some(fallback_list(SectionKind::Testimonials).len())
    );
    assert!(view.notice.unwrap().contains("upstream down"));
}

#[tokio::test]
async fn test_backend_error_shows_notice_for_explicit_error_singles() {
    let content = content_with(
        StubSource::failing(BackendKind::Supabase, "HTTP 500: boom"),
        vec![SectionDefinition::new(SectionKind::Hero, BackendKind::Supabase, "hero_content")],
    );

    let view = content.section(SectionKind::Hero).await;

    assert_eq!(view.origin, ResolutionOrigin::Unavailable);
    assert_eq!(view.data, Value::Null);
    assert!(view.notice.unwrap().starts_with("Unable to load content"));
}

#[tokio::test]
async fn test_empty_single_with_fallback_policy_uses_fallback_record() {
    let content = content_with(
        StubSource::rows(BackendKind::Supabase, vec![]),
        vec![SectionDefinition::new(SectionKind::About, BackendKind::Supabase, "about_content")
            .with_policy(SinglePolicy::Fallback)],
    );

    let view = content.section(SectionKind::About).await;

    assert_eq!(view.origin, ResolutionOrigin::Fallback);
    assert_eq!(view.data, fallback_record(SectionKind::About).into_value());
}

#[tokio::test]
async fn test_live_single_is_merged_over_fallback() {
    let content = content_with(
        StubSource::rows(
            BackendKind::WordPress,
            vec![json!({"id": 7, "title": "Moving Asia Forward", "subtitle": null})],
        ),
        vec![SectionDefinition::new(SectionKind::Hero, BackendKind::WordPress, "pages?slug=home")],
    );

    let view = content.section(SectionKind::Hero).await;
    let fallback = fallback_record(SectionKind::Hero);

    assert_eq!(view.origin, ResolutionOrigin::Live);
    assert_eq!(view.data["title"], "Moving Asia Forward");
    assert_eq!(view.data["subtitle"], fallback.get("subtitle").cloned().unwrap());
    assert_eq!(view.data["cta_label"], fallback.get("cta_label").cloned().unwrap());
}

#[tokio::test]
async fn test_list_is_sorted_and_hidden_items_dropped() {
    let content = content_with(
        StubSource::rows(
            BackendKind::Appwrite,
            vec![
                json!({"id": "c", "title": "Customs", "display_order": 3}),
                json!({"id": "u", "title": "Unsorted"}),
                json!({"id": "a", "title": "Air", "display_order": 1}),
                json!({"id": "h", "title": "Hidden", "display_order": 0, "is_active": false}),
                json!({"id": "r", "title": "Road", "order": 2}),
            ],
        ),
        vec![SectionDefinition::new(SectionKind::Services, BackendKind::Appwrite, "services")],
    );

    let view = content.section(SectionKind::Services).await;

    assert_eq!(view.origin, ResolutionOrigin::Live);
    assert_eq!(titles(&view.data), vec!["Air", "Road", "Customs", "Unsorted"]);
}

#[tokio::test]
async fn test_home_page_sections_are_independent() {
    let sources = ContentSources::new()
        .with_source(Arc::new(StubSource::failing(BackendKind::Supabase, "down")))
        .with_source(Arc::new(StubSource::rows(
            BackendKind::Strapi,
            vec![json!({"id": 1, "title": "Express Courier", "order": 1})],
        )));

    let content = SiteContent::new(
        sources,
        vec![
            SectionDefinition::new(SectionKind::Hero, BackendKind::Supabase, "hero_content"),
            SectionDefinition::new(SectionKind::About, BackendKind::Strapi, "about"),
            SectionDefinition::new(SectionKind::Services, BackendKind::Strapi, "services"),
            SectionDefinition::new(SectionKind::Testimonials, BackendKind::Supabase, "testimonials"),
        ],
    );

    let page = content.home_page().await;

    assert_eq!(page.hero.origin, ResolutionOrigin::Unavailable);
    assert_eq!(page.about.origin, ResolutionOrigin::Live);
    assert_eq!(page.services.origin, ResolutionOrigin::Live);
    assert_eq!(titles(&page.services.data), vec!["Express Courier"]);
    assert_eq!(page.testimonials.origin, ResolutionOrigin::Fallback);
}

#[tokio::test]
async fn test_every_resolution_refetches() {
    let source = Arc::new(StubSource::rows(
        BackendKind::Strapi,
        vec![json!({"id": 1, "title": "Road"})],
    ));
    let content = SiteContent::new(
        ContentSources::new().with_source(source.clone()),
        vec![SectionDefinition::new(SectionKind::Team, BackendKind::Strapi, "team-members")],
    );

    content.section(SectionKind::Team).await;
    content.section(SectionKind::Team).await;

    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_snapshot_reports_error_without_fallback() {
    let content = content_with(
        StubSource::failing(BackendKind::Strapi, "HTTP 404: Not Found"),
        vec![SectionDefinition::new(SectionKind::Jobs, BackendKind::Strapi, "job-listings")],
    );

    let snapshot = content.fetch(SectionKind::Jobs).await.into_snapshot();

    assert!(!snapshot.loading);
    assert!(snapshot.data.is_none());
    assert!(snapshot.error.unwrap().contains("strapi backend error"));
}
