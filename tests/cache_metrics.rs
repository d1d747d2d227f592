use std::collections::HashSet;
use std::sync::Arc;

use metrics_util::debugging::DebuggingRecorder;
use techmentor::application::categories::CategoryQuery;
use techmentor::application::processor::ProfileChangeProcessor;
use techmentor::application::search::ProfileSearchQuery;
use techmentor::cache::{CacheConfig, CacheManager};
use techmentor::domain::entities::{
    CategoryChange, CategoryLink, Profile, ProfileChangeResult, ProfileFilter,
};
use techmentor::domain::types::{CategoryGroup, ProfileStatus};
use techmentor::infra::events::QueueEventTrigger;
use techmentor::infra::memory::{MemoryCategoryLinkStore, MemoryCategoryStore, MemoryProfileStore};
use uuid::Uuid;

#[tokio::test]
async fn search_and_change_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let cache = Arc::new(CacheManager::new(CacheConfig::default()));
    let profiles = Arc::new(MemoryProfileStore::new());
    let categories = Arc::new(MemoryCategoryStore::new());
    let events = Arc::new(QueueEventTrigger::new());

    let mut profile = Profile::new(Uuid::new_v4(), "Ada", "Lovelace");
    profile.status = ProfileStatus::Available;
    profiles.insert(profile.clone());

    let links = Arc::new(MemoryCategoryLinkStore::with_links([CategoryLink {
        group: CategoryGroup::Skill,
        name: "Rust".to_string(),
        profile_id: profile.id,
    }]));

    let search = ProfileSearchQuery::new(
        cache.clone(),
        profiles.clone(),
        links.clone(),
        CategoryQuery::new(cache.clone(), categories.clone()),
    );
    let filters = [ProfileFilter::new(CategoryGroup::Skill, "Rust")];

    // Cold then warm: misses followed by hits, one link store fallback.
    search.get_profile_results(&filters).await.expect("search");
    search.get_profile_results(&filters).await.expect("search");

    // A new category increments the creation counter and the queue gauge.
    let processor = ProfileChangeProcessor::new(profiles, categories, links, events.clone(), cache);
    processor
        .execute(
            &profile,
            &ProfileChangeResult {
                profile_changed: false,
                category_changes: vec![CategoryChange::add(CategoryGroup::Language, "English")],
            },
        )
        .await
        .expect("execute");
    assert_eq!(events.drain(10).len(), 1);

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "techmentor_cache_hit_total",
        "techmentor_cache_miss_total",
        "techmentor_link_store_fallback_total",
        "techmentor_category_created_total",
        "techmentor_event_queue_len",
        "techmentor_search_ms",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
