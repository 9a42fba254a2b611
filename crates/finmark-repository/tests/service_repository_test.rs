//! Integration tests for the repository resolved through dependency injection.

use finmark_core::{DurationHours, FinmarkError, Industry, PageRequest, ServiceCategory, ServiceRecord};
use finmark_repository::{InMemoryServiceRepository, ServiceQuery, ServiceRepository};
use shaku::{module, HasComponent};
use std::sync::Arc;

module! {
    RepositoryModule {
        components = [InMemoryServiceRepository],
        providers = []
    }
}

fn repository() -> Arc<dyn ServiceRepository> {
    let module = RepositoryModule::builder().build();
    HasComponent::<dyn ServiceRepository>::resolve(&module)
}

fn record(name: &str) -> ServiceRecord {
    ServiceRecord::new(
        name,
        "Quarterly review",
        ServiceCategory::ConsultingServices,
        Industry::Manufacturing,
        500.0,
        DurationHours::Eight,
        vec!["review".to_string()],
    )
}

#[tokio::test]
async fn test_resolved_repository_starts_empty() {
    let repo = repository();
    let page = repo.find(ServiceQuery::all(), PageRequest::first()).await.unwrap();

    assert!(page.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn test_concurrent_saves_with_same_name_admit_one() {
    let repo = repository();

    let attempts = (0..8).map(|_| {
        let repo = Arc::clone(&repo);
        async move { repo.save(&record("Plant Review")).await }
    });
    let results = futures::future::join_all(attempts).await;

    let saved = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(FinmarkError::Conflict(_))))
        .count();

    assert_eq!(saved, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(repo.count(ServiceQuery::all()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_default_page_size_is_nine() {
    let repo = repository();
    for i in 0..12 {
        repo.save(&record(&format!("Review {i:02}"))).await.unwrap();
    }

    let page = repo.find(ServiceQuery::all(), PageRequest::default()).await.unwrap();
    assert_eq!(page.len(), 9);
    assert_eq!(page.total, 12);
    assert_eq!(page.total_pages, 2);
    assert!(page.has_next());
}
