#![allow(dead_code)]

use std::sync::Arc;

use nanolink::application::services::{LinkApi, LinkService};
use nanolink::domain::redirect::RedirectOptions;
use nanolink::infrastructure::persistence::{DiskLinkRepository, InMemoryLinkRepository};
use nanolink::state::AppState;
use tempfile::TempDir;

/// Disk repository rooted in a fresh temp directory. Keep the `TempDir`
/// alive for the duration of the test.
pub async fn create_disk_repo() -> (TempDir, DiskLinkRepository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = DiskLinkRepository::open(dir.path()).await.unwrap();
    (dir, repo)
}

/// Link API over an in-memory store seeded with `links`.
pub async fn create_link_api(links: &[(&str, &str)]) -> Arc<dyn LinkApi> {
    let service = LinkService::new(Arc::new(InMemoryLinkRepository::new()));
    for (id, location) in links {
        service.add_link(id, location).await.unwrap();
    }
    Arc::new(service)
}

pub async fn create_test_state(links: &[(&str, &str)], not_found_template: bool) -> AppState {
    let options = RedirectOptions::builder()
        .not_found_template(not_found_template)
        .build();
    AppState::new(create_link_api(links).await, &options)
}
