//! LocalService against an in-memory database.

use std::sync::Arc;

use tally_core::CreateCategory;
use tally_db::Db;
use tally_service::{CategoryService, LocalService, ServiceError};

fn service() -> Arc<dyn CategoryService> {
    Arc::new(LocalService::new(Db::open_in_memory().unwrap()))
}

fn food() -> CreateCategory {
    CreateCategory {
        name: "Food".into(),
        color: "#FF0000".into(),
        icon: "cutlery".into(),
    }
}

#[tokio::test]
async fn starts_empty() {
    let svc = service();
    assert!(svc.list_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn created_category_shows_up_in_list() {
    let svc = service();
    let created = svc.create_category(&food()).await.unwrap();
    assert_eq!(created.name, "Food");
    assert_eq!(created.color, "#FF0000");
    assert_eq!(created.icon, "cutlery");

    let all = svc.list_categories().await.unwrap();
    assert_eq!(all, vec![created]);
}

#[tokio::test]
async fn duplicate_surfaces_conflict_message() {
    let svc = service();
    svc.create_category(&food()).await.unwrap();
    let err = svc.create_category(&food()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
    assert_eq!(err.message(), Some("a category named 'Food' already exists"));
}

#[tokio::test]
async fn blank_name_is_invalid_input() {
    let svc = service();
    let mut input = food();
    input.name = "   ".into();
    let err = svc.create_category(&input).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert!(svc.list_categories().await.unwrap().is_empty());
}
