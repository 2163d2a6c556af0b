use floorplan_core::{ErrorKind, LibraryConfig};
use floorplan_ops::LibraryService;
use floorplan_registry::Library;
use std::fs;
use tempfile::TempDir;

fn spawn_service(temp: &TempDir) -> floorplan_ops::LibraryHandle {
    let library = Library::open(LibraryConfig::new(temp.path().join("root"))).unwrap();
    LibraryService::spawn(library)
}

#[tokio::test]
async fn test_service_scenario() {
    let temp = TempDir::new().unwrap();
    let handle = spawn_service(&temp);

    let tower = handle.create_building("Tower A").await.unwrap();
    let source = temp.path().join("plan.pdf");
    fs::write(&source, b"%PDF").unwrap();

    let doc = handle.import_document(tower.id, &source).await.unwrap();
    assert_eq!(doc.display_name, "plan");

    let renamed = handle.rename_document(doc.id, "Level1").await.unwrap();
    assert_eq!(renamed.id, doc.id);
    assert!(tower.location.join("Level1.pdf").is_file());

    let found = handle.document_by_name(tower.id, "Level1").await.unwrap();
    assert_eq!(found.map(|d| d.id), Some(doc.id));

    handle.delete_building(tower.id).await.unwrap();
    assert!(handle.list_buildings().await.unwrap().is_empty());
    assert!(!tower.location.exists());
}

#[tokio::test]
async fn test_concurrent_creates_are_serialized() {
    let temp = TempDir::new().unwrap();
    let handle = spawn_service(&temp);

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            handle.create_building("Shared").await
        }));
    }

    let mut succeeded = 0;
    let mut collisions = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(e) => {
                assert_eq!(e.kind(), ErrorKind::NameCollision);
                collisions += 1;
            }
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(collisions, 7);
    assert_eq!(handle.list_buildings().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_results_stay_sorted() {
    let temp = TempDir::new().unwrap();
    let handle = spawn_service(&temp);

    for name in ["Cedar", "Aspen", "Birch"] {
        handle.create_building(name).await.unwrap();
    }

    let names: Vec<_> = handle
        .list_buildings()
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.name.to_string())
        .collect();
    assert_eq!(names, ["Aspen", "Birch", "Cedar"]);
}

#[tokio::test]
async fn test_failures_are_reported_not_fatal() {
    let temp = TempDir::new().unwrap();
    let handle = spawn_service(&temp);

    let tower = handle.create_building("Tower").await.unwrap();
    let err = handle
        .import_document(tower.id, temp.path().join("missing.pdf"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoFailure);

    // The service keeps running after a failure
    assert!(handle.building_by_name("Tower").await.unwrap().is_some());
    handle.reload().await.unwrap();
}
