use chrono::{TimeZone, Utc};
use std::sync::Arc;
use student_records::clients::RemoteError;
use student_records::config::Config;
use student_records::context::{ManualClock, RecordsContext};
use student_records::lifecycle::RecordsSystem;
use student_records::model::{Gender, StudentId, StudentInput, StudentOrder, UserRegistration};
use student_records::schema::{StudentField, ViolationKind};

fn ana() -> StudentInput {
    StudentInput::default()
        .first_name("Ana")
        .last_name("Cruz")
        .date_of_birth_text("2000-05-01")
        .gender(Gender::Female)
        .course("CS")
        .year_level(2)
}

fn system_with_clock() -> (RecordsSystem, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
    ));
    let system =
        RecordsSystem::start_with_context(&Config::default(), RecordsContext::with_clock(clock.clone()))
            .expect("Failed to start system");
    (system, clock)
}

/// Full end-to-end lifecycle of one record through the gateway.
#[tokio::test]
async fn test_ana_cruz_lifecycle() {
    let (system, clock) = system_with_clock();
    let client = &system.student_client;

    // Create
    let created = client.create(ana()).await.expect("Failed to create student");
    assert_eq!(created.id, StudentId(1));
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(created.first_name, "Ana");

    // Update one field
    clock.advance_seconds(30);
    let updated = client
        .update(created.id, StudentInput::default().year_level(3))
        .await
        .expect("Failed to update student");
    assert_eq!(updated.year_level, 3);
    assert_eq!(updated.first_name, "Ana");
    assert_eq!(updated.course, "CS");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > updated.created_at);

    let listed = client.list_all(StudentOrder::Insertion).await.unwrap();
    assert_eq!(listed, vec![updated.clone()]);

    // Delete
    client.delete(created.id).await.expect("Failed to delete");
    assert!(client.list_all(StudentOrder::Insertion).await.unwrap().is_empty());
    assert_eq!(client.get(created.id).await.unwrap(), None);

    system.shutdown().await.expect("Failed to shutdown");
}

#[tokio::test]
async fn test_create_adds_exactly_one_record() {
    let (system, _clock) = system_with_clock();
    let client = &system.student_client;
    client.create(ana().first_name("Ben")).await.unwrap();

    let before = client.list_all(StudentOrder::Insertion).await.unwrap();
    let created = client.create(ana()).await.unwrap();
    let after = client.list_all(StudentOrder::Insertion).await.unwrap();

    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(after.iter().filter(|s| **s == created).count(), 1);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_year_level_zero_is_rejected() {
    let (system, _clock) = system_with_clock();
    let client = &system.student_client;
    client.create(ana()).await.unwrap();

    let result = client.create(ana().year_level(0)).await;

    let Err(RemoteError::Validation(errors)) = result else {
        panic!("expected a validation error, got {result:?}");
    };
    assert_eq!(
        errors.kind_of(StudentField::YearLevel),
        Some(ViolationKind::OutOfRange)
    );
    assert_eq!(client.list_all(StudentOrder::Insertion).await.unwrap().len(), 1);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_creates_leave_storage_unchanged() {
    let (system, _clock) = system_with_clock();
    let client = &system.student_client;

    for input in [
        StudentInput {
            course: None,
            ..ana()
        },
        ana().gender_text("Unknown"),
        ana().year_level(-1),
        ana().first_name("   "),
    ] {
        let result = client.create(input).await;
        assert!(matches!(result, Err(RemoteError::Validation(_))), "{result:?}");
    }

    assert!(client.list_all(StudentOrder::Insertion).await.unwrap().is_empty());
    // Failed creates do not consume ids.
    assert_eq!(client.create(ana()).await.unwrap().id, StudentId(1));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_update_reflects_only_updated_fields() {
    let (system, _clock) = system_with_clock();
    let client = &system.student_client;
    let created = client.create(ana().middle_name("Reyes")).await.unwrap();

    let updated = client
        .update(
            created.id,
            StudentInput::default().course("Mathematics").middle_name(""),
        )
        .await
        .unwrap();

    assert_eq!(updated.course, "Mathematics");
    assert_eq!(updated.middle_name, None);
    assert_eq!(updated.first_name, created.first_name);
    assert_eq!(updated.last_name, created.last_name);
    assert_eq!(updated.date_of_birth, created.date_of_birth);
    assert_eq!(updated.gender, created.gender);
    assert_eq!(updated.year_level, created.year_level);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_update_leaves_record_untouched() {
    let (system, _clock) = system_with_clock();
    let client = &system.student_client;
    let created = client.create(ana()).await.unwrap();

    let result = client
        .update(created.id, StudentInput::default().year_level(0).course("Law"))
        .await;

    assert!(matches!(result, Err(RemoteError::Validation(_))));
    assert_eq!(client.get(created.id).await.unwrap(), Some(created));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let (system, _clock) = system_with_clock();
    let client = &system.student_client;
    let created = client.create(ana()).await.unwrap();

    client.delete(created.id).await.unwrap();
    assert!(matches!(
        client.delete(created.id).await,
        Err(RemoteError::NotFound(_))
    ));
    assert!(matches!(
        client.update(StudentId(42), ana()).await,
        Err(RemoteError::NotFound(_))
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_repeated_listing_is_stable() {
    let (system, _clock) = system_with_clock();
    let client = &system.student_client;
    for last_name in ["Santos", "Abad", "Lim"] {
        client.create(ana().last_name(last_name)).await.unwrap();
    }

    let first = client.list_all(StudentOrder::Insertion).await.unwrap();
    let second = client.list_all(StudentOrder::Insertion).await.unwrap();
    assert_eq!(first, second);

    let names: Vec<String> = client
        .list_all(StudentOrder::ByLastName)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.last_name)
        .collect();
    assert_eq!(names, vec!["Abad", "Lim", "Santos"]);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_users_are_enumerated() {
    let (system, _clock) = system_with_clock();
    system
        .seed_users(vec![UserRegistration {
            first_name: "Rosa".into(),
            middle_name: Some("  ".into()),
            last_name: "Diaz".into(),
            email: "rosa@example.com".into(),
        }])
        .await
        .expect("Failed to seed users");

    let users = system.user_directory.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id.to_string(), "user_1");
    assert_eq!(users[0].middle_name, None);
    assert_eq!(users[0].created_at, Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_records_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_file: Some(dir.path().join("students.json")),
        ..Config::default()
    };

    let system = RecordsSystem::start(&config).unwrap();
    let first = system.student_client.create(ana()).await.unwrap();
    system.student_client.create(ana().first_name("Ben")).await.unwrap();
    system.student_client.delete(first.id).await.unwrap();
    system.shutdown().await.unwrap();

    let system = RecordsSystem::start(&config).unwrap();
    let listed = system
        .student_client
        .list_all(StudentOrder::Insertion)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].first_name, "Ben");
    let next = system.student_client.create(ana()).await.unwrap();
    assert_eq!(next.id, StudentId(3));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_corrupt_data_file_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.json");
    std::fs::write(&path, "not json").unwrap();
    let config = Config {
        data_file: Some(path),
        ..Config::default()
    };

    assert!(RecordsSystem::start(&config).is_err());
}
