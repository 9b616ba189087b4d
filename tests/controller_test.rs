use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use student_records::clients::RemoteError;
use student_records::config::Config;
use student_records::controller::{
    spawn_students, ControllerHandle, ControllerSnapshot, FormField, ListState, ModalState,
    Notification, NotificationLevel, StudentApi, StudentsController, UiEvent, UsersEvent,
};
use student_records::lifecycle::RecordsSystem;
use student_records::model::{Gender, Student, StudentId, StudentInput, UserRegistration};
use student_records::schema::StudentField;
use tokio::sync::oneshot;

type ListResult = Result<Vec<Student>, RemoteError>;

enum ListAnswer {
    Now(ListResult),
    Later(oneshot::Receiver<ListResult>),
}

/// Scripted [`StudentApi`]: list calls are answered from a queue, mutations succeed.
#[derive(Default)]
struct ScriptedApi {
    lists: Mutex<VecDeque<ListAnswer>>,
    creates: Mutex<Vec<StudentInput>>,
}

impl ScriptedApi {
    fn answer_list(&self, answer: ListAnswer) {
        self.lists.lock().unwrap().push_back(answer);
    }
}

#[async_trait]
impl StudentApi for ScriptedApi {
    async fn list_students(&self) -> ListResult {
        let answer = self.lists.lock().unwrap().pop_front();
        match answer {
            Some(ListAnswer::Now(result)) => result,
            Some(ListAnswer::Later(gate)) => gate.await.expect("gate dropped"),
            None => Err(RemoteError::Transport("no scripted answer".into())),
        }
    }

    async fn create_student(&self, input: StudentInput) -> Result<Student, RemoteError> {
        self.creates.lock().unwrap().push(input);
        Ok(student(99, "New"))
    }

    async fn update_student(
        &self,
        id: StudentId,
        _input: StudentInput,
    ) -> Result<Student, RemoteError> {
        Err(RemoteError::NotFound(format!("Student not found: {id}")))
    }

    async fn delete_student(&self, _id: StudentId) -> Result<(), RemoteError> {
        Ok(())
    }
}

fn student(id: u32, first_name: &str) -> Student {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    Student {
        id: StudentId(id),
        first_name: first_name.into(),
        last_name: "Cruz".into(),
        middle_name: None,
        date_of_birth: Utc.with_ymd_and_hms(2000, 5, 1, 0, 0, 0).unwrap(),
        gender: Gender::Female,
        course: "CS".into(),
        year_level: 2,
        created_at: at,
        updated_at: at,
    }
}

async fn settle(
    handle: &ControllerHandle<StudentsController>,
    predicate: impl FnMut(&ControllerSnapshot) -> bool,
) -> ControllerSnapshot {
    tokio::time::timeout(Duration::from_secs(5), handle.wait_for(predicate))
        .await
        .expect("controller did not settle")
        .expect("controller stopped")
}

fn loaded(snapshot: &ControllerSnapshot) -> bool {
    matches!(snapshot.list, ListState::Loaded(_))
}

async fn fill_form(handle: &ControllerHandle<StudentsController>, year_level: u32) {
    for edit in [
        FormField::FirstName("Ana".into()),
        FormField::LastName("Cruz".into()),
        FormField::DateOfBirth(NaiveDate::from_ymd_opt(2000, 5, 1)),
        FormField::Gender(Some(Gender::Female)),
        FormField::Course("CS".into()),
        FormField::YearLevel(Some(year_level)),
    ] {
        handle.send(UiEvent::EditForm(edit)).await.unwrap();
    }
}

#[tokio::test]
async fn test_stale_fetch_never_overwrites_newer_state() {
    let api = Arc::new(ScriptedApi::default());
    let (slow_tx, slow_rx) = oneshot::channel();
    api.answer_list(ListAnswer::Later(slow_rx));
    api.answer_list(ListAnswer::Now(Ok(vec![student(2, "Ben")])));
    let (handle, task) = spawn_students(api.clone(), 10);

    handle.send(UiEvent::Mount).await.unwrap();
    // Reload only once the first fetch is parked on its gate.
    while api.lists.lock().unwrap().len() > 1 {
        tokio::task::yield_now().await;
    }
    handle.send(UiEvent::Reload).await.unwrap();
    let snapshot = settle(&handle, loaded).await;
    assert_eq!(snapshot.list.records(), &[student(2, "Ben")]);

    // The first fetch resolves late; its result is ignored.
    slow_tx.send(Ok(vec![student(1, "Ana")])).unwrap();
    handle.send(UiEvent::ShowPage(1)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(handle.snapshot().list.records(), &[student(2, "Ben")]);

    drop(handle);
    task.await.unwrap();
}

#[tokio::test]
async fn test_failed_mount_is_reported_not_fatal() {
    let api = Arc::new(ScriptedApi::default());
    api.answer_list(ListAnswer::Now(Err(RemoteError::Transport(
        "request timed out after 5s".into(),
    ))));
    api.answer_list(ListAnswer::Now(Ok(vec![student(1, "Ana")])));
    let (handle, task) = spawn_students(api, 10);

    handle.send(UiEvent::Mount).await.unwrap();
    let snapshot = settle(&handle, |s| matches!(s.list, ListState::Error { .. })).await;
    assert_eq!(
        snapshot.last_notification(),
        Some(&Notification::error("Failed to fetch students"))
    );

    handle.send(UiEvent::Reload).await.unwrap();
    let snapshot = settle(&handle, loaded).await;
    assert_eq!(snapshot.list.records().len(), 1);

    drop(handle);
    task.await.unwrap();
}

#[tokio::test]
async fn test_create_then_refetch_with_scripted_api() {
    let api = Arc::new(ScriptedApi::default());
    api.answer_list(ListAnswer::Now(Ok(vec![])));
    api.answer_list(ListAnswer::Now(Ok(vec![student(99, "New")])));
    let (handle, task) = spawn_students(api.clone(), 10);

    handle.send(UiEvent::Mount).await.unwrap();
    settle(&handle, loaded).await;
    handle.send(UiEvent::Add).await.unwrap();
    fill_form(&handle, 2).await;
    handle.send(UiEvent::Submit).await.unwrap();

    let snapshot = settle(&handle, |s| loaded(s) && !s.list.records().is_empty()).await;
    assert_eq!(snapshot.modal, ModalState::Closed);
    assert_eq!(
        snapshot.last_notification(),
        Some(&Notification::success("Student created successfully"))
    );

    let creates = api.creates.lock().unwrap().clone();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].date_of_birth.as_deref(), Some("2000-05-01T00:00:00Z"));

    drop(handle);
    task.await.unwrap();
}

#[tokio::test]
async fn test_update_of_deleted_record_refreshes() {
    let api = Arc::new(ScriptedApi::default());
    api.answer_list(ListAnswer::Now(Ok(vec![student(1, "Ana")])));
    api.answer_list(ListAnswer::Now(Ok(vec![])));
    let (handle, task) = spawn_students(api, 10);

    handle.send(UiEvent::Mount).await.unwrap();
    settle(&handle, loaded).await;
    handle.send(UiEvent::Edit(student(1, "Ana"))).await.unwrap();
    handle.send(UiEvent::Submit).await.unwrap();

    let snapshot = settle(&handle, |s| loaded(s) && s.list.records().is_empty()).await;
    assert_eq!(snapshot.modal, ModalState::Closed);
    assert_eq!(
        snapshot.last_notification().map(|n| n.level),
        Some(NotificationLevel::Error)
    );

    drop(handle);
    task.await.unwrap();
}

/// The whole stack: controller, client, transport, gateway, actors.
#[tokio::test]
async fn test_management_workflow_against_real_system() {
    let system = RecordsSystem::start(&Config::default()).expect("Failed to start system");
    let (handle, task) = system.students_controller();

    handle.send(UiEvent::Mount).await.unwrap();
    settle(&handle, loaded).await;

    // Server-side validation keeps the modal open.
    handle.send(UiEvent::Add).await.unwrap();
    fill_form(&handle, 0).await;
    handle.send(UiEvent::Submit).await.unwrap();
    let snapshot = settle(&handle, |s| !s.form_errors.is_empty()).await;
    assert_eq!(snapshot.modal, ModalState::OpenForCreate);
    assert_eq!(snapshot.form_errors[0].field, StudentField::YearLevel);
    assert!(snapshot.list.records().is_empty());

    // Fix and create.
    handle
        .send(UiEvent::EditForm(FormField::YearLevel(Some(2))))
        .await
        .unwrap();
    handle.send(UiEvent::Submit).await.unwrap();
    let snapshot = settle(&handle, |s| loaded(s) && s.list.records().len() == 1).await;
    let ana = snapshot.list.records()[0].clone();
    assert_eq!(ana.full_name(), "Ana Cruz");
    assert_eq!(snapshot.modal, ModalState::Closed);

    // Edit the year level.
    handle.send(UiEvent::Edit(ana.clone())).await.unwrap();
    handle
        .send(UiEvent::EditForm(FormField::YearLevel(Some(3))))
        .await
        .unwrap();
    handle.send(UiEvent::Submit).await.unwrap();
    let snapshot = settle(&handle, |s| {
        loaded(s) && s.list.records().first().map(|r| r.year_level) == Some(3)
    })
    .await;
    let updated = &snapshot.list.records()[0];
    assert_eq!(updated.id, ana.id);
    assert_eq!(updated.first_name, "Ana");
    assert_eq!(updated.date_of_birth, ana.date_of_birth);

    // Delete after confirmation.
    handle.send(UiEvent::RequestDelete(ana)).await.unwrap();
    handle.send(UiEvent::ConfirmDelete).await.unwrap();
    let snapshot = settle(&handle, |s| loaded(s) && s.list.records().is_empty()).await;
    let messages: Vec<&str> = snapshot
        .notifications
        .iter()
        .map(|n| n.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Student created successfully",
            "Student updated successfully",
            "Student deleted successfully",
        ]
    );

    drop(handle);
    task.await.unwrap();
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_users_list_against_real_system() {
    let system = RecordsSystem::start(&Config::default()).unwrap();
    system
        .seed_users(vec![
            UserRegistration {
                first_name: "Rosa".into(),
                middle_name: None,
                last_name: "Diaz".into(),
                email: "rosa@example.com".into(),
            },
            UserRegistration {
                first_name: "Amy".into(),
                middle_name: Some("J".into()),
                last_name: "Santiago".into(),
                email: "amy@example.com".into(),
            },
        ])
        .await
        .unwrap();
    let (handle, task) = system.users_controller();

    handle.send(UsersEvent::Mount).await.unwrap();
    let snapshot = tokio::time::timeout(
        Duration::from_secs(5),
        handle.wait_for(|s| matches!(s.list, ListState::Loaded(_))),
    )
    .await
    .unwrap()
    .unwrap();

    let names: Vec<String> = snapshot.visible_rows().iter().map(|u| u.full_name()).collect();
    assert_eq!(names, vec!["Rosa Diaz", "Amy J Santiago"]);

    drop(handle);
    task.await.unwrap();
    system.shutdown().await.unwrap();
}
