//! Demo: walks the student management workflow end to end through the controller.

use actor_framework::tracing::setup_tracing;
use chrono::NaiveDate;
use clap::Parser;
use student_records::config::{Args, Config};
use student_records::controller::{FormField, ListState, UiEvent, UsersEvent};
use student_records::lifecycle::RecordsSystem;
use student_records::model::{Gender, UserRegistration};
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing once for the entire application
    setup_tracing();

    let args = Args::parse();
    let config = Config::load(&args)?;
    info!(config = %args.config, "Starting student records");

    let system = RecordsSystem::start(&config)?;
    system
        .seed_users(vec![UserRegistration {
            first_name: "Rosa".to_string(),
            middle_name: None,
            last_name: "Diaz".to_string(),
            email: "rosa@example.com".to_string(),
        }])
        .await?;

    let (students, students_task) = system.students_controller();

    let span = tracing::info_span!("student_management");
    async {
        students.send(UiEvent::Mount).await?;
        students
            .wait_for(|s| matches!(s.list, ListState::Loaded(_) | ListState::Error { .. }))
            .await?;

        students.send(UiEvent::Add).await?;
        for edit in [
            FormField::FirstName("Ana".to_string()),
            FormField::LastName("Cruz".to_string()),
            FormField::DateOfBirth(NaiveDate::from_ymd_opt(2000, 5, 1)),
            FormField::Gender(Some(Gender::Female)),
            FormField::Course("Computer Science".to_string()),
            FormField::YearLevel(Some(2)),
        ] {
            students.send(UiEvent::EditForm(edit)).await?;
        }
        students.send(UiEvent::Submit).await?;

        let snapshot = students
            .wait_for(|s| !s.notifications.is_empty() && matches!(s.list, ListState::Loaded(_)))
            .await?;
        for student in snapshot.visible_rows() {
            info!(id = %student.id, name = %student.full_name(), course = %student.course, "Listed");
        }
        if let Some(notification) = snapshot.last_notification() {
            info!(message = %notification.message, "Notification");
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(span)
    .await?;

    let (users, users_task) = system.users_controller();
    users.send(UsersEvent::Mount).await?;
    let snapshot = users
        .wait_for(|s| matches!(s.list, ListState::Loaded(_) | ListState::Error { .. }))
        .await?;
    match &snapshot.list {
        ListState::Loaded(rows) => info!(count = rows.len(), "Users listed"),
        other => warn!(state = ?other, "Users list unavailable"),
    }

    // Controllers hold client clones; stop them before the system.
    drop(students);
    drop(users);
    students_task.await?;
    users_task.await?;

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}
