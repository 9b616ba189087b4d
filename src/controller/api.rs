//! What the controllers need from the remote side, and how their effects are executed.

use super::driver::Perform;
use super::machine::{Completion, Effect, StudentsController};
use super::users::{FetchUsers, UsersController, UsersListed};
use crate::clients::{RemoteError, StudentClient, UserDirectoryClient};
use crate::model::{Student, StudentId, StudentInput, StudentOrder, User};
use async_trait::async_trait;

/// Student operations used by the management page.
#[async_trait]
pub trait StudentApi: Send + Sync + 'static {
    async fn list_students(&self) -> Result<Vec<Student>, RemoteError>;
    async fn create_student(&self, input: StudentInput) -> Result<Student, RemoteError>;
    async fn update_student(
        &self,
        id: StudentId,
        input: StudentInput,
    ) -> Result<Student, RemoteError>;
    async fn delete_student(&self, id: StudentId) -> Result<(), RemoteError>;
}

#[async_trait]
pub trait UserApi: Send + Sync + 'static {
    async fn list_users(&self) -> Result<Vec<User>, RemoteError>;
}

#[async_trait]
impl StudentApi for StudentClient {
    async fn list_students(&self) -> Result<Vec<Student>, RemoteError> {
        self.list_all(StudentOrder::Insertion).await
    }

    async fn create_student(&self, input: StudentInput) -> Result<Student, RemoteError> {
        self.create(input).await
    }

    async fn update_student(
        &self,
        id: StudentId,
        input: StudentInput,
    ) -> Result<Student, RemoteError> {
        self.update(id, input).await
    }

    async fn delete_student(&self, id: StudentId) -> Result<(), RemoteError> {
        self.delete(id).await
    }
}

#[async_trait]
impl UserApi for UserDirectoryClient {
    async fn list_users(&self) -> Result<Vec<User>, RemoteError> {
        UserDirectoryClient::list_users(self).await
    }
}

#[async_trait]
impl<A: StudentApi + ?Sized> Perform<StudentsController> for A {
    async fn perform(&self, effect: Effect) -> Completion {
        match effect {
            Effect::Fetch { ticket } => Completion::Listed {
                ticket,
                result: self.list_students().await,
            },
            Effect::Create { ticket, input } => Completion::Created {
                ticket,
                result: self.create_student(input).await,
            },
            Effect::Update { ticket, id, input } => Completion::Updated {
                ticket,
                result: self.update_student(id, input).await,
            },
            Effect::Delete { ticket, id } => Completion::Deleted {
                ticket,
                result: self.delete_student(id).await,
            },
        }
    }
}

#[async_trait]
impl<A: UserApi + ?Sized> Perform<UsersController> for A {
    async fn perform(&self, effect: FetchUsers) -> UsersListed {
        UsersListed {
            ticket: effect.ticket,
            result: self.list_users().await,
        }
    }
}
