use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{NewNote, NewUser, Note, NoteWithOwner, User};
use crate::repo::{NoteRepository, StoreError, UserRepository};

/// In-memory user and note repository for testing. Notes keep insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    users: Arc<Mutex<Vec<User>>>,
    notes: Arc<Mutex<Vec<Note>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = user.into_user(Utc::now());
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl NoteRepository for MemoryStore {
    async fn insert_note(&self, note: NewNote) -> Result<Note, StoreError> {
        let note = note.into_note(Utc::now());
        self.notes.lock().unwrap().push(note.clone());
        Ok(note)
    }

    async fn list_notes_by_owner(&self, owner: Uuid) -> Result<Vec<Note>, StoreError> {
        let notes = self.notes.lock().unwrap();
        Ok(notes
            .iter()
            .filter(|n| n.uploaded_by == owner)
            .cloned()
            .collect())
    }

    async fn list_notes_with_owner(&self) -> Result<Vec<NoteWithOwner>, StoreError> {
        let notes = self.notes.lock().unwrap().clone();
        let users = self.users.lock().unwrap();
        Ok(notes
            .into_iter()
            .map(|note| {
                let owner_name = users
                    .iter()
                    .find(|u| u.id == note.uploaded_by)
                    .map(|u| u.full_name.clone());
                NoteWithOwner { note, owner_name }
            })
            .collect())
    }

    async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        let notes = self.notes.lock().unwrap();
        Ok(notes.iter().find(|n| n.id == id).cloned())
    }

    async fn list_note_files(&self) -> Result<Vec<String>, StoreError> {
        let notes = self.notes.lock().unwrap();
        Ok(notes.iter().map(|n| n.file.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PasswordHash, Role};

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            full_name: name.to_string(),
            email: email.to_string(),
            password_hash: PasswordHash::from_phc("$argon2id$stub".to_string()),
            branch: "CS".to_string(),
            role: Role::Student,
        }
    }

    fn new_note(owner: Uuid, subject: &str) -> NewNote {
        NewNote {
            branch: "CS".to_string(),
            subject: subject.to_string(),
            description: "lecture notes".to_string(),
            file: format!("uploads/{subject}.pdf"),
            uploaded_by: owner,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.insert_user(new_user("A", "a@x.com")).await.unwrap();

        let err = store.insert_user(new_user("B", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));

        let found = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.full_name, "A");
    }

    #[tokio::test]
    async fn test_list_by_owner_excludes_other_owners() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("Alice", "alice@x.com")).await.unwrap();
        let bob = store.insert_user(new_user("Bob", "bob@x.com")).await.unwrap();

        store.insert_note(new_note(alice.id, "algebra")).await.unwrap();
        store.insert_note(new_note(bob.id, "biology")).await.unwrap();
        store.insert_note(new_note(alice.id, "calculus")).await.unwrap();

        let mine = store.list_notes_by_owner(alice.id).await.unwrap();
        let subjects: Vec<_> = mine.iter().map(|n| n.subject.as_str()).collect();
        assert_eq!(subjects, ["algebra", "calculus"]);
        assert!(mine.iter().all(|n| n.uploaded_by == alice.id));

        assert!(store.list_notes_by_owner(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_with_owner_resolves_names() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("Alice", "alice@x.com")).await.unwrap();
        store.insert_note(new_note(alice.id, "algebra")).await.unwrap();
        store.insert_note(new_note(Uuid::new_v4(), "orphan")).await.unwrap();

        let all = store.list_notes_with_owner().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].owner_name.as_deref(), Some("Alice"));
        assert_eq!(all[1].owner_name, None);

        let files = store.list_note_files().await.unwrap();
        assert_eq!(files, ["uploads/algebra.pdf", "uploads/orphan.pdf"]);
    }
}
