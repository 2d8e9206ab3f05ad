//! Postgres-backed implementation of the repository traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use store::{
    NewNote, NewUser, Note, NoteRepository, NoteWithOwner, PasswordHash, StoreError, User,
    UserRepository,
};
use uuid::Uuid;

const NOTE_COLUMNS: &str =
    "n.id, n.branch, n.subject, n.description, n.file, n.upload_date, n.uploaded_by";

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    full_name: String,
    email: String,
    password_hash: String,
    branch: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|e| StoreError::Backend(format!("user {}: {}", row.id, e)))?;
        Ok(User {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            password_hash: PasswordHash::from_phc(row.password_hash),
            branch: row.branch,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct NoteRow {
    id: Uuid,
    branch: String,
    subject: String,
    description: String,
    file: String,
    upload_date: DateTime<Utc>,
    uploaded_by: Uuid,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Note {
            id: row.id,
            branch: row.branch,
            subject: row.subject,
            description: row.description,
            file: row.file,
            upload_date: row.upload_date,
            uploaded_by: row.uploaded_by,
        }
    }
}

#[derive(FromRow)]
struct NoteOwnerRow {
    #[sqlx(flatten)]
    note: NoteRow,
    owner_name: Option<String>,
}

fn backend(err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
            return StoreError::DuplicateEmail;
        }
    }
    tracing::error!("Database error: {}", err);
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let user = user.into_user(Utc::now());
        sqlx::query(
            "INSERT INTO users (id, full_name, email, password_hash, branch, role, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user.id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.password_hash.as_str())
        .bind(&user.branch)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl NoteRepository for PgStore {
    async fn insert_note(&self, note: NewNote) -> Result<Note, StoreError> {
        let note = note.into_note(Utc::now());
        sqlx::query(
            "INSERT INTO notes (id, branch, subject, description, file, upload_date, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(note.id)
        .bind(&note.branch)
        .bind(&note.subject)
        .bind(&note.description)
        .bind(&note.file)
        .bind(note.upload_date)
        .bind(note.uploaded_by)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(note)
    }

    async fn list_notes_by_owner(&self, owner: Uuid) -> Result<Vec<Note>, StoreError> {
        let rows: Vec<NoteRow> = sqlx::query_as(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes n WHERE n.uploaded_by = $1 ORDER BY n.seq"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(Note::from).collect())
    }

    async fn list_notes_with_owner(&self) -> Result<Vec<NoteWithOwner>, StoreError> {
        let rows: Vec<NoteOwnerRow> = sqlx::query_as(&format!(
            "SELECT {NOTE_COLUMNS}, u.full_name AS owner_name
             FROM notes n LEFT JOIN users u ON u.id = n.uploaded_by
             ORDER BY n.seq"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|row| NoteWithOwner {
                note: row.note.into(),
                owner_name: row.owner_name,
            })
            .collect())
    }

    async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        let row: Option<NoteRow> = sqlx::query_as(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes n WHERE n.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        Ok(row.map(Note::from))
    }

    async fn list_note_files(&self) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT file FROM notes")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(|(file,)| file).collect())
    }
}
