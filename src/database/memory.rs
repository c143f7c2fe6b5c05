use crate::core::models::{
    choice::{Choice, Query as ChoiceQuery},
    common::Pagination,
    poll::{Insert as PollInsert, Poll, Query as PollQuery, Update as PollUpdate},
    question::{Query as QuestionQuery, Question},
    user::{EmailAddress, EmailAddressInsert, Insert as UserInsert, Patch as UserPatch, User},
};
use crate::core::forms::email_taken_error;
use crate::core::password::{hash_password, random_salt};
use crate::core::ports::repository::{ChoiceCommon, Common, Manager, PollCommon, QuestionCommon, Store, TxStore, UserCommon};
use crate::error::Error;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
struct Tables {
    next_id: i32,
    questions: Vec<Question>,
    choices: Vec<Choice>,
    polls: Vec<Poll>,
    users: Vec<User>,
    email_addresses: Vec<EmailAddress>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Store that keeps every table in process memory behind one lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryManager {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn add_question(&self, question_text: &str, pub_date: DateTime<Utc>) -> i32 {
        let mut tables = self.lock();
        let id = tables.next_id();
        tables.questions.push(Question {
            id,
            question_text: question_text.into(),
            pub_date,
        });
        id
    }

    pub fn add_choice(&self, question_id: i32, choice_text: &str, votes: i32) -> i32 {
        let mut tables = self.lock();
        let id = tables.next_id();
        tables.choices.push(Choice {
            id,
            question_id,
            choice_text: choice_text.into(),
            votes,
        });
        id
    }

    pub fn add_poll(&self, choice_id: i32, comment: &str, created_by: i32) -> i32 {
        let mut tables = self.lock();
        let id = tables.next_id();
        tables.polls.push(Poll {
            id,
            choice_id,
            comment: comment.into(),
            created_by,
        });
        id
    }

    pub fn add_user(&self, email: &str, password: &str, is_staff: bool) -> i32 {
        let mut tables = self.lock();
        let id = tables.next_id();
        let salt = random_salt();
        tables.users.push(User {
            id,
            username: email.to_lowercase(),
            email: email.into(),
            password: hash_password(password, &salt),
            salt,
            is_staff,
        });
        id
    }

    pub fn choice(&self, id: i32) -> Option<Choice> {
        self.lock().choices.iter().find(|c| c.id == id).cloned()
    }

    pub fn poll(&self, id: i32) -> Option<Poll> {
        self.lock().polls.iter().find(|p| p.id == id).cloned()
    }

    pub fn polls(&self) -> Vec<Poll> {
        self.lock().polls.clone()
    }

    pub fn user(&self, id: i32) -> Option<User> {
        self.lock().users.iter().find(|u| u.id == id).cloned()
    }

    pub fn email_addresses(&self) -> Vec<EmailAddress> {
        self.lock().email_addresses.clone()
    }
}

pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    snapshot: Option<Tables>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }
}

impl QuestionCommon for MemoryStore {
    async fn query(&mut self, query: &QuestionQuery, pagination: Option<Pagination>) -> Result<Vec<Question>, Error> {
        let mut questions: Vec<Question> = self
            .lock()
            .questions
            .iter()
            .filter(|q| query.id_eq.map_or(true, |id| q.id == id))
            .filter(|q| query.pub_date_lte.map_or(true, |now| q.pub_date <= now))
            .cloned()
            .collect();
        questions.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        if let Some(pagination) = pagination {
            questions = questions
                .into_iter()
                .skip(pagination.offset() as usize)
                .take(pagination.limit() as usize)
                .collect();
        }
        Ok(questions)
    }
}

impl ChoiceCommon for MemoryStore {
    async fn query(&mut self, query: &ChoiceQuery) -> Result<Vec<Choice>, Error> {
        Ok(self
            .lock()
            .choices
            .iter()
            .filter(|c| query.question_id_eq.map_or(true, |id| c.question_id == id))
            .cloned()
            .collect())
    }

    async fn get(&mut self, id: i32) -> Result<Option<Choice>, Error> {
        Ok(self.lock().choices.iter().find(|c| c.id == id).cloned())
    }

    async fn increase_votes(&mut self, question_id: i32, id: i32) -> Result<Option<i32>, Error> {
        let mut tables = self.lock();
        Ok(tables.choices.iter_mut().find(|c| c.id == id && c.question_id == question_id).map(|c| {
            c.votes += 1;
            c.votes
        }))
    }
}

impl PollCommon for MemoryStore {
    async fn insert(&mut self, poll: PollInsert) -> Result<i32, Error> {
        let mut tables = self.lock();
        let id = tables.next_id();
        tables.polls.push(Poll {
            id,
            choice_id: poll.choice_id,
            comment: poll.comment,
            created_by: poll.created_by,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Poll>, Error> {
        Ok(self.lock().polls.iter().find(|p| p.id == id).cloned())
    }

    async fn query(&mut self, query: &PollQuery) -> Result<Vec<Poll>, Error> {
        let tables = self.lock();
        Ok(tables
            .polls
            .iter()
            .filter(|p| {
                query.question_id_eq.map_or(true, |question_id| {
                    tables.choices.iter().any(|c| c.id == p.choice_id && c.question_id == question_id)
                })
            })
            .cloned()
            .collect())
    }

    async fn update(&mut self, id: i32, poll: PollUpdate) -> Result<(), Error> {
        if let Some(p) = self.lock().polls.iter_mut().find(|p| p.id == id) {
            p.choice_id = poll.choice_id;
            p.comment = poll.comment;
        }
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.lock().polls.retain(|p| p.id != id);
        Ok(())
    }
}

impl UserCommon for MemoryStore {
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        let mut tables = self.lock();
        let email = user.email.to_lowercase();
        if tables.users.iter().any(|u| u.username == user.username || u.email.to_lowercase() == email) {
            return Err(email_taken_error());
        }
        let id = tables.next_id();
        tables.users.push(User {
            id,
            username: user.username,
            email: user.email,
            password: user.password,
            salt: user.salt,
            is_staff: false,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<User>, Error> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_username_or_email(&mut self, name: &str) -> Result<Option<User>, Error> {
        let name = name.to_lowercase();
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == name || u.email.to_lowercase() == name)
            .cloned())
    }

    async fn exists_email(&mut self, email: &str) -> Result<bool, Error> {
        let email = email.to_lowercase();
        Ok(self.lock().users.iter().any(|u| u.email.to_lowercase() == email))
    }

    async fn patch(&mut self, id: i32, user: UserPatch) -> Result<(), Error> {
        if let Some(u) = self.lock().users.iter_mut().find(|u| u.id == id) {
            if let Some(password) = user.password {
                u.password = password;
            }
            if let Some(salt) = user.salt {
                u.salt = salt;
            }
        }
        Ok(())
    }

    async fn insert_email_address(&mut self, address: EmailAddressInsert) -> Result<i32, Error> {
        let mut tables = self.lock();
        let id = tables.next_id();
        tables.email_addresses.push(EmailAddress {
            id,
            user_id: address.user_id,
            email: address.email,
            verified: address.verified,
            is_primary: address.is_primary,
        });
        Ok(id)
    }
}

impl Common for MemoryStore {}
impl Store for MemoryStore {}

impl TxStore for MemoryStore {
    async fn commit(self) -> Result<(), Error> {
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        if let Some(snapshot) = self.snapshot {
            *self.tables.lock().unwrap() = snapshot;
        }
        Ok(())
    }
}

impl Manager for MemoryManager {
    type Store = MemoryStore;
    type TxStore = MemoryStore;

    async fn db(&self) -> Result<Self::Store, Error> {
        Ok(MemoryStore {
            tables: self.tables.clone(),
            snapshot: None,
        })
    }

    async fn tx(&self) -> Result<Self::TxStore, Error> {
        Ok(MemoryStore {
            tables: self.tables.clone(),
            snapshot: Some(self.lock().clone()),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_rollback_restores_tables() {
        let manager = MemoryManager::new();
        let q = manager.add_question("q", Utc::now());
        let c = manager.add_choice(q, "c", 0);
        let mut tx = manager.tx().await.unwrap();
        ChoiceCommon::increase_votes(&mut tx, q, c).await.unwrap();
        assert_eq!(manager.choice(c).unwrap().votes, 1);
        tx.rollback().await.unwrap();
        assert_eq!(manager.choice(c).unwrap().votes, 0);
    }

    #[tokio::test]
    async fn test_user_insert_enforces_unique_email() {
        let manager = MemoryManager::new();
        manager.add_user("Hal@example.com", "pw", false);
        let mut db = manager.db().await.unwrap();
        let res = UserCommon::insert(
            &mut db,
            UserInsert {
                username: "hal@example.com".into(),
                email: "HAL@example.com".into(),
                password: "x".into(),
                salt: "y".into(),
            },
        )
        .await;
        assert!(matches!(res, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_increase_votes_requires_matching_question() {
        let manager = MemoryManager::new();
        let q = manager.add_question("q", Utc::now());
        let c = manager.add_choice(q, "c", 2);
        let mut db = manager.db().await.unwrap();
        assert_eq!(ChoiceCommon::increase_votes(&mut db, q + 100, c).await.unwrap(), None);
        assert_eq!(ChoiceCommon::increase_votes(&mut db, q, c).await.unwrap(), Some(3));
    }
}
