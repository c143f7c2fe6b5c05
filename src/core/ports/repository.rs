use crate::core::models::{
    choice::{Choice, Query as ChoiceQuery},
    common::Pagination,
    poll::{Insert as PollInsert, Poll, Query as PollQuery, Update as PollUpdate},
    question::{Query as QuestionQuery, Question},
    user::{EmailAddressInsert, Insert as UserInsert, Patch as UserPatch, User},
};
use crate::error::Error;

pub trait QuestionCommon {
    /// Questions matching `query`, most recently published first.
    async fn query(&mut self, query: &QuestionQuery, pagination: Option<Pagination>) -> Result<Vec<Question>, Error>;
}

pub trait ChoiceCommon {
    async fn query(&mut self, query: &ChoiceQuery) -> Result<Vec<Choice>, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Choice>, Error>;
    /// Adds one vote to the choice in a single statement. Returns the new
    /// counter, or `None` when the choice does not belong to the question.
    async fn increase_votes(&mut self, question_id: i32, id: i32) -> Result<Option<i32>, Error>;
}

pub trait PollCommon {
    async fn insert(&mut self, poll: PollInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Poll>, Error>;
    async fn query(&mut self, query: &PollQuery) -> Result<Vec<Poll>, Error>;
    async fn update(&mut self, id: i32, poll: PollUpdate) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
}

pub trait UserCommon {
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<User>, Error>;
    async fn get_by_username_or_email(&mut self, name: &str) -> Result<Option<User>, Error>;
    async fn exists_email(&mut self, email: &str) -> Result<bool, Error>;
    async fn patch(&mut self, id: i32, user: UserPatch) -> Result<(), Error>;
    async fn insert_email_address(&mut self, address: EmailAddressInsert) -> Result<i32, Error>;
}

pub trait Common: QuestionCommon + ChoiceCommon + PollCommon + UserCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

pub trait Manager {
    type Store: Store;
    type TxStore: TxStore;
    async fn db(&self) -> Result<Self::Store, Error>;
    async fn tx(&self) -> Result<Self::TxStore, Error>;
}
