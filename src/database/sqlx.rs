use crate::core::forms::email_taken_error;
use crate::core::models::{
    choice::{Choice, Query as ChoiceQuery},
    common::Pagination,
    poll::{Insert as PollInsert, Poll, Query as PollQuery, Update as PollUpdate},
    question::{Query as QuestionQuery, Question},
    user::{EmailAddressInsert, Insert as UserInsert, Patch as UserPatch, User},
};
use crate::core::ports::repository::{ChoiceCommon, Common, Manager, PollCommon, QuestionCommon, Store, TxStore, UserCommon};
use crate::error::Error;
use sqlx::pool::PoolConnection;
use sqlx::{query, query_as, query_scalar, Executor, PgPool, Postgres, QueryBuilder, Transaction};

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E> QuestionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn query(&mut self, query: &QuestionQuery, pagination: Option<Pagination>) -> Result<Vec<Question>, Error> {
        let mut stmt = QueryBuilder::new("SELECT id, question_text, pub_date FROM questions WHERE 1 = 1");
        if let Some(id) = query.id_eq {
            stmt.push(" AND id = ").push_bind(id);
        }
        if let Some(now) = query.pub_date_lte {
            stmt.push(" AND pub_date <= ").push_bind(now);
        }
        stmt.push(" ORDER BY pub_date DESC, id DESC");
        if let Some(pagination) = pagination {
            stmt.push(" LIMIT ").push_bind(pagination.limit());
            stmt.push(" OFFSET ").push_bind(pagination.offset());
        }
        let questions = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(questions)
    }
}

impl<E> ChoiceCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn query(&mut self, query: &ChoiceQuery) -> Result<Vec<Choice>, Error> {
        let mut stmt = QueryBuilder::new("SELECT id, question_id, choice_text, votes FROM choices WHERE 1 = 1");
        if let Some(question_id) = query.question_id_eq {
            stmt.push(" AND question_id = ").push_bind(question_id);
        }
        stmt.push(" ORDER BY id");
        let choices = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(choices)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Choice>, Error> {
        let choice = query_as("SELECT id, question_id, choice_text, votes FROM choices WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(choice)
    }

    async fn increase_votes(&mut self, question_id: i32, id: i32) -> Result<Option<i32>, Error> {
        let votes = query_scalar("UPDATE choices SET votes = votes + 1 WHERE id = $1 AND question_id = $2 RETURNING votes")
            .bind(id)
            .bind(question_id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(votes)
    }
}

impl<E> PollCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, poll: PollInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO polls (choice_id, comment, created_by) VALUES ($1, $2, $3) RETURNING id")
            .bind(poll.choice_id)
            .bind(poll.comment)
            .bind(poll.created_by)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Poll>, Error> {
        let poll = query_as("SELECT id, choice_id, comment, created_by FROM polls WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(poll)
    }

    async fn query(&mut self, query: &PollQuery) -> Result<Vec<Poll>, Error> {
        let mut stmt = QueryBuilder::new(
            "
        SELECT p.id, p.choice_id, p.comment, p.created_by
        FROM polls AS p
        JOIN choices AS c ON p.choice_id = c.id
        WHERE 1 = 1",
        );
        if let Some(question_id) = query.question_id_eq {
            stmt.push(" AND c.question_id = ").push_bind(question_id);
        }
        stmt.push(" ORDER BY p.id");
        let polls = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(polls)
    }

    async fn update(&mut self, id: i32, poll: PollUpdate) -> Result<(), Error> {
        query("UPDATE polls SET choice_id = $1, comment = $2 WHERE id = $3")
            .bind(poll.choice_id)
            .bind(poll.comment)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM polls WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }
}

impl<E> UserCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    /// A concurrent registration that got in first surfaces as the same
    /// field error the form reports.
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        let res = query_scalar::<_, i32>("INSERT INTO users (username, email, password, salt) VALUES ($1, $2, $3, $4) RETURNING id")
            .bind(user.username)
            .bind(user.email)
            .bind(user.password)
            .bind(user.salt)
            .fetch_one(&mut self.executor)
            .await;
        match res {
            Ok(id) => Ok(id),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNIQUE_VIOLATION) => Err(email_taken_error()),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&mut self, id: i32) -> Result<Option<User>, Error> {
        let user = query_as("SELECT id, username, email, password, salt, is_staff FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(user)
    }

    async fn get_by_username_or_email(&mut self, name: &str) -> Result<Option<User>, Error> {
        let user = query_as(
            "
        SELECT id, username, email, password, salt, is_staff
        FROM users
        WHERE username = LOWER($1) OR LOWER(email) = LOWER($1)
        ORDER BY id
        LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&mut self.executor)
        .await?;
        Ok(user)
    }

    async fn exists_email(&mut self, email: &str) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT * FROM users WHERE LOWER(email) = LOWER($1))")
            .bind(email)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn patch(&mut self, id: i32, user: UserPatch) -> Result<(), Error> {
        if user.password.is_none() && user.salt.is_none() {
            return Ok(());
        }
        let mut stmt = QueryBuilder::new("UPDATE users SET ");
        let mut sets = stmt.separated(", ");
        if let Some(password) = user.password {
            sets.push("password = ").push_bind_unseparated(password);
        }
        if let Some(salt) = user.salt {
            sets.push("salt = ").push_bind_unseparated(salt);
        }
        stmt.push(" WHERE id = ").push_bind(id);
        stmt.build().execute(&mut self.executor).await?;
        Ok(())
    }

    async fn insert_email_address(&mut self, address: EmailAddressInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO email_addresses (user_id, email, verified, is_primary) VALUES ($1, $2, $3, $4) RETURNING id")
            .bind(address.user_id)
            .bind(address.email)
            .bind(address.verified)
            .bind(address.is_primary)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }
}

pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Common for PgSqlx<Transaction<'a, Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Store for PgSqlx<Transaction<'a, Postgres>> {}

impl<'a> TxStore for PgSqlx<Transaction<'a, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

impl Manager for PgSqlxManager {
    type Store = PgSqlx<PoolConnection<Postgres>>;
    type TxStore = PgSqlx<Transaction<'static, Postgres>>;

    async fn db(&self) -> Result<Self::Store, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }

    async fn tx(&self) -> Result<Self::TxStore, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx::new(tx))
    }
}
