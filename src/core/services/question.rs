use crate::core::{
    models::{
        choice::Query as ChoiceQuery,
        common::Pagination,
        poll::{Poll, Query as PollQuery},
        question::{Query, Question, QuestionDetail},
    },
    ports::repository::{ChoiceCommon, PollCommon, QuestionCommon, Store},
};
use crate::error::Error;
use chrono::{DateTime, Utc};

/// Number of questions shown on the index page.
pub const RECENT_LIMIT: i64 = 5;

pub async fn list_recent<S>(storer: &mut S, now: DateTime<Utc>) -> Result<Vec<Question>, Error>
where
    S: Store,
{
    QuestionCommon::query(
        storer,
        &Query {
            pub_date_lte: Some(now),
            ..Default::default()
        },
        Some(Pagination::new(RECENT_LIMIT, None)),
    )
    .await
}

/// Unpublished questions are reported exactly like missing ones.
pub async fn get_visible_question<S>(storer: &mut S, id: i32, now: DateTime<Utc>) -> Result<Question, Error>
where
    S: Store,
{
    let questions = QuestionCommon::query(
        storer,
        &Query {
            id_eq: Some(id),
            ..Default::default()
        },
        Some(Pagination::new(1, None)),
    )
    .await?;
    questions.into_iter().next().filter(|q| q.is_published(now)).ok_or(Error::NotFound)
}

pub async fn get_question_polls<S>(storer: &mut S, question: &Question) -> Result<Vec<Poll>, Error>
where
    S: Store,
{
    PollCommon::query(storer, &PollQuery { question_id_eq: Some(question.id) }).await
}

pub async fn detail_of<S>(storer: &mut S, question: Question) -> Result<QuestionDetail, Error>
where
    S: Store,
{
    let choices = ChoiceCommon::query(storer, &ChoiceQuery { question_id_eq: Some(question.id) }).await?;
    let polls = get_question_polls(storer, &question).await?;
    Ok(QuestionDetail {
        question,
        choices,
        polls,
        error_message: None,
    })
}

pub async fn question_detail<S>(storer: &mut S, id: i32, now: DateTime<Utc>) -> Result<QuestionDetail, Error>
where
    S: Store,
{
    let question = get_visible_question(storer, id, now).await?;
    detail_of(storer, question).await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::ports::repository::Manager;
    use crate::database::memory::MemoryManager;
    use chrono::Duration;

    #[tokio::test]
    async fn test_list_recent_filters_and_orders() {
        let manager = MemoryManager::new();
        let now = Utc::now();
        for days in 1..=7 {
            manager.add_question(&format!("past {}", days), now - Duration::days(days));
        }
        manager.add_question("future", now + Duration::days(1));
        manager.add_question("exactly now", now);
        let mut db = manager.db().await.unwrap();
        let recent = list_recent(&mut db, now).await.unwrap();
        let texts: Vec<&str> = recent.iter().map(|q| q.question_text.as_str()).collect();
        assert_eq!(texts, vec!["exactly now", "past 1", "past 2", "past 3", "past 4"]);
        assert!(recent.iter().all(|q| q.is_published(now)));
    }

    #[tokio::test]
    async fn test_list_recent_empty() {
        let manager = MemoryManager::new();
        manager.add_question("future", Utc::now() + Duration::hours(1));
        let mut db = manager.db().await.unwrap();
        assert!(list_recent(&mut db, Utc::now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unpublished_question_is_not_found() {
        let manager = MemoryManager::new();
        let now = Utc::now();
        let future = manager.add_question("future", now + Duration::days(1));
        let past = manager.add_question("past", now - Duration::days(1));
        let mut db = manager.db().await.unwrap();
        assert!(matches!(get_visible_question(&mut db, future, now).await, Err(Error::NotFound)));
        assert!(matches!(get_visible_question(&mut db, 999, now).await, Err(Error::NotFound)));
        assert_eq!(get_visible_question(&mut db, past, now).await.unwrap().id, past);
        assert!(matches!(question_detail(&mut db, future, now).await, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn test_detail_collects_choices_and_polls() {
        let manager = MemoryManager::new();
        let now = Utc::now();
        let q1 = manager.add_question("q1", now - Duration::days(1));
        let q2 = manager.add_question("q2", now - Duration::days(1));
        let c1 = manager.add_choice(q1, "yes", 0);
        manager.add_choice(q1, "no", 0);
        let c3 = manager.add_choice(q2, "other", 0);
        let uid = manager.add_user("author@example.com", "pw", false);
        let p1 = manager.add_poll(c1, "first", uid);
        manager.add_poll(c3, "elsewhere", uid);
        let mut db = manager.db().await.unwrap();
        let detail = question_detail(&mut db, q1, now).await.unwrap();
        assert_eq!(detail.choices.len(), 2);
        assert!(detail.choices.iter().all(|c| c.question_id == q1));
        assert_eq!(detail.polls.iter().map(|p| p.id).collect::<Vec<_>>(), vec![p1]);
        assert!(detail.error_message.is_none());
    }
}
