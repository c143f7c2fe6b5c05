use crate::core::{
    forms::PollForm,
    models::{
        choice::Query as ChoiceQuery,
        poll::{Insert, Poll, Submit, Update},
    },
    permissions::{can_delete, can_edit},
    ports::repository::{ChoiceCommon, PollCommon, Store, UserCommon},
    services::question::get_visible_question,
};
use crate::error::Error;
use chrono::{DateTime, Utc};

async fn form_for_question<S>(storer: &mut S, question_id: i32) -> Result<PollForm, Error>
where
    S: Store,
{
    let choices = ChoiceCommon::query(storer, &ChoiceQuery { question_id_eq: Some(question_id) }).await?;
    Ok(PollForm::new(choices))
}

async fn get_poll<S>(storer: &mut S, id: i32) -> Result<Poll, Error>
where
    S: Store,
{
    PollCommon::get(storer, id).await?.ok_or(Error::NotFound)
}

async fn question_id_of<S>(storer: &mut S, poll: &Poll) -> Result<i32, Error>
where
    S: Store,
{
    let choice = ChoiceCommon::get(storer, poll.choice_id).await?.ok_or(Error::NotFound)?;
    Ok(choice.question_id)
}

pub async fn create_form<S>(storer: &mut S, question_id: i32, now: DateTime<Utc>) -> Result<PollForm, Error>
where
    S: Store,
{
    let question = get_visible_question(storer, question_id, now).await?;
    form_for_question(storer, question.id).await
}

pub async fn create_poll<S>(storer: &mut S, uid: i32, question_id: i32, submit: Submit, now: DateTime<Utc>) -> Result<Poll, Error>
where
    S: Store,
{
    let form = create_form(storer, question_id, now).await?;
    let cleaned = form.clean(submit)?;
    let id = PollCommon::insert(
        storer,
        Insert {
            choice_id: cleaned.choice_id,
            comment: cleaned.comment,
            created_by: uid,
        },
    )
    .await?;
    log::info!("poll {} created by user {} on question {}", id, uid, question_id);
    get_poll(storer, id).await
}

/// Loads a comment for editing. Fails with `Forbidden` unless `uid` wrote it.
/// The choice field is scoped to the question of the comment's current choice.
pub async fn update_form<S>(storer: &mut S, uid: i32, id: i32) -> Result<(Poll, i32, PollForm), Error>
where
    S: Store,
{
    let poll = get_poll(storer, id).await?;
    if !can_edit(uid, &poll) {
        log::warn!("user {} denied editing poll {}", uid, id);
        return Err(Error::Forbidden);
    }
    let question_id = question_id_of(storer, &poll).await?;
    let form = form_for_question(storer, question_id).await?.with_initial(poll.choice_id, poll.comment.clone());
    Ok((poll, question_id, form))
}

/// Returns the question id the comment now belongs to.
pub async fn update_poll<S>(storer: &mut S, uid: i32, id: i32, submit: Submit) -> Result<i32, Error>
where
    S: Store,
{
    let (_, question_id, form) = update_form(storer, uid, id).await?;
    let cleaned = form.clean(submit)?;
    PollCommon::update(
        storer,
        id,
        Update {
            choice_id: cleaned.choice_id,
            comment: cleaned.comment,
        },
    )
    .await?;
    log::info!("poll {} updated by user {}", id, uid);
    Ok(question_id)
}

pub async fn delete_poll<S>(storer: &mut S, uid: i32, id: i32) -> Result<(), Error>
where
    S: Store,
{
    let poll = get_poll(storer, id).await?;
    let user = UserCommon::get(storer, uid).await?.ok_or(Error::Forbidden)?;
    if !can_delete(&user, &poll) {
        log::warn!("user {} denied deleting poll {}", uid, id);
        return Err(Error::Forbidden);
    }
    PollCommon::delete(storer, id).await?;
    log::info!("poll {} deleted by user {}", id, uid);
    Ok(())
}
