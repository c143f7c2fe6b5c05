use crate::core::{
    models::question::QuestionDetail,
    ports::repository::{ChoiceCommon, Store},
    services::question::{detail_of, get_visible_question},
};
use crate::error::Error;
use chrono::{DateTime, Utc};

pub const NO_CHOICE_SELECTED: &str = "You didn't select a choice.";

#[derive(Debug)]
pub enum VoteOutcome {
    Voted { question_id: i32, choice_id: i32, votes: i32 },
    Rejected(QuestionDetail),
}

/// Counts one vote. A missing, malformed or foreign choice leaves every
/// counter untouched and hands back the detail with an error message.
pub async fn vote<S>(storer: &mut S, question_id: i32, choice: Option<&str>, now: DateTime<Utc>) -> Result<VoteOutcome, Error>
where
    S: Store,
{
    let question = get_visible_question(storer, question_id, now).await?;
    if let Some(choice_id) = choice.and_then(|c| c.trim().parse::<i32>().ok()) {
        if let Some(votes) = ChoiceCommon::increase_votes(storer, question.id, choice_id).await? {
            return Ok(VoteOutcome::Voted {
                question_id: question.id,
                choice_id,
                votes,
            });
        }
    }
    log::debug!("vote rejected: question={} choice={:?}", question.id, choice);
    let mut detail = detail_of(storer, question).await?;
    detail.error_message = Some(NO_CHOICE_SELECTED.into());
    Ok(VoteOutcome::Rejected(detail))
}
