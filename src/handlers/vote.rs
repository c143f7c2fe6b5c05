use crate::core::{
    ports::repository::Manager,
    services::vote::{vote as count_vote, VoteOutcome},
};
use crate::error::Error;
use crate::response::{redirect, results_url};
use actix_web::web::{Data, Form, Path};
use actix_web::HttpResponse;
use chrono::Utc;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct VoteForm {
    choice: Option<String>,
}

/// A body that is not a form at all counts as "no choice selected".
pub async fn vote<M>(manager: Data<M>, question_id: Path<(i32,)>, form: Option<Form<VoteForm>>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let question_id = question_id.into_inner().0;
    let choice = form.and_then(|f| f.into_inner().choice);
    let mut storer = manager.db().await?;
    match count_vote(&mut storer, question_id, choice.as_deref(), Utc::now()).await? {
        VoteOutcome::Voted { question_id, choice_id, votes } => {
            log::info!("question {} choice {} now has {} votes", question_id, choice_id, votes);
            Ok(redirect(results_url(question_id)))
        }
        VoteOutcome::Rejected(detail) => Ok(HttpResponse::Ok().json(detail)),
    }
}
