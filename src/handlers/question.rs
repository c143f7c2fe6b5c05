use crate::core::{
    models::question::{Question, QuestionDetail},
    ports::repository::Manager,
    services::question::{list_recent, question_detail},
};
use crate::error::Error;
use crate::response::List;
use actix_web::web::{Data, Json, Path};
use chrono::Utc;

pub async fn index<M>(manager: Data<M>) -> Result<Json<List<Question>>, Error>
where
    M: Manager + 'static,
{
    let mut storer = manager.db().await?;
    let questions = list_recent(&mut storer, Utc::now()).await?;
    Ok(Json(List::new(questions)))
}

pub async fn detail<M>(manager: Data<M>, id: Path<(i32,)>) -> Result<Json<QuestionDetail>, Error>
where
    M: Manager + 'static,
{
    let id = id.into_inner().0;
    let mut storer = manager.db().await?;
    Ok(Json(question_detail(&mut storer, id, Utc::now()).await?))
}

pub async fn results<M>(manager: Data<M>, id: Path<(i32,)>) -> Result<Json<QuestionDetail>, Error>
where
    M: Manager + 'static,
{
    detail(manager, id).await
}
