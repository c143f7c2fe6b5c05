use crate::context::UserInfo;
use crate::core::{
    forms::PollForm,
    models::poll::{Poll, Submit},
    ports::repository::Manager,
    services::poll::{create_form as new_poll_form, create_poll, delete_poll, update_form as edit_poll_form, update_poll},
};
use crate::error::Error;
use crate::response::{detail_url, redirect};
use actix_web::web::{Data, Form, Json, Path};
use actix_web::HttpResponse;
use chrono::Utc;
use serde::Serialize;

pub async fn create_form<M>(_: UserInfo, manager: Data<M>, question_id: Path<(i32,)>) -> Result<Json<PollForm>, Error>
where
    M: Manager + 'static,
{
    let question_id = question_id.into_inner().0;
    let mut storer = manager.db().await?;
    Ok(Json(new_poll_form(&mut storer, question_id, Utc::now()).await?))
}

pub async fn create<M>(user: UserInfo, manager: Data<M>, question_id: Path<(i32,)>, Form(submit): Form<Submit>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let question_id = question_id.into_inner().0;
    let mut storer = manager.db().await?;
    create_poll(&mut storer, user.id, question_id, submit, Utc::now()).await?;
    Ok(redirect(detail_url(question_id)))
}

#[derive(Debug, Serialize)]
pub struct EditForm {
    poll: Poll,
    question_id: i32,
    form: PollForm,
}

pub async fn update_form<M>(user: UserInfo, manager: Data<M>, id: Path<(i32,)>) -> Result<Json<EditForm>, Error>
where
    M: Manager + 'static,
{
    let id = id.into_inner().0;
    let mut storer = manager.db().await?;
    let (poll, question_id, form) = edit_poll_form(&mut storer, user.id, id).await?;
    Ok(Json(EditForm { poll, question_id, form }))
}

pub async fn update<M>(user: UserInfo, manager: Data<M>, id: Path<(i32,)>, Form(submit): Form<Submit>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let id = id.into_inner().0;
    let mut storer = manager.db().await?;
    let question_id = update_poll(&mut storer, user.id, id, submit).await?;
    Ok(redirect(detail_url(question_id)))
}

pub async fn delete<M>(user: UserInfo, manager: Data<M>, id: Path<(i32,)>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let id = id.into_inner().0;
    let mut storer = manager.db().await?;
    delete_poll(&mut storer, user.id, id).await?;
    Ok(redirect("/"))
}
