pub mod poll;
pub mod question;
pub mod vote;

use crate::config::Config;
use crate::context::UserInfo;
use crate::core::{
    models::user::{Login, PasswordChange, Register, User},
    ports::{repository::Manager, tokener::Tokener},
    services::user::{authenticate, change_password as change_user_password, register as register_user},
};
use crate::error::Error;
use crate::impls::tokener::jwt::{Claim, JWT};
use crate::middlewares::session::JWT_TOKEN;
use crate::response::FormSpec;
use actix_web::{
    cookie::{time::OffsetDateTime, Cookie, CookieBuilder, SameSite},
    http::header,
    web::{get, post, resource, Data, Form, Json, Query, ServiceConfig},
    HttpResponse,
};
use serde::Deserialize;

/// Issues the session cookie for `user` and redirects to `location`.
fn start_session(tokener: &JWT, config: &Config, user: &User, location: String) -> Result<HttpResponse, Error> {
    let token = tokener.gen_token(&Claim::new(user, config.token_ttl_days))?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(
            Cookie::build(JWT_TOKEN, token)
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .finish(),
        )
        .finish())
}

fn is_same_site(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//")
}

/// Only same-site paths are followed after login.
fn safe_next(next: Option<String>) -> String {
    next.filter(|n| is_same_site(n)).unwrap_or_else(|| "/".into())
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

/// Echoes the `next` the login redirect carried so the client can post it back.
pub async fn login_form(query: Query<NextQuery>) -> Json<FormSpec> {
    let mut form = FormSpec::new(&["username", "password", "next"]);
    form.next = query.into_inner().next.filter(|n| is_same_site(n));
    Json(form)
}

pub async fn login<M>(manager: Data<M>, tokener: Data<JWT>, config: Data<Config>, Form(data): Form<Login>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let mut storer = manager.db().await?;
    let user = authenticate(&mut storer, &data.username, &data.password).await?;
    log::info!("user {} logged in", user.id);
    start_session(&tokener, &config, &user, safe_next(data.next))
}

pub async fn logout() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(
            CookieBuilder::new(JWT_TOKEN, "")
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .expires(OffsetDateTime::now_utc())
                .finish(),
        )
        .finish()
}

pub async fn register_form() -> Json<FormSpec> {
    Json(FormSpec::new(&["email", "password1", "password2"]))
}

/// Registration logs the new account in straight away.
pub async fn register<M>(manager: Data<M>, tokener: Data<JWT>, config: Data<Config>, Form(data): Form<Register>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let user = register_user(manager.tx().await?, data).await?;
    start_session(&tokener, &config, &user, "/".into())
}

pub async fn change_password_form(_: UserInfo) -> Json<FormSpec> {
    Json(FormSpec::new(&["old_password", "new_password1", "new_password2"]))
}

/// Older sessions stop resolving once the password changes; the caller gets
/// a fresh cookie.
pub async fn change_password<M>(
    user: UserInfo,
    manager: Data<M>,
    tokener: Data<JWT>,
    config: Data<Config>,
    Form(data): Form<PasswordChange>,
) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let mut storer = manager.db().await?;
    let user = change_user_password(&mut storer, user.id, data).await?;
    start_session(&tokener, &config, &user, "/".into())
}

pub fn configure<M>(cfg: &mut ServiceConfig)
where
    M: Manager + 'static,
{
    cfg.service(resource("/").route(get().to(question::index::<M>)))
        .service(resource("/login/").route(get().to(login_form)).route(post().to(login::<M>)))
        .service(resource("/logout/").route(post().to(logout)))
        .service(resource("/register_user/").route(get().to(register_form)).route(post().to(register::<M>)))
        .service(
            resource("/change_password/")
                .route(get().to(change_password_form))
                .route(post().to(change_password::<M>)),
        )
        .service(
            resource(r"/poll/create/{question_id:\d+}/")
                .route(get().to(poll::create_form::<M>))
                .route(post().to(poll::create::<M>)),
        )
        .service(
            resource(r"/poll/{id:\d+}/update/")
                .route(get().to(poll::update_form::<M>))
                .route(post().to(poll::update::<M>)),
        )
        .service(resource(r"/poll/{id:\d+}/delete/").route(post().to(poll::delete::<M>)))
        .service(resource(r"/{id:\d+}/").route(get().to(question::detail::<M>)))
        .service(resource(r"/{id:\d+}/results/").route(get().to(question::results::<M>)))
        .service(resource(r"/{id:\d+}/vote/").route(post().to(vote::vote::<M>)));
}
