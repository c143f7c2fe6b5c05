use crate::context::UserInfo;
use crate::core::password::session_hash;
use crate::core::ports::repository::{Manager, UserCommon};
use crate::core::ports::tokener::{Payload, Tokener};
use crate::error::Error;
use crate::impls::tokener::jwt::{Claim, JWT};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::web::Data;
use actix_web::{http::header, HttpMessage};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::marker::PhantomData;
use std::rc::Rc;

pub static JWT_TOKEN: &str = "JWT_TOKEN";

/// Resolves the caller from the `JWT_TOKEN` cookie or a bearer token.
/// Requests without a valid token pass through anonymously, as do tokens
/// issued before the account's last password change.
pub struct Session<M> {
    secret: Vec<u8>,
    _manager: PhantomData<M>,
}

impl<M> Session<M> {
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            secret,
            _manager: PhantomData,
        }
    }
}

impl<S, B, M> Transform<S, ServiceRequest> for Session<M>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: 'static,
    M: Manager + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = SessionService<S, M>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionService {
            tokener: JWT::new(self.secret.clone()),
            next_service: Rc::new(service),
            _manager: PhantomData,
        }))
    }
}

pub struct SessionService<S, M> {
    tokener: JWT,
    next_service: Rc<S>,
    _manager: PhantomData<M>,
}

fn token_of(req: &ServiceRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(JWT_TOKEN) {
        return Some(cookie.value().to_owned());
    }
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    Some(value.strip_prefix("Bearer ").unwrap_or(value).to_owned())
}

impl<S, M> SessionService<S, M> {
    fn verify(&self, token: &str) -> Option<Claim> {
        match <JWT as Tokener<Claim>>::verify_token(&self.tokener, token) {
            Ok(claim) => Some(claim),
            Err(e) => {
                log::debug!("ignoring invalid session token: {}", e);
                None
            }
        }
    }
}

/// The account named by `claim`, provided its credentials have not changed
/// since the token was issued.
async fn identify<M>(manager: &M, claim: &Claim) -> Result<Option<UserInfo>, Error>
where
    M: Manager,
{
    let id = match claim.user().parse::<i32>() {
        Ok(id) => id,
        Err(_) => return Ok(None),
    };
    let mut storer = manager.db().await?;
    let user = UserCommon::get(&mut storer, id).await?;
    Ok(user
        .filter(|u| session_hash(&u.password, &u.salt) == claim.version())
        .map(|u| UserInfo { id: u.id }))
}

impl<S, B, M> Service<ServiceRequest> for SessionService<S, M>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    M: Manager + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claim = token_of(&req).and_then(|token| self.verify(&token));
        let manager = req.app_data::<Data<M>>().cloned();
        let srv = self.next_service.clone();
        Box::pin(async move {
            match (claim, manager) {
                (Some(claim), Some(manager)) => match identify(manager.get_ref(), &claim).await? {
                    Some(user) => {
                        req.extensions_mut().insert(user);
                    }
                    None => log::debug!("session of user {} is no longer valid", claim.user()),
                },
                (Some(_), None) => log::error!("session middleware mounted without a store"),
                _ => {}
            }
            srv.call(req).await
        })
    }
}
