use crate::core::{
    forms::{PasswordChangeForm, RegisterUserForm},
    models::user::{EmailAddressInsert, Insert, PasswordChange, Patch, Register, User},
    password::{hash_password, random_salt, verify_password},
    ports::repository::{Store, TxStore, UserCommon},
};
use crate::error::Error;

/// Creates the account and its verified primary address in one transaction.
/// The username is the lower-cased email.
pub async fn register<T>(mut storer: T, data: Register) -> Result<User, Error>
where
    T: TxStore,
{
    let form = RegisterUserForm::new(data);
    let taken = UserCommon::exists_email(&mut storer, form.email()).await?;
    let cleaned = match form.clean(taken) {
        Ok(cleaned) => cleaned,
        Err(e) => {
            storer.rollback().await?;
            return Err(e);
        }
    };
    let salt = random_salt();
    let id = UserCommon::insert(
        &mut storer,
        Insert {
            username: cleaned.email.to_lowercase(),
            email: cleaned.email.clone(),
            password: hash_password(&cleaned.password, &salt),
            salt,
        },
    )
    .await?;
    UserCommon::insert_email_address(
        &mut storer,
        EmailAddressInsert {
            user_id: id,
            email: cleaned.email,
            verified: true,
            is_primary: true,
        },
    )
    .await?;
    let user = UserCommon::get(&mut storer, id).await?.ok_or(Error::NotFound)?;
    storer.commit().await?;
    log::info!("user {} registered as {}", user.id, user.username);
    Ok(user)
}

pub async fn authenticate<S>(storer: &mut S, username: &str, password: &str) -> Result<User, Error>
where
    S: Store,
{
    match UserCommon::get_by_username_or_email(storer, username.trim()).await? {
        Some(user) if verify_password(password, &user.salt, &user.password) => Ok(user),
        _ => Err(Error::InvalidCredentials),
    }
}

/// Replaces the hash and salt. Returns the updated account so the caller can
/// issue a session matching the new credentials.
pub async fn change_password<S>(storer: &mut S, uid: i32, data: PasswordChange) -> Result<User, Error>
where
    S: Store,
{
    let user = UserCommon::get(storer, uid).await?.ok_or(Error::Forbidden)?;
    let form = PasswordChangeForm::new(data);
    let matches = verify_password(form.old_password(), &user.salt, &user.password);
    let new_password = form.clean(matches)?;
    let salt = random_salt();
    UserCommon::patch(
        storer,
        uid,
        Patch {
            password: Some(hash_password(&new_password, &salt)),
            salt: Some(salt),
        },
    )
    .await?;
    log::info!("user {} changed password", uid);
    UserCommon::get(storer, uid).await?.ok_or(Error::NotFound)
}
