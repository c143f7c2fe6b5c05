use crate::core::models::{poll::Poll, user::User};

/// Only the author may edit a comment.
pub fn can_edit(uid: i32, poll: &Poll) -> bool {
    poll.created_by == uid
}

/// The author or any staff member may delete a comment.
pub fn can_delete(user: &User, poll: &Poll) -> bool {
    can_edit(user.id, poll) || user.is_staff
}
