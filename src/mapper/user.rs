use crate::github::raw::{RawActor, RawViewer};
use crate::model::{Actor, UserProfile};

pub fn map_user(raw: &RawViewer) -> UserProfile {
    UserProfile {
        id: raw.id.clone().unwrap_or_default(),
        login: raw.login.clone().unwrap_or_default(),
        name: non_empty(&raw.name),
        avatar_url: raw.avatar_url.clone().unwrap_or_default(),
        bio: non_empty(&raw.bio),
        location: non_empty(&raw.location),
        company: non_empty(&raw.company),
        email: non_empty(&raw.email),
        website_url: non_empty(&raw.website_url),
        twitter_username: non_empty(&raw.twitter_username),
    }
}

pub fn map_actor(raw: Option<&RawActor>) -> Actor {
    raw.map(|a| Actor {
        login: a.login.clone().unwrap_or_default(),
        avatar_url: a.avatar_url.clone().unwrap_or_default(),
    })
    .unwrap_or_default()
}

/// GitHub returns `""` for unset profile fields as often as `null`.
pub(crate) fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}
