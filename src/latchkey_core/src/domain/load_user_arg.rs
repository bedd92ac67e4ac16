use crate::domain::{uid::Uid, username::NormalizedUsername};

/// Criteria describing which identity to load.
///
/// When `self_load` is set the lookup resolves to the authenticated user and
/// `name`/`uid` are only hints for the loader. Otherwise at most one of
/// `name` or `uid` is set; the constructors enforce that.
///
/// `self_uid` is the authenticated uid as known by the caller. It is carried
/// here rather than fetched from the login-state container so a lookup made
/// from inside the container's critical section never calls back into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadUserArg {
    pub self_load: bool,
    pub name: Option<String>,
    pub uid: Option<Uid>,
    pub self_uid: Option<Uid>,
    pub force_reload: bool,
    pub public_key_optional: bool,
}

impl LoadUserArg {
    /// Load the authenticated user.
    pub fn me(self_uid: Uid) -> Self {
        Self {
            self_load: true,
            uid: Some(self_uid),
            self_uid: Some(self_uid),
            ..Default::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn by_uid(uid: Uid) -> Self {
        Self {
            uid: Some(uid),
            ..Default::default()
        }
    }

    pub fn with_self_uid(mut self, self_uid: Option<Uid>) -> Self {
        self.self_uid = self_uid;
        self
    }

    pub fn force_reload(mut self) -> Self {
        self.force_reload = true;
        self
    }

    pub fn public_key_optional(mut self) -> Self {
        self.public_key_optional = true;
        self
    }

    /// The requested name in normalized form, if one was given and is valid.
    pub fn normalized_name(&self) -> Option<NormalizedUsername> {
        self.name
            .as_deref()
            .and_then(|n| NormalizedUsername::parse(n).ok())
    }
}
