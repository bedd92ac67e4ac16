use std::fmt;

/// Interactive collaborators an engine may require from its run context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiKind {
    LoginUi,
    SecretUi,
    LogUi,
}

impl fmt::Display for UiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UiKind::LoginUi => "LoginUI",
            UiKind::SecretUi => "SecretUI",
            UiKind::LogUi => "LogUI",
        };
        f.write_str(name)
    }
}

/// State an engine expects to already exist before it runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnginePrereqs {
    pub session: bool,
    pub device: bool,
}
