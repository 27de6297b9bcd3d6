use serde::Serialize;

/// Body of `POST /auth/reset/{uid}/{token}/`
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetConfirm {
    pub new_password: String,
}
