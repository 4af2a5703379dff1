// src/application/views/forms.rs
//
// Form state for the input-collecting views. Validation is presence only.
use crate::domain::{ClientError, Credentials, NoteDraft, NotePatch, SignupRequest};

fn require(fields: &[(&str, &str)]) -> Result<(), ClientError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ClientError::Validation(format!(
            "{} required",
            missing.join(", ")
        )))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, ClientError> {
        require(&[("email", self.email.as_str()), ("password", self.password.as_str())])?;
        Ok(Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<SignupRequest, ClientError> {
        require(&[
            ("username", self.username.as_str()),
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
        ])?;
        Ok(SignupRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
}

impl NoteForm {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty()
    }

    pub fn to_draft(&self) -> Result<NoteDraft, ClientError> {
        self.validate()?;
        Ok(NoteDraft::new(self.title.clone(), self.content.clone()))
    }

    pub fn to_patch(&self) -> Result<NotePatch, ClientError> {
        self.validate()?;
        Ok(NotePatch {
            title: Some(self.title.clone()),
            content: Some(self.content.clone()),
            ..Default::default()
        })
    }

    fn validate(&self) -> Result<(), ClientError> {
        require(&[("title", self.title.as_str()), ("content", self.content.as_str())])
    }
}
