use std::sync::Arc;

use crate::domain::ports::{MailMessage, Mailer};
use crate::domain::types::validate_email;
use crate::error::ApiError;

pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Forward a contact-form submission to the site's contact address.
pub struct ContactUseCase {
    pub mailer: Arc<dyn Mailer>,
    pub recipient: String,
}

impl ContactUseCase {
    pub async fn execute(&self, input: ContactInput) -> Result<(), ApiError> {
        let name = input.name.trim();
        let email = input.email.trim();
        let message = input.message.trim();
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(ApiError::validation("all fields are required"));
        }
        if !validate_email(email) {
            return Err(ApiError::validation("please provide a valid email address"));
        }
        self.mailer
            .send(MailMessage {
                to: self.recipient.clone(),
                subject: "New Contact Form Submission".to_owned(),
                body: format!("Name: {name}\nEmail: {email}\nMessage: {message}"),
                reply_to: Some(email.to_owned()),
            })
            .await
            .map_err(ApiError::Mail)
    }
}
