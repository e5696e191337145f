use std::collections::HashMap;

use crate::client::FindboligClient;
use crate::config::{
    EVENT_ARGUMENT_FIELD, EVENT_TARGET_FIELD, LOGGED_IN_MARKER, LOGIN_BUTTON_TARGET,
    PASSWORD_FIELD, SITE_MARKER, USERNAME_FIELD,
};
use crate::parser::{FormInput, MarkupStrategy};
use crate::session::{HttpSession, SessionError};
use crate::types::Credentials;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{url} is unreachable or no longer looks like the findbolig.nu portal")]
    SiteUnavailable {
        url: String,
        #[source]
        source: Option<SessionError>,
    },
    #[error("Login request failed: {0}")]
    Session(#[from] SessionError),
}

/// Seeds the postback with every named, non-button input so the hidden
/// WebForms state fields travel back to the server unchanged.
fn login_form_fields(inputs: Vec<FormInput>, credentials: &Credentials) -> HashMap<String, String> {
    let mut fields: HashMap<String, String> = inputs
        .into_iter()
        .filter(|input| !input.is_button())
        .filter_map(|input| Some((input.name?, input.value.unwrap_or_default())))
        .collect();

    fields.insert(USERNAME_FIELD.to_string(), credentials.username.clone());
    fields.insert(PASSWORD_FIELD.to_string(), credentials.password.clone());
    fields.insert(EVENT_TARGET_FIELD.to_string(), LOGIN_BUTTON_TARGET.to_string());
    fields.insert(EVENT_ARGUMENT_FIELD.to_string(), String::new());
    fields
}

impl<S: HttpSession, M: MarkupStrategy> FindboligClient<S, M> {
    /// Checks that the portal answers and still carries its site marker.
    pub fn initialize(&self) -> Result<(), AuthError> {
        log::info!("Initializing the findbolig.nu client");

        let url = self.config.base_url();
        let html = self
            .session
            .get(url)
            .map_err(|e| AuthError::SiteUnavailable {
                url: url.to_string(),
                source: Some(e),
            })?;

        if !html.contains(SITE_MARKER) {
            log::error!("It seems like the findbolig.nu website is down or has changed a lot.");
            return Err(AuthError::SiteUnavailable {
                url: url.to_string(),
                source: None,
            });
        }

        Ok(())
    }

    /// Returns `Ok(false)` when the portal rejects the credentials.
    pub fn login(&self, credentials: &Credentials) -> Result<bool, AuthError> {
        let login_url = self.config.login_url();
        log::info!(
            "Logging into {} using username '{}'",
            login_url,
            credentials.username
        );

        let login_page = self.session.get(&login_url)?;
        let fields = login_form_fields(self.markup.form_inputs(&login_page), credentials);
        log::debug!("Posting {} login form fields", fields.len());

        let response = self.session.post_form(&login_url, &fields)?;
        if !response.contains(LOGGED_IN_MARKER) {
            return Ok(false);
        }

        match self.markup.logged_in_user(&response) {
            Some(name) => log::info!("Logged in as {}", name),
            None => log::info!("Logged in, but the displayed user name was not found"),
        }
        Ok(true)
    }
}
