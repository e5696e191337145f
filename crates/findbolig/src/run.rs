use std::time::Duration;

use chrono::{Local, NaiveDate};

use crate::auth::AuthError;
use crate::client::FindboligClient;
use crate::history::{HistoryError, HistoryFile};
use crate::parser::MarkupStrategy;
use crate::placement::PlacementError;
use crate::session::{HttpSession, SessionError};
use crate::types::{Credentials, Placements};

pub const EXIT_SITE_UNAVAILABLE: i32 = -1;
pub const EXIT_LOGIN_FAILED: i32 = -2;
pub const EXIT_FAILURE: i32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    SiteUnavailable(AuthError),
    #[error("Couldn't login using the credentials provided.")]
    LoginFailed,
    #[error(transparent)]
    Login(AuthError),
    #[error("Failed to fetch the waitlist: {0}")]
    Waitlist(#[from] SessionError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

impl RunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::SiteUnavailable(_) => EXIT_SITE_UNAVAILABLE,
            RunError::LoginFailed => EXIT_LOGIN_FAILED,
            _ => EXIT_FAILURE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Pause after each rank request.
    pub delay: Duration,
    /// Stamped into the `date` column of the new row.
    pub date: NaiveDate,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            date: Local::now().date_naive(),
        }
    }
}

/// Logs in, collects today's placements and appends them to `history`.
/// Nothing is written unless every earlier step succeeded.
pub fn run<S: HttpSession, M: MarkupStrategy>(
    client: &FindboligClient<S, M>,
    credentials: &Credentials,
    history: &HistoryFile,
    options: &RunOptions,
) -> Result<Placements, RunError> {
    client.initialize().map_err(RunError::SiteUnavailable)?;

    if !client.login(credentials).map_err(RunError::Login)? {
        return Err(RunError::LoginFailed);
    }

    let buildings = client.extract_waitinglist_references()?;
    let placements = client.extract_waitinglist_placements(&buildings, options.delay)?;

    history.append(placements.to_row(), options.date)?;
    Ok(placements)
}
