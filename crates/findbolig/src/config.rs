//! Portal endpoints, page markers and the login form's field names.

/// Present on the portal's front page while the site is up and recognisable.
pub const SITE_MARKER: &str = "Findbolig.nu";
/// Present on any page rendered for an authenticated user ("log out").
pub const LOGGED_IN_MARKER: &str = "Log af";

pub const USERNAME_FIELD: &str = "ctl00$placeholdercontent_1$txt_UserName";
pub const PASSWORD_FIELD: &str = "ctl00$placeholdercontent_1$txt_Password";
pub const LOGIN_BUTTON_TARGET: &str = "ctl00$placeholdercontent_1$but_Login";
pub const EVENT_TARGET_FIELD: &str = "__EVENTTARGET";
pub const EVENT_ARGUMENT_FIELD: &str = "__EVENTARGUMENT";

pub const RESULTS_TABLE_ID: &str = "GridView_Results";
pub const RESULT_ROW_CLASS: &str = "rowstyle";

const LOGIN_PATH: &str = "logind.aspx";
const WAITLIST_PATH: &str = "Findbolig-nu/Min-side/ventelisteboliger/opskrivninger.aspx?";
const PLACEMENT_PATH: &str = "Services/WaitlistService.asmx/GetWaitlistRank";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    base_url: String,
}

impl PortalConfig {
    /// A trailing slash is added when missing so paths can be appended.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url, LOGIN_PATH)
    }

    pub fn waitlist_url(&self) -> String {
        format!("{}{}", self.base_url, WAITLIST_PATH)
    }

    pub fn placement_url(&self) -> String {
        format!("{}{}", self.base_url, PLACEMENT_PATH)
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self::new(crate::BASE_URL)
    }
}
