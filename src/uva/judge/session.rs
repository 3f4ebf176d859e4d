use crate::{
    config,
    crawler::{hidden_form_fields, set_field},
    error::{Error, Result},
    storage,
};
use log::debug;
use reqwest::{
    cookie::{CookieStore, Jar},
    redirect::Policy,
    Client, Url,
};
use serde::{Deserialize, Serialize};
use std::{fs, sync::Arc};

const FIREFOX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:78.0) Gecko/20100101 Firefox/78.0";
const LOGIN_FAILED: &str = "Incorrect username or password";

#[derive(Serialize, Deserialize)]
struct LoginInfo {
    username: String,
    cookies: Vec<String>,
}

/// One cookie-carrying HTTP session shared by every network-facing
/// component. Built once (anonymously or by `login`/`restore`) and only
/// read afterwards; cloning is cheap.
#[derive(Clone)]
pub struct Session {
    client: Client,
    jar: Arc<Jar>,
    judge_url: String,
    debug_url: String,
    username: Option<String>,
}

impl Session {
    pub fn anonymous() -> Result<Self> {
        Self::with_endpoints(
            config::site::JUDGE_URL.to_string(),
            config::site::DEBUG_URL.to_string(),
        )
    }

    /// Point the session at a judge mirror or a different debug site.
    pub fn with_endpoints(judge_url: String, debug_url: String) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .user_agent(FIREFOX_UA)
            .cookie_provider(jar.clone())
            .build()?;
        Ok(Session {
            client,
            jar,
            judge_url,
            debug_url,
            username: None,
        })
    }

    /// Log in by replaying the front page's hidden login-form fields,
    /// then persist the session cookies for later `restore` calls.
    pub async fn login(username: &str, password: &str) -> Result<Self> {
        let mut session = Self::anonymous()?;
        let front = session.get_text(&session.judge_url).await?;
        let mut form = hidden_form_fields(&front, "mod_loginform")?;
        set_field(&mut form, "username".to_string(), username.to_string());
        set_field(&mut form, "passwd".to_string(), password.to_string());
        let url = format!(
            "{}/index.php?option=com_comprofiler&task=login",
            session.judge_url
        );
        let body = session.post_form(&url, &form).await?;
        if body.contains(LOGIN_FAILED) {
            return Err(Error::Judge(LOGIN_FAILED.to_string()));
        }
        storage::save(
            &storage::login_file(),
            &LoginInfo {
                username: username.to_string(),
                cookies: session.saved_cookies(),
            },
        )?;
        session.username = Some(username.to_string());
        Ok(session)
    }

    /// Rebuild a session from the cookies `login` persisted.
    pub fn restore() -> Result<Self> {
        let info: LoginInfo =
            storage::load(&storage::login_file())?.ok_or(Error::NotLoggedIn)?;
        let session = Self::anonymous()?;
        let url = session.base_url();
        for cookie in &info.cookies {
            session.jar.add_cookie_str(cookie, &url);
        }
        debug!("restored session for {}", info.username);
        Ok(Session {
            username: Some(info.username),
            ..session
        })
    }

    pub fn logout() -> Result<()> {
        fs::remove_file(storage::login_file()).map_err(Error::Io)
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
    pub fn judge_url(&self) -> &str {
        &self.judge_url
    }
    pub fn debug_url(&self) -> &str {
        &self.debug_url
    }
    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// A sibling client that keeps the cookie jar but refuses redirects;
    /// the submit endpoint answers with the submission id in a redirect.
    pub(crate) fn no_redirect_client(&self) -> Result<Client> {
        Client::builder()
            .user_agent(FIREFOX_UA)
            .cookie_provider(self.jar.clone())
            .redirect(Policy::none())
            .build()
            .map_err(Error::Network)
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }

    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec())
    }

    pub async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<String> {
        Ok(self
            .client
            .post(url)
            .form(form)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }

    fn base_url(&self) -> Url {
        self.judge_url
            .parse()
            .expect("judge base url is a valid url")
    }

    fn saved_cookies(&self) -> Vec<String> {
        match self.jar.cookies(&self.base_url()) {
            Some(header) => header
                .to_str()
                .unwrap_or_default()
                .split("; ")
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        }
    }
}
