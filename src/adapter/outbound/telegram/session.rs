//! MTProto user sessions.
//!
//! A session string is the base64 encoding of the serialized grammers
//! session. It is produced once by an interactive login and then read from
//! `TELEGRAM_SESSION_STRING` by the channel reader.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use grammers_client::types::{LoginToken, PasswordToken};
use grammers_client::{Client, Config, InitParams, SignInError};
use grammers_session::Session;

use crate::error::{ConfigError, Error, Result};

/// Decode a session string into a session.
///
/// # Errors
///
/// Returns a configuration error if the string is not valid base64 or does
/// not hold a session.
#[allow(clippy::result_large_err)]
pub fn decode_session(encoded: &str) -> Result<Session> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| invalid_session(e.to_string()))?;
    Session::load(&bytes).map_err(|e| invalid_session(e.to_string()))
}

/// Encode a session as a session string.
#[must_use]
pub fn encode_session(session: &Session) -> String {
    STANDARD.encode(session.save())
}

fn invalid_session(reason: String) -> Error {
    ConfigError::InvalidValue {
        field: "TELEGRAM_SESSION_STRING",
        reason,
    }
    .into()
}

/// Connect a client with the given session.
///
/// # Errors
///
/// Returns a connection error if Telegram cannot be reached.
pub async fn connect(api_id: i32, api_hash: &str, session: Session) -> Result<Client> {
    Client::connect(Config {
        session,
        api_id,
        api_hash: api_hash.to_string(),
        params: InitParams::default(),
    })
    .await
    .map_err(|e| Error::Connection(e.to_string()))
}

/// Outcome of submitting a login code.
pub enum SignIn {
    Complete,
    PasswordRequired(PasswordToken),
}

/// Interactive login producing a session string.
pub struct Login {
    client: Client,
}

impl Login {
    /// Connect with a fresh session.
    ///
    /// # Errors
    ///
    /// Returns a connection error if Telegram cannot be reached.
    pub async fn start(api_id: i32, api_hash: &str) -> Result<Self> {
        let client = connect(api_id, api_hash, Session::new()).await?;
        Ok(Self { client })
    }

    /// Ask Telegram to send a login code to `phone`.
    ///
    /// # Errors
    ///
    /// Returns an error if the phone number is rejected.
    pub async fn request_code(&self, phone: &str) -> Result<LoginToken> {
        self.client
            .request_login_code(phone)
            .await
            .map_err(|e| Error::Telegram(e.to_string()))
    }

    /// Submit the code received for `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is wrong or expired.
    pub async fn submit_code(&self, token: &LoginToken, code: &str) -> Result<SignIn> {
        match self.client.sign_in(token, code.trim()).await {
            Ok(_) => Ok(SignIn::Complete),
            Err(SignInError::PasswordRequired(password_token)) => {
                Ok(SignIn::PasswordRequired(password_token))
            }
            Err(e) => Err(Error::Telegram(e.to_string())),
        }
    }

    /// Submit the two-step verification password.
    ///
    /// # Errors
    ///
    /// Returns an error if the password is wrong.
    pub async fn submit_password(&self, token: PasswordToken, password: &str) -> Result<()> {
        self.client
            .check_password(token, password)
            .await
            .map(|_| ())
            .map_err(|e| Error::Telegram(e.to_string()))
    }

    /// Session string for the signed-in account.
    #[must_use]
    pub fn session_string(&self) -> String {
        encode_session(self.client.session())
    }
}
