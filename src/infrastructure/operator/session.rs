//! Session operator implementation.

use async_trait::async_trait;
use tracing::info;

use crate::adapter::outbound::telegram::session::{Login, SignIn};
use crate::error::Result;
use crate::port::inbound::operator::session::{LoginPrompt, SessionOperator};
use crate::port::inbound::operator::source::ConfigSource;

use super::{entry::Operator, shared};

#[async_trait]
impl SessionOperator for Operator {
    async fn create_session(
        &self,
        source: &ConfigSource,
        prompt: &dyn LoginPrompt,
    ) -> Result<String> {
        shared::load_env_file(&source.env_file)?;
        let config = shared::load_config(source)?;
        let (api_id, api_hash) = config.api_credentials()?;

        let phone = match config.secrets.phone.clone() {
            Some(phone) => phone,
            None => prompt.phone()?,
        };

        let login = Login::start(api_id, &api_hash).await?;
        let token = login.request_code(phone.trim()).await?;
        let code = prompt.code()?;

        match login.submit_code(&token, &code).await? {
            SignIn::Complete => {}
            SignIn::PasswordRequired(token) => {
                let hint = token.hint().map(|hint| hint.to_string());
                let password = prompt.password(hint.as_deref())?;
                login.submit_password(token, &password).await?;
            }
        }

        info!("Telegram login complete");
        Ok(login.session_string())
    }
}
