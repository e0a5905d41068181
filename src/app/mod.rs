use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{config::AppConfig, MailerLiteClient, Result};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    pub async fn build_from_config(config: &AppConfig) -> Result<Self> {
        let mailerlite_config = &config.mailerlite_config;
        let mailerlite_client = MailerLiteClient::new(
            &mailerlite_config.base_url,
            mailerlite_config.api_key.clone(),
        )?;
        if !mailerlite_client.has_api_key() {
            tracing::warn!(
                "{:<20} - MAILERLITE_API_KEY is not set, subscriptions will fail",
                "build_from_config"
            );
        }

        let app_state = AppState::new(mailerlite_client);

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        Ok(App::new(app_state, listener))
    }
}

pub struct InternalState {
    pub mailerlite_client: MailerLiteClient,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(mailerlite_client: MailerLiteClient) -> Self {
        AppState(Arc::new(InternalState { mailerlite_client }))
    }
}
