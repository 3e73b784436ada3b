mod credential_broker;
mod gigachat_client;
mod gigachat_config;

pub use credential_broker::CredentialBroker;
pub use gigachat_client::GigaChatClient;
pub use gigachat_config::GigaChatConfig;
