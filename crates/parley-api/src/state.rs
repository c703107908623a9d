//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the CLI and
//! the REST API. Services are generic over repository traits; AppState pins
//! them to the SQLite implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parley_core::chat::service::ChatService;
use parley_core::config::service::ConfigService;
use parley_core::conversation::service::ConversationService;
use parley_core::llm::provider::DynProviderFactory;
use parley_infra::config::{ensure_data_dir, load_global_config, resolve_data_dir};
use parley_infra::llm::OpenAiCompatFactory;
use parley_infra::sqlite::config::SqliteConfigRepository;
use parley_infra::sqlite::conversation::SqliteConversationRepository;
use parley_infra::sqlite::pool::DatabasePool;

pub type ConcreteConversationService = ConversationService<SqliteConversationRepository>;
pub type ConcreteConfigService = ConfigService<SqliteConfigRepository>;
pub type ConcreteChatService = ChatService<SqliteConversationRepository, SqliteConfigRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub conversation_service: Arc<ConcreteConversationService>,
    pub config_service: Arc<ConcreteConfigService>,
    pub chat_service: Arc<ConcreteChatService>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize from the resolved data directory with the real provider.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir).await?;

        let defaults = load_global_config(&data_dir).await;
        let providers: DynProviderFactory =
            Arc::new(OpenAiCompatFactory::new(defaults.base_url.clone()));

        Self::build(&data_dir, defaults, providers).await
    }

    /// Wire services over the database in `data_dir`.
    pub async fn build(
        data_dir: &Path,
        defaults: parley_types::config::GlobalConfig,
        providers: DynProviderFactory,
    ) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::open(data_dir).await?;
        tracing::debug!(data_dir = %data_dir.display(), config = ?defaults, "Database ready");

        let conversation_service = Arc::new(ConversationService::new(
            SqliteConversationRepository::new(db_pool.clone()),
        ));
        let config_service = Arc::new(ConfigService::new(
            SqliteConfigRepository::new(db_pool),
            defaults,
            providers.clone(),
        ));
        let chat_service = Arc::new(ChatService::new(
            conversation_service.clone(),
            config_service.clone(),
            providers,
        ));

        Ok(Self {
            conversation_service,
            config_service,
            chat_service,
            data_dir: data_dir.to_path_buf(),
        })
    }
}
