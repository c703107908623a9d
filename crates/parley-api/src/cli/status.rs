//! System status dashboard command.

use anyhow::Result;
use console::style;

use parley_infra::sqlite::pool::DATABASE_FILE;

use crate::state::AppState;

/// Display system status: storage, counts, and the effective model settings.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let conversations = state.conversation_service.count_conversations().await?;
    let messages = state.conversation_service.count_messages().await?;
    let settings = state.config_service.effective_settings().await?;
    let base_url = &state.config_service.defaults().base_url;
    let database = state.data_dir.join(DATABASE_FILE);
    let key_configured = settings.api_key.is_some();

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "database": database.display().to_string(),
            "conversations": conversations,
            "messages": messages,
            "model": settings.model,
            "base_url": base_url,
            "temperature": settings.temperature,
            "max_tokens": settings.max_tokens,
            "max_history_rounds": settings.max_history_rounds,
            "api_key_configured": key_configured,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Parley v{}",
        style("💬").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Storage ──").dim());
    println!("  Data dir:      {}", state.data_dir.display());
    println!("  Database:      {}", database.display());
    println!("  Conversations: {}", style(conversations).bold());
    println!("  Messages:      {}", style(messages).bold());
    println!();

    println!("  {}", style("── Model ──").dim());
    println!("  Model:         {}", style(&settings.model).cyan());
    println!("  Endpoint:      {}", style(base_url).dim());
    println!("  Temperature:   {}", settings.temperature);
    println!("  Max tokens:    {}", settings.max_tokens);
    println!("  History:       {} rounds", settings.max_history_rounds);
    if key_configured {
        println!("  API key:       {}", style("configured").green());
    } else {
        println!(
            "  API key:       {} {}",
            style("missing").yellow(),
            style("(parley config set-key)").dim()
        );
    }
    println!();

    Ok(())
}
