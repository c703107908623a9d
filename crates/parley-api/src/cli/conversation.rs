//! Conversation CLI commands: new, list, show, rename, delete, send.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use parley_types::chat::{ChatRole, ConversationId};

use crate::cli::spinner;
use crate::state::AppState;

/// Create a conversation and print its id.
pub async fn new_conversation(state: &AppState, title: Option<&str>, json: bool) -> Result<()> {
    let conversation = state.conversation_service.create(title).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversation)?);
    } else {
        println!(
            "  {} Created conversation {} '{}'",
            style("✓").green().bold(),
            style(format!("#{}", conversation.id)).cyan().bold(),
            conversation.title
        );
        println!(
            "  {}",
            style(format!("Send a message with: parley send {} \"...\"", conversation.id)).dim()
        );
    }

    Ok(())
}

/// List conversations, most recently active first.
pub async fn list_conversations(state: &AppState, json: bool) -> Result<()> {
    let conversations = state.conversation_service.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversations)?);
        return Ok(());
    }

    if conversations.is_empty() {
        println!();
        println!(
            "  {} No conversations yet. Start one with: {}",
            style("i").blue().bold(),
            style("parley new \"My first chat\"").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Created").fg(Color::White),
        Cell::new("Last active").fg(Color::White),
    ]);

    for conversation in &conversations {
        table.add_row(vec![
            Cell::new(conversation.id).fg(Color::Cyan),
            Cell::new(&conversation.title),
            Cell::new(conversation.created_at.format("%Y-%m-%d").to_string()).fg(Color::DarkGrey),
            Cell::new(conversation.updated_at.format("%Y-%m-%d %H:%M").to_string())
                .fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} conversation{}",
        style(conversations.len()).bold(),
        if conversations.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Show a conversation header and its full transcript.
pub async fn show_conversation(state: &AppState, id: ConversationId, json: bool) -> Result<()> {
    let conversation = state.conversation_service.get(id).await?;
    let messages = state.conversation_service.messages(id).await?;

    if json {
        let out = serde_json::json!({
            "conversation": conversation,
            "messages": messages,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style(format!("#{}", conversation.id)).dim(),
        style(&conversation.title).cyan().bold()
    );
    println!(
        "  {}",
        style(format!(
            "Created {} · {} message{}",
            conversation.created_at.format("%Y-%m-%d %H:%M"),
            messages.len(),
            if messages.len() == 1 { "" } else { "s" }
        ))
        .dim()
    );
    println!();

    if messages.is_empty() {
        println!("  {}", style("(no messages)").dim());
        println!();
        return Ok(());
    }

    println!("  {}", style("── Transcript ──").dim());
    for message in &messages {
        let speaker = match message.role {
            ChatRole::User => style("You").green().bold(),
            ChatRole::Assistant => style("Assistant").magenta().bold(),
        };
        println!();
        println!(
            "  {} {}",
            speaker,
            style(message.created_at.format("%H:%M:%S")).dim()
        );
        for line in message.content.lines() {
            println!("  {line}");
        }
    }
    println!();

    Ok(())
}

/// Rename a conversation.
pub async fn rename_conversation(
    state: &AppState,
    id: ConversationId,
    title: &str,
    json: bool,
) -> Result<()> {
    let conversation = state.conversation_service.rename(id, title).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversation)?);
    } else {
        println!(
            "  {} Conversation #{} renamed to '{}'",
            style("✓").green().bold(),
            conversation.id,
            conversation.title
        );
    }

    Ok(())
}

/// Delete a conversation after confirmation.
pub async fn delete_conversation(
    state: &AppState,
    id: ConversationId,
    force: bool,
    json: bool,
) -> Result<()> {
    let conversation = state.conversation_service.get(id).await?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete conversation '{}' and all its messages?",
                style(&conversation.title).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state.conversation_service.delete(id).await?;

    if json {
        println!("{}", serde_json::json!({"deleted": true, "id": id}));
    } else {
        println!(
            "  {} Conversation '{}' deleted.",
            style("✓").red().bold(),
            conversation.title
        );
    }

    Ok(())
}

/// Send one user message and print the assistant's reply.
pub async fn send_message(
    state: &AppState,
    id: ConversationId,
    content: &str,
    json: bool,
) -> Result<()> {
    let spinner = spinner("Thinking...".to_string(), json)?;
    let result = state.chat_service.send_message(id, content).await;
    spinner.finish_and_clear();
    let reply = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("Assistant").magenta().bold());
    for line in reply.content.lines() {
        println!("  {line}");
    }
    println!();
    println!(
        "  {}",
        style(format!(
            "{} · {} tokens ({} in / {} out)",
            reply.model,
            reply.usage.total_tokens,
            reply.usage.prompt_tokens,
            reply.usage.completion_tokens
        ))
        .dim()
    );
    println!();

    Ok(())
}
