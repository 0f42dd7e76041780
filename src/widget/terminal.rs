#[cfg(test)]
#[path = "terminal_test.rs"]
mod tests;

use std::error::Error;
use std::time::Duration;
use log::info;
use tokio::io::{ AsyncBufReadExt, AsyncWriteExt, BufReader };

use crate::cli::ChatArgs;
use crate::models::chat::{ Message, Role };
use super::transport::{ HttpRelayTransport, RelayTransport };
use super::{ ChatWidget, Key };

const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

pub fn render_message(message: &Message) -> String {
    let author = match message.role {
        Role::User => "You",
        Role::Assistant => "VIKI",
    };
    format!("[{}] {}: {}", message.timestamp.format("%H:%M"), author, message.content)
}

/// Feeds one line of terminal input to the widget. Returns the lines to print,
/// or `None` when the user asked to leave.
pub async fn process_line<T: RelayTransport>(
    widget: &mut ChatWidget<T>,
    line: &str
) -> Option<Vec<String>> {
    let trimmed = line.trim();
    if QUIT_COMMANDS.contains(&trimmed) {
        widget.close();
        return None;
    }

    let before = widget.conversation().len();
    widget.set_input(line);
    widget.handle_key(Key::Enter { shift: false }).await;

    // The user's own line is already on screen.
    Some(
        widget
            .conversation()
            .messages()
            .iter()
            .skip(before)
            .filter(|m| m.role == Role::Assistant)
            .map(render_message)
            .collect()
    )
}

pub async fn run_chat(args: ChatArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("Chatting with relay at: {}", args.relay_url);
    let transport = HttpRelayTransport::new(
        args.relay_url.clone(),
        Duration::from_secs(args.timeout_secs)
    )?;
    let mut widget = ChatWidget::new(transport);
    widget.open();

    let mut stdout = tokio::io::stdout();
    for message in widget.conversation().messages() {
        stdout.write_all(format!("{}\n", render_message(message)).as_bytes()).await?;
    }
    stdout.write_all(b"Type /quit to leave.\n> ").await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            stdout.write_all(b"VIKI is typing...\n").await?;
            stdout.flush().await?;
        }

        match process_line(&mut widget, &line).await {
            Some(output) => {
                for out in output {
                    stdout.write_all(format!("{}\n", out).as_bytes()).await?;
                }
            }
            None => break,
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}
