//! Did-you-mean bot
//!
//! Watches one room and answers every message mentioning "you" with the same
//! message, "you" replaced by "we". A second handler logs every message.
//!
//! The room is simulated on the terminal: type lines to post them, the bot's
//! replies are printed.
//!
//! # Usage
//!
//! ```bash
//! NEO_HOME_SERVER=https://matrix.example.org \
//! NEO_USER_ID=@neo:example.org \
//! NEO_ACCESS_TOKEN=secret \
//! NEO_POLLING_INTERVAL_MS=1000 \
//! cargo run --package did-you-mean -- --room '!lobby:example.org'
//! ```
//!
//! Settings can also come from a `neo.toml` in the working directory.

mod console;

use anyhow::Result;
use clap::Parser;
use regex::Regex;
use std::sync::Arc;
use tracing::info;

use neo::framework::body_matches;
use neo::prelude::*;

use console::{ConsoleClient, Inbox};

#[derive(Debug, Parser)]
#[command(version, about = "Suggests \"we\" whenever someone says \"you\"")]
struct Args {
    /// Room to watch.
    #[arg(long, default_value = "!lobby:localhost")]
    room: String,
}

/// Replaces every match of `pattern` in `body` with "we".
fn suggestion(pattern: &Regex, body: &str) -> String {
    format!("Did you mean: \"{}\"", pattern.replace_all(body, "we"))
}

async fn did_you_mean(ctx: Context, pattern: Arc<Regex>) -> HandlerResult {
    info!(content = ctx.body(), event = ?ctx.event(), "received message");
    ctx.send_text(&suggestion(&pattern, ctx.body())).await?;
    Ok(())
}

async fn log_message(ctx: Context) -> HandlerResult {
    info!(content = ctx.body(), event = ?ctx.event(), "received message");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config()?;
    let _guard = logging::init_from_config(&config.logging)?;

    let inbox = Inbox::default();
    let bot = Bot::new(config, |credentials: &Credentials| {
        Ok(ConsoleClient::new(credentials, Arc::clone(&inbox)))
    })?;

    let pattern = Arc::new(Regex::new("(?i)you")?);
    bot.register(body_matches((*pattern).clone()), move |ctx: Context| {
        did_you_mean(ctx, Arc::clone(&pattern))
    });
    bot.register(any(), log_message);

    tokio::spawn(console::read_stdin(args.room.clone(), inbox));

    bot.run_until_shutdown(&args.room).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_replaces_every_you() {
        let pattern = Regex::new("(?i)you").unwrap();
        assert_eq!(
            suggestion(&pattern, "Are YOU sure you want this?"),
            "Did you mean: \"Are we sure we want this?\""
        );
    }

    #[tokio::test]
    async fn test_only_matching_messages_get_a_reply() {
        let inbox = Inbox::default();
        let config = NeoConfig::new("https://localhost", "@neo:localhost", "token");
        let bot = Bot::new(config, |credentials: &Credentials| {
            Ok(ConsoleClient::new(credentials, Arc::clone(&inbox)))
        })
        .unwrap();

        let pattern = Arc::new(Regex::new("(?i)you").unwrap());
        bot.register(body_matches((*pattern).clone()), move |ctx: Context| {
            did_you_mean(ctx, Arc::clone(&pattern))
        });
        bot.register(any(), log_message);

        let mention = Event::text("$1", "!lobby:localhost", console::CONSOLE_USER, "you there?");
        assert_eq!(bot.dispatch(mention).await.unwrap(), 2);

        let other = Event::text("$2", "!lobby:localhost", console::CONSOLE_USER, "hello");
        assert_eq!(bot.dispatch(other).await.unwrap(), 1);
    }
}
