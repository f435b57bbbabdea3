//! Construction and out-of-loop operations of `Bot`.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio_test::assert_ok;

use common::*;
use neo_core::{Credentials, TransportError, TransportResult};
use neo_framework::{any, body_contains};
use neo_runtime::{Bot, ConfigError, RuntimeError};

#[test]
fn test_new_rejects_missing_credentials() {
    for field in ["home_server", "user_id", "access_token"] {
        let mut config = config();
        match field {
            "home_server" => config.home_server.clear(),
            "user_id" => config.user_id.clear(),
            _ => config.access_token.clear(),
        }

        let called = AtomicBool::new(false);
        let result = Bot::new(config, |_: &Credentials| {
            called.store(true, Ordering::SeqCst);
            Ok(ScriptedClient::default())
        });

        assert!(
            matches!(
                result,
                Err(RuntimeError::Config(ConfigError::MissingField { .. }))
            ),
            "expected missing {field}"
        );
        assert!(!called.load(Ordering::SeqCst));
    }
}

#[test]
fn test_new_reports_connector_failure() {
    let result = Bot::new(config(), |_: &Credentials| -> TransportResult<ScriptedClient> {
        Err(TransportError::Unauthorized("M_UNKNOWN_TOKEN".into()))
    });

    assert!(matches!(
        result,
        Err(RuntimeError::Connect(TransportError::Unauthorized(_)))
    ));
}

#[test]
fn test_connector_receives_credentials() {
    let received = Mutex::new(None);
    let bot = Bot::new(config(), |credentials: &Credentials| {
        *received.lock() = Some(credentials.clone());
        Ok(ScriptedClient::default())
    })
    .unwrap();

    let credentials = received.lock().take().unwrap();
    assert_eq!(credentials.home_server, "https://matrix.example.org");
    assert_eq!(credentials.user_id, BOT);
    assert_eq!(credentials.access_token, "token");
    assert_eq!(bot.config().polling_interval(), Duration::from_secs(10));
}

#[tokio::test]
async fn test_dispatch_outside_run_loop() {
    let bot = Bot::new(config(), |_: &Credentials| Ok(ScriptedClient::default())).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    bot.register(body_contains("you"), recorder(&seen));
    bot.register(any(), recorder(&seen));

    let fired = assert_ok!(bot.dispatch(text("$1", "@alice:example.org", "you there?")).await);
    assert_eq!(fired, 2);

    let fired = assert_ok!(bot.dispatch(text("$2", "@alice:example.org", "hello")).await);
    assert_eq!(fired, 1);

    assert_eq!(*seen.lock(), vec!["you there?", "you there?", "hello"]);
}

#[tokio::test]
async fn test_unregistered_handler_no_longer_fires() {
    let client = ScriptedClient::new(vec![]);
    let bot = Bot::with_client(config(), client.boxed()).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let id = bot.register(any(), recorder(&seen));

    assert!(bot.unregister(id));
    assert!(!bot.unregister(id));

    let fired = assert_ok!(bot.dispatch(text("$1", "@alice:example.org", "hi")).await);
    assert_eq!(fired, 0);
    assert!(seen.lock().is_empty());
}

#[tokio::test]
async fn test_out_of_band_context() {
    let client = ScriptedClient::new(vec![]);
    let bot = Bot::with_client(config(), client.boxed()).unwrap();

    let ctx = bot.context(ROOM);
    assert_eq!(ctx.room_id(), ROOM);
    assert_ok!(ctx.send_text("maintenance in 5 minutes").await);

    assert_eq!(client.sent_texts(), vec!["maintenance in 5 minutes"]);
}

#[test]
fn test_sessions_are_per_room() {
    let client = ScriptedClient::new(vec![]);
    let bot = Bot::with_client(config(), client.boxed()).unwrap();

    let first = bot.session(ROOM);
    assert!(Arc::ptr_eq(&first, &bot.session(ROOM)));
    assert!(!Arc::ptr_eq(&first, &bot.session("!other:example.org")));

    bot.resume_from(ROOM, "saved");
    assert_eq!(first.position().map(|t| t.to_string()), Some("saved".into()));
}
