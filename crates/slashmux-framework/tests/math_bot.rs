//! Drives a small calculator bot end to end through a local session.

use std::sync::Arc;

use slashmux_core::model::{CommandData, CommandDataOption, Member, OptionType, User};
use slashmux_core::{Interaction, InteractionResponse, Permissions};
use slashmux_framework::{
    CommandScope, LocalSession, Mux, SessionRef, logger, require_admin,
};

async fn binary_op(session: SessionRef, interaction: Arc<Interaction>, op: fn(i64, i64) -> Option<i64>) {
    let arg = |name| interaction.option(name).and_then(|o| o.int_value());
    let content = match (arg("num1"), arg("num2")) {
        (Some(a), Some(b)) => match op(a, b) {
            Some(result) => result.to_string(),
            None => "cannot divide by zero".to_string(),
        },
        _ => "missing operand".to_string(),
    };
    session
        .respond(&interaction, InteractionResponse::message(content))
        .await
        .unwrap();
}

fn math_interaction(id: &str, op: &str, a: i64, b: i64) -> Interaction {
    let mut interaction = Interaction::command(
        id,
        CommandData::new(
            "math",
            vec![CommandDataOption::sub_command(
                op,
                vec![
                    CommandDataOption::value("num1", OptionType::Integer, a),
                    CommandDataOption::value("num2", OptionType::Integer, b),
                ],
            )],
        ),
    );
    interaction.channel_id = Some("c1".into());
    interaction.member = Some(Member {
        user: Some(User {
            id: "u1".into(),
            username: "alice".into(),
            global_name: None,
        }),
        ..Member::default()
    });
    interaction
}

fn build(session: Arc<LocalSession>) -> Mux {
    let mut mux = Mux::new(session).with_scope(CommandScope::Guild("g".into()));
    mux.use_middleware(logger());
    mux.handle_fn("/math add num1:integer num2:integer", |s, i| {
        binary_op(s, i, |a, b| a.checked_add(b))
    })
    .unwrap()
    .handle_fn("/math subtract num1:integer num2:integer", |s, i| {
        binary_op(s, i, |a, b| a.checked_sub(b))
    })
    .unwrap()
    .handle_fn("/math multiply num1:integer num2:integer", |s, i| {
        binary_op(s, i, |a, b| a.checked_mul(b))
    })
    .unwrap()
    .handle_fn("/math divide num1:integer num2:integer", |s, i| {
        binary_op(s, i, |a, b| a.checked_div(b))
    })
    .unwrap();
    mux
}

#[tokio::test]
async fn test_math_round_trip() {
    let session = Arc::new(LocalSession::new("app"));
    let serving = build(session.clone()).serve().await.unwrap();

    let published = session.published(&CommandScope::Guild("g".into())).unwrap();
    assert_eq!(published.len(), 1);
    let subs: Vec<_> = published[0].options.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(subs, ["add", "subtract", "multiply", "divide"]);

    for (id, op, a, b) in [("1", "add", 2, 3), ("2", "multiply", 6, 7), ("3", "divide", 1, 0)] {
        session.deliver(math_interaction(id, op, a, b)).await.unwrap();
    }

    let replies: Vec<_> = session
        .take_responses()
        .into_iter()
        .map(|(id, r)| (id, r.content().unwrap_or_default().to_string()))
        .collect();
    assert_eq!(
        replies,
        [
            ("1".to_string(), "5".to_string()),
            ("2".to_string(), "42".to_string()),
            ("3".to_string(), "cannot divide by zero".to_string()),
        ]
    );

    serving.close().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_dispatch() {
    let session = Arc::new(LocalSession::new("app"));
    let serving = Arc::new(build(session.clone()).serve().await.unwrap());

    let tasks: Vec<_> = (0..16)
        .map(|n| {
            let serving = Arc::clone(&serving);
            tokio::spawn(async move {
                let interaction = math_interaction(&n.to_string(), "add", n, n);
                serving.handle_interaction(Arc::new(interaction)).await
            })
        })
        .collect();
    for task in tasks {
        assert!(task.await.unwrap());
    }
    assert_eq!(session.responses().len(), 16);
}

#[tokio::test]
async fn test_admin_only_route() {
    let session = Arc::new(
        LocalSession::new("app").with_permissions("u1", "c1", Permissions::default()),
    );
    let mut mux = Mux::new(session.clone());
    mux.use_middleware(require_admin());
    mux.handle_fn("/math add num1:integer num2:integer", |s, i| {
        binary_op(s, i, |a, b| a.checked_add(b))
    })
    .unwrap();
    let serving = mux.serve().await.unwrap();

    session.deliver(math_interaction("1", "add", 1, 1)).await.unwrap();
    session.set_permissions("u1", "c1", Permissions::ADMINISTRATOR);
    session.deliver(math_interaction("2", "add", 1, 1)).await.unwrap();

    let replies: Vec<_> = session
        .responses()
        .into_iter()
        .map(|(_, r)| r.content().unwrap_or_default().to_string())
        .collect();
    assert_eq!(replies, [slashmux_framework::middleware::PERMISSION_DENIED, "2"]);

    serving.close().await.unwrap();
}
