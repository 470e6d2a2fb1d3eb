use shared::domain::{QuickReplyId, Sender};

use super::*;

fn controller() -> SessionController {
    SessionController::new(Arc::new(Catalog::builtin()), SessionSettings::default())
}

fn controller_with(policy: LoadingPolicy) -> SessionController {
    SessionController::new(
        Arc::new(Catalog::builtin()),
        SessionSettings {
            loading_policy: policy,
            ..SessionSettings::default()
        },
    )
}

fn product(c: &SessionController, id: i64) -> Arc<Product> {
    Arc::clone(c.product(ProductId(id)).expect("catalog product"))
}

#[test]
fn starts_on_seed_product_with_seed_conversation() {
    let c = controller();
    assert_eq!(c.current_product().name, "Château Margaux 2015");
    assert_eq!(c.messages().len(), 5);
    assert_eq!(c.messages()[4].product_reference, Some(ProductId(1)));
    assert!(c.messages().windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    assert!(!c.is_chat_expanded());
    assert!(!c.is_loading());
}

#[test]
fn select_product_resets_log_and_collapses_chat() {
    let catalog = Catalog::builtin();
    for target in catalog.products() {
        let mut c = controller();
        c.open_chat();
        c.send_message("hello");

        c.select_product(target);

        assert_eq!(c.current_product().id, target.id);
        assert!(!c.is_chat_expanded());
        let log = c.messages();
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|m| m.sender == Sender::Assistant));
        assert_eq!(
            log[0].text,
            "Hello! I'm your wine assistant. How can I help you with this wine today?"
        );
        assert!(log[1]
            .text
            .starts_with(&format!("I see you're interested in {}.", target.name)));
        assert_eq!(
            log[1].timestamp - log[0].timestamp,
            chrono::Duration::seconds(20)
        );
    }
}

#[test]
fn send_message_appends_user_message_and_queues_reply() {
    let mut c = controller();
    let pending = c.send_message("Tell me more");

    assert_eq!(pending.delay, Duration::from_millis(1500));
    assert_eq!(c.messages().len(), 6);
    let last = c.messages().last().expect("user message");
    assert_eq!(last.sender, Sender::User);
    assert_eq!(last.text, "Tell me more");
    assert!(c.is_loading());
    assert_eq!(c.pending_replies(), 1);

    let appended = c.resolve_reply(pending.ticket);
    assert_eq!(appended.len(), 1);
    assert_eq!(c.messages().len(), 7);
    let reply = c.messages().last().expect("assistant reply");
    assert_eq!(reply.sender, Sender::Assistant);
    assert_eq!(reply.id, appended[0]);
    assert!(reply.text.contains("$899.99"));
    assert!(!c.is_loading());
}

#[test]
fn message_ids_stay_unique_across_resets() {
    let mut c = controller();
    c.send_message("one");
    c.flush_pending();
    let grange = product(&c, 2);
    c.select_product(&grange);
    c.send_message("two");
    c.flush_pending();
    c.confirm_add_to_cart();

    let mut ids: Vec<MessageId> = c.messages().iter().map(|m| m.id).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn empty_text_is_not_rejected_by_the_core() {
    let mut c = controller();
    c.send_message("");
    assert_eq!(c.messages().last().map(|m| m.text.as_str()), Some(""));
    assert_eq!(c.pending_replies(), 1);
}

#[test]
fn quick_reply_text_becomes_user_message() {
    let mut c = controller();
    let reply = c
        .catalog()
        .quick_reply(QuickReplyId(4))
        .cloned()
        .expect("quick reply");
    c.select_quick_reply(&reply);
    assert_eq!(
        c.messages().last().map(|m| m.text.as_str()),
        Some("What food pairs well?")
    );
    c.flush_pending();
    assert!(c
        .messages()
        .last()
        .expect("reply")
        .text
        .contains("pairs beautifully with"));
}

#[test]
fn replies_resolve_in_send_order() {
    let mut c = controller();
    let first = c.send_message("tell me more");
    let second = c.send_message("view details");

    // Resolving the later ticket delivers the earlier one first.
    let appended = c.resolve_reply(second.ticket);
    assert_eq!(appended.len(), 2);
    let tail: Vec<&str> = c.messages()[c.messages().len() - 2..]
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert!(tail[0].contains("is truly exceptional"));
    assert!(tail[1].starts_with("You're already viewing"));

    assert!(c.resolve_reply(first.ticket).is_empty());
    assert_eq!(c.pending_replies(), 0);
}

#[test]
fn earlier_reply_clears_loading_while_later_is_pending() {
    let mut c = controller_with(LoadingPolicy::LastReplyClears);
    let first = c.send_message("first");
    c.send_message("second");

    c.resolve_reply(first.ticket);
    assert_eq!(c.pending_replies(), 1);
    assert!(!c.is_loading());
}

#[test]
fn outstanding_policy_keeps_loading_until_last_reply() {
    let mut c = controller_with(LoadingPolicy::Outstanding);
    let first = c.send_message("first");
    let second = c.send_message("second");

    c.resolve_reply(first.ticket);
    assert!(c.is_loading());
    c.resolve_reply(second.ticket);
    assert!(!c.is_loading());
}

#[test]
fn reply_uses_product_at_send_time() {
    let mut c = controller();
    let pending = c.send_message("tell me more");
    let sassicaia = product(&c, 4);
    c.select_product(&sassicaia);

    c.resolve_reply(pending.ticket);
    let log = c.messages();
    assert_eq!(log.len(), 3);
    assert!(log[2].text.starts_with("Château Margaux 2015 is truly exceptional."));
}

#[test]
fn toggle_chat_twice_restores_original_state() {
    let mut c = controller();
    for initial in [false, true] {
        if initial {
            c.open_chat();
        } else {
            c.close_chat();
        }
        c.toggle_chat_expanded();
        assert_eq!(c.is_chat_expanded(), !initial);
        c.toggle_chat_expanded();
        assert_eq!(c.is_chat_expanded(), initial);
    }
}

#[test]
fn open_and_close_are_idempotent() {
    let mut c = controller();
    c.open_chat();
    c.open_chat();
    assert!(c.is_chat_expanded());
    c.close_chat();
    c.close_chat();
    assert!(!c.is_chat_expanded());
    assert_eq!(c.messages().len(), 5);
}

#[test]
fn add_to_cart_appends_assistant_message_and_expands_chat() {
    for expanded in [false, true] {
        let mut c = controller();
        if expanded {
            c.open_chat();
        }
        let stock_before = c.current_product().stock_count;

        c.confirm_add_to_cart();

        assert!(c.is_chat_expanded());
        let last = c.messages().last().expect("confirmation");
        assert_eq!(last.sender, Sender::Assistant);
        assert!(last
            .text
            .contains("I've added Château Margaux 2015 to your cart"));
        assert_eq!(c.current_product().stock_count, stock_before);
        assert!(!c.is_loading());
    }
}

#[test]
fn recommendations_follow_current_product() {
    let mut c = controller();
    let ids: Vec<ProductId> = c.recommendations().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![ProductId(2), ProductId(3)]);

    let opus = product(&c, 3);
    c.select_product(&opus);
    let ids: Vec<ProductId> = c.recommendations().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![ProductId(1), ProductId(2)]);
}

#[test]
fn detail_view_state_resets_with_product() {
    let mut c = controller();
    c.toggle_section(DetailSection::Pairings);
    c.toggle_section(DetailSection::Description);
    c.show_image(2);
    assert!(c.detail().is_expanded(DetailSection::Pairings));
    assert!(!c.detail().is_expanded(DetailSection::Description));
    assert_eq!(c.detail().image_index(), 2);

    let grange = product(&c, 2);
    c.select_product(&grange);
    assert!(!c.detail().is_expanded(DetailSection::Pairings));
    assert!(c.detail().is_expanded(DetailSection::Description));
    assert_eq!(c.detail().image_index(), 0);
}

#[test]
fn cancelled_reply_is_never_appended() {
    let mut c = controller();
    let pending = c.send_message("tell me more");
    assert!(c.cancel_reply(pending.ticket));
    assert!(!c.cancel_reply(pending.ticket));
    assert!(c.resolve_reply(pending.ticket).is_empty());
    assert_eq!(c.messages().len(), 6);
    assert!(!c.is_loading());
}

#[test]
fn cancelling_a_reply_follows_the_loading_policy() {
    let mut c = controller_with(LoadingPolicy::LastReplyClears);
    let first = c.send_message("first");
    c.send_message("second");
    assert!(c.cancel_reply(first.ticket));
    assert_eq!(c.pending_replies(), 1);
    assert!(!c.is_loading());

    let mut c = controller_with(LoadingPolicy::Outstanding);
    let first = c.send_message("first");
    let second = c.send_message("second");
    assert!(c.cancel_reply(first.ticket));
    assert!(c.is_loading());
    assert!(c.cancel_reply(second.ticket));
    assert!(!c.is_loading());
}

#[test]
fn events_are_drained_in_application_order() {
    let mut c = controller();
    c.open_chat();
    let pending = c.send_message("hi");
    c.resolve_reply(pending.ticket);

    let events = c.drain_events();
    assert!(matches!(
        events[0],
        SessionEvent::ChatExpansionChanged { expanded: true }
    ));
    assert!(matches!(&events[1], SessionEvent::MessageAppended { message } if message.text == "hi"));
    assert!(matches!(
        events[2],
        SessionEvent::LoadingChanged { is_loading: true }
    ));
    assert!(matches!(
        &events[3],
        SessionEvent::MessageAppended { message } if message.sender == Sender::Assistant
    ));
    assert!(matches!(
        events[4],
        SessionEvent::LoadingChanged { is_loading: false }
    ));
    assert!(c.drain_events().is_empty());
}

#[test]
fn dangling_product_reference_renders_without_link() {
    let mut file = Catalog::builtin().to_file();
    file.seed_conversation[4].product_reference = Some(ProductId(404));
    let catalog = Arc::new(Catalog::from_file(file).expect("catalog"));
    let mut c = SessionController::new(catalog, SessionSettings::default());
    c.open_chat();

    match c.chat_panel_view() {
        ChatPanelView::Expanded { messages, .. } => {
            assert_eq!(messages.len(), 5);
            assert!(messages.iter().all(|row| row.view_details.is_none()));
        }
        ChatPanelView::Minimized { .. } => panic!("chat should be expanded"),
    }
}

#[test]
fn chat_panel_shows_view_details_and_typing_indicator() {
    let mut c = controller();
    assert!(matches!(
        c.chat_panel_view(),
        ChatPanelView::Minimized { badge: "1", .. }
    ));

    c.open_chat();
    c.send_message("anything");
    match c.chat_panel_view() {
        ChatPanelView::Expanded {
            messages,
            typing,
            quick_replies,
            ..
        } => {
            assert!(typing);
            assert_eq!(messages[4].view_details, Some(ProductId(1)));
            assert_eq!(quick_replies.len(), 4);
        }
        ChatPanelView::Minimized { .. } => panic!("chat should be expanded"),
    }
}

#[test]
fn snapshot_exposes_observable_state() {
    let mut c = controller();
    c.send_message("other options");
    let snapshot = c.snapshot();
    assert_eq!(snapshot.session_id, c.id());
    assert_eq!(snapshot.current_product.id, ProductId(1));
    assert_eq!(snapshot.recommendations.len(), 2);
    assert_eq!(snapshot.messages.len(), 6);
    assert!(snapshot.is_loading);
    assert!(!snapshot.chat_expanded);
    assert_eq!(snapshot.quick_replies.len(), 4);
}
