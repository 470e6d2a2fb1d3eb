use std::{sync::Arc, time::Duration};

use catalog::Catalog;
use session_core::{ChatPanelView, SessionHandle, SessionSettings};
use shared::{
    domain::{DetailSection, ProductId, QuickReplyId, Sender},
    protocol::ViewEvent,
};

async fn settle(delay: Duration) {
    tokio::time::sleep(delay).await;
    tokio::task::yield_now().await;
}

#[tokio::test(start_paused = true)]
async fn other_options_quick_reply_from_seed_state() {
    let session = SessionHandle::new(Arc::new(Catalog::builtin()), SessionSettings::default());
    assert_eq!(session.snapshot().await.messages.len(), 5);

    session
        .dispatch(ViewEvent::SelectQuickReply {
            reply_id: QuickReplyId(3),
        })
        .await
        .expect("quick reply");

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.messages.len(), 6);
    assert_eq!(snapshot.messages[5].sender, Sender::User);
    assert_eq!(snapshot.messages[5].text, "Other options?");
    assert!(snapshot.is_loading);

    settle(Duration::from_millis(1501)).await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.messages.len(), 7);
    let reply = &snapshot.messages[6];
    assert_eq!(reply.sender, Sender::Assistant);
    assert!(reply.text.contains("Penfolds Grange 2018"));
    assert!(reply.text.contains("Opus One 2018"));
    assert!(!snapshot.is_loading);
}

#[tokio::test(start_paused = true)]
async fn browsing_recommendations_then_buying() {
    let session = SessionHandle::new(Arc::new(Catalog::builtin()), SessionSettings::default());

    let detail = session.product_detail_view().await;
    assert_eq!(detail.price_label, "$899.99");
    assert_eq!(detail.stock_label, "In Stock (12 available)");
    assert_eq!(detail.varietal_short, "Bordeaux Blend");
    let picked = detail.recommendations[1].product_id;
    assert_eq!(picked, ProductId(3));

    session
        .dispatch(ViewEvent::ToggleSection {
            section: DetailSection::Pairings,
        })
        .await
        .expect("toggle section");
    session
        .dispatch(ViewEvent::SelectProduct { product_id: picked })
        .await
        .expect("select recommendation");

    let detail = session.product_detail_view().await;
    assert_eq!(detail.name, "Opus One 2018");
    assert_eq!(detail.stock_label, "In Stock");
    assert!(detail
        .sections
        .iter()
        .all(|s| s.expanded == s.section.expanded_by_default()));
    assert!(matches!(
        session.chat_panel_view().await,
        ChatPanelView::Minimized { .. }
    ));

    session
        .dispatch(ViewEvent::SendMessage {
            text: "What food pairs well?".into(),
        })
        .await
        .expect("send");
    settle(Duration::from_millis(1501)).await;

    session
        .dispatch(ViewEvent::ConfirmAddToCart)
        .await
        .expect("add to cart");

    match session.chat_panel_view().await {
        ChatPanelView::Expanded {
            messages, typing, ..
        } => {
            assert!(!typing);
            let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
            assert_eq!(texts.len(), 5);
            assert!(texts[3].starts_with("Opus One 2018 pairs beautifully with Prime rib, Duck confit."));
            assert!(texts[4].contains("I've added Opus One 2018 to your cart"));
        }
        ChatPanelView::Minimized { .. } => panic!("add to cart should open the chat"),
    }
}
