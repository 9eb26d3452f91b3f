use prizeboard::application::engine::PrizeBoard;
use prizeboard::domain::funds::{Amount, Balance};
use prizeboard::domain::identity::Identity;
use prizeboard::infrastructure::in_memory::{InMemoryLedgerStore, InMemorySettlement};
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::sync::Arc;

async fn open_board(settlement: InMemorySettlement) -> PrizeBoard {
    PrizeBoard::open(
        Identity::from("judge"),
        Box::new(InMemoryLedgerStore::new()),
        Box::new(settlement),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_concurrent_submissions_get_unique_ids() {
    let board = Arc::new(open_board(InMemorySettlement::new()).await);

    let mut handles = Vec::new();
    for worker in 0..8 {
        let board = Arc::clone(&board);
        handles.push(tokio::spawn(async move {
            let participant = Identity::from(format!("participant-{worker}"));
            let mut ids = Vec::new();
            for i in 0..25 {
                let link = format!("github.com/participant-{worker}/entry-{i}");
                ids.push(board.submit(&participant, &link, "").await.unwrap());
            }
            (participant, ids)
        }));
    }

    let mut all_ids = HashSet::new();
    for handle in handles {
        let (participant, ids) = handle.await.unwrap();
        for id in &ids {
            assert!(all_ids.insert(*id), "id {id} handed out twice");
        }
        // The index lists exactly this worker's ids, in its own order.
        assert_eq!(board.submissions_by(&participant).await, ids);
    }

    assert_eq!(all_ids.len(), 200);
    assert_eq!(board.total_submissions().await, 200);
    // Dense id space: nothing skipped, nothing reused.
    assert_eq!(all_ids.iter().max(), Some(&199));
}

#[tokio::test]
async fn test_concurrent_awards_pick_exactly_one_winner() {
    let settlement = InMemorySettlement::new();
    let board = Arc::new(open_board(settlement.clone()).await);
    let alice = Identity::from("alice");

    board.submit(&alice, "github.com/a/1", "").await.unwrap();
    // Enough for one payout only.
    board
        .fund_pool(&alice, Amount::new(dec!(10.0)).unwrap())
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let board = Arc::clone(&board);
        handles.push(tokio::spawn(async move {
            board
                .select_winner(&Identity::from("judge"), 0, Amount::new(dec!(10.0)).unwrap())
                .await
        }));
    }

    let mut wins = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            wins += 1;
        }
    }

    assert_eq!(wins, 1, "exactly one award may succeed");
    assert_eq!(board.pool_balance().await, Balance::ZERO);
    assert_eq!(
        settlement.received_by(&alice).await,
        Balance::new(dec!(10.0))
    );
}

#[tokio::test]
async fn test_concurrent_funding_adds_up_exactly() {
    let board = Arc::new(open_board(InMemorySettlement::new()).await);

    let mut handles = Vec::new();
    for worker in 0..8 {
        let board = Arc::clone(&board);
        handles.push(tokio::spawn(async move {
            let depositor = Identity::from(format!("backer-{worker}"));
            for _ in 0..25 {
                board
                    .fund_pool(&depositor, Amount::new(dec!(0.01)).unwrap())
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // 200 deposits of 0.01, no drift.
    assert_eq!(board.pool_balance().await.value(), dec!(2.00));
    assert_eq!(
        board
            .notifications()
            .await
            .iter()
            .filter(|n| matches!(
                n,
                prizeboard::domain::event::Notification::Funded { .. }
            ))
            .count(),
        200
    );
}
