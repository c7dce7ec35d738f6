use sea_orm::ConnectionTrait;
use uuid::Uuid;

use engine::{
    EngineError, MAX_AMOUNT, Money, NewTransactionCmd, NewWalletCmd, TransactionKind,
    TransactionListQuery, UpdateTransactionCmd,
};

mod common;

use common::{balance, engine_with_db, money, user_with_wallet};

#[tokio::test]
async fn expense_update_delete_keeps_balance_in_step() {
    let (engine, _db) = engine_with_db().await;
    let (user, wallet) = user_with_wallet(&engine, "alice", "1000.00").await;
    assert_eq!(wallet.balance, money("1000.00"));

    let detail = engine
        .create_transaction(
            NewTransactionCmd::expense(user.id, wallet.id, "Groceries", money("200.00"))
                .category("food"),
        )
        .await
        .unwrap();
    let tx_id = detail.transaction.id;
    assert_eq!(balance(&engine, wallet.id, user.id).await, money("800.00"));

    engine
        .update_transaction(UpdateTransactionCmd::new(tx_id).cost(money("150.00")))
        .await
        .unwrap();
    assert_eq!(balance(&engine, wallet.id, user.id).await, money("850.00"));

    engine.delete_transaction(tx_id).await.unwrap();
    assert_eq!(balance(&engine, wallet.id, user.id).await, money("1000.00"));

    assert_eq!(engine.sync_wallet_balance(wallet.id).await.unwrap(), None);
}

#[tokio::test]
async fn income_adds_and_zero_cost_is_accepted() {
    let (engine, _db) = engine_with_db().await;
    let (user, wallet) = user_with_wallet(&engine, "alice", "0").await;

    engine
        .create_transaction(NewTransactionCmd::income(
            user.id,
            wallet.id,
            "Salary",
            money("2500.50"),
        ))
        .await
        .unwrap();
    engine
        .create_transaction(NewTransactionCmd::expense(
            user.id,
            wallet.id,
            "Free sample",
            Money::ZERO,
        ))
        .await
        .unwrap();

    assert_eq!(balance(&engine, wallet.id, user.id).await, money("2500.50"));
}

#[tokio::test]
async fn kind_flip_swings_balance_twice_the_cost() {
    let (engine, _db) = engine_with_db().await;
    let (user, wallet) = user_with_wallet(&engine, "alice", "100.00").await;

    let tx = engine
        .create_transaction(NewTransactionCmd::expense(
            user.id,
            wallet.id,
            "Refund?",
            money("10.00"),
        ))
        .await
        .unwrap()
        .transaction;
    assert_eq!(balance(&engine, wallet.id, user.id).await, money("90.00"));

    let updated = engine
        .update_transaction(UpdateTransactionCmd::new(tx.id).kind(TransactionKind::Income))
        .await
        .unwrap();
    assert_eq!(updated.transaction.kind, TransactionKind::Income);
    assert_eq!(balance(&engine, wallet.id, user.id).await, money("110.00"));
}

#[tokio::test]
async fn moving_between_wallets_reverses_and_reapplies() {
    let (engine, _db) = engine_with_db().await;
    let (user, cash) = user_with_wallet(&engine, "alice", "500.00").await;
    let bank = engine
        .new_wallet(NewWalletCmd::new(user.id, "Bank").opening_balance(money("1000.00")))
        .await
        .unwrap();

    let tx = engine
        .create_transaction(NewTransactionCmd::expense(
            user.id,
            cash.id,
            "Rent",
            money("300.00"),
        ))
        .await
        .unwrap()
        .transaction;
    assert_eq!(balance(&engine, cash.id, user.id).await, money("200.00"));

    // Move and change cost in one update.
    let moved = engine
        .update_transaction(
            UpdateTransactionCmd::new(tx.id)
                .wallet_id(bank.id)
                .cost(money("350.00")),
        )
        .await
        .unwrap();

    assert_eq!(moved.transaction.wallet_id, bank.id);
    assert_eq!(moved.wallet.map(|w| w.name), Some("Bank".to_string()));
    assert_eq!(balance(&engine, cash.id, user.id).await, money("500.00"));
    assert_eq!(balance(&engine, bank.id, user.id).await, money("650.00"));
}

#[tokio::test]
async fn plain_move_conserves_the_total_balance() {
    let (engine, _db) = engine_with_db().await;
    let (user, cash) = user_with_wallet(&engine, "alice", "500.00").await;
    let bank = engine
        .new_wallet(NewWalletCmd::new(user.id, "Bank").opening_balance(money("1000.00")))
        .await
        .unwrap();
    let tx = engine
        .create_transaction(NewTransactionCmd::income(
            user.id,
            cash.id,
            "Salary",
            money("250.00"),
        ))
        .await
        .unwrap()
        .transaction;

    let total = |wallets: Vec<engine::Wallet>| -> i64 {
        wallets.iter().map(|w| w.balance.minor()).sum()
    };
    let before = total(engine.list_wallets(user.id, false).await.unwrap());
    let cash_before = balance(&engine, cash.id, user.id).await;
    let bank_before = balance(&engine, bank.id, user.id).await;

    engine
        .update_transaction(UpdateTransactionCmd::new(tx.id).wallet_id(bank.id))
        .await
        .unwrap();

    let impact = tx.impact().minor();
    assert_eq!(
        balance(&engine, cash.id, user.id).await.minor(),
        cash_before.minor() - impact
    );
    assert_eq!(
        balance(&engine, bank.id, user.id).await.minor(),
        bank_before.minor() + impact
    );
    assert_eq!(
        total(engine.list_wallets(user.id, false).await.unwrap()),
        before
    );
}

#[tokio::test]
async fn moving_to_a_foreign_wallet_is_forbidden_and_changes_nothing() {
    let (engine, _db) = engine_with_db().await;
    let (alice, cash) = user_with_wallet(&engine, "alice", "100.00").await;
    let (bob, bobs) = user_with_wallet(&engine, "bob", "100.00").await;

    let tx = engine
        .create_transaction(NewTransactionCmd::expense(
            alice.id,
            cash.id,
            "Coffee",
            money("5.00"),
        ))
        .await
        .unwrap()
        .transaction;

    let err = engine
        .update_transaction(
            UpdateTransactionCmd::new(tx.id)
                .wallet_id(bobs.id)
                .name("Moved coffee"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let stored = engine.transaction(tx.id, alice.id).await.unwrap().transaction;
    assert_eq!(stored, tx);
    assert_eq!(balance(&engine, cash.id, alice.id).await, money("95.00"));
    assert_eq!(balance(&engine, bobs.id, bob.id).await, money("100.00"));
}

#[tokio::test]
async fn reassigning_owner_lets_the_move_follow_the_new_owner() {
    let (engine, _db) = engine_with_db().await;
    let (alice, cash) = user_with_wallet(&engine, "alice", "100.00").await;
    let (bob, bobs) = user_with_wallet(&engine, "bob", "0").await;

    let tx = engine
        .create_transaction(NewTransactionCmd::income(
            alice.id,
            cash.id,
            "Gift",
            money("40.00"),
        ))
        .await
        .unwrap()
        .transaction;

    let detail = engine
        .update_transaction(
            UpdateTransactionCmd::new(tx.id)
                .user_id(bob.id)
                .wallet_id(bobs.id),
        )
        .await
        .unwrap();
    assert_eq!(detail.transaction.user_id, bob.id);
    assert_eq!(detail.user.map(|u| u.username), Some("bob".to_string()));
    assert_eq!(balance(&engine, cash.id, alice.id).await, money("100.00"));
    assert_eq!(balance(&engine, bobs.id, bob.id).await, money("40.00"));

    let err = engine
        .update_transaction(UpdateTransactionCmd::new(tx.id).user_id(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn moving_across_currencies_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let (user, cash) = user_with_wallet(&engine, "alice", "100.00").await;
    let euros = engine
        .new_wallet(NewWalletCmd::new(user.id, "Travel").currency(engine::Currency::Eur))
        .await
        .unwrap();
    let tx = engine
        .create_transaction(NewTransactionCmd::expense(
            user.id,
            cash.id,
            "Taxi",
            money("12.00"),
        ))
        .await
        .unwrap()
        .transaction;

    let err = engine
        .update_transaction(UpdateTransactionCmd::new(tx.id).wallet_id(euros.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(balance(&engine, cash.id, user.id).await, money("88.00"));
}

#[tokio::test]
async fn create_checks_user_wallet_and_ownership() {
    let (engine, _db) = engine_with_db().await;
    let (alice, cash) = user_with_wallet(&engine, "alice", "10.00").await;
    let (bob, _) = user_with_wallet(&engine, "bob", "0").await;

    let err = engine
        .create_transaction(NewTransactionCmd::expense(
            bob.id,
            cash.id,
            "Sneaky",
            money("1.00"),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .create_transaction(NewTransactionCmd::expense(
            alice.id,
            Uuid::new_v4(),
            "Nowhere",
            money("1.00"),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .create_transaction(NewTransactionCmd::expense(
            Uuid::new_v4(),
            cash.id,
            "Ghost",
            money("1.00"),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .create_transaction(NewTransactionCmd::expense(
            alice.id,
            cash.id,
            "Negative",
            money("-1.00"),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .create_transaction(NewTransactionCmd::expense(
            alice.id,
            cash.id,
            "   ",
            money("1.00"),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    assert_eq!(balance(&engine, cash.id, alice.id).await, money("10.00"));
}

#[tokio::test]
async fn deleted_wallet_rejects_new_transactions() {
    let (engine, _db) = engine_with_db().await;
    let (user, cash) = user_with_wallet(&engine, "alice", "10.00").await;
    engine.delete_wallet(cash.id, user.id).await.unwrap();

    let err = engine
        .create_transaction(NewTransactionCmd::income(
            user.id,
            cash.id,
            "Late",
            money("1.00"),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn restore_reapplies_and_lifecycle_errors_are_validation() {
    let (engine, _db) = engine_with_db().await;
    let (user, cash) = user_with_wallet(&engine, "alice", "100.00").await;
    let tx = engine
        .create_transaction(NewTransactionCmd::expense(
            user.id,
            cash.id,
            "Book",
            money("30.00"),
        ))
        .await
        .unwrap()
        .transaction;

    engine.delete_transaction(tx.id).await.unwrap();
    assert_eq!(balance(&engine, cash.id, user.id).await, money("100.00"));
    assert!(matches!(
        engine.delete_transaction(tx.id).await,
        Err(EngineError::Validation(_))
    ));
    assert!(matches!(
        engine
            .update_transaction(UpdateTransactionCmd::new(tx.id).cost(money("1.00")))
            .await,
        Err(EngineError::Validation(_))
    ));

    let deleted = engine.transaction(tx.id, user.id).await.unwrap();
    assert!(!deleted.transaction.is_active());

    let restored = engine.restore_transaction(tx.id).await.unwrap();
    assert!(restored.transaction.is_active());
    assert_eq!(balance(&engine, cash.id, user.id).await, money("70.00"));
    assert!(matches!(
        engine.restore_transaction(tx.id).await,
        Err(EngineError::Validation(_))
    ));

    assert!(matches!(
        engine.delete_transaction(Uuid::new_v4()).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn notes_and_categories_can_be_cleared() {
    let (engine, _db) = engine_with_db().await;
    let (user, cash) = user_with_wallet(&engine, "alice", "0").await;
    let tx = engine
        .create_transaction(
            NewTransactionCmd::income(user.id, cash.id, "Bonus", money("1.00"))
                .note("Q3")
                .category("work"),
        )
        .await
        .unwrap()
        .transaction;
    assert_eq!(tx.note.as_deref(), Some("Q3"));

    let updated = engine
        .update_transaction(UpdateTransactionCmd::new(tx.id).note("  ").name(" Bonus Q3 "))
        .await
        .unwrap()
        .transaction;
    assert_eq!(updated.note, None);
    assert_eq!(updated.category.as_deref(), Some("work"));
    assert_eq!(updated.name, "Bonus Q3");
}

#[tokio::test]
async fn reading_someone_elses_transaction_is_forbidden() {
    let (engine, _db) = engine_with_db().await;
    let (alice, cash) = user_with_wallet(&engine, "alice", "0").await;
    let (bob, _) = user_with_wallet(&engine, "bob", "0").await;
    let tx = engine
        .create_transaction(NewTransactionCmd::income(
            alice.id,
            cash.id,
            "Tip",
            money("2.00"),
        ))
        .await
        .unwrap()
        .transaction;

    let detail = engine.transaction(tx.id, alice.id).await.unwrap();
    assert_eq!(detail.wallet.map(|w| w.id), Some(cash.id));
    assert!(matches!(
        engine.transaction(tx.id, bob.id).await,
        Err(EngineError::Forbidden(_))
    ));
}

#[tokio::test]
async fn listing_pages_newest_first_without_gaps() {
    let (engine, _db) = engine_with_db().await;
    let (user, cash) = user_with_wallet(&engine, "alice", "0").await;
    let mut created = Vec::new();
    for i in 0..5 {
        let tx = engine
            .create_transaction(NewTransactionCmd::income(
                user.id,
                cash.id,
                format!("Tx {i}"),
                money("1.00"),
            ))
            .await
            .unwrap()
            .transaction;
        created.push(tx.id);
    }
    engine.delete_transaction(created[0]).await.unwrap();

    let mut seen = Vec::new();
    let mut query = TransactionListQuery::for_user(user.id).wallet(cash.id).limit(2);
    loop {
        let page = engine.list_transactions(&query).await.unwrap();
        assert!(page.transactions.len() <= 2);
        seen.extend(page.transactions.iter().map(|tx| tx.id));
        match page.next_cursor {
            Some(cursor) => query = query.cursor(cursor),
            None => break,
        }
    }

    let expected: Vec<Uuid> = created[1..].iter().rev().copied().collect();
    assert_eq!(seen, expected);

    let all = engine
        .list_transactions(&TransactionListQuery::for_user(user.id).include_deleted(true))
        .await
        .unwrap();
    assert_eq!(all.transactions.len(), 5);
    assert_eq!(all.next_cursor, None);

    let expenses = engine
        .list_transactions(&TransactionListQuery::for_user(user.id).kind(TransactionKind::Expense))
        .await
        .unwrap();
    assert!(expenses.transactions.is_empty());
}

#[tokio::test]
async fn listing_rejects_bad_cursors_and_foreign_wallets() {
    let (engine, _db) = engine_with_db().await;
    let (alice, _) = user_with_wallet(&engine, "alice", "0").await;
    let (_, bobs) = user_with_wallet(&engine, "bob", "0").await;

    let err = engine
        .list_transactions(&TransactionListQuery::for_user(alice.id).cursor("%%%"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidCursor(_)));

    let err = engine
        .list_transactions(&TransactionListQuery::for_user(alice.id).wallet(bobs.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn failed_balance_write_rolls_back_the_transaction_row() {
    let (engine, db) = engine_with_db().await;
    let (user, cash) = user_with_wallet(&engine, "alice", "100.00").await;

    db.execute_unprepared(
        "CREATE TRIGGER reject_balance BEFORE UPDATE OF balance ON wallets \
         BEGIN SELECT RAISE(ABORT, 'simulated fault'); END;",
    )
    .await
    .unwrap();

    let err = engine
        .create_transaction(NewTransactionCmd::expense(
            user.id,
            cash.id,
            "Doomed",
            money("10.00"),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));

    let page = engine
        .list_transactions(&TransactionListQuery::for_user(user.id).include_deleted(true))
        .await
        .unwrap();
    assert!(page.transactions.iter().all(|tx| tx.name != "Doomed"));
    assert_eq!(balance(&engine, cash.id, user.id).await, money("100.00"));
}

#[tokio::test]
async fn failed_move_rolls_back_the_source_wallet_adjustment() {
    let (engine, db) = engine_with_db().await;
    let (user, cash) = user_with_wallet(&engine, "alice", "500.00").await;
    let bank = engine
        .new_wallet(NewWalletCmd::new(user.id, "Bank").opening_balance(money("1000.00")))
        .await
        .unwrap();
    let tx = engine
        .create_transaction(NewTransactionCmd::expense(
            user.id,
            cash.id,
            "Rent",
            money("300.00"),
        ))
        .await
        .unwrap()
        .transaction;

    // Only the second write of the move (the target wallet) fails.
    db.execute_unprepared(&format!(
        "CREATE TRIGGER reject_bank BEFORE UPDATE OF balance ON wallets \
         WHEN NEW.id = '{}' BEGIN SELECT RAISE(ABORT, 'simulated fault'); END;",
        bank.id
    ))
    .await
    .unwrap();

    let err = engine
        .update_transaction(UpdateTransactionCmd::new(tx.id).wallet_id(bank.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));

    assert_eq!(balance(&engine, cash.id, user.id).await, money("200.00"));
    assert_eq!(balance(&engine, bank.id, user.id).await, money("1000.00"));
    let stored = engine.transaction(tx.id, user.id).await.unwrap().transaction;
    assert_eq!(stored.wallet_id, cash.id);
    assert_eq!(stored.cost, tx.cost);
}

#[tokio::test]
async fn failed_delete_rolls_back_the_reversal() {
    let (engine, db) = engine_with_db().await;
    let (user, cash) = user_with_wallet(&engine, "alice", "100.00").await;
    let tx = engine
        .create_transaction(NewTransactionCmd::expense(
            user.id,
            cash.id,
            "Lunch",
            money("25.00"),
        ))
        .await
        .unwrap()
        .transaction;

    // The reversal runs first; marking the row deleted fails afterwards.
    db.execute_unprepared(
        "CREATE TRIGGER reject_soft_delete BEFORE UPDATE OF deleted_at ON transactions \
         BEGIN SELECT RAISE(ABORT, 'simulated fault'); END;",
    )
    .await
    .unwrap();

    let err = engine.delete_transaction(tx.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));

    assert_eq!(balance(&engine, cash.id, user.id).await, money("75.00"));
    let stored = engine.transaction(tx.id, user.id).await.unwrap().transaction;
    assert!(stored.is_active());
}

#[tokio::test]
async fn oversized_cost_is_rejected_before_any_write() {
    let (engine, _db) = engine_with_db().await;
    let (user, cash) = user_with_wallet(&engine, "alice", "0.00").await;

    let err = engine
        .create_transaction(NewTransactionCmd::expense(
            user.id,
            cash.id,
            "Everything",
            money("92233720368547758.07"),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let tx = engine
        .create_transaction(NewTransactionCmd::expense(
            user.id,
            cash.id,
            "Cap",
            MAX_AMOUNT,
        ))
        .await
        .unwrap()
        .transaction;
    let err = engine
        .update_transaction(UpdateTransactionCmd::new(tx.id).cost(Money::new(i64::MAX)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert_eq!(balance(&engine, cash.id, user.id).await, -MAX_AMOUNT);
}

#[tokio::test]
async fn flipping_the_largest_expense_to_income_does_not_overflow() {
    let (engine, _db) = engine_with_db().await;
    let (user, cash) = user_with_wallet(&engine, "alice", "0.00").await;
    let tx = engine
        .create_transaction(NewTransactionCmd::expense(
            user.id,
            cash.id,
            "Cap",
            MAX_AMOUNT,
        ))
        .await
        .unwrap()
        .transaction;

    engine
        .update_transaction(UpdateTransactionCmd::new(tx.id).kind(TransactionKind::Income))
        .await
        .unwrap();
    assert_eq!(balance(&engine, cash.id, user.id).await, MAX_AMOUNT);
    assert_eq!(engine.sync_wallet_balance(cash.id).await.unwrap(), None);
}

#[tokio::test]
async fn balance_overflow_rolls_back_and_leaves_the_wallet_readable() {
    let (engine, db) = engine_with_db().await;
    let user = engine.new_user("alice").await.unwrap();
    let wallet = engine
        .new_wallet(NewWalletCmd::new(user.id, "Vault").opening_balance(MAX_AMOUNT))
        .await
        .unwrap();
    for _ in 0..3 {
        engine
            .create_transaction(NewTransactionCmd::income(
                user.id,
                wallet.id,
                "Windfall",
                MAX_AMOUNT,
            ))
            .await
            .unwrap();
    }
    let full = Money::new(MAX_AMOUNT.minor() * 4);
    assert_eq!(balance(&engine, wallet.id, user.id).await, full);

    let err = engine
        .create_transaction(NewTransactionCmd::income(
            user.id,
            wallet.id,
            "One too many",
            MAX_AMOUNT,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    assert_eq!(balance(&engine, wallet.id, user.id).await, full);
    let page = engine
        .list_transactions(&TransactionListQuery::for_user(user.id).include_deleted(true))
        .await
        .unwrap();
    assert_eq!(page.transactions.len(), 4);
    assert!(page.transactions.iter().all(|tx| tx.name != "One too many"));

    let stored_type = db
        .query_one(sea_orm::Statement::from_sql_and_values(
            db.get_database_backend(),
            "SELECT typeof(balance) AS t FROM wallets WHERE id = ?",
            vec![wallet.id.to_string().into()],
        ))
        .await
        .unwrap()
        .unwrap()
        .try_get::<String>("", "t")
        .unwrap();
    assert_eq!(stored_type, "integer");
    assert_eq!(engine.sync_wallet_balance(wallet.id).await.unwrap(), None);
}
