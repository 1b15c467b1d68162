//! Ordering behaviour of cards and tasks over the in-memory store.

use std::sync::Arc;

use chrono::Utc;
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};
use taskboard::domain::ordering::MIN_POSITION_GAP;
use taskboard::domain::ports::{
    BoardCommand, CardCommand, CardQuery, CardRef, MoveCardRequest, MoveTaskRequest, TaskCommand,
    TaskQuery, TaskRef, UserRepository,
};
use taskboard::domain::{
    Board, BoardDraft, BoardService, Card, CardDraft, CardOrderingService, CardStatus,
    EmailAddress, ErrorCode, Task, TaskDraft, TaskOrderingService, TaskStatus, User,
};
use taskboard::outbound::memory::InMemoryStore;

type Cards = CardOrderingService<InMemoryStore, InMemoryStore>;
type Tasks = TaskOrderingService<InMemoryStore, InMemoryStore, InMemoryStore>;

struct World {
    store: Arc<InMemoryStore>,
    boards: BoardService<InMemoryStore, InMemoryStore>,
    cards: Cards,
    tasks: Tasks,
}

impl World {
    async fn user(&self, email: &str) -> User {
        let user = User::from_email(EmailAddress::new(email).expect("valid email"), Utc::now());
        UserRepository::insert(self.store.as_ref(), &user)
            .await
            .expect("insert user");
        user
    }

    async fn board(&self, owner: &User) -> Board {
        self.boards
            .create(
                BoardDraft {
                    name: "Release".to_owned(),
                    description: None,
                },
                owner.id,
            )
            .await
            .expect("create board")
    }

    async fn card(&self, board: &Board, owner: &User, name: &str) -> Card {
        self.cards
            .create(
                board.id,
                CardDraft {
                    name: name.to_owned(),
                    description: None,
                },
                owner.id,
            )
            .await
            .expect("create card")
    }

    async fn task(&self, card: &Card, actor: &User, title: &str) -> Task {
        self.tasks
            .create(
                card_ref(card),
                TaskDraft {
                    title: title.to_owned(),
                    description: None,
                    priority: None,
                    deadline: None,
                    status: None,
                },
                actor.id,
            )
            .await
            .expect("create task")
    }

    async fn card_names(&self, board: &Board, actor: &User) -> Vec<String> {
        self.cards
            .list(board.id, actor.id)
            .await
            .expect("list cards")
            .into_iter()
            .map(|card| card.name)
            .collect()
    }
}

fn card_ref(card: &Card) -> CardRef {
    CardRef {
        board_id: card.board_id,
        card_id: card.id,
    }
}

fn task_ref(card: &Card, task: &Task) -> TaskRef {
    TaskRef {
        card: card_ref(card),
        task_id: task.id,
    }
}

#[fixture]
fn world() -> World {
    let store = Arc::new(InMemoryStore::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    World {
        boards: BoardService::new(store.clone(), store.clone(), clock.clone()),
        cards: CardOrderingService::new(store.clone(), store.clone(), clock.clone()),
        tasks: TaskOrderingService::new(store.clone(), store.clone(), store.clone(), clock),
        store,
    }
}

#[rstest]
#[tokio::test]
async fn cards_append_then_move_between_neighbours(world: World) {
    let owner = world.user("owner@example.com").await;
    let board = world.board(&owner).await;
    let first = world.card(&board, &owner, "first").await;
    let second = world.card(&board, &owner, "second").await;
    let third = world.card(&board, &owner, "third").await;
    assert_eq!(
        [first.position, second.position, third.position],
        [1.0, 2.0, 3.0]
    );
    assert_eq!(first.status, CardStatus::Backlog);

    let moved = world
        .cards
        .move_card(MoveCardRequest {
            card: card_ref(&third),
            status: None,
            index: 0,
            actor: owner.id,
        })
        .await
        .expect("move to front");
    assert_eq!(moved.position, 0.5);

    let moved = world
        .cards
        .move_card(MoveCardRequest {
            card: card_ref(&first),
            status: Some(CardStatus::Done),
            index: 1,
            actor: owner.id,
        })
        .await
        .expect("move between neighbours");
    assert_eq!(moved.status, CardStatus::Done);
    assert_eq!(moved.position, 1.25);

    assert_eq!(
        world.card_names(&board, &owner).await,
        vec!["third", "first", "second"]
    );
}

#[rstest]
#[tokio::test]
async fn repeated_front_moves_keep_a_strict_order(world: World) {
    let owner = world.user("owner@example.com").await;
    let board = world.board(&owner).await;
    let left = world.card(&board, &owner, "left").await;
    let right = world.card(&board, &owner, "right").await;
    let tail = world.card(&board, &owner, "tail").await;

    for round in 0..80 {
        let card = if round % 2 == 0 { &left } else { &right };
        let moved = world
            .cards
            .move_card(MoveCardRequest {
                card: card_ref(card),
                status: None,
                index: 0,
                actor: owner.id,
            })
            .await
            .expect("move to front");
        let listed = world.cards.list(board.id, owner.id).await.expect("list");
        assert_eq!(listed[0].id, moved.id);
        for pair in listed.windows(2) {
            assert!(pair[1].position - pair[0].position >= MIN_POSITION_GAP);
        }
        assert!(listed[0].position >= MIN_POSITION_GAP);
    }

    let names = world.card_names(&board, &owner).await;
    assert_eq!(names.last().map(String::as_str), Some(tail.name.as_str()));
}

#[rstest]
#[tokio::test]
async fn rebalance_reports_nothing_for_healthy_board(world: World) {
    let owner = world.user("owner@example.com").await;
    let board = world.board(&owner).await;
    world.card(&board, &owner, "only").await;

    let outcome = world
        .cards
        .rebalance(board.id, owner.id)
        .await
        .expect("rebalance");
    assert_eq!(outcome.renumbered, 0);
}

#[rstest]
#[tokio::test]
async fn task_moves_across_cards_update_counts(world: World) {
    let owner = world.user("owner@example.com").await;
    let board = world.board(&owner).await;
    let source = world.card(&board, &owner, "source").await;
    let target = world.card(&board, &owner, "target").await;
    let t1 = world.task(&source, &owner, "one").await;
    let t2 = world.task(&source, &owner, "two").await;
    let t3 = world.task(&source, &owner, "three").await;
    assert_eq!([t1.position, t2.position, t3.position], [1.0, 2.0, 3.0]);

    let moved = world
        .tasks
        .move_task(MoveTaskRequest {
            task: task_ref(&source, &t2),
            to_card_id: target.id,
            index: 5,
            actor: owner.id,
        })
        .await
        .expect("move across cards");
    assert_eq!(moved.card_id, target.id);
    assert_eq!(moved.position, 1.0);

    let source_after = world
        .cards
        .get(card_ref(&source), owner.id)
        .await
        .expect("source card");
    let target_after = world
        .cards
        .get(card_ref(&target), owner.id)
        .await
        .expect("target card");
    assert_eq!(source_after.tasks_count, 2);
    assert_eq!(target_after.tasks_count, 1);

    let remaining: Vec<String> = world
        .tasks
        .list(card_ref(&source), owner.id)
        .await
        .expect("list")
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert_eq!(remaining, vec!["one", "three"]);
}

#[rstest]
#[case(TaskStatus::InProgress)]
#[case(TaskStatus::Completed)]
#[tokio::test]
async fn task_moves_across_cards_keep_workflow_status(world: World, #[case] status: TaskStatus) {
    let owner = world.user("owner@example.com").await;
    let board = world.board(&owner).await;
    let source = world.card(&board, &owner, "source").await;
    let target = world.card(&board, &owner, "target").await;
    let task = world
        .tasks
        .create(
            card_ref(&source),
            TaskDraft {
                title: "underway".to_owned(),
                description: None,
                priority: None,
                deadline: None,
                status: Some(status),
            },
            owner.id,
        )
        .await
        .expect("create task");
    assert_eq!(task.status, status);

    let moved = world
        .tasks
        .move_task(MoveTaskRequest {
            task: task_ref(&source, &task),
            to_card_id: target.id,
            index: 0,
            actor: owner.id,
        })
        .await
        .expect("move across cards");
    assert_eq!(moved.card_id, target.id);
    assert_eq!(moved.status, status);

    let fetched = world
        .tasks
        .get(task_ref(&target, &task), owner.id)
        .await
        .expect("re-read moved task");
    assert_eq!(fetched.card_id, target.id);
    assert_eq!(fetched.status, status);
}

#[rstest]
#[tokio::test]
async fn outsiders_and_non_member_assignees_are_rejected(world: World) {
    let owner = world.user("owner@example.com").await;
    let outsider = world.user("outsider@example.com").await;
    let board = world.board(&owner).await;
    let card = world.card(&board, &owner, "card").await;
    let task = world.task(&card, &owner, "task").await;

    let listed = world.cards.list(board.id, outsider.id).await;
    assert_eq!(
        listed.expect_err("outsider listing").code(),
        ErrorCode::Forbidden
    );

    let assigned = world
        .tasks
        .assign(task_ref(&card, &task), outsider.id, owner.id)
        .await;
    assert_eq!(
        assigned.expect_err("non-member assignee").code(),
        ErrorCode::InvalidInput
    );

    world
        .boards
        .add_member(board.id, outsider.id, owner.id)
        .await
        .expect("add member");
    let assigned = world
        .tasks
        .assign(task_ref(&card, &task), outsider.id, owner.id)
        .await
        .expect("assign member");
    assert_eq!(assigned.assigned_to, Some(outsider.id));
    let fetched = world
        .tasks
        .get(task_ref(&card, &task), outsider.id)
        .await
        .expect("member reads task");
    assert_eq!(fetched.assigned_to, Some(outsider.id));
}
