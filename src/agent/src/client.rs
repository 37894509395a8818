use std::{sync::Arc, time::Duration};

use common::{
    message::player::MoveRequest,
    model::{
        game::{Move, PlayerId},
        history::History,
    },
};
use derive_more::{Display, Error};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::timeout,
};
use tracing::{debug, info, warn};

use crate::strategy::Strategy;

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum PlayerError {
    #[display("{player} did not answer within {timeout:?}")]
    TimedOut { player: PlayerId, timeout: Duration },
    #[display("{player} disconnected")]
    Disconnected { player: PlayerId },
}

// One seat at the table: owns its strategy and answers move requests.
pub struct Client {
    id: PlayerId,
    strategy: Box<dyn Strategy>,
    moves_played: u32,
}

impl Client {
    pub fn new(id: PlayerId, strategy: Box<dyn Strategy>) -> Self {
        Client {
            id,
            strategy,
            moves_played: 0,
        }
    }

    /// Move the client onto its own task. The task lives until every sender
    /// for its request channel is gone.
    pub fn spawn(self) -> PlayerHandle {
        let id = self.id;
        let (sender, receiver) = mpsc::channel(1);
        let handle = tokio::spawn(self.run(receiver));
        PlayerHandle { id, sender, handle }
    }

    async fn run(mut self, mut receiver: mpsc::Receiver<MoveRequest>) {
        info!("{} ready", self.id);
        while let Some(request) = receiver.recv().await {
            let MoveRequest {
                round,
                history,
                respond_to,
            } = request;
            let next_move = self.play(&history);
            // Snapshot must be released before the reply
            drop(history);
            debug!("{} plays {} in round {}", self.id, next_move, round);
            if respond_to.send(next_move).is_err() {
                warn!(
                    "{} answered round {} after the engine stopped waiting",
                    self.id, round
                );
            }
        }
        info!("{} exited after {} moves", self.id, self.moves_played);
    }

    fn play(&mut self, history: &History) -> Move {
        self.moves_played += 1;
        self.strategy.make_move(history)
    }
}

pub struct PlayerHandle {
    pub id: PlayerId,
    sender: mpsc::Sender<MoveRequest>,
    handle: JoinHandle<()>,
}

impl PlayerHandle {
    /// Ask the worker for its move and wait at most `limit` for the reply.
    pub async fn request_move(
        &self,
        round: u32,
        history: Arc<History>,
        limit: Duration,
    ) -> Result<Move, PlayerError> {
        let player = self.id;
        let (respond_to, response) = oneshot::channel();
        let exchange = async {
            self.sender
                .send(MoveRequest {
                    round,
                    history,
                    respond_to,
                })
                .await
                .map_err(|_| PlayerError::Disconnected { player })?;
            response
                .await
                .map_err(|_| PlayerError::Disconnected { player })
        };
        match timeout(limit, exchange).await {
            Ok(result) => result,
            Err(_) => Err(PlayerError::TimedOut {
                player,
                timeout: limit,
            }),
        }
    }

    /// Close the request channel and give the worker `grace` to finish. A
    /// worker still busy after that is aborted.
    pub async fn shutdown(self, grace: Duration) {
        let PlayerHandle {
            id,
            sender,
            mut handle,
        } = self;
        drop(sender);
        match timeout(grace, &mut handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("{} exited non-gracefully: {}", id, e),
            Err(_) => {
                warn!("{} still busy after {:?}, aborting", id, grace);
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::strategy::{FixedMove, MirrorOpponent};

    use super::*;

    const LIMIT: Duration = Duration::from_millis(500);

    struct Panics;
    impl Strategy for Panics {
        fn make_move(&mut self, _: &History) -> Move {
            panic!("strategy blew up");
        }
    }

    struct Sleeps(Duration);
    impl Strategy for Sleeps {
        fn make_move(&mut self, _: &History) -> Move {
            std::thread::sleep(self.0);
            Move::Rock
        }
    }

    #[tokio::test]
    async fn answers_move_requests() {
        let player = Client::new(PlayerId::Player1, Box::new(FixedMove(Move::Paper))).spawn();
        let history = Arc::new(History::new());
        for round in 1..=3 {
            let played = player.request_move(round, history.clone(), LIMIT).await;
            assert_eq!(played, Ok(Move::Paper));
        }
        player.shutdown(LIMIT).await;
    }

    #[tokio::test]
    async fn worker_sees_the_snapshot_it_is_sent() {
        let player = Client::new(PlayerId::Player2, Box::new(MirrorOpponent::default())).spawn();
        let mut history = History::new();
        assert_eq!(
            player.request_move(1, Arc::new(history.clone()), LIMIT).await,
            Ok(Move::Rock)
        );
        history.record(Move::Scissors, Move::Rock);
        assert_eq!(
            player.request_move(2, Arc::new(history), LIMIT).await,
            Ok(Move::Scissors)
        );
        player.shutdown(LIMIT).await;
    }

    #[tokio::test]
    async fn crashed_worker_is_reported_as_disconnected() {
        let player = Client::new(PlayerId::Player1, Box::new(Panics)).spawn();
        let result = player
            .request_move(1, Arc::new(History::new()), LIMIT)
            .await;
        assert_eq!(
            result,
            Err(PlayerError::Disconnected {
                player: PlayerId::Player1
            })
        );
        player.shutdown(LIMIT).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn slow_worker_times_out() {
        let player = Client::new(
            PlayerId::Player2,
            Box::new(Sleeps(Duration::from_millis(300))),
        )
        .spawn();
        let limit = Duration::from_millis(20);
        let result = player.request_move(1, Arc::new(History::new()), limit).await;
        assert_eq!(
            result,
            Err(PlayerError::TimedOut {
                player: PlayerId::Player2,
                timeout: limit
            })
        );
        player.shutdown(LIMIT).await;
    }

    #[tokio::test]
    async fn worker_releases_snapshot_before_answering() {
        let player = Client::new(PlayerId::Player2, Box::new(MirrorOpponent::default())).spawn();
        let mut history = Arc::new(History::new());
        for round in 1..=3 {
            let played = player
                .request_move(round, history.clone(), LIMIT)
                .await
                .unwrap();
            assert_eq!(Arc::strong_count(&history), 1);
            Arc::get_mut(&mut history)
                .expect("Snapshot still shared after the reply")
                .record(Move::Paper, played);
        }
        player.shutdown(LIMIT).await;
    }
}
