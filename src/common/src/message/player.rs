use std::sync::Arc;

use tokio::sync::oneshot;

use crate::model::{game::Move, history::History};

// Engine -> player worker. The worker answers on `respond_to`.
#[derive(Debug)]
pub struct MoveRequest {
    pub round: u32,
    pub history: Arc<History>,
    pub respond_to: oneshot::Sender<Move>,
}
