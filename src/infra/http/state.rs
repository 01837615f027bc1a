use std::sync::Arc;

use crate::application::board::BoardService;

#[derive(Clone)]
pub struct BoardAppState {
    pub board: Arc<BoardService>,
}

impl BoardAppState {
    pub fn new(board: Arc<BoardService>) -> Self {
        Self { board }
    }
}
