//! Server-rendered views of the board.

pub mod views;
