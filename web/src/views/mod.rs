pub(crate) use drag::DragView;
pub(crate) use progressive::WordRevealView;
pub(crate) use puzzle::PuzzleView;
pub(crate) use scratch::ScratchView;

mod drag;
mod progressive;
mod puzzle;
mod scratch;
